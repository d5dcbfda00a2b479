//! Core types for the automapper engine.
//!
//! This crate holds everything the other automapper crates share:
//!
//! - [`TypeHash`] / [`TypePair`]: deterministic type identity and cache keys
//! - [`TypeMeta`] / [`FieldMeta`]: static field tables generated by `#[derive(Mappable)]`
//! - [`Reflect`] / [`Mappable`]: traits connecting Rust types to their metadata
//! - [`Value`]: the dynamic value passed between accessors, converters and bindings
//! - [`Converter`]: user-supplied typed transformations
//! - [`CompiledMapper`]: the executable result of compiling a type pair
//! - Error types ([`ConversionError`], [`MapError`])

mod convert;
mod converter;
mod error;
pub mod introspect;
mod mapper;
mod meta;
mod reflect;
mod type_hash;
mod value;

pub use convert::{DateFormats, FromValue, IntoValue, convert_scalar, is_implicitly_convertible};
pub use converter::{Converter, TypeTag};
pub use error::{ConversionError, MapError};
pub use introspect::FieldDescriptor;
pub use mapper::{CompiledMapper, MapFn, MapperLookup, PairRef};
pub use meta::{
    Constructor, FieldFlags, FieldGetter, FieldMeta, FieldSetter, InstanceCheck, ScalarKind,
    SequenceKind, TypeDescriptor, TypeMeta, TypeShape,
};
pub use reflect::{Mappable, Reflect};
pub use type_hash::{TypeHash, TypePair, hash_constants};
pub use value::{ObjectValue, Value};
