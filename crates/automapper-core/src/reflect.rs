//! Reflect and Mappable traits.
//!
//! [`Reflect`] is implemented by every type that can appear as a field: it
//! provides the type identity and structural shape the binding resolver works
//! on. [`Mappable`] is implemented by types with their own field table, i.e.
//! the source and target types of a mapping.
//!
//! # Example
//!
//! ```
//! use automapper_core::{Reflect, ScalarKind, TypeHash};
//!
//! assert_eq!(i32::descriptor().scalar(), Some(ScalarKind::I32));
//! assert_eq!(String::type_hash(), TypeHash::from_name("String"));
//! assert!(Vec::<String>::descriptor().is_sequence());
//! ```
//!
//! With the `#[derive(Mappable)]` macro (from `automapper-macros`):
//!
//! ```ignore
//! #[derive(Mappable, Default, Clone)]
//! pub struct Address {
//!     pub street: String,
//!     pub number: i32,
//! }
//! ```

use std::collections::VecDeque;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use uuid::Uuid;

use crate::{ScalarKind, SequenceKind, TypeDescriptor, TypeHash, TypeMeta, TypeShape};

/// Trait for types that can be the declared type of a field.
pub trait Reflect: 'static {
    /// Describe this type.
    fn descriptor() -> TypeDescriptor;

    /// Get the type hash for this type.
    fn type_hash() -> TypeHash {
        Self::descriptor().type_hash
    }

    /// Get the display name for this type.
    fn type_name() -> &'static str {
        Self::descriptor().type_name
    }
}

/// Trait for types with a field table, usable as mapping source or target.
///
/// The recommended way to implement this trait is `#[derive(Mappable)]`.
pub trait Mappable: Reflect + Send + Sync + Sized {
    /// Get the static field table for this type.
    fn type_meta() -> TypeMeta;
}

macro_rules! impl_reflect_scalar {
    ($($ty:ty => $kind:ident, $name:literal);* $(;)?) => {
        $(
            impl Reflect for $ty {
                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor {
                        type_hash: TypeHash::from_name($name),
                        type_name: $name,
                        shape: TypeShape::Scalar(ScalarKind::$kind),
                    }
                }
            }
        )*
    };
}

impl_reflect_scalar! {
    bool => Bool, "bool";
    char => Char, "char";
    i8 => I8, "i8";
    i16 => I16, "i16";
    i32 => I32, "i32";
    i64 => I64, "i64";
    u8 => U8, "u8";
    u16 => U16, "u16";
    u32 => U32, "u32";
    u64 => U64, "u64";
    f32 => F32, "f32";
    f64 => F64, "f64";
    String => String, "String";
    NaiveDate => Date, "chrono::NaiveDate";
    NaiveDateTime => DateTime, "chrono::NaiveDateTime";
    DateTime<Utc> => Timestamp, "chrono::DateTime<Utc>";
    TimeDelta => TimeSpan, "chrono::TimeDelta";
    Uuid => Uuid, "uuid::Uuid";
}

impl<T: Reflect> Reflect for Vec<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor {
            type_hash: TypeHash::from_sequence(SequenceKind::Vec.container_hash(), T::type_hash()),
            type_name: std::any::type_name::<Self>(),
            shape: TypeShape::Sequence {
                container: SequenceKind::Vec,
                element: T::descriptor,
            },
        }
    }
}

impl<T: Reflect> Reflect for VecDeque<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor {
            type_hash: TypeHash::from_sequence(
                SequenceKind::VecDeque.container_hash(),
                T::type_hash(),
            ),
            type_name: std::any::type_name::<Self>(),
            shape: TypeShape::Sequence {
                container: SequenceKind::VecDeque,
                element: T::descriptor,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_descriptors() {
        assert_eq!(bool::descriptor().scalar(), Some(ScalarKind::Bool));
        assert_eq!(u64::descriptor().scalar(), Some(ScalarKind::U64));
        assert_eq!(f32::descriptor().scalar(), Some(ScalarKind::F32));
        assert_eq!(NaiveDate::descriptor().scalar(), Some(ScalarKind::Date));
        assert_eq!(Uuid::descriptor().scalar(), Some(ScalarKind::Uuid));
    }

    #[test]
    fn scalar_type_names() {
        assert_eq!(i32::type_name(), "i32");
        assert_eq!(String::type_name(), "String");
        assert_eq!(TimeDelta::type_name(), "chrono::TimeDelta");
    }

    #[test]
    fn sequence_descriptors() {
        let vec = Vec::<i32>::descriptor();
        let deque = VecDeque::<i32>::descriptor();

        assert!(vec.is_sequence());
        assert!(deque.is_sequence());
        assert_ne!(vec.type_hash, deque.type_hash);
        assert_eq!(vec.element(), Some(i32::descriptor()));
        assert_eq!(deque.element(), Some(i32::descriptor()));
    }

    #[test]
    fn nested_sequence_descriptor() {
        let nested = Vec::<Vec<String>>::descriptor();
        let inner = nested.element().expect("element");
        assert!(inner.is_sequence());
        assert_eq!(inner.element(), Some(String::descriptor()));
    }
}
