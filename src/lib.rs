//! Type-pair keyed object mapping.
//!
//! Given a source type and a target type, the engine derives a mapper that
//! constructs a new target and fills its fields from the source, applying
//! name overrides, custom converters, implicit scalar conversions, recursive
//! mapping of nested objects and element-wise mapping of sequences. Mappers
//! are compiled once per pair, cached, and rebuilt whenever the pair's
//! configuration changes.
//!
//! # Quick start
//!
//! ```
//! use automapper::{Converter, Mappable, MappingEngine};
//! use chrono::NaiveDate;
//!
//! #[derive(Clone, Default, Mappable)]
//! struct PersonDto {
//!     full_name: String,
//!     birth_date: NaiveDate,
//!     score: f64,
//! }
//!
//! #[derive(Clone, Default, Mappable)]
//! struct PersonView {
//!     name: String,
//!     birth_date_text: String,
//!     score: i32,
//! }
//!
//! let engine = MappingEngine::new();
//! engine.configure_mapping::<PersonDto, PersonView>([
//!     ("full_name", "name"),
//!     ("birth_date", "birth_date_text"),
//! ]);
//! engine.add_type_converter::<PersonDto, PersonView>(
//!     "birth_date",
//!     Converter::new(|d: NaiveDate| d.format("%d/%m/%Y").to_string()),
//! );
//!
//! let dto = PersonDto {
//!     full_name: "Leandro Rocha".into(),
//!     birth_date: NaiveDate::from_ymd_opt(1999, 9, 22).unwrap(),
//!     score: 98.5,
//! };
//! let view: PersonView = engine.map(&dto)?;
//! assert_eq!(view.name, "Leandro Rocha");
//! assert_eq!(view.birth_date_text, "22/09/1999");
//! assert_eq!(view.score, 98);
//! # Ok::<(), automapper::MapError>(())
//! ```
//!
//! # Global engine
//!
//! The free functions [`map`], [`configure_mapping`], [`add_type_converter`],
//! [`ignore_field`] and [`validate`] operate on [`MappingEngine::global`].
//! Use [`MappingEngine::new`] for isolated engines.
//!
//! # Crates
//!
//! - `automapper-core`: type metadata, values, converters, errors
//! - `automapper-registry`: config store, type table, mapper cache
//! - `automapper-compiler`: binding resolution, compilation, validation
//! - `automapper-macros`: `#[derive(Mappable)]`

mod bidirectional;
mod engine;
mod mapper;
mod options;
mod profile;

pub use bidirectional::BidirectionalMapper;
pub use engine::MappingEngine;
pub use mapper::{Mapper, add_type_converter, configure_mapping, ignore_field, map, validate};
pub use options::{EngineOptions, UnresolvedOverridePolicy};
pub use profile::{MappingProfile, ProfileRegistry};

pub use automapper_compiler::ValidationReport;
pub use automapper_core::{
    CompiledMapper, ConversionError, Converter, DateFormats, FieldDescriptor, FromValue,
    IntoValue, MapError, Mappable, ObjectValue, Reflect, ScalarKind, TypeDescriptor, TypeHash,
    TypeMeta, TypePair, TypeTag, Value,
};
pub use automapper_macros::Mappable;
pub use automapper_registry::MappingConfig;

/// Lower-level building blocks, for code that implements [`Mappable`] by hand.
pub mod core {
    pub use automapper_core::*;
}
