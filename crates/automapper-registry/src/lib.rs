//! Automapper registry crate.
//!
//! Holds the mutable state of a mapping engine:
//!
//! - [`ConfigStore`]: copy-on-write [`MappingConfig`] per type pair
//! - [`TypeTable`]: interned type metadata and the pairs the engine has seen
//! - [`MapperCache`]: one compiled-mapper slot per type pair

mod cache;
mod config;
mod types;

pub use cache::MapperCache;
pub use config::{ConfigStore, MappingConfig};
pub use types::TypeTable;
