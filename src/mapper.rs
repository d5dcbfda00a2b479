//! Typed per-pair handle and the global free functions.

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use automapper_compiler::ValidationReport;
use automapper_core::{Converter, MapError, Mappable, PairRef, TypePair};
use automapper_registry::MappingConfig;

use crate::engine::MappingEngine;

/// Handle for mapping `S` into `T` on one engine.
///
/// Cheap to create; holds no state besides the pair identity.
pub struct Mapper<'e, S, T> {
    engine: &'e MappingEngine,
    pair: PairRef,
    _marker: PhantomData<fn(&S) -> T>,
}

impl<S, T> Clone for Mapper<'_, S, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, T> Copy for Mapper<'_, S, T> {}

impl<S, T> std::fmt::Debug for Mapper<'_, S, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mapper")
            .field("source", &std::any::type_name::<S>())
            .field("target", &std::any::type_name::<T>())
            .finish()
    }
}

impl<S: Mappable, T: Mappable> Mapper<'static, S, T> {
    /// Handle on the global engine.
    pub fn global() -> Self {
        Self::new(MappingEngine::global())
    }
}

impl<'e, S: Mappable, T: Mappable> Mapper<'e, S, T> {
    pub fn new(engine: &'e MappingEngine) -> Self {
        Self {
            engine,
            pair: PairRef::of::<S, T>(),
            _marker: PhantomData,
        }
    }

    pub fn engine(&self) -> &'e MappingEngine {
        self.engine
    }

    pub fn pair(&self) -> TypePair {
        self.pair.pair
    }

    /// Map `source` into a new `T`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn map(&self, source: &S) -> Result<T, MapError> {
        self.engine
            .lookup(&self.pair)?
            .map::<S, T>(source, self.engine)
    }

    /// Map an optional source. `None` is [`MapError::NullSource`].
    pub fn map_option(&self, source: Option<&S>) -> Result<T, MapError> {
        match source {
            Some(source) => self.map(source),
            None => Err(MapError::NullSource {
                target: T::type_name(),
            }),
        }
    }

    /// Map a type-erased source, which must be an `S`.
    pub fn map_any(&self, source: &dyn Any) -> Result<T, MapError> {
        let source = source
            .downcast_ref::<S>()
            .ok_or(MapError::SourceTypeMismatch {
                expected: S::type_name(),
            })?;
        self.map(source)
    }

    /// Map every element of `sources`, in order, stopping at the first error.
    pub fn map_all<'a, I>(&self, sources: I) -> Result<Vec<T>, MapError>
    where
        I: IntoIterator<Item = &'a S>,
        S: 'a,
    {
        let mapper = self.engine.lookup(&self.pair)?;
        sources
            .into_iter()
            .map(|source| mapper.map::<S, T>(source, self.engine))
            .collect()
    }

    /// Upsert name overrides (`source field -> target field`) and recompile.
    pub fn configure_mapping(
        &self,
        overrides: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> &Self {
        self.engine.configure_pair(&self.pair, overrides);
        self
    }

    /// Upsert the converter for `source_field` and recompile.
    pub fn add_type_converter(&self, source_field: impl Into<String>, converter: Converter) -> &Self {
        self.engine.add_pair_converter(&self.pair, source_field, converter);
        self
    }

    /// Exclude `source_field` from mapping and recompile.
    pub fn ignore_field(&self, source_field: impl Into<String>) -> &Self {
        self.engine.ignore_pair_field(&self.pair, source_field);
        self
    }

    pub fn validate(&self) -> ValidationReport {
        self.engine.validate_pair(&self.pair)
    }

    pub fn config(&self) -> Arc<MappingConfig> {
        self.engine.pair_config(&self.pair)
    }

    pub fn is_compiled(&self) -> bool {
        self.engine.is_compiled(self.pair.pair)
    }
}

/// Map `source` into a new `T` on the global engine.
pub fn map<S: Mappable, T: Mappable>(source: &S) -> Result<T, MapError> {
    MappingEngine::global().map(source)
}

/// Upsert name overrides for `S -> T` on the global engine.
pub fn configure_mapping<S: Mappable, T: Mappable>(
    overrides: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
) {
    MappingEngine::global().configure_mapping::<S, T>(overrides);
}

/// Upsert a converter for `S -> T` on the global engine.
pub fn add_type_converter<S: Mappable, T: Mappable>(
    source_field: impl Into<String>,
    converter: Converter,
) {
    MappingEngine::global().add_type_converter::<S, T>(source_field, converter);
}

/// Ignore a source field of `S -> T` on the global engine.
pub fn ignore_field<S: Mappable, T: Mappable>(source_field: impl Into<String>) {
    MappingEngine::global().ignore_field::<S, T>(source_field);
}

/// Validate `S -> T` on the global engine.
pub fn validate<S: Mappable, T: Mappable>() -> ValidationReport {
    MappingEngine::global().validate::<S, T>()
}
