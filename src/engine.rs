//! The mapping engine.
//!
//! A [`MappingEngine`] owns one [`ConfigStore`], one [`TypeTable`] and one
//! [`MapperCache`]. Every public operation is keyed by a type pair:
//!
//! - `map` reads the pair's cached mapper, building it lazily on first use.
//! - `configure_mapping`, `add_type_converter` and `ignore_field` replace the
//!   pair's configuration snapshot and rebuild its mapper before returning.
//!
//! Nested objects and sequence elements are mapped through the same engine
//! (see [`MapperLookup`]), so every pair, inner or outer, has its own slot and
//! its own configuration.

use std::any::Any;
use std::sync::{Arc, OnceLock};

use tracing::warn;

use automapper_compiler::{CompileOptions, ValidationReport, compile, validate};
use automapper_core::{
    CompiledMapper, Converter, MapError, Mappable, MapperLookup, PairRef, TypePair,
};
use automapper_registry::{ConfigStore, MapperCache, MappingConfig, TypeTable};

use crate::mapper::Mapper;
use crate::options::EngineOptions;

static GLOBAL: OnceLock<MappingEngine> = OnceLock::new();

/// A type-pair keyed mapping engine.
///
/// ```
/// use automapper::{Mappable, MappingEngine};
///
/// #[derive(Clone, Default, Mappable)]
/// struct Dto { full_name: String, age: i64 }
///
/// #[derive(Clone, Default, Mappable)]
/// struct View { name: String, age: i32 }
///
/// let engine = MappingEngine::new();
/// engine.configure_mapping::<Dto, View>([("full_name", "name")]);
///
/// let view: View = engine.map(&Dto { full_name: "Ada".into(), age: 36 })?;
/// assert_eq!(view.name, "Ada");
/// assert_eq!(view.age, 36);
/// # Ok::<(), automapper::MapError>(())
/// ```
pub struct MappingEngine {
    options: EngineOptions,
    compile_options: CompileOptions,
    configs: ConfigStore,
    types: TypeTable,
    cache: MapperCache,
}

impl Default for MappingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MappingEngine {
    /// Create an engine with default options.
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    /// Create an engine with the given options.
    pub fn with_options(options: EngineOptions) -> Self {
        let compile_options = options.compile_options();
        Self {
            options,
            compile_options,
            configs: ConfigStore::new(),
            types: TypeTable::new(),
            cache: MapperCache::new(),
        }
    }

    /// The process-wide engine used by the free functions in this crate.
    pub fn global() -> &'static MappingEngine {
        GLOBAL.get_or_init(MappingEngine::new)
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Typed handle for the `S -> T` pair.
    pub fn mapper<S: Mappable, T: Mappable>(&self) -> Mapper<'_, S, T> {
        Mapper::new(self)
    }

    /// Map `source` into a new `T`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn map<S: Mappable, T: Mappable>(&self, source: &S) -> Result<T, MapError> {
        let pair = PairRef::of::<S, T>();
        self.lookup(&pair)?.map::<S, T>(source, self)
    }

    /// Upsert name overrides (`source field -> target field`) and recompile.
    pub fn configure_mapping<S: Mappable, T: Mappable>(
        &self,
        overrides: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) {
        self.configure_pair(&PairRef::of::<S, T>(), overrides);
    }

    /// Upsert the converter for `source_field` and recompile.
    pub fn add_type_converter<S: Mappable, T: Mappable>(
        &self,
        source_field: impl Into<String>,
        converter: Converter,
    ) {
        self.add_pair_converter(&PairRef::of::<S, T>(), source_field, converter);
    }

    /// Exclude `source_field` from mapping and recompile.
    pub fn ignore_field<S: Mappable, T: Mappable>(&self, source_field: impl Into<String>) {
        self.ignore_pair_field(&PairRef::of::<S, T>(), source_field);
    }

    /// Report what the `S -> T` mapper would skip under the current configuration.
    pub fn validate<S: Mappable, T: Mappable>(&self) -> ValidationReport {
        self.validate_pair(&PairRef::of::<S, T>())
    }

    /// Current configuration snapshot for `S -> T`.
    pub fn config<S: Mappable, T: Mappable>(&self) -> Arc<MappingConfig> {
        self.pair_config(&PairRef::of::<S, T>())
    }

    /// Get (building if necessary) the mapper for a pair this engine has seen.
    pub fn compiled(&self, pair: TypePair) -> Result<Arc<CompiledMapper>, MapError> {
        let pair = self.types.pair(pair)?;
        self.lookup(&pair)
    }

    /// Map a type-erased source through a pair this engine has seen.
    pub fn map_any(
        &self,
        pair: TypePair,
        source: &dyn Any,
    ) -> Result<Box<dyn Any + Send + Sync>, MapError> {
        self.compiled(pair)?.map_any(source, self)
    }

    /// Every pair this engine has configured, mapped or validated.
    pub fn pairs(&self) -> Vec<TypePair> {
        self.types.pairs()
    }

    /// Whether a compiled mapper is currently cached for `pair`.
    pub fn is_compiled(&self, pair: TypePair) -> bool {
        self.cache.contains(pair)
    }

    pub(crate) fn lookup(&self, pair: &PairRef) -> Result<Arc<CompiledMapper>, MapError> {
        if let Some(mapper) = self.cache.get(pair.pair) {
            return Ok(mapper);
        }
        self.types.register_pair(*pair);
        self.cache.get_or_build(pair.pair, || self.build(pair))
    }

    pub(crate) fn configure_pair(
        &self,
        pair: &PairRef,
        overrides: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) {
        let overrides: Vec<(String, String)> = overrides
            .into_iter()
            .map(|(from, to)| (from.into(), to.into()))
            .collect();
        self.update_config(pair, move |config| {
            for (from, to) in overrides {
                config.set_name_override(from, to);
            }
        });
    }

    pub(crate) fn add_pair_converter(
        &self,
        pair: &PairRef,
        source_field: impl Into<String>,
        converter: Converter,
    ) {
        let source_field = source_field.into();
        self.update_config(pair, move |config| config.set_converter(source_field, converter));
    }

    pub(crate) fn ignore_pair_field(&self, pair: &PairRef, source_field: impl Into<String>) {
        let source_field = source_field.into();
        self.update_config(pair, move |config| config.ignore(source_field));
    }

    pub(crate) fn validate_pair(&self, pair: &PairRef) -> ValidationReport {
        self.types.register_pair(*pair);
        let source = self.types.meta(pair.source);
        let target = self.types.meta(pair.target);
        let config = self.configs.get(pair);
        validate(&source, &target, &config, self.options.unresolved_overrides)
    }

    pub(crate) fn pair_config(&self, pair: &PairRef) -> Arc<MappingConfig> {
        self.types.register_pair(*pair);
        self.configs.get(pair)
    }

    fn update_config<F>(&self, pair: &PairRef, mutate: F)
    where
        F: FnOnce(&mut MappingConfig),
    {
        self.types.register_pair(*pair);
        self.configs.update(pair, mutate);
        if let Err(err) = self.cache.rebuild(pair.pair, || self.build(pair)) {
            let source = self.types.meta(pair.source);
            let target = self.types.meta(pair.target);
            warn!(
                source = source.name,
                target = target.name,
                error = %err,
                "rebuild after configuration change failed"
            );
        }
    }

    fn build(&self, pair: &PairRef) -> Result<CompiledMapper, MapError> {
        let source = self.types.meta(pair.source);
        let target = self.types.meta(pair.target);
        let config = self.configs.get(pair);
        compile(pair, &source, &target, &config, &self.compile_options)
    }
}

impl MapperLookup for MappingEngine {
    fn mapper(&self, pair: &PairRef) -> Result<Arc<CompiledMapper>, MapError> {
        self.lookup(pair)
    }
}
