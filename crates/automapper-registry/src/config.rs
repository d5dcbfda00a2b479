//! Mapping configuration per type pair.
//!
//! This module provides [`MappingConfig`], the name overrides, converters and
//! ignored fields of one (source, target) pair, and [`ConfigStore`], which
//! owns one configuration per pair.
//!
//! # Storage Model
//!
//! Configurations are copy-on-write: readers get an `Arc<MappingConfig>`
//! snapshot and never observe a half-applied update. Writers clone the current
//! snapshot, apply the change and swap the `Arc`.
//!
//! A configuration is created the first time its pair is referenced and is
//! seeded from the field attributes of both types (`map_to`, `converter`).
//! Explicit calls overwrite seeded entries.

use std::sync::{Arc, PoisonError, RwLock};

use rustc_hash::{FxHashMap, FxHashSet};

use automapper_core::{Converter, PairRef, TypeMeta, TypePair};

/// Configuration of a single type pair.
#[derive(Debug, Clone, Default)]
pub struct MappingConfig {
    /// Source field name -> target field name.
    name_overrides: FxHashMap<String, String>,
    /// Source field name -> converter.
    converters: FxHashMap<String, Converter>,
    /// Source field names excluded from mapping.
    ignored: FxHashSet<String>,
}

impl MappingConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration seeded from field attributes.
    ///
    /// A `map_to` on a target field maps the named source field to it; a
    /// `map_to` on a source field maps it to the named target field. Source
    /// declarations win when both name the same source field.
    pub fn seeded(source: &TypeMeta, target: &TypeMeta) -> Self {
        let mut config = Self::new();

        for field in &target.fields {
            if let Some(source_name) = field.map_to {
                config.set_name_override(source_name, field.name);
            }
        }
        for field in &source.fields {
            if let Some(target_name) = field.map_to {
                config.set_name_override(field.name, target_name);
            }
            if let Some(make) = field.converter {
                config.set_converter(field.name, make());
            }
        }

        config
    }

    // ==========================================================================
    // Queries
    // ==========================================================================

    /// Target field name configured for a source field.
    pub fn name_override(&self, source_field: &str) -> Option<&str> {
        self.name_overrides.get(source_field).map(String::as_str)
    }

    /// Converter configured for a source field.
    pub fn converter(&self, source_field: &str) -> Option<&Converter> {
        self.converters.get(source_field)
    }

    /// Whether a source field is excluded.
    pub fn is_ignored(&self, source_field: &str) -> bool {
        self.ignored.contains(source_field)
    }

    /// All name overrides, in no particular order.
    pub fn name_overrides(&self) -> impl Iterator<Item = (&str, &str)> {
        self.name_overrides
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of configured converters.
    pub fn converter_count(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.name_overrides.is_empty() && self.converters.is_empty() && self.ignored.is_empty()
    }

    // ==========================================================================
    // Upserts
    // ==========================================================================

    /// Map a source field to a differently named target field.
    pub fn set_name_override(&mut self, source_field: impl Into<String>, target_field: impl Into<String>) {
        self.name_overrides
            .insert(source_field.into(), target_field.into());
    }

    /// Register a converter for a source field.
    pub fn set_converter(&mut self, source_field: impl Into<String>, converter: Converter) {
        self.converters.insert(source_field.into(), converter);
    }

    /// Exclude a source field.
    pub fn ignore(&mut self, source_field: impl Into<String>) {
        self.ignored.insert(source_field.into());
    }
}

/// Owns the configuration of every pair an engine has seen.
#[derive(Debug, Default)]
pub struct ConfigStore {
    configs: RwLock<FxHashMap<TypePair, Arc<MappingConfig>>>,
}

impl ConfigStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current configuration snapshot, created and seeded on first reference.
    pub fn get(&self, pair: &PairRef) -> Arc<MappingConfig> {
        if let Some(config) = self
            .configs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&pair.pair)
        {
            return Arc::clone(config);
        }

        let mut configs = self.configs.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            configs
                .entry(pair.pair)
                .or_insert_with(|| Arc::new(MappingConfig::seeded(&(pair.source)(), &(pair.target)()))),
        )
    }

    /// Apply a mutation copy-on-write and return the new snapshot.
    pub fn update<F>(&self, pair: &PairRef, mutate: F) -> Arc<MappingConfig>
    where
        F: FnOnce(&mut MappingConfig),
    {
        let mut configs = self.configs.write().unwrap_or_else(PoisonError::into_inner);
        let current = configs
            .entry(pair.pair)
            .or_insert_with(|| Arc::new(MappingConfig::seeded(&(pair.source)(), &(pair.target)())));

        let mut next = (**current).clone();
        mutate(&mut next);
        *current = Arc::new(next);
        Arc::clone(current)
    }

    /// Whether a configuration exists for `pair`.
    pub fn contains(&self, pair: TypePair) -> bool {
        self.configs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&pair)
    }

    /// Number of configured pairs.
    pub fn len(&self) -> usize {
        self.configs.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use automapper_core::{FieldMeta, FromValue, IntoValue, Reflect, Value};

    #[derive(Default)]
    struct Src {
        full_name: String,
    }

    #[derive(Default)]
    struct Dst {
        name: String,
    }

    fn upper(s: String) -> String {
        s.to_uppercase()
    }

    fn src_meta() -> TypeMeta {
        TypeMeta::new("Src", "tests::Src").with_field(
            FieldMeta::new(
                "full_name",
                <String as Reflect>::descriptor,
                |obj| obj.downcast_ref::<Src>().map(|s| s.full_name.clone().into_value()),
                |obj, value| {
                    if let Some(s) = obj.downcast_mut::<Src>() {
                        s.full_name = String::from_value(value)?;
                    }
                    Ok(())
                },
            )
            .with_map_to("name")
            .with_converter(|| Converter::new(upper)),
        )
    }

    fn dst_meta() -> TypeMeta {
        TypeMeta::new("Dst", "tests::Dst").with_field(
            FieldMeta::new(
                "name",
                <String as Reflect>::descriptor,
                |obj| obj.downcast_ref::<Dst>().map(|d| Value::String(d.name.clone())),
                |obj, value| {
                    if let Some(d) = obj.downcast_mut::<Dst>() {
                        d.name = String::from_value(value)?;
                    }
                    Ok(())
                },
            )
            .with_map_to("alias"),
        )
    }

    fn plain_meta() -> TypeMeta {
        TypeMeta::new("Plain", "tests::Plain")
    }

    #[test]
    fn seeded_from_attributes() {
        let config = MappingConfig::seeded(&src_meta(), &dst_meta());
        assert_eq!(config.name_override("full_name"), Some("name"));
        assert_eq!(config.name_override("alias"), Some("name"));
        assert!(config.converter("full_name").is_some());
        assert_eq!(config.converter_count(), 1);
    }

    #[test]
    fn source_declaration_wins_over_target() {
        let target = TypeMeta::new("T", "tests::T").with_field(
            FieldMeta::new(
                "other",
                <String as Reflect>::descriptor,
                |_| None,
                |_, _| Ok(()),
            )
            .with_map_to("full_name"),
        );
        let config = MappingConfig::seeded(&src_meta(), &target);
        assert_eq!(config.name_override("full_name"), Some("name"));
    }

    #[test]
    fn upserts_last_write_wins() {
        let mut config = MappingConfig::new();
        assert!(config.is_empty());
        config.set_name_override("a", "b");
        config.set_name_override("a", "c");
        assert_eq!(config.name_override("a"), Some("c"));
        assert_eq!(config.name_overrides().count(), 1);

        config.ignore("secret");
        assert!(config.is_ignored("secret"));
        assert!(!config.is_ignored("a"));
    }

    #[test]
    fn store_creates_on_first_reference() {
        let store = ConfigStore::new();
        let pair = PairRef::from_meta(src_meta, dst_meta);
        assert!(!store.contains(pair.pair));

        let config = store.get(&pair);
        assert_eq!(config.name_override("full_name"), Some("name"));
        assert!(store.contains(pair.pair));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn store_update_is_copy_on_write() {
        let store = ConfigStore::new();
        let pair = PairRef::from_meta(src_meta, plain_meta);

        let before = store.get(&pair);
        let after = store.update(&pair, |config| config.set_name_override("full_name", "title"));

        assert_eq!(before.name_override("full_name"), None);
        assert_eq!(after.name_override("full_name"), Some("title"));
        assert!(!Arc::ptr_eq(&before, &after));
        assert!(Arc::ptr_eq(&after, &store.get(&pair)));
    }

    #[test]
    fn explicit_calls_override_seeds() {
        let store = ConfigStore::new();
        let pair = PairRef::from_meta(src_meta, dst_meta);
        store.update(&pair, |config| config.set_name_override("full_name", "display"));
        assert_eq!(store.get(&pair).name_override("full_name"), Some("display"));
    }

    #[test]
    fn pairs_are_independent() {
        let store = ConfigStore::new();
        let forward = PairRef::from_meta(src_meta, plain_meta);
        let reverse = forward.reversed();
        store.update(&forward, |config| config.ignore("full_name"));
        assert!(store.get(&forward).is_ignored("full_name"));
        assert!(!store.get(&reverse).is_ignored("full_name"));
    }
}
