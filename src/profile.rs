//! Reusable mapping profiles.
//!
//! A profile groups the configuration of one or more pairs so it can be
//! applied to an engine in one call.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::engine::MappingEngine;

/// A reusable block of mapping configuration.
///
/// Closures taking `&MappingEngine` are profiles too.
pub trait MappingProfile: Send + Sync {
    /// Apply this profile's configuration to `engine`.
    fn configure(&self, engine: &MappingEngine);
}

impl<F> MappingProfile for F
where
    F: Fn(&MappingEngine) + Send + Sync,
{
    fn configure(&self, engine: &MappingEngine) {
        self(engine)
    }
}

/// Named profiles registered on one engine.
pub struct ProfileRegistry<'e> {
    engine: &'e MappingEngine,
    profiles: RwLock<BTreeMap<String, Arc<dyn MappingProfile>>>,
}

impl ProfileRegistry<'static> {
    /// Registry applying profiles to the global engine.
    pub fn global() -> Self {
        Self::new(MappingEngine::global())
    }
}

impl<'e> ProfileRegistry<'e> {
    pub fn new(engine: &'e MappingEngine) -> Self {
        Self {
            engine,
            profiles: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn engine(&self) -> &'e MappingEngine {
        self.engine
    }

    /// Apply `profile` to the engine and store it under `name`.
    ///
    /// Registering a name again replaces the stored profile; configuration
    /// already applied by the previous one stays in place.
    pub fn register<P>(&self, name: impl Into<String>, profile: P)
    where
        P: MappingProfile + 'static,
    {
        let name = name.into();
        profile.configure(self.engine);
        debug!(profile = %name, "registered mapping profile");
        self.profiles
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, Arc::new(profile));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn MappingProfile>> {
        self.profiles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Forget a profile. The configuration it applied is not undone.
    pub fn remove(&self, name: &str) -> Option<Arc<dyn MappingProfile>> {
        self.profiles
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.profiles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.profiles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.profiles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
