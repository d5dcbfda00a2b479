//! MapperCache - one compiled-mapper slot per type pair.
//!
//! # Concurrency
//!
//! - Readers clone the slot's `Arc<CompiledMapper>` under a short read lock and
//!   run the mapper with no lock held.
//! - Builds of the same pair are serialized by a per-slot build mutex, and the
//!   build itself runs outside every `RwLock`, so a map of one pair never waits
//!   on the compilation of another.
//! - Installing is a single `Arc` swap under the slot's write lock.
//! - Lock poisoning is recovered with [`PoisonError::into_inner`]; a slot only
//!   ever holds a complete `Option<Arc<_>>`.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use rustc_hash::FxHashMap;
use tracing::trace;

use automapper_core::{CompiledMapper, MapError, TypePair};

#[derive(Default)]
struct MapperSlot {
    current: RwLock<Option<Arc<CompiledMapper>>>,
    build_lock: Mutex<()>,
}

impl MapperSlot {
    fn load(&self) -> Option<Arc<CompiledMapper>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn store(&self, mapper: Option<Arc<CompiledMapper>>) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = mapper;
    }
}

/// Cache of compiled mappers keyed by [`TypePair`].
#[derive(Default)]
pub struct MapperCache {
    slots: RwLock<FxHashMap<TypePair, Arc<MapperSlot>>>,
}

impl MapperCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, pair: TypePair) -> Arc<MapperSlot> {
        if let Some(slot) = self
            .slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&pair)
        {
            return Arc::clone(slot);
        }

        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(pair).or_default())
    }

    /// Current mapper for `pair`, if one is installed.
    pub fn get(&self, pair: TypePair) -> Option<Arc<CompiledMapper>> {
        let slot = self
            .slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&pair)
            .cloned()?;
        slot.load()
    }

    /// Current mapper for `pair`, building it with `build` if the slot is empty.
    pub fn get_or_build<F>(&self, pair: TypePair, build: F) -> Result<Arc<CompiledMapper>, MapError>
    where
        F: FnOnce() -> Result<CompiledMapper, MapError>,
    {
        let slot = self.slot(pair);
        if let Some(mapper) = slot.load() {
            return Ok(mapper);
        }

        let _guard = slot.build_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(mapper) = slot.load() {
            return Ok(mapper);
        }

        trace!(?pair, "building mapper lazily");
        let mapper = Arc::new(build()?);
        slot.store(Some(Arc::clone(&mapper)));
        Ok(mapper)
    }

    /// Replace the mapper for `pair` with a fresh build.
    ///
    /// On failure the slot is cleared, so the next lookup builds again and
    /// reports the error to its caller.
    pub fn rebuild<F>(&self, pair: TypePair, build: F) -> Result<Arc<CompiledMapper>, MapError>
    where
        F: FnOnce() -> Result<CompiledMapper, MapError>,
    {
        let slot = self.slot(pair);
        let _guard = slot.build_lock.lock().unwrap_or_else(PoisonError::into_inner);

        match build() {
            Ok(mapper) => {
                let mapper = Arc::new(mapper);
                slot.store(Some(Arc::clone(&mapper)));
                Ok(mapper)
            }
            Err(err) => {
                slot.store(None);
                Err(err)
            }
        }
    }

    /// Drop the installed mapper for `pair`.
    pub fn invalidate(&self, pair: TypePair) {
        if let Some(slot) = self
            .slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&pair)
        {
            slot.store(None);
        }
    }

    /// Whether a mapper is installed for `pair`.
    pub fn contains(&self, pair: TypePair) -> bool {
        self.get(pair).is_some()
    }

    /// Number of installed mappers.
    pub fn len(&self) -> usize {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|slot| slot.load().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
