//! TypeTable - interned type metadata and known pairs.
//!
//! `TypeMeta` is rebuilt every time `Mappable::type_meta` is called, so the
//! engine interns one `Arc<TypeMeta>` per [`TypeHash`]. The table also records
//! every [`PairRef`] the engine has seen, which is what allows a mapper to be
//! requested by bare [`TypePair`].

use std::sync::{Arc, PoisonError, RwLock};

use rustc_hash::FxHashMap;

use automapper_core::{MapError, PairRef, TypeHash, TypeMeta, TypePair};

/// Interned metadata and pair registry.
#[derive(Default)]
pub struct TypeTable {
    types: RwLock<FxHashMap<TypeHash, Arc<TypeMeta>>>,
    pairs: RwLock<FxHashMap<TypePair, PairRef>>,
}

impl TypeTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the interned metadata produced by `meta`, interning it if needed.
    pub fn meta(&self, meta: fn() -> TypeMeta) -> Arc<TypeMeta> {
        let built = meta();
        if let Some(existing) = self
            .types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&built.type_hash)
        {
            return Arc::clone(existing);
        }

        let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(types.entry(built.type_hash).or_insert_with(|| Arc::new(built)))
    }

    /// Get interned metadata by hash.
    pub fn get(&self, hash: TypeHash) -> Option<Arc<TypeMeta>> {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&hash)
            .cloned()
    }

    /// Record a pair.
    pub fn register_pair(&self, pair: PairRef) {
        let known = self
            .pairs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&pair.pair);
        if !known {
            self.pairs
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(pair.pair, pair);
        }
    }

    /// Look up a recorded pair.
    pub fn pair(&self, pair: TypePair) -> Result<PairRef, MapError> {
        self.pairs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&pair)
            .copied()
            .ok_or(MapError::UnknownPair { pair })
    }

    /// All recorded pairs, in no particular order.
    pub fn pairs(&self) -> Vec<TypePair> {
        self.pairs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect()
    }

    /// Number of interned types.
    pub fn type_count(&self) -> usize {
        self.types.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}
