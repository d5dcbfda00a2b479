//! Compiled mapper representation shared by the compiler, cache and engine.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::{MapError, Mappable, TypeMeta, TypePair};

/// Resolves mappers for nested pairs while a mapper is executing.
///
/// Nested lookups happen at map time rather than compile time, which is what
/// lets a type contain a sequence of itself.
pub trait MapperLookup {
    /// Get (building if necessary) the mapper for `pair`.
    fn mapper(&self, pair: &PairRef) -> Result<Arc<CompiledMapper>, MapError>;
}

/// A type pair together with the metadata needed to compile its mapper.
#[derive(Clone, Copy)]
pub struct PairRef {
    pub pair: TypePair,
    pub source: fn() -> TypeMeta,
    pub target: fn() -> TypeMeta,
}

impl PairRef {
    /// Pair reference for two mappable types.
    pub fn of<S: Mappable, T: Mappable>() -> Self {
        Self {
            pair: TypePair::new(S::type_hash(), T::type_hash()),
            source: S::type_meta,
            target: T::type_meta,
        }
    }

    /// Pair reference from metadata functions.
    pub fn from_meta(source: fn() -> TypeMeta, target: fn() -> TypeMeta) -> Self {
        Self {
            pair: TypePair::new(source().type_hash, target().type_hash),
            source,
            target,
        }
    }

    /// The reverse direction.
    pub fn reversed(&self) -> Self {
        Self {
            pair: self.pair.reversed(),
            source: self.target,
            target: self.source,
        }
    }
}

impl fmt::Debug for PairRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PairRef({:?})", self.pair)
    }
}

/// Signature of a compiled mapping function.
pub type MapFn = dyn Fn(&dyn Any, &dyn MapperLookup) -> Result<Box<dyn Any + Send + Sync>, MapError>
    + Send
    + Sync;

/// An executable mapper for one (source, target) pair.
///
/// Immutable once built; replaced as a whole when configuration changes.
pub struct CompiledMapper {
    pair: TypePair,
    source_name: &'static str,
    target_name: &'static str,
    binding_count: usize,
    func: Box<MapFn>,
}

impl CompiledMapper {
    pub fn new(
        pair: TypePair,
        source_name: &'static str,
        target_name: &'static str,
        binding_count: usize,
        func: Box<MapFn>,
    ) -> Self {
        Self {
            pair,
            source_name,
            target_name,
            binding_count,
            func,
        }
    }

    pub fn pair(&self) -> TypePair {
        self.pair
    }

    pub fn source_name(&self) -> &'static str {
        self.source_name
    }

    pub fn target_name(&self) -> &'static str {
        self.target_name
    }

    /// Number of field bindings this mapper executes.
    pub fn binding_count(&self) -> usize {
        self.binding_count
    }

    /// Map a type-erased source instance.
    pub fn map_any(
        &self,
        source: &dyn Any,
        lookup: &dyn MapperLookup,
    ) -> Result<Box<dyn Any + Send + Sync>, MapError> {
        (self.func)(source, lookup)
    }

    /// Map a typed source instance into a typed target.
    pub fn map<S: Any, T: Any>(&self, source: &S, lookup: &dyn MapperLookup) -> Result<T, MapError> {
        let target_name = self.target_name;
        self.map_any(source, lookup)?
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| MapError::TargetTypeMismatch {
                produced: target_name,
            })
    }
}

impl fmt::Debug for CompiledMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledMapper")
            .field("source", &self.source_name)
            .field("target", &self.target_name)
            .field("bindings", &self.binding_count)
            .finish()
    }
}
