//! Deterministic hash-based type identity.
//!
//! This module provides [`TypeHash`], a 64-bit hash that identifies a mappable
//! type, and [`TypePair`], the (source, target) identity that scopes mapping
//! configuration and compiled mappers.
//!
//! Hashes are computed from fully qualified type paths, so the same type always
//! produces the same hash regardless of registration order, and two structs
//! with the same short name in different modules never collide.
//!
//! # Examples
//!
//! ```
//! use automapper_core::TypeHash;
//!
//! let a = TypeHash::from_name("app::dto::Person");
//! let b = TypeHash::from_name("app::dto::Person");
//! assert_eq!(a, b);
//!
//! let vec_of_a = TypeHash::from_sequence(TypeHash::from_name("Vec"), a);
//! assert_ne!(vec_of_a, a);
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants for hash computation.
pub mod hash_constants {
    /// Separator constant for composite hashes.
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for type hashes.
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for sequence element arguments.
    pub const ELEMENT: u64 = 0x9e3779b97f4a7c15;

    /// Domain marker for type pair hashes.
    pub const PAIR: u64 = 0x7d3c8b4a92e15f6d;
}

/// A deterministic 64-bit hash identifying a type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from a fully qualified type name.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Create the hash of a sequence container instantiated with an element type.
    ///
    /// `Vec<i32>` and `VecDeque<i32>` hash differently because the container
    /// hash participates.
    #[inline]
    pub fn from_sequence(container: TypeHash, element: TypeHash) -> Self {
        TypeHash(
            container
                .0
                .wrapping_mul(hash_constants::SEP)
                .wrapping_add(hash_constants::ELEMENT ^ element.0),
        )
    }

    /// Check if this is an empty/invalid hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get the underlying u64 value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// Identity of a (source type, target type) combination.
///
/// This is the unit of caching and configuration: every pair owns exactly one
/// mapping configuration and at most one compiled mapper.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypePair {
    /// Hash of the source type.
    pub source: TypeHash,
    /// Hash of the target type.
    pub target: TypeHash,
}

impl TypePair {
    /// Create a pair from two type hashes.
    #[inline]
    pub const fn new(source: TypeHash, target: TypeHash) -> Self {
        Self { source, target }
    }

    /// The pair with source and target swapped.
    #[inline]
    pub const fn reversed(self) -> Self {
        Self {
            source: self.target,
            target: self.source,
        }
    }

    /// Combined hash of both sides. Order matters.
    #[inline]
    pub fn combined(self) -> TypeHash {
        TypeHash(
            (hash_constants::PAIR ^ self.source.0)
                .wrapping_mul(hash_constants::SEP)
                .wrapping_add(self.target.0),
        )
    }
}

impl fmt::Debug for TypePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypePair({} -> {})", self.source, self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_hash_determinism() {
        let hash1 = TypeHash::from_name("app::Person");
        let hash2 = TypeHash::from_name("app::Person");
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn type_hash_uniqueness() {
        let a = TypeHash::from_name("app::dto::Person");
        let b = TypeHash::from_name("app::view::Person");
        let c = TypeHash::from_name("i32");
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    #[test]
    fn sequence_hash_depends_on_container_and_element() {
        let vec = TypeHash::from_name("Vec");
        let deque = TypeHash::from_name("VecDeque");
        let int = TypeHash::from_name("i32");
        let string = TypeHash::from_name("String");

        assert_ne!(
            TypeHash::from_sequence(vec, int),
            TypeHash::from_sequence(vec, string)
        );
        assert_ne!(
            TypeHash::from_sequence(vec, int),
            TypeHash::from_sequence(deque, int)
        );
        assert_eq!(
            TypeHash::from_sequence(vec, int),
            TypeHash::from_sequence(vec, int)
        );
    }

    #[test]
    fn pair_order_matters() {
        let a = TypeHash::from_name("A");
        let b = TypeHash::from_name("B");
        let forward = TypePair::new(a, b);
        let reverse = forward.reversed();

        assert_ne!(forward, reverse);
        assert_ne!(forward.combined(), reverse.combined());
        assert_eq!(reverse.reversed(), forward);
    }

    #[test]
    fn empty_hash() {
        assert!(TypeHash::EMPTY.is_empty());
        assert!(!TypeHash::from_name("A").is_empty());
    }

    #[test]
    fn display_and_debug() {
        let hash = TypeHash(0x10);
        assert_eq!(hash.to_string(), "0x0000000000000010");
        assert_eq!(format!("{:?}", hash), "TypeHash(0x0000000000000010)");
    }
}
