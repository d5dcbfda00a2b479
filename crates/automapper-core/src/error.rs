//! Error types for the mapping engine.
//!
//! ## Error Hierarchy
//!
//! ```text
//! MapError (engine-level)
//! ├── Construction        - target type has no zero-argument constructor
//! ├── Conversion          - a binding failed while executing (wraps ConversionError)
//! ├── UnresolvedOverride  - strict mode only
//! ├── SourceTypeMismatch  - type-erased entry point got the wrong runtime type
//! ├── TargetTypeMismatch  - a typed call asked for a target the mapper does not produce
//! ├── NullSource          - an absent source was passed to `map_option`
//! └── UnknownPair         - a nested lookup for a pair with no registered types
//! ```
//!
//! `ConversionError` belongs to the value layer. It is raised by
//! [`FromValue`](crate::FromValue), scalar conversion and converters, and gets
//! wrapped with field context once it crosses a binding.

use thiserror::Error;

/// Errors that can occur when converting between Rust values and [`Value`](crate::Value)s.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// Type mismatch during conversion.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// Integer does not fit in the target type.
    #[error("integer overflow: value {value} does not fit in {target_type}")]
    IntegerOverflow { value: i128, target_type: &'static str },

    /// Float cannot be represented in the target type.
    #[error("float conversion error: value {value} cannot be represented as {target_type}")]
    FloatConversion {
        value: f64,
        target_type: &'static str,
    },

    /// A string could not be parsed into the target type.
    #[error("cannot parse '{input}' as {target_type}")]
    Parse {
        input: String,
        target_type: &'static str,
    },

    /// A converter was invoked with a value of a type it was not declared for.
    #[error("converter expects {expected} but the field is {actual}")]
    ConverterInput {
        expected: &'static str,
        actual: &'static str,
    },

    /// Generic conversion failure.
    #[error("conversion failed: {message}")]
    Failed { message: String },
}

impl ConversionError {
    /// Create a generic conversion failure.
    pub fn failed(message: impl Into<String>) -> Self {
        ConversionError::Failed {
            message: message.into(),
        }
    }
}

/// Errors raised by the mapping engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    /// The target type cannot be constructed without arguments.
    #[error("cannot construct {target}: type has no zero-argument constructor")]
    Construction { target: &'static str },

    /// A binding failed while the mapper was executing.
    #[error("error mapping {source_type} -> {target_type} at field '{field}': {source}")]
    Conversion {
        source_type: &'static str,
        target_type: &'static str,
        field: String,
        #[source]
        source: ConversionError,
    },

    /// A name override points at a target field that does not exist.
    #[error("override '{source_field}' -> '{target_field}' does not match any field of {target_type}")]
    UnresolvedOverride {
        target_type: &'static str,
        source_field: String,
        target_field: String,
    },

    /// The source value passed to a type-erased entry point has the wrong type.
    #[error("source type mismatch: expected {expected}")]
    SourceTypeMismatch { expected: &'static str },

    /// A mapper produced a value that is not of the requested target type.
    #[error("target type mismatch: mapper produces {produced}")]
    TargetTypeMismatch { produced: &'static str },

    /// An absent source value was passed to the engine.
    #[error("cannot map an absent source value to {target}")]
    NullSource { target: &'static str },

    /// A mapper was requested for a pair whose types are unknown to the engine.
    #[error("no type information registered for {pair:?}")]
    UnknownPair { pair: crate::TypePair },
}

impl MapError {
    /// Whether this error came from the value conversion layer.
    pub fn is_conversion(&self) -> bool {
        matches!(self, MapError::Conversion { .. })
    }

    /// Whether this error means the target type cannot be constructed.
    pub fn is_construction(&self) -> bool {
        matches!(self, MapError::Construction { .. })
    }
}
