//! Conversion traits and scalar conversion rules.
//!
//! This module provides:
//! - [`FromValue`]: extract a Rust value from a [`Value`]
//! - [`IntoValue`]: convert a Rust value into a [`Value`]
//! - [`convert_scalar`]: the implicit conversion between scalar kinds used by
//!   `ImplicitConvert` bindings, and [`is_implicitly_convertible`] which decides
//!   at compile time whether such a binding exists.
//!
//! ## Numeric narrowing
//!
//! Float to integer truncates toward zero (`98.5 -> 98`, `-1.9 -> -1`).
//! Results outside the target range are a [`ConversionError`], never wrapped.
//!
//! ## Example
//!
//! ```
//! use automapper_core::{convert_scalar, DateFormats, FromValue, IntoValue, ScalarKind, Value};
//!
//! let value = 98.5f64.into_value();
//! let converted = convert_scalar(value, ScalarKind::F64, ScalarKind::I32, &DateFormats::default())?;
//! assert_eq!(i32::from_value(converted)?, 98);
//! # Ok::<(), automapper_core::ConversionError>(())
//! ```

use std::collections::VecDeque;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use uuid::Uuid;

use crate::{ConversionError, ScalarKind, Value};

/// Extract a value from a [`Value`].
pub trait FromValue: Sized {
    /// Returns a `ConversionError` if the value holds an incompatible type.
    fn from_value(value: Value) -> Result<Self, ConversionError>;
}

/// Convert a value into a [`Value`].
pub trait IntoValue {
    fn into_value(self) -> Value;
}

/// Formats used when dates are converted to and from strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormats {
    /// `chrono` format for [`ScalarKind::Date`].
    pub date: String,
    /// `chrono` format for [`ScalarKind::DateTime`].
    pub datetime: String,
}

impl Default for DateFormats {
    fn default() -> Self {
        Self {
            date: "%d/%m/%Y".to_string(),
            datetime: "%d/%m/%Y %H:%M:%S".to_string(),
        }
    }
}

// ============================================================================
// Integer implementations
// ============================================================================

macro_rules! impl_value_int {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, ConversionError> {
                    match value {
                        Value::Int(v) => <$ty>::try_from(v).map_err(|_| {
                            ConversionError::IntegerOverflow {
                                value: v as i128,
                                target_type: stringify!($ty),
                            }
                        }),
                        Value::UInt(v) => <$ty>::try_from(v).map_err(|_| {
                            ConversionError::IntegerOverflow {
                                value: v as i128,
                                target_type: stringify!($ty),
                            }
                        }),
                        other => Err(ConversionError::TypeMismatch {
                            expected: "int",
                            actual: other.type_name(),
                        }),
                    }
                }
            }

            impl IntoValue for $ty {
                fn into_value(self) -> Value {
                    Value::Int(self as i64)
                }
            }
        )*
    };
}

impl_value_int!(i8, i16, i32, i64, u8, u16, u32);

impl FromValue for u64 {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::UInt(v) => Ok(v),
            Value::Int(v) => u64::try_from(v).map_err(|_| ConversionError::IntegerOverflow {
                value: v as i128,
                target_type: "u64",
            }),
            other => Err(ConversionError::TypeMismatch {
                expected: "int",
                actual: other.type_name(),
            }),
        }
    }
}

impl IntoValue for u64 {
    fn into_value(self) -> Value {
        Value::UInt(self)
    }
}

// ============================================================================
// Float implementations
// ============================================================================

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Float(v) => {
                if !v.is_finite() || (v <= f32::MAX as f64 && v >= f32::MIN as f64) {
                    Ok(v as f32)
                } else {
                    Err(ConversionError::FloatConversion {
                        value: v,
                        target_type: "f32",
                    })
                }
            }
            Value::Int(v) => Ok(v as f32),
            Value::UInt(v) => Ok(v as f32),
            other => Err(ConversionError::TypeMismatch {
                expected: "float",
                actual: other.type_name(),
            }),
        }
    }
}

impl IntoValue for f32 {
    fn into_value(self) -> Value {
        Value::Float(self as f64)
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Float(v) => Ok(v),
            Value::Int(v) => Ok(v as f64),
            Value::UInt(v) => Ok(v as f64),
            other => Err(ConversionError::TypeMismatch {
                expected: "float",
                actual: other.type_name(),
            }),
        }
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

// ============================================================================
// Other scalars
// ============================================================================

macro_rules! impl_value_scalar {
    ($($ty:ty => $variant:ident, $expected:literal);* $(;)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, ConversionError> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(ConversionError::TypeMismatch {
                            expected: $expected,
                            actual: other.type_name(),
                        }),
                    }
                }
            }

            impl IntoValue for $ty {
                fn into_value(self) -> Value {
                    Value::$variant(self)
                }
            }
        )*
    };
}

impl_value_scalar! {
    bool => Bool, "bool";
    char => Char, "char";
    String => String, "string";
    NaiveDate => Date, "date";
    NaiveDateTime => DateTime, "datetime";
    DateTime<Utc> => Timestamp, "timestamp";
    TimeDelta => TimeSpan, "timespan";
    Uuid => Uuid, "uuid";
}

// ============================================================================
// Sequences
// ============================================================================

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Seq(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(ConversionError::TypeMismatch {
                expected: "sequence",
                actual: other.type_name(),
            }),
        }
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::Seq(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: FromValue> FromValue for VecDeque<T> {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Seq(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(ConversionError::TypeMismatch {
                expected: "sequence",
                actual: other.type_name(),
            }),
        }
    }
}

impl<T: IntoValue> IntoValue for VecDeque<T> {
    fn into_value(self) -> Value {
        Value::Seq(self.into_iter().map(IntoValue::into_value).collect())
    }
}

// ============================================================================
// Implicit scalar conversion
// ============================================================================

/// Whether an `ImplicitConvert` binding exists from `from` to `to`.
///
/// Identical kinds are not "convertible": they are handled by direct copy.
pub fn is_implicitly_convertible(from: ScalarKind, to: ScalarKind) -> bool {
    if from == to {
        return false;
    }
    let numeric_like = |k: ScalarKind| k.is_numeric() || k == ScalarKind::Bool;
    match (from, to) {
        (f, t) if numeric_like(f) && numeric_like(t) => true,
        (f, ScalarKind::String) => f.is_value_type(),
        (f, t) if f.is_temporal() && t.is_temporal() => true,
        (ScalarKind::String, ScalarKind::Date | ScalarKind::DateTime) => true,
        _ => false,
    }
}

/// Intermediate numeric representation wide enough for every integer kind.
enum Number {
    Int(i128),
    Float(f64),
}

fn to_number(value: Value) -> Result<Number, ConversionError> {
    match value {
        Value::Int(v) => Ok(Number::Int(v as i128)),
        Value::UInt(v) => Ok(Number::Int(v as i128)),
        Value::Float(v) => Ok(Number::Float(v)),
        Value::Bool(b) => Ok(Number::Int(b as i128)),
        other => Err(ConversionError::TypeMismatch {
            expected: "number",
            actual: other.type_name(),
        }),
    }
}

fn number_to_kind(number: Number, to: ScalarKind) -> Result<Value, ConversionError> {
    if to == ScalarKind::Bool {
        return Ok(Value::Bool(match number {
            Number::Int(n) => n != 0,
            Number::Float(f) => f != 0.0,
        }));
    }
    if to.is_float() {
        return Ok(Value::Float(match number {
            Number::Int(n) => n as f64,
            Number::Float(f) => f,
        }));
    }

    let (min, max) = to
        .integer_bounds()
        .ok_or(ConversionError::TypeMismatch {
            expected: to.name(),
            actual: "number",
        })?;
    let n = match number {
        Number::Int(n) => n,
        Number::Float(f) => {
            let truncated = f.trunc();
            if !truncated.is_finite() || truncated < min as f64 || truncated > max as f64 {
                return Err(ConversionError::FloatConversion {
                    value: f,
                    target_type: to.name(),
                });
            }
            truncated as i128
        }
    };
    if n < min || n > max {
        return Err(ConversionError::IntegerOverflow {
            value: n,
            target_type: to.name(),
        });
    }
    if to == ScalarKind::U64 {
        Ok(Value::UInt(n as u64))
    } else {
        Ok(Value::Int(n as i64))
    }
}

fn render(value: Value, from: ScalarKind, formats: &DateFormats) -> Result<String, ConversionError> {
    Ok(match value {
        Value::Bool(b) => b.to_string(),
        Value::Char(c) => c.to_string(),
        Value::Int(v) => v.to_string(),
        Value::UInt(v) => v.to_string(),
        Value::Float(v) if from == ScalarKind::F32 => (v as f32).to_string(),
        Value::Float(v) => v.to_string(),
        Value::String(s) => s,
        Value::Date(d) => d.format(&formats.date).to_string(),
        Value::DateTime(d) => d.format(&formats.datetime).to_string(),
        Value::Timestamp(t) => t.to_rfc3339(),
        Value::TimeSpan(t) => t.to_string(),
        Value::Uuid(u) => u.hyphenated().to_string(),
        other => {
            return Err(ConversionError::TypeMismatch {
                expected: "scalar",
                actual: other.type_name(),
            });
        }
    })
}

fn parse_date(input: String, formats: &DateFormats) -> Result<Value, ConversionError> {
    NaiveDate::parse_from_str(&input, &formats.date)
        .or_else(|_| input.parse::<NaiveDate>())
        .map(Value::Date)
        .map_err(|_| ConversionError::Parse {
            input,
            target_type: "date",
        })
}

fn parse_datetime(input: String, formats: &DateFormats) -> Result<Value, ConversionError> {
    NaiveDateTime::parse_from_str(&input, &formats.datetime)
        .or_else(|_| input.parse::<NaiveDateTime>())
        .map(Value::DateTime)
        .map_err(|_| ConversionError::Parse {
            input,
            target_type: "datetime",
        })
}

fn convert_temporal(value: Value, to: ScalarKind) -> Result<Value, ConversionError> {
    let datetime = match value {
        Value::Date(d) => d.and_time(NaiveTime::MIN),
        Value::DateTime(d) => d,
        Value::Timestamp(t) => t.naive_utc(),
        other => {
            return Err(ConversionError::TypeMismatch {
                expected: "date",
                actual: other.type_name(),
            });
        }
    };
    match to {
        ScalarKind::Date => Ok(Value::Date(datetime.date())),
        ScalarKind::DateTime => Ok(Value::DateTime(datetime)),
        ScalarKind::Timestamp => Ok(Value::Timestamp(datetime.and_utc())),
        other => Err(ConversionError::TypeMismatch {
            expected: other.name(),
            actual: "date",
        }),
    }
}

/// Convert a scalar value from one kind to another.
pub fn convert_scalar(
    value: Value,
    from: ScalarKind,
    to: ScalarKind,
    formats: &DateFormats,
) -> Result<Value, ConversionError> {
    if from == to {
        return Ok(value);
    }
    match to {
        ScalarKind::String => render(value, from, formats).map(Value::String),
        ScalarKind::Date if from == ScalarKind::String => match value {
            Value::String(s) => parse_date(s, formats),
            other => Err(ConversionError::TypeMismatch {
                expected: "string",
                actual: other.type_name(),
            }),
        },
        ScalarKind::DateTime if from == ScalarKind::String => match value {
            Value::String(s) => parse_datetime(s, formats),
            other => Err(ConversionError::TypeMismatch {
                expected: "string",
                actual: other.type_name(),
            }),
        },
        t if t.is_temporal() && from.is_temporal() => convert_temporal(value, t),
        t if t.is_numeric() || t == ScalarKind::Bool => number_to_kind(to_number(value)?, t),
        t => Err(ConversionError::TypeMismatch {
            expected: t.name(),
            actual: value.type_name(),
        }),
    }
}
