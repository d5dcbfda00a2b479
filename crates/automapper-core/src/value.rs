//! Runtime value type passed between field accessors, converters and bindings.

use std::any::Any;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use uuid::Uuid;

use crate::{ConversionError, Mappable, TypeHash};

/// A dynamic field value.
///
/// Signed and narrow unsigned integers are carried as `Int(i64)`, `u64` as
/// `UInt(u64)`, and both float widths as `Float(f64)`. Bounds are checked again when the
/// value is written to a field through [`FromValue`](crate::FromValue).
///
/// Note: `Value` does not implement `Clone` because object values may not be
/// cloneable.
pub enum Value {
    Bool(bool),
    Char(char),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Timestamp(DateTime<Utc>),
    TimeSpan(TimeDelta),
    Uuid(Uuid),
    /// Elements of any recognized sequence container, in order.
    Seq(Vec<Value>),
    /// An instance of a mappable type.
    Object(ObjectValue),
}

impl Value {
    /// Get a human-readable name for this value's type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Char(_) => "char",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::DateTime(_) => "datetime",
            Value::Timestamp(_) => "timestamp",
            Value::TimeSpan(_) => "timespan",
            Value::Uuid(_) => "uuid",
            Value::Seq(_) => "sequence",
            Value::Object(obj) => obj.type_name(),
        }
    }

    /// Check if this value is an object.
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Clone the value if it doesn't contain an object.
    ///
    /// Returns `None` for objects (and sequences holding objects).
    pub fn clone_if_possible(&self) -> Option<Self> {
        match self {
            Value::Bool(v) => Some(Value::Bool(*v)),
            Value::Char(v) => Some(Value::Char(*v)),
            Value::Int(v) => Some(Value::Int(*v)),
            Value::UInt(v) => Some(Value::UInt(*v)),
            Value::Float(v) => Some(Value::Float(*v)),
            Value::String(s) => Some(Value::String(s.clone())),
            Value::Date(d) => Some(Value::Date(*d)),
            Value::DateTime(d) => Some(Value::DateTime(*d)),
            Value::Timestamp(t) => Some(Value::Timestamp(*t)),
            Value::TimeSpan(t) => Some(Value::TimeSpan(*t)),
            Value::Uuid(u) => Some(Value::Uuid(*u)),
            Value::Seq(items) => items
                .iter()
                .map(Value::clone_if_possible)
                .collect::<Option<Vec<_>>>()
                .map(Value::Seq),
            Value::Object(_) => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "Bool({})", v),
            Value::Char(v) => write!(f, "Char({:?})", v),
            Value::Int(v) => write!(f, "Int({})", v),
            Value::UInt(v) => write!(f, "UInt({})", v),
            Value::Float(v) => write!(f, "Float({})", v),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::Date(d) => write!(f, "Date({})", d),
            Value::DateTime(d) => write!(f, "DateTime({})", d),
            Value::Timestamp(t) => write!(f, "Timestamp({})", t),
            Value::TimeSpan(t) => write!(f, "TimeSpan({})", t),
            Value::Uuid(u) => write!(f, "Uuid({})", u),
            Value::Seq(items) => f.debug_list().entries(items).finish(),
            Value::Object(obj) => write!(f, "Object({})", obj.type_name()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::TimeSpan(a), Value::TimeSpan(b)) => a == b,
            (Value::Uuid(a), Value::Uuid(b)) => a == b,
            (Value::Seq(a), Value::Seq(b)) => a == b,
            // Objects can't be compared for equality
            (Value::Object(_), Value::Object(_)) => false,
            _ => false,
        }
    }
}

/// A type-erased instance of a mappable type.
pub struct ObjectValue {
    type_hash: TypeHash,
    type_name: &'static str,
    inner: Box<dyn Any + Send + Sync>,
}

impl ObjectValue {
    /// Wrap a mappable value.
    pub fn new<T: Mappable>(value: T) -> Self {
        Self {
            type_hash: T::type_hash(),
            type_name: T::type_name(),
            inner: Box::new(value),
        }
    }

    /// Wrap an already boxed instance, e.g. one produced by a compiled mapper.
    pub fn from_boxed(
        type_hash: TypeHash,
        type_name: &'static str,
        inner: Box<dyn Any + Send + Sync>,
    ) -> Self {
        Self {
            type_hash,
            type_name,
            inner,
        }
    }

    pub fn type_hash(&self) -> TypeHash {
        self.type_hash
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Borrow the instance.
    pub fn as_any(&self) -> &dyn Any {
        &*self.inner
    }

    /// Check the runtime type.
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Recover the concrete value.
    pub fn downcast<T: Mappable>(self) -> Result<T, ConversionError> {
        let actual = self.type_name;
        self.inner
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| ConversionError::TypeMismatch {
                expected: T::type_name(),
                actual,
            })
    }
}

impl fmt::Debug for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectValue")
            .field("type_name", &self.type_name)
            .field("type_hash", &self.type_hash)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names() {
        assert_eq!(Value::Int(1).type_name(), "int");
        assert_eq!(Value::UInt(1).type_name(), "uint");
        assert_eq!(Value::Float(1.0).type_name(), "float");
        assert_eq!(Value::String(String::new()).type_name(), "string");
        assert_eq!(Value::Seq(vec![]).type_name(), "sequence");
    }

    #[test]
    fn scalar_equality() {
        assert_eq!(Value::Int(3), Value::Int(3));
        assert_ne!(Value::Int(3), Value::Float(3.0));
        assert_ne!(Value::Int(3), Value::UInt(3));
        assert_eq!(
            Value::Seq(vec![Value::Bool(true), Value::Char('x')]),
            Value::Seq(vec![Value::Bool(true), Value::Char('x')])
        );
    }

    #[test]
    fn clone_if_possible_scalars_and_sequences() {
        let value = Value::Seq(vec![Value::Int(1), Value::String("a".into())]);
        assert_eq!(value.clone_if_possible(), Some(value));
    }

    #[test]
    fn debug_formatting() {
        assert_eq!(format!("{:?}", Value::Int(5)), "Int(5)");
        assert_eq!(
            format!("{:?}", Value::Seq(vec![Value::Bool(false)])),
            "[Bool(false)]"
        );
    }
}
