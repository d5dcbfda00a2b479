//! User-supplied value transformations.
//!
//! A [`Converter`] is a typed function erased to `Value -> Value`, tagged with
//! its declared input and output types. The input tag is checked against the
//! source field's type every time the converter runs; the output is checked by
//! the target field's setter.

use std::fmt;
use std::sync::Arc;

use crate::{ConversionError, FromValue, IntoValue, Reflect, TypeDescriptor, TypeHash, Value};

/// Identity of a converter's input or output type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeTag {
    pub type_hash: TypeHash,
    pub type_name: &'static str,
}

impl TypeTag {
    /// Tag for a reflected type.
    pub fn of<T: Reflect>() -> Self {
        let desc = T::descriptor();
        Self {
            type_hash: desc.type_hash,
            type_name: desc.type_name,
        }
    }
}

impl From<TypeDescriptor> for TypeTag {
    fn from(desc: TypeDescriptor) -> Self {
        Self {
            type_hash: desc.type_hash,
            type_name: desc.type_name,
        }
    }
}

type ConvertFn = dyn Fn(Value) -> Result<Value, ConversionError> + Send + Sync;

/// A shared, thread-safe value transformation.
#[derive(Clone)]
pub struct Converter {
    input: TypeTag,
    output: TypeTag,
    func: Arc<ConvertFn>,
}

impl Converter {
    /// Wrap an infallible function.
    ///
    /// ```
    /// use automapper_core::{Converter, IntoValue, Value};
    ///
    /// let upper = Converter::new(|s: String| s.to_uppercase());
    /// assert_eq!(upper.apply("abc".to_string().into_value())?, Value::String("ABC".into()));
    /// # Ok::<(), automapper_core::ConversionError>(())
    /// ```
    pub fn new<I, O, F>(f: F) -> Self
    where
        I: Reflect + FromValue,
        O: Reflect + IntoValue,
        F: Fn(I) -> O + Send + Sync + 'static,
    {
        Self {
            input: TypeTag::of::<I>(),
            output: TypeTag::of::<O>(),
            func: Arc::new(move |value| Ok(f(I::from_value(value)?).into_value())),
        }
    }

    /// Wrap a fallible function.
    pub fn try_new<I, O, F>(f: F) -> Self
    where
        I: Reflect + FromValue,
        O: Reflect + IntoValue,
        F: Fn(I) -> Result<O, ConversionError> + Send + Sync + 'static,
    {
        Self {
            input: TypeTag::of::<I>(),
            output: TypeTag::of::<O>(),
            func: Arc::new(move |value| f(I::from_value(value)?).map(IntoValue::into_value)),
        }
    }

    /// Declared input type.
    pub fn input(&self) -> TypeTag {
        self.input
    }

    /// Declared output type.
    pub fn output(&self) -> TypeTag {
        self.output
    }

    /// Whether this converter is declared for values of `ty`.
    pub fn accepts(&self, ty: TypeHash) -> bool {
        self.input.type_hash == ty
    }

    /// Run the converter without checking the declared input type.
    pub fn apply(&self, value: Value) -> Result<Value, ConversionError> {
        (self.func)(value)
    }

    /// Run the converter on a value read from a field of type `source`.
    pub fn apply_checked(
        &self,
        source: &TypeDescriptor,
        value: Value,
    ) -> Result<Value, ConversionError> {
        if !self.accepts(source.type_hash) {
            return Err(ConversionError::ConverterInput {
                expected: self.input.type_name,
                actual: source.type_name,
            });
        }
        self.apply(value)
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Converter({} -> {})",
            self.input.type_name, self.output.type_name
        )
    }
}
