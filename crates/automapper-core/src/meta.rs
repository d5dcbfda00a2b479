//! Static type and field metadata.
//!
//! Every mappable type carries an explicit field-descriptor table instead of
//! relying on runtime reflection. The table is normally generated by
//! `#[derive(Mappable)]`, but can be written by hand:
//!
//! ```
//! use automapper_core::{FieldMeta, FromValue, IntoValue, Reflect, TypeHash, TypeMeta};
//!
//! #[derive(Default, Clone)]
//! struct Point { x: i32 }
//!
//! fn point_meta() -> TypeMeta {
//!     TypeMeta::new("Point", "demo::Point")
//!         .with_constructor(|| Box::new(Point::default()))
//!         .with_field(FieldMeta::new(
//!             "x",
//!             <i32 as Reflect>::descriptor,
//!             |obj| obj.downcast_ref::<Point>().map(|p| p.x.into_value()),
//!             |obj, value| {
//!                 if let Some(p) = obj.downcast_mut::<Point>() {
//!                     p.x = i32::from_value(value)?;
//!                 }
//!                 Ok(())
//!             },
//!         ))
//! }
//!
//! let meta = point_meta();
//! assert_eq!(meta.fields.len(), 1);
//! assert_eq!(meta.type_hash, TypeHash::from_name("demo::Point"));
//! ```

use std::any::Any;
use std::fmt;

use bitflags::bitflags;

use crate::{Converter, ConversionError, TypeHash, Value};

/// Constructs a default instance of a type, boxed and type-erased.
pub type Constructor = fn() -> Box<dyn Any + Send + Sync>;

/// Reads a field from a type-erased instance.
///
/// Returns `None` when the instance is not of the owning type.
pub type FieldGetter = fn(&dyn Any) -> Option<Value>;

/// Tests whether a type-erased value is an instance of the owning type.
pub type InstanceCheck = fn(&dyn Any) -> bool;

/// Writes a field on a type-erased instance.
pub type FieldSetter = fn(&mut dyn Any, Value) -> Result<(), ConversionError>;

/// Scalar ("simple") value kinds.
///
/// Scalars are never mapped recursively: they are copied or converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
    /// Calendar date (`chrono::NaiveDate`).
    Date,
    /// Date and time without zone (`chrono::NaiveDateTime`).
    DateTime,
    /// UTC instant (`chrono::DateTime<Utc>`).
    Timestamp,
    /// Signed duration (`chrono::TimeDelta`).
    TimeSpan,
    /// `uuid::Uuid`.
    Uuid,
}

impl ScalarKind {
    /// Get the name of this scalar kind.
    pub const fn name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Char => "char",
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
            ScalarKind::String => "String",
            ScalarKind::Date => "date",
            ScalarKind::DateTime => "datetime",
            ScalarKind::Timestamp => "timestamp",
            ScalarKind::TimeSpan => "timespan",
            ScalarKind::Uuid => "uuid",
        }
    }

    /// Integer kinds.
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            ScalarKind::I8
                | ScalarKind::I16
                | ScalarKind::I32
                | ScalarKind::I64
                | ScalarKind::U8
                | ScalarKind::U16
                | ScalarKind::U32
                | ScalarKind::U64
        )
    }

    /// Floating point kinds.
    pub const fn is_float(self) -> bool {
        matches!(self, ScalarKind::F32 | ScalarKind::F64)
    }

    /// Integer or floating point.
    pub const fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// Date-like kinds that convert between each other.
    pub const fn is_temporal(self) -> bool {
        matches!(
            self,
            ScalarKind::Date | ScalarKind::DateTime | ScalarKind::Timestamp
        )
    }

    /// Value types, in the sense of the implicit conversion rule.
    ///
    /// Everything except `String` qualifies.
    pub const fn is_value_type(self) -> bool {
        !matches!(self, ScalarKind::String)
    }

    /// Inclusive integer range for integer kinds.
    pub const fn integer_bounds(self) -> Option<(i128, i128)> {
        match self {
            ScalarKind::I8 => Some((i8::MIN as i128, i8::MAX as i128)),
            ScalarKind::I16 => Some((i16::MIN as i128, i16::MAX as i128)),
            ScalarKind::I32 => Some((i32::MIN as i128, i32::MAX as i128)),
            ScalarKind::I64 => Some((i64::MIN as i128, i64::MAX as i128)),
            ScalarKind::U8 => Some((0, u8::MAX as i128)),
            ScalarKind::U16 => Some((0, u16::MAX as i128)),
            ScalarKind::U32 => Some((0, u32::MAX as i128)),
            ScalarKind::U64 => Some((0, u64::MAX as i128)),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Recognized homogeneous ordered containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceKind {
    Vec,
    VecDeque,
}

impl SequenceKind {
    /// Get the container name.
    pub const fn name(self) -> &'static str {
        match self {
            SequenceKind::Vec => "Vec",
            SequenceKind::VecDeque => "VecDeque",
        }
    }

    /// Hash of the unparameterized container.
    pub fn container_hash(self) -> TypeHash {
        TypeHash::from_name(self.name())
    }
}

/// Structural shape of a type, as seen by the binding resolver.
#[derive(Debug, Clone, Copy)]
pub enum TypeShape {
    /// A simple value that is copied or converted.
    Scalar(ScalarKind),
    /// A sequence container; the element descriptor is resolved lazily so that
    /// self-referential types terminate.
    Sequence {
        container: SequenceKind,
        element: fn() -> TypeDescriptor,
    },
    /// A type with its own field table, mapped recursively.
    Object { meta: fn() -> TypeMeta },
}

/// Descriptor of a field's declared type.
#[derive(Debug, Clone, Copy)]
pub struct TypeDescriptor {
    /// Type identity.
    pub type_hash: TypeHash,
    /// Human-readable type name.
    pub type_name: &'static str,
    /// Structural shape.
    pub shape: TypeShape,
}

impl TypeDescriptor {
    /// The scalar kind, if this is a scalar.
    pub fn scalar(&self) -> Option<ScalarKind> {
        match self.shape {
            TypeShape::Scalar(kind) => Some(kind),
            _ => None,
        }
    }

    /// The element descriptor, if this is a sequence.
    pub fn element(&self) -> Option<TypeDescriptor> {
        match self.shape {
            TypeShape::Sequence { element, .. } => Some(element()),
            _ => None,
        }
    }

    /// The metadata function, if this is an object.
    pub fn object_meta(&self) -> Option<fn() -> TypeMeta> {
        match self.shape {
            TypeShape::Object { meta } => Some(meta),
            _ => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.shape, TypeShape::Scalar(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self.shape, TypeShape::Sequence { .. })
    }

    pub fn is_object(&self) -> bool {
        matches!(self.shape, TypeShape::Object { .. })
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.type_hash == other.type_hash
    }
}

impl Eq for TypeDescriptor {}

bitflags! {
    /// Field exposure and mapping flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FieldFlags: u8 {
        /// Field can be read from a source instance.
        const READ = 0b0001;
        /// Field can be written on a target instance.
        const WRITE = 0b0010;
        /// Field is never mapped as a source.
        const IGNORE = 0b0100;
        /// Read and write.
        const READ_WRITE = Self::READ.bits() | Self::WRITE.bits();
    }
}

/// Metadata for one field of a mappable type.
#[derive(Clone)]
pub struct FieldMeta {
    /// Mapping name of the field.
    pub name: &'static str,
    /// Declared type, resolved lazily.
    pub ty: fn() -> TypeDescriptor,
    /// Exposure flags.
    pub flags: FieldFlags,
    /// Field reader.
    pub get: FieldGetter,
    /// Field writer.
    pub set: FieldSetter,
    /// Attribute-declared rename (`map_to`).
    pub map_to: Option<&'static str>,
    /// Attribute-declared converter.
    pub converter: Option<fn() -> Converter>,
}

impl FieldMeta {
    /// Create a read/write field.
    pub fn new(
        name: &'static str,
        ty: fn() -> TypeDescriptor,
        get: FieldGetter,
        set: FieldSetter,
    ) -> Self {
        Self {
            name,
            ty,
            flags: FieldFlags::READ_WRITE,
            get,
            set,
            map_to: None,
            converter: None,
        }
    }

    // === Builder Methods ===

    /// Replace the exposure flags.
    pub fn with_flags(mut self, flags: FieldFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Mark the field as ignored when used as a source.
    pub fn ignored(mut self) -> Self {
        self.flags |= FieldFlags::IGNORE;
        self
    }

    /// Declare a rename for this field.
    pub fn with_map_to(mut self, name: &'static str) -> Self {
        self.map_to = Some(name);
        self
    }

    /// Declare a converter for this field.
    pub fn with_converter(mut self, converter: fn() -> Converter) -> Self {
        self.converter = Some(converter);
        self
    }

    // === Queries ===

    pub fn is_readable(&self) -> bool {
        self.flags.contains(FieldFlags::READ)
    }

    pub fn is_writable(&self) -> bool {
        self.flags.contains(FieldFlags::WRITE)
    }

    pub fn is_ignored(&self) -> bool {
        self.flags.contains(FieldFlags::IGNORE)
    }
}

impl fmt::Debug for FieldMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldMeta")
            .field("name", &self.name)
            .field("type", &(self.ty)().type_name)
            .field("flags", &self.flags)
            .field("map_to", &self.map_to)
            .field("converter", &self.converter.is_some())
            .finish()
    }
}

/// Metadata for a mappable type.
#[derive(Clone)]
pub struct TypeMeta {
    /// Short display name.
    pub name: &'static str,
    /// Fully qualified path, the input of the type hash.
    pub path: &'static str,
    /// Type identity.
    pub type_hash: TypeHash,
    /// Fields in declaration order.
    pub fields: Vec<FieldMeta>,
    /// Zero-argument constructor. `None` means the type cannot be a target.
    pub constructor: Option<Constructor>,
    /// Runtime type test run before a mapper touches its input.
    pub instance_check: Option<InstanceCheck>,
}

impl TypeMeta {
    /// Create metadata with no fields and no constructor.
    pub fn new(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            path,
            type_hash: TypeHash::from_name(path),
            fields: Vec::new(),
            constructor: None,
            instance_check: None,
        }
    }

    /// Add a field.
    pub fn with_field(mut self, field: FieldMeta) -> Self {
        self.fields.push(field);
        self
    }

    /// Set the zero-argument constructor.
    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructor = Some(constructor);
        self
    }

    /// Set the runtime type test.
    pub fn with_instance_check(mut self, check: InstanceCheck) -> Self {
        self.instance_check = Some(check);
        self
    }

    /// Whether `value` is an instance of this type.
    ///
    /// Metadata without a check accepts everything; field getters still
    /// reject foreign instances one field at a time.
    pub fn is_instance(&self, value: &dyn Any) -> bool {
        self.instance_check.is_none_or(|check| check(value))
    }

    /// Find a field by mapping name.
    pub fn field(&self, name: &str) -> Option<&FieldMeta> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Construct a default instance, if the type allows it.
    pub fn construct(&self) -> Option<Box<dyn Any + Send + Sync>> {
        self.constructor.map(|ctor| ctor())
    }
}

impl fmt::Debug for TypeMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMeta")
            .field("name", &self.name)
            .field("type_hash", &self.type_hash)
            .field("fields", &self.fields)
            .field("constructible", &self.constructor.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FromValue, IntoValue, Reflect};

    #[derive(Default, Clone)]
    struct Sample {
        id: i64,
    }

    fn id_field() -> FieldMeta {
        FieldMeta::new(
            "id",
            <i64 as Reflect>::descriptor,
            |obj| obj.downcast_ref::<Sample>().map(|s| s.id.into_value()),
            |obj, value| {
                if let Some(s) = obj.downcast_mut::<Sample>() {
                    s.id = i64::from_value(value)?;
                }
                Ok(())
            },
        )
    }

    #[test]
    fn scalar_kind_classification() {
        assert!(ScalarKind::I32.is_integer());
        assert!(ScalarKind::F64.is_float());
        assert!(ScalarKind::U8.is_numeric());
        assert!(!ScalarKind::String.is_numeric());
        assert!(!ScalarKind::String.is_value_type());
        assert!(ScalarKind::Date.is_temporal());
        assert!(!ScalarKind::TimeSpan.is_temporal());
        assert_eq!(ScalarKind::U8.integer_bounds(), Some((0, 255)));
        assert_eq!(ScalarKind::F32.integer_bounds(), None);
    }

    #[test]
    fn field_flags_builders() {
        let field = id_field();
        assert!(field.is_readable());
        assert!(field.is_writable());
        assert!(!field.is_ignored());

        let field = id_field().with_flags(FieldFlags::READ).ignored();
        assert!(field.is_readable());
        assert!(!field.is_writable());
        assert!(field.is_ignored());
    }

    #[test]
    fn type_meta_accessors() {
        let meta = TypeMeta::new("Sample", "tests::Sample")
            .with_constructor(|| Box::new(Sample::default()))
            .with_field(id_field().with_map_to("identifier"));

        assert_eq!(meta.type_hash, TypeHash::from_name("tests::Sample"));
        assert_eq!(meta.field("id").and_then(|f| f.map_to), Some("identifier"));
        assert!(meta.field("missing").is_none());

        let mut instance = meta.construct().expect("constructible");
        let field = meta.field("id").expect("id field");
        (field.set)(&mut *instance, Value::Int(9)).expect("set");
        assert_eq!((field.get)(&*instance), Some(Value::Int(9)));
    }

    #[test]
    fn instance_check() {
        let unchecked = TypeMeta::new("Sample", "tests::Sample");
        assert!(unchecked.is_instance(&"anything"));

        let checked = unchecked.with_instance_check(|obj| obj.is::<Sample>());
        assert!(checked.is_instance(&Sample::default()));
        assert!(!checked.is_instance(&"anything"));
    }

    #[test]
    fn type_meta_without_constructor() {
        let meta = TypeMeta::new("Sample", "tests::Sample");
        assert!(meta.construct().is_none());
    }

    #[test]
    fn descriptor_equality_is_by_hash() {
        assert_eq!(i32::descriptor(), i32::descriptor());
        assert_ne!(i32::descriptor(), i64::descriptor());
        assert!(i32::descriptor().is_scalar());
        assert!(Vec::<i32>::descriptor().is_sequence());
        assert_eq!(
            Vec::<i32>::descriptor().element().map(|e| e.type_hash),
            Some(i32::type_hash())
        );
    }
}
