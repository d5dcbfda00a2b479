//! Field introspection.
//!
//! Produces the mappable field list of a type from its [`TypeMeta`]. A field
//! takes part in mapping only if it is both readable and writable; declaration
//! order is preserved.

use crate::{FieldGetter, FieldMeta, FieldSetter, TypeDescriptor, TypeMeta};

/// A field as seen by the binding resolver.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Mapping name.
    pub name: &'static str,
    /// Declared type.
    pub ty: TypeDescriptor,
    pub readable: bool,
    pub writable: bool,
    /// Excluded from mapping as a source by attribute.
    pub ignored: bool,
    pub get: FieldGetter,
    pub set: FieldSetter,
}

impl FieldDescriptor {
    pub fn from_meta(meta: &FieldMeta) -> Self {
        Self {
            name: meta.name,
            ty: (meta.ty)(),
            readable: meta.is_readable(),
            writable: meta.is_writable(),
            ignored: meta.is_ignored(),
            get: meta.get,
            set: meta.set,
        }
    }
}

/// Fields that are both readable and writable, in declaration order.
pub fn fields(meta: &TypeMeta) -> Vec<FieldDescriptor> {
    meta.fields
        .iter()
        .filter(|f| f.is_readable() && f.is_writable())
        .map(FieldDescriptor::from_meta)
        .collect()
}

/// Find a field by mapping name.
pub fn find_field<'a>(fields: &'a [FieldDescriptor], name: &str) -> Option<&'a FieldDescriptor> {
    fields.iter().find(|f| f.name == name)
}
