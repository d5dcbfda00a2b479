//! Binding resolution.
//!
//! For every readable+writable source field the resolver picks a target field
//! and then a binding kind.
//!
//! ## Target field
//!
//! 1. Ignored source fields are skipped.
//! 2. A name override must name an existing target field. If it does not, the
//!    source field is skipped; there is no fallback to same-name matching.
//! 3. Otherwise a target field with the same name is used.
//!
//! ## Binding kind (first match wins)
//!
//! 1. Custom converter registered for the source field
//! 2. Nested map: identical object types
//! 3. Collection map: both sides are sequences with an element plan
//! 4. Implicit conversion between different scalar kinds
//! 5. Direct copy: identical types
//!
//! Anything else is skipped and the target keeps its default.

use std::fmt;

use tracing::{trace, warn};

use automapper_core::introspect::{self, find_field};
use automapper_core::{
    Converter, FieldDescriptor, MapError, PairRef, ScalarKind, TypeDescriptor, TypeMeta,
    TypePair, TypeShape, is_implicitly_convertible,
};
use automapper_registry::MappingConfig;

/// What to do when a name override names a missing target field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnresolvedOverridePolicy {
    /// Skip the source field.
    #[default]
    Skip,
    /// Fail the build with [`MapError::UnresolvedOverride`].
    Fail,
}

/// Why a source field produced no binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Excluded by attribute or `ignore_field`.
    Ignored,
    /// No target field has the source field's name.
    NoTargetField,
    /// A name override names a target field that does not exist.
    UnresolvedOverride { target_field: String },
    /// Both sides are objects, but of different types.
    DifferentObjectTypes,
    /// Both sides are sequences, but no element plan exists.
    NoElementPlan,
    /// No rule applies to the pair of field types.
    IncompatibleTypes,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Ignored => write!(f, "ignored"),
            SkipReason::NoTargetField => write!(f, "no target field"),
            SkipReason::UnresolvedOverride { target_field } => {
                write!(f, "override target '{}' does not exist", target_field)
            }
            SkipReason::DifferentObjectTypes => write!(f, "nested types differ"),
            SkipReason::NoElementPlan => write!(f, "sequence elements cannot be mapped"),
            SkipReason::IncompatibleTypes => write!(f, "incompatible types"),
        }
    }
}

/// How one sequence element is produced.
#[derive(Debug, Clone)]
pub enum ElementPlan {
    /// Identical scalars.
    Copy,
    /// Convertible scalars.
    Convert { from: ScalarKind, to: ScalarKind },
    /// Objects, mapped through the cache.
    Map(PairRef),
    /// Nested sequences.
    Sequence(Box<ElementPlan>),
}

/// Resolved binding kind for one source field.
#[derive(Debug, Clone)]
pub enum BindingDecision {
    Skip(SkipReason),
    DirectCopy,
    ImplicitConvert { from: ScalarKind, to: ScalarKind },
    CustomConvert(Converter),
    NestedMap(PairRef),
    CollectionMap { element: TypePair, plan: ElementPlan },
}

impl BindingDecision {
    pub fn is_skip(&self) -> bool {
        matches!(self, BindingDecision::Skip(_))
    }

    /// Short label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            BindingDecision::Skip(_) => "skip",
            BindingDecision::DirectCopy => "direct-copy",
            BindingDecision::ImplicitConvert { .. } => "implicit-convert",
            BindingDecision::CustomConvert(_) => "custom-convert",
            BindingDecision::NestedMap(_) => "nested-map",
            BindingDecision::CollectionMap { .. } => "collection-map",
        }
    }
}

/// The decision for one source field.
#[derive(Debug, Clone)]
pub struct FieldBinding {
    pub source: FieldDescriptor,
    /// Resolved target field; `None` when target resolution failed.
    pub target: Option<FieldDescriptor>,
    pub decision: BindingDecision,
}

impl FieldBinding {
    fn skipped(source: FieldDescriptor, target: Option<FieldDescriptor>, reason: SkipReason) -> Self {
        Self {
            source,
            target,
            decision: BindingDecision::Skip(reason),
        }
    }
}

/// Resolve one [`FieldBinding`] per mappable source field, in declaration order.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn resolve_bindings(
    source: &TypeMeta,
    target: &TypeMeta,
    config: &MappingConfig,
    policy: UnresolvedOverridePolicy,
) -> Result<Vec<FieldBinding>, MapError> {
    let source_fields = introspect::fields(source);
    let target_fields = introspect::fields(target);
    let mut bindings = Vec::with_capacity(source_fields.len());

    for field in source_fields {
        if field.ignored || config.is_ignored(field.name) {
            bindings.push(FieldBinding::skipped(field, None, SkipReason::Ignored));
            continue;
        }

        let target_field = match config.name_override(field.name) {
            Some(target_name) => match find_field(&target_fields, target_name) {
                Some(found) => found.clone(),
                None => {
                    if policy == UnresolvedOverridePolicy::Fail {
                        return Err(MapError::UnresolvedOverride {
                            target_type: target.name,
                            source_field: field.name.to_string(),
                            target_field: target_name.to_string(),
                        });
                    }
                    warn!(
                        source = source.name,
                        target = target.name,
                        field = field.name,
                        override_target = target_name,
                        "name override does not match any target field"
                    );
                    let reason = SkipReason::UnresolvedOverride {
                        target_field: target_name.to_string(),
                    };
                    bindings.push(FieldBinding::skipped(field, None, reason));
                    continue;
                }
            },
            None => match find_field(&target_fields, field.name) {
                Some(found) => found.clone(),
                None => {
                    bindings.push(FieldBinding::skipped(field, None, SkipReason::NoTargetField));
                    continue;
                }
            },
        };

        let decision = resolve_kind(&field, &target_field, config);
        trace!(
            source = source.name,
            target = target.name,
            field = field.name,
            target_field = target_field.name,
            decision = decision.label(),
            "resolved binding"
        );
        bindings.push(FieldBinding {
            source: field,
            target: Some(target_field),
            decision,
        });
    }

    Ok(bindings)
}

fn resolve_kind(
    source: &FieldDescriptor,
    target: &FieldDescriptor,
    config: &MappingConfig,
) -> BindingDecision {
    if let Some(converter) = config.converter(source.name) {
        return BindingDecision::CustomConvert(converter.clone());
    }

    let (s, t) = (&source.ty, &target.ty);

    if let TypeShape::Object { meta } = s.shape {
        if s == t {
            return BindingDecision::NestedMap(PairRef::from_meta(meta, meta));
        }
        if t.is_object() {
            return BindingDecision::Skip(SkipReason::DifferentObjectTypes);
        }
    }

    if let (Some(se), Some(te)) = (s.element(), t.element()) {
        return match element_plan(&se, &te) {
            Some(plan) => BindingDecision::CollectionMap {
                element: TypePair::new(se.type_hash, te.type_hash),
                plan,
            },
            None => BindingDecision::Skip(SkipReason::NoElementPlan),
        };
    }

    if let (Some(from), Some(to)) = (s.scalar(), t.scalar())
        && is_implicitly_convertible(from, to)
    {
        return BindingDecision::ImplicitConvert { from, to };
    }

    if s == t {
        return BindingDecision::DirectCopy;
    }

    BindingDecision::Skip(SkipReason::IncompatibleTypes)
}

/// Plan for mapping one element of a sequence, if any rule applies.
pub fn element_plan(source: &TypeDescriptor, target: &TypeDescriptor) -> Option<ElementPlan> {
    match (source.shape, target.shape) {
        (TypeShape::Object { meta: s }, TypeShape::Object { meta: t }) => {
            Some(ElementPlan::Map(PairRef::from_meta(s, t)))
        }
        (TypeShape::Scalar(from), TypeShape::Scalar(to)) => {
            if from == to {
                Some(ElementPlan::Copy)
            } else if is_implicitly_convertible(from, to) {
                Some(ElementPlan::Convert { from, to })
            } else {
                None
            }
        }
        (TypeShape::Sequence { element: s, .. }, TypeShape::Sequence { element: t, .. }) => {
            element_plan(&s(), &t()).map(|plan| ElementPlan::Sequence(Box::new(plan)))
        }
        _ => None,
    }
}
