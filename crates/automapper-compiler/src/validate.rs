//! Mapping validation.
//!
//! Reports, without compiling anything, what a mapper for a pair would do with
//! each source field under the current configuration.

use std::fmt;

use automapper_core::{MapError, TypeMeta};
use automapper_registry::MappingConfig;

use crate::resolver::{
    BindingDecision, FieldBinding, SkipReason, UnresolvedOverridePolicy, resolve_bindings,
};

/// Result of validating a pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// No errors (warnings allowed).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.errors.is_empty() {
            writeln!(f, "ERRORS:")?;
            for error in &self.errors {
                writeln!(f, "  - {}", error)?;
            }
        }
        if !self.warnings.is_empty() {
            writeln!(f, "WARNINGS:")?;
            for warning in &self.warnings {
                writeln!(f, "  - {}", warning)?;
            }
        }
        if self.errors.is_empty() && self.warnings.is_empty() {
            write!(f, "Validation passed successfully")?;
        }
        Ok(())
    }
}

/// Validate mapping `source` into `target`.
pub fn validate(
    source: &TypeMeta,
    target: &TypeMeta,
    config: &MappingConfig,
    policy: UnresolvedOverridePolicy,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    if target.constructor.is_none() {
        report.errors.push(
            MapError::Construction {
                target: target.name,
            }
            .to_string(),
        );
    }

    let bindings = match resolve_bindings(source, target, config, policy) {
        Ok(bindings) => bindings,
        Err(err) => {
            report.errors.push(err.to_string());
            match resolve_bindings(source, target, config, UnresolvedOverridePolicy::Skip) {
                Ok(bindings) => bindings,
                Err(_) => return report,
            }
        }
    };

    for binding in &bindings {
        if let Some(warning) = warning_for(binding) {
            report.warnings.push(warning);
        }
    }

    report
}

fn warning_for(binding: &FieldBinding) -> Option<String> {
    let source = &binding.source;
    let target_ty = binding.target.as_ref().map(|t| t.ty.type_name).unwrap_or("?");

    match &binding.decision {
        BindingDecision::Skip(SkipReason::Ignored) => None,
        BindingDecision::Skip(SkipReason::NoTargetField) => Some(format!(
            "Source field '{}' has no corresponding target field",
            source.name
        )),
        BindingDecision::Skip(SkipReason::UnresolvedOverride { target_field }) => Some(format!(
            "Source field '{}' is mapped to '{}', which does not exist on the target",
            source.name, target_field
        )),
        BindingDecision::Skip(SkipReason::DifferentObjectTypes) => Some(format!(
            "Nested types differ for field '{}': {} -> {}; the field will not be mapped",
            source.name, source.ty.type_name, target_ty
        )),
        BindingDecision::Skip(SkipReason::NoElementPlan) => Some(format!(
            "Collection elements of field '{}' cannot be mapped: {} -> {}",
            source.name, source.ty.type_name, target_ty
        )),
        BindingDecision::Skip(SkipReason::IncompatibleTypes) => Some(format!(
            "Potential incompatible types for field '{}': {} -> {}",
            source.name, source.ty.type_name, target_ty
        )),
        BindingDecision::CollectionMap { element, .. } if element.source != element.target => {
            let source_elem = source.ty.element().map(|e| e.type_name).unwrap_or("?");
            let target_elem = binding
                .target
                .as_ref()
                .and_then(|t| t.ty.element())
                .map(|e| e.type_name)
                .unwrap_or("?");
            Some(format!(
                "Collection element types differ for field '{}': {} -> {}",
                source.name, source_elem, target_elem
            ))
        }
        _ => None,
    }
}
