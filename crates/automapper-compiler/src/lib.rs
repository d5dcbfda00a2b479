//! Automapper compiler crate.
//!
//! Turns a pair of type tables plus a [`MappingConfig`](automapper_registry::MappingConfig)
//! into an executable [`CompiledMapper`](automapper_core::CompiledMapper).
//!
//! ## Passes
//!
//! 1. **Resolve** ([`resolve_bindings`]): pick a target field and a binding
//!    kind for every source field.
//! 2. **Compile** ([`compile`]): fold the bindings into one closure.
//!
//! [`validate`] runs the resolve pass alone and reports what would be skipped.

pub mod compile;
pub mod resolver;
pub mod validate;

pub use compile::{CompileOptions, compile};
pub use resolver::{
    BindingDecision, ElementPlan, FieldBinding, SkipReason, UnresolvedOverridePolicy,
    element_plan, resolve_bindings,
};
pub use validate::{ValidationReport, validate};
