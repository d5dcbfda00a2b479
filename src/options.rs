//! Engine-wide options.

use automapper_compiler::CompileOptions;
use automapper_core::DateFormats;

pub use automapper_compiler::UnresolvedOverridePolicy;

/// Options fixed at engine construction.
///
/// ```
/// use automapper::{EngineOptions, UnresolvedOverridePolicy};
///
/// let options = EngineOptions::default()
///     .with_unresolved_overrides(UnresolvedOverridePolicy::Fail)
///     .with_date_format("%Y/%m/%d");
/// assert_eq!(options.date_format, "%Y/%m/%d");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// What to do when a name override targets a field that does not exist.
    pub unresolved_overrides: UnresolvedOverridePolicy,
    /// `chrono` format used for implicit date <-> string conversion.
    pub date_format: String,
    /// `chrono` format used for implicit date-time <-> string conversion.
    pub datetime_format: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        let formats = DateFormats::default();
        Self {
            unresolved_overrides: UnresolvedOverridePolicy::default(),
            date_format: formats.date,
            datetime_format: formats.datetime,
        }
    }
}

impl EngineOptions {
    pub fn with_unresolved_overrides(mut self, policy: UnresolvedOverridePolicy) -> Self {
        self.unresolved_overrides = policy;
        self
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    pub fn with_datetime_format(mut self, format: impl Into<String>) -> Self {
        self.datetime_format = format.into();
        self
    }

    pub(crate) fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            unresolved_overrides: self.unresolved_overrides,
            formats: DateFormats {
                date: self.date_format.clone(),
                datetime: self.datetime_format.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = EngineOptions::default();
        assert_eq!(options.unresolved_overrides, UnresolvedOverridePolicy::Skip);
        assert_eq!(options.date_format, "%d/%m/%Y");
        assert_eq!(options.datetime_format, "%d/%m/%Y %H:%M:%S");
    }

    #[test]
    fn compile_options_carry_formats() {
        let compiled = EngineOptions::default()
            .with_unresolved_overrides(UnresolvedOverridePolicy::Fail)
            .with_datetime_format("%F %T")
            .compile_options();
        assert_eq!(compiled.unresolved_overrides, UnresolvedOverridePolicy::Fail);
        assert_eq!(compiled.formats.datetime, "%F %T");
        assert_eq!(compiled.formats.date, "%d/%m/%Y");
    }
}
