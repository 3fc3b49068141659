//! Guardrail switches.

/// Runtime switches for the input guardrail.
///
/// Both default to `false`: the guardrail accepts everything until it is
/// explicitly enabled, and matching ignores letter case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuardrailConfig {
    pub enabled: bool,
    pub case_sensitive: bool,
}

impl GuardrailConfig {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            case_sensitive: false,
        }
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }
}
