//! Input guardrail adapters

mod dictionary;
mod sensitive_word;

pub use dictionary::{
    BUILTIN_TERMS, ConfiguredTerms, DictionaryError, TermSource, parse_term_list,
};
pub use sensitive_word::{SensitiveWordGuardrail, SensitiveWordMatcher};
