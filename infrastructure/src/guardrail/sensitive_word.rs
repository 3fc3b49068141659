//! Sensitive-word input guardrail
//!
//! The matcher is built from its [`TermSource`] on first use and then shared
//! by every caller. Concurrent first calls build it exactly once.

use super::dictionary::TermSource;
use code_helper_application::{GuardrailConfig, InputGuardrail};
use code_helper_domain::Verdict;
use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

/// Substring matcher over a fixed term set
#[derive(Debug, Clone)]
pub struct SensitiveWordMatcher {
    terms: Vec<String>,
    case_sensitive: bool,
}

impl SensitiveWordMatcher {
    pub fn new<I, S>(terms: I, case_sensitive: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut terms: Vec<String> = terms
            .into_iter()
            .map(|t| normalize(t.as_ref().trim(), case_sensitive).into_owned())
            .filter(|t| !t.is_empty())
            .filter(|t| seen.insert(t.clone()))
            .collect();
        // Longest first, so the reported term is the most specific one
        terms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        Self {
            terms,
            case_sensitive,
        }
    }

    /// First dictionary term contained in `text`
    pub fn find(&self, text: &str) -> Option<&str> {
        let haystack = normalize(text, self.case_sensitive);
        self.terms
            .iter()
            .find(|term| haystack.contains(term.as_str()))
            .map(String::as_str)
    }

    pub fn contains(&self, text: &str) -> bool {
        self.find(text).is_some()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

fn normalize(text: &str, case_sensitive: bool) -> Cow<'_, str> {
    if case_sensitive {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.to_lowercase())
    }
}

/// [`InputGuardrail`] that rejects messages containing a dictionary term
pub struct SensitiveWordGuardrail {
    config: GuardrailConfig,
    source: Arc<dyn TermSource>,
    matcher: OnceLock<SensitiveWordMatcher>,
}

impl SensitiveWordGuardrail {
    pub fn new(config: GuardrailConfig, source: Arc<dyn TermSource>) -> Self {
        Self {
            config,
            source,
            matcher: OnceLock::new(),
        }
    }

    pub fn config(&self) -> GuardrailConfig {
        self.config
    }

    /// Build the matcher now instead of on the first message.
    ///
    /// Does nothing while the guardrail is disabled.
    pub fn warm_up(&self) {
        if self.config.enabled {
            self.matcher();
        }
    }

    /// Whether the matcher has been built
    pub fn is_initialized(&self) -> bool {
        self.matcher.get().is_some()
    }

    fn matcher(&self) -> &SensitiveWordMatcher {
        self.matcher.get_or_init(|| {
            let matcher =
                SensitiveWordMatcher::new(self.source.terms(), self.config.case_sensitive);
            info!(
                terms = matcher.len(),
                source = %self.source.describe(),
                case_sensitive = self.config.case_sensitive,
                "Sensitive-word matcher initialized"
            );
            matcher
        })
    }
}

impl InputGuardrail for SensitiveWordGuardrail {
    fn validate(&self, user_message: &str) -> Verdict {
        if !self.config.enabled {
            return Verdict::Accept;
        }

        match self.matcher().find(user_message) {
            Some(term) => {
                debug!(term = %term, "Sensitive term matched");
                Verdict::sensitive_content()
            }
            None => Verdict::Accept,
        }
    }
}
