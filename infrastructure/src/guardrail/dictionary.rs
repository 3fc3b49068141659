//! Sensitive-word dictionary sources
//!
//! Term lists are plain text: one term per line, blank lines ignored, and
//! `#` at the start of a line marks a comment.

use crate::config::FileGuardrailConfig;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Dictionary shipped with the binary
pub const BUILTIN_TERMS: &str = include_str!("../../resources/sensitive_words.txt");

#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("Failed to read dictionary file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Provides the raw terms a guardrail matches against.
///
/// `terms` is called at most once per guardrail, on first use.
pub trait TermSource: Send + Sync {
    /// Human-readable origin, for logs
    fn describe(&self) -> String;

    fn terms(&self) -> Vec<String>;
}

/// Parse a term list into trimmed, non-comment lines
pub fn parse_term_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Terms assembled from configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfiguredTerms {
    terms: Vec<String>,
    origin: Vec<String>,
}

impl ConfiguredTerms {
    /// A fixed list of terms
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terms: words.into_iter().map(Into::into).collect(),
            origin: vec!["inline".to_string()],
        }
    }

    /// Combine the built-in list, `words` and `dictionary-path`, minus `allow-words`.
    ///
    /// The dictionary file is read here, so a missing file fails at startup
    /// rather than on the first message.
    pub fn from_config(config: &FileGuardrailConfig) -> Result<Self, DictionaryError> {
        let mut terms = Vec::new();
        let mut origin = Vec::new();

        if config.use_builtin {
            terms.extend(parse_term_list(BUILTIN_TERMS));
            origin.push("builtin".to_string());
        }

        if !config.words.is_empty() {
            terms.extend(config.words.iter().cloned());
            origin.push(format!("{} configured words", config.words.len()));
        }

        if let Some(path) = &config.dictionary_path {
            terms.extend(read_term_file(path)?);
            origin.push(path.display().to_string());
        }

        if !config.allow_words.is_empty() {
            // Allow-listing ignores case so it cannot be bypassed by a
            // differently-cased dictionary entry.
            let allowed: HashSet<String> = config
                .allow_words
                .iter()
                .map(|w| w.trim().to_lowercase())
                .collect();
            terms.retain(|t| !allowed.contains(&t.trim().to_lowercase()));
        }

        info!(terms = terms.len(), sources = %origin.join(", "), "Guardrail dictionary assembled");
        Ok(Self { terms, origin })
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

fn read_term_file(path: &Path) -> Result<Vec<String>, DictionaryError> {
    let text = std::fs::read_to_string(path).map_err(|source| DictionaryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_term_list(&text))
}

impl TermSource for ConfiguredTerms {
    fn describe(&self) -> String {
        if self.origin.is_empty() {
            "empty".to_string()
        } else {
            self.origin.join(", ")
        }
    }

    fn terms(&self) -> Vec<String> {
        self.terms.clone()
    }
}
