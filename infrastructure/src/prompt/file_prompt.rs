//! System prompt loaded from a UTF-8 text file

use code_helper_application::{PromptSourceError, SystemPromptSource};
use code_helper_domain::SystemPrompt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Reads the system prompt from disk each time [`load`](SystemPromptSource::load) is called.
///
/// The chat service loads it once at construction.
#[derive(Debug, Clone)]
pub struct FilePromptSource {
    path: PathBuf,
}

impl FilePromptSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SystemPromptSource for FilePromptSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<SystemPrompt, PromptSourceError> {
        let bytes = std::fs::read(&self.path).map_err(|source| PromptSourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let text = String::from_utf8(bytes)
            .map_err(|_| PromptSourceError::InvalidUtf8(self.path.clone()))?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

        let prompt = SystemPrompt::new(text);
        if prompt.is_blank() {
            warn!(path = %self.path.display(), "System prompt file is empty");
        }
        debug!(path = %self.path.display(), chars = text.chars().count(), "System prompt loaded");
        Ok(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "You are a patient programming tutor.").unwrap();

        let source = FilePromptSource::new(file.path());
        let prompt = source.load().unwrap();
        assert_eq!(prompt.as_str(), "You are a patient programming tutor.");
        assert_eq!(source.describe(), file.path().display().to_string());
    }

    #[test]
    fn test_load_strips_byte_order_mark() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all("\u{feff}Be concise.".as_bytes()).unwrap();

        let prompt = FilePromptSource::new(file.path()).load().unwrap();
        assert_eq!(prompt.as_str(), "Be concise.");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FilePromptSource::new(dir.path().join("missing.txt"));
        let err = source.load().unwrap_err();
        assert!(matches!(err, PromptSourceError::Io { .. }));
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0x66, 0x6f, 0xff, 0xfe]).unwrap();

        let err = FilePromptSource::new(file.path()).load().unwrap_err();
        assert!(matches!(err, PromptSourceError::InvalidUtf8(_)));
    }
}
