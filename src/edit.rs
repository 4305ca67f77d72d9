//! Byte-exact span replacement.
//!
//! The version literal is rewritten in place: the bytes before and after the
//! span are copied through untouched, so line endings, comments and gofmt
//! alignment survive a bump.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Replace the bytes `[byte_start, byte_end)` of a file with `new_text`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "Edit does nothing until apply() is called"]
pub struct Edit {
    pub file: PathBuf,
    pub byte_start: usize,
    /// Exclusive; equal to `byte_start` for a pure insertion
    pub byte_end: usize,
    pub new_text: String,
    /// What the span must still contain when the edit lands
    pub expected_before: EditVerification,
}

/// How the current span text is checked before it is replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditVerification {
    /// The span must hold exactly this text
    ExactMatch(String),
    /// Replace whatever is in the span
    Unchecked,
}

impl EditVerification {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            EditVerification::ExactMatch(expected) => text == expected,
            EditVerification::Unchecked => true,
        }
    }
}

#[derive(Error, Debug)]
pub enum EditError {
    #[error("{} changed since it was read: expected {expected:?} at byte {byte_start}, found {found:?}", .file.display())]
    BeforeTextMismatch {
        file: PathBuf,
        byte_start: usize,
        byte_end: usize,
        expected: String,
        found: String,
    },

    #[error("span {byte_start}..{byte_end} is outside a file of {file_len} byte(s)")]
    InvalidByteRange {
        byte_start: usize,
        byte_end: usize,
        file_len: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("span is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("edited file would not be valid UTF-8")]
    InvalidUtf8Edit,
}

/// What [`Edit::apply`] did to the file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "EditResult tells whether the file was rewritten"]
pub enum EditResult {
    Applied { file: PathBuf, bytes_changed: usize },
    /// The span already held `new_text`; the file was not rewritten
    AlreadyApplied { file: PathBuf },
}

impl Edit {
    /// Create a new edit that requires `expected_before` in the span.
    pub fn new(
        file: impl Into<PathBuf>,
        byte_start: usize,
        byte_end: usize,
        new_text: impl Into<String>,
        expected_before: impl Into<String>,
    ) -> Self {
        Self::with_verification(
            file,
            byte_start,
            byte_end,
            new_text,
            EditVerification::ExactMatch(expected_before.into()),
        )
    }

    pub fn with_verification(
        file: impl Into<PathBuf>,
        byte_start: usize,
        byte_end: usize,
        new_text: impl Into<String>,
        verification: EditVerification,
    ) -> Self {
        Self {
            file: file.into(),
            byte_start,
            byte_end,
            new_text: new_text.into(),
            expected_before: verification,
        }
    }

    /// Check the span against `content` and return its current text.
    fn validate<'a>(&self, content: &'a [u8]) -> Result<&'a str, EditError> {
        if self.byte_start > self.byte_end || self.byte_end > content.len() {
            return Err(EditError::InvalidByteRange {
                byte_start: self.byte_start,
                byte_end: self.byte_end,
                file_len: content.len(),
            });
        }

        let current_text = std::str::from_utf8(&content[self.byte_start..self.byte_end])?;

        // Check if already applied (idempotency)
        if current_text == self.new_text {
            return Ok(current_text);
        }

        if !self.expected_before.matches(current_text) {
            let expected = match &self.expected_before {
                EditVerification::ExactMatch(text) => text.clone(),
                EditVerification::Unchecked => String::new(),
            };
            return Err(EditError::BeforeTextMismatch {
                file: self.file.clone(),
                byte_start: self.byte_start,
                byte_end: self.byte_end,
                expected,
                found: current_text.to_string(),
            });
        }

        Ok(current_text)
    }

    /// Build the edited content without touching the file system.
    ///
    /// Bytes `[0, byte_start)` and `[byte_end, len)` are copied unchanged.
    pub fn apply_to(&self, content: &[u8]) -> Result<Vec<u8>, EditError> {
        self.validate(content)?;

        let mut new_content = Vec::with_capacity(
            content.len() - (self.byte_end - self.byte_start) + self.new_text.len(),
        );
        new_content.extend_from_slice(&content[..self.byte_start]);
        new_content.extend_from_slice(self.new_text.as_bytes());
        new_content.extend_from_slice(&content[self.byte_end..]);

        Ok(new_content)
    }

    /// Rewrite the file on disk.
    ///
    /// Uses tempfile + fsync + rename; the original file mode is kept.
    pub fn apply(&self) -> Result<EditResult, EditError> {
        let original_content = fs::read(&self.file)?;

        if self.validate(&original_content)? == self.new_text {
            return Ok(EditResult::AlreadyApplied {
                file: self.file.clone(),
            });
        }

        let new_content = self.apply_to(&original_content)?;

        std::str::from_utf8(&new_content).map_err(|_| EditError::InvalidUtf8Edit)?;

        atomic_write(&self.file, &new_content)?;

        Ok(EditResult::Applied {
            file: self.file.clone(),
            bytes_changed: self.new_text.len(),
        })
    }
}

/// Replace `length` bytes at `offset` of `file` with `new_text`.
///
/// Whatever currently occupies the span is overwritten. Callers that know
/// the expected text should build an [`Edit`] with [`Edit::new`] instead.
pub fn splice(
    file: impl Into<PathBuf>,
    offset: usize,
    length: usize,
    new_text: impl Into<String>,
) -> Result<EditResult, EditError> {
    Edit::with_verification(
        file,
        offset,
        offset + length,
        new_text,
        EditVerification::Unchecked,
    )
    .apply()
}

/// Write `content` to a sibling temp file, fsync it and rename it over `path`.
fn atomic_write(path: &Path, content: &[u8]) -> Result<(), EditError> {
    // Rename over the symlink target, never the link itself
    let path = fs::canonicalize(path)?;

    // Same directory, so the rename cannot cross filesystems
    let parent = path.parent().ok_or_else(|| {
        EditError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Path has no parent directory",
        ))
    })?;

    let permissions = fs::metadata(&path)?.permissions();

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().set_permissions(permissions)?;
    temp.as_file().sync_all()?;

    temp.persist(&path).map_err(|e| e.error)?;

    Ok(())
}
