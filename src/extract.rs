//! Splitting a located value into its quotes and its version text.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Inserted after the const name when it has no value yet.
pub const SYNTHESIZED_LEADING: &str = " = \"";
pub const SYNTHESIZED_TRAILING: &str = "\"";

/// How much to trust the first and last byte of a value span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DelimiterPolicy {
    /// Both delimiters must be the same Go string quote (`"` or `` ` ``).
    #[default]
    Strict,
    /// Any first/last byte pair is accepted and written back unchanged.
    Permissive,
}

/// A literal split into its delimiters and the bare version between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecomposedValue {
    pub leading: String,
    pub trailing: String,
    pub bare: String,
    /// Exact text of the span this was read from; empty when synthesized.
    pub original: String,
}

impl DecomposedValue {
    /// The value used when the const is declared without one.
    pub fn synthesized() -> Self {
        Self {
            leading: SYNTHESIZED_LEADING.to_string(),
            trailing: SYNTHESIZED_TRAILING.to_string(),
            bare: String::new(),
            original: String::new(),
        }
    }

    /// Wrap a new bare value in this value's delimiters.
    pub fn delimit(&self, bare: &str) -> String {
        format!("{}{}{}", self.leading, bare, self.trailing)
    }
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("failed to read {length} byte(s) at offset {offset} of {}: {source}", .file.display())]
    Read {
        file: PathBuf,
        offset: usize,
        length: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("value at {}:{offset} is {length} byte(s), too short for a quoted string", .file.display())]
    SpanTooShort {
        file: PathBuf,
        offset: usize,
        length: usize,
    },

    #[error("value at {}:{offset} is not a string literal (delimiters {leading:?} and {trailing:?})", .file.display())]
    MismatchedDelimiters {
        file: PathBuf,
        offset: usize,
        leading: char,
        trailing: char,
    },

    #[error("value at {}:{offset} is not valid UTF-8", .file.display())]
    InvalidUtf8 { file: PathBuf, offset: usize },
}

/// Read `length` bytes at `offset` of `file` and decompose them.
///
/// A zero `length` performs no read and returns
/// [`DecomposedValue::synthesized`].
pub fn extract(
    file: &Path,
    offset: usize,
    length: usize,
    policy: DelimiterPolicy,
) -> Result<DecomposedValue, ExtractError> {
    if length == 0 {
        return Ok(DecomposedValue::synthesized());
    }

    let read_error = |source: std::io::Error| ExtractError::Read {
        file: file.to_path_buf(),
        offset,
        length,
        source,
    };

    let mut handle = File::open(file).map_err(read_error)?;
    handle
        .seek(SeekFrom::Start(offset as u64))
        .map_err(read_error)?;

    let mut span = vec![0u8; length];
    handle.read_exact(&mut span).map_err(read_error)?;

    decompose(&span, policy).map_err(|kind| kind.at(file, offset, length))
}

/// Why a span could not be decomposed, before file context is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecomposeError {
    TooShort,
    Mismatched { leading: char, trailing: char },
    InvalidUtf8,
}

impl DecomposeError {
    fn at(self, file: &Path, offset: usize, length: usize) -> ExtractError {
        let file = file.to_path_buf();
        match self {
            DecomposeError::TooShort => ExtractError::SpanTooShort {
                file,
                offset,
                length,
            },
            DecomposeError::Mismatched { leading, trailing } => {
                ExtractError::MismatchedDelimiters {
                    file,
                    offset,
                    leading,
                    trailing,
                }
            }
            DecomposeError::InvalidUtf8 => ExtractError::InvalidUtf8 { file, offset },
        }
    }
}

/// Split the raw bytes of a value span.
///
/// The first byte is the leading delimiter, the last byte the trailing one,
/// and everything strictly between them is the bare value.
pub fn decompose(span: &[u8], policy: DelimiterPolicy) -> Result<DecomposedValue, DecomposeError> {
    let [first, inner @ .., last] = span else {
        return Err(DecomposeError::TooShort);
    };

    // Multi-byte delimiters would split a UTF-8 sequence
    if !first.is_ascii() || !last.is_ascii() {
        return Err(DecomposeError::InvalidUtf8);
    }
    let (leading, trailing) = (*first as char, *last as char);

    if policy == DelimiterPolicy::Strict && !(leading == trailing && matches!(leading, '"' | '`')) {
        return Err(DecomposeError::Mismatched { leading, trailing });
    }

    let bare = std::str::from_utf8(inner).map_err(|_| DecomposeError::InvalidUtf8)?;
    let original = std::str::from_utf8(span).map_err(|_| DecomposeError::InvalidUtf8)?;

    Ok(DecomposedValue {
        leading: leading.to_string(),
        trailing: trailing.to_string(),
        bare: bare.to_string(),
        original: original.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_decompose_interpreted_string() {
        let value = decompose(b"\"1.2.3\"", DelimiterPolicy::Strict).unwrap();
        assert_eq!(value.leading, "\"");
        assert_eq!(value.trailing, "\"");
        assert_eq!(value.bare, "1.2.3");
        assert_eq!(value.original, "\"1.2.3\"");
        assert_eq!(value.delimit("1.2.4"), "\"1.2.4\"");
    }

    #[test]
    fn test_decompose_raw_string() {
        let value = decompose(b"`0.0.2`", DelimiterPolicy::Strict).unwrap();
        assert_eq!(value.leading, "`");
        assert_eq!(value.bare, "0.0.2");
    }

    #[test]
    fn test_decompose_empty_string() {
        let value = decompose(b"\"\"", DelimiterPolicy::Strict).unwrap();
        assert_eq!(value.bare, "");
        assert_eq!(value.delimit("0.0.1"), "\"0.0.1\"");
    }

    #[test]
    fn test_strict_rejects_non_string_literals() {
        assert_eq!(
            decompose(b"12", DelimiterPolicy::Strict),
            Err(DecomposeError::Mismatched {
                leading: '1',
                trailing: '2'
            })
        );
        assert!(decompose(b"\"1.0`", DelimiterPolicy::Strict).is_err());
        assert!(decompose(b"'1'", DelimiterPolicy::Strict).is_err());
    }

    #[test]
    fn test_permissive_passes_mismatched_through() {
        let value = decompose(b"\"1.0`", DelimiterPolicy::Permissive).unwrap();
        assert_eq!(value.leading, "\"");
        assert_eq!(value.trailing, "`");
        assert_eq!(value.bare, "1.0");
    }

    #[test]
    fn test_too_short() {
        assert_eq!(
            decompose(b"1", DelimiterPolicy::Permissive),
            Err(DecomposeError::TooShort)
        );
        assert_eq!(
            decompose(b"", DelimiterPolicy::Permissive),
            Err(DecomposeError::TooShort)
        );
    }

    #[test]
    fn test_extract_zero_length_synthesizes() {
        // No read happens, so the path does not need to exist
        let value = extract(Path::new("does/not/exist.go"), 42, 0, DelimiterPolicy::Strict).unwrap();
        assert_eq!(value, DecomposedValue::synthesized());
        assert_eq!(value.delimit("0.0.1"), " = \"0.0.1\"");
    }

    #[test]
    fn test_extract_reads_exact_span() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file = temp_dir.path().join("version.go");
        let source = "package demo\n\nconst Version = \"2.5.9\"\n";
        fs::write(&file, source).unwrap();

        let offset = source.find('"').unwrap();
        let value = extract(&file, offset, 7, DelimiterPolicy::Strict).unwrap();
        assert_eq!(value.bare, "2.5.9");
    }

    #[test]
    fn test_extract_past_eof_is_read_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file = temp_dir.path().join("short.go");
        fs::write(&file, "package demo\n").unwrap();

        let result = extract(&file, 10, 20, DelimiterPolicy::Strict);
        assert!(matches!(result, Err(ExtractError::Read { offset: 10, length: 20, .. })));
    }

    #[test]
    fn test_extract_attaches_location_to_format_errors() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file = temp_dir.path().join("num.go");
        fs::write(&file, "package demo\n\nconst Version = 12\n").unwrap();

        let result = extract(&file, 30, 2, DelimiterPolicy::Strict);
        assert!(matches!(
            result,
            Err(ExtractError::MismatchedDelimiters { offset: 30, .. })
        ));
    }
}
