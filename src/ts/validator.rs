//! Re-parse check for a proposed edit.

use crate::pool::with_parser;
use crate::ts::errors::TreeSitterError;
use crate::ts::parser::ErrorNode;

/// Fail if replacing `[byte_start, byte_end)` with `new_text` would add
/// syntax errors that `source` does not already have.
pub fn validate_edit(
    source: &str,
    byte_start: usize,
    byte_end: usize,
    new_text: &str,
) -> Result<(), TreeSitterError> {
    let mut new_source =
        String::with_capacity(source.len() + new_text.len() - (byte_end - byte_start));
    new_source.push_str(&source[..byte_start]);
    new_source.push_str(new_text);
    new_source.push_str(&source[byte_end..]);

    let (original_errors, new_errors) = with_parser(|parser| {
        let original = parser.parse_with_source(source)?.error_nodes();
        let edited = parser.parse_with_source(&new_source)?.error_nodes();
        Ok::<_, TreeSitterError>((original, edited))
    })??;

    // Errors after the edit point shift by the length delta
    let delta = new_text.len() as isize - (byte_end - byte_start) as isize;
    let introduced: Vec<&ErrorNode> = new_errors
        .iter()
        .filter(|e| {
            !original_errors.iter().any(|o| {
                let (start, end) = if o.byte_start >= byte_end {
                    (
                        (o.byte_start as isize + delta) as usize,
                        (o.byte_end as isize + delta) as usize,
                    )
                } else {
                    (o.byte_start, o.byte_end)
                };
                start == e.byte_start && end == e.byte_end
            })
        })
        .collect();

    match introduced.first() {
        None => Ok(()),
        Some(first) => Err(first.to_error(introduced.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "package demo\n\nconst Version = \"1.2.3\"\n";

    fn value_span() -> (usize, usize) {
        let start = SOURCE.find('"').unwrap();
        (start, SOURCE.rfind('"').unwrap() + 1)
    }

    #[test]
    fn validate_edit_no_new_errors() {
        let (start, end) = value_span();
        assert!(validate_edit(SOURCE, start, end, "\"1.2.4\"").is_ok());
    }

    #[test]
    fn validate_edit_introduces_error() {
        let (start, end) = value_span();
        let result = validate_edit(SOURCE, start, end, "\"1.2.4");
        assert!(matches!(result, Err(TreeSitterError::SyntaxError { .. })));
    }

    #[test]
    fn validate_insertion_after_name() {
        let source = "package demo\n\nconst (\n\tA = 1\n\tVersion\n)\n";
        let at = source.find("Version").unwrap() + "Version".len();
        assert!(validate_edit(source, at, at, " = \"0.0.1\"").is_ok());
    }
}
