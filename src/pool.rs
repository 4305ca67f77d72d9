//! Thread-local parser pooling.
//!
//! A package scan parses every `.go` file in a directory. Keeping one parser
//! per thread avoids re-initializing the Go grammar for each file.

use crate::ts::{GoParser, TreeSitterError};
use std::cell::RefCell;

thread_local! {
    static GO_PARSER: RefCell<Option<GoParser>> = const { RefCell::new(None) };
}

/// Execute function with pooled parser instance.
///
/// On first call per thread, creates new parser. Subsequent calls reuse
/// the same parser instance.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use gobump::pool::with_parser;
///
/// let has_errors = with_parser(|parser| {
///     parser
///         .parse_with_source("package main\n")
///         .map(|parsed| parsed.has_errors())
/// })??;
/// assert!(!has_errors);
/// # Ok(())
/// # }
/// ```
pub fn with_parser<F, R>(f: F) -> Result<R, TreeSitterError>
where
    F: FnOnce(&mut GoParser) -> R,
{
    GO_PARSER.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            *slot = Some(GoParser::new()?);
        }
        Ok(f(slot.as_mut().expect("parser was just initialized above")))
    })
}
