//! Tree-sitter integration for locating Go declarations.
//!
//! This module provides CST-based span location using tree-sitter's Go
//! grammar, giving exact byte spans for const values without losing
//! comments or formatting.

pub mod errors;
pub mod locator;
pub mod parser;
pub mod query;
pub mod validator;

pub use errors::{LocateError, TreeSitterError};
pub use locator::{package_files, GoConstLocator, Locator, VersionSite, DEFAULT_SYMBOL};
pub use parser::{GoParser, ParsedSource};
pub use query::{QueryEngine, QueryMatch};
pub use validator::validate_edit;
