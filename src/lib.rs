//! gobump: bump the version const of a Go package in place
//!
//! A Go package keeps its version in a file-scope const, by default
//!
//! ```go
//! const Version = "XX.YY.ZZ"
//! ```
//!
//! gobump finds that const with tree-sitter, computes the next version and
//! rewrites only the bytes of the literal. Comments, formatting and every
//! other declaration are left exactly as they were.
//!
//! # Architecture
//!
//! The work is a straight pipeline, see [`bump::bump_with`]:
//!
//! 1. [`ts::Locator`] parses the package and returns a [`VersionSite`], the
//!    byte span of the value (or an insertion point when the const has none).
//! 2. [`extract::extract`] splits the literal into its quotes and the bare
//!    version text.
//! 3. [`version::increment`] computes the next version; it is pure.
//! 4. [`Edit`] replaces the span, verifying the old text is still there.
//!
//! # Safety
//!
//! - The value span is re-checked against the text read before writing
//! - The edited source must parse without new syntax errors
//! - Atomic file writes (tempfile + fsync + rename), file mode preserved
//!
//! # Example
//!
//! ```no_run
//! use gobump::{bump_package, BumpOptions, IncrementLevel};
//! use std::path::Path;
//!
//! let outcome = bump_package(IncrementLevel::Minor, Path::new("."), &BumpOptions::default())?;
//! println!("{} -> {}", outcome.old_value, outcome.new_value);
//! # Ok::<(), gobump::BumpError>(())
//! ```

pub mod bump;
pub mod edit;
pub mod extract;
pub mod options;
pub mod pool;
pub mod ts;
pub mod vcs;
pub mod version;

// Re-exports
pub use bump::{bump_package, bump_with, current_version, BumpError, BumpOutcome};
pub use edit::{splice, Edit, EditError, EditResult, EditVerification};
pub use extract::{extract, DecomposedValue, DelimiterPolicy, ExtractError};
pub use options::BumpOptions;
pub use ts::{GoConstLocator, LocateError, Locator, TreeSitterError, VersionSite};
pub use vcs::{git_commit, git_tag, VcsError};
pub use version::{increment, IncrementLevel, VersionError};
