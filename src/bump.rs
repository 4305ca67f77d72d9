//! The bump pipeline: locate, extract, increment, splice.
//!
//! This module ties the stages together and reports what changed:
//! - [`Locator`] finds the version const and its value span
//! - [`extract`] splits the literal into quotes and bare version
//! - [`increment`] computes the next version
//! - [`Edit`] rewrites only the value span, verifying the old text first
//!
//! The file is re-parsed with the new value before anything is written, so
//! a bump never leaves behind source that no longer parses.

use crate::edit::{Edit, EditError, EditResult};
use crate::extract::{extract, ExtractError};
use crate::options::BumpOptions;
use crate::ts::{validate_edit, GoConstLocator, LocateError, Locator, TreeSitterError, VersionSite};
use crate::version::{increment, IncrementLevel, VersionError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BumpError {
    #[error(transparent)]
    Locate(#[from] LocateError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error("failed to write {}: {source}", .file.display())]
    Write {
        file: PathBuf,
        #[source]
        source: EditError,
    },

    #[error("bumped source of {} would not parse: {source}", .file.display())]
    InvalidResult {
        file: PathBuf,
        #[source]
        source: TreeSitterError,
    },

    #[error("failed to set up Go parser: {0}")]
    Parser(#[from] TreeSitterError),

    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What a bump did (or, for a dry run, would do).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpOutcome {
    pub site: VersionSite,
    /// Bare version before the bump; empty when the const had no value
    pub old_value: String,
    /// Bare version after the bump
    pub new_value: String,
    /// File contents before the bump
    pub before: String,
    /// File contents after the bump
    pub after: String,
    /// `None` for a dry run
    pub result: Option<EditResult>,
}

impl BumpOutcome {
    /// The rewritten file.
    pub fn file(&self) -> &Path {
        &self.site.file
    }

    /// True when the file on disk was changed.
    pub fn applied(&self) -> bool {
        matches!(self.result, Some(EditResult::Applied { .. }))
    }
}

/// Bump the version const of the Go package in `package_dir`.
pub fn bump_package(
    level: IncrementLevel,
    package_dir: &Path,
    options: &BumpOptions,
) -> Result<BumpOutcome, BumpError> {
    let locator = GoConstLocator::new(options.symbol.as_str())?;
    bump_with(&locator, level, package_dir, options)
}

/// Report the current bare version without changing anything.
///
/// A const declared without a value reports the empty string.
pub fn current_version(
    package_dir: &Path,
    options: &BumpOptions,
) -> Result<(VersionSite, String), BumpError> {
    let locator = GoConstLocator::new(options.symbol.as_str())?;
    let site = locator.locate(package_dir)?;
    let value = extract(
        &site.file,
        site.byte_offset,
        site.byte_length,
        options.delimiters,
    )?;
    Ok((site, value.bare))
}

/// Run the pipeline with any [`Locator`].
pub fn bump_with<L: Locator + ?Sized>(
    locator: &L,
    level: IncrementLevel,
    package_dir: &Path,
    options: &BumpOptions,
) -> Result<BumpOutcome, BumpError> {
    let site = locator.locate(package_dir)?;

    let value = extract(
        &site.file,
        site.byte_offset,
        site.byte_length,
        options.delimiters,
    )?;

    let new_value = increment(level, &value.bare)?;
    let new_text = value.delimit(&new_value);
    log::debug!(
        "{} bump of {}: {:?} -> {:?}",
        level,
        site.file.display(),
        value.original,
        new_text
    );

    let before = fs::read_to_string(&site.file).map_err(|e| BumpError::Io {
        path: site.file.clone(),
        source: e,
    })?;

    let edit = Edit::new(
        &site.file,
        site.byte_offset,
        site.byte_end(),
        new_text.as_str(),
        value.original.as_str(),
    );

    let write_error = |source: EditError| BumpError::Write {
        file: site.file.clone(),
        source,
    };

    let after = edit.apply_to(before.as_bytes()).map_err(write_error)?;
    let after = String::from_utf8(after).map_err(|_| write_error(EditError::InvalidUtf8Edit))?;

    validate_edit(&before, site.byte_offset, site.byte_end(), &new_text).map_err(|source| {
        BumpError::InvalidResult {
            file: site.file.clone(),
            source,
        }
    })?;

    let result = if options.dry_run {
        log::debug!("dry run, leaving {} untouched", site.file.display());
        None
    } else {
        Some(edit.apply().map_err(write_error)?)
    };

    Ok(BumpOutcome {
        site,
        old_value: value.bare,
        new_value,
        before,
        after,
        result,
    })
}
