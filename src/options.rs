//! Explicit configuration for a bump run.
//!
//! Nothing here is read from process-global state; the binary builds a
//! [`BumpOptions`] from its flags and environment and hands it to the
//! pipeline.

use crate::extract::DelimiterPolicy;
use crate::ts::DEFAULT_SYMBOL;

/// Environment variable naming the const to bump when `--symbol` is absent.
pub const SYMBOL_ENV: &str = "GOBUMP_SYMBOL";

/// Settings for [`bump_package`](crate::bump::bump_package).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpOptions {
    /// Identifier of the file-scope const holding the version
    pub symbol: String,
    /// How strictly to check the literal's quotes
    pub delimiters: DelimiterPolicy,
    /// Compute the new version without writing the file
    pub dry_run: bool,
}

impl Default for BumpOptions {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_SYMBOL.to_string(),
            delimiters: DelimiterPolicy::default(),
            dry_run: false,
        }
    }
}

impl BumpOptions {
    /// Use `symbol` instead of the default identifier.
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    pub fn with_delimiters(mut self, policy: DelimiterPolicy) -> Self {
        self.delimiters = policy;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Pick the symbol name: explicit value first, then the environment, then
/// [`DEFAULT_SYMBOL`].
pub fn resolve_symbol(explicit: Option<String>, from_env: Option<String>) -> String {
    explicit
        .or(from_env)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_SYMBOL.to_string())
}
