use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeSitterError {
    #[error("failed to set language for parser")]
    LanguageSet,

    #[error("failed to parse source code")]
    ParseFailed,

    #[error("invalid tree-sitter query: {message}")]
    InvalidQuery { message: String },

    #[error("query matched 0 locations")]
    NoMatch,

    #[error("missing package clause")]
    MissingPackageClause,

    #[error("syntax error at {line}:{column} ({count} error node(s), first at byte {byte_start}..{byte_end})")]
    SyntaxError {
        line: usize,
        column: usize,
        byte_start: usize,
        byte_end: usize,
        count: usize,
    },
}

/// Failure to find the version symbol in a package directory.
#[derive(Error, Debug)]
pub enum LocateError {
    #[error("failed to parse {}: {source}", .file.display())]
    Parse {
        file: PathBuf,
        #[source]
        source: TreeSitterError,
    },

    #[error("didn't find const `{symbol}` in package {}{}", .package.display(), did_you_mean(.suggestion))]
    NotFound {
        package: PathBuf,
        symbol: String,
        suggestion: Option<String>,
    },

    #[error("const `{symbol}` is declared {count} times in package `{package_name}` ({})", .package.display())]
    AmbiguousSymbol {
        package: PathBuf,
        package_name: String,
        symbol: String,
        count: usize,
    },

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to list package files: {0}")]
    Walk(#[from] walkdir::Error),
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(name) => format!(" (did you mean `{name}`?)"),
        None => String::new(),
    }
}
