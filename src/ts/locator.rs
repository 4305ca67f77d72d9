use crate::pool::with_parser;
use crate::ts::errors::{LocateError, TreeSitterError};
use crate::ts::parser::ParsedSource;
use crate::ts::query::{queries, QueryEngine};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Identifier searched for when none is configured.
pub const DEFAULT_SYMBOL: &str = "Version";

/// Minimum normalized similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.7;

/// Where the version symbol's value lives.
///
/// A zero `byte_length` means the const is declared without a value and
/// `byte_offset` points just past its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSite {
    pub file: PathBuf,
    pub byte_offset: usize,
    pub byte_length: usize,
}

impl VersionSite {
    /// Exclusive end of the value span.
    pub fn byte_end(&self) -> usize {
        self.byte_offset + self.byte_length
    }

    /// True when the const has no initializer.
    pub fn is_uninitialized(&self) -> bool {
        self.byte_length == 0
    }
}

/// Finds the version symbol inside a package directory.
///
/// The bump pipeline only talks to this trait, so other source layouts can be
/// supported without touching extraction or splicing.
pub trait Locator {
    fn locate(&self, package_dir: &Path) -> Result<VersionSite, LocateError>;
}

/// Locates a file-scope Go `const` by name using tree-sitter.
pub struct GoConstLocator {
    symbol: String,
    package_clause: QueryEngine,
    const_specs: QueryEngine,
}

/// Everything one file contributes to the package scan.
#[derive(Debug, Default)]
struct FileScan {
    package: String,
    /// (byte_offset, byte_length) of each declaration of the symbol
    sites: Vec<(usize, usize)>,
    const_names: Vec<String>,
}

impl GoConstLocator {
    /// Create a locator for the given const identifier.
    pub fn new(symbol: impl Into<String>) -> Result<Self, TreeSitterError> {
        Ok(Self {
            symbol: symbol.into(),
            package_clause: QueryEngine::new(queries::PACKAGE_CLAUSE)?,
            const_specs: QueryEngine::new(queries::TOP_LEVEL_CONST_SPECS)?,
        })
    }

    /// Find every declaration of the symbol in a single source string.
    ///
    /// Returns `(byte_offset, byte_length)` pairs in document order.
    pub fn locate_in_source(&self, source: &str) -> Result<Vec<(usize, usize)>, TreeSitterError> {
        let scan = with_parser(|parser| {
            let parsed = parser.parse_with_source(source)?;
            self.scan(&parsed)
        })??;
        Ok(scan.sites)
    }

    fn scan(&self, parsed: &ParsedSource<'_>) -> Result<FileScan, TreeSitterError> {
        parsed.check_syntax()?;

        let package = self
            .package_clause
            .find_first(parsed)
            .map_err(|e| match e {
                TreeSitterError::NoMatch => TreeSitterError::MissingPackageClause,
                other => other,
            })?
            .captures
            .get("name")
            .map(|c| c.text.clone())
            .ok_or(TreeSitterError::MissingPackageClause)?;

        let mut scan = FileScan {
            package,
            ..FileScan::default()
        };

        let root = parsed.root_node();
        for spec in self
            .const_specs
            .captured_nodes(root, parsed.source.as_bytes(), "spec")
        {
            // `name` also tags the commas between names, keep identifiers only
            let mut cursor = spec.walk();
            let names: Vec<_> = spec
                .children_by_field_name("name", &mut cursor)
                .filter(|n| n.kind() == "identifier")
                .collect();

            let values: Vec<_> = match spec.child_by_field_name("value") {
                Some(list) => {
                    let mut cursor = list.walk();
                    list.named_children(&mut cursor)
                        .filter(|n| !n.is_extra())
                        .collect()
                }
                None => Vec::new(),
            };

            for (i, name) in names.iter().enumerate() {
                let text = parsed.node_text(*name);
                scan.const_names.push(text.to_string());
                if text != self.symbol {
                    continue;
                }

                let site = match values.get(i) {
                    Some(value) => (value.start_byte(), value.end_byte() - value.start_byte()),
                    None => (name.end_byte(), 0),
                };
                scan.sites.push(site);
            }
        }

        Ok(scan)
    }
}

impl Default for GoConstLocator {
    fn default() -> Self {
        Self::new(DEFAULT_SYMBOL).expect("failed to create default GoConstLocator")
    }
}

impl Locator for GoConstLocator {
    fn locate(&self, package_dir: &Path) -> Result<VersionSite, LocateError> {
        if !package_dir.is_dir() {
            return Err(LocateError::NotADirectory(package_dir.to_path_buf()));
        }

        // package name -> sites in file order
        let mut packages: BTreeMap<String, Vec<VersionSite>> = BTreeMap::new();
        let mut const_names = Vec::new();

        for file in package_files(package_dir)? {
            let source = fs::read_to_string(&file).map_err(|e| LocateError::Io {
                path: file.clone(),
                source: e,
            })?;

            let scan = with_parser(|parser| {
                let parsed = parser.parse_with_source(&source)?;
                self.scan(&parsed)
            })
            .and_then(|scan| scan)
            .map_err(|e| LocateError::Parse {
                file: file.clone(),
                source: e,
            })?;

            log::debug!(
                "{}: package {}, {} const name(s), {} match(es) for {}",
                file.display(),
                scan.package,
                scan.const_names.len(),
                scan.sites.len(),
                self.symbol
            );

            const_names.extend(scan.const_names);
            let sites = packages.entry(scan.package).or_default();
            sites.extend(
                scan.sites
                    .into_iter()
                    .map(|(byte_offset, byte_length)| VersionSite {
                        file: file.clone(),
                        byte_offset,
                        byte_length,
                    }),
            );
        }

        // The package under test comes before its external `_test` package
        let mut order: Vec<_> = packages.into_iter().collect();
        order.sort_by_key(|(name, _)| name.ends_with("_test"));

        for (package_name, mut sites) in order {
            match sites.len() {
                0 => continue,
                1 => {
                    let site = sites.remove(0);
                    log::debug!(
                        "found {} in {} at byte {} (length {})",
                        self.symbol,
                        site.file.display(),
                        site.byte_offset,
                        site.byte_length
                    );
                    return Ok(site);
                }
                count => {
                    return Err(LocateError::AmbiguousSymbol {
                        package: package_dir.to_path_buf(),
                        package_name,
                        symbol: self.symbol.clone(),
                        count,
                    })
                }
            }
        }

        Err(LocateError::NotFound {
            package: package_dir.to_path_buf(),
            symbol: self.symbol.clone(),
            suggestion: suggest(&self.symbol, &const_names),
        })
    }
}

/// List the Go source files of a package directory, sorted by name.
///
/// Subdirectories are other packages and are not descended into. Files the
/// go tool ignores (leading `.` or `_`) are skipped.
pub fn package_files(package_dir: &Path) -> Result<Vec<PathBuf>, LocateError> {
    let mut files = Vec::new();

    // Symlinked sources are read through their target
    for entry in WalkDir::new(package_dir)
        .follow_links(true)
        .min_depth(1)
        .max_depth(1)
    {
        let entry = entry?;
        let path = entry.path();

        if !entry.file_type().is_file()
            || path.extension().and_then(|s| s.to_str()) != Some("go")
        {
            continue;
        }

        let ignored = entry
            .file_name()
            .to_str()
            .map_or(true, |name| name.starts_with('.') || name.starts_with('_'));
        if ignored {
            log::debug!("skipping ignored file {}", path.display());
            continue;
        }

        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

/// Pick the const name closest to `symbol`, ignoring case.
fn suggest(symbol: &str, candidates: &[String]) -> Option<String> {
    let wanted = symbol.to_lowercase();

    candidates
        .iter()
        .filter(|name| name.as_str() != symbol)
        .map(|name| (strsim::normalized_levenshtein(&wanted, &name.to_lowercase()), name))
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, name)| name.clone())
}
