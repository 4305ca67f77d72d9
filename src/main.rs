use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use gobump::options::{resolve_symbol, SYMBOL_ENV};
use gobump::{
    bump_package, current_version, git_commit, git_tag, BumpOptions, DelimiterPolicy,
    IncrementLevel,
};
use similar::{ChangeTag, TextDiff};
use std::env;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "gobump")]
#[command(about = "Bump the version const of a Go package", long_about = None)]
#[command(version)]
struct Cli {
    /// Component to bump: major, minor or patch
    #[arg(default_value = "patch", value_name = "LEVEL")]
    level: IncrementLevel,

    /// Go package directory (defaults to the current directory)
    #[arg(value_name = "PACKAGE")]
    package: Option<PathBuf>,

    /// Stage the file and commit with the new version as message
    #[arg(long)]
    commit: bool,

    /// Tag the (new) commit with the new version
    #[arg(long)]
    tag: bool,

    /// Name of the const holding the version [env: GOBUMP_SYMBOL] [default: Version]
    #[arg(long, value_name = "NAME")]
    symbol: Option<String>,

    /// Accept values whose first and last characters are not matching quotes
    #[arg(long)]
    permissive: bool,

    /// Print the current version and exit without bumping
    #[arg(long, conflicts_with_all = ["commit", "tag", "dry_run", "diff"])]
    current: bool,

    /// Dry run - compute the new version without writing the file
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Show unified diff of the change
    #[arg(short, long)]
    diff: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // 1. Resolve package directory
    let package = resolve_package(cli.package)?;

    // 2. Build options from flags and environment
    let options = BumpOptions::default()
        .with_symbol(resolve_symbol(cli.symbol, env::var(SYMBOL_ENV).ok()))
        .with_delimiters(if cli.permissive {
            DelimiterPolicy::Permissive
        } else {
            DelimiterPolicy::Strict
        })
        .dry_run(cli.dry_run);

    if cli.current {
        let (site, value) = current_version(&package, &options)
            .with_context(|| format!("failed to read version of {}", package.display()))?;
        log::debug!("{} is declared in {}", options.symbol, site.file.display());
        println!("{value}");
        return Ok(());
    }

    // 3. Bump
    let outcome = bump_package(cli.level, &package, &options)
        .with_context(|| format!("failed to bump {}", package.display()))?;

    let old = if outcome.old_value.is_empty() {
        "(none)".to_string()
    } else {
        outcome.old_value.clone()
    };
    let verb = if cli.dry_run { "Would bump" } else { "Bumped" };
    eprintln!(
        "{} {} {} in {}: {} -> {}",
        "✓".green(),
        verb,
        options.symbol.bold(),
        outcome.file().display(),
        old.dimmed(),
        outcome.new_value.green()
    );

    if cli.diff {
        display_diff(outcome.file(), &outcome.before, &outcome.after);
    }

    if cli.dry_run {
        if cli.commit || cli.tag {
            eprintln!("{}", "Dry run: skipping git commit/tag".yellow());
        }
        println!("{}", outcome.new_value);
        return Ok(());
    }

    // 4. Hand the result to git
    let mut committed = false;
    if cli.commit {
        let output = git_commit(&package, outcome.file(), &outcome.new_value)
            .context("version was bumped but the git commit failed")?;
        print!("{output}");
        committed = true;
    }
    if cli.tag {
        let output = git_tag(&package, &outcome.new_value)
            .context("version was bumped but the git tag failed")?;
        print!("{output}");
    }

    if !committed {
        println!("{}", outcome.new_value);
    }

    Ok(())
}

/// Debug logging with `--verbose`, otherwise whatever `RUST_LOG` asks for.
fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

/// Resolve the package directory, defaulting to the current directory.
///
/// The result is absolute so git can be pointed at the rewritten file from
/// inside the package.
fn resolve_package(cli_package: Option<PathBuf>) -> Result<PathBuf> {
    let path = match cli_package {
        Some(path) => path,
        None => env::current_dir().context("strange things are afoot: no current directory")?,
    };

    path.canonicalize()
        .with_context(|| format!("package directory {} not found", path.display()))
}

/// Helper: Show unified diff between original and modified content
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!("{}", format!("--- {} (original)", file.display()).dimmed());
    println!("{}", format!("+++ {} (bumped)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => continue,
        };
        print!("{}", sign);
    }
}
