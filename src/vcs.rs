//! Staging, committing and tagging a bump with git.
//!
//! These run only after the file has been rewritten. A failure here does not
//! undo the edit.

use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VcsError {
    #[error("failed to run `git {args}` in {}: {source}", .dir.display())]
    Spawn {
        dir: PathBuf,
        args: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`git {args}` exited with {status}:\n{output}")]
    Failed {
        args: String,
        status: String,
        output: String,
    },
}

/// Stage `file` and commit it with `message`.
///
/// Returns the combined output of both git invocations.
pub fn git_commit(dir: &Path, file: &Path, message: &str) -> Result<String, VcsError> {
    let mut output = run_git(dir, &["add".as_ref(), file.as_os_str()])?;
    output.push_str(&run_git(dir, &["commit".as_ref(), "-m".as_ref(), message.as_ref()])?);
    Ok(output)
}

/// Create a lightweight tag named `name` on HEAD.
pub fn git_tag(dir: &Path, name: &str) -> Result<String, VcsError> {
    run_git(dir, &["tag".as_ref(), name.as_ref()])
}

fn run_git(dir: &Path, args: &[&std::ffi::OsStr]) -> Result<String, VcsError> {
    let display = args
        .iter()
        .map(|a| a.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ");
    log::debug!("running git {display} in {}", dir.display());

    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|source| VcsError::Spawn {
            dir: dir.to_path_buf(),
            args: display.clone(),
            source,
        })?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    if !output.status.success() {
        return Err(VcsError::Failed {
            args: display,
            status: output.status.to_string(),
            output: combined,
        });
    }

    Ok(combined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn init_repo(dir: &Path) {
        for args in [
            vec!["init", "-q"],
            vec!["config", "user.name", "gobump test"],
            vec!["config", "user.email", "gobump@example.com"],
            vec!["config", "commit.gpgsign", "false"],
            vec!["config", "tag.gpgsign", "false"],
        ] {
            let status = Command::new("git")
                .args(&args)
                .current_dir(dir)
                .status()
                .unwrap();
            assert!(status.success(), "git {args:?} failed");
        }
    }

    #[test]
    fn commit_and_tag() {
        if !git_available() {
            return;
        }

        let temp_dir = tempfile::tempdir().unwrap();
        init_repo(temp_dir.path());
        let file = temp_dir.path().join("version.go");
        fs::write(&file, "package demo\n\nconst Version = \"0.0.1\"\n").unwrap();

        git_commit(temp_dir.path(), &file, "0.0.1").unwrap();
        git_tag(temp_dir.path(), "0.0.1").unwrap();

        let tags = run_git(temp_dir.path(), &["tag".as_ref(), "--list".as_ref()]).unwrap();
        assert_eq!(tags.trim(), "0.0.1");

        let log = run_git(
            temp_dir.path(),
            &["log".as_ref(), "-1".as_ref(), "--format=%s".as_ref()],
        )
        .unwrap();
        assert_eq!(log.trim(), "0.0.1");
    }

    #[test]
    fn tag_without_commits_fails() {
        if !git_available() {
            return;
        }

        let temp_dir = tempfile::tempdir().unwrap();
        init_repo(temp_dir.path());

        // No commits yet, so there is nothing to tag
        let result = git_tag(temp_dir.path(), "1.0.0");
        assert!(matches!(result, Err(VcsError::Failed { .. })));
    }
}
