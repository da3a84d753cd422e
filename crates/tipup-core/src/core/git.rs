use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::core::process;

/// Thin wrapper running `git` inside the source tree.
///
/// Mutating commands stream their output to the operator's console;
/// queries are captured and trimmed.
#[derive(Debug)]
pub struct Git {
    root: PathBuf,
}

impl Git {
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Runs a git command with inherited stdio, failing on nonzero exit.
    ///
    /// # Errors
    /// Returns an error when git cannot be spawned or exits nonzero.
    pub fn run(&self, args: &[&str]) -> Result<()> {
        let args: Vec<String> = args.iter().map(ToString::to_string).collect();
        let code = process::run_passthrough(Path::new("git"), &args, &[], &self.root)?;
        if code != 0 {
            bail!("git {} exited with status {code}", args.join(" "));
        }
        Ok(())
    }

    /// Runs a git query and returns its trimmed stdout.
    ///
    /// # Errors
    /// Returns an error when git cannot be spawned or exits nonzero; the
    /// message carries git's stderr.
    pub fn output(&self, args: &[&str]) -> Result<String> {
        let args: Vec<String> = args.iter().map(ToString::to_string).collect();
        let output = process::run_captured(Path::new("git"), &args, &self.root)?;
        if output.code != 0 {
            bail!(
                "git {} exited with status {}: {}",
                args.join(" "),
                output.code,
                output.stderr.trim()
            );
        }
        Ok(output.stdout.trim_end().to_string())
    }

    /// Short identifier of a revision, comparable for equality only.
    ///
    /// # Errors
    /// Returns an error when the revision cannot be resolved.
    pub fn rev_parse_short(&self, rev: &str) -> Result<String> {
        self.output(&["rev-parse", "--short", rev])
    }

    /// Full remote reference listing, one `<hash>\t<refname>` line each.
    ///
    /// # Errors
    /// Returns an error when the remote cannot be contacted.
    pub fn ls_remote(&self) -> Result<String> {
        self.output(&["ls-remote"])
    }
}

/// Whether `root` already carries source-control metadata.
#[must_use]
pub fn repo_exists(root: &Path) -> bool {
    root.join(".git").exists()
}
