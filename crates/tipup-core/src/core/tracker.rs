use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::errors::InstallError;
use crate::core::git::Git;

/// Zero-length sentinel whose presence means the checked-out revision
/// built successfully.
pub const BUILD_MARKER: &str = ".built-success";

#[must_use]
pub fn marker_path(root: &Path) -> PathBuf {
    root.join(BUILD_MARKER)
}

/// Revision recorded by the last successful build, or `None` when the
/// previous build state is unknown or unsuccessful.
///
/// # Errors
/// Returns an error when the marker exists but the checked-out revision
/// cannot be resolved.
pub fn recorded_revision(git: &Git, root: &Path) -> Result<Option<String>> {
    if !marker_path(root).exists() {
        return Ok(None);
    }
    git.rev_parse_short("HEAD")
        .context("failed to resolve the previously built revision")
        .map(Some)
}

/// Whether the build step must run. The build is bypassed only when a
/// successful previous build is recorded for exactly the new revision.
#[must_use]
pub fn needs_build(old_revision: Option<&str>, new_revision: &str) -> bool {
    old_revision != Some(new_revision)
}

/// Removes a marker that no longer describes the current state.
///
/// # Errors
/// Returns an error when the stale marker cannot be removed.
pub fn invalidate(root: &Path) -> Result<()> {
    let path = marker_path(root);
    if path.exists() {
        debug!("removing stale build marker {}", path.display());
        fs::remove_file(&path)
            .with_context(|| format!("failed to remove the stale marker at {}", path.display()))?;
    }
    Ok(())
}

/// Removes build artifacts left behind by unrelated prior builds: first
/// untracked files go through interactive disposal, then ignored files
/// are wiped silently. Stale binary artifacts from older builds have been
/// observed to corrupt a fresh build.
///
/// # Errors
/// Returns an error when either cleanup pass fails.
pub fn clean_worktree(git: &Git) -> Result<()> {
    git.run(&["clean", "-i", "-d"])
        .context("failed to clean untracked files from the source tree")?;
    git.run(&["clean", "-q", "-f", "-d", "-X"])
        .context("failed to clean ignored files from the source tree")
}

/// Records build success by (re)creating the empty marker. A write
/// failure must surface: a missing marker after a real success only costs
/// a redundant rebuild, but reporting success without the marker on disk
/// would violate the marker's meaning.
///
/// # Errors
/// Returns [`InstallError::MarkerWriteFailed`] when the marker cannot be
/// created.
pub fn record_success(root: &Path) -> Result<(), InstallError> {
    let path = marker_path(root);
    fs::write(&path, b"").map_err(|source| InstallError::MarkerWriteFailed { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_is_bypassed_only_on_matching_recorded_revision() {
        assert!(!needs_build(Some("ab12cd3"), "ab12cd3"));
        assert!(needs_build(Some("ab12cd3"), "ef45ab6"));
        assert!(needs_build(None, "ab12cd3"));
    }

    #[test]
    fn success_marker_round_trips_through_invalidate() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        record_success(dir.path())?;
        let marker = marker_path(dir.path());
        assert!(marker.exists());
        assert_eq!(fs::metadata(&marker)?.len(), 0);

        invalidate(dir.path())?;
        assert!(!marker.exists());
        // Invalidating an absent marker is not an error.
        invalidate(dir.path())?;
        Ok(())
    }

    #[test]
    fn marker_write_failure_carries_the_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("no-such-subdir");
        let err = record_success(&missing).unwrap_err();
        match err {
            InstallError::MarkerWriteFailed { path, .. } => {
                assert_eq!(path, missing.join(BUILD_MARKER));
            }
            other => panic!("expected MarkerWriteFailed, got {other}"),
        }
    }
}
