use anyhow::Result;
use serde_json::json;
use tracing::info;

use crate::core::build;
use crate::core::config::{EnvSnapshot, Settings};
use crate::core::errors::InstallError;
use crate::core::git::Git;
use crate::core::home;
use crate::core::lock::InstallLock;
use crate::core::outcome::ExecutionOutcome;
use crate::core::platform::Platform;
use crate::core::sync::{self, Confirm, TargetRef};
use crate::core::tracker;

#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub target: TargetRef,
}

/// Runs the download pipeline end to end: resolve the install root,
/// synchronize the source tree to the requested target, skip or run the
/// platform build, and record success.
///
/// Failures abort the pipeline and are reported once; partial on-disk
/// state is left in place so a re-run resumes from it.
///
/// # Errors
/// Returns one of the [`InstallError`] kinds, or a wrapped transport
/// error, with a diagnostic naming the step that failed.
pub fn download(
    settings: &Settings,
    request: &DownloadRequest,
    confirm: &dyn Confirm,
) -> Result<ExecutionOutcome> {
    let platform = Platform::current()?;
    let env = EnvSnapshot::capture();
    let root = home::install_root(settings, platform, &env)?;

    let Some(_lock) = InstallLock::try_acquire(&root)? else {
        return Err(InstallError::Locked { root }.into());
    };

    let git = Git::new(&root);
    sync::ensure_clone(settings, &git)?;

    let old_revision = tracker::recorded_revision(&git, &root)?;
    sync::fetch_target(&git, &request.target, confirm)?;
    let new_revision = git.rev_parse_short("FETCH_HEAD")?;

    if !tracker::needs_build(old_revision.as_deref(), &new_revision) {
        info!("already built {new_revision} in {}", root.display());
        return Ok(ExecutionOutcome::success(
            format!("already built {new_revision} in {}", root.display()),
            json!({
                "root": root.display().to_string(),
                "revision": new_revision,
                "rebuilt": false,
            }),
        ));
    }

    // The marker must be gone before the tree moves: a crash after the
    // checkout may not leave a stale "already built" claim behind.
    tracker::invalidate(&root)?;
    sync::checkout_fetched(&git)?;
    tracker::clean_worktree(&git)?;
    build::build(&root, platform)?;
    tracker::record_success(&root)?;

    info!("built {new_revision} in {}", root.display());
    Ok(ExecutionOutcome::success(
        format!(
            "built {new_revision} in {}; you may now run 'tipup'",
            root.display()
        ),
        json!({
            "root": root.display().to_string(),
            "revision": new_revision,
            "rebuilt": true,
        }),
    ))
}
