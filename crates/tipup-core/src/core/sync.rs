use std::fs;
use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use tracing::info;

use crate::core::config::Settings;
use crate::core::errors::InstallError;
use crate::core::git::{self, Git};

/// The moving primary development line of the source tree.
pub const MAINLINE_BRANCH: &str = "main";

/// What a download should bring the source tree to. Resolved fresh on
/// every synchronization; never cached across invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetRef {
    Mainline,
    Branch(String),
    Change { id: String },
}

impl TargetRef {
    /// A decimal positional is a changelist id; anything else is a branch
    /// label; absence means the mainline tip. The id keeps the operator's
    /// literal digits: a zero-padded id is looked up verbatim, never
    /// re-encoded into some other change's number.
    #[must_use]
    pub fn parse(arg: Option<&str>) -> Self {
        match arg {
            None => TargetRef::Mainline,
            Some(value) => {
                if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
                    TargetRef::Change {
                        id: value.to_string(),
                    }
                } else {
                    TargetRef::Branch(value.to_string())
                }
            }
        }
    }
}

/// Capability to ask the operator a yes/no question, substitutable with a
/// non-interactive policy.
pub trait Confirm {
    /// # Errors
    /// Returns an error when the answer cannot be read.
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Interactive policy: prompt on stderr, read one line from stdin, and
/// treat exactly `y` as affirmative.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        eprint!("{prompt}");
        io::stderr().flush().ok();
        let mut answer = String::new();
        io::stdin()
            .lock()
            .read_line(&mut answer)
            .context("failed to read the confirmation answer")?;
        Ok(answer.trim() == "y")
    }
}

/// Non-interactive auto-accept policy.
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
}

/// A remote reference carrying one patch set of a changelist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRef {
    pub name: String,
    pub patch_set: u64,
}

/// Ensures the source tree exists at `root`, shallow-cloning the upstream
/// on first use. The tree is never deleted here; a partial tree left by
/// an earlier failure is resumed from, not re-cloned.
///
/// # Errors
/// Returns [`InstallError::CloneFailed`] on any transport or disk error.
pub fn ensure_clone(settings: &Settings, git: &Git) -> Result<()> {
    if git::repo_exists(git.root()) {
        return Ok(());
    }
    fs::create_dir_all(git.root()).map_err(|err| InstallError::CloneFailed {
        upstream: settings.upstream.clone(),
        reason: format!("failed to create {}: {err}", git.root().display()),
    })?;
    info!("cloning {} into {}", settings.upstream, git.root().display());
    git.run(&["clone", "--depth=1", &settings.upstream, "."])
        .map_err(|err| {
            InstallError::CloneFailed {
                upstream: settings.upstream.clone(),
                reason: err.to_string(),
            }
            .into()
        })
}

/// Fetches the revision the target resolves to, leaving it at
/// `FETCH_HEAD`. Changelist targets are resolved against the live remote
/// listing and require confirmation before any code is fetched.
///
/// # Errors
/// Returns [`InstallError::ChangeNotFound`] when no remote reference
/// encodes the requested id, [`InstallError::UserDeclined`] when the
/// operator does not answer `y`, and a wrapped transport error otherwise.
pub fn fetch_target(git: &Git, target: &TargetRef, confirm: &dyn Confirm) -> Result<()> {
    match target {
        TargetRef::Mainline => {
            info!("updating the SDK development tree");
            git.run(&["fetch", "origin", MAINLINE_BRANCH])
                .context("failed to fetch mainline updates")
        }
        TargetRef::Branch(label) => {
            info!("fetching branch {label}");
            git.run(&["fetch", "origin", label])
                .with_context(|| format!("failed to fetch branch {label}"))
        }
        TargetRef::Change { id } => {
            let listing = git.ls_remote().context("failed to list remote references")?;
            let change = resolve_change(&listing, id)
                .ok_or_else(|| InstallError::ChangeNotFound(id.clone()))?;
            let prompt = format!(
                "This will fetch and execute code from change {id} (patch set {}), continue? [y/n] ",
                change.patch_set
            );
            if !confirm.confirm(&prompt)? {
                return Err(InstallError::UserDeclined(id.clone()).into());
            }
            info!("fetching change {id}, patch set {}", change.patch_set);
            git.run(&["fetch", "origin", &change.name])
                .with_context(|| format!("failed to fetch {}", change.name))
        }
    }
}

/// Checks out the fetched revision detached, overwriting tracked files but
/// refusing to silently discard uncommitted local modifications. Checkout
/// rather than merge or rebase: the working copy is a build cache and only
/// needs to reach the exact requested content.
///
/// # Errors
/// Returns [`InstallError::CheckoutFailed`] when git refuses the checkout.
pub fn checkout_fetched(git: &Git) -> Result<()> {
    git.run(&["-c", "advice.detachedHead=false", "checkout", "FETCH_HEAD"])
        .map_err(|err| InstallError::CheckoutFailed(err.to_string()).into())
}

/// Picks the reference with the numerically highest patch-set number for
/// `id` out of a remote listing. References are shaped
/// `refs/changes/<nn>/<id>/<ps>` and the id segment is matched against the
/// operator's literal digits; the `meta` reference and anything malformed
/// is ignored. Among equal patch-set numbers the first listed wins.
#[must_use]
pub fn resolve_change(listing: &str, id: &str) -> Option<ChangeRef> {
    let mut best: Option<ChangeRef> = None;
    for line in listing.lines() {
        let Some(name) = line.split_whitespace().nth(1) else {
            continue;
        };
        let mut parts = name.split('/');
        if parts.next() != Some("refs") || parts.next() != Some("changes") {
            continue;
        }
        let shard_ok = parts
            .next()
            .is_some_and(|s| s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit()));
        if !shard_ok || parts.next() != Some(id) {
            continue;
        }
        let Some(patch_set) = parts.next().and_then(|ps| ps.parse::<u64>().ok()) else {
            continue;
        };
        if parts.next().is_some() {
            continue;
        }
        if best.as_ref().is_none_or(|b| patch_set > b.patch_set) {
            best = Some(ChangeRef {
                name: name.to_string(),
                patch_set,
            });
        }
    }
    best
}
