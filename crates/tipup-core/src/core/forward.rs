use std::env;
use std::ffi::OsString;
use std::process::Command;

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::build::TOOLCHAIN_BIN;
use crate::core::config::{EnvSnapshot, Settings};
use crate::core::envutil;
use crate::core::errors::InstallError;
use crate::core::home;
use crate::core::platform::Platform;

/// Forwards an argument vector verbatim to the installed toolchain binary
/// and returns the child's exit code to mirror (`128 + signal` when the
/// child died to a signal on Unix).
///
/// # Errors
/// Returns [`InstallError::NotInstalled`] when no successful download has
/// produced the binary yet, and a wrapped spawn error when the child
/// could not be started at all.
pub fn forward(settings: &Settings, args: &[OsString]) -> Result<i32> {
    let platform = Platform::current()?;
    let env = EnvSnapshot::capture();
    let root = home::install_root(settings, platform, &env)?;

    let binary = root
        .join("bin")
        .join(format!("{TOOLCHAIN_BIN}{}", platform.exe_suffix()));
    if !binary.exists() {
        return Err(InstallError::NotInstalled { root }.into());
    }

    let envs = envutil::forward_env(&root, platform, env::vars());
    debug!(binary = %binary.display(), ?args, "forwarding to the installed toolchain");

    let mut command = Command::new(&binary);
    command.args(args).env_clear().envs(envs);
    let status = command
        .status()
        .with_context(|| format!("failed to execute {}", binary.display()))?;
    Ok(exit_code(status))
}

#[cfg(unix)]
fn exit_code(status: std::process::ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code(status: std::process::ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
