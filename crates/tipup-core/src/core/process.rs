use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct RunOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Executes a program with inherited stdio so its combined output streams
/// live to the operator's console, returning the exit code.
///
/// # Errors
/// Returns an error when the program cannot be spawned or waited on.
pub fn run_passthrough(
    program: &Path,
    args: &[String],
    envs: &[(String, String)],
    cwd: &Path,
) -> Result<i32> {
    let mut command = configured_command(program, args, envs, cwd);
    command.stdin(Stdio::inherit());
    command.stdout(Stdio::inherit());
    command.stderr(Stdio::inherit());

    let status = command
        .status()
        .with_context(|| format!("failed to start {}", program.display()))?;
    Ok(status.code().unwrap_or(-1))
}

/// Executes a program with stdin closed and both output streams captured.
///
/// # Errors
/// Returns an error when the program cannot be spawned or its output
/// cannot be collected.
pub fn run_captured(program: &Path, args: &[String], cwd: &Path) -> Result<RunOutput> {
    let mut command = configured_command(program, args, &[], cwd);
    command.stdin(Stdio::null());

    let output = command
        .output()
        .with_context(|| format!("failed to start {}", program.display()))?;
    Ok(RunOutput {
        code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

fn configured_command(
    program: &Path,
    args: &[String],
    envs: &[(String, String)],
    cwd: &Path,
) -> Command {
    debug!(program = %program.display(), ?args, cwd = %cwd.display(), "spawning subprocess");
    let mut command = Command::new(program);
    command.args(args);
    for (key, value) in envs {
        command.env(key, value);
    }
    command.current_dir(cwd);
    command
}
