use std::path::Path;

use anyhow::Result;

use crate::core::errors::InstallError;
use crate::core::platform::Platform;
use crate::core::process;

/// Name of the toolchain binary, both the one being built and the ambient
/// one used to bootstrap the console-only platform.
pub const TOOLCHAIN_BIN: &str = "sdk";

/// Runs the platform-appropriate build script inside the checked-out
/// source tree, output streamed live to the operator.
///
/// # Errors
/// Returns [`InstallError::BuildFailed`] on nonzero exit or spawn
/// failure, and [`InstallError::BootstrapNotFound`] when the console-only
/// platform has no resolvable bootstrap toolchain.
pub fn build(root: &Path, platform: Platform) -> Result<()> {
    let src = root.join("src");
    let script = src.join(platform.make_script());

    // make.bat cannot reliably auto-detect the bootstrap toolchain, so it
    // is resolved here and injected explicitly.
    let mut envs: Vec<(String, String)> = Vec::new();
    if platform == Platform::ConsoleOnly {
        envs.push(("SDKROOT_BOOTSTRAP".to_string(), bootstrap_root(platform)?));
    }

    let code = process::run_passthrough(&script, &[], &envs, &src)
        .map_err(|err| InstallError::BuildFailed(format!("{err:#}")))?;
    if code != 0 {
        return Err(InstallError::BuildFailed(format!(
            "{} exited with status {code}",
            script.display()
        ))
        .into());
    }
    Ok(())
}

/// Locates an existing toolchain installation by querying the binary
/// directly rather than trusting the ambient environment.
fn bootstrap_root(platform: Platform) -> Result<String, InstallError> {
    let name = format!("{TOOLCHAIN_BIN}{}", platform.exe_suffix());
    let binary = which::which(&name)
        .map_err(|err| InstallError::BootstrapNotFound(format!("{name}: {err}")))?;
    let output = process::run_captured(
        &binary,
        &["env".to_string(), "SDKROOT".to_string()],
        Path::new("."),
    )
    .map_err(|err| InstallError::BootstrapNotFound(format!("{err:#}")))?;
    if output.code != 0 {
        return Err(InstallError::BootstrapNotFound(format!(
            "{} env SDKROOT exited with status {}",
            binary.display(),
            output.code
        )));
    }
    let root = output.stdout.trim();
    if root.is_empty() {
        return Err(InstallError::BootstrapNotFound(format!(
            "{} reported an empty SDKROOT",
            binary.display()
        )));
    }
    Ok(root.to_string())
}
