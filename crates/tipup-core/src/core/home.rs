use std::path::PathBuf;

use crate::core::config::{EnvSnapshot, Settings};
use crate::core::errors::InstallError;
use crate::core::platform::Platform;

/// Resolves the per-user installation directory for a version label.
///
/// The result is `<home>/sdk/<label>` and is stable for a given home
/// directory and label; `TIPUP_SDK_DIR` replaces the `<home>/sdk` parent
/// wholesale. No directories are created here.
///
/// # Errors
/// Returns [`InstallError::HomeDirectoryUnavailable`] when no usable home
/// signal exists on the current platform.
pub fn install_root(
    settings: &Settings,
    platform: Platform,
    env: &EnvSnapshot,
) -> Result<PathBuf, InstallError> {
    if let Some(dir) = &settings.sdk_dir {
        return Ok(dir.join(&settings.version_label));
    }
    Ok(home_dir(platform, env)?
        .join("sdk")
        .join(&settings.version_label))
}

/// Home resolution prioritizes the platform's home variable over the
/// fallback identity lookup so that shells which re-point `$HOME` win.
fn home_dir(platform: Platform, env: &EnvSnapshot) -> Result<PathBuf, InstallError> {
    match platform {
        Platform::Specialized => Err(InstallError::HomeDirectoryUnavailable(
            "no home directory convention on this platform".to_string(),
        )),
        Platform::ConsoleOnly => env.non_empty_var("USERPROFILE").map(PathBuf::from).ok_or_else(
            || InstallError::HomeDirectoryUnavailable("%USERPROFILE% is empty".to_string()),
        ),
        Platform::DefaultUnix => {
            if let Some(dir) = env.non_empty_var("HOME") {
                return Ok(PathBuf::from(dir));
            }
            dirs_next::home_dir().ok_or_else(|| {
                InstallError::HomeDirectoryUnavailable(
                    "$HOME is empty and no fallback identity lookup succeeded".to_string(),
                )
            })
        }
    }
}
