use std::io;
use std::path::PathBuf;

/// Failure kinds surfaced by the install pipeline.
///
/// Every variant renders as a single sentence naming the step that failed
/// and the underlying cause; the CLI is the only place that turns one of
/// these into a process exit.
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("failed to determine the user home directory: {0}")]
    HomeDirectoryUnavailable(String),
    #[error("platform {0:?} is not supported")]
    UnsupportedPlatform(String),
    #[error("failed to clone {upstream}: {reason}")]
    CloneFailed { upstream: String, reason: String },
    #[error("change {0} not found upstream")]
    ChangeNotFound(String),
    #[error("declined to fetch change {0}")]
    UserDeclined(String),
    #[error("failed to check out the fetched revision: {0}")]
    CheckoutFailed(String),
    #[error("build succeeded but writing the success marker at {path} failed: {source}")]
    MarkerWriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to detect a bootstrap toolchain: {0}")]
    BootstrapNotFound(String),
    #[error("failed to build the toolchain: {0}")]
    BuildFailed(String),
    #[error("toolchain not installed at {}; run `tipup download` first", root.display())]
    NotInstalled { root: PathBuf },
    #[error("another tipup download is holding the lock on {}", root.display())]
    Locked { root: PathBuf },
}

impl InstallError {
    /// True for failures the operator can correct by changing the request,
    /// as opposed to environment or build breakage.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            InstallError::ChangeNotFound(_)
                | InstallError::UserDeclined(_)
                | InstallError::NotInstalled { .. }
                | InstallError::Locked { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_errors_are_classified() {
        assert!(InstallError::ChangeNotFound("227037".to_string()).is_user_error());
        assert!(InstallError::UserDeclined("1".to_string()).is_user_error());
        assert!(InstallError::NotInstalled {
            root: PathBuf::from("/sdk/tip")
        }
        .is_user_error());
        assert!(!InstallError::BuildFailed("make.bash exited with status 2".into()).is_user_error());
        assert!(!InstallError::CheckoutFailed("local changes".into()).is_user_error());
    }

    #[test]
    fn not_installed_names_the_download_step() {
        let err = InstallError::NotInstalled {
            root: PathBuf::from("/home/op/sdk/tip"),
        };
        let msg = err.to_string();
        assert!(msg.contains("tipup download"), "got {msg:?}");
        assert!(msg.contains("/home/op/sdk/tip"), "got {msg:?}");
    }
}
