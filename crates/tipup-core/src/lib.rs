#![deny(clippy::all)]

mod core;

pub use crate::core::config::{EnvSnapshot, Settings};
pub use crate::core::download::{download, DownloadRequest};
pub use crate::core::envutil::dedup_env;
pub use crate::core::errors::InstallError;
pub use crate::core::forward::forward;
pub use crate::core::home::install_root;
pub use crate::core::outcome::{to_json_response, CommandStatus, ExecutionOutcome};
pub use crate::core::platform::Platform;
pub use crate::core::sync::{AssumeYes, Confirm, StdinConfirm, TargetRef};
