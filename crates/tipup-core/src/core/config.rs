use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_UPSTREAM: &str = "https://git.sdkforge.dev/sdk";
pub const DEFAULT_VERSION_LABEL: &str = "tip";

/// Immutable capture of the process environment.
///
/// Everything the pipeline needs from the ambient environment is read
/// through one of these up front and threaded as a parameter; nothing
/// consults `std::env` mid-pipeline.
#[derive(Debug, Clone)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    #[must_use]
    pub fn capture() -> Self {
        Self {
            vars: env::vars().collect(),
        }
    }

    #[must_use]
    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Like [`var`](Self::var) but treats an empty value as unset, matching
    /// how shells leave emptied variables behind.
    #[must_use]
    pub fn non_empty_var(&self, key: &str) -> Option<&str> {
        self.var(key).filter(|value| !value.is_empty())
    }

    #[must_use]
    pub fn testing(pairs: &[(&str, &str)]) -> Self {
        let vars = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Self { vars }
    }
}

/// Settings resolved once at startup from the process environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub upstream: String,
    pub version_label: String,
    /// Replaces the `<home>/sdk` parent wholesale when set.
    pub sdk_dir: Option<PathBuf>,
}

impl Settings {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_snapshot(&EnvSnapshot::capture())
    }

    #[must_use]
    pub fn from_snapshot(snapshot: &EnvSnapshot) -> Self {
        Self {
            upstream: snapshot
                .non_empty_var("TIPUP_UPSTREAM")
                .unwrap_or(DEFAULT_UPSTREAM)
                .to_string(),
            version_label: snapshot
                .non_empty_var("TIPUP_VERSION_LABEL")
                .unwrap_or(DEFAULT_VERSION_LABEL)
                .to_string(),
            sdk_dir: snapshot.non_empty_var("TIPUP_SDK_DIR").map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_environment_is_silent() {
        let settings = Settings::from_snapshot(&EnvSnapshot::testing(&[]));
        assert_eq!(settings.upstream, DEFAULT_UPSTREAM);
        assert_eq!(settings.version_label, "tip");
        assert!(settings.sdk_dir.is_none());
    }

    #[test]
    fn environment_overrides_take_effect() {
        let snapshot = EnvSnapshot::testing(&[
            ("TIPUP_UPSTREAM", "file:///srv/sdk-mirror"),
            ("TIPUP_VERSION_LABEL", "tip-next"),
            ("TIPUP_SDK_DIR", "/var/lib/sdk"),
        ]);
        let settings = Settings::from_snapshot(&snapshot);
        assert_eq!(settings.upstream, "file:///srv/sdk-mirror");
        assert_eq!(settings.version_label, "tip-next");
        assert_eq!(settings.sdk_dir.as_deref(), Some(std::path::Path::new("/var/lib/sdk")));
    }

    #[test]
    fn empty_override_values_fall_back_to_defaults() {
        let snapshot = EnvSnapshot::testing(&[("TIPUP_UPSTREAM", ""), ("TIPUP_SDK_DIR", "")]);
        let settings = Settings::from_snapshot(&snapshot);
        assert_eq!(settings.upstream, DEFAULT_UPSTREAM);
        assert!(settings.sdk_dir.is_none());
    }
}
