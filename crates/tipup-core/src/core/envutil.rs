use std::path::Path;

use tracing::debug;

use crate::core::platform::Platform;

/// Removes duplicate keys from an ordered list of `key=value` entries.
///
/// Subprocess environments silently consult only one of several duplicate
/// keys depending on platform, so explicit overrides appended at the end
/// of the list must deterministically win over inherited ambient values.
/// The surviving entry keeps the position of the key's first occurrence
/// and carries the value of its last occurrence; entries without a `=`
/// separator (or starting with one) pass through untouched and are never
/// deduplicated.
#[must_use]
pub fn dedup_env(case_insensitive: bool, env: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(env.len());
    let mut seen: Vec<(String, usize)> = Vec::new();
    for entry in env {
        let Some(eq) = entry.find('=').filter(|pos| *pos > 0) else {
            out.push(entry.clone());
            continue;
        };
        let mut key = entry[..eq].to_string();
        if case_insensitive {
            key = key.to_lowercase();
        }
        if let Some((_, index)) = seen.iter().find(|(k, _)| *k == key) {
            out[*index] = entry.clone();
        } else {
            seen.push((key, out.len()));
            out.push(entry.clone());
        }
    }
    out
}

/// Builds the child environment for the forward path: the ambient
/// environment plus the injected install root and an install-root-prefixed
/// search path, sanitized so the injected values win.
#[must_use]
pub fn forward_env(
    root: &Path,
    platform: Platform,
    ambient: impl IntoIterator<Item = (String, String)>,
) -> Vec<(String, String)> {
    let mut entries: Vec<String> = Vec::new();
    let mut ambient_path = None;
    for (key, value) in ambient {
        if key.eq_ignore_ascii_case("PATH") {
            ambient_path = Some(value.clone());
        }
        entries.push(format!("{key}={value}"));
    }

    let bin = root.join("bin");
    let mut search_path = bin.display().to_string();
    if let Some(ambient_path) = ambient_path.filter(|p| !p.is_empty()) {
        search_path.push(platform.path_list_separator());
        search_path.push_str(&ambient_path);
    }
    entries.push(format!("SDKROOT={}", root.display()));
    entries.push(format!("PATH={search_path}"));

    dedup_env(platform.case_insensitive_env(), &entries)
        .into_iter()
        .filter_map(|entry| {
            let eq = entry.find('=').filter(|pos| *pos > 0);
            let Some(eq) = eq else {
                debug!("dropping malformed environment entry {entry:?}");
                return None;
            };
            Some((entry[..eq].to_string(), entry[eq + 1..].to_string()))
        })
        .collect()
}
