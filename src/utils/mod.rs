//! Utility helpers: file-name derivation and environment-variable expansion.

use regex::{Captures, Regex};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Replace every occurrence of `from` in the path string with `to`. Used to
/// derive output names (`.wxs` → `.wixobj` → `.msi`); callers pass
/// extensions that do not occur elsewhere in the path.
pub fn replace_extension(path: &Path, from: &str, to: &str) -> PathBuf {
    PathBuf::from(path.display().to_string().replace(from, to))
}

/// Expand `$NAME` and `${NAME}` references against the given variables.
/// Unknown references are left untouched.
pub fn expand_env_vars(input: &str, vars: &[(String, String)]) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z0-9_]+)\}|\$([A-Za-z0-9_]+)").expect("expansion pattern is valid")
    });
    pattern
        .replace_all(input, |caps: &Captures<'_>| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();
            vars.iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
