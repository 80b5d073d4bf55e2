use crate::core::settings::DEFAULT_REJECTED;
use crate::logging::BuildLog;
use indexmap::IndexMap;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Insertion-ordered map of preprocessor parameters.
///
/// First write wins: a name that is already present is never overwritten by
/// a later source. Iteration order is insertion order, which is what the
/// argument builder emits.
#[derive(Debug, Clone, Default)]
pub struct ParameterMap {
    entries: IndexMap<String, String>,
}

impl ParameterMap {
    pub fn new() -> Self {
        ParameterMap {
            entries: IndexMap::new(),
        }
    }

    /// Insert a parameter unless the name is already taken.
    pub fn insert(&mut self, name: &str, value: &str) {
        if !self.entries.contains_key(name) {
            self.entries.insert(name.to_string(), value.to_string());
        }
    }

    /// Merge another map into this one, keeping existing entries.
    pub fn merge(&mut self, other: ParameterMap) {
        for (name, value) in other.entries {
            if !self.entries.contains_key(&name) {
                self.entries.insert(name, value);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Names and value shapes excluded from environment forwarding.
///
/// Built once per build from the bundled defaults plus the user-configured
/// comma-separated additions, then immutable.
#[derive(Debug, Clone)]
pub struct RejectionList {
    names: HashSet<String>,
}

impl RejectionList {
    /// `additions` is the raw comma-separated user setting; empty entries
    /// are ignored, comparison is case-insensitive.
    pub fn new(additions: &str) -> Self {
        let mut names: HashSet<String> = DEFAULT_REJECTED.iter().map(|s| s.to_string()).collect();
        for entry in additions.split(',') {
            let trimmed = entry.trim();
            if !trimmed.is_empty() {
                names.insert(trimmed.to_lowercase());
            }
        }
        RejectionList { names }
    }

    /// Decide whether a variable is excluded from forwarding. A name
    /// containing `=` is always rejected; otherwise the lower-cased name is
    /// checked against the list, and finally the value is rejected when it
    /// looks like a Windows filesystem path.
    pub fn is_rejected(&self, name: &str, value: &str) -> bool {
        if name.contains('=') {
            return true;
        }
        if self.names.contains(&name.to_lowercase()) {
            return true;
        }
        path_shaped(value)
    }
}

impl Default for RejectionList {
    fn default() -> Self {
        RejectionList::new("")
    }
}

fn path_shaped(value: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"^([a-zA-Z]:)?(\\[a-zA-Z0-9 ._()\-]+)+\\?$").expect("path pattern is valid")
    });
    pattern.is_match(value)
}

/// Escape a parameter value for embedding in a quoted argument: embedded
/// double quotes are backslash-escaped, and a trailing single backslash is
/// doubled so it cannot swallow the closing quote.
pub fn escape_parameter_value(value: &str) -> String {
    let mut escaped = value.replace('"', "\\\"");
    if escaped.ends_with('\\') && !escaped.ends_with("\\\\") {
        escaped.push('\\');
    }
    escaped
}

/// Select the environment variables that are forwarded as tool parameters.
///
/// With the switch off the result is always empty. Every rejected variable
/// is named in a debug log entry. Source order is preserved in the result.
pub fn filter_environment(
    vars: &[(String, String)],
    rejection: &RejectionList,
    forward_enabled: bool,
    log: &BuildLog,
) -> ParameterMap {
    let mut accepted = ParameterMap::new();
    if !forward_enabled {
        log.debug("environment forwarding disabled, no variables promoted");
        return accepted;
    }
    for (name, value) in vars {
        if rejection.is_rejected(name, value) {
            log.debug(&format!("Rejected environment variable: {}", name));
        } else {
            log.debug(&format!("VarName: {}; Value: {}", name, value));
            accepted.insert(name, value);
        }
    }
    accepted
}
