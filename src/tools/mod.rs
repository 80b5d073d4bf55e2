pub mod execution;

use crate::core::error::AppError;
use crate::core::settings::{keys, ToolsetSettings};
use crate::core::types::{ErrorCategory, ToolKind};
use crate::logging::BuildLog;
use std::path::{Path, PathBuf};

/// Resolved location of one toolchain executable.
///
/// `Verified` means the binary was found and is executable on this host.
/// `SkippedCheck` means the path (or bare name) is used as-is because the
/// check cannot or must not run locally: no installation directory was
/// configured, or the build executes on a remote worker. A configured
/// directory whose binary is missing or not executable is a configuration
/// error, not a variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolLocation {
    Verified(PathBuf),
    SkippedCheck(PathBuf),
}

impl ToolLocation {
    pub fn path(&self) -> &Path {
        match self {
            ToolLocation::Verified(path) | ToolLocation::SkippedCheck(path) => path,
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, ToolLocation::Verified(_))
    }
}

/// Resolve the path of a toolchain executable from the settings.
///
/// With a non-empty installation directory the executable name is joined
/// onto it (normalizing a trailing separator) and checked for existence and
/// execute permission, unless the remote-worker flag suppresses the check.
/// With no directory configured the bare name is returned and resolution is
/// left to the process launcher's search path.
pub fn locate_tool(
    settings: &ToolsetSettings,
    kind: ToolKind,
    log: &BuildLog,
) -> Result<ToolLocation, AppError> {
    let executable = kind.executable_name();
    let configured = settings.get_str(keys::INST_PATH, "");
    if configured.is_empty() {
        log.debug(&format!(
            "no installation path configured, relying on the search path for {}",
            executable
        ));
        return Ok(ToolLocation::SkippedCheck(PathBuf::from(executable)));
    }

    let normalized = configured.trim_end_matches(['/', '\\']);
    let full = Path::new(normalized).join(executable);

    if settings.get_bool(keys::USED_ON_SLAVE, false) {
        log.debug(&format!(
            "running on a remote worker, skipping existence check for {}",
            full.display()
        ));
        return Ok(ToolLocation::SkippedCheck(full));
    }

    if !full.exists() {
        return Err(AppError::new(
            ErrorCategory::ConfigurationError,
            format!("No binary found: {}", full.display()),
        )
        .with_code("WIX-TOOL-001"));
    }
    if !is_executable(&full) {
        return Err(AppError::new(
            ErrorCategory::ConfigurationError,
            format!("No execution rights on {}", executable),
        )
        .with_code("WIX-TOOL-002"));
    }
    Ok(ToolLocation::Verified(full))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    // Windows derives executability from the file extension.
    true
}
