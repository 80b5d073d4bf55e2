use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target architecture passed to the compiler's `-arch` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Arch {
    #[default]
    X86,
    X64,
    Ia64,
}

impl Arch {
    /// Flag value as the compiler expects it on the command line.
    pub fn as_flag(&self) -> &'static str {
        match self {
            Arch::X86 => "x86",
            Arch::X64 => "x64",
            Arch::Ia64 => "ia64",
        }
    }

    /// All supported architectures, in presentation order.
    pub fn all() -> &'static [Arch] {
        &[Arch::X86, Arch::X64, Arch::Ia64]
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_flag())
    }
}

impl FromStr for Arch {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "x86" => Ok(Arch::X86),
            "x64" => Ok(Arch::X64),
            "ia64" => Ok(Arch::Ia64),
            _ => {
                let supported: Vec<&str> = Arch::all().iter().map(Arch::as_flag).collect();
                Err(format!(
                    "invalid architecture '{}'; supported values are {}",
                    value,
                    supported.join(", ")
                ))
            }
        }
    }
}

/// Which of the two toolchain executables an invocation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolKind {
    Compiler,
    Linker,
}

impl ToolKind {
    /// Well-known executable file name of the tool.
    pub fn executable_name(&self) -> &'static str {
        match self {
            ToolKind::Compiler => crate::core::settings::COMPILER,
            ToolKind::Linker => crate::core::settings::LINKER,
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolKind::Compiler => write!(f, "compiler"),
            ToolKind::Linker => write!(f, "linker"),
        }
    }
}

/// Progress of one build through the compile-then-link pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BuildState {
    #[default]
    Idle,
    Compiling,
    Compiled,
    Linking,
    Done,
    Failed,
}

/// Caller-visible result of one build invocation.
///
/// `Unstable` replaces `Failure` for tool-reported errors when the
/// mark-unstable option is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildOutcome {
    Success,
    Unstable,
    Failure,
}

impl BuildOutcome {
    /// Process exit code reported to the invoking shell.
    pub fn exit_code(&self) -> i32 {
        match self {
            BuildOutcome::Success => 0,
            BuildOutcome::Unstable => 2,
            BuildOutcome::Failure => 1,
        }
    }
}

impl fmt::Display for BuildOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildOutcome::Success => write!(f, "success"),
            BuildOutcome::Unstable => write!(f, "unstable"),
            BuildOutcome::Failure => write!(f, "failure"),
        }
    }
}

/// Error category enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Missing or inconsistent user configuration: toolchain path, source
    /// files, output files, rejection-list syntax.
    ConfigurationError,
    /// The external process could not be launched at all.
    ToolExecutionError,
    /// The tool ran but its exit code or output reported errors.
    ToolFailure,
    TimeoutError,
    IoError,
    InternalError,
    Unknown,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Error severity enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Error,
    Warning,
    Info,
    Debug,
}
