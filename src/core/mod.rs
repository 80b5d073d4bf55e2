pub mod command;
pub mod env;
pub mod error;
pub mod settings;
pub mod toolset;
pub mod types;

pub use command::{ExtensionSet, ToolCommand};
pub use env::{ParameterMap, RejectionList};
pub use error::AppError;
pub use settings::ToolsetSettings;
pub use toolset::{BuildPlan, Toolset};
pub use types::{Arch, BuildOutcome, BuildState, ErrorCategory, ToolKind};
