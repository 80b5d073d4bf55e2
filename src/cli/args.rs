use crate::core::types::Arch;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct BuildArgs {
    /// Source descriptor files (.wxs) to compile
    #[arg(value_name = "SOURCES", required = true)]
    pub sources: Vec<PathBuf>,

    /// Name of the installer package to produce (default: setup.msi);
    /// $VAR and ${VAR} references are expanded from the environment
    #[arg(short, long, value_name = "FILE", help_heading = "Outputs")]
    pub output: Option<String>,

    /// Explicit object file for the compile step (default: derived from the
    /// first source file)
    #[arg(long, value_name = "FILE", help_heading = "Outputs")]
    pub object_file: Option<PathBuf>,

    /// Target architecture for the compiler (x86, x64, ia64)
    #[arg(long, default_value = "x86", value_name = "ARCH")]
    pub arch: Arch,

    /// Enable a toolchain extension; repeatable, order is preserved
    #[arg(long = "ext", value_name = "NAME")]
    pub extensions: Vec<String>,

    /// Define a preprocessor parameter as KEY=VALUE; repeatable
    #[arg(short = 'd', long = "define", value_name = "KEY=VALUE")]
    pub defines: Vec<String>,

    /// Add to the compiler include search path; repeatable
    #[arg(short = 'I', long = "include", value_name = "PATH")]
    pub include_paths: Vec<PathBuf>,

    /// Installation directory containing candle.exe and light.exe
    /// (default: rely on the process search path)
    #[arg(long, value_name = "DIR", help_heading = "Toolchain")]
    pub install_dir: Option<PathBuf>,

    /// Stop after the compile step, skipping the linker
    #[arg(long, help_heading = "Pipeline")]
    pub compile_only: bool,

    /// Report tool failures as unstable (exit code 2) instead of failure
    #[arg(long, help_heading = "Pipeline")]
    pub mark_unstable: bool,

    /// Forward filtered environment variables as -d parameters
    #[arg(long, help_heading = "Environment")]
    pub env_as_params: bool,

    /// Comma-separated variable names to add to the rejection list
    #[arg(long, value_name = "NAMES", help_heading = "Environment")]
    pub reject: Option<String>,

    /// The build runs on a remote worker; skip local toolchain checks
    #[arg(long, help_heading = "Toolchain")]
    pub remote: bool,

    /// Enable debug log lines
    #[arg(long)]
    pub debug: bool,

    /// Pass -v to the tools for verbose output
    #[arg(long, help_heading = "Tool Flags")]
    pub verbose_tools: bool,

    /// Pass -wxall to treat all tool warnings as errors
    #[arg(long, help_heading = "Tool Flags")]
    pub warnings_as_errors: bool,

    /// Show the tool logo banners (omits -nologo)
    #[arg(long, help_heading = "Tool Flags")]
    pub show_logo: bool,

    /// Working directory for the tool invocations
    #[arg(long, value_name = "DIR")]
    pub workdir: Option<PathBuf>,

    /// Path to the settings file (default: wixforge.toml when present)
    #[arg(long, value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<PathBuf>,

    /// Kill a tool that runs longer than this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout_seconds: Option<u64>,

    /// Disable the wixforge.log file sink
    #[arg(long)]
    pub no_log_file: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Installation directory to validate (default: taken from the settings
    /// file)
    #[arg(long, value_name = "DIR")]
    pub install_dir: Option<PathBuf>,

    /// Path to the settings file (default: wixforge.toml when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}
