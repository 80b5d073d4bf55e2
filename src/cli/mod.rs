pub mod args;
pub mod commands;

pub use args::{BuildArgs, CheckArgs};
use clap::{Parser, Subcommand};

const HELP_TEMPLATE: &str = "\
{name} {version}\n\
{about-with-newline}\n\
USAGE:\n    {usage}\n\
\nOPTIONS:\n{options}\n\
COMMANDS:\n{subcommands}\n";

#[derive(Parser)]
#[command(name = "wixforge")]
#[command(version = crate::VERSION)]
#[command(about = "WiX Toolset compile-and-link orchestrator")]
#[command(help_template = HELP_TEMPLATE)]
#[command(
    after_long_help = "Exit codes: 0 success, 1 failure, 2 unstable (tool errors with --mark-unstable)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    #[command(
        about = "Compile sources and link them into an installer package",
        long_about = "Build compiles the given .wxs sources with candle.exe and links the resulting object file into an .msi package with light.exe.",
        after_help = "Example:\n    wixforge build product.wxs --output product.msi --ext WixUIExtension"
    )]
    Build(BuildArgs),
    #[command(
        about = "Validate the configured toolchain installation",
        long_about = "Check verifies that the installation directory exists and contains both candle.exe and light.exe.",
        after_help = "Example:\n    wixforge check --install-dir \"C:\\Program Files (x86)\\WiX Toolset v3.14\\bin\""
    )]
    Check(CheckArgs),
}

impl Command {
    /// Whether debug logging was requested for this invocation.
    pub fn debug_requested(&self) -> bool {
        match self {
            Command::Build(args) => args.debug,
            Command::Check(_) => false,
        }
    }
}

pub async fn run(cli: Cli) -> crate::Result<crate::core::BuildOutcome> {
    match cli.command {
        Command::Build(build_args) => commands::build(build_args).await,
        Command::Check(check_args) => commands::check(check_args).await,
    }
}
