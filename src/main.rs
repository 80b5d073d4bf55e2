use clap::Parser;
use wixforge::cli::{Cli, Command};
use wixforge::logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let debug = cli.command.debug_requested();
    let log_file = match &cli.command {
        Command::Build(args) if !args.no_log_file => {
            Some(logging::log_file_path(args.workdir.as_deref()))
        }
        _ => None,
    };

    let guard = match logging::init(debug, log_file.as_deref()) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("wixforge: failed to initialize logging: {err:#}");
            std::process::exit(1);
        }
    };

    let code = match wixforge::cli::run(cli).await {
        Ok(outcome) => {
            tracing::info!("[wix] Build outcome: {}", outcome);
            outcome.exit_code()
        }
        Err(err) => {
            tracing::error!("[wix] {err:#}");
            1
        }
    };

    // Flush the file sink before terminating.
    drop(guard);
    std::process::exit(code);
}
