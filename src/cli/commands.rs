use crate::{
    cli::args::{BuildArgs, CheckArgs},
    core::{
        settings::{keys, ToolsetSettings, COMPILER, LINKER, MSI_PKG_DEFAULT_NAME},
        types::{BuildOutcome, ErrorCategory},
        AppError, BuildPlan, Toolset,
    },
    logging::BuildLog,
    tools::execution::TokioProcessRunner,
    Result,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = "wixforge.toml";

/// Run the compile-and-link pipeline and translate the result into the
/// caller-visible build outcome.
pub async fn build(args: BuildArgs) -> Result<BuildOutcome> {
    let mut settings = load_settings(args.config.as_deref())?;
    apply_build_overrides(&mut settings, &args);

    let debug = settings.get_bool(keys::DEBUG_ENBL, false);
    let log = Arc::new(BuildLog::new(debug));
    log.debug(&format!("Debug logging enabled: {}", debug));

    let defines = match parse_defines(&args.defines) {
        Ok(defines) => defines,
        Err(err) => {
            log.severe(&err);
            return Ok(BuildOutcome::Failure);
        }
    };

    log.log("Detecting environment variables.");
    let environment: Vec<(String, String)> = std::env::vars().collect();
    log.log(&format!("Found {} source file argument(s).", args.sources.len()));

    let plan = BuildPlan {
        sources: args.sources.clone(),
        object_file: args.object_file.clone(),
        package_file: Some(settings.get_str(keys::MSI_PKG, MSI_PKG_DEFAULT_NAME)),
        defines,
        extensions: args.extensions.clone(),
        include_paths: args.include_paths.clone(),
        arch: args.arch,
        workdir: args.workdir.clone(),
        verbose_tools: args.verbose_tools,
        warnings_as_errors: args.warnings_as_errors,
        show_logo: args.show_logo,
    };

    let timeout = args
        .timeout_seconds
        .or_else(|| match settings.get_f64(keys::TIMEOUT_SECONDS, 0.0) {
            seconds if seconds > 0.0 => Some(seconds as u64),
            _ => None,
        });
    let runner = Arc::new(match timeout {
        Some(seconds) => TokioProcessRunner::with_timeout(Duration::from_secs(seconds)),
        None => TokioProcessRunner::new(),
    });

    log.log("Initializing tools.");
    let mark_unstable = settings.get_bool(keys::MARK_UNSTABLE, false);
    let mut toolset = match Toolset::new(settings, plan, environment, runner, log.clone()) {
        Ok(toolset) => toolset,
        Err(err) => {
            log.severe(&err);
            return Ok(BuildOutcome::Failure);
        }
    };

    log.log("Starting compile process.");
    match toolset.run().await {
        Ok(artifact) => {
            log.log(&format!("Created {}", artifact.display()));
            Ok(BuildOutcome::Success)
        }
        Err(err) => {
            log.severe(&err);
            if err.category == ErrorCategory::ToolFailure && mark_unstable {
                Ok(BuildOutcome::Unstable)
            } else {
                Ok(BuildOutcome::Failure)
            }
        }
    }
}

/// Validate that the configured installation directory contains the
/// toolchain executables.
pub async fn check(args: CheckArgs) -> Result<BuildOutcome> {
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(dir) = &args.install_dir {
        settings.set(keys::INST_PATH, dir.display());
    }

    let log = BuildLog::new(false);
    let configured = settings.get_str(keys::INST_PATH, "");
    if configured.is_empty() {
        log.log("Toolset not configured: no installation path given.");
        return Ok(BuildOutcome::Failure);
    }

    let directory = PathBuf::from(configured.trim_end_matches(['/', '\\']));
    if !directory.exists() {
        log.log(&format!("Directory does not exist: {}", directory.display()));
        return Ok(BuildOutcome::Failure);
    }

    let mut outcome = BuildOutcome::Success;
    for executable in [COMPILER, LINKER] {
        let path = directory.join(executable);
        if path.exists() {
            log.log(&format!("Found {}", path.display()));
        } else {
            log.log(&format!("Cannot find {} in {}", executable, directory.display()));
            outcome = BuildOutcome::Failure;
        }
    }
    Ok(outcome)
}

fn load_settings(config: Option<&Path>) -> Result<ToolsetSettings> {
    match config {
        Some(path) => {
            if !path.exists() {
                return Err(AppError::new(
                    ErrorCategory::ConfigurationError,
                    format!("settings file not found: {}", path.display()),
                )
                .with_code("WIX-CLI-001")
                .into());
            }
            Ok(ToolsetSettings::load(Some(path))?)
        }
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            Ok(ToolsetSettings::load(default.exists().then_some(default))?)
        }
    }
}

/// CLI flags overlay the settings file; boolean flags only override when
/// set so file-configured values survive an absent flag.
fn apply_build_overrides(settings: &mut ToolsetSettings, args: &BuildArgs) {
    if let Some(dir) = &args.install_dir {
        settings.set(keys::INST_PATH, dir.display());
    }
    if args.compile_only {
        settings.set(keys::COMPILE_ONLY, true);
    }
    if args.mark_unstable {
        settings.set(keys::MARK_UNSTABLE, true);
    }
    if args.env_as_params {
        settings.set(keys::ENBL_ENV_AS_PARAM, true);
    }
    if args.remote {
        settings.set(keys::USED_ON_SLAVE, true);
    }
    if args.debug {
        settings.set(keys::DEBUG_ENBL, true);
    }
    if let Some(names) = &args.reject {
        let existing = settings.get_str(keys::LOV_REJECTED, "");
        let combined = if existing.is_empty() {
            names.clone()
        } else {
            format!("{},{}", existing, names)
        };
        settings.set(keys::LOV_REJECTED, combined);
    }
    if let Some(output) = &args.output {
        settings.set(keys::MSI_PKG, output);
    }
}

fn parse_defines(raw: &[String]) -> std::result::Result<Vec<(String, String)>, AppError> {
    let mut defines = Vec::with_capacity(raw.len());
    for entry in raw {
        match entry.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => {
                defines.push((name.trim().to_string(), value.to_string()));
            }
            _ => {
                return Err(AppError::new(
                    ErrorCategory::ConfigurationError,
                    format!("invalid parameter definition '{}'; expected KEY=VALUE", entry),
                )
                .with_code("WIX-CLI-002"));
            }
        }
    }
    Ok(defines)
}
