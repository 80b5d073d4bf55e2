use crate::core::command::{ExtensionSet, ToolCommand};
use crate::core::env::{filter_environment, ParameterMap, RejectionList};
use crate::core::error::AppError;
use crate::core::settings::{keys, ToolsetSettings, EXTENSIONS, MSI_PKG_DEFAULT_NAME};
use crate::core::types::{Arch, BuildState, ErrorCategory, ToolKind};
use crate::logging::BuildLog;
use crate::tools::execution::ProcessRunner;
use crate::tools::{locate_tool, ToolLocation};
use crate::utils::{expand_env_vars, replace_extension};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Source descriptor extension.
pub const SOURCE_EXT: &str = ".wxs";
/// Compiled object extension.
pub const OBJECT_EXT: &str = ".wixobj";
/// Installer package extension.
pub const PACKAGE_EXT: &str = ".msi";

/// Everything one build invocation wants from the toolchain, gathered by the
/// CLI layer before the orchestrator is constructed.
#[derive(Debug, Clone, Default)]
pub struct BuildPlan {
    pub sources: Vec<PathBuf>,
    /// Explicit object file; derived from the first source when absent.
    pub object_file: Option<PathBuf>,
    /// Package name before environment expansion; falls back to the
    /// configured setting and then to the default name.
    pub package_file: Option<String>,
    pub defines: Vec<(String, String)>,
    pub extensions: Vec<String>,
    pub include_paths: Vec<PathBuf>,
    pub arch: Arch,
    pub workdir: Option<PathBuf>,
    pub verbose_tools: bool,
    pub warnings_as_errors: bool,
    pub show_logo: bool,
}

/// Sequences the compile and link invocations for one build.
///
/// Constructed fresh per build; holds the resolved tool locations, the
/// filtered parameter map, and the build state machine. Tool commands are
/// created per step and discarded, never reused across steps.
pub struct Toolset {
    settings: ToolsetSettings,
    plan: BuildPlan,
    environment: Vec<(String, String)>,
    parameters: ParameterMap,
    extensions: ExtensionSet,
    compiler: ToolLocation,
    linker: ToolLocation,
    state: BuildState,
    runner: Arc<dyn ProcessRunner>,
    log: Arc<BuildLog>,
}

impl Toolset {
    pub fn new(
        settings: ToolsetSettings,
        plan: BuildPlan,
        environment: Vec<(String, String)>,
        runner: Arc<dyn ProcessRunner>,
        log: Arc<BuildLog>,
    ) -> Result<Self, AppError> {
        let compiler = locate_tool(&settings, ToolKind::Compiler, &log)?;
        let linker = locate_tool(&settings, ToolKind::Linker, &log)?;
        log.log(if compiler.is_verified() {
            "Compiler found."
        } else {
            "Compiler check skipped."
        });
        log.log(if linker.is_verified() {
            "Linker found."
        } else {
            "Linker check skipped."
        });

        // Explicit user parameters first, filtered environment second;
        // first write wins on name collisions.
        let mut parameters = ParameterMap::new();
        for (name, value) in &plan.defines {
            parameters.insert(name, value);
        }
        let rejection = RejectionList::new(&settings.get_str(keys::LOV_REJECTED, ""));
        let forward = settings.get_bool(keys::ENBL_ENV_AS_PARAM, false);
        parameters.merge(filter_environment(&environment, &rejection, forward, &log));

        let mut extensions = ExtensionSet::new();
        for name in EXTENSIONS {
            if settings.get_bool(name, false) {
                extensions.add(name);
            }
        }
        for name in &plan.extensions {
            extensions.add(name);
        }

        Ok(Toolset {
            settings,
            plan,
            environment,
            parameters,
            extensions,
            compiler,
            linker,
            state: BuildState::Idle,
            runner,
            log,
        })
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    /// Run the whole pipeline described by the build plan: compile, then
    /// link unless compile-only is configured. Returns the final artifact.
    pub async fn run(&mut self) -> Result<PathBuf, AppError> {
        let sources = self.plan.sources.clone();
        let object_file = self.plan.object_file.clone();
        let object = self.compile(&sources, object_file.as_deref()).await?;

        if self.settings.get_bool(keys::COMPILE_ONLY, false) {
            self.log.log("Skipping link step.");
            self.state = BuildState::Done;
            return Ok(object);
        }

        let package = self.resolve_package_path();
        self.log
            .log(&format!("Linking to {}", package.display()));
        self.link(&[object], Some(&package)).await
    }

    /// Compile a set of source files into one object file. Invalid sources
    /// (wrong extension or missing) are logged and skipped; an empty
    /// remainder is a configuration error. The object path is the explicit
    /// `output` when given, otherwise derived from the first valid source.
    pub async fn compile(
        &mut self,
        sources: &[PathBuf],
        output: Option<&Path>,
    ) -> Result<PathBuf, AppError> {
        self.expect_state(BuildState::Idle, "compile")?;

        let valid = self.validate_files(sources, SOURCE_EXT, "source");
        if valid.is_empty() {
            return Err(AppError::new(
                ErrorCategory::ConfigurationError,
                "no valid source files to compile",
            )
            .with_code("WIX-TSET-001"));
        }
        self.state = BuildState::Compiling;

        let output = match output {
            Some(path) => path.to_path_buf(),
            None => replace_extension(&valid[0], SOURCE_EXT, OBJECT_EXT),
        };

        let mut command = self.tool_command(ToolKind::Compiler);
        for source in &valid {
            command.add_source_file(source);
        }
        command.set_output_file(&output);

        match self.execute(&command).await {
            Ok(()) => {
                self.log.log("Compiling successful.");
                self.state = BuildState::Compiled;
                Ok(output)
            }
            Err(err) => {
                self.log.log("Compiling failed.");
                self.state = BuildState::Failed;
                Err(err)
            }
        }
    }

    /// Link a set of object files into the installer package. The package
    /// path is the explicit `output` when given, otherwise derived from the
    /// first valid object file.
    pub async fn link(
        &mut self,
        objects: &[PathBuf],
        output: Option<&Path>,
    ) -> Result<PathBuf, AppError> {
        self.expect_state(BuildState::Compiled, "link")?;

        let valid = self.validate_files(objects, OBJECT_EXT, "object");
        if valid.is_empty() {
            self.state = BuildState::Failed;
            return Err(AppError::new(
                ErrorCategory::ConfigurationError,
                "no valid object files to link",
            )
            .with_code("WIX-TSET-002"));
        }
        self.state = BuildState::Linking;

        let output = match output {
            Some(path) => path.to_path_buf(),
            None => replace_extension(&valid[0], OBJECT_EXT, PACKAGE_EXT),
        };

        let mut command = self.tool_command(ToolKind::Linker);
        for object in &valid {
            command.add_source_file(object);
        }
        command.set_output_file(&output);

        match self.execute(&command).await {
            Ok(()) => {
                self.log.log("Linking successful.");
                self.state = BuildState::Done;
                Ok(output)
            }
            Err(err) => {
                self.log.log("Linking failed.");
                self.state = BuildState::Failed;
                Err(err)
            }
        }
    }

    async fn execute(&self, command: &ToolCommand) -> Result<(), AppError> {
        let line = command.command_line()?;
        self.log.debug(&format!("Executing command: {}", line));

        let result = self.runner.run(command, &self.log).await?;
        self.log
            .debug(&format!("Process finished with {}", result.exit_code));
        if result.failed() {
            let mut err = AppError::new(
                ErrorCategory::ToolFailure,
                format!("{} reported errors", command.kind()),
            )
            .with_code("WIX-TSET-003");
            err.add_context("exit_code", &result.exit_code.to_string());
            err.add_context("error_lines", &result.error_lines.to_string());
            err.add_context(
                "output",
                &serde_json::to_string(&result.lines).unwrap_or_default(),
            );
            return Err(err);
        }
        Ok(())
    }

    /// Fresh invocation for one step; architecture and include paths are
    /// only consumed by the compiler.
    fn tool_command(&self, kind: ToolKind) -> ToolCommand {
        let location = match kind {
            ToolKind::Compiler => &self.compiler,
            ToolKind::Linker => &self.linker,
        };
        let mut command = ToolCommand::new(kind, location.path().to_path_buf());
        command.set_arch(self.plan.arch);
        command.set_parameters(self.parameters.clone());
        for extension in self.extensions.iter() {
            command.add_extension(extension);
        }
        for include in &self.plan.include_paths {
            command.add_include_path(include);
        }
        command.set_nologo(!self.plan.show_logo);
        command.set_verbose(self.plan.verbose_tools);
        command.set_wxall(self.plan.warnings_as_errors);
        if let Some(dir) = &self.plan.workdir {
            command.set_workdir(dir);
        }
        for (name, value) in self.parameters.iter() {
            command.insert_env(name, value);
        }
        command
    }

    fn resolve_package_path(&self) -> PathBuf {
        let configured = self
            .plan
            .package_file
            .clone()
            .unwrap_or_else(|| self.settings.get_str(keys::MSI_PKG, MSI_PKG_DEFAULT_NAME));
        let expanded = expand_env_vars(&configured, &self.environment);
        match &self.plan.workdir {
            Some(dir) => dir.join(expanded),
            None => PathBuf::from(expanded),
        }
    }

    fn validate_files(&self, files: &[PathBuf], extension: &str, role: &str) -> Vec<PathBuf> {
        let mut valid = Vec::new();
        for file in files {
            let name = file.display().to_string();
            if name.ends_with(extension) && file.exists() {
                self.log.debug(&format!("adding {} file: {}", role, name));
                valid.push(file.clone());
            } else {
                self.log.log(&format!("no valid {} file: {}", role, name));
            }
        }
        valid
    }

    fn expect_state(&self, expected: BuildState, operation: &str) -> Result<(), AppError> {
        if self.state != expected {
            return Err(AppError::new(
                ErrorCategory::InternalError,
                format!(
                    "{} requested in state {:?}, expected {:?}",
                    operation, self.state, expected
                ),
            )
            .with_code("WIX-TSET-004"));
        }
        Ok(())
    }
}
