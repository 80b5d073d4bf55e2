use crate::core::env::{escape_parameter_value, ParameterMap};
use crate::core::error::AppError;
use crate::core::types::{Arch, ErrorCategory, ToolKind};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Ordered set of toolchain extension names. Insertion order is preserved
/// in the emitted arguments; duplicates are ignored.
#[derive(Debug, Clone, Default)]
pub struct ExtensionSet {
    names: Vec<String>,
}

impl ExtensionSet {
    pub fn new() -> Self {
        ExtensionSet { names: Vec::new() }
    }

    pub fn add(&mut self, name: &str) {
        if !self.names.iter().any(|existing| existing == name) {
            self.names.push(name.to_string());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One argument token. `Quoted` tokens are file paths that the rendered
/// command line wraps in double quotes; the token handed to the process
/// launcher stays bare either way.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Arg {
    Plain(String),
    Quoted(String),
}

impl Arg {
    fn raw(&self) -> &str {
        match self {
            Arg::Plain(value) | Arg::Quoted(value) => value,
        }
    }

    fn rendered(&self) -> String {
        match self {
            Arg::Plain(value) => value.clone(),
            Arg::Quoted(value) => format!("\"{}\"", value),
        }
    }
}

/// One invocation of an external toolchain executable.
///
/// Accumulates configuration through the setters and produces the ordered
/// argument list on demand. The list is assembled fresh on every call, so a
/// command can be built, inspected and rebuilt without argument
/// accumulation. Architecture and include paths only apply to the compiler.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    kind: ToolKind,
    executable: PathBuf,
    workdir: Option<PathBuf>,
    env: HashMap<String, String>,
    arch: Arch,
    extensions: ExtensionSet,
    parameters: ParameterMap,
    include_paths: Vec<PathBuf>,
    nologo: bool,
    verbose: bool,
    wxall: bool,
    output_file: Option<PathBuf>,
    source_files: Vec<PathBuf>,
}

impl ToolCommand {
    pub fn new(kind: ToolKind, executable: PathBuf) -> Self {
        ToolCommand {
            kind,
            executable,
            workdir: None,
            env: HashMap::new(),
            arch: Arch::default(),
            extensions: ExtensionSet::new(),
            parameters: ParameterMap::new(),
            include_paths: Vec::new(),
            nologo: true,
            verbose: false,
            wxall: false,
            output_file: None,
            source_files: Vec::new(),
        }
    }

    pub fn kind(&self) -> ToolKind {
        self.kind
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn workdir(&self) -> Option<&Path> {
        self.workdir.as_deref()
    }

    pub fn env(&self) -> &HashMap<String, String> {
        &self.env
    }

    pub fn output_file(&self) -> Option<&Path> {
        self.output_file.as_deref()
    }

    pub fn set_workdir(&mut self, dir: &Path) {
        self.workdir = Some(dir.to_path_buf());
    }

    /// Overlay a variable onto the child process environment.
    pub fn insert_env(&mut self, name: &str, value: &str) {
        self.env.insert(name.to_string(), value.to_string());
    }

    pub fn add_source_file(&mut self, path: &Path) {
        self.source_files.push(path.to_path_buf());
    }

    /// Define a preprocessor parameter. First write wins.
    pub fn add_parameter(&mut self, name: &str, value: &str) {
        self.parameters.insert(name, value);
    }

    /// Replace the parameter map wholesale (used by the orchestrator after
    /// environment filtering).
    pub fn set_parameters(&mut self, parameters: ParameterMap) {
        self.parameters = parameters;
    }

    pub fn add_extension(&mut self, name: &str) {
        self.extensions.add(name);
    }

    /// Add to the compiler's include search path. Ignored by the linker.
    pub fn add_include_path(&mut self, path: &Path) {
        self.include_paths.push(path.to_path_buf());
    }

    pub fn set_output_file(&mut self, path: &Path) {
        self.output_file = Some(path.to_path_buf());
    }

    pub fn set_arch(&mut self, arch: Arch) {
        self.arch = arch;
    }

    /// Skip printing logo information (default: true).
    pub fn set_nologo(&mut self, nologo: bool) {
        self.nologo = nologo;
    }

    /// Verbose tool output (default: false).
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Treat all warnings as errors (default: false).
    pub fn set_wxall(&mut self, wxall: bool) {
        self.wxall = wxall;
    }

    /// Bare argument vector handed to the process launcher. Does not include
    /// the executable itself.
    pub fn build_args(&self) -> Result<Vec<String>, AppError> {
        Ok(self.assemble()?.iter().map(|a| a.raw().to_string()).collect())
    }

    /// Argument list rendered for the build log, with the output and source
    /// paths wrapped in quotes. Does not include the executable.
    pub fn render_args(&self) -> Result<String, AppError> {
        let rendered: Vec<String> = self.assemble()?.iter().map(Arg::rendered).collect();
        Ok(rendered.join(" "))
    }

    /// Full command line rendered for the build log.
    pub fn command_line(&self) -> Result<String, AppError> {
        Ok(format!(
            "{} {}",
            self.executable.display(),
            self.render_args()?
        ))
    }

    fn assemble(&self) -> Result<Vec<Arg>, AppError> {
        self.check()?;
        let mut args = Vec::new();

        if self.kind == ToolKind::Compiler {
            args.push(Arg::Plain("-arch".to_string()));
            args.push(Arg::Plain(self.arch.as_flag().to_string()));
        }
        for extension in self.extensions.iter() {
            args.push(Arg::Plain("-ext".to_string()));
            args.push(Arg::Plain(extension.to_string()));
        }
        for (name, value) in self.parameters.iter() {
            args.push(Arg::Plain(format!(
                "-d{}=\"{}\"",
                name,
                escape_parameter_value(value)
            )));
        }
        if self.kind == ToolKind::Compiler {
            for include in &self.include_paths {
                args.push(Arg::Plain("-I".to_string()));
                args.push(Arg::Quoted(include.display().to_string()));
            }
        }
        if self.nologo {
            args.push(Arg::Plain("-nologo".to_string()));
        }
        if self.verbose {
            args.push(Arg::Plain("-v".to_string()));
        }
        if self.wxall {
            args.push(Arg::Plain("-wxall".to_string()));
        }
        let output = self.output_file.as_ref().ok_or_else(|| {
            AppError::new(
                ErrorCategory::ConfigurationError,
                "missing output filename",
            )
            .with_code("WIX-CMD-002")
        })?;
        if output.as_os_str().is_empty() {
            return Err(AppError::new(
                ErrorCategory::ConfigurationError,
                "output filename is empty",
            )
            .with_code("WIX-CMD-002"));
        }
        args.push(Arg::Plain("-out".to_string()));
        args.push(Arg::Quoted(output.display().to_string()));
        for source in &self.source_files {
            if source.as_os_str().is_empty() {
                return Err(AppError::new(
                    ErrorCategory::ConfigurationError,
                    "source file list contains an empty path",
                )
                .with_code("WIX-CMD-003"));
            }
            args.push(Arg::Quoted(source.display().to_string()));
        }

        Ok(args)
    }

    fn check(&self) -> Result<(), AppError> {
        if self.source_files.is_empty() {
            return Err(AppError::new(
                ErrorCategory::ConfigurationError,
                "missing source files",
            )
            .with_code("WIX-CMD-001"));
        }
        Ok(())
    }
}
