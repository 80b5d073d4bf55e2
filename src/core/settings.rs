use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Well-known executable file name of the compiler.
pub const COMPILER: &str = "candle.exe";
/// Well-known executable file name of the linker.
pub const LINKER: &str = "light.exe";
/// Package name used when no output name is configured.
pub const MSI_PKG_DEFAULT_NAME: &str = "setup.msi";

/// Settings keys shared between the CLI layer and the orchestrator.
pub mod keys {
    pub const INST_PATH: &str = "installation.path";
    pub const DEBUG_ENBL: &str = "debug";
    pub const COMPILE_ONLY: &str = "compile.only";
    pub const MARK_UNSTABLE: &str = "mark.unstable";
    pub const USED_ON_SLAVE: &str = "used.on.slave";
    pub const ENBL_ENV_AS_PARAM: &str = "env.as.param";
    pub const LOV_REJECTED: &str = "sys.env";
    pub const MSI_PKG: &str = "msi.package";
    pub const TIMEOUT_SECONDS: &str = "timeout.seconds";
}

/// Known toolchain extensions. Each name doubles as its settings key: a
/// boolean `true` under the name enables the matching `-ext` flag. The list
/// is iterated in this order when assembling commands.
pub const EXTENSIONS: &[&str] = &[
    "WixBalExtension",
    "WixUIExtension",
    "WixUtilExtension",
    "WixComPlusExtension",
    "WixDependencyExtension",
    "WixDifxAppExtension",
    "WixDirectXExtension",
    "WixFirewallExtension",
    "WixGamingExtension",
    "WixIIsExtension",
    "WixMsmqExtension",
    "WixNetFxExtension",
    "WixPSExtension",
    "WixSqlExtension",
    "WixTagExtension",
    "WixVSExtension",
];

/// Variable names excluded from parameter forwarding unless the user says
/// otherwise. Compared case-insensitively.
pub const DEFAULT_REJECTED: &[&str] = &["path", "commonprogramfiles"];

/// Schemaless key/value configuration store with typed accessors.
///
/// Values are kept as strings; the typed getters coerce on read and fall
/// back to the supplied default when the key is absent or malformed.
#[derive(Debug, Clone, Default)]
pub struct ToolsetSettings {
    values: HashMap<String, String>,
}

impl ToolsetSettings {
    pub fn new() -> Self {
        ToolsetSettings {
            values: HashMap::new(),
        }
    }

    /// Load settings from an optional TOML file. A missing file yields an
    /// empty store; a present but unparsable file is a configuration error.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let path = match path {
            Some(p) => p,
            None => return Ok(ToolsetSettings::new()),
        };
        if !path.exists() {
            return Ok(ToolsetSettings::new());
        }
        let text = fs::read_to_string(path).map_err(|err| {
            AppError::new(
                ErrorCategory::IoError,
                format!("failed to read settings file {}: {}", path.display(), err),
            )
            .with_code("WIX-CFG-001")
        })?;
        Self::from_toml_str(&text).map_err(|mut err| {
            err.add_context("file", &path.display().to_string());
            err
        })
    }

    /// Parse a TOML document into the store. Nested tables are flattened to
    /// dotted keys (`[installation] path = "…"` becomes `installation.path`);
    /// arrays of scalars are joined with commas.
    pub fn from_toml_str(text: &str) -> Result<Self, AppError> {
        let value: toml::Value = toml::from_str(text).map_err(|err| {
            AppError::new(
                ErrorCategory::ConfigurationError,
                format!("invalid settings syntax: {}", err),
            )
            .with_code("WIX-CFG-002")
        })?;
        let mut settings = ToolsetSettings::new();
        flatten_value("", &value, &mut settings.values)?;
        Ok(settings)
    }

    pub fn get_str(&self, key: &str, default: &str) -> String {
        match self.values.get(key) {
            Some(value) if !value.is_empty() => value.clone(),
            _ => default.to_string(),
        }
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.values.get(key) {
            Some(value) => value.trim().parse::<bool>().unwrap_or(default),
            None => default,
        }
    }

    pub fn get_f64(&self, key: &str, default: f64) -> f64 {
        match self.values.get(key) {
            Some(value) => value.trim().parse::<f64>().unwrap_or(default),
            None => default,
        }
    }

    pub fn set<V: fmt::Display>(&mut self, key: &str, value: V) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

fn flatten_value(
    prefix: &str,
    value: &toml::Value,
    out: &mut HashMap<String, String>,
) -> Result<(), AppError> {
    match value {
        toml::Value::Table(table) => {
            for (key, nested) in table {
                let full = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_value(&full, nested, out)?;
            }
            Ok(())
        }
        toml::Value::Array(items) => {
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                match scalar_to_string(item) {
                    Some(text) => parts.push(text),
                    None => {
                        return Err(AppError::new(
                            ErrorCategory::ConfigurationError,
                            format!("setting '{}' contains a non-scalar array element", prefix),
                        )
                        .with_code("WIX-CFG-003"));
                    }
                }
            }
            out.insert(prefix.to_string(), parts.join(","));
            Ok(())
        }
        other => {
            match scalar_to_string(other) {
                Some(text) => {
                    out.insert(prefix.to_string(), text);
                }
                None => {
                    return Err(AppError::new(
                        ErrorCategory::ConfigurationError,
                        format!("setting '{}' has an unsupported value type", prefix),
                    )
                    .with_code("WIX-CFG-003"));
                }
            }
            Ok(())
        }
    }
}

fn scalar_to_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Datetime(d) => Some(d.to_string()),
        _ => None,
    }
}
