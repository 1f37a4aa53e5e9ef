use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = ".include-fixer.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read configuration file {}: {error}", path.display())]
    Read { path: PathBuf, error: String },

    #[error("Failed to parse configuration file {}: {error}", path.display())]
    Parse { path: PathBuf, error: String },
}

/// Settings shared by all subcommands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixerConfig {
    /// Rewrite candidate headers to their shortest include spelling
    pub minimize_include_paths: bool,
    /// Style name used for include placement (`llvm`, `google`, ..., `none`)
    pub style: String,
    /// JSON symbol databases, searched in order
    pub symbol_databases: Vec<PathBuf>,
    /// `name=header1,header2` entries served without a database
    pub fixed_symbols: Vec<String>,
    /// compile_commands.json providing the include search directories
    pub compile_commands: Option<PathBuf>,
    /// Extra compiler flags, e.g. `-Iinclude` or `-isystem /opt/sdk/include`
    pub extra_args: Vec<String>,
}

impl Default for FixerConfig {
    fn default() -> Self {
        Self {
            minimize_include_paths: true,
            style: "llvm".to_string(),
            symbol_databases: Vec::new(),
            fixed_symbols: Vec::new(),
            compile_commands: None,
            extra_args: Vec::new(),
        }
    }
}

/// Values given on the command line; `Some`/non-empty entries win
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub style: Option<String>,
    pub no_minimize: bool,
    pub symbol_databases: Vec<PathBuf>,
    pub fixed_symbols: Vec<String>,
    pub compile_commands: Option<PathBuf>,
    pub extra_args: Vec<String>,
}

impl FixerConfig {
    /// Parse the configuration file at `path`
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config = serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load an explicit configuration file, or `.include-fixer.json` from
    /// `working_directory` when present, or the defaults
    pub fn load(explicit: Option<&Path>, working_directory: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let default_path = working_directory.join(CONFIG_FILE_NAME);
        if default_path.is_file() {
            Self::from_file(&default_path)
        } else {
            debug!("No {} in {}, using defaults", CONFIG_FILE_NAME, working_directory.display());
            Ok(Self::default())
        }
    }

    /// Apply command line overrides
    ///
    /// Scalar values are replaced, list values are appended after the
    /// configured ones.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(style) = overrides.style {
            self.style = style;
        }
        if overrides.no_minimize {
            self.minimize_include_paths = false;
        }
        if let Some(compile_commands) = overrides.compile_commands {
            self.compile_commands = Some(compile_commands);
        }
        self.symbol_databases.extend(overrides.symbol_databases);
        self.fixed_symbols.extend(overrides.fixed_symbols);
        self.extra_args.extend(overrides.extra_args);
        self
    }
}
