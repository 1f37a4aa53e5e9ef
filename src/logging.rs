use std::env;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_VAR: &str = "INCLUDE_FIXER_LOG_FILE";
const LOG_UNIQUE_VAR: &str = "INCLUDE_FIXER_LOG_UNIQUE";
const LOG_JSON_VAR: &str = "INCLUDE_FIXER_LOG_JSON";

/// Configuration for the logging system
///
/// Logs never go to stdout: stdout carries resolution results and edited
/// sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Log level filter (e.g., "debug", "info", "warn", "error")
    pub level: String,
    /// Optional log file path. If None, logs only to stderr
    pub file_path: Option<PathBuf>,
    /// Whether to use structured JSON format for logs
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: None,
            json_format: false,
        }
    }
}

/// Insert the process id before the extension: `fixer.log` -> `fixer.<pid>.log`
fn with_process_id(path: &Path, pid: u32) -> PathBuf {
    let Some(stem) = path.file_stem() else {
        return path.to_path_buf();
    };

    let unique_name = match path.extension().and_then(|ext| ext.to_str()) {
        Some(extension) if !extension.is_empty() => {
            format!("{}.{}.{}", stem.to_string_lossy(), pid, extension)
        }
        _ => format!("{}.{}", stem.to_string_lossy(), pid),
    };
    path.with_file_name(unique_name)
}

fn is_enabled(var: &str) -> bool {
    env::var(var).unwrap_or_default() == "true"
}

impl LogConfig {
    /// Create LogConfig from environment variables
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let file_path = env::var(LOG_FILE_VAR).ok().map(|path| {
            let path = PathBuf::from(path);
            if is_enabled(LOG_UNIQUE_VAR) {
                with_process_id(&path, std::process::id())
            } else {
                path
            }
        });

        Self {
            level,
            file_path,
            json_format: is_enabled(LOG_JSON_VAR),
        }
    }

    /// Override values from CLI arguments
    pub fn with_overrides(mut self, level: Option<String>, file_path: Option<PathBuf>) -> Self {
        if let Some(level) = level {
            self.level = level;
        }
        if let Some(file_path) = file_path {
            self.file_path = Some(file_path);
        }
        self
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Initialize the logging system based on configuration
pub fn init_logging(config: LogConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_new(&config.level).or_else(|_| EnvFilter::try_new("info"))?;
    let subscriber = tracing_subscriber::registry().with(env_filter);

    match (&config.file_path, config.json_format) {
        (Some(file_path), true) => {
            let file = open_log_file(file_path)?;
            subscriber
                .with(fmt::layer().json().with_writer(file).with_ansi(false))
                .init();
        }
        (Some(file_path), false) => {
            let file = open_log_file(file_path)?;
            subscriber
                .with(
                    fmt::layer()
                        .with_writer(file)
                        .with_ansi(false)
                        .with_target(true)
                        .with_line_number(true),
                )
                .init();
        }
        (None, true) => {
            subscriber
                .with(fmt::layer().json().with_writer(io::stderr).with_ansi(false))
                .init();
        }
        // Default: human readable on stderr
        (None, false) => {
            subscriber
                .with(fmt::layer().with_writer(io::stderr).with_target(true))
                .init();
        }
    }

    Ok(())
}

/// Log the outcome of one compilation unit as a single structured event
#[macro_export]
macro_rules! log_resolution {
    ($level:expr, $file:expr, $context:expr) => {{
        let context = &$context;
        tracing::event!(
            $level,
            file = %$file,
            query = %context.query,
            scope_qualifier = %context.scope_qualifier,
            candidates = context.candidates.len(),
            "Resolution finished"
        );
    }};
}
