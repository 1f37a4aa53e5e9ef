use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a symbol database
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Symbol database not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read symbol database {}: {error}", path.display())]
    Read { path: PathBuf, error: String },

    #[error("Failed to parse symbol database {}: {error}", path.display())]
    Parse { path: PathBuf, error: String },

    #[error("Invalid fixed symbol entry '{entry}': expected <symbol>=<header>[,<header>...]")]
    InvalidFixedEntry { entry: String },
}
