use thiserror::Error;

use crate::config::ConfigError;
use crate::fixer::QueryError;
use crate::format::FormatError;
use crate::index::IndexError;
use crate::project::CompilationDatabaseError;

/// Top-level error of the include-fixer command line tool
#[derive(Debug, Error)]
pub enum IncludeFixerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Symbol database error: {0}")]
    Index(#[from] IndexError),

    #[error("Compilation database error: {0}")]
    CompilationDatabase(#[from] CompilationDatabaseError),

    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("Formatting error: {0}")]
    Format(#[from] FormatError),

    #[error("Invalid event stream {path}: {error}")]
    Events { path: String, error: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
