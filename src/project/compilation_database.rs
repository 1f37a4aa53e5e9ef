use json_compilation_db::Entry;
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::header_search::search_paths::normalize_path;

/// File name looked for when no compilation database is configured
pub const COMPILATION_DATABASE_NAME: &str = "compile_commands.json";

#[derive(Error, Debug)]
pub enum CompilationDatabaseError {
    #[error("Compilation database file not found: {path}")]
    FileNotFound { path: String },
    #[error("Failed to read compilation database file: {error}")]
    ReadError { error: String },
    #[error("Failed to parse compilation database JSON: {error}")]
    ParseError { error: String },
    #[error("Compilation database is empty")]
    EmptyDatabase,
}

/// Parsed compile_commands.json, used to recover the include search
/// directories of the file under edit
#[derive(Debug)]
pub struct CompilationDatabase {
    /// Path to the compilation database file
    pub path: PathBuf,
    /// Parsed entries, in file order
    pub entries: Vec<Entry>,
}

impl CompilationDatabase {
    /// Load and parse the compilation database at `path`
    pub fn new(path: PathBuf) -> Result<Self, CompilationDatabaseError> {
        if !path.exists() {
            return Err(CompilationDatabaseError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            });
        }

        let file = std::fs::File::open(&path).map_err(|e| CompilationDatabaseError::ReadError {
            error: e.to_string(),
        })?;

        let reader = std::io::BufReader::new(file);
        let entries: Vec<Entry> =
            serde_json::from_reader(reader).map_err(|e| CompilationDatabaseError::ParseError {
                error: e.to_string(),
            })?;

        if entries.is_empty() {
            return Err(CompilationDatabaseError::EmptyDatabase);
        }

        debug!(
            "Loaded {} compile commands from {}",
            entries.len(),
            path.display()
        );
        Ok(Self { path, entries })
    }

    /// Get the number of entries in the compilation database
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Get the path to the compilation database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// First entry compiling `source_file`
    ///
    /// Entry files may be relative to their `directory`; `source_file` may be
    /// relative to `working_directory`. Both are compared in normalised
    /// absolute form.
    pub fn entry_for(&self, source_file: &Path, working_directory: &Path) -> Option<&Entry> {
        let wanted = normalize_path(&working_directory.join(source_file));
        self.entries
            .iter()
            .find(|entry| normalize_path(&entry.directory.join(&entry.file)) == wanted)
    }
}

/// Only the path is serialized, never the entries
impl Serialize for CompilationDatabase {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.path.serialize(serializer)
    }
}

/// Search `root` for a compile_commands.json, at most `depth` directories deep
///
/// Shallower databases win; within one level the walk order decides.
/// Hidden directories are skipped.
pub fn locate_compilation_database(root: &Path, depth: usize) -> Option<PathBuf> {
    // +1 because walkdir counts root as depth 0 and the file sits one below
    let walker = WalkDir::new(root)
        .max_depth(depth + 1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.starts_with('.'))
        });

    let mut found: Option<(usize, PathBuf)> = None;
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Failed to access directory entry: {}", e);
                continue;
            }
        };

        if entry.file_type().is_file()
            && entry.file_name() == COMPILATION_DATABASE_NAME
            && found.as_ref().is_none_or(|(depth, _)| entry.depth() < *depth)
        {
            found = Some((entry.depth(), entry.into_path()));
        }
    }

    let found = found.map(|(_, path)| path);
    match &found {
        Some(path) => debug!("Found compilation database {}", path.display()),
        None => debug!("No compilation database under {}", root.display()),
    }
    found
}
