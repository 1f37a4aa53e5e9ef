use std::path::{Component, Path, PathBuf};
use tracing::debug;

use crate::io::{FileSystemTrait, RealFileSystem};

// ============================================================================
// Header Search Trait
// ============================================================================

/// Shortest include spelling for a header file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSpelling {
    /// Path relative to the matching search directory, `/`-separated
    pub path: String,
    /// Whether the matching directory is a system search path
    pub is_system: bool,
}

/// Header search and file resolution as configured for one compilation
#[cfg_attr(test, mockall::automock)]
pub trait HeaderSearch {
    /// Resolve an unwrapped header path to a concrete file on disk
    fn resolve_to_file(&self, path: &str) -> Option<PathBuf>;

    /// Shortest spelling of `file` expressible through the search directories
    fn shortest_spelling(&self, file: &Path) -> HeaderSpelling;
}

// ============================================================================
// Search Directories
// ============================================================================

/// Search directory category, in lookup priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SearchDirKind {
    /// `-iquote`
    Quoted,
    /// `-I`
    Angled,
    /// `-isystem`
    System,
    /// `-idirafter`
    After,
}

impl SearchDirKind {
    pub fn is_system(self) -> bool {
        matches!(self, SearchDirKind::System | SearchDirKind::After)
    }
}

/// A single include search directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchDirectory {
    pub path: PathBuf,
    pub kind: SearchDirKind,
}

/// Compiler flags that introduce a search directory
const SEARCH_DIR_FLAGS: &[(&str, SearchDirKind)] = &[
    ("--include-directory=", SearchDirKind::Angled),
    ("-iquote", SearchDirKind::Quoted),
    ("-isystem", SearchDirKind::System),
    ("-idirafter", SearchDirKind::After),
    ("-I", SearchDirKind::Angled),
];

/// Lexically normalise a path: drop `.` and fold `..` into its parent
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

// ============================================================================
// Header Search Paths
// ============================================================================

/// Ordered include search directories plus the working directory used to
/// resolve relative header paths
#[derive(Debug, Clone)]
pub struct HeaderSearchPaths<F: FileSystemTrait = RealFileSystem> {
    directories: Vec<SearchDirectory>,
    working_directory: PathBuf,
    filesystem: F,
}

impl HeaderSearchPaths<RealFileSystem> {
    /// Empty search configuration on the real file system
    pub fn new(working_directory: impl Into<PathBuf>) -> Self {
        Self::with_filesystem(working_directory, RealFileSystem)
    }
}

impl<F: FileSystemTrait> HeaderSearchPaths<F> {
    /// Empty search configuration on a custom file system
    pub fn with_filesystem(working_directory: impl Into<PathBuf>, filesystem: F) -> Self {
        Self {
            directories: Vec::new(),
            working_directory: working_directory.into(),
            filesystem,
        }
    }

    /// Add search directories from compiler arguments
    ///
    /// Both joined (`-Iinclude`) and separate (`-I include`) forms are accepted.
    /// Relative directories are resolved against `directory`, the directory
    /// the compile command runs in.
    pub fn with_arguments(mut self, arguments: &[String], directory: &Path) -> Self {
        let mut args = arguments.iter();
        while let Some(arg) = args.next() {
            let Some((flag, kind)) = SEARCH_DIR_FLAGS
                .iter()
                .find(|(flag, _)| arg.starts_with(flag))
            else {
                continue;
            };

            let value = &arg[flag.len()..];
            let dir = if value.is_empty() {
                match args.next() {
                    Some(next) => next.as_str(),
                    None => break,
                }
            } else {
                value
            };

            self = self.with_directory(directory.join(dir), *kind);
        }
        self
    }

    /// Add a single search directory; duplicates keep their first registration
    pub fn with_directory(mut self, path: impl AsRef<Path>, kind: SearchDirKind) -> Self {
        let path = normalize_path(path.as_ref());
        if self.directories.iter().any(|d| d.path == path) {
            return self;
        }

        // Stable insertion keeps command-line order within each kind
        let position = self
            .directories
            .iter()
            .position(|d| d.kind > kind)
            .unwrap_or(self.directories.len());
        self.directories
            .insert(position, SearchDirectory { path, kind });
        self
    }

    /// Search directories in lookup priority order
    pub fn directories(&self) -> &[SearchDirectory] {
        &self.directories
    }
}

impl<F: FileSystemTrait> HeaderSearch for HeaderSearchPaths<F> {
    fn resolve_to_file(&self, path: &str) -> Option<PathBuf> {
        let path = Path::new(path);
        let candidate = if path.is_absolute() {
            normalize_path(path)
        } else {
            normalize_path(&self.working_directory.join(path))
        };

        if self.filesystem.is_file(&candidate) {
            Some(candidate)
        } else {
            debug!("Header {} does not resolve to a file", candidate.display());
            None
        }
    }

    fn shortest_spelling(&self, file: &Path) -> HeaderSpelling {
        let file = normalize_path(file);

        for directory in &self.directories {
            if let Ok(relative) = file.strip_prefix(&directory.path) {
                let path = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                if path.is_empty() {
                    continue;
                }
                return HeaderSpelling {
                    path,
                    is_system: directory.kind.is_system(),
                };
            }
        }

        HeaderSpelling {
            path: file.to_string_lossy().to_string(),
            is_system: false,
        }
    }
}
