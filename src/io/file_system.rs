//! File system abstraction layer
//!
//! Provides a trait-based view of the file system for header resolution,
//! enabling dependency injection and testing without touching the disk.

use std::path::Path;

// ============================================================================
// File System Trait
// ============================================================================

/// Trait for the file system queries header resolution needs
#[cfg_attr(test, mockall::automock)]
pub trait FileSystemTrait {
    /// Check if a regular file exists at the given path
    fn is_file(&self, path: &Path) -> bool;
}

// ============================================================================
// Real File System Implementation
// ============================================================================

/// Real file system implementation using std::fs
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystemTrait for RealFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

// ============================================================================
// Test File System Implementation
// ============================================================================


#[cfg(test)]
pub use test_filesystem::TestFileSystem;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_test_filesystem_reports_registered_files() {
        let fs = TestFileSystem::new().with_file("/usr/include/foo.h");

        assert!(fs.is_file(Path::new("/usr/include/foo.h")));
        assert!(!fs.is_file(Path::new("/usr/include/bar.h")));
    }

    #[test]
    fn test_real_filesystem_trait_implementation() {
        let fs = RealFileSystem;

        let non_existent = PathBuf::from("/definitely/does/not/exist.h");
        assert!(!fs.is_file(&non_existent));

        let dir = tempfile::tempdir().unwrap();
        assert!(!fs.is_file(dir.path()));

        let header = dir.path().join("header.h");
        std::fs::write(&header, "#pragma once\n").unwrap();
        assert!(fs.is_file(&header));
    }
}
