//! Test utilities and global setup
//!
//! Provides centralized test logging configuration and on-disk fixtures.

/// Test logging utilities
#[cfg(all(test, feature = "test-logging"))]
pub mod logging {
    use std::sync::Once;
    use tracing_subscriber::{EnvFilter, fmt};

    static INIT: Once = Once::new();

    /// Initialize test logging globally - safe to call multiple times
    ///
    /// Respects `RUST_LOG` (default: `debug`) and writes through the test
    /// writer so output is captured per test.
    ///
    /// ```bash
    /// RUST_LOG=include_fixer::fixer=trace cargo test --features test-logging
    /// ```
    pub fn init() {
        INIT.call_once(|| {
            let env_filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

            fmt()
                .with_env_filter(env_filter)
                .with_test_writer()
                .with_target(true)
                .compact()
                .try_init()
                .ok();
        });
    }
}

/// Temporary source trees for tests touching the real file system
#[cfg(test)]
pub mod fixtures {
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Directory tree removed on drop
    pub struct TestTree {
        _temp_dir: TempDir,
        pub root: PathBuf,
    }

    impl TestTree {
        pub fn new() -> Result<Self, std::io::Error> {
            let temp_dir = TempDir::new()?;
            let root = temp_dir.path().to_path_buf();
            Ok(Self {
                _temp_dir: temp_dir,
                root,
            })
        }

        /// Write `content` to `relative`, creating parent directories
        pub fn write(&self, relative: &str, content: &str) -> Result<PathBuf, std::io::Error> {
            let path = self.root.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, content)?;
            Ok(path)
        }

        pub fn path(&self) -> &Path {
            &self.root
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_tree_write_creates_parents() {
            let tree = TestTree::new().unwrap();
            let path = tree.write("include/net/socket.h", "#pragma once\n").unwrap();

            assert!(path.starts_with(tree.path()));
            assert_eq!(fs::read_to_string(path).unwrap(), "#pragma once\n");
        }
    }
}
