//! I/O layer - file system abstraction used by header resolution

pub mod file_system;

pub use file_system::{FileSystemTrait, RealFileSystem};
