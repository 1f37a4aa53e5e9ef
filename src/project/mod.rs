//! Compilation database discovery and lookup

pub mod compilation_database;

pub use compilation_database::{
    CompilationDatabase, CompilationDatabaseError, locate_compilation_database,
};
