//! Symbol index client
//!
//! - **SymbolIndex**: request/response search interface over a symbol store
//! - **JsonSymbolIndex**: symbol database loaded from a JSON file
//! - **FixedSymbolIndex**: small in-memory database from `name=header` pairs
//! - **SymbolIndexManager**: qualified-name search and ranking across backends

pub mod error;
pub mod fixed_index;
pub mod json_index;
pub mod manager;
pub mod traits;

pub use error::IndexError;
pub use fixed_index::FixedSymbolIndex;
pub use json_index::JsonSymbolIndex;
pub use manager::SymbolIndexManager;
pub use traits::SymbolIndex;

#[cfg(test)]
pub use traits::MockSymbolIndex;
