//! Symbol abstraction module
//!
//! Provides the index-side `SymbolInfo` record and the byte-offset locations
//! the engine uses to describe spans of the file under edit.

pub mod location;
mod symbol_info;

pub use location::{Range, SourceLocation};
pub use symbol_info::{ContextKind, SymbolContext, SymbolInfo, SymbolKind};
