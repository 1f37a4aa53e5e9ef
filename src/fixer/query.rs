use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::symbol::Range;

/// Caller contract violations detected by the query coordinator
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Malformed query: empty identifier at {range}")]
    MalformedQuery { range: Range },
}

/// A lookup request built from one unresolved-symbol event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolQuery {
    /// Identifier text, possibly qualified (`llvm::sys::path`)
    pub name: String,
    /// Enclosing named namespaces, outermost first, each followed by `::`
    pub scope_qualifier: String,
    /// Span of the identifier in the main file
    pub range: Range,
}

impl SymbolQuery {
    pub fn new(name: impl Into<String>, scope_qualifier: impl Into<String>, range: Range) -> Self {
        Self {
            name: name.into(),
            scope_qualifier: scope_qualifier.into(),
            range,
        }
    }

    /// Query string including the scope qualifier, tried first
    pub fn scoped_name(&self) -> String {
        format!("{}{}", self.scope_qualifier, self.name)
    }
}
