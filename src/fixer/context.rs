use serde::{Deserialize, Serialize};

use crate::symbol::{Range, SymbolInfo};

/// Final outcome of resolving one compilation unit
///
/// Candidates carry minimized header spellings and are ranked by occurrence
/// count, most used first. Picking one of several candidates is left to the
/// caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionContext {
    /// Symbol text that was looked up
    pub query: String,
    /// Scope qualifier the lookup was first attempted under
    pub scope_qualifier: String,
    /// Matching symbols
    pub candidates: Vec<SymbolInfo>,
    /// Span of the queried symbol in the main file
    pub range: Range,
}

impl ResolutionContext {
    /// Context for a unit in which no symbol could be resolved
    pub fn unresolved() -> Self {
        Self::default()
    }

    pub fn is_resolved(&self) -> bool {
        !self.candidates.is_empty()
    }

    /// Whether the candidates point at more than one distinct header
    pub fn is_ambiguous(&self) -> bool {
        self.headers().len() > 1
    }

    /// Distinct header spellings in candidate rank order
    pub fn headers(&self) -> Vec<&str> {
        let mut headers: Vec<&str> = Vec::new();
        for candidate in &self.candidates {
            if !headers.contains(&candidate.file_path.as_str()) {
                headers.push(&candidate.file_path);
            }
        }
        headers
    }
}
