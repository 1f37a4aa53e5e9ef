use std::collections::HashMap;

use crate::index::{IndexError, SymbolIndex};
use crate::symbol::{SymbolContext, SymbolInfo, SymbolKind};

/// In-memory symbol database built from `<symbol>=<header>[,<header>...]` entries
///
/// Multiple entries are separated by semicolons. Headers listed earlier for
/// the same symbol rank higher. A qualified symbol such as `a::b::Foo` is
/// recorded as `Foo` inside namespaces `b` and `a`.
#[derive(Debug, Default)]
pub struct FixedSymbolIndex {
    symbols: HashMap<String, Vec<SymbolInfo>>,
}

impl FixedSymbolIndex {
    /// Parse a `;`-separated list of entries
    pub fn parse(input: &str) -> Result<Self, IndexError> {
        Self::from_entries(input.split(';').filter(|entry| !entry.trim().is_empty()))
    }

    /// Build the index from individual `<symbol>=<headers>` entries
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a str>) -> Result<Self, IndexError> {
        let mut symbols: HashMap<String, Vec<SymbolInfo>> = HashMap::new();

        for entry in entries {
            let invalid = || IndexError::InvalidFixedEntry {
                entry: entry.to_string(),
            };

            let (qualified, headers) = entry.split_once('=').ok_or_else(invalid)?;
            let qualified = qualified.trim().trim_start_matches("::");
            let headers: Vec<&str> = headers
                .split(',')
                .map(str::trim)
                .filter(|h| !h.is_empty())
                .collect();
            if qualified.is_empty() || headers.is_empty() {
                return Err(invalid());
            }

            let mut segments: Vec<&str> = qualified.split("::").collect();
            let name = segments.pop().unwrap_or_default();
            let contexts: Vec<SymbolContext> = segments
                .into_iter()
                .rev()
                .map(SymbolContext::namespace)
                .collect();

            let count = headers.len();
            for (rank, header) in headers.into_iter().enumerate() {
                symbols.entry(name.to_string()).or_default().push(SymbolInfo::new(
                    name,
                    SymbolKind::Unknown,
                    header,
                    1,
                    contexts.clone(),
                    (count - rank) as u32,
                ));
            }
        }

        Ok(Self { symbols })
    }
}

impl SymbolIndex for FixedSymbolIndex {
    fn search(&self, name: &str) -> Vec<SymbolInfo> {
        self.symbols.get(name).cloned().unwrap_or_default()
    }
}
