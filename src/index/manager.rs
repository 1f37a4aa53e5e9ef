use std::collections::HashSet;
use tracing::debug;

use crate::index::SymbolIndex;
use crate::symbol::{ContextKind, SymbolInfo};

/// Searches a set of symbol databases with C++ qualified-name semantics
///
/// Backends only know unqualified names. The manager splits `a::b::Foo`
/// into segments, looks up `Foo` and keeps the symbols whose enclosing
/// contexts end with `a::b`. Results are deduplicated and ranked by
/// occurrence count, most used first; equal counts keep the order in which
/// the backends returned them.
#[derive(Default)]
pub struct SymbolIndexManager {
    indices: Vec<Box<dyn SymbolIndex>>,
}

impl SymbolIndexManager {
    /// Create a manager without any backends
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a backend; earlier backends win ties in ranking
    pub fn with_index(mut self, index: Box<dyn SymbolIndex>) -> Self {
        self.indices.push(index);
        self
    }

    /// Add a backend to an existing manager
    pub fn add_index(&mut self, index: Box<dyn SymbolIndex>) {
        self.indices.push(index);
    }

    /// Number of registered backends
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    fn search_backends(&self, name: &str) -> Vec<SymbolInfo> {
        self.indices
            .iter()
            .flat_map(|index| index.search(name))
            .collect()
    }
}

/// Match the qualifier segments (outermost first) against a symbol's contexts
/// (innermost first). Unscoped enum contexts may be skipped since their
/// enumerators are visible in the enclosing scope.
fn contexts_match(symbol: &SymbolInfo, qualifiers: &[&str], fully_qualified: bool) -> bool {
    let mut contexts = symbol.contexts.iter().peekable();
    let mut remaining = qualifiers.iter().rev().peekable();

    while let (Some(qualifier), Some(context)) = (remaining.peek(), contexts.peek()) {
        if context.name == **qualifier {
            remaining.next();
            contexts.next();
        } else if context.kind == ContextKind::EnumDecl {
            contexts.next();
        } else {
            return false;
        }
    }

    if remaining.peek().is_some() {
        return false;
    }

    // `::a::Foo` must name the symbol from the global scope.
    !fully_qualified || contexts.peek().is_none()
}

impl SymbolIndex for SymbolIndexManager {
    fn search(&self, identifier: &str) -> Vec<SymbolInfo> {
        let fully_qualified = identifier.starts_with("::");
        let mut names: Vec<&str> = identifier.split("::").collect();
        if fully_qualified {
            names.remove(0);
        }

        let mut results = Vec::new();

        // As long as nothing is found keep stripping name parts from the end,
        // so `llvm::sys::path::parent_path` still finds `llvm::sys::path`.
        while results.is_empty() {
            let Some((&name, qualifiers)) = names.split_last() else {
                break;
            };

            if !name.is_empty() {
                for symbol in self.search_backends(name) {
                    if symbol.name == name && contexts_match(&symbol, qualifiers, fully_qualified) {
                        results.push(symbol);
                    }
                }
            }

            names.pop();
        }

        // The same declaration listed by two backends may differ in line or
        // count; the first backend's record is kept.
        let mut seen = HashSet::new();
        results.retain(|symbol| {
            seen.insert((
                symbol.name.clone(),
                symbol.kind,
                symbol.file_path.clone(),
                symbol.contexts.clone(),
            ))
        });
        results.sort_by(|a, b| b.occurrence_count.cmp(&a.occurrence_count));

        debug!(
            "Symbol index search for '{}' matched {} symbols",
            identifier,
            results.len()
        );
        results
    }
}
