//! Scope resolver
//!
//! Turns raw parser events into `SymbolQuery` values: recovers the full
//! (possibly qualified) name from the source text and derives the namespace
//! qualifier from the enclosing scopes.

use tracing::{debug, warn};

use crate::fixer::events::{IncompleteType, LexicalScope, UnresolvedIdentifier};
use crate::fixer::query::SymbolQuery;
use crate::symbol::Range;

/// Join named namespace scopes (innermost first) into `outer::inner::`
pub fn scope_qualifier(scopes: &[LexicalScope]) -> String {
    scopes
        .iter()
        .rev()
        .filter(|scope| scope.is_named_namespace())
        .map(|scope| format!("{}::", scope.name))
        .collect()
}

fn is_identifier_body(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Whether `name` is a plain identifier (not an operator or conversion name)
fn is_identifier(name: &str) -> bool {
    let mut bytes = name.bytes();
    matches!(bytes.next(), Some(first) if first.is_ascii_alphabetic() || first == b'_')
        && bytes.all(is_identifier_body)
}

/// Builds queries for one main file and remembers the last coalesced span
#[derive(Debug)]
pub struct ScopeResolver<'a> {
    source: &'a str,
    covered: Option<Range>,
}

impl<'a> ScopeResolver<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            covered: None,
        }
    }

    /// Build the query for an unresolved identifier, or `None` if the event
    /// must be ignored
    pub fn resolve_identifier(&mut self, event: &UnresolvedIdentifier) -> Option<SymbolQuery> {
        if !event.location.in_main_file {
            debug!(
                "Ignoring '{}' at offset {}: not written in the main file",
                event.name, event.location.offset
            );
            return None;
        }

        if event.name.is_empty() {
            warn!("Ignoring unresolved identifier without a name at offset {}", event.location.offset);
            return None;
        }

        let qualifier = event.qualifier_range.filter(|range| range.length > 0);
        let start = qualifier.map_or(event.location.offset, |range| range.offset);

        // A long nested name arrives as several adjacent fragments; everything
        // after the first fragment is already part of its coalesced span.
        if let Some(covered) = self.covered
            && covered.contains(start)
        {
            debug!(
                "Ignoring '{}' at offset {}: inside already queried span {}",
                event.name, start, covered
            );
            return None;
        }

        let Some(token_end) = event.location.offset.checked_add(event.name.len()) else {
            warn!("Identifier '{}' overflows the source offsets", event.name);
            return None;
        };

        let spanned = if qualifier.is_some()
            || (is_identifier(&event.name) && !event.location.from_macro)
        {
            self.coalesce(start, token_end)
        } else {
            let range = Range::new(event.location.offset, event.name.len());
            range
                .text(self.source)
                .map(|_| (event.name.clone(), range))
        };

        let Some((text, range)) = spanned else {
            warn!(
                "Ignoring '{}': span {}..{} is outside the source ({} bytes)",
                event.name,
                start,
                token_end,
                self.source.len()
            );
            return None;
        };

        self.covered = Some(range);
        Some(SymbolQuery::new(
            text,
            scope_qualifier(&event.enclosing_scopes),
            range,
        ))
    }

    /// Build the query for an incomplete type; its printed name is already
    /// fully qualified so no scope qualifier or replacement span applies
    pub fn resolve_incomplete_type(&self, event: &IncompleteType) -> Option<SymbolQuery> {
        let type_name = event.type_name.trim();
        if type_name.is_empty() {
            warn!("Ignoring incomplete type without a name at offset {}", event.location.offset);
            return None;
        }
        Some(SymbolQuery::new(type_name, "", Range::default()))
    }

    /// Span `start..token_end` extended forward over identifier characters
    /// and `:` so a nested name reported in fragments is read in one piece:
    ///
    /// ```text
    /// llvm::sys::path::parent_path(...)
    /// ^~~~~~~~~~~~~~~~~~~~~~~~~~~~ coalesced span
    /// ```
    fn coalesce(&self, start: usize, token_end: usize) -> Option<(String, Range)> {
        let bytes = self.source.as_bytes();
        if start > token_end || token_end > bytes.len() {
            return None;
        }

        let mut end = token_end;
        while end < bytes.len() && (is_identifier_body(bytes[end]) || bytes[end] == b':') {
            end += 1;
        }

        let range = Range::from_bounds(start, end)?;
        let text = range.text(self.source)?;
        Some((text.to_string(), range))
    }
}
