//! Query coordinator for one compilation unit
//!
//! A `FixerSession` receives the parser's unresolved-symbol events, builds
//! queries through the `ScopeResolver` and looks them up in the symbol
//! index. Only the first event that yields candidates is kept: once one
//! include is missing the parser's error recovery produces a flood of
//! follow-up errors that would otherwise mask it.

use tracing::debug;

use crate::fixer::context::ResolutionContext;
use crate::fixer::events::{IncompleteType, ParserEvent, UnresolvedIdentifier};
use crate::fixer::path_minimizer::{PathMinimizer, quote_if_unwrapped};
use crate::fixer::query::{QueryError, SymbolQuery};
use crate::fixer::scope_resolver::ScopeResolver;
use crate::index::SymbolIndex;
use crate::symbol::SymbolInfo;

/// The first successful lookup of the unit
#[derive(Debug)]
struct Resolution {
    query: SymbolQuery,
    candidates: Vec<SymbolInfo>,
}

/// Per-unit resolution state; create a fresh session for every file
pub struct FixerSession<'a> {
    index: &'a dyn SymbolIndex,
    resolver: ScopeResolver<'a>,
    resolution: Option<Resolution>,
}

impl<'a> FixerSession<'a> {
    /// Start a session for the main file `source`
    pub fn new(source: &'a str, index: &'a dyn SymbolIndex) -> Self {
        Self {
            index,
            resolver: ScopeResolver::new(source),
            resolution: None,
        }
    }

    /// Whether a symbol has already been resolved in this unit
    pub fn is_resolved(&self) -> bool {
        self.resolution.is_some()
    }

    /// Dispatch one parser event
    pub fn handle_event(&mut self, event: &ParserEvent) -> Result<bool, QueryError> {
        match event {
            ParserEvent::UnresolvedIdentifier(identifier) => self.on_unresolved_identifier(identifier),
            ParserEvent::IncompleteType(incomplete) => self.on_incomplete_type(incomplete),
        }
    }

    /// Callback for identifiers the parser could not find
    pub fn on_unresolved_identifier(
        &mut self,
        event: &UnresolvedIdentifier,
    ) -> Result<bool, QueryError> {
        if self.is_resolved() {
            return Ok(false);
        }
        match self.resolver.resolve_identifier(event) {
            Some(query) => self.try_resolve(query),
            None => Ok(false),
        }
    }

    /// Callback for forward-declared types used where a complete type is needed
    pub fn on_incomplete_type(&mut self, event: &IncompleteType) -> Result<bool, QueryError> {
        if self.is_resolved() {
            return Ok(false);
        }
        match self.resolver.resolve_incomplete_type(event) {
            Some(query) => self.try_resolve(query),
            None => Ok(false),
        }
    }

    /// Look up `query`, first under its scope qualifier, then unqualified
    ///
    /// Returns `Ok(true)` when this query became the unit's resolution and
    /// `Ok(false)` when nothing matched or the unit was already resolved.
    pub fn try_resolve(&mut self, query: SymbolQuery) -> Result<bool, QueryError> {
        if query.name.is_empty() {
            return Err(QueryError::MalformedQuery { range: query.range });
        }

        // Skip other identifiers once one has been resolved successfully.
        if self.is_resolved() {
            return Ok(false);
        }

        debug!(
            "Looking up '{}' at {} (scope qualifiers: '{}')",
            query.name, query.range, query.scope_qualifier
        );

        // Mirror C++ name lookup: inside `namespace a { b::foo f; }` try
        // `a::b::foo` first, then fall back to `b::foo`.
        let mut candidates = self.index.search(&query.scoped_name());
        if candidates.is_empty() && !query.scope_qualifier.is_empty() {
            candidates = self.index.search(&query.name);
        }

        debug!("Having found {} symbols for '{}'", candidates.len(), query.name);
        if candidates.is_empty() {
            return Ok(false);
        }

        candidates.sort_by(|a, b| b.occurrence_count.cmp(&a.occurrence_count));
        self.resolution = Some(Resolution { query, candidates });
        Ok(true)
    }

    /// Close the unit and package its result with minimized header paths
    pub fn finish(self, minimizer: &PathMinimizer<'_>) -> ResolutionContext {
        let Some(Resolution { query, candidates }) = self.resolution else {
            return ResolutionContext::unresolved();
        };

        let candidates = candidates
            .iter()
            .map(|symbol| {
                let include = quote_if_unwrapped(&symbol.file_path);
                symbol.with_file_path(minimizer.minimize(&include))
            })
            .collect();

        ResolutionContext {
            query: query.name,
            scope_qualifier: query.scope_qualifier,
            candidates,
            range: query.range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixer::events::LexicalScope;
    use crate::header_search::MockHeaderSearch;
    use crate::index::{JsonSymbolIndex, MockSymbolIndex};
    use crate::symbol::{Range, SourceLocation, SymbolKind};

    // Auto-initialize logging for all tests in this module
    #[cfg(feature = "test-logging")]
    #[ctor::ctor]
    fn init_test_logging() {
        crate::test_utils::logging::init();
    }

    fn symbol(name: &str, path: &str, count: u32) -> SymbolInfo {
        SymbolInfo::new(name, SymbolKind::Class, path, 1, vec![], count)
    }

    fn no_minimization() -> MockHeaderSearch {
        let mut search = MockHeaderSearch::new();
        search.expect_resolve_to_file().never();
        search
    }

    #[test]
    fn test_foo_bar_scenario() {
        let source = "class Bar; Foo<Bar> foo;";
        let index = JsonSymbolIndex::from_symbols(vec![symbol("Foo", "foo.h", 3)]);
        let mut session = FixerSession::new(source, &index);

        let resolved = session
            .on_unresolved_identifier(&UnresolvedIdentifier::new("Foo", SourceLocation::main_file(11)))
            .unwrap();
        assert!(resolved);

        let search = no_minimization();
        let context = session.finish(&PathMinimizer::new(&search, false));

        assert_eq!(context.query, "Foo");
        assert_eq!(context.scope_qualifier, "");
        assert_eq!(context.range, Range::new(11, 3));
        assert_eq!(context.candidates.len(), 1);
        assert_eq!(context.candidates[0].file_path, "\"foo.h\"");
        assert_eq!(context.candidates[0].occurrence_count, 3);
    }

    #[test]
    fn test_first_resolution_wins() {
        let source = "Foo a; Bar b; Baz c;";
        let index = JsonSymbolIndex::from_symbols(vec![
            symbol("Foo", "foo.h", 1),
            symbol("Bar", "bar.h", 1),
            symbol("Baz", "baz.h", 1),
        ]);
        let mut session = FixerSession::new(source, &index);

        assert!(session.try_resolve(SymbolQuery::new("Foo", "", Range::new(0, 3))).unwrap());
        assert!(!session.try_resolve(SymbolQuery::new("Bar", "", Range::new(7, 3))).unwrap());
        assert!(
            !session
                .on_unresolved_identifier(&UnresolvedIdentifier::new("Baz", SourceLocation::main_file(14)))
                .unwrap()
        );

        let search = no_minimization();
        let context = session.finish(&PathMinimizer::new(&search, false));
        assert_eq!(context.query, "Foo");
        assert_eq!(context.range, Range::new(0, 3));
        assert_eq!(context.headers(), vec!["\"foo.h\""]);
    }

    #[test]
    fn test_unresolved_events_do_not_block_later_ones() {
        let source = "Missing m; Foo f;";
        let index = JsonSymbolIndex::from_symbols(vec![symbol("Foo", "foo.h", 1)]);
        let mut session = FixerSession::new(source, &index);

        assert!(
            !session
                .on_unresolved_identifier(&UnresolvedIdentifier::new("Missing", SourceLocation::main_file(0)))
                .unwrap()
        );
        assert!(!session.is_resolved());
        assert!(
            session
                .on_unresolved_identifier(&UnresolvedIdentifier::new("Foo", SourceLocation::main_file(11)))
                .unwrap()
        );

        let search = no_minimization();
        let context = session.finish(&PathMinimizer::new(&search, false));
        assert_eq!(context.query, "Foo");
        assert_eq!(context.range, Range::new(11, 3));
    }

    #[test]
    fn test_scoped_lookup_falls_back_to_bare_name() {
        let mut index = MockSymbolIndex::new();
        index
            .expect_search()
            .withf(|name| name == "a::b::X")
            .times(1)
            .returning(|_| Vec::new());
        index
            .expect_search()
            .withf(|name| name == "X")
            .times(1)
            .returning(|_| vec![SymbolInfo::new("X", SymbolKind::Class, "x.h", 1, vec![], 1)]);

        let mut session = FixerSession::new("", &index);
        assert!(session.try_resolve(SymbolQuery::new("X", "a::b::", Range::default())).unwrap());

        let search = no_minimization();
        let context = session.finish(&PathMinimizer::new(&search, false));
        assert_eq!(context.query, "X");
        assert_eq!(context.scope_qualifier, "a::b::");
        assert_eq!(context.headers(), vec!["\"x.h\""]);
    }

    #[test]
    fn test_scoped_match_skips_fallback() {
        let mut index = MockSymbolIndex::new();
        index
            .expect_search()
            .withf(|name| name == "a::X")
            .times(1)
            .returning(|_| vec![SymbolInfo::new("X", SymbolKind::Class, "ax.h", 1, vec![], 1)]);
        index.expect_search().withf(|name| name == "X").never();

        let source = "namespace a { X x; }";
        let mut session = FixerSession::new(source, &index);
        let event = UnresolvedIdentifier::new("X", SourceLocation::main_file(14))
            .with_scopes(vec![LexicalScope::namespace("a")]);

        assert!(session.on_unresolved_identifier(&event).unwrap());
    }

    #[test]
    fn test_unqualified_query_is_searched_once() {
        let mut index = MockSymbolIndex::new();
        index.expect_search().times(1).returning(|_| Vec::new());

        let mut session = FixerSession::new("", &index);
        assert!(!session.try_resolve(SymbolQuery::new("X", "", Range::default())).unwrap());
        assert!(!session.is_resolved());

        let search = no_minimization();
        assert_eq!(
            session.finish(&PathMinimizer::new(&search, false)),
            ResolutionContext::unresolved()
        );
    }

    #[test]
    fn test_empty_query_is_rejected() {
        let index = MockSymbolIndex::new();
        let mut session = FixerSession::new("", &index);

        assert_eq!(
            session.try_resolve(SymbolQuery::new("", "a::", Range::new(1, 0))),
            Err(QueryError::MalformedQuery {
                range: Range::new(1, 0)
            })
        );
    }

    #[test]
    fn test_candidates_are_ranked_by_occurrence() {
        let mut index = MockSymbolIndex::new();
        index.expect_search().returning(|_| {
            vec![
                SymbolInfo::new("Foo", SymbolKind::Class, "rare.h", 1, vec![], 1),
                SymbolInfo::new("Foo", SymbolKind::Class, "common.h", 1, vec![], 10),
                SymbolInfo::new("Foo", SymbolKind::Class, "also_rare.h", 1, vec![], 1),
            ]
        });

        let mut session = FixerSession::new("", &index);
        assert!(session.try_resolve(SymbolQuery::new("Foo", "", Range::default())).unwrap());

        let search = no_minimization();
        let context = session.finish(&PathMinimizer::new(&search, false));
        assert!(context.is_ambiguous());
        assert_eq!(
            context.headers(),
            vec!["\"common.h\"", "\"rare.h\"", "\"also_rare.h\""]
        );
    }

    #[test]
    fn test_incomplete_type_event() {
        let index = JsonSymbolIndex::from_symbols(vec![SymbolInfo::new(
            "Foo",
            SymbolKind::Class,
            "<a/foo.h>",
            1,
            vec![crate::symbol::SymbolContext::namespace("a")],
            1,
        )]);
        let manager = crate::index::SymbolIndexManager::new().with_index(Box::new(index));
        let mut session = FixerSession::new("", &manager);

        let event = ParserEvent::IncompleteType(IncompleteType {
            location: SourceLocation::main_file(0),
            type_name: "a::Foo".to_string(),
        });
        assert!(session.handle_event(&event).unwrap());

        let search = no_minimization();
        let context = session.finish(&PathMinimizer::new(&search, false));
        assert_eq!(context.query, "a::Foo");
        assert_eq!(context.range, Range::default());
        assert_eq!(context.headers(), vec!["<a/foo.h>"]);
    }

    #[test]
    fn test_zero_events_yield_unresolved_context() {
        let index = MockSymbolIndex::new();
        let session = FixerSession::new("int main() {}", &index);

        let search = no_minimization();
        let context = session.finish(&PathMinimizer::new(&search, true));
        assert!(!context.is_resolved());
    }
}
