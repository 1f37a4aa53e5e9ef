//! Parser event model
//!
//! A front-end adapter reports lookups that failed during parsing through
//! these events. They are plain data so any parser can produce them, and
//! serializable so an adapter can hand them over as a JSON stream.

use serde::{Deserialize, Serialize};

use crate::symbol::{Range, SourceLocation};

/// Kind of an enclosing lexical scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    Namespace,
    Record,
    Function,
    Block,
}

/// One enclosing scope of an unresolved identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexicalScope {
    pub kind: ScopeKind,
    /// Empty for anonymous scopes
    #[serde(default)]
    pub name: String,
}

impl LexicalScope {
    pub fn namespace(name: impl Into<String>) -> Self {
        Self {
            kind: ScopeKind::Namespace,
            name: name.into(),
        }
    }

    pub fn anonymous_namespace() -> Self {
        Self::namespace("")
    }

    /// Named namespaces are the only scopes that qualify a lookup
    pub fn is_named_namespace(&self) -> bool {
        self.kind == ScopeKind::Namespace && !self.name.is_empty()
    }
}

/// An identifier the parser could not find
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedIdentifier {
    /// Identifier or name text as the parser reports it
    pub name: String,
    /// Location of the identifier token
    pub location: SourceLocation,
    /// Enclosing scopes, innermost first
    #[serde(default)]
    pub enclosing_scopes: Vec<LexicalScope>,
    /// Explicit `a::b::` qualifier written right before the identifier
    #[serde(default)]
    pub qualifier_range: Option<Range>,
}

impl UnresolvedIdentifier {
    pub fn new(name: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            name: name.into(),
            location,
            enclosing_scopes: Vec::new(),
            qualifier_range: None,
        }
    }

    pub fn with_scopes(mut self, enclosing_scopes: Vec<LexicalScope>) -> Self {
        self.enclosing_scopes = enclosing_scopes;
        self
    }

    pub fn with_qualifier(mut self, qualifier_range: Range) -> Self {
        self.qualifier_range = Some(qualifier_range);
        self
    }
}

/// A type that was required to be complete but only has a forward declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncompleteType {
    pub location: SourceLocation,
    /// Fully qualified printed type name, e.g. `a::b::Foo`
    pub type_name: String,
}

/// Events a front-end adapter forwards into a `FixerSession`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ParserEvent {
    UnresolvedIdentifier(UnresolvedIdentifier),
    IncompleteType(IncompleteType),
}
