//! Core SymbolInfo representation
//!
//! A symbol index entry: the declared name, its kind, the header that
//! declares it and the chain of enclosing scopes it lives in.

use serde::{Deserialize, Serialize};

/// Kind of a declared symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Function,
    Class,
    Variable,
    TypedefName,
    EnumDecl,
    EnumConstantDecl,
    Macro,
    Unknown,
}

/// Kind of an enclosing declaration context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextKind {
    Namespace,
    Record,
    EnumDecl,
}

/// One enclosing scope of a symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolContext {
    pub kind: ContextKind,
    pub name: String,
}

impl SymbolContext {
    pub fn new(kind: ContextKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    pub fn namespace(name: impl Into<String>) -> Self {
        Self::new(ContextKind::Namespace, name)
    }
}

/// A symbol candidate as stored in a symbol index
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolInfo {
    /// Unqualified symbol name
    pub name: String,

    /// Symbol kind (function, class, variable, etc.)
    pub kind: SymbolKind,

    /// Declaring header, raw as stored in the index (may be `"..."`/`<...>` wrapped)
    pub file_path: String,

    /// Line of the declaration inside `file_path`
    #[serde(default)]
    pub line: u32,

    /// Enclosing scopes, innermost first
    #[serde(default)]
    pub contexts: Vec<SymbolContext>,

    /// How often the symbol is used across the indexed code base
    #[serde(default)]
    pub occurrence_count: u32,
}

impl SymbolInfo {
    /// Create a new SymbolInfo
    pub fn new(
        name: impl Into<String>,
        kind: SymbolKind,
        file_path: impl Into<String>,
        line: u32,
        contexts: Vec<SymbolContext>,
        occurrence_count: u32,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            file_path: file_path.into(),
            line,
            contexts,
            occurrence_count,
        }
    }

    /// Copy of this symbol pointing at a different header spelling
    pub fn with_file_path(&self, file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            ..self.clone()
        }
    }

    /// Fully qualified name, e.g. `a::b::Foo` for contexts `[b, a]`
    pub fn qualified_name(&self) -> String {
        let mut qualified = String::new();
        for context in self.contexts.iter().rev() {
            qualified.push_str(&context.name);
            qualified.push_str("::");
        }
        qualified.push_str(&self.name);
        qualified
    }
}
