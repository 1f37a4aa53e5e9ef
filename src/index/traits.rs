use crate::symbol::SymbolInfo;

/// A symbol database that can be searched by name
///
/// Backends are keyed by the unqualified symbol name. Qualified lookups
/// (`a::b::Foo`) are layered on top by `SymbolIndexManager`, which also
/// implements this trait so the engine only ever talks to one client.
#[cfg_attr(test, mockall::automock)]
pub trait SymbolIndex {
    /// Return every symbol recorded under `name`
    fn search(&self, name: &str) -> Vec<SymbolInfo>;
}
