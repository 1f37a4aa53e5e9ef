use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::index::{IndexError, SymbolIndex};
use crate::symbol::SymbolInfo;

/// Symbol database backed by a JSON file
///
/// The file holds a JSON array of `SymbolInfo` records. Symbols are grouped
/// by unqualified name at load time so that searches are a single lookup.
#[derive(Debug, Default)]
pub struct JsonSymbolIndex {
    path: Option<PathBuf>,
    symbols: HashMap<String, Vec<SymbolInfo>>,
}

impl JsonSymbolIndex {
    /// Load and parse the symbol database at `path`
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        if !path.exists() {
            return Err(IndexError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let file = std::fs::File::open(path).map_err(|e| IndexError::Read {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let reader = std::io::BufReader::new(file);
        let symbols: Vec<SymbolInfo> =
            serde_json::from_reader(reader).map_err(|e| IndexError::Parse {
                path: path.to_path_buf(),
                error: e.to_string(),
            })?;

        debug!(
            "Loaded {} symbols from database {}",
            symbols.len(),
            path.display()
        );

        let mut index = Self::from_symbols(symbols);
        index.path = Some(path.to_path_buf());
        Ok(index)
    }

    /// Build an index from already-parsed symbols
    pub fn from_symbols(symbols: impl IntoIterator<Item = SymbolInfo>) -> Self {
        let mut grouped: HashMap<String, Vec<SymbolInfo>> = HashMap::new();
        for symbol in symbols {
            grouped.entry(symbol.name.clone()).or_default().push(symbol);
        }
        Self {
            path: None,
            symbols: grouped,
        }
    }

    /// Path of the database file, if loaded from disk
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of symbols in the database
    pub fn symbol_count(&self) -> usize {
        self.symbols.values().map(Vec::len).sum()
    }
}

impl SymbolIndex for JsonSymbolIndex {
    fn search(&self, name: &str) -> Vec<SymbolInfo> {
        self.symbols.get(name).cloned().unwrap_or_default()
    }
}
