//! Header search and file resolution
//!
//! Models the include search directories of one compilation so that a
//! header found through the symbol index can be spelled the way an
//! `#include` in the edited file would reach it.

pub mod search_paths;

pub use search_paths::{
    HeaderSearch, HeaderSearchPaths, HeaderSpelling, SearchDirKind, SearchDirectory,
};

#[cfg(test)]
pub use search_paths::MockHeaderSearch;
