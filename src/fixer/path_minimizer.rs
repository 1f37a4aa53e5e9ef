use tracing::{debug, warn};

use crate::header_search::HeaderSearch;

/// Wrap a raw header path in quotes unless it already carries `"`/`<`
pub fn quote_if_unwrapped(path: &str) -> String {
    if path.starts_with('"') || path.starts_with('<') {
        path.to_string()
    } else {
        format!("\"{path}\"")
    }
}

/// Rewrites candidate header paths into the shortest include spelling
/// reachable through the active search directories
pub struct PathMinimizer<'a> {
    header_search: &'a dyn HeaderSearch,
    enabled: bool,
}

impl<'a> PathMinimizer<'a> {
    pub fn new(header_search: &'a dyn HeaderSearch, enabled: bool) -> Self {
        Self {
            header_search,
            enabled,
        }
    }

    /// Minimize a wrapped include path (`"..."` or `<...>`)
    ///
    /// Paths that cannot be resolved to a file are returned unchanged.
    pub fn minimize(&self, include: &str) -> String {
        if !self.enabled {
            return include.to_string();
        }

        let stripped = include.trim_matches(|c| matches!(c, '"' | '<' | '>'));
        let Some(file) = self.header_search.resolve_to_file(stripped) else {
            warn!("Header {} not found on disk, keeping database spelling", include);
            return include.to_string();
        };

        let spelling = self.header_search.shortest_spelling(&file);
        let minimized = if spelling.is_system {
            format!("<{}>", spelling.path)
        } else {
            format!("\"{}\"", spelling.path)
        };
        debug!("Minimized {} to {}", include, minimized);
        minimized
    }
}
