use std::path::Path;
use tracing::debug;

use crate::format::{FormatError, FormatStyle, Formatter, INSERT_AT_INCLUDES, Replacement};

/// Turns a chosen header spelling into the replacement set inserting it
pub struct EditBuilder<'a> {
    formatter: &'a dyn Formatter,
    style: FormatStyle,
}

impl<'a> EditBuilder<'a> {
    pub fn new(formatter: &'a dyn Formatter, style: FormatStyle) -> Self {
        Self { formatter, style }
    }

    /// Build the replacements inserting `#include <header>` into `source`
    ///
    /// `header` must already be wrapped in quotes or angle brackets. An empty
    /// header yields no replacements. The insertion point is left to the
    /// formatter, which also drops the insertion when the include exists.
    pub fn build_insertion(
        &self,
        source: &str,
        file_path: &Path,
        header: &str,
    ) -> Result<Vec<Replacement>, FormatError> {
        if header.is_empty() {
            return Ok(Vec::new());
        }

        let insertion = Replacement::insertion(
            file_path,
            INSERT_AT_INCLUDES,
            format!("#include {header}\n"),
        );
        debug!("Requesting insertion of {} into {}", header, file_path.display());

        self.formatter
            .apply_and_cleanup(source, &[insertion], &self.style)
    }
}
