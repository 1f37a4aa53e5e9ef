use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::format::FormatError;

/// Offset sentinel asking the formatter to place an insertion at the end of
/// the include block (or the top of the file when there is none)
pub const INSERT_AT_INCLUDES: usize = usize::MAX;

/// A textual edit: replace `length` bytes at `offset` of `file_path` with `text`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    pub file_path: PathBuf,
    pub offset: usize,
    pub length: usize,
    pub text: String,
}

impl Replacement {
    pub fn new(
        file_path: impl Into<PathBuf>,
        offset: usize,
        length: usize,
        text: impl Into<String>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            offset,
            length,
            text: text.into(),
        }
    }

    /// Pure insertion at `offset`
    pub fn insertion(file_path: impl Into<PathBuf>, offset: usize, text: impl Into<String>) -> Self {
        Self::new(file_path, offset, 0, text)
    }

    /// Whether the offset still needs to be chosen by the formatter
    pub fn is_include_insertion(&self) -> bool {
        self.offset == INSERT_AT_INCLUDES
    }

    /// Exclusive end offset of the replaced span
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.length)
    }
}

/// Sort replacements by offset and check them against `source`
///
/// Every replacement must lie within the source, start and end on character
/// boundaries and not overlap its neighbours. Insertions at the same offset
/// keep their relative order.
pub fn validate_replacements(
    source: &str,
    replacements: &[Replacement],
) -> Result<Vec<Replacement>, FormatError> {
    let mut sorted = replacements.to_vec();
    sorted.sort_by_key(|r| r.offset);

    for replacement in &sorted {
        let invalid = |reason: &str| FormatError::InvalidReplacement {
            offset: replacement.offset,
            length: replacement.length,
            reason: reason.to_string(),
        };

        if replacement.is_include_insertion() {
            return Err(invalid("unresolved include insertion point"));
        }
        if replacement.end() > source.len() {
            return Err(invalid("range exceeds source length"));
        }
        if !source.is_char_boundary(replacement.offset) || !source.is_char_boundary(replacement.end())
        {
            return Err(invalid("range splits a character"));
        }
    }

    for pair in sorted.windows(2) {
        if pair[1].offset < pair[0].end() {
            return Err(FormatError::OverlappingReplacements {
                first: pair[0].offset,
                second: pair[1].offset,
            });
        }
    }

    Ok(sorted)
}

/// Apply replacements to `source`, producing the edited text
pub fn apply_replacements(source: &str, replacements: &[Replacement]) -> Result<String, FormatError> {
    let sorted = validate_replacements(source, replacements)?;

    let mut result = String::with_capacity(source.len());
    let mut cursor = 0;
    for replacement in &sorted {
        result.push_str(&source[cursor..replacement.offset]);
        result.push_str(&replacement.text);
        cursor = replacement.end();
    }
    result.push_str(&source[cursor..]);
    Ok(result)
}
