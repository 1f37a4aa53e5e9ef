use serde::{Deserialize, Serialize};
use std::fmt;

/// Byte span inside the source text of the file under edit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub offset: usize,
    pub length: usize,
}

impl Range {
    pub fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    /// Range spanning `start..end`; `None` when `end < start`
    pub fn from_bounds(start: usize, end: usize) -> Option<Self> {
        end.checked_sub(start).map(|length| Self::new(start, length))
    }

    /// Exclusive end offset
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.length)
    }

    /// Whether `offset` falls inside this span (half-open)
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.offset && offset < self.end()
    }

    /// Text covered by this range, if it lies on character boundaries within `source`
    pub fn text<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.offset..self.offset.checked_add(self.length)?)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.offset, self.length)
    }
}

/// Location of a parser event, as reported by the front-end
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Byte offset into the main file's source text
    pub offset: usize,

    /// Whether the location is written in the file being edited
    #[serde(default = "default_in_main_file")]
    pub in_main_file: bool,

    /// Whether the token was produced by macro expansion
    #[serde(default)]
    pub from_macro: bool,
}

fn default_in_main_file() -> bool {
    true
}

impl SourceLocation {
    /// Location written directly in the main file
    pub fn main_file(offset: usize) -> Self {
        Self {
            offset,
            in_main_file: true,
            from_macro: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_bounds_and_contains() {
        let range = Range::new(4, 3);
        assert_eq!(range.end(), 7);
        assert!(range.contains(4));
        assert!(range.contains(6));
        assert!(!range.contains(7));
        assert!(!range.contains(3));

        assert_eq!(Range::from_bounds(2, 5), Some(Range::new(2, 3)));
        assert_eq!(Range::from_bounds(5, 2), None);
    }

    #[test]
    fn test_range_text_respects_source_bounds() {
        let source = "class Bar; Foo<Bar> foo;";
        assert_eq!(Range::new(11, 3).text(source), Some("Foo"));
        assert_eq!(Range::new(20, 10).text(source), None);
        assert_eq!(Range::new(usize::MAX, 1).text(source), None);

        // Offsets inside a multi-byte character are rejected
        assert_eq!(Range::new(1, 1).text("é"), None);
    }

    #[test]
    fn test_source_location_defaults_to_main_file() {
        let location: SourceLocation = serde_json::from_str(r#"{"offset": 11}"#).unwrap();
        assert_eq!(location, SourceLocation::main_file(11));
    }
}
