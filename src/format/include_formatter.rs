//! Include-aware cleanup of replacement sets
//!
//! Resolves the `INSERT_AT_INCLUDES` sentinel to a concrete offset inside
//! the existing include blocks, drops insertions of headers that are already
//! included and validates the final replacement set against the source.

use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

use crate::format::replacement::validate_replacements;
use crate::format::{FormatError, FormatStyle, Replacement};

// ============================================================================
// Formatter Trait
// ============================================================================

/// Formatter collaborator: merges replacements into the source cleanly
#[cfg_attr(test, mockall::automock)]
pub trait Formatter {
    /// Turn `replacements` into a concrete, validated replacement set for `source`
    fn apply_and_cleanup(
        &self,
        source: &str,
        replacements: &[Replacement],
        style: &FormatStyle,
    ) -> Result<Vec<Replacement>, FormatError>;
}

// ============================================================================
// Source Scanning
// ============================================================================

/// An `#include` directive found in the source
#[derive(Debug, Clone, PartialEq, Eq)]
struct IncludeDirective {
    /// Wrapped header spelling, e.g. `"foo.h"` or `<vector>`
    header: String,
    /// Offset of the first byte of the directive's line
    line_start: usize,
    /// Offset just past the line, including its newline
    line_end: usize,
}

impl IncludeDirective {
    fn is_angled(&self) -> bool {
        self.header.starts_with('<')
    }
}

/// Lines of `source` with their start offsets; each line keeps its `\n`
fn lines_with_offsets(source: &str) -> impl Iterator<Item = (usize, &str)> {
    source.split_inclusive('\n').scan(0, |offset, line| {
        let start = *offset;
        *offset += line.len();
        Some((start, line))
    })
}

/// Block comment state carried from line to line
#[derive(Debug, Default)]
struct CommentTracker {
    /// Offset of the `/*` that opened the current block comment
    open_at: Option<usize>,
}

impl CommentTracker {
    fn in_comment(&self) -> bool {
        self.open_at.is_some()
    }

    /// Advance over one chunk of text starting at `start`
    ///
    /// Returns true when the chunk holds anything besides comments and
    /// whitespace.
    fn scan(&mut self, start: usize, text: &str) -> bool {
        let bytes = text.as_bytes();
        let mut has_code = false;
        let mut i = 0;
        while i < bytes.len() {
            if self.open_at.is_some() {
                if bytes[i..].starts_with(b"*/") {
                    self.open_at = None;
                    i += 2;
                } else {
                    i += 1;
                }
                continue;
            }

            match bytes[i] {
                b'/' if bytes.get(i + 1) == Some(&b'/') => break,
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    self.open_at = Some(start + i);
                    i += 2;
                }
                quote @ (b'"' | b'\'') => {
                    has_code = true;
                    i += 1;
                    while i < bytes.len() && bytes[i] != quote && bytes[i] != b'\n' {
                        if bytes[i] == b'\\' {
                            i += 1;
                        }
                        i += 1;
                    }
                    i += 1;
                }
                byte => {
                    has_code |= !byte.is_ascii_whitespace();
                    i += 1;
                }
            }
        }
        has_code
    }
}

/// Words of a preprocessor directive line (`#  pragma once` -> `[pragma, once]`)
fn directive_words(line: &str) -> Option<Vec<&str>> {
    line.trim()
        .strip_prefix('#')
        .map(|rest| rest.split_whitespace().collect())
}

/// Offset right after leading comments, blank lines and a header guard
fn leading_insertion_point(source: &str) -> usize {
    let mut lines = lines_with_offsets(source).peekable();
    let mut tracker = CommentTracker::default();
    let mut offset = 0;

    while let Some(&(start, line)) = lines.peek() {
        if tracker.scan(start, line) {
            break;
        }
        offset = start + line.len();
        lines.next();
    }

    let Some((start, line)) = lines.next() else {
        return offset;
    };
    match directive_words(line).as_deref() {
        Some(["pragma", "once"]) => start + line.len(),
        Some(["ifndef", guard]) => match lines.next() {
            Some((define_start, define_line))
                if directive_words(define_line).as_deref() == Some(&["define", *guard][..]) =>
            {
                define_start + define_line.len()
            }
            _ => offset,
        },
        _ => offset,
    }
}

/// Include directives of a source file
#[derive(Debug, Default)]
struct IncludeScan {
    /// Every include outside comments, in file order
    includes: Vec<IncludeDirective>,
    /// How many of `includes` precede the first line of code
    leading: usize,
}

impl IncludeScan {
    /// Includes at the top of the file, the only valid insertion anchors
    fn leading_includes(&self) -> &[IncludeDirective] {
        &self.includes[..self.leading]
    }
}

// ============================================================================
// Include Cleanup Formatter
// ============================================================================

/// Formatter that places include insertions among the existing includes
#[derive(Debug, Clone)]
pub struct IncludeCleanupFormatter {
    include_regex: Regex,
}

impl IncludeCleanupFormatter {
    /// Create a formatter with compiled directive patterns
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            // #include "foo.h" / #  include <vector> / #import <Foundation.h>
            include_regex: Regex::new(
                r#"^[ \t]*#[ \t]*(?:include_next|include|import)[ \t]*([<"][^>"\n]+[>"])"#,
            )?,
        })
    }

    /// Wrapped header named by an include directive line
    fn parse_header<'a>(&self, line: &'a str) -> Option<regex::Match<'a>> {
        self.include_regex
            .captures(line)
            .and_then(|captures| captures.get(1))
    }

    /// All include directives outside comments
    ///
    /// The leading region ends at the first line that is neither a
    /// preprocessor directive (or its continuation), a comment nor blank.
    fn scan_includes(&self, source: &str) -> Result<IncludeScan, FormatError> {
        let mut scan = IncludeScan::default();
        let mut tracker = CommentTracker::default();
        let mut in_leading_region = true;
        let mut continued = false;

        for (start, line) in lines_with_offsets(source) {
            let starts_in_comment = tracker.in_comment();
            let mut rest_from = 0;
            if !starts_in_comment
                && let Some(header) = self.parse_header(line)
            {
                scan.includes.push(IncludeDirective {
                    header: header.as_str().to_string(),
                    line_start: start,
                    line_end: start + line.len(),
                });
                if in_leading_region {
                    scan.leading = scan.includes.len();
                }
                rest_from = header.end();
            }

            let has_code = tracker.scan(start + rest_from, &line[rest_from..]);
            let is_directive = !starts_in_comment && line.trim_start().starts_with('#');
            if has_code && !is_directive && !continued {
                in_leading_region = false;
            }
            continued = (is_directive || continued) && line.trim_end().ends_with('\\');
        }

        match tracker.open_at {
            Some(offset) => Err(FormatError::UnterminatedComment { offset }),
            None => Ok(scan),
        }
    }

    /// Offset at which `header` should be inserted among the leading `includes`
    fn insertion_point(
        source: &str,
        includes: &[IncludeDirective],
        header: &str,
        style: &FormatStyle,
    ) -> usize {
        let angled = header.starts_with('<');
        let same_kind: Vec<(usize, &IncludeDirective)> = includes
            .iter()
            .enumerate()
            .filter(|(_, include)| include.is_angled() == angled)
            .collect();

        let Some(&(_, last_same)) = same_kind.last() else {
            return match includes.last() {
                Some(last) => last.line_end,
                None => leading_insertion_point(source),
            };
        };

        if !style.sort_includes {
            return last_same.line_end;
        }

        // Sort into the first block holding includes of the same kind. A
        // block is a run of include directives on consecutive lines.
        let (first_index, _) = same_kind[0];
        let mut block_start = first_index;
        while block_start > 0 && includes[block_start - 1].line_end == includes[block_start].line_start {
            block_start -= 1;
        }
        let mut block_end = first_index;
        while block_end + 1 < includes.len()
            && includes[block_end].line_end == includes[block_end + 1].line_start
        {
            block_end += 1;
        }

        let block_same_kind: Vec<&IncludeDirective> = includes[block_start..=block_end]
            .iter()
            .filter(|include| include.is_angled() == angled)
            .collect();

        if let Some(next) = block_same_kind
            .iter()
            .find(|include| include.header.as_str() > header)
        {
            return next.line_start;
        }
        block_same_kind
            .last()
            .map(|include| include.line_end)
            .unwrap_or(last_same.line_end)
    }
}

impl Default for IncludeCleanupFormatter {
    fn default() -> Self {
        Self::new().expect("Failed to compile include directive pattern")
    }
}

impl Formatter for IncludeCleanupFormatter {
    fn apply_and_cleanup(
        &self,
        source: &str,
        replacements: &[Replacement],
        style: &FormatStyle,
    ) -> Result<Vec<Replacement>, FormatError> {
        let scan = self.scan_includes(source)?;
        let mut inserted = HashSet::new();
        let mut cleaned = Vec::with_capacity(replacements.len());

        for replacement in replacements {
            if !replacement.is_include_insertion() {
                cleaned.push(replacement.clone());
                continue;
            }

            let header = self
                .parse_header(&replacement.text)
                .map(|m| m.as_str().to_string())
                .ok_or_else(|| FormatError::InvalidHeader {
                    text: replacement.text.clone(),
                })?;

            if scan.includes.iter().any(|include| include.header == header)
                || !inserted.insert(header.clone())
            {
                debug!("Header {} is already included, skipping insertion", header);
                continue;
            }

            let offset = Self::insertion_point(source, scan.leading_includes(), &header, style);
            let text = if offset > 0 && !source[..offset].ends_with('\n') {
                format!("\n{}", replacement.text)
            } else {
                replacement.text.clone()
            };

            debug!("Inserting {} at offset {}", header, offset);
            cleaned.push(Replacement::insertion(
                replacement.file_path.clone(),
                offset,
                text,
            ));
        }

        validate_replacements(source, &cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{INSERT_AT_INCLUDES, apply_replacements};

    fn insert(source: &str, header: &str, style: &FormatStyle) -> Result<String, FormatError> {
        let formatter = IncludeCleanupFormatter::default();
        let replacement = Replacement::insertion(
            "test.cc",
            INSERT_AT_INCLUDES,
            format!("#include {header}\n"),
        );
        let cleaned = formatter.apply_and_cleanup(source, &[replacement], style)?;
        apply_replacements(source, &cleaned)
    }

    #[test]
    fn test_insert_into_file_without_includes() {
        let result = insert("class Bar; Foo<Bar> foo;\n", "\"foo.h\"", &FormatStyle::default());
        assert_eq!(result.unwrap(), "#include \"foo.h\"\nclass Bar; Foo<Bar> foo;\n");
    }

    #[test]
    fn test_insert_after_header_comment_and_guard() {
        let source = "// Copyright\n/* multi\n   line */\n#ifndef FOO_H\n#define FOO_H\nint x;\n#endif\n";
        let result = insert(source, "<vector>", &FormatStyle::default()).unwrap();
        assert_eq!(
            result,
            "// Copyright\n/* multi\n   line */\n#ifndef FOO_H\n#define FOO_H\n#include <vector>\nint x;\n#endif\n"
        );
    }

    #[test]
    fn test_insert_after_pragma_once() {
        let result = insert("#pragma once\nint x;\n", "\"a.h\"", &FormatStyle::default()).unwrap();
        assert_eq!(result, "#pragma once\n#include \"a.h\"\nint x;\n");
    }

    #[test]
    fn test_mismatched_guard_is_not_skipped() {
        let source = "#ifndef A\n#define B\n";
        let result = insert(source, "\"a.h\"", &FormatStyle::default()).unwrap();
        assert_eq!(result, "#include \"a.h\"\n#ifndef A\n#define B\n");
    }

    #[test]
    fn test_sorted_insertion_within_block() {
        let source = "#include \"a.h\"\n#include \"c.h\"\n\nint x;\n";
        let result = insert(source, "\"b.h\"", &FormatStyle::default()).unwrap();
        assert_eq!(result, "#include \"a.h\"\n#include \"b.h\"\n#include \"c.h\"\n\nint x;\n");
    }

    #[test]
    fn test_sorted_insertion_keeps_kind_groups() {
        let source = "#include \"z.h\"\n\n#include <map>\n#include <vector>\n";
        let result = insert(source, "<string>", &FormatStyle::default()).unwrap();
        assert_eq!(
            result,
            "#include \"z.h\"\n\n#include <map>\n#include <string>\n#include <vector>\n"
        );
    }

    #[test]
    fn test_unsorted_style_appends_after_same_kind() {
        let source = "#include \"c.h\"\n#include <map>\n#include \"a.h\"\n";
        let style = FormatStyle::from_name("none").unwrap();
        let result = insert(source, "\"b.h\"", &style).unwrap();
        assert_eq!(result, "#include \"c.h\"\n#include <map>\n#include \"a.h\"\n#include \"b.h\"\n");
    }

    #[test]
    fn test_new_kind_goes_after_last_include() {
        let source = "#include \"a.h\"\nint x;\n";
        let result = insert(source, "<vector>", &FormatStyle::default()).unwrap();
        assert_eq!(result, "#include \"a.h\"\n#include <vector>\nint x;\n");
    }

    #[test]
    fn test_includes_after_code_are_not_anchors() {
        let source = "#include \"a.h\"\nenum E {\n#include \"e.def\"\n};\nint x;\n";

        let result = insert(source, "<vector>", &FormatStyle::default()).unwrap();
        assert_eq!(
            result,
            "#include \"a.h\"\n#include <vector>\nenum E {\n#include \"e.def\"\n};\nint x;\n"
        );

        let style = FormatStyle::from_name("none").unwrap();
        let result = insert(source, "\"b.h\"", &style).unwrap();
        assert_eq!(
            result,
            "#include \"a.h\"\n#include \"b.h\"\nenum E {\n#include \"e.def\"\n};\nint x;\n"
        );
    }

    #[test]
    fn test_include_after_code_still_counts_as_present() {
        let source = "#include \"a.h\"\nenum E {\n#include \"e.def\"\n};\n";
        let result = insert(source, "\"e.def\"", &FormatStyle::default()).unwrap();
        assert_eq!(result, source);
    }

    #[test]
    fn test_only_includes_after_code_inserts_at_top() {
        let source = "int x;\n#include \"x.def\"\n";
        let result = insert(source, "\"a.h\"", &FormatStyle::default()).unwrap();
        assert_eq!(result, "#include \"a.h\"\nint x;\n#include \"x.def\"\n");
    }

    #[test]
    fn test_macro_continuation_stays_in_include_region() {
        let source = "#define X \\\n  1\n#include \"a.h\"\nint y;\n";
        let result = insert(source, "\"b.h\"", &FormatStyle::default()).unwrap();
        assert_eq!(result, "#define X \\\n  1\n#include \"a.h\"\n#include \"b.h\"\nint y;\n");
    }

    #[test]
    fn test_code_after_leading_block_comment_stops_skipping() {
        let source = "/* c */ namespace x {\n}\n";
        let result = insert(source, "\"a.h\"", &FormatStyle::default()).unwrap();
        assert_eq!(result, "#include \"a.h\"\n/* c */ namespace x {\n}\n");
    }

    #[test]
    fn test_existing_include_is_not_duplicated() {
        let source = "#include \"foo.h\"\nclass Bar; Foo<Bar> foo;\n";
        let formatter = IncludeCleanupFormatter::default();
        let replacement = Replacement::insertion("test.cc", INSERT_AT_INCLUDES, "#include \"foo.h\"\n");

        let cleaned = formatter
            .apply_and_cleanup(source, &[replacement], &FormatStyle::default())
            .unwrap();
        assert!(cleaned.is_empty());
    }

    #[test]
    fn test_same_header_twice_in_one_batch() {
        let formatter = IncludeCleanupFormatter::default();
        let replacement = Replacement::insertion("test.cc", INSERT_AT_INCLUDES, "#include <a.h>\n");

        let cleaned = formatter
            .apply_and_cleanup("", &[replacement.clone(), replacement], &FormatStyle::default())
            .unwrap();
        assert_eq!(cleaned.len(), 1);
    }

    #[test]
    fn test_commented_out_include_does_not_count() {
        let source = "/*\n#include \"foo.h\"\n*/\nint x;\n";
        let result = insert(source, "\"foo.h\"", &FormatStyle::default()).unwrap();
        assert_eq!(result, "/*\n#include \"foo.h\"\n*/\n#include \"foo.h\"\nint x;\n");
    }

    #[test]
    fn test_missing_trailing_newline() {
        let result = insert("#include \"a.h\"", "\"b.h\"", &FormatStyle::default()).unwrap();
        assert_eq!(result, "#include \"a.h\"\n#include \"b.h\"\n");
    }

    #[test]
    fn test_unterminated_comment_is_malformed() {
        let result = insert("int x; /* never closed\n", "\"a.h\"", &FormatStyle::default());
        assert_eq!(result, Err(FormatError::UnterminatedComment { offset: 7 }));
    }

    #[test]
    fn test_sentinel_text_must_be_include() {
        let formatter = IncludeCleanupFormatter::default();
        let replacement = Replacement::insertion("test.cc", INSERT_AT_INCLUDES, "int x;\n");

        let result = formatter.apply_and_cleanup("", &[replacement], &FormatStyle::default());
        assert!(matches!(result, Err(FormatError::InvalidHeader { .. })));
    }

    #[test]
    fn test_comment_markers_inside_strings_are_ignored() {
        let source = "const char* s = \"/*\";\nint x;\n";
        let result = insert(source, "<a.h>", &FormatStyle::default()).unwrap();
        assert_eq!(result, "#include <a.h>\nconst char* s = \"/*\";\nint x;\n");
    }
}
