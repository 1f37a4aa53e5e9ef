use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::format::FormatError;

/// Predefined style the include cleanup follows
///
/// Include insertion only distinguishes sorted from unsorted blocks: every
/// named style keeps includes sorted, `none` appends after the last include
/// of the same kind. The name is kept for reporting and configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleName {
    Llvm,
    Google,
    Chromium,
    Mozilla,
    WebKit,
    None,
}

impl FromStr for StyleName {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "llvm" => Ok(StyleName::Llvm),
            "google" => Ok(StyleName::Google),
            "chromium" => Ok(StyleName::Chromium),
            "mozilla" => Ok(StyleName::Mozilla),
            "webkit" => Ok(StyleName::WebKit),
            "none" => Ok(StyleName::None),
            _ => Err(FormatError::UnknownStyle {
                name: s.to_string(),
            }),
        }
    }
}

/// Formatting options relevant to include insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatStyle {
    pub name: StyleName,
    /// Keep include blocks alphabetically ordered when inserting
    pub sort_includes: bool,
}

impl FormatStyle {
    /// Style for a predefined style name; `none` disables include sorting,
    /// all other names sort
    pub fn from_name(name: &str) -> Result<Self, FormatError> {
        let name = StyleName::from_str(name)?;
        Ok(Self {
            name,
            sort_includes: name != StyleName::None,
        })
    }
}

impl Default for FormatStyle {
    fn default() -> Self {
        Self {
            name: StyleName::Llvm,
            sort_includes: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_is_case_insensitive() {
        let style = FormatStyle::from_name("Google").unwrap();
        assert_eq!(style.name, StyleName::Google);
        assert!(style.sort_includes);

        let style = FormatStyle::from_name("none").unwrap();
        assert_eq!(style.name, StyleName::None);
        assert!(!style.sort_includes);
    }

    #[test]
    fn test_only_none_disables_sorting() {
        for name in ["llvm", "google", "chromium", "mozilla", "webkit"] {
            let style = FormatStyle::from_name(name).unwrap();
            assert!(style.sort_includes, "{name} should sort includes");
            assert_eq!(style.sort_includes, FormatStyle::default().sort_includes);
        }
        assert!(!FormatStyle::from_name("NONE").unwrap().sort_includes);
    }

    #[test]
    fn test_unknown_style() {
        assert_eq!(
            FormatStyle::from_name("gnu"),
            Err(FormatError::UnknownStyle {
                name: "gnu".to_string()
            })
        );
    }
}
