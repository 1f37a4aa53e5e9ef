use thiserror::Error;

/// Failures of the insertion/cleanup step. Any of these aborts the edit
/// for the whole unit; no partial replacement set is ever returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("Unterminated block comment starting at offset {offset}")]
    UnterminatedComment { offset: usize },

    #[error("Invalid replacement at {offset}+{length}: {reason}")]
    InvalidReplacement {
        offset: usize,
        length: usize,
        reason: String,
    },

    #[error("Overlapping replacements at offsets {first} and {second}")]
    OverlappingReplacements { first: usize, second: usize },

    #[error("Not an include directive: {text:?}")]
    InvalidHeader { text: String },

    #[error("Unknown format style: {name}")]
    UnknownStyle { name: String },
}
