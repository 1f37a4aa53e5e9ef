//! Source formatting collaborator
//!
//! - **Replacement**: textual edit tuple plus validation and application
//! - **Formatter**: cleanup interface the edit builder delegates to
//! - **IncludeCleanupFormatter**: include-block aware implementation
//! - **FormatStyle**: style options driving include placement

pub mod error;
pub mod include_formatter;
pub mod replacement;
pub mod style;

pub use error::FormatError;
pub use include_formatter::{Formatter, IncludeCleanupFormatter};
pub use replacement::{INSERT_AT_INCLUDES, Replacement, apply_replacements};
pub use style::FormatStyle;

#[cfg(test)]
pub use include_formatter::MockFormatter;
