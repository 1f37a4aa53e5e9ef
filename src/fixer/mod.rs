//! Missing-symbol resolution engine
//!
//! - **events**: parser callbacks as plain data (`ParserEvent`)
//! - **scope_resolver**: event to `SymbolQuery`, span coalescing
//! - **session**: per-unit query coordinator, single resolution policy
//! - **path_minimizer**: shortest include spelling for candidates
//! - **context**: `ResolutionContext` handed back to the caller
//! - **edit_builder**: `#include` insertion through the formatter

pub mod context;
pub mod edit_builder;
pub mod events;
pub mod path_minimizer;
pub mod query;
pub mod scope_resolver;
pub mod session;

pub use context::ResolutionContext;
pub use edit_builder::EditBuilder;
pub use events::ParserEvent;
pub use path_minimizer::PathMinimizer;
pub use query::QueryError;
pub use session::FixerSession;
