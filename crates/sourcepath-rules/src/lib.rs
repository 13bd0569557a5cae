//! Rule files for [`sourcepath`]: a line-oriented format binding rule
//! identifiers to paths and diagnostics.
//!
//! ```text
//! no_async_void
//!     method[async && void]
//!     warning: async methods should not return void
//! ```
//!
//! Rule paths are anchored at the tested node (the self axis is
//! enforced on their first segments), so an analyser visits nodes and
//! asks each rule [`Rule::matches`]; [`Rule::root_kinds`] supports
//! indexing rules by node kind first. Loading is strict: one malformed
//! rule fails the whole file.

mod loader;
mod rule;

pub use loader::{DEFAULT_FILE_NAME, RuleError};
pub use rule::{Rule, RuleSet, Severity};
