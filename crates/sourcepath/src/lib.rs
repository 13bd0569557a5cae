//! A small query language for matching shapes in source-code syntax
//! trees.
//!
//! Paths look like XPath narrowed to what syntax matching needs:
//!
//! ```text
//! //method[async && void]
//! class[name[.starts-with('c')]]
//! fn[pub && parent::mod[name == 'internal']]
//! ```
//!
//! A path is parsed once against a [`Dialect`] (the keyword vocabulary
//! of one tree backend) into an immutable [`SourcePath`], and then
//! matched any number of times, on any number of trees and threads,
//! through the [`Engine`]. Trees plug in by implementing [`SourceNode`]
//! over whatever node handles the backend already has; the engine owns
//! the dialect-independent parts of matching: default axes, boolean
//! short-circuiting, transparent-wrapper jump-over, shape rewrites, and
//! the evaluation depth limit.
//!
//! Segments navigate along an [`Axis`] (self, child, descendant,
//! parent, ancestor), test a node kind, and optionally filter with a
//! bracketed boolean expression. `&&` binds tighter than `||`; `==`
//! compares string projections and is only available inside filters.
//!
//! ```rust
//! use sourcepath::{Axis, Engine, PathParser};
//!
//! # fn demo<D: sourcepath::Dialect, N: sourcepath::SourceNode<Kind = D::Kind>>(
//! #     dialect: &D,
//! #     root: &N,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! let parser = PathParser::new(dialect);
//! let path = parser.parse("//method[async]")?;
//! let sequence = path.as_sequence().ok_or("expected a sequence")?;
//!
//! let engine = Engine::new();
//! for found in engine.query_all(sequence, root, Axis::Descendant) {
//!     let _node = found?;
//! }
//! # Ok(())
//! # }
//! ```

mod axis;
mod dialect;
mod engine;
mod error;
mod lexer;
mod node;
mod parser;
mod path;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use axis::Axis;
pub use dialect::{Capabilities, Dialect, NodeKind};
pub use engine::{Engine, EngineConfig, QueryAll};
pub use error::{EngineError, ParseError};
pub use node::{Rewrite, SourceNode};
pub use parser::PathParser;
pub use path::{
    BinaryOp, PathBinary, PathCall, PathConstant, PathSegment, PathSequence, SourcePath,
};
