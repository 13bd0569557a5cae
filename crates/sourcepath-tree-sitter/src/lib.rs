//! A Tree-sitter backend for [`sourcepath`], with a Rust dialect.
//!
//! [`SourceTree`] parses Rust source text; [`TreeNode`] adapts
//! Tree-sitter nodes to the engine's node abstraction, declaring the
//! grammar's grouping wrappers (`source_file`, `declaration_list`, and
//! friends) as transparent and normalising shapes the grammar spells
//! differently than a query reads: expression statements stand for
//! their expressions, match arms for their pattern alternatives, and
//! primitive types for their token text.
//!
//! ```rust
//! use sourcepath::{Axis, Engine, PathParser};
//! use sourcepath_tree_sitter::{RustDialect, SourceTree};
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let dialect = RustDialect::new();
//! let path = PathParser::new(&dialect).parse("//fn[async]")?;
//! let sequence = path.as_sequence().ok_or("expected a sequence")?;
//!
//! let tree = SourceTree::parse("async fn fetch() {}")?;
//! let engine = Engine::new();
//! let found = engine
//!     .query_all(sequence, &tree.root(), Axis::Descendant)
//!     .collect::<Result<Vec<_>, _>>()?;
//! assert_eq!(found.len(), 1);
//! # Ok(())
//! # }
//! ```

mod dialect;
mod node;
mod tree;

pub use dialect::{RustDialect, RustKind};
pub use node::TreeNode;
pub use tree::{SourceTree, TreeError};
