//! Tree-sitter parsing wrapper.

use thiserror::Error;

use crate::node::TreeNode;

/// Errors from building a [`SourceTree`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TreeError {
    /// The Tree-sitter parser could not be initialised with the Rust
    /// grammar.
    #[error("failed to initialise the Rust parser: {message}")]
    ParserInit {
        /// Description of the failure.
        message: String,
    },

    /// The parser produced no tree. Rare; typically a configuration
    /// problem rather than bad input.
    #[error("failed to parse source: {message}")]
    Parse {
        /// Description of the failure.
        message: String,
    },
}

/// A parsed Rust source file.
///
/// Owns the source text alongside the tree, so query results can
/// report node text without the caller keeping the input alive
/// separately.
pub struct SourceTree {
    tree: tree_sitter::Tree,
    source: String,
}

impl SourceTree {
    /// Parses Rust source text.
    ///
    /// Tree-sitter is error-tolerant: a tree comes back even for
    /// source with syntax errors. Use [`has_errors`](Self::has_errors)
    /// to check.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError`] when the grammar cannot be loaded or the
    /// parser produces no tree at all.
    pub fn parse(source: &str) -> Result<Self, TreeError> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_rust::LANGUAGE.into())
            .map_err(|error| TreeError::ParserInit {
                message: error.to_string(),
            })?;
        let tree = parser.parse(source, None).ok_or_else(|| TreeError::Parse {
            message: "parsing produced no tree".to_owned(),
        })?;
        Ok(Self {
            tree,
            source: source.to_owned(),
        })
    }

    /// Returns the root node.
    #[must_use]
    pub fn root(&self) -> TreeNode<'_> {
        TreeNode::new(self.tree.root_node(), &self.source)
    }

    /// Returns whether the tree contains error or missing nodes.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Returns the source text the tree was parsed from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}
