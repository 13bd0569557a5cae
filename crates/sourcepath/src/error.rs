//! Error types for path parsing and evaluation.

use thiserror::Error;

use crate::axis::Axis;

/// Errors from parsing path text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    /// The input violates the path grammar.
    #[error("malformed path at offset {position}: expected {expected}")]
    MalformedSyntax {
        /// Byte offset of the offending token.
        position: usize,
        /// What the parser was looking for.
        expected: String,
    },

    /// A node-kind keyword is not in the active dialect's table.
    #[error("unknown node kind keyword '{keyword}'")]
    UnknownKeyword {
        /// The keyword that failed to resolve.
        keyword: String,
    },

    /// The active dialect does not permit this axis.
    #[error("dialect '{dialect}' does not support the {axis} axis")]
    UnsupportedAxis {
        /// The rejected axis.
        axis: Axis,
        /// Name of the dialect that rejected it.
        dialect: String,
    },

    /// The active dialect does not permit this construct at the top
    /// level of a path.
    #[error("dialect '{dialect}' does not allow {construct} at the top level of a path")]
    UnsupportedTopLevel {
        /// Description of the rejected construct.
        construct: &'static str,
        /// Name of the dialect that rejected it.
        dialect: String,
    },
}

impl ParseError {
    /// Creates a [`ParseError::MalformedSyntax`].
    #[must_use]
    pub fn malformed(position: usize, expected: impl Into<String>) -> Self {
        Self::MalformedSyntax {
            position,
            expected: expected.into(),
        }
    }

    /// Creates a [`ParseError::UnknownKeyword`].
    #[must_use]
    pub fn unknown_keyword(keyword: impl Into<String>) -> Self {
        Self::UnknownKeyword {
            keyword: keyword.into(),
        }
    }

    /// Creates a [`ParseError::UnsupportedAxis`].
    #[must_use]
    pub fn unsupported_axis(axis: Axis, dialect: impl Into<String>) -> Self {
        Self::UnsupportedAxis {
            axis,
            dialect: dialect.into(),
        }
    }

    /// Creates a [`ParseError::UnsupportedTopLevel`].
    #[must_use]
    pub fn unsupported_top_level(construct: &'static str, dialect: impl Into<String>) -> Self {
        Self::UnsupportedTopLevel {
            construct,
            dialect: dialect.into(),
        }
    }
}

/// Fatal evaluation errors.
///
/// These indicate an incomplete node abstraction or an engine limit,
/// never a property of the tree being queried. Callers should abort the
/// query and surface the message rather than treat the path as
/// non-matching.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineError {
    /// The backend cannot navigate the requested axis.
    #[error("the node backend cannot navigate the {axis} axis")]
    UnsupportedAxis {
        /// The axis the backend refused.
        axis: Axis,
    },

    /// An expression form appeared in a position the engine cannot
    /// evaluate it in.
    #[error("{kind} cannot be evaluated here")]
    UnsupportedExpression {
        /// Description of the expression form.
        kind: &'static str,
    },

    /// A filter function is known to neither the engine nor the
    /// backend.
    #[error("unknown filter function '{name}'")]
    UnknownFunction {
        /// The unresolved function name.
        name: String,
    },

    /// Evaluation nesting exceeded the configured depth limit.
    #[error("evaluation exceeded the depth limit of {limit}")]
    DepthExceeded {
        /// The configured limit that was hit.
        limit: usize,
    },
}

impl EngineError {
    /// Creates an [`EngineError::UnsupportedAxis`].
    #[must_use]
    pub const fn unsupported_axis(axis: Axis) -> Self {
        Self::UnsupportedAxis { axis }
    }

    /// Creates an [`EngineError::UnsupportedExpression`].
    #[must_use]
    pub const fn unsupported_expression(kind: &'static str) -> Self {
        Self::UnsupportedExpression { kind }
    }

    /// Creates an [`EngineError::UnknownFunction`].
    #[must_use]
    pub fn unknown_function(name: impl Into<String>) -> Self {
        Self::UnknownFunction { name: name.into() }
    }

    /// Creates an [`EngineError::DepthExceeded`].
    #[must_use]
    pub const fn depth_exceeded(limit: usize) -> Self {
        Self::DepthExceeded { limit }
    }
}
