//! Navigation axes for path segments.

use std::fmt;

/// A direction of tree navigation for one path segment.
///
/// The grammar produces every variant except the two `-or-self`
/// combinations, which exist for programmatic callers such as rule
/// loaders that enforce a combined axis on the first segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The node itself (`self::`).
    Self_,
    /// Direct children (`/`).
    Child,
    /// Every node below, in pre-order (`//` or `descendant::`).
    Descendant,
    /// The node itself, then every node below.
    DescendantOrSelf,
    /// The nearest parent (`parent::`).
    Parent,
    /// Every enclosing node, nearest first (`ancestor::`).
    Ancestor,
    /// The node itself, then every enclosing node.
    AncestorOrSelf,
}

impl Axis {
    /// Returns the axis name used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Self_ => "self",
            Self::Child => "child",
            Self::Descendant => "descendant",
            Self::DescendantOrSelf => "descendant-or-self",
            Self::Parent => "parent",
            Self::Ancestor => "ancestor",
            Self::AncestorOrSelf => "ancestor-or-self",
        }
    }

    /// Returns the token that introduces this axis in path text.
    ///
    /// The `-or-self` axes have no grammar token; they render in the
    /// named-axis form so the result is at least readable.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Self_ => "self::",
            Self::Child => "/",
            Self::Descendant => "//",
            Self::DescendantOrSelf => "descendant-or-self::",
            Self::Parent => "parent::",
            Self::Ancestor => "ancestor::",
            Self::AncestorOrSelf => "ancestor-or-self::",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
