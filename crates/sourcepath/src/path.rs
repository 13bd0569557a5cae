//! The parsed representation of a path expression.
//!
//! Paths are immutable once parsed: parse once, match many times, on
//! any number of trees and threads. The tree is generic over the
//! dialect's kind type, never over a backend node type, so the same
//! parsed path outlives every tree it is matched against.

use std::fmt;
use std::sync::Arc;

use crate::axis::Axis;
use crate::dialect::NodeKind;

/// A parsed path expression.
#[derive(Debug)]
pub enum SourcePath<K: NodeKind> {
    /// One or more segments joined by `/`.
    Sequence(PathSequence<K>),
    /// Two expressions joined by a boolean or equality operator.
    Binary(PathBinary<K>),
    /// A quoted string constant. Only valid inside filters.
    Constant(PathConstant),
    /// A `.name('arg')` function call. Only valid inside filters.
    Call(PathCall),
}

// Manual impl: `K` is held behind `Arc`, so cloning never needs
// `K: Clone` and the derive's implicit bound would be too strict.
impl<K: NodeKind> Clone for SourcePath<K> {
    fn clone(&self) -> Self {
        match self {
            Self::Sequence(sequence) => Self::Sequence(sequence.clone()),
            Self::Binary(binary) => Self::Binary(binary.clone()),
            Self::Constant(constant) => Self::Constant(constant.clone()),
            Self::Call(call) => Self::Call(call.clone()),
        }
    }
}

impl<K: NodeKind> SourcePath<K> {
    /// Returns the sequence form of this path, or `None` for boolean
    /// expressions, constants, and calls.
    #[must_use]
    pub const fn as_sequence(&self) -> Option<&PathSequence<K>> {
        match self {
            Self::Sequence(sequence) => Some(sequence),
            _ => None,
        }
    }

    /// Returns the kinds a node may have to match the root of this
    /// path, for callers that index rules by node kind.
    ///
    /// Every first-segment kind of every top-level sequence is
    /// reported; a node matching this path always matches one of them.
    #[must_use]
    pub fn root_kinds(&self) -> Vec<Arc<K>> {
        let mut kinds = Vec::new();
        self.collect_root_kinds(&mut kinds);
        kinds
    }

    fn collect_root_kinds(&self, kinds: &mut Vec<Arc<K>>) {
        match self {
            Self::Sequence(sequence) => {
                if let Some(first) = sequence.segments().first() {
                    kinds.push(Arc::clone(first.kind_handle()));
                }
            }
            Self::Binary(binary) => {
                binary.left().collect_root_kinds(kinds);
                binary.right().collect_root_kinds(kinds);
            }
            Self::Constant(_) | Self::Call(_) => {}
        }
    }
}

impl<K: NodeKind> fmt::Display for SourcePath<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequence(sequence) => sequence.fmt(f),
            Self::Binary(binary) => binary.fmt(f),
            Self::Constant(constant) => constant.fmt(f),
            Self::Call(call) => call.fmt(f),
        }
    }
}

/// An ordered, non-empty list of segments joined by `/`.
#[derive(Debug)]
pub struct PathSequence<K: NodeKind> {
    segments: Vec<PathSegment<K>>,
}

impl<K: NodeKind> Clone for PathSequence<K> {
    fn clone(&self) -> Self {
        Self {
            segments: self.segments.clone(),
        }
    }
}

impl<K: NodeKind> PathSequence<K> {
    /// Creates a sequence from its segments.
    ///
    /// The grammar never produces an empty sequence; an empty one here
    /// matches nothing.
    #[must_use]
    pub fn new(segments: Vec<PathSegment<K>>) -> Self {
        debug_assert!(!segments.is_empty(), "sequences have at least one segment");
        Self { segments }
    }

    /// Returns the segments, left to right.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment<K>] {
        &self.segments
    }

    pub(crate) fn into_segments(self) -> Vec<PathSegment<K>> {
        self.segments
    }
}

impl<K: NodeKind> fmt::Display for PathSequence<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            // A segment whose own axis token starts with '/' supplies
            // the separator itself.
            let separates_itself = matches!(
                segment.axis(),
                Some(Axis::Child | Axis::Descendant | Axis::DescendantOrSelf)
            );
            if index > 0 && !separates_itself {
                f.write_str("/")?;
            }
            segment.fmt(f)?;
        }
        Ok(())
    }
}

/// One axis + kind-test + filter unit of a path.
#[derive(Debug)]
pub struct PathSegment<K: NodeKind> {
    axis: Option<Axis>,
    kind: Arc<K>,
    filter: Option<Box<SourcePath<K>>>,
}

impl<K: NodeKind> Clone for PathSegment<K> {
    fn clone(&self) -> Self {
        Self {
            axis: self.axis,
            kind: Arc::clone(&self.kind),
            filter: self.filter.clone(),
        }
    }
}

impl<K: NodeKind> PathSegment<K> {
    /// Creates a segment. A segment without an explicit axis uses the
    /// caller-supplied default axis at match time.
    #[must_use]
    pub fn new(axis: Option<Axis>, kind: Arc<K>, filter: Option<SourcePath<K>>) -> Self {
        Self {
            axis,
            kind,
            filter: filter.map(Box::new),
        }
    }

    /// Returns the explicit axis, if the path text carried one.
    #[must_use]
    pub const fn axis(&self) -> Option<Axis> {
        self.axis
    }

    /// Returns the resolved node kind.
    #[must_use]
    pub fn kind(&self) -> &K {
        &self.kind
    }

    /// Returns the shared handle of the resolved node kind.
    #[must_use]
    pub const fn kind_handle(&self) -> &Arc<K> {
        &self.kind
    }

    /// Returns the bracketed filter expression, if present.
    #[must_use]
    pub fn filter(&self) -> Option<&SourcePath<K>> {
        self.filter.as_deref()
    }

    pub(crate) fn with_axis(self, axis: Axis) -> Self {
        Self {
            axis: Some(axis),
            ..self
        }
    }
}

impl<K: NodeKind> fmt::Display for PathSegment<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(axis) = self.axis {
            f.write_str(axis.token())?;
        }
        f.write_str(self.kind.keyword())?;
        if let Some(filter) = self.filter() {
            write!(f, "[{filter}]")?;
        }
        Ok(())
    }
}

/// Operators usable between path expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// Short-circuiting conjunction (`&&`).
    And,
    /// Short-circuiting disjunction (`||`).
    Or,
    /// String-projection equality (`==`). Only valid inside filters.
    Eq,
}

impl BinaryOp {
    /// Returns the operator token.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::And => "&&",
            Self::Or => "||",
            Self::Eq => "==",
        }
    }
}

/// A binary expression: `left op right`.
#[derive(Debug)]
pub struct PathBinary<K: NodeKind> {
    left: Box<SourcePath<K>>,
    op: BinaryOp,
    right: Box<SourcePath<K>>,
}

impl<K: NodeKind> Clone for PathBinary<K> {
    fn clone(&self) -> Self {
        Self {
            left: self.left.clone(),
            op: self.op,
            right: self.right.clone(),
        }
    }
}

impl<K: NodeKind> PathBinary<K> {
    /// Creates a binary expression.
    #[must_use]
    pub fn new(left: SourcePath<K>, op: BinaryOp, right: SourcePath<K>) -> Self {
        Self {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Returns the left operand.
    #[must_use]
    pub fn left(&self) -> &SourcePath<K> {
        &self.left
    }

    /// Returns the operator.
    #[must_use]
    pub const fn op(&self) -> BinaryOp {
        self.op
    }

    /// Returns the right operand.
    #[must_use]
    pub fn right(&self) -> &SourcePath<K> {
        &self.right
    }

    pub(crate) fn into_parts(self) -> (SourcePath<K>, BinaryOp, SourcePath<K>) {
        (*self.left, self.op, *self.right)
    }
}

impl<K: NodeKind> fmt::Display for PathBinary<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The grammar has no parentheses, so precedence never needs
        // re-bracketing: `&&` binds tighter than `||` on both sides of
        // a round trip.
        write!(f, "{} {} {}", self.left, self.op.token(), self.right)
    }
}

/// A quoted string constant from a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathConstant {
    value: String,
}

impl PathConstant {
    /// Creates a constant from its unquoted value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Returns the unquoted value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for PathConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Constants have no escapes; fall back to double quotes when
        // the value itself contains a single quote.
        if self.value.contains('\'') {
            write!(f, "\"{}\"", self.value)
        } else {
            write!(f, "'{}'", self.value)
        }
    }
}

/// A `.name('arg')` function call from a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathCall {
    name: String,
    args: Vec<PathConstant>,
}

impl PathCall {
    /// Creates a call from its name and arguments.
    #[must_use]
    pub fn new(name: impl Into<String>, args: Vec<PathConstant>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Returns the function name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the arguments, in order.
    #[must_use]
    pub fn args(&self) -> &[PathConstant] {
        &self.args
    }
}

impl fmt::Display for PathCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}(", self.name)?;
        for (index, arg) in self.args.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            arg.fmt(f)?;
        }
        f.write_str(")")
    }
}
