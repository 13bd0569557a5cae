//! Dialects: the keyword vocabulary and grammar capabilities of one
//! tree backend.

use std::fmt;
use std::sync::Arc;

use crate::axis::Axis;

/// A dialect-owned handle identifying one class of node shapes.
///
/// The handle is opaque to the parser and engine; membership testing
/// lives on the node side ([`crate::SourceNode::matches_kind`]), so a
/// kind resolved once can be matched against any number of trees.
pub trait NodeKind: fmt::Debug + Send + Sync + 'static {
    /// Returns the keyword this kind was resolved from.
    fn keyword(&self) -> &str;
}

/// Grammar features a dialect may switch off.
///
/// The default is permissive. A disabled capability makes the parser
/// reject otherwise grammatical input; capabilities never change how a
/// path matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Whether the first segment of a top-level sequence may carry an
    /// explicit axis.
    pub top_level_axis: bool,
    /// Whether a top-level sequence may have more than one segment.
    pub top_level_segments: bool,
    /// Whether `&&` may join expressions at the top level.
    pub top_level_and: bool,
    /// Whether the `self` axis is available anywhere.
    pub axis_self: bool,
    /// Whether the `descendant` axis is available anywhere.
    pub axis_descendant: bool,
    /// Whether the `parent` axis is available anywhere.
    pub axis_parent: bool,
    /// Whether the `ancestor` axis is available anywhere.
    pub axis_ancestor: bool,
}

impl Capabilities {
    /// Returns the permissive default: everything allowed.
    #[must_use]
    pub const fn permissive() -> Self {
        Self {
            top_level_axis: true,
            top_level_segments: true,
            top_level_and: true,
            axis_self: true,
            axis_descendant: true,
            axis_parent: true,
            axis_ancestor: true,
        }
    }

    /// Returns whether segments may use `axis`.
    ///
    /// The combined `-or-self` axes need both of their parts enabled.
    #[must_use]
    pub const fn allows_axis(self, axis: Axis) -> bool {
        match axis {
            Axis::Child => true,
            Axis::Self_ => self.axis_self,
            Axis::Descendant => self.axis_descendant,
            Axis::DescendantOrSelf => self.axis_self && self.axis_descendant,
            Axis::Parent => self.axis_parent,
            Axis::Ancestor => self.axis_ancestor,
            Axis::AncestorOrSelf => self.axis_self && self.axis_ancestor,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::permissive()
    }
}

/// A pluggable keyword vocabulary for one tree backend.
pub trait Dialect {
    /// The node-kind handle type this dialect resolves keywords to.
    type Kind: NodeKind;

    /// Returns the dialect name used in diagnostics.
    fn name(&self) -> &str;

    /// Resolves a keyword to its kind handle, or `None` when the
    /// keyword is not in this dialect's table.
    fn resolve(&self, keyword: &str) -> Option<Arc<Self::Kind>>;

    /// Returns the grammar capabilities of this dialect.
    fn capabilities(&self) -> Capabilities {
        Capabilities::permissive()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::Capabilities;
    use crate::axis::Axis;

    #[test]
    fn default_capabilities_allow_everything() {
        let capabilities = Capabilities::default();
        assert!(capabilities.top_level_axis);
        assert!(capabilities.top_level_segments);
        assert!(capabilities.top_level_and);
        assert!(capabilities.allows_axis(Axis::Descendant));
    }

    #[rstest]
    #[case(Axis::Self_)]
    #[case(Axis::DescendantOrSelf)]
    #[case(Axis::AncestorOrSelf)]
    fn disabling_self_disables_combined_axes(#[case] axis: Axis) {
        let capabilities = Capabilities {
            axis_self: false,
            ..Capabilities::permissive()
        };
        assert!(!capabilities.allows_axis(axis));
        assert!(capabilities.allows_axis(Axis::Child));
        assert!(capabilities.allows_axis(Axis::Descendant));
    }

    #[test]
    fn disabling_descendant_keeps_plain_self() {
        let capabilities = Capabilities {
            axis_descendant: false,
            ..Capabilities::permissive()
        };
        assert!(capabilities.allows_axis(Axis::Self_));
        assert!(!capabilities.allows_axis(Axis::Descendant));
        assert!(!capabilities.allows_axis(Axis::DescendantOrSelf));
    }
}
