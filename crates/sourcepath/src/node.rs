//! The node abstraction consumed by the matching engine.

use crate::axis::Axis;
use crate::dialect::NodeKind;
use crate::error::EngineError;

/// A structural rewrite a backend declares for shape normalisation.
///
/// The engine applies the rewrite when testing a node against a
/// segment. An [`Rewrite::Unwrap`] hands the whole test, filter
/// included, to the inner node; a [`Rewrite::TestEach`] borrows only
/// the kind test from its proxies and keeps the filter on the original
/// node.
#[derive(Debug, Clone)]
pub enum Rewrite<N> {
    /// No rewrite; the node is tested as itself.
    None,
    /// The node stands for a wrapped inner node, the way an expression
    /// statement stands for its expression. Testing recurses into the
    /// inner node, including its own rewrite.
    Unwrap(N),
    /// The node's kind is defined by other nodes, the way a switch
    /// section is defined by its labels. The node matches when any of
    /// them matches the kind test, with the node's own kind as a
    /// fallback.
    TestEach(Vec<N>),
}

/// A concrete tree node, as seen by the parser-independent engine.
///
/// Implementations are cheap handles (a pointer plus shared context)
/// and are cloned freely during traversal.
pub trait SourceNode: Clone {
    /// The dialect kind handle this node can be tested against.
    type Kind: NodeKind;

    /// Returns whether this node belongs to `kind`, including any
    /// backend-specific token-level tests.
    fn matches_kind(&self, kind: &Self::Kind) -> bool;

    /// Returns the directly reported children, left to right.
    fn children(&self) -> Vec<Self>;

    /// Returns the directly reported parent, if any.
    fn parent(&self) -> Option<Self>;

    /// Returns the textual value of an identifier-like node, or `None`
    /// for nodes without a string projection.
    fn string_value(&self) -> Option<String>;

    /// Returns whether navigation jumps over this node as a transparent
    /// wrapper. Defaults to `false`.
    fn is_transparent(&self) -> bool {
        false
    }

    /// Returns the shape-normalisation rewrite for this node. Defaults
    /// to [`Rewrite::None`].
    fn rewrite(&self) -> Rewrite<Self> {
        Rewrite::None
    }

    /// Returns whether this node matches a quoted constant from a
    /// filter. Defaults to `false`.
    fn matches_constant(&self, value: &str) -> bool {
        let _ = value;
        false
    }

    /// Evaluates a backend-defined filter function against this node.
    ///
    /// `Ok(None)` means the function is known but produced no value
    /// here.
    ///
    /// # Errors
    ///
    /// The default implementation reports every function as unknown.
    fn evaluate_function(&self, name: &str, args: &[&str]) -> Result<Option<String>, EngineError> {
        let _ = args;
        Err(EngineError::unknown_function(name))
    }

    /// Enumerates the nodes reachable from this node along `axis`.
    ///
    /// This is raw structural navigation: transparency and shape
    /// rewrites are layered on top by the engine. The default
    /// implementation derives every axis from
    /// [`children`](Self::children) and [`parent`](Self::parent);
    /// backends that cannot report an axis override this to raise
    /// [`EngineError::UnsupportedAxis`].
    ///
    /// # Errors
    ///
    /// The default implementation never fails.
    fn navigate(&self, axis: Axis) -> Result<Vec<Self>, EngineError> {
        Ok(match axis {
            Axis::Self_ => vec![self.clone()],
            Axis::Child => self.children(),
            Axis::Descendant => descendants(self),
            Axis::DescendantOrSelf => {
                let mut nodes = vec![self.clone()];
                nodes.extend(descendants(self));
                nodes
            }
            Axis::Parent => self.parent().into_iter().collect(),
            Axis::Ancestor => ancestors(self),
            Axis::AncestorOrSelf => {
                let mut nodes = vec![self.clone()];
                nodes.extend(ancestors(self));
                nodes
            }
        })
    }
}

/// Collects the subtree below `node` in pre-order.
fn descendants<N: SourceNode>(node: &N) -> Vec<N> {
    let mut collected = Vec::new();
    let mut pending = node.children();
    pending.reverse();
    while let Some(next) = pending.pop() {
        let children = next.children();
        collected.push(next);
        for child in children.into_iter().rev() {
            pending.push(child);
        }
    }
    collected
}

/// Collects the chain of parents, nearest first.
fn ancestors<N: SourceNode>(node: &N) -> Vec<N> {
    let mut collected = Vec::new();
    let mut current = node.parent();
    while let Some(next) = current {
        current = next.parent();
        collected.push(next);
    }
    collected
}
