//! The matching engine: boolean evaluation and lazy querying.
//!
//! The engine owns everything dialect-independent about matching:
//! default axes, short-circuiting, transparency jump-over, shape
//! rewrites, and the depth limit. Backends contribute structure and
//! token-level tests through [`SourceNode`].

mod query;

pub use query::QueryAll;

use crate::axis::Axis;
use crate::error::EngineError;
use crate::node::{Rewrite, SourceNode};
use crate::path::{BinaryOp, PathCall, PathConstant, PathSegment, PathSequence, SourcePath};

/// Default bound on evaluation nesting.
const DEFAULT_MAX_DEPTH: usize = 256;

/// Evaluation limits.
///
/// Depth counts filter nesting, rewrite unwrapping, and transparent
/// expansion together; hitting the bound raises
/// [`EngineError::DepthExceeded`] instead of exhausting the stack on a
/// pathological tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    max_depth: usize,
}

impl EngineConfig {
    /// Creates a configuration with the given depth limit.
    #[must_use]
    pub const fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Returns the depth limit.
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Evaluates parsed paths against trees.
///
/// Stateless apart from its configuration; one engine can serve any
/// number of paths, trees, and dialects.
#[derive(Debug, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Creates an engine with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with the given limits.
    #[must_use]
    pub const fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Returns the engine's configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns whether `path` matches at `node`.
    ///
    /// `default_axis` applies to first segments without an explicit
    /// axis; segments after the first always default to child.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] for conditions that make the result
    /// meaningless: an axis the backend cannot navigate, an unknown
    /// filter function, or the depth limit.
    pub fn matches<N>(
        &self,
        path: &SourcePath<N::Kind>,
        node: &N,
        default_axis: Axis,
    ) -> Result<bool, EngineError>
    where
        N: SourceNode,
    {
        self.eval(path, node, default_axis, 0)
    }

    /// Lazily enumerates every node under `node` that matches
    /// `sequence`, in document order.
    ///
    /// Candidates are only tested as the iterator is advanced, so
    /// taking the first match of a broad query costs one traversal
    /// step, not a full scan. A fatal error ends the iteration after
    /// being yielded once.
    #[must_use]
    pub fn query_all<'q, N>(
        &'q self,
        sequence: &'q PathSequence<N::Kind>,
        node: &N,
        default_axis: Axis,
    ) -> QueryAll<'q, N>
    where
        N: SourceNode,
    {
        QueryAll::new(self, sequence.segments(), node, default_axis, 0)
    }

    fn eval<N>(
        &self,
        path: &SourcePath<N::Kind>,
        node: &N,
        default_axis: Axis,
        depth: usize,
    ) -> Result<bool, EngineError>
    where
        N: SourceNode,
    {
        let depth = self.deeper(depth)?;
        match path {
            SourcePath::Sequence(sequence) => {
                let mut matches =
                    QueryAll::new(self, sequence.segments(), node, default_axis, depth);
                match matches.next() {
                    Some(Ok(_)) => Ok(true),
                    Some(Err(error)) => Err(error),
                    None => Ok(false),
                }
            }
            SourcePath::Binary(binary) => match binary.op() {
                BinaryOp::And => Ok(self.eval(binary.left(), node, default_axis, depth)?
                    && self.eval(binary.right(), node, default_axis, depth)?),
                BinaryOp::Or => Ok(self.eval(binary.left(), node, default_axis, depth)?
                    || self.eval(binary.right(), node, default_axis, depth)?),
                BinaryOp::Eq => {
                    let left = self.project(binary.left(), node, depth)?;
                    let right = self.project(binary.right(), node, depth)?;
                    // A missing projection equals nothing, not even
                    // another missing projection.
                    Ok(match (left, right) {
                        (Some(left), Some(right)) => left == right,
                        _ => false,
                    })
                }
            },
            SourcePath::Constant(constant) => Ok(node.matches_constant(constant.value())),
            SourcePath::Call(call) => self.eval_call(call, node),
        }
    }

    /// Evaluates a filter function as a boolean.
    ///
    /// `starts-with`, `ends-with`, and `contains` test the node's
    /// string value. Anything else is offered to the backend; a value
    /// is truthy when non-empty.
    fn eval_call<N>(&self, call: &PathCall, node: &N) -> Result<bool, EngineError>
    where
        N: SourceNode,
    {
        let args: Vec<&str> = call.args().iter().map(PathConstant::value).collect();
        match call.name() {
            name @ ("starts-with" | "ends-with" | "contains") => {
                let Some(value) = node.string_value() else {
                    return Ok(false);
                };
                let Some(&needle) = args.first() else {
                    return Ok(false);
                };
                Ok(match name {
                    "starts-with" => value.starts_with(needle),
                    "ends-with" => value.ends_with(needle),
                    _ => value.contains(needle),
                })
            }
            other => Ok(node
                .evaluate_function(other, &args)?
                .is_some_and(|value| !value.is_empty())),
        }
    }

    /// Projects one side of an equality to a string.
    ///
    /// A nested path projects the string value of its first match; a
    /// constant projects its text; a call asks the backend.
    fn project<N>(
        &self,
        path: &SourcePath<N::Kind>,
        node: &N,
        depth: usize,
    ) -> Result<Option<String>, EngineError>
    where
        N: SourceNode,
    {
        match path {
            SourcePath::Sequence(sequence) => {
                let mut matches =
                    QueryAll::new(self, sequence.segments(), node, Axis::Child, depth);
                match matches.next() {
                    Some(Ok(found)) => Ok(found.string_value()),
                    Some(Err(error)) => Err(error),
                    None => Ok(None),
                }
            }
            SourcePath::Constant(constant) => Ok(Some(constant.value().to_owned())),
            SourcePath::Call(call) => {
                let args: Vec<&str> = call.args().iter().map(PathConstant::value).collect();
                node.evaluate_function(call.name(), &args)
            }
            SourcePath::Binary(_) => Err(EngineError::unsupported_expression(
                "a boolean expression beside '=='",
            )),
        }
    }

    /// Tests `node` against one segment, ignoring the segment's axis.
    ///
    /// Shape rewrites apply here: an unwrapping node is tested as its
    /// inner node, and a proxy-kind node as each of its proxies with
    /// itself as fallback. Filters always run against the original
    /// node.
    fn segment_matches<N>(
        &self,
        node: &N,
        segment: &PathSegment<N::Kind>,
        depth: usize,
    ) -> Result<bool, EngineError>
    where
        N: SourceNode,
    {
        let depth = self.deeper(depth)?;
        match node.rewrite() {
            Rewrite::None => self.kind_and_filter(node, node, segment, depth),
            Rewrite::Unwrap(inner) => self.segment_matches(&inner, segment, depth),
            Rewrite::TestEach(proxies) => {
                for proxy in &proxies {
                    if self.kind_and_filter(node, proxy, segment, depth)? {
                        return Ok(true);
                    }
                }
                self.kind_and_filter(node, node, segment, depth)
            }
        }
    }

    /// Kind test against `kind_source`, filter against `node`.
    fn kind_and_filter<N>(
        &self,
        node: &N,
        kind_source: &N,
        segment: &PathSegment<N::Kind>,
        depth: usize,
    ) -> Result<bool, EngineError>
    where
        N: SourceNode,
    {
        if !kind_source.matches_kind(segment.kind()) {
            return Ok(false);
        }
        segment
            .filter()
            .map_or(Ok(true), |filter| self.eval(filter, node, Axis::Child, depth))
    }

    /// Candidates for the self axis: the node itself, or for a
    /// transparent wrapper its direct children (one level only).
    fn self_candidates<N>(&self, node: &N) -> Result<Vec<N>, EngineError>
    where
        N: SourceNode,
    {
        if node.is_transparent() {
            node.navigate(Axis::Child)
        } else {
            Ok(vec![node.clone()])
        }
    }

    /// Children of `node` with transparent wrappers expanded away, so
    /// a wrapper never appears as a candidate and never hides its
    /// children.
    fn expanded_children<N>(&self, node: &N) -> Result<Vec<N>, EngineError>
    where
        N: SourceNode,
    {
        let mut expanded = Vec::new();
        let mut pending = node.navigate(Axis::Child)?;
        pending.reverse();
        let mut expansions = 0usize;
        while let Some(next) = pending.pop() {
            if next.is_transparent() {
                expansions += 1;
                if expansions > self.config.max_depth {
                    return Err(EngineError::depth_exceeded(self.config.max_depth));
                }
                let mut children = next.navigate(Axis::Child)?;
                children.reverse();
                pending.append(&mut children);
            } else {
                expanded.push(next);
            }
        }
        Ok(expanded)
    }

    /// The nearest non-transparent parent.
    fn effective_parent<N>(&self, node: &N) -> Result<Option<N>, EngineError>
    where
        N: SourceNode,
    {
        let mut current = node.navigate(Axis::Parent)?.into_iter().next();
        while let Some(candidate) = current {
            if !candidate.is_transparent() {
                return Ok(Some(candidate));
            }
            current = candidate.navigate(Axis::Parent)?.into_iter().next();
        }
        Ok(None)
    }

    /// Non-transparent enclosing nodes, nearest first.
    fn effective_ancestors<N>(&self, node: &N) -> Result<Vec<N>, EngineError>
    where
        N: SourceNode,
    {
        let mut collected = Vec::new();
        let mut current = self.effective_parent(node)?;
        while let Some(ancestor) = current {
            current = self.effective_parent(&ancestor)?;
            collected.push(ancestor);
        }
        Ok(collected)
    }

    fn deeper(&self, depth: usize) -> Result<usize, EngineError> {
        if depth >= self.config.max_depth {
            return Err(EngineError::depth_exceeded(self.config.max_depth));
        }
        Ok(depth + 1)
    }
}

impl<K: crate::dialect::NodeKind> SourcePath<K> {
    /// Returns whether this path matches at `node`, using a default
    /// engine. See [`Engine::matches`].
    ///
    /// # Errors
    ///
    /// Propagates [`EngineError`] from evaluation.
    pub fn matches<N>(&self, node: &N, default_axis: Axis) -> Result<bool, EngineError>
    where
        N: SourceNode<Kind = K>,
    {
        Engine::new().matches(self, node, default_axis)
    }
}

#[cfg(test)]
mod tests;
