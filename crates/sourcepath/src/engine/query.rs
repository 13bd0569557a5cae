//! Lazy enumeration of matching nodes.

use crate::axis::Axis;
use crate::error::EngineError;
use crate::node::SourceNode;
use crate::path::PathSegment;

use super::Engine;

/// Iterator over the nodes matching a path sequence, in document
/// order.
///
/// Created by [`Engine::query_all`]. Yields `Err` once for a fatal
/// evaluation error, then fuses.
#[must_use = "iterators are lazy; nothing is matched until they are advanced"]
pub struct QueryAll<'q, N: SourceNode> {
    engine: &'q Engine,
    segments: &'q [PathSegment<N::Kind>],
    stack: Vec<SegmentMatches<'q, N>>,
    depth: usize,
    done: bool,
}

impl<'q, N: SourceNode> QueryAll<'q, N> {
    pub(super) fn new(
        engine: &'q Engine,
        segments: &'q [PathSegment<N::Kind>],
        root: &N,
        default_axis: Axis,
        depth: usize,
    ) -> Self {
        let mut stack = Vec::with_capacity(segments.len());
        if let Some(first) = segments.first() {
            let axis = first.axis().unwrap_or(default_axis);
            stack.push(SegmentMatches::new(engine, first, root, axis, depth));
        }
        Self {
            engine,
            segments,
            stack,
            depth,
            done: segments.is_empty(),
        }
    }
}

impl<N: SourceNode> Iterator for QueryAll<'_, N> {
    type Item = Result<N, EngineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let level = self.stack.len();
            let Some(top) = self.stack.last_mut() else {
                self.done = true;
                return None;
            };
            match top.next() {
                None => {
                    self.stack.pop();
                    if self.stack.is_empty() {
                        self.done = true;
                        return None;
                    }
                }
                Some(Err(error)) => {
                    self.done = true;
                    return Some(Err(error));
                }
                Some(Ok(node)) => {
                    let Some(segment) = self.segments.get(level) else {
                        // Deepest segment matched.
                        return Some(Ok(node));
                    };
                    let axis = segment.axis().unwrap_or(Axis::Child);
                    self.stack
                        .push(SegmentMatches::new(self.engine, segment, &node, axis, self.depth));
                }
            }
        }
    }
}

/// Matches of one segment from one anchor node.
enum SegmentMatches<'q, N: SourceNode> {
    /// A precomputed candidate list, tested lazily.
    Candidates(CandidateMatches<'q, N>),
    /// Pre-order descendant search that skips matched subtrees.
    Descendants(DescendantMatches<'q, N>),
    /// Self candidates first, then descendants.
    SelfThenDescendants(CandidateMatches<'q, N>, DescendantMatches<'q, N>),
    /// Candidate collection failed; yields the error once.
    Failed(Option<EngineError>),
}

impl<'q, N: SourceNode> SegmentMatches<'q, N> {
    fn new(
        engine: &'q Engine,
        segment: &'q PathSegment<N::Kind>,
        node: &N,
        axis: Axis,
        depth: usize,
    ) -> Self {
        Self::build(engine, segment, node, axis, depth)
            .unwrap_or_else(|error| Self::Failed(Some(error)))
    }

    fn build(
        engine: &'q Engine,
        segment: &'q PathSegment<N::Kind>,
        node: &N,
        axis: Axis,
        depth: usize,
    ) -> Result<Self, EngineError> {
        Ok(match axis {
            Axis::Self_ => Self::Candidates(CandidateMatches::new(
                engine,
                segment,
                engine.self_candidates(node)?,
                depth,
            )),
            Axis::Child => Self::Candidates(CandidateMatches::new(
                engine,
                segment,
                engine.expanded_children(node)?,
                depth,
            )),
            Axis::Parent => Self::Candidates(CandidateMatches::new(
                engine,
                segment,
                engine.effective_parent(node)?.into_iter().collect(),
                depth,
            )),
            Axis::Ancestor => Self::Candidates(CandidateMatches::new(
                engine,
                segment,
                engine.effective_ancestors(node)?,
                depth,
            )),
            Axis::AncestorOrSelf => {
                let mut candidates = engine.self_candidates(node)?;
                candidates.extend(engine.effective_ancestors(node)?);
                Self::Candidates(CandidateMatches::new(engine, segment, candidates, depth))
            }
            Axis::Descendant => {
                Self::Descendants(DescendantMatches::new(engine, segment, node, depth)?)
            }
            Axis::DescendantOrSelf => Self::SelfThenDescendants(
                CandidateMatches::new(engine, segment, engine.self_candidates(node)?, depth),
                DescendantMatches::new(engine, segment, node, depth)?,
            ),
        })
    }
}

impl<N: SourceNode> Iterator for SegmentMatches<'_, N> {
    type Item = Result<N, EngineError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Candidates(candidates) => candidates.next(),
            Self::Descendants(descendants) => descendants.next(),
            Self::SelfThenDescendants(own, descendants) => {
                own.next().or_else(|| descendants.next())
            }
            Self::Failed(slot) => slot.take().map(Err),
        }
    }
}

/// Tests a fixed candidate list against a segment, lazily.
struct CandidateMatches<'q, N: SourceNode> {
    engine: &'q Engine,
    segment: &'q PathSegment<N::Kind>,
    candidates: std::vec::IntoIter<N>,
    depth: usize,
    failed: bool,
}

impl<'q, N: SourceNode> CandidateMatches<'q, N> {
    fn new(
        engine: &'q Engine,
        segment: &'q PathSegment<N::Kind>,
        candidates: Vec<N>,
        depth: usize,
    ) -> Self {
        Self {
            engine,
            segment,
            candidates: candidates.into_iter(),
            depth,
            failed: false,
        }
    }
}

impl<N: SourceNode> Iterator for CandidateMatches<'_, N> {
    type Item = Result<N, EngineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let candidate = self.candidates.next()?;
            match self.engine.segment_matches(&candidate, self.segment, self.depth) {
                Ok(true) => return Some(Ok(candidate)),
                Ok(false) => {}
                Err(error) => {
                    self.failed = true;
                    return Some(Err(error));
                }
            }
        }
    }
}

/// Pre-order descendant search. A node that matches is yielded and its
/// subtree skipped; a node that does not match is expanded.
struct DescendantMatches<'q, N: SourceNode> {
    engine: &'q Engine,
    segment: &'q PathSegment<N::Kind>,
    pending: Vec<N>,
    depth: usize,
    failed: bool,
}

impl<'q, N: SourceNode> DescendantMatches<'q, N> {
    fn new(
        engine: &'q Engine,
        segment: &'q PathSegment<N::Kind>,
        node: &N,
        depth: usize,
    ) -> Result<Self, EngineError> {
        let mut pending = engine.expanded_children(node)?;
        pending.reverse();
        Ok(Self {
            engine,
            segment,
            pending,
            depth,
            failed: false,
        })
    }
}

impl<N: SourceNode> Iterator for DescendantMatches<'_, N> {
    type Item = Result<N, EngineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let candidate = self.pending.pop()?;
            match self.engine.segment_matches(&candidate, self.segment, self.depth) {
                Ok(true) => return Some(Ok(candidate)),
                Ok(false) => match self.engine.expanded_children(&candidate) {
                    Ok(children) => {
                        for child in children.into_iter().rev() {
                            self.pending.push(child);
                        }
                    }
                    Err(error) => {
                        self.failed = true;
                        return Some(Err(error));
                    }
                },
                Err(error) => {
                    self.failed = true;
                    return Some(Err(error));
                }
            }
        }
    }
}
