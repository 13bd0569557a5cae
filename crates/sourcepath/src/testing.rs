//! A scripted tree backend for exercising the parser and engine
//! without a real syntax tree.
//!
//! Trees are declared with [`NodeSpec`] builders and stored in an
//! arena; [`StubNode`] handles index into it. Every kind test is
//! logged on the tree, so tests can observe evaluation order and
//! short-circuiting.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use crate::axis::Axis;
use crate::dialect::{Capabilities, Dialect, NodeKind};
use crate::error::EngineError;
use crate::node::{Rewrite, SourceNode};

/// A node kind matching stub nodes by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubKind {
    keyword: String,
    names: Vec<String>,
}

impl StubKind {
    /// Creates a kind matching nodes whose name is one of `names`.
    #[must_use]
    pub fn new(keyword: &str, names: &[&str]) -> Self {
        Self {
            keyword: keyword.to_owned(),
            names: names.iter().map(|&name| name.to_owned()).collect(),
        }
    }

    /// Creates a kind matching nodes named exactly like the keyword.
    #[must_use]
    pub fn literal(keyword: &str) -> Self {
        Self::new(keyword, &[keyword])
    }
}

impl NodeKind for StubKind {
    fn keyword(&self) -> &str {
        &self.keyword
    }
}

/// A dialect over [`StubKind`]s.
///
/// Open dialects resolve any keyword to a like-named kind; closed
/// dialects resolve only explicit table entries. Capabilities are
/// whatever the test asks for.
#[derive(Debug)]
pub struct StubDialect {
    table: HashMap<String, Arc<StubKind>>,
    capabilities: Capabilities,
    open: bool,
}

impl StubDialect {
    /// An open dialect with permissive capabilities.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            table: HashMap::new(),
            capabilities: Capabilities::permissive(),
            open: true,
        }
    }

    /// An open dialect with the given capabilities.
    #[must_use]
    pub fn with_capabilities(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            ..Self::permissive()
        }
    }

    /// A closed dialect resolving only `entries`, each mapping a
    /// keyword to the node names it matches.
    #[must_use]
    pub fn closed(entries: &[(&str, &[&str])]) -> Self {
        let table = entries
            .iter()
            .map(|&(keyword, names)| (keyword.to_owned(), Arc::new(StubKind::new(keyword, names))))
            .collect();
        Self {
            table,
            capabilities: Capabilities::permissive(),
            open: false,
        }
    }

    /// Adds or replaces one keyword entry.
    pub fn define(&mut self, keyword: &str, names: &[&str]) {
        self.table
            .insert(keyword.to_owned(), Arc::new(StubKind::new(keyword, names)));
    }
}

impl Dialect for StubDialect {
    type Kind = StubKind;

    fn name(&self) -> &str {
        "stub"
    }

    fn resolve(&self, keyword: &str) -> Option<Arc<StubKind>> {
        self.table
            .get(keyword)
            .map(Arc::clone)
            .or_else(|| self.open.then(|| Arc::new(StubKind::literal(keyword))))
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }
}

/// Shape-normalisation behaviour of a stub node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecRewrite {
    /// Tested as itself.
    #[default]
    None,
    /// Unwraps to its first child, like an expression statement.
    UnwrapFirstChild,
    /// Tested against each of its children, like a switch section
    /// against its labels.
    TestEachChild,
}

/// Declarative description of one stub node and its subtree.
#[derive(Debug)]
pub struct NodeSpec {
    name: String,
    text: Option<String>,
    transparent: bool,
    rewrite: SpecRewrite,
    children: Vec<NodeSpec>,
}

impl NodeSpec {
    /// A node with the given name and nothing else.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            text: None,
            transparent: false,
            rewrite: SpecRewrite::None,
            children: Vec::new(),
        }
    }

    /// Sets the node's string value.
    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_owned());
        self
    }

    /// Marks the node as a transparent wrapper.
    #[must_use]
    pub const fn transparent(mut self) -> Self {
        self.transparent = true;
        self
    }

    /// Sets the node's shape rewrite.
    #[must_use]
    pub const fn rewrite(mut self, rewrite: SpecRewrite) -> Self {
        self.rewrite = rewrite;
        self
    }

    /// Appends a child subtree.
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Builds the subtree into an arena and returns the root handle.
    #[must_use]
    pub fn build(self) -> StubNode {
        let mut nodes = Vec::new();
        let root = flatten(self, None, &mut nodes);
        let tree = Rc::new(StubTree {
            nodes,
            kind_tests: RefCell::new(Vec::new()),
            parent_axis_unsupported: false,
        });
        StubNode { tree, index: root }
    }

    /// Like [`build`](Self::build), but the resulting nodes refuse
    /// parent navigation, for tests of backends without parent links.
    #[must_use]
    pub fn build_without_parent_axis(self) -> StubNode {
        let mut nodes = Vec::new();
        let root = flatten(self, None, &mut nodes);
        let tree = Rc::new(StubTree {
            nodes,
            kind_tests: RefCell::new(Vec::new()),
            parent_axis_unsupported: true,
        });
        StubNode { tree, index: root }
    }
}

fn flatten(spec: NodeSpec, parent: Option<usize>, nodes: &mut Vec<StubNodeData>) -> usize {
    let index = nodes.len();
    nodes.push(StubNodeData {
        name: spec.name,
        text: spec.text,
        transparent: spec.transparent,
        rewrite: spec.rewrite,
        parent,
        children: Vec::new(),
    });
    let mut children = Vec::with_capacity(spec.children.len());
    for child in spec.children {
        children.push(flatten(child, Some(index), nodes));
    }
    if let Some(data) = nodes.get_mut(index) {
        data.children = children;
    }
    index
}

#[derive(Debug)]
struct StubNodeData {
    name: String,
    text: Option<String>,
    transparent: bool,
    rewrite: SpecRewrite,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// The arena behind a stub tree, plus the kind-test log.
#[derive(Debug)]
pub struct StubTree {
    nodes: Vec<StubNodeData>,
    kind_tests: RefCell<Vec<String>>,
    parent_axis_unsupported: bool,
}

/// A handle to one node of a stub tree.
#[derive(Debug, Clone)]
pub struct StubNode {
    tree: Rc<StubTree>,
    index: usize,
}

impl StubNode {
    #[expect(
        clippy::indexing_slicing,
        reason = "indices come from the builder and are always in range"
    )]
    fn data(&self) -> &StubNodeData {
        &self.tree.nodes[self.index]
    }

    fn at(&self, index: usize) -> Self {
        Self {
            tree: Rc::clone(&self.tree),
            index,
        }
    }

    /// Returns the node's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.data().name
    }

    /// Returns every kind keyword tested so far, in order, across the
    /// whole tree.
    #[must_use]
    pub fn kind_test_log(&self) -> Vec<String> {
        self.tree.kind_tests.borrow().clone()
    }

    /// Returns the first node named `name` in a pre-order walk from
    /// this node, if any.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<Self> {
        if self.name() == name {
            return Some(self.clone());
        }
        for child in self.children() {
            if let Some(found) = child.find(name) {
                return Some(found);
            }
        }
        None
    }
}

impl SourceNode for StubNode {
    type Kind = StubKind;

    fn matches_kind(&self, kind: &StubKind) -> bool {
        self.tree
            .kind_tests
            .borrow_mut()
            .push(kind.keyword.clone());
        kind.names.iter().any(|name| name == &self.data().name)
    }

    fn children(&self) -> Vec<Self> {
        self.data()
            .children
            .iter()
            .map(|&index| self.at(index))
            .collect()
    }

    fn parent(&self) -> Option<Self> {
        self.data().parent.map(|index| self.at(index))
    }

    fn string_value(&self) -> Option<String> {
        self.data().text.clone()
    }

    fn is_transparent(&self) -> bool {
        self.data().transparent
    }

    fn rewrite(&self) -> Rewrite<Self> {
        match self.data().rewrite {
            SpecRewrite::None => Rewrite::None,
            SpecRewrite::UnwrapFirstChild => self
                .children()
                .into_iter()
                .next()
                .map_or(Rewrite::None, Rewrite::Unwrap),
            SpecRewrite::TestEachChild => Rewrite::TestEach(self.children()),
        }
    }

    fn matches_constant(&self, value: &str) -> bool {
        self.data().text.as_deref() == Some(value)
    }

    fn evaluate_function(&self, name: &str, args: &[&str]) -> Result<Option<String>, EngineError> {
        let _ = args;
        match name {
            "text" => Ok(self.data().text.clone()),
            other => Err(EngineError::unknown_function(other)),
        }
    }

    fn navigate(&self, axis: Axis) -> Result<Vec<Self>, EngineError> {
        if self.tree.parent_axis_unsupported
            && matches!(axis, Axis::Parent | Axis::Ancestor | Axis::AncestorOrSelf)
        {
            return Err(EngineError::unsupported_axis(axis));
        }
        default_navigate(self, axis)
    }
}

/// Structural navigation over the arena.
fn default_navigate(node: &StubNode, axis: Axis) -> Result<Vec<StubNode>, EngineError> {
    match axis {
        Axis::Self_ => Ok(vec![node.clone()]),
        Axis::Child => Ok(node.children()),
        Axis::Parent => Ok(node.parent().into_iter().collect()),
        Axis::Descendant => {
            let mut nodes = Vec::new();
            collect_descendants(node, &mut nodes);
            Ok(nodes)
        }
        Axis::DescendantOrSelf => {
            let mut nodes = vec![node.clone()];
            collect_descendants(node, &mut nodes);
            Ok(nodes)
        }
        Axis::Ancestor => Ok(collect_ancestors(node)),
        Axis::AncestorOrSelf => {
            let mut nodes = vec![node.clone()];
            nodes.extend(collect_ancestors(node));
            Ok(nodes)
        }
    }
}

fn collect_descendants(node: &StubNode, into: &mut Vec<StubNode>) {
    for child in node.children() {
        into.push(child.clone());
        collect_descendants(&child, into);
    }
}

fn collect_ancestors(node: &StubNode) -> Vec<StubNode> {
    let mut collected = Vec::new();
    let mut current = node.parent();
    while let Some(next) = current {
        current = next.parent();
        collected.push(next);
    }
    collected
}
