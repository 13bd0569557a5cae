//! The [`SourceNode`] implementation over Tree-sitter nodes.

use sourcepath::{EngineError, Rewrite, SourceNode};

use crate::dialect::RustKind;

/// Wrappers that navigation jumps over: they group children without
/// adding shape of their own, so `mod m { fn f() {} }` answers `mod/fn`
/// even though the grammar puts a `declaration_list` in between.
const TRANSPARENT_KINDS: &[&str] = &[
    "source_file",
    "declaration_list",
    "field_declaration_list",
    "function_modifiers",
];

/// Grammar kinds whose text is a usable string value.
const STRING_VALUED_KINDS: &[&str] = &[
    "identifier",
    "type_identifier",
    "field_identifier",
    "shorthand_field_identifier",
    "primitive_type",
];

/// One node of a [`SourceTree`](crate::SourceTree).
///
/// A cheap handle: a Tree-sitter node plus the source text it indexes
/// into.
#[derive(Debug, Clone, Copy)]
pub struct TreeNode<'t> {
    node: tree_sitter::Node<'t>,
    source: &'t str,
}

impl<'t> TreeNode<'t> {
    pub(crate) const fn new(node: tree_sitter::Node<'t>, source: &'t str) -> Self {
        Self { node, source }
    }

    /// Returns the grammar kind name of this node.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.node.kind()
    }

    /// Returns the node's text.
    #[must_use]
    pub fn text(&self) -> &'t str {
        self.source.get(self.node.byte_range()).unwrap_or_default()
    }

    /// Returns the one-based start line of this node.
    #[must_use]
    pub fn line(&self) -> usize {
        self.node.start_position().row.saturating_add(1)
    }

    const fn wrap(&self, node: tree_sitter::Node<'t>) -> Self {
        Self {
            node,
            source: self.source,
        }
    }

    /// Collects alternative patterns for match-arm kind testing:
    /// `1 | 2 => ...` should answer a kind test for either literal.
    fn pattern_alternatives(&self, into: &mut Vec<Self>) {
        match self.node.kind() {
            "match_pattern" | "or_pattern" => {
                let mut cursor = self.node.walk();
                for child in self.node.named_children(&mut cursor) {
                    self.wrap(child).pattern_alternatives(into);
                }
            }
            _ => into.push(*self),
        }
    }
}

impl SourceNode for TreeNode<'_> {
    type Kind = RustKind;

    fn matches_kind(&self, kind: &RustKind) -> bool {
        if kind.is_wildcard() {
            return self.node.is_named();
        }
        if kind.node_kinds().contains(&self.node.kind()) {
            return true;
        }
        // Primitive types are one grammar kind distinguished by text.
        self.node.kind() == "primitive_type"
            && kind.token_texts().iter().any(|&text| text == self.text())
    }

    fn children(&self) -> Vec<Self> {
        let mut cursor = self.node.walk();
        self.node
            .children(&mut cursor)
            .map(|child| self.wrap(child))
            .collect()
    }

    fn parent(&self) -> Option<Self> {
        self.node.parent().map(|parent| self.wrap(parent))
    }

    fn string_value(&self) -> Option<String> {
        if STRING_VALUED_KINDS.contains(&self.node.kind()) {
            return Some(self.text().to_owned());
        }
        None
    }

    fn is_transparent(&self) -> bool {
        TRANSPARENT_KINDS.contains(&self.node.kind())
    }

    fn rewrite(&self) -> Rewrite<Self> {
        match self.node.kind() {
            // An expression statement stands for its expression.
            "expression_statement" => self
                .node
                .named_child(0)
                .map_or(Rewrite::None, |inner| Rewrite::Unwrap(self.wrap(inner))),
            // A match arm stands for each of its pattern alternatives.
            "match_arm" => {
                let Some(pattern) = self.node.child_by_field_name("pattern") else {
                    return Rewrite::None;
                };
                let mut alternatives = Vec::new();
                self.wrap(pattern).pattern_alternatives(&mut alternatives);
                Rewrite::TestEach(alternatives)
            }
            _ => Rewrite::None,
        }
    }

    fn matches_constant(&self, value: &str) -> bool {
        self.text() == value
    }

    fn evaluate_function(&self, name: &str, args: &[&str]) -> Result<Option<String>, EngineError> {
        let _ = args;
        match name {
            "text" => Ok(Some(self.text().to_owned())),
            other => Err(EngineError::unknown_function(other)),
        }
    }
}
