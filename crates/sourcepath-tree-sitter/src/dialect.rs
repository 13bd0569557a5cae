//! The Rust keyword vocabulary.

use std::collections::HashMap;
use std::sync::Arc;

use sourcepath::{Capabilities, Dialect, NodeKind};

/// A resolved keyword of the Rust dialect.
///
/// Most kinds map a keyword to one or more grammar node kinds.
/// Primitive types share the single `primitive_type` grammar kind and
/// are told apart by token text; the wildcard matches any named node.
#[derive(Debug, Clone)]
pub struct RustKind {
    keyword: &'static str,
    node_kinds: &'static [&'static str],
    token_texts: &'static [&'static str],
    wildcard: bool,
}

impl RustKind {
    const fn named(keyword: &'static str, node_kinds: &'static [&'static str]) -> Self {
        Self {
            keyword,
            node_kinds,
            token_texts: &[],
            wildcard: false,
        }
    }

    const fn primitive(keyword: &'static &'static str) -> Self {
        Self {
            keyword,
            node_kinds: &[],
            token_texts: std::slice::from_ref(keyword),
            wildcard: false,
        }
    }

    const fn wildcard() -> Self {
        Self {
            keyword: "*",
            node_kinds: &[],
            token_texts: &[],
            wildcard: true,
        }
    }

    /// Returns the grammar node kinds this keyword matches.
    #[must_use]
    pub const fn node_kinds(&self) -> &'static [&'static str] {
        self.node_kinds
    }

    /// Returns the `primitive_type` token texts this keyword matches.
    #[must_use]
    pub const fn token_texts(&self) -> &'static [&'static str] {
        self.token_texts
    }

    /// Returns whether this is the `*` wildcard.
    #[must_use]
    pub const fn is_wildcard(&self) -> bool {
        self.wildcard
    }
}

impl NodeKind for RustKind {
    fn keyword(&self) -> &str {
        self.keyword
    }
}

/// Primitive type names, matched by token text on `primitive_type`
/// nodes.
const PRIMITIVE_TYPES: &[&str] = &[
    "u8", "u16", "u32", "u64", "u128", "usize", "i8", "i16", "i32", "i64", "i128", "isize", "f32",
    "f64", "bool", "char", "str",
];

fn keyword_table() -> Vec<RustKind> {
    let mut table = vec![
        RustKind::wildcard(),
        RustKind::named("fn", &["function_item", "function_signature_item"]),
        RustKind::named("struct", &["struct_item"]),
        RustKind::named("enum", &["enum_item"]),
        RustKind::named("union", &["union_item"]),
        RustKind::named("trait", &["trait_item"]),
        RustKind::named("impl", &["impl_item"]),
        RustKind::named("mod", &["mod_item"]),
        RustKind::named("use", &["use_declaration"]),
        RustKind::named("let", &["let_declaration"]),
        RustKind::named("const", &["const_item"]),
        RustKind::named("static", &["static_item"]),
        RustKind::named("type", &["type_item"]),
        RustKind::named("field", &["field_declaration"]),
        RustKind::named("param", &["parameter"]),
        RustKind::named("attr", &["attribute_item", "inner_attribute_item"]),
        RustKind::named("macro", &["macro_definition"]),
        RustKind::named("if", &["if_expression"]),
        RustKind::named("match", &["match_expression"]),
        RustKind::named("arm", &["match_arm"]),
        RustKind::named("loop", &["loop_expression"]),
        RustKind::named("while", &["while_expression"]),
        RustKind::named("for", &["for_expression"]),
        RustKind::named("return", &["return_expression"]),
        RustKind::named("await", &["await_expression"]),
        RustKind::named("closure", &["closure_expression"]),
        RustKind::named("call", &["call_expression", "macro_invocation"]),
        RustKind::named("block", &["block"]),
        RustKind::named(
            "literal",
            &[
                "integer_literal",
                "float_literal",
                "string_literal",
                "raw_string_literal",
                "char_literal",
                "boolean_literal",
            ],
        ),
        RustKind::named(
            "name",
            &["identifier", "type_identifier", "field_identifier"],
        ),
        RustKind::named("pub", &["visibility_modifier"]),
        RustKind::named("async", &["async"]),
        RustKind::named("unsafe", &["unsafe"]),
    ];
    table.extend(PRIMITIVE_TYPES.iter().map(RustKind::primitive));
    table
}

/// The Rust dialect: keyword table over the tree-sitter-rust grammar,
/// with permissive capabilities.
#[derive(Debug)]
pub struct RustDialect {
    kinds: HashMap<&'static str, Arc<RustKind>>,
}

impl RustDialect {
    /// Builds the dialect with its full keyword table.
    #[must_use]
    pub fn new() -> Self {
        let kinds = keyword_table()
            .into_iter()
            .map(|kind| (kind.keyword, Arc::new(kind)))
            .collect();
        Self { kinds }
    }
}

impl Default for RustDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for RustDialect {
    type Kind = RustKind;

    fn name(&self) -> &str {
        "rust"
    }

    fn resolve(&self, keyword: &str) -> Option<Arc<RustKind>> {
        self.kinds.get(keyword).map(Arc::clone)
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::permissive()
    }
}
