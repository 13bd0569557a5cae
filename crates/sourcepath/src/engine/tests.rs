use rstest::rstest;

use super::{Engine, EngineConfig};
use crate::axis::Axis;
use crate::error::EngineError;
use crate::parser::PathParser;
use crate::path::SourcePath;
use crate::testing::{NodeSpec, SpecRewrite, StubDialect, StubKind, StubNode};

fn parse(text: &str) -> SourcePath<StubKind> {
    let dialect = StubDialect::permissive();
    PathParser::new(&dialect).parse(text).expect("parse")
}

fn query(text: &str, root: &StubNode, default_axis: Axis) -> Vec<String> {
    let path = parse(text);
    let sequence = path.as_sequence().expect("sequence");
    Engine::new()
        .query_all(sequence, root, default_axis)
        .collect::<Result<Vec<_>, _>>()
        .expect("query")
        .iter()
        .map(|node| node.name().to_owned())
        .collect()
}

fn matches(text: &str, node: &StubNode, default_axis: Axis) -> bool {
    parse(text).matches(node, default_axis).expect("matches")
}

#[test]
fn descendant_matches_are_not_searched_internally() {
    let root = NodeSpec::new("file")
        .child(NodeSpec::new("loop").child(NodeSpec::new("loop")))
        .build();
    assert_eq!(query("//loop", &root, Axis::Child), ["loop"]);
}

#[test]
fn descendant_searches_non_matching_subtrees() {
    let root = NodeSpec::new("file")
        .child(NodeSpec::new("class").child(NodeSpec::new("method")))
        .build();
    assert_eq!(query("//method", &root, Axis::Child), ["method"]);
}

#[test]
fn segments_compose_left_to_right() {
    let root = NodeSpec::new("file")
        .child(
            NodeSpec::new("class")
                .child(NodeSpec::new("method").child(NodeSpec::new("block")))
                .child(NodeSpec::new("field")),
        )
        .build();
    assert_eq!(query("class/method/block", &root, Axis::Child), ["block"]);
    assert_eq!(query("//method/block", &root, Axis::Child), ["block"]);
    assert_eq!(query("class/block", &root, Axis::Child), Vec::<String>::new());
}

#[test]
fn child_navigation_skips_transparent_wrappers() {
    let root = NodeSpec::new("file")
        .child(
            NodeSpec::new("wrapper")
                .transparent()
                .child(NodeSpec::new("method")),
        )
        .build();
    // The wrapper is never a candidate; its children are.
    assert_eq!(query("/method", &root, Axis::Child), ["method"]);
    assert_eq!(query("/wrapper", &root, Axis::Child), Vec::<String>::new());
}

#[test]
fn self_axis_on_a_transparent_node_tests_direct_children_once() {
    let wrapper = NodeSpec::new("wrapper")
        .transparent()
        .child(NodeSpec::new("method"))
        .build();
    assert!(matches("self::method", &wrapper, Axis::Child));

    let nested = NodeSpec::new("wrapper")
        .transparent()
        .child(
            NodeSpec::new("inner")
                .transparent()
                .child(NodeSpec::new("method")),
        )
        .build();
    // One level only: a second transparent layer is not expanded.
    assert!(!matches("self::method", &nested, Axis::Child));
}

#[test]
fn parent_axis_skips_transparent_wrappers() {
    let root = NodeSpec::new("mod")
        .child(
            NodeSpec::new("wrapper")
                .transparent()
                .child(NodeSpec::new("fn")),
        )
        .build();
    let function = root.find("fn").expect("fn");
    assert!(matches("self::fn[parent::mod]", &function, Axis::Child));
    assert!(!matches("self::fn[parent::wrapper]", &function, Axis::Child));
}

#[test]
fn ancestor_axis_walks_non_transparent_enclosures() {
    let root = NodeSpec::new("file")
        .child(
            NodeSpec::new("mod").child(
                NodeSpec::new("wrapper")
                    .transparent()
                    .child(NodeSpec::new("fn")),
            ),
        )
        .build();
    let function = root.find("fn").expect("fn");
    assert!(matches("self::fn[ancestor::file]", &function, Axis::Child));
    assert!(matches("self::fn[ancestor::mod]", &function, Axis::Child));
    assert!(!matches("self::fn[ancestor::wrapper]", &function, Axis::Child));
}

#[rstest]
#[case("miss && hit", &["miss"])]
#[case("hit || miss", &["hit"])]
fn boolean_operators_short_circuit(#[case] text: &str, #[case] tested: &[&str]) {
    let node = NodeSpec::new("hit").build();
    let path = parse(text);
    let matched = path.matches(&node, Axis::Self_).expect("matches");
    assert_eq!(matched, text.contains("||"));
    assert_eq!(node.kind_test_log(), tested);
}

#[test]
fn default_axis_applies_to_the_first_segment_only() {
    let root = NodeSpec::new("class")
        .child(NodeSpec::new("class").child(NodeSpec::new("method")))
        .build();
    // Self default: the path anchors at the root itself.
    assert!(matches("class/class", &root, Axis::Self_));
    // Child default: the path starts below the root.
    assert!(!matches("class/class", &root, Axis::Child));
    assert!(matches("class/method", &root, Axis::Child));
}

#[test]
fn equality_projects_the_first_nested_match() {
    let node = NodeSpec::new("class")
        .child(NodeSpec::new("name").text("C1"))
        .child(NodeSpec::new("name").text("C2"))
        .build();
    assert!(matches("self::class[name == 'C1']", &node, Axis::Child));
    assert!(!matches("self::class[name == 'C2']", &node, Axis::Child));
    assert!(matches("self::class['C1' == name]", &node, Axis::Child));
}

#[test]
fn equality_with_no_projection_is_false_not_fatal() {
    let node = NodeSpec::new("class").build();
    assert!(!matches("self::class[name == 'C1']", &node, Axis::Child));
    // A node with no string value projects nothing either.
    let unnamed = NodeSpec::new("class").child(NodeSpec::new("name")).build();
    assert!(!matches("self::class[name == '']", &unnamed, Axis::Child));
}

#[test]
fn equality_can_project_a_backend_function() {
    let node = NodeSpec::new("class")
        .text("C1")
        .child(NodeSpec::new("name").text("C1"))
        .build();
    assert!(matches(
        "self::class[name == .text('ignored')]",
        &node,
        Axis::Child
    ));
}

#[test]
fn constant_filters_test_the_filtered_node() {
    let node = NodeSpec::new("modifier").text("public").build();
    assert!(matches("self::modifier['public']", &node, Axis::Child));
    assert!(!matches("self::modifier['private']", &node, Axis::Child));
}

#[rstest]
#[case("self::name[.starts-with('int')]", true)]
#[case("self::name[.ends-with('nal')]", true)]
#[case("self::name[.contains('tern')]", true)]
#[case("self::name[.starts-with('x')]", false)]
fn string_functions_test_the_string_value(#[case] text: &str, #[case] expected: bool) {
    let node = NodeSpec::new("name").text("internal").build();
    assert_eq!(matches(text, &node, Axis::Child), expected);
}

#[test]
fn string_functions_are_false_without_a_string_value() {
    let node = NodeSpec::new("block").build();
    assert!(!matches("self::block[.starts-with('x')]", &node, Axis::Child));
}

#[test]
fn unknown_functions_are_fatal() {
    let node = NodeSpec::new("block").build();
    let error = parse("self::block[.bogus('x')]")
        .matches(&node, Axis::Child)
        .expect_err("should fail");
    assert_eq!(error, EngineError::unknown_function("bogus"));
}

#[test]
fn unsupported_axes_are_fatal() {
    let node = NodeSpec::new("fn").build_without_parent_axis();
    let error = parse("self::fn[parent::mod]")
        .matches(&node, Axis::Child)
        .expect_err("should fail");
    assert_eq!(error, EngineError::unsupported_axis(Axis::Parent));
}

#[test]
fn fatal_errors_end_the_iteration_after_one_yield() {
    let root = NodeSpec::new("file")
        .child(NodeSpec::new("fn"))
        .child(NodeSpec::new("fn"))
        .build_without_parent_axis();
    let path = parse("fn[parent::file]");
    let sequence = path.as_sequence().expect("sequence");
    let engine = Engine::new();
    let mut results = engine.query_all(sequence, &root, Axis::Child);
    assert!(matches!(results.next(), Some(Err(_))));
    assert!(results.next().is_none());
}

#[test]
fn depth_limit_stops_runaway_nesting() {
    let node = NodeSpec::new("a").build();
    let engine = Engine::with_config(EngineConfig::with_max_depth(3));
    let error = engine
        .matches(&parse("self::a[self::a[self::a[self::a]]]"), &node, Axis::Child)
        .expect_err("should fail");
    assert_eq!(error, EngineError::depth_exceeded(3));

    // Within the limit the same shape evaluates fine.
    let roomy = Engine::with_config(EngineConfig::with_max_depth(32));
    assert!(roomy
        .matches(&parse("self::a[self::a[self::a[self::a]]]"), &node, Axis::Child)
        .expect("matches"));
}

#[test]
fn unwrap_rewrites_test_the_inner_node() {
    let root = NodeSpec::new("block")
        .child(
            NodeSpec::new("statement")
                .rewrite(SpecRewrite::UnwrapFirstChild)
                .child(NodeSpec::new("call")),
        )
        .build();
    // The statement matches as its wrapped call, and is the node that
    // gets yielded.
    assert_eq!(query("/call", &root, Axis::Child), ["statement"]);

    let statement = root.find("statement").expect("statement");
    assert!(matches("self::call", &statement, Axis::Child));
    assert!(!matches("self::statement", &statement, Axis::Child));
}

#[test]
fn proxy_rewrites_yield_the_node_once() {
    let dialect = StubDialect::closed(&[
        ("section", &["section"]),
        ("case", &["case-label"]),
    ]);
    let root = NodeSpec::new("switch")
        .child(
            NodeSpec::new("section")
                .rewrite(SpecRewrite::TestEachChild)
                .child(NodeSpec::new("case-label"))
                .child(NodeSpec::new("case-label")),
        )
        .build();

    let path = PathParser::new(&dialect).parse("case").expect("parse");
    let sequence = path.as_sequence().expect("sequence");
    let engine = Engine::new();
    let found: Vec<String> = engine
        .query_all(sequence, &root, Axis::Child)
        .collect::<Result<Vec<_>, _>>()
        .expect("query")
        .iter()
        .map(|node| node.name().to_owned())
        .collect();
    // Two matching labels, one section.
    assert_eq!(found, ["section"]);

    // The node's own kind still works as a fallback.
    let own = PathParser::new(&dialect).parse("section").expect("parse");
    let section = root.find("section").expect("section");
    assert!(own.matches(&section, Axis::Self_).expect("matches"));
}

#[test]
fn query_all_tests_candidates_lazily() {
    let root = NodeSpec::new("file")
        .child(NodeSpec::new("fn"))
        .child(NodeSpec::new("fn"))
        .child(NodeSpec::new("fn"))
        .build();
    let path = parse("/fn");
    let sequence = path.as_sequence().expect("sequence");
    let engine = Engine::new();
    let first = engine
        .query_all(sequence, &root, Axis::Child)
        .next()
        .expect("a match")
        .expect("no error");
    assert_eq!(first.name(), "fn");
    // Only the first candidate was ever tested.
    assert_eq!(root.kind_test_log().len(), 1);
}

#[test]
fn query_all_yields_in_document_order() {
    let root = NodeSpec::new("file")
        .child(NodeSpec::new("class").child(NodeSpec::new("fn")))
        .child(NodeSpec::new("fn"))
        .build();
    // Pre-order: the nested fn comes before the top-level one.
    let path = parse("//fn");
    let sequence = path.as_sequence().expect("sequence");
    let engine = Engine::new();
    let found: Vec<String> = engine
        .query_all(sequence, &root, Axis::Child)
        .collect::<Result<Vec<_>, _>>()
        .expect("query")
        .iter()
        .map(|node| node.name().to_owned())
        .collect();
    assert_eq!(found, ["fn", "fn"]);
}

#[test]
fn descendant_or_self_covers_the_anchor() {
    let root = NodeSpec::new("fn").child(NodeSpec::new("fn")).build();
    let dialect = StubDialect::permissive();
    let path = PathParser::new(&dialect)
        .parse_with_axis("fn", Axis::DescendantOrSelf)
        .expect("parse");
    let sequence = path.as_sequence().expect("sequence");
    let engine = Engine::new();
    let count = engine
        .query_all(sequence, &root, Axis::Child)
        .collect::<Result<Vec<_>, _>>()
        .expect("query")
        .len();
    // The anchor matches through the self half; the inner fn through
    // the descendant half.
    assert_eq!(count, 2);
}

#[test]
fn filters_with_nested_sequences_anchor_at_the_tested_node() {
    let root = NodeSpec::new("file")
        .child(
            NodeSpec::new("class")
                .child(NodeSpec::new("attribute"))
                .child(NodeSpec::new("method")),
        )
        .child(NodeSpec::new("class").child(NodeSpec::new("method")))
        .build();
    // Only the first class carries an attribute, so only its method
    // survives the filter.
    let found = query("class[attribute]/method", &root, Axis::Child);
    assert_eq!(found, ["method"]);
}
