//! Tests for path resolution and span-name splitting

use serde_json::json;

use super::*;

fn named(id: &str, name: &str, raw_data: JsonValue) -> Span {
    Span::new(id, name, raw_data)
}

// ============================================================================
// resolve_value
// ============================================================================

#[test]
fn test_resolve_top_level_key() {
    let data = json!({"temp": 72});
    assert_eq!(resolve_value(&data, "temp"), Some(&json!(72)));
}

#[test]
fn test_resolve_nested_key() {
    let data = json!({"a": {"b": {"c": "deep"}}});
    assert_eq!(resolve_value(&data, "a.b.c"), Some(&json!("deep")));
    assert_eq!(resolve_value(&data, "a.b"), Some(&json!({"c": "deep"})));
}

#[test]
fn test_resolve_missing_key_is_none() {
    let data = json!({"a": {"b": 1}});
    assert_eq!(resolve_value(&data, "a.x"), None);
    assert_eq!(resolve_value(&data, "x.b"), None);
}

#[test]
fn test_resolve_through_scalar_is_none() {
    let data = json!({"a": "text"});
    assert_eq!(resolve_value(&data, "a.length"), None);
}

#[test]
fn test_resolve_through_null_is_none() {
    let data = json!({"a": null});
    assert_eq!(resolve_value(&data, "a.b"), None);
}

#[test]
fn test_resolve_present_null() {
    let data = json!({"a": null});
    assert_eq!(resolve_value(&data, "a"), Some(&JsonValue::Null));
}

#[test]
fn test_resolve_empty_path_is_none() {
    let data = json!({"": 1});
    assert_eq!(resolve_value(&data, ""), None);
}

#[test]
fn test_resolve_on_null_root_is_none() {
    assert_eq!(resolve_value(&JsonValue::Null, "a"), None);
}

#[test]
fn test_resolve_array_index() {
    let data = json!({"messages": [{"role": "user"}, {"role": "assistant"}]});
    assert_eq!(
        resolve_value(&data, "messages.1.role"),
        Some(&json!("assistant"))
    );
    assert_eq!(resolve_value(&data, "messages.2.role"), None);
}

#[test]
fn test_resolve_rejects_non_canonical_index() {
    let data = json!({"items": ["a", "b"]});
    assert_eq!(resolve_value(&data, "items.01"), None);
    assert_eq!(resolve_value(&data, "items.+1"), None);
    assert_eq!(resolve_value(&data, "items.-1"), None);
    assert_eq!(resolve_value(&data, "items.0"), Some(&json!("a")));
}

#[test]
fn test_resolve_does_not_match_dotted_keys() {
    let data = json!({"attributes": {"gen_ai.usage.input_tokens": 5}});
    assert_eq!(
        resolve_value(&data, "attributes.gen_ai.usage.input_tokens"),
        None
    );

    let flat = json!({"a.b": 1});
    assert_eq!(resolve_value(&flat, "a.b"), None);
}

#[test]
fn test_resolve_stops_at_first_missing_segment() {
    // "gen_ai" exists but does not contain the rest; the flat key is ignored
    let data = json!({
        "gen_ai": {"system": "openai"},
        "gen_ai.usage": {"tokens": 9}
    });
    assert_eq!(resolve_value(&data, "gen_ai.usage.tokens"), None);
    assert_eq!(resolve_value(&data, "gen_ai.system"), Some(&json!("openai")));
}

#[test]
fn test_resolve_nested_key_beside_flat_twin() {
    let data = json!({
        "a": {"b": "nested"},
        "a.b": "flat"
    });
    assert_eq!(resolve_value(&data, "a.b"), Some(&json!("nested")));
}

#[test]
fn test_resolve_keys_is_literal() {
    let data = json!({"attributes": {"gen_ai.system": "anthropic"}});

    assert_eq!(
        resolve_keys(&data, ["attributes", "gen_ai.system"]),
        Some(&json!("anthropic"))
    );
    assert_eq!(resolve_keys(&data, ["attributes", "gen_ai", "system"]), None);
    assert_eq!(resolve_keys(&data, Vec::<String>::new()), Some(&data));
}

// ============================================================================
// split_span_prefix
// ============================================================================

#[test]
fn test_split_prefix_prefers_longest_name() {
    assert_eq!(
        split_span_prefix("A.B.value", ["A", "A.B"]),
        Some(("A.B", "value"))
    );
    assert_eq!(
        split_span_prefix("A.B.value", ["A.B", "A"]),
        Some(("A.B", "value"))
    );
}

#[test]
fn test_split_prefix_requires_dot_boundary() {
    assert_eq!(split_span_prefix("Weathervane.x", ["Weather"]), None);
    assert_eq!(split_span_prefix("Weather", ["Weather"]), None);
    assert_eq!(split_span_prefix("Weather.", ["Weather"]), Some(("Weather", "")));
}

#[test]
fn test_split_prefix_ignores_empty_names() {
    assert_eq!(split_span_prefix(".x", [""]), None);
}

// ============================================================================
// split_path_by_span_name
// ============================================================================

#[test]
fn test_split_path_longest_prefix_wins() {
    let spans = vec![
        named("s1", "A", json!({"B": {"value": "short"}})),
        named("s2", "A.B", json!({"value": "long"})),
    ];

    let split = split_path_by_span_name("A.B.value", &spans).unwrap();
    assert_eq!(split.span_id, "s2");
    assert_eq!(split.span_name, "A.B");
    assert_eq!(split.remaining_keys, vec!["value"]);
}

#[test]
fn test_split_path_dotted_span_before_plain_span() {
    let spans = vec![
        named("s1", "A.B", json!({"x": {"y": 1}})),
        named("s2", "A", json!({"B": {"x": {"y": 99}}})),
    ];

    let split = split_path_by_span_name("A.B.x.y", &spans).unwrap();
    assert_eq!(split.span_id, "s1");
    assert_eq!(split.parent_keys().to_vec(), vec!["x".to_string()]);
    assert_eq!(split.final_key(), Some("y"));
    assert_eq!(split.attribute_path(), "x.y");
}

#[test]
fn test_split_path_invalid_remainder_is_not_found() {
    // Longest name is chosen first; its payload does not contain the path
    let spans = vec![
        named("s1", "A", json!({"B": {"value": 1}})),
        named("s2", "A.B", json!({"other": 2})),
    ];
    assert_eq!(split_path_by_span_name("A.B.value", &spans), None);
}

#[test]
fn test_split_path_missing_final_key() {
    let spans = vec![named("s1", "tool", json!({"input": {"query": "q"}}))];
    assert_eq!(split_path_by_span_name("tool.input.missing", &spans), None);
}

#[test]
fn test_split_path_intermediate_not_a_record() {
    let spans = vec![named("s1", "tool", json!({"input": "flat"}))];
    assert_eq!(split_path_by_span_name("tool.input.query", &spans), None);
}

#[test]
fn test_split_path_final_key_with_null_value_is_found() {
    let spans = vec![named("s1", "tool", json!({"output": null}))];
    let split = split_path_by_span_name("tool.output", &spans).unwrap();
    assert_eq!(split.remaining_keys, vec!["output"]);
}

#[test]
fn test_split_path_rejects_flat_dotted_key() {
    let spans = vec![named("s1", "llm", json!({"gen_ai.system": "openai"}))];
    assert_eq!(split_path_by_span_name("llm.gen_ai.system", &spans), None);
}

#[test]
fn test_split_path_no_matching_span() {
    let spans = vec![named("s1", "tool", json!({"a": 1}))];
    assert_eq!(split_path_by_span_name("other.a", &spans), None);
    assert_eq!(split_path_by_span_name("tool", &spans), None);
    assert_eq!(split_path_by_span_name("tool.", &spans), None);
}

#[test]
fn test_split_path_ties_go_to_first_span() {
    let spans = vec![
        named("first", "tool", json!({"a": 1})),
        named("second", "tool", json!({"a": 2})),
    ];
    let split = split_path_by_span_name("tool.a", &spans).unwrap();
    assert_eq!(split.span_id, "first");
    assert_eq!(split.span_index, 0);
}

#[test]
fn test_split_path_skips_unnamed_spans() {
    let unnamed = Span {
        span_id: "anon".to_string(),
        raw_data: json!({"a": 1}),
        ..Span::default()
    };
    let spans = vec![unnamed, named("s1", "tool", json!({"a": 2}))];
    let split = split_path_by_span_name("tool.a", &spans).unwrap();
    assert_eq!(split.span_id, "s1");
}

#[test]
fn test_split_path_accepts_borrowed_spans() {
    let owned = [named("s1", "tool", json!({"a": 1}))];
    let borrowed: Vec<&Span> = owned.iter().collect();
    assert!(split_path_by_span_name("tool.a", &borrowed).is_some());
}

// ============================================================================
// leaf_paths
// ============================================================================

#[test]
fn test_leaf_paths_document_order() {
    let data = json!({
        "input": {"query": "weather", "limit": 3},
        "tags": ["a", "b"],
        "empty": {},
        "none": null
    });

    let paths: Vec<String> = leaf_paths(&data).into_iter().map(|l| l.path).collect();
    assert_eq!(
        paths,
        vec![
            "input.query",
            "input.limit",
            "tags.0",
            "tags.1",
            "empty",
            "none"
        ]
    );
}

#[test]
fn test_leaf_paths_resolve_back() {
    let data = json!({"a": {"b": [{"d": true}], "c": null}});
    let leaves = leaf_paths(&data);
    assert_eq!(leaves.len(), 2);
    for leaf in leaves {
        assert_eq!(resolve_value(&data, &leaf.path), Some(leaf.value));
    }
}

#[test]
fn test_leaf_paths_skip_dotted_keys() {
    let data = json!({
        "attributes": {
            "gen_ai.request.model": "gpt-4",
            "gen_ai.usage": {"tokens": 3},
            "model": "gpt-4"
        }
    });

    let paths: Vec<String> = leaf_paths(&data).into_iter().map(|l| l.path).collect();
    assert_eq!(paths, vec!["attributes.model"]);
}

#[test]
fn test_leaf_paths_scalar_root() {
    assert!(leaf_paths(&json!(5)).is_empty());
}
