//! Depth-limited payload shaping
//!
//! Some sinks cannot index deeply nested or oddly keyed payloads. [`bound`]
//! keeps the first `max_depth` levels of mappings structured and collapses
//! anything deeper into a JSON string. On every structured level it also
//! rewrites keys that such stores reject: numeric-looking keys get a `__`
//! prefix and `.`/`$` become `_`.

use serde_json::{Map, Value};

/// Depth used by the logger when none is configured
pub const DEFAULT_MAX_DEPTH: usize = 2;

const NUMERIC_KEY_PREFIX: &str = "__";

/// True when the key starts like an integer: optional leading whitespace,
/// optional sign, then a digit. `"1"`, `"-2"` and `"3rd"` all qualify.
fn is_numeric_key(key: &str) -> bool {
    let rest = key.trim_start();
    let rest = rest
        .strip_prefix('-')
        .or_else(|| rest.strip_prefix('+'))
        .unwrap_or(rest);
    rest.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// Rewrite a key so positional and dot-path sensitive stores accept it
pub fn normalize_key(key: &str) -> String {
    let key = if is_numeric_key(key) {
        format!("{NUMERIC_KEY_PREFIX}{key}")
    } else {
        key.to_string()
    };
    key.replace(['.', '$'], "_")
}

/// Bound `tree` to `max_depth` structured levels.
///
/// At depth 0 the whole subtree becomes a single JSON string. Otherwise every
/// key of a mapping is normalized and mapping values are bounded with one
/// level less; sequences and scalars pass through untouched.
pub fn bound(tree: &Value, max_depth: usize) -> Value {
    if max_depth == 0 {
        return Value::String(tree.to_string());
    }
    match tree {
        Value::Object(map) => Value::Object(bound_map(map, max_depth)),
        other => other.clone(),
    }
}

/// [`bound`] for a top-level mapping. The top level itself always stays a
/// mapping; with `max_depth` 0 or 1 every nested mapping is collapsed.
pub fn bound_map(map: &Map<String, Value>, max_depth: usize) -> Map<String, Value> {
    let mut out = Map::with_capacity(map.len());
    for (key, value) in map {
        let value = match value {
            Value::Object(_) => bound(value, max_depth.saturating_sub(1)),
            other => other.clone(),
        };
        out.insert(normalize_key(key), value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_depth_zero_collapses_everything() {
        let out = bound(&json!({"a": {"b": {"c": 1}}}), 0);
        assert_eq!(out, json!(r#"{"a":{"b":{"c":1}}}"#));
    }

    #[test]
    fn test_depth_one_collapses_nested_maps() {
        let out = bound(&json!({"a": {"b": {"c": 1}}, "n": 5}), 1);
        assert_eq!(out, json!({"a": r#"{"b":{"c":1}}"#, "n": 5}));
    }

    #[test]
    fn test_depth_two_keeps_first_nested_level() {
        let out = bound(&json!({"a": {"b": {"c": 1}}}), 2);
        assert_eq!(out, json!({"a": {"b": r#"{"c":1}"#}}));
    }

    #[test]
    fn test_sequences_pass_through() {
        let tree = json!({"list": [{"deep": {"x": 1}}, 2]});
        assert_eq!(bound(&tree, 1), tree);
    }

    #[test]
    fn test_key_normalization() {
        assert_eq!(normalize_key("1"), "__1");
        assert_eq!(normalize_key("a.b$c"), "a_b_c");
        assert_eq!(normalize_key("-4"), "__-4");
        assert_eq!(normalize_key("2.5"), "__2_5");
        assert_eq!(normalize_key("3rd"), "__3rd");
        assert_eq!(normalize_key("user"), "user");
        assert_eq!(normalize_key("v1"), "v1");
    }

    #[test]
    fn test_keys_normalized_on_nested_levels() {
        let out = bound(&json!({"outer.key": {"0": "zero", "$set": 1}}), 2);
        assert_eq!(out, json!({"outer_key": {"__0": "zero", "_set": 1}}));
    }

    #[test]
    fn test_bound_map_keeps_top_level_at_depth_zero() {
        let map = json!({"a.b": {"c": 1}, "d": 2});
        let out = bound_map(map.as_object().unwrap(), 0);
        assert_eq!(Value::Object(out), json!({"a_b": r#"{"c":1}"#, "d": 2}));
    }

    #[test]
    fn test_collapsed_subtree_keeps_raw_keys() {
        let out = bound(&json!({"a": {"b.c": 1}}), 1);
        assert_eq!(out, json!({"a": r#"{"b.c":1}"#}));
    }
}
