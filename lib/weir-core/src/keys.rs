//! Recursive key transformation over JSON values.
//!
//! Two primitives used by the built-in middlewares:
//!
//! - [`transform_keys`] rewrites every object key through a mapper, used to
//!   switch payloads between naming conventions ([`upper_first`] on the way
//!   out, [`lower_first`] on the way back in).
//! - [`remove_keys`] drops every object entry whose key matches a predicate,
//!   used to strip internal-only fields before transmission.
//!
//! Both rebuild the value rather than mutating it; scalars (including null)
//! are the recursion base case and arrays are walked element-wise, preserving
//! order and length.

use serde_json::Value;

/// Rewrite every object key in `value` with `mapper`, recursively.
///
/// If two keys map to the same name, the later entry in iteration order
/// wins (last-write-wins).
#[must_use]
pub fn transform_keys<F>(value: Value, mapper: &F) -> Value
where
    F: Fn(&str) -> String,
{
    match value {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| transform_keys(item, mapper))
                .collect(),
        ),
        Value::Object(entries) => Value::Object(
            entries
                .into_iter()
                .map(|(key, val)| (mapper(&key), transform_keys(val, mapper)))
                .collect(),
        ),
        scalar => scalar,
    }
}

/// Drop every object entry whose key satisfies `predicate`, recursively.
///
/// Matching entries are omitted entirely, without recursing into their
/// values. Arrays are recursed element-wise, never filtered by index.
#[must_use]
pub fn remove_keys<F>(value: Value, predicate: &F) -> Value
where
    F: Fn(&str) -> bool,
{
    match value {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| remove_keys(item, predicate))
                .collect(),
        ),
        Value::Object(entries) => Value::Object(
            entries
                .into_iter()
                .filter(|(key, _)| !predicate(key))
                .map(|(key, val)| (key, remove_keys(val, predicate)))
                .collect(),
        ),
        scalar => scalar,
    }
}

/// Lowercase the first character of `key`, leaving the rest unchanged.
#[must_use]
pub fn lower_first(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Uppercase the first character of `key`, leaving the rest unchanged.
#[must_use]
pub fn upper_first(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn scalars_unchanged() {
        assert_eq!(transform_keys(json!(null), &upper_first), json!(null));
        assert_eq!(transform_keys(json!(42), &upper_first), json!(42));
        assert_eq!(transform_keys(json!("Name"), &upper_first), json!("Name"));
        assert_eq!(remove_keys(json!(true), &|_: &str| true), json!(true));
    }

    #[test]
    fn transform_keys_lowercases_first_letter() {
        let value = json!({"Name": "a", "Age": 1});
        assert_eq!(
            transform_keys(value, &lower_first),
            json!({"name": "a", "age": 1})
        );
    }

    #[test]
    fn transform_keys_recurses_into_nested_values() {
        let value = json!({
            "User": {"FirstName": "Ada"},
            "Tags": [{"Label": "x"}, {"Label": "y"}],
        });
        assert_eq!(
            transform_keys(value, &lower_first),
            json!({
                "user": {"firstName": "Ada"},
                "tags": [{"label": "x"}, {"label": "y"}],
            })
        );
    }

    #[test]
    fn transform_keys_preserves_array_order_and_length() {
        let value = json!([3, {"A": 1}, null, "s"]);
        assert_eq!(
            transform_keys(value, &lower_first),
            json!([3, {"a": 1}, null, "s"])
        );
    }

    #[test]
    fn transform_keys_round_trip() {
        let original = json!({"name": "a", "nested": {"age": 1}});
        let up = transform_keys(original.clone(), &upper_first);
        assert_eq!(up, json!({"Name": "a", "Nested": {"Age": 1}}));
        assert_eq!(transform_keys(up, &lower_first), original);
    }

    #[test]
    fn transform_keys_collision_last_write_wins() {
        // "Name" and "name" both map to "name"; the later entry wins.
        let value = json!({"Name": 1, "name": 2});
        assert_eq!(transform_keys(value, &lower_first), json!({"name": 2}));
    }

    #[test]
    fn remove_keys_strips_matching_entries() {
        let value = json!({"__id": 1, "name": "x", "nested": {"__tag": "y", "ok": true}});
        let filtered = remove_keys(value, &|k: &str| k.starts_with("__"));
        assert_eq!(filtered, json!({"name": "x", "nested": {"ok": true}}));
    }

    #[test]
    fn remove_keys_recurses_arrays_without_filtering_elements() {
        let value = json!([{"__a": 1, "b": 2}, {"__a": 3}]);
        let filtered = remove_keys(value, &|k: &str| k.starts_with("__"));
        assert_eq!(filtered, json!([{"b": 2}, {}]));
    }

    #[test]
    fn first_letter_mappers() {
        assert_eq!(lower_first("Name"), "name");
        assert_eq!(lower_first("name"), "name");
        assert_eq!(lower_first(""), "");
        assert_eq!(upper_first("name"), "Name");
        assert_eq!(upper_first("Name"), "Name");
        assert_eq!(upper_first(""), "");
        // Only the first character changes.
        assert_eq!(upper_first("firstName"), "FirstName");
        assert_eq!(lower_first("HTTPStatus"), "hTTPStatus");
    }
}
