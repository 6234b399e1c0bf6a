//! Pagination merge

use serde_json::Value;

/// Fold the next page into the accumulated result
///
/// Array-valued properties of `next` are appended to the existing arrays;
/// every other property overwrites, so `pagination` ends up holding the last
/// page's cursor.
pub fn merge_results(value: &mut Value, next: Value) {
    let Value::Object(next) = next else {
        *value = next;
        return;
    };
    if !value.is_object() {
        *value = Value::Object(Default::default());
    }
    let Some(target) = value.as_object_mut() else {
        return;
    };

    for (prop, incoming) in next {
        match incoming {
            Value::Array(items) => match target.get_mut(&prop) {
                Some(Value::Array(existing)) => existing.extend(items),
                _ => {
                    target.insert(prop, Value::Array(items));
                }
            },
            other => {
                target.insert(prop, other);
            }
        }
    }
}

/// Cursor for the next page, if the response has one
///
/// A null, missing or empty `next_key` ends pagination.
pub fn next_key(value: &Value) -> Option<String> {
    let pagination = value.get("pagination")?;
    let key = pagination
        .get("next_key")
        .or_else(|| pagination.get("nextKey"))?;
    match key {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_concatenates_and_overwrites() {
        let mut value = json!({ "items": [1, 2], "pagination": { "next_key": "k" } });
        merge_results(
            &mut value,
            json!({ "items": [3, 4], "pagination": { "next_key": null } }),
        );
        assert_eq!(
            value,
            json!({ "items": [1, 2, 3, 4], "pagination": { "next_key": null } })
        );
    }

    #[test]
    fn test_merge_adds_missing_arrays() {
        let mut value = json!({ "total": "1" });
        merge_results(&mut value, json!({ "items": ["a"], "total": "2" }));
        assert_eq!(value, json!({ "items": ["a"], "total": "2" }));
    }

    #[test]
    fn test_next_key() {
        assert_eq!(
            next_key(&json!({ "pagination": { "next_key": "abc" } })),
            Some("abc".to_string())
        );
        assert_eq!(next_key(&json!({ "pagination": { "nextKey": "x" } })), Some("x".to_string()));
        assert_eq!(next_key(&json!({ "pagination": { "next_key": null } })), None);
        assert_eq!(next_key(&json!({ "pagination": { "next_key": "" } })), None);
        assert_eq!(next_key(&json!({ "items": [] })), None);
    }
}
