//! Bound the size of accepted responses.

use serde_json::Value;

/// Longest list kept in an accepted response.
pub const MAX_LIST_ITEMS: usize = 4;

/// Truncate every list in `value`, at any depth, to `max` items.
pub fn trim_lists(value: &mut Value, max: usize) {
    match value {
        Value::Array(items) => {
            items.truncate(max);
            items.iter_mut().for_each(|item| trim_lists(item, max));
        }
        Value::Object(map) => map.values_mut().for_each(|child| trim_lists(child, max)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn longest_list(value: &Value) -> usize {
        match value {
            Value::Array(items) => items
                .iter()
                .map(longest_list)
                .max()
                .unwrap_or(0)
                .max(items.len()),
            Value::Object(map) => map.values().map(longest_list).max().unwrap_or(0),
            _ => 0,
        }
    }

    fn sample() -> Value {
        json!({
            "tips": ["a", "b", "c", "d", "e", "f"],
            "meals": {
                "breakfast": [1, 2, 3, 4, 5],
                "lunch": ["x"]
            },
            "weeks": [[1, 2, 3, 4, 5], [6], [7], [8], [9]]
        })
    }

    #[test]
    fn trims_at_every_depth() {
        let mut value = sample();
        trim_lists(&mut value, MAX_LIST_ITEMS);
        assert_eq!(value["tips"], json!(["a", "b", "c", "d"]));
        assert_eq!(value["meals"]["breakfast"], json!([1, 2, 3, 4]));
        assert_eq!(value["meals"]["lunch"], json!(["x"]));
        assert_eq!(value["weeks"], json!([[1, 2, 3, 4], [6], [7], [8]]));
        assert!(longest_list(&value) <= MAX_LIST_ITEMS);
    }

    #[test]
    fn trimming_is_idempotent() {
        let mut once = sample();
        trim_lists(&mut once, MAX_LIST_ITEMS);
        let mut twice = once.clone();
        trim_lists(&mut twice, MAX_LIST_ITEMS);
        assert_eq!(once, twice);
    }
}
