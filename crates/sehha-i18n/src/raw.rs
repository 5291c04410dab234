//! Classification of raw translatable payloads.
//!
//! Every coder in this crate starts by sorting the incoming JSON into one of
//! the shapes below, so the branching on historical formats lives in one
//! place.

use serde_json::{Map, Value};

/// Shape of a raw translatable value as received from storage or the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawShape<'a> {
    /// Plain string (legacy single-language value).
    Text(&'a str),
    /// `null` or a missing field.
    Missing,
    /// Array of fragments meant to be concatenated.
    Fragments(&'a [Value]),
    /// `{ en: [...] }` envelope wrapping a whole list.
    WrappedList {
        /// Inner list under `en`.
        items: &'a [Value],
        /// The envelope itself.
        record: &'a Map<String, Value>,
    },
    /// Any other object: canonical `{en, ar}` or a corrupted indexed object.
    Record(&'a Map<String, Value>),
    /// Numbers and booleans.
    Scalar(&'a Value),
}

/// Sort a raw value into its [`RawShape`].
#[must_use]
pub fn classify(raw: Option<&Value>) -> RawShape<'_> {
    match raw {
        None | Some(Value::Null) => RawShape::Missing,
        Some(Value::String(text)) => RawShape::Text(text),
        Some(Value::Array(items)) => RawShape::Fragments(items),
        Some(Value::Object(map)) => match map.get("en") {
            Some(Value::Array(items)) => RawShape::WrappedList { items, record: map },
            _ => RawShape::Record(map),
        },
        Some(other @ (Value::Bool(_) | Value::Number(_))) => RawShape::Scalar(other),
    }
}

/// Render a JSON value the way it reads when concatenated into text.
///
/// Strings are taken verbatim, `null` contributes nothing, nested arrays are
/// comma joined and objects collapse to a placeholder.
#[must_use]
pub fn fragment_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::Array(items) => items
            .iter()
            .map(fragment_text)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Concatenate fragments in order with no separator.
#[must_use]
pub fn join_fragments(items: &[Value]) -> String {
    items.iter().map(fragment_text).collect()
}

/// Whether `key` consists solely of ASCII digits.
#[must_use]
pub fn is_index_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|byte| byte.is_ascii_digit())
}

/// Rebuild text scattered across numeric-string keys (`"0"`, `"1"`, ...).
///
/// Keys are ordered by numeric value without parsing, so arbitrarily long
/// digit runs cannot overflow. Returns `None` when the object has no index
/// keys.
#[must_use]
pub fn recover_indexed(map: &Map<String, Value>) -> Option<String> {
    let mut keys: Vec<&String> = map.keys().filter(|key| is_index_key(key)).collect();
    if keys.is_empty() {
        return None;
    }
    keys.sort_by(|left, right| {
        let left_digits = left.trim_start_matches('0');
        let right_digits = right.trim_start_matches('0');
        left_digits
            .len()
            .cmp(&right_digits.len())
            .then_with(|| left_digits.cmp(right_digits))
            .then_with(|| left.cmp(right))
    });
    Some(
        keys.into_iter()
            .filter_map(|key| map.get(key.as_str()))
            .map(fragment_text)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classify_covers_every_shape() {
        assert_eq!(classify(None), RawShape::Missing);
        assert_eq!(classify(Some(&Value::Null)), RawShape::Missing);
        assert_eq!(classify(Some(&json!("hi"))), RawShape::Text("hi"));
        assert!(matches!(
            classify(Some(&json!(["a", "b"]))),
            RawShape::Fragments(items) if items.len() == 2
        ));
        assert!(matches!(
            classify(Some(&json!({"en": [{"title": "A"}]}))),
            RawShape::WrappedList { items, .. } if items.len() == 1
        ));
        assert!(matches!(
            classify(Some(&json!({"en": "A", "ar": "ب"}))),
            RawShape::Record(_)
        ));
        assert!(matches!(classify(Some(&json!(42))), RawShape::Scalar(_)));
    }

    #[test]
    fn fragment_text_matches_concatenation_rules() {
        assert_eq!(fragment_text(&json!(null)), "");
        assert_eq!(fragment_text(&json!(7)), "7");
        assert_eq!(fragment_text(&json!(true)), "true");
        assert_eq!(fragment_text(&json!(["a", 1])), "a,1");
        assert_eq!(fragment_text(&json!({"k": 1})), "[object Object]");
        assert_eq!(join_fragments(&[json!("H"), json!(null), json!("i")]), "Hi");
    }

    #[test]
    fn indexed_keys_sort_numerically() {
        let value = json!({"10": "k", "2": "b", "1": "a", "title": "", "0": "_"});
        let Value::Object(map) = value else {
            panic!("expected object");
        };
        assert_eq!(recover_indexed(&map).as_deref(), Some("_abk"));
    }

    #[test]
    fn recover_indexed_none_without_digits() {
        let value = json!({"en": "", "ar": "x"});
        let Value::Object(map) = value else {
            panic!("expected object");
        };
        assert_eq!(recover_indexed(&map), None);
        assert!(!is_index_key(""));
        assert!(!is_index_key("1a"));
    }
}
