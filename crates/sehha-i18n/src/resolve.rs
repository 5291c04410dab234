//! Display-string resolution for bilingual values.

use serde_json::Value;

use crate::locale::{LocaleCode, current_locale};
use crate::raw::fragment_text;

/// Resolve `value` for `locale`, or `None` where a caller fallback applies.
///
/// Order: plain strings as-is, then `value[locale]`, `value["en"]`, the value
/// at the first key. Arrays behave like objects keyed by index. Empty objects,
/// a `null` first value, `null`, numbers and booleans yield `None`.
#[must_use]
pub fn try_resolve(value: Option<&Value>, locale: LocaleCode) -> Option<String> {
    match value? {
        Value::String(text) => Some(text.clone()),
        Value::Object(map) => present(map.get(locale.code()))
            .or_else(|| present(map.get("en")))
            .or_else(|| first_value(map.values().next()))
            .map(fragment_text),
        Value::Array(items) => first_value(items.first()).map(fragment_text),
        Value::Null | Value::Bool(_) | Value::Number(_) => None,
    }
}

/// Resolve `value` for `locale`, using `fallback` when nothing applies.
#[must_use]
pub fn resolve(value: Option<&Value>, fallback: &str, locale: LocaleCode) -> String {
    try_resolve(value, locale).unwrap_or_else(|| fallback.to_string())
}

/// [`resolve`] against the process-wide locale.
#[must_use]
pub fn resolve_current(value: Option<&Value>, fallback: &str) -> String {
    resolve(value, fallback, current_locale())
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|candidate| match candidate {
        Value::Null => false,
        Value::String(text) => !text.is_empty(),
        _ => true,
    })
}

fn first_value(value: Option<&Value>) -> Option<&Value> {
    value.filter(|candidate| !candidate.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;

    use crate::locale::set_current_locale;

    #[test]
    fn requested_locale_wins() {
        let value = json!({"en": "Clinic", "ar": "عيادة"});
        assert_eq!(resolve(Some(&value), "-", LocaleCode::Ar), "عيادة");
        assert_eq!(resolve(Some(&value), "-", LocaleCode::En), "Clinic");
    }

    #[test]
    fn empty_locale_falls_back_to_english() {
        let value = json!({"ar": "", "en": "Clinic"});
        assert_eq!(resolve(Some(&value), "-", LocaleCode::Ar), "Clinic");
    }

    #[test]
    fn missing_english_falls_back_to_first_key() {
        let value = json!({"ar": "مرحبا"});
        assert_eq!(resolve(Some(&value), "fallback", LocaleCode::En), "مرحبا");
        let value = json!({"fr": "Bonjour", "de": "Hallo"});
        assert_eq!(resolve(Some(&value), "fallback", LocaleCode::Ar), "Bonjour");
    }

    #[test]
    fn plain_strings_pass_through() {
        assert_eq!(resolve(Some(&json!("Plain")), "fallback", LocaleCode::Ar), "Plain");
        assert_eq!(resolve(Some(&json!("")), "fallback", LocaleCode::Ar), "");
    }

    #[test]
    fn unresolvable_values_use_fallback() {
        assert_eq!(resolve(Some(&json!({})), "fallback", LocaleCode::En), "fallback");
        assert_eq!(resolve(None, "fallback", LocaleCode::En), "fallback");
        assert_eq!(resolve(Some(&Value::Null), "fallback", LocaleCode::En), "fallback");
        assert_eq!(resolve(Some(&json!(3)), "fallback", LocaleCode::En), "fallback");
        assert_eq!(resolve(Some(&json!([])), "fallback", LocaleCode::En), "fallback");
    }

    #[test]
    fn null_first_values_use_fallback() {
        assert_eq!(resolve(Some(&json!({"fr": null})), "raw", LocaleCode::En), "raw");
        assert_eq!(try_resolve(Some(&json!([null, "x"])), LocaleCode::Ar), None);
        assert_eq!(resolve(Some(&json!({"fr": ""})), "raw", LocaleCode::En), "");
    }

    #[test]
    fn arrays_resolve_to_first_element() {
        assert_eq!(resolve(Some(&json!(["H", "i"])), "-", LocaleCode::En), "H");
    }

    #[test]
    #[serial]
    fn current_locale_is_read_at_call_time() {
        let value = json!({"en": "Heart", "ar": "قلب"});
        let previous = set_current_locale(LocaleCode::Ar);
        assert_eq!(resolve_current(Some(&value), "-"), "قلب");
        set_current_locale(LocaleCode::En);
        assert_eq!(resolve_current(Some(&value), "-"), "Heart");
        set_current_locale(previous);
    }
}
