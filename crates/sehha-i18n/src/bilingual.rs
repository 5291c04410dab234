//! Canonical bilingual values and the decode/encode pair around them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::locale::LocaleCode;
use crate::raw::{RawShape, classify, fragment_text, join_fragments, recover_indexed};

/// A translatable field holding both languages at once.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BilingualValue {
    /// English text.
    #[serde(default)]
    pub en: String,
    /// Arabic text.
    #[serde(default)]
    pub ar: String,
}

impl BilingualValue {
    /// Build a value from both languages.
    #[must_use]
    pub fn new(en: impl Into<String>, ar: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ar: ar.into(),
        }
    }

    /// English-only value.
    #[must_use]
    pub fn english(en: impl Into<String>) -> Self {
        Self::new(en, String::new())
    }

    /// Text stored for `locale`.
    #[must_use]
    pub fn get(&self, locale: LocaleCode) -> &str {
        match locale {
            LocaleCode::En => &self.en,
            LocaleCode::Ar => &self.ar,
        }
    }

    /// Replace the text stored for `locale`.
    pub fn set(&mut self, locale: LocaleCode, text: impl Into<String>) {
        match locale {
            LocaleCode::En => self.en = text.into(),
            LocaleCode::Ar => self.ar = text.into(),
        }
    }

    /// Both languages are empty once surrounding whitespace is ignored.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.en.trim().is_empty() && self.ar.trim().is_empty()
    }

    /// Canonical JSON object form (`{"en": .., "ar": ..}`).
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut map = Map::with_capacity(2);
        map.insert("en".to_string(), Value::String(self.en.clone()));
        map.insert("ar".to_string(), Value::String(self.ar.clone()));
        Value::Object(map)
    }
}

/// Decode any raw translatable payload into a [`BilingualValue`].
///
/// `None` stands for a missing field. Rules, first match wins:
/// strings fill `en`; `null` is empty; arrays are concatenated into `en`;
/// objects read `en`/`ar` and, when `en` is still empty, rebuild it from
/// numeric-string keys; numbers and booleans are stringified into `en`.
#[must_use]
pub fn decode(raw: Option<&Value>) -> BilingualValue {
    match classify(raw) {
        RawShape::Text(text) => BilingualValue::english(text),
        RawShape::Missing => BilingualValue::default(),
        RawShape::Fragments(items) => {
            debug!(fragments = items.len(), "joining fragmented bilingual value");
            BilingualValue::english(join_fragments(items))
        }
        RawShape::Record(record) | RawShape::WrappedList { record, .. } => decode_record(record),
        RawShape::Scalar(value) => BilingualValue::english(fragment_text(value)),
    }
}

pub(crate) fn decode_record(record: &Map<String, Value>) -> BilingualValue {
    let mut en = record.get("en").map(fragment_text).unwrap_or_default();
    let ar = record.get("ar").map(fragment_text).unwrap_or_default();
    if en.is_empty()
        && let Some(recovered) = recover_indexed(record)
    {
        debug!(
            recovered_len = recovered.len(),
            "rebuilt bilingual text from indexed keys"
        );
        en = recovered;
    }
    BilingualValue { en, ar }
}

/// Decode a field that arrived in transport form.
///
/// Submitted fields travel as JSON strings of `{"en", "ar"}`; those are
/// parsed and decoded. Any other text is a legacy single-language value.
#[must_use]
pub fn decode_transport(text: &str) -> BilingualValue {
    if text.trim_start().starts_with('{')
        && let Ok(parsed @ Value::Object(_)) = serde_json::from_str::<Value>(text)
    {
        return decode(Some(&parsed));
    }
    BilingualValue::english(text)
}

/// Encode a value into the JSON string the backend expects on submission.
#[must_use]
pub fn encode(value: &BilingualValue) -> String {
    value.to_value().to_string()
}
