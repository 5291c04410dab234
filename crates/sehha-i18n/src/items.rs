//! Lists of bilingual items (service lists, sidebar entries).
//!
//! Decoding is the ingestion path: it unwraps the legacy `{en: [...]}`
//! envelope, recovers corrupted titles, assigns missing ids and sort orders,
//! and drops items with no usable title. Encoding is its inverse for already
//! validated items and never filters.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use tracing::{debug, warn};

use crate::bilingual::{BilingualValue, decode, decode_record, decode_transport, encode};
use crate::raw::{RawShape, classify, fragment_text, is_index_key, join_fragments};

/// Keys with a dedicated slot on [`DecodedItem`]; everything else is carried
/// through untouched.
const RESERVED_KEYS: &[&str] = &[
    "id",
    "title",
    "description",
    "sort_order",
    "service_list",
    "items",
    "en",
    "ar",
];

/// Identifier of a list item, numeric from the backend or generated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    /// Identifier assigned by the backend, kept exactly as sent.
    Number(Number),
    /// Textual or generated identifier.
    Text(String),
}

impl Display for ItemId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(formatter, "{value}"),
            Self::Text(value) => formatter.write_str(value),
        }
    }
}

/// Item ready for editing, with canonical bilingual fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecodedItem {
    /// Stable identifier.
    pub id: ItemId,
    /// Item title.
    pub title: BilingualValue,
    /// Optional description (empty when absent).
    #[serde(default)]
    pub description: BilingualValue,
    /// Position within the parent list.
    pub sort_order: Number,
    /// Nested service entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service_list: Vec<DecodedItem>,
    /// Nested menu entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<DecodedItem>,
    /// Remaining keys of the source item (links, icons, flags).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Item in transport form: bilingual fields are JSON-encoded strings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncodedItem {
    /// Stable identifier.
    pub id: ItemId,
    /// Encoded title (`{"en":..,"ar":..}` as a string).
    pub title: String,
    /// Encoded description.
    pub description: String,
    /// Position within the parent list.
    pub sort_order: Number,
    /// Nested service entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service_list: Vec<EncodedItem>,
    /// Nested menu entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<EncodedItem>,
    /// Remaining keys of the source item.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Decode a raw list of bilingual items.
///
/// A `{en: [...]}` envelope is unwrapped first; anything that is not a list
/// afterwards decodes to an empty list. Items without a usable title are
/// dropped.
#[must_use]
pub fn decode_list(raw: Option<&Value>) -> Vec<DecodedItem> {
    decode_list_under(raw, None)
}

/// Decode a list field that may also arrive as its JSON transport string.
#[must_use]
pub fn decode_list_field(raw: Option<&Value>) -> Vec<DecodedItem> {
    match raw {
        Some(Value::String(payload)) => decode_list_payload(payload),
        other => decode_list(other),
    }
}

/// Decode the JSON array string produced by [`encode_list_payload`].
#[must_use]
pub fn decode_list_payload(payload: &str) -> Vec<DecodedItem> {
    match serde_json::from_str::<Value>(payload) {
        Ok(value) => decode_list(Some(&value)),
        Err(err) => {
            debug!(error = %err, "item list payload is not JSON");
            Vec::new()
        }
    }
}

/// Map decoded items back to their transport shape.
#[must_use]
pub fn encode_list(items: &[DecodedItem]) -> Vec<EncodedItem> {
    items.iter().map(encode_item).collect()
}

/// Encode items into the JSON array string submitted to the backend.
#[must_use]
pub fn encode_list_payload(items: &[DecodedItem]) -> String {
    match serde_json::to_string(&encode_list(items)) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(error = %err, "failed to serialize item list payload");
            "[]".to_string()
        }
    }
}

/// Decoded items as a JSON array, as used by edit projections.
#[must_use]
pub fn decoded_list_value(items: &[DecodedItem]) -> Value {
    serde_json::to_value(items).unwrap_or_else(|err| {
        warn!(error = %err, "failed to convert decoded items to JSON");
        Value::Array(Vec::new())
    })
}

fn decode_list_under(raw: Option<&Value>, parent: Option<&ItemId>) -> Vec<DecodedItem> {
    // A bare array is the list itself in this context.
    let elements = match classify(raw) {
        RawShape::Fragments(elements) => elements,
        RawShape::WrappedList { items, .. } => {
            debug!(items = items.len(), "unwrapping legacy item list envelope");
            items
        }
        RawShape::Missing => return Vec::new(),
        RawShape::Text(_) | RawShape::Record(_) | RawShape::Scalar(_) => {
            debug!("item list is not an array; treating as empty");
            return Vec::new();
        }
    };
    elements
        .iter()
        .enumerate()
        .map(|(index, element)| decode_element(element, index, parent))
        .filter(|item| !item.title.is_blank())
        .collect()
}

fn decode_element(element: &Value, index: usize, parent: Option<&ItemId>) -> DecodedItem {
    match classify(Some(element)) {
        RawShape::Text(text) => plain_item(BilingualValue::english(text), index, parent),
        RawShape::Fragments(parts) => {
            plain_item(BilingualValue::english(join_fragments(parts)), index, parent)
        }
        RawShape::Record(record) | RawShape::WrappedList { record, .. } => {
            record_item(record, index, parent)
        }
        RawShape::Scalar(value) => {
            plain_item(BilingualValue::english(fragment_text(value)), index, parent)
        }
        RawShape::Missing => plain_item(BilingualValue::default(), index, parent),
    }
}

fn plain_item(title: BilingualValue, index: usize, parent: Option<&ItemId>) -> DecodedItem {
    DecodedItem {
        id: generated_id(index, parent),
        title,
        description: BilingualValue::default(),
        sort_order: Number::from(index),
        service_list: Vec::new(),
        items: Vec::new(),
        extra: Map::new(),
    }
}

fn record_item(record: &Map<String, Value>, index: usize, parent: Option<&ItemId>) -> DecodedItem {
    let mut title = record.get("title").map(decode_field).unwrap_or_default();
    if title.is_blank() {
        let recovered = decode_record(record);
        if !recovered.is_blank() {
            debug!(index, "recovered item title from item body");
            title = recovered;
        }
    }
    let description = record
        .get("description")
        .map(decode_field)
        .unwrap_or_default();
    let id = record_id(record.get("id")).unwrap_or_else(|| generated_id(index, parent));
    let sort_order = record_order(record.get("sort_order")).unwrap_or_else(|| Number::from(index));
    let service_list = decode_nested(record.get("service_list"), &id);
    let items = decode_nested(record.get("items"), &id);
    let extra = record
        .iter()
        .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()) && !is_index_key(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    DecodedItem {
        id,
        title,
        description,
        sort_order,
        service_list,
        items,
        extra,
    }
}

fn decode_field(value: &Value) -> BilingualValue {
    match value {
        Value::String(text) => decode_transport(text),
        other => decode(Some(other)),
    }
}

fn decode_nested(raw: Option<&Value>, parent: &ItemId) -> Vec<DecodedItem> {
    match raw {
        Some(Value::String(payload)) => match serde_json::from_str::<Value>(payload) {
            Ok(value) => decode_list_under(Some(&value), Some(parent)),
            Err(_) => Vec::new(),
        },
        other => decode_list_under(other, Some(parent)),
    }
}

/// Backend ids survive as sent; blank strings, bools and structures do not
/// identify anything and get a generated id.
fn record_id(raw: Option<&Value>) -> Option<ItemId> {
    match raw? {
        Value::Number(number) => Some(ItemId::Number(number.clone())),
        Value::String(text) if !text.trim().is_empty() => Some(ItemId::Text(text.clone())),
        _ => None,
    }
}

fn record_order(raw: Option<&Value>) -> Option<Number> {
    match raw? {
        Value::Number(number) => Some(number.clone()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn generated_id(index: usize, parent: Option<&ItemId>) -> ItemId {
    match parent {
        Some(parent) => ItemId::Text(format!("{parent}-{index}")),
        None => ItemId::Text(format!("item-{index}")),
    }
}

fn encode_item(item: &DecodedItem) -> EncodedItem {
    EncodedItem {
        id: item.id.clone(),
        title: encode(&item.title),
        description: encode(&item.description),
        sort_order: item.sort_order.clone(),
        service_list: encode_list(&item.service_list),
        items: encode_list(&item.items),
        extra: item.extra.clone(),
    }
}
