//! Record-level projections of translatable fields.
//!
//! [`project`] flattens bilingual fields to display strings for the active
//! locale; [`prepare_for_edit`] expands them to canonical `{en, ar}` objects
//! for edit forms. Both copy the record and leave the input untouched.

use serde_json::{Map, Value};

use crate::bilingual::decode;
use crate::items::{decode_list_field, decoded_list_value};
use crate::locale::{LocaleCode, current_locale};
use crate::resolve::try_resolve;

/// Fields treated as translatable when a caller does not name its own.
pub const DEFAULT_TRANSLATABLE_FIELDS: &[&str] = &[
    "name",
    "description",
    "title",
    "specialization",
    "education",
    "location",
    "role",
    "review_title",
    "full_story",
    "address",
    "region",
    "main_description",
    "quote_text",
];

/// Nested relation embedded in a record, with its translatable sub-fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Relation {
    /// Key of the nested object on the parent record.
    pub key: &'static str,
    /// Translatable fields of the nested object.
    pub fields: &'static [&'static str],
}

/// Relations resolved one level deep during projection.
pub const KNOWN_RELATIONS: &[Relation] = &[
    Relation {
        key: "department",
        fields: &["name", "description"],
    },
    Relation {
        key: "branch",
        fields: &["name", "description", "address", "region"],
    },
    Relation {
        key: "doctor",
        fields: &["name", "specialization", "education", "location"],
    },
];

/// Display projection of `entity` for `locale`.
///
/// `None` and `null` pass through. Each listed field present on the record is
/// replaced by its resolved string; when resolution finds nothing the raw
/// value is kept as-is. Known relations get the same treatment for their own
/// fields. Non-object records are returned unchanged.
#[must_use]
pub fn project(entity: Option<&Value>, fields: &[&str], locale: LocaleCode) -> Option<Value> {
    let entity = entity?;
    let Value::Object(source) = entity else {
        return Some(entity.clone());
    };
    let mut projected = source.clone();
    resolve_fields(&mut projected, fields, locale);
    for relation in KNOWN_RELATIONS {
        if let Some(Value::Object(nested)) = projected.get_mut(relation.key) {
            resolve_fields(nested, relation.fields, locale);
        }
    }
    Some(Value::Object(projected))
}

/// [`project`] with the default field set and the process-wide locale.
#[must_use]
pub fn project_current(entity: Option<&Value>) -> Option<Value> {
    project(entity, DEFAULT_TRANSLATABLE_FIELDS, current_locale())
}

/// Edit projection of `entity`.
///
/// Listed translatable fields present on the record become canonical
/// `{en, ar}` objects; listed list fields become decoded item lists. Other
/// keys are copied untouched.
#[must_use]
pub fn prepare_for_edit(
    entity: Option<&Value>,
    fields: &[&str],
    list_fields: &[&str],
) -> Option<Value> {
    let entity = entity?;
    let Value::Object(source) = entity else {
        return Some(entity.clone());
    };
    let mut prepared = source.clone();
    for field in fields {
        if let Some(slot) = prepared.get_mut(*field) {
            *slot = decode(Some(&*slot)).to_value();
        }
    }
    for field in list_fields {
        if let Some(slot) = prepared.get_mut(*field) {
            *slot = decoded_list_value(&decode_list_field(Some(&*slot)));
        }
    }
    Some(Value::Object(prepared))
}

fn resolve_fields(record: &mut Map<String, Value>, fields: &[&str], locale: LocaleCode) {
    for field in fields {
        if let Some(slot) = record.get_mut(*field)
            && let Some(resolved) = try_resolve(Some(&*slot), locale)
        {
            *slot = Value::String(resolved);
        }
    }
}
