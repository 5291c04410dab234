#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Transport models for the Sehha portal backend.
//!
//! The backend owns the records; this crate only knows where each resource
//! lives, which of its fields are bilingual, how records arrive (bare or in a
//! `data` envelope) and how an edited record is flattened into multipart
//! text parts for submission.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use sehha_i18n::{
    DEFAULT_TRANSLATABLE_FIELDS, KNOWN_RELATIONS, decode, decode_list_field, decode_transport,
    encode, encode_list_payload,
};

/// Keys owned by the backend and never submitted back.
const READ_ONLY_KEYS: &[&str] = &["id", "created_at", "updated_at"];

/// Errors raised while interpreting model input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// Resource name did not match any known backend collection.
    #[error("unknown resource")]
    UnknownResource {
        /// Name supplied by the caller.
        value: String,
    },
}

/// Backend collections carrying bilingual content.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Resource {
    /// Hospital branches.
    Branches,
    /// Doctor profiles.
    Doctors,
    /// Department tab content.
    Departments,
    /// Centers of excellence with their service lists.
    ExcellenceCenters,
    /// Promotional offers.
    Offers,
    /// Photo galleries.
    Galleries,
    /// Dashboard sidebar menu entries.
    SidebarItems,
}

impl Resource {
    /// Scalar fields holding bilingual values, shared by every resource.
    pub const TRANSLATABLE_FIELDS: &'static [&'static str] = DEFAULT_TRANSLATABLE_FIELDS;

    /// Every resource in menu order.
    #[must_use]
    pub const fn all() -> [Self; 7] {
        [
            Self::Branches,
            Self::Doctors,
            Self::Departments,
            Self::ExcellenceCenters,
            Self::Offers,
            Self::Galleries,
            Self::SidebarItems,
        ]
    }

    /// URL segment and CLI name of the resource.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Branches => "branches",
            Self::Doctors => "doctors",
            Self::Departments => "departments",
            Self::ExcellenceCenters => "excellence-centers",
            Self::Offers => "offers",
            Self::Galleries => "galleries",
            Self::SidebarItems => "sidebar-items",
        }
    }

    /// Collection path relative to the API base URL.
    #[must_use]
    pub fn collection_path(self) -> String {
        format!("/api/{}", self.slug())
    }

    /// Path of a single record.
    #[must_use]
    pub fn record_path(self, id: &str) -> String {
        format!("/api/{}/{id}", self.slug())
    }

    /// Fields holding lists of bilingual items.
    #[must_use]
    pub const fn list_fields(self) -> &'static [&'static str] {
        match self {
            Self::ExcellenceCenters => &["service_list"],
            Self::SidebarItems => &["items"],
            Self::Branches | Self::Doctors | Self::Departments | Self::Offers | Self::Galleries => {
                &[]
            }
        }
    }
}

impl Display for Resource {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.slug())
    }
}

impl FromStr for Resource {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
        Self::all()
            .into_iter()
            .find(|resource| resource.slug() == normalized)
            .ok_or_else(|| ModelError::UnknownResource {
                value: value.to_string(),
            })
    }
}

/// Error body returned by the backend on failed requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiProblem {
    /// Summary message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Field-level validation messages.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ApiProblem {
    /// Single-line description combining the message and field errors.
    #[must_use]
    pub fn summary(&self) -> Option<String> {
        let fields: Vec<String> = self
            .errors
            .iter()
            .map(|(field, messages)| format!("{field}: {}", messages.join("; ")))
            .collect();
        match (&self.message, fields.is_empty()) {
            (Some(message), true) => Some(message.clone()),
            (Some(message), false) => Some(format!("{message} ({})", fields.join(", "))),
            (None, false) => Some(fields.join(", ")),
            (None, true) => None,
        }
    }
}

/// Pull the records out of a response body.
///
/// Accepts a bare array, a bare object, or either wrapped in `data`. A `null`
/// body or `data: null` yields no records.
#[must_use]
pub fn extract_records(body: &Value) -> Vec<Value> {
    let inner = match body {
        Value::Object(map) if map.contains_key("data") => &map["data"],
        other => other,
    };
    match inner {
        Value::Array(records) => records.clone(),
        Value::Null => Vec::new(),
        record => vec![record.clone()],
    }
}

/// Single text part of a multipart submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    /// Form field name.
    pub name: String,
    /// Text value sent for the field.
    pub value: String,
}

/// Text parts of a create/update submission, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionForm {
    parts: Vec<FormPart>,
}

impl SubmissionForm {
    /// Empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten an edited record of `resource` into submission parts.
    ///
    /// Bilingual fields (canonical objects, legacy shapes or strings already in
    /// transport form) are normalized and sent as encoded `{en, ar}` strings,
    /// list fields as the JSON array of encoded items. Backend-owned keys,
    /// embedded relations and `null` values are skipped; other strings go as
    /// they are and remaining JSON as its text form.
    #[must_use]
    pub fn from_record(resource: Resource, record: &Value) -> Self {
        let mut form = Self::new();
        let Value::Object(fields) = record else {
            return form;
        };
        for (name, value) in fields {
            if READ_ONLY_KEYS.contains(&name.as_str())
                || KNOWN_RELATIONS.iter().any(|relation| relation.key == name.as_str())
                || value.is_null()
            {
                continue;
            }
            if Resource::TRANSLATABLE_FIELDS.contains(&name.as_str()) {
                let bilingual = match value {
                    Value::String(text) => decode_transport(text),
                    other => decode(Some(other)),
                };
                form.push(name, encode(&bilingual));
            } else if resource.list_fields().contains(&name.as_str()) {
                form.push(name, encode_list_payload(&decode_list_field(Some(value))));
            } else {
                let text = match value {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                form.push(name, text);
            }
        }
        form
    }

    /// Append a raw text part.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parts.push(FormPart {
            name: name.into(),
            value: value.into(),
        });
    }

    /// Parts in submission order.
    #[must_use]
    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    /// Value of the first part named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.parts
            .iter()
            .find(|part| part.name == name)
            .map(|part| part.value.as_str())
    }

    /// Whether the form holds no parts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}
