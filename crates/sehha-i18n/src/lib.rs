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
#![allow(clippy::module_name_repetitions)]
//! Bilingual (English/Arabic) content normalization for the Sehha portal.
//!
//! Backend records carry translatable fields in several historical shapes.
//! This crate classifies those shapes once and offers:
//! - `bilingual`: decode any raw shape into a canonical [`BilingualValue`] and
//!   encode it back to the transport string.
//! - `resolve`: pick a display string for the active locale with fallbacks.
//! - `project`: flatten translatable fields of a whole record (and its known
//!   relations) for display, or expand them for edit forms.
//! - `items`: the same discipline for lists of bilingual items.
//! - `locale`: supported locale codes and the process-wide locale state.

pub mod bilingual;
pub mod error;
pub mod items;
pub mod locale;
pub mod project;
pub mod raw;
pub mod resolve;

pub use bilingual::{BilingualValue, decode, decode_transport, encode};
pub use error::{I18nError, Result};
pub use items::{
    DecodedItem, EncodedItem, ItemId, decode_list, decode_list_field, decode_list_payload,
    decoded_list_value, encode_list, encode_list_payload,
};
pub use locale::{DEFAULT_LOCALE, LocaleCode, LocaleState, current_locale, set_current_locale};
pub use project::{
    DEFAULT_TRANSLATABLE_FIELDS, KNOWN_RELATIONS, Relation, prepare_for_edit, project,
    project_current,
};
pub use resolve::{resolve, resolve_current, try_resolve};
