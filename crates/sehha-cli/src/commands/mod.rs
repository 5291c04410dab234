//! Command handlers grouped by concern.

pub(crate) mod auth;
pub(crate) mod codec;
pub(crate) mod locale;
pub(crate) mod records;
