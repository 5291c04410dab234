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

//! Client-side preferences for Sehha tools.
//!
//! Layout: `preferences.rs` (durable key-value store with file and in-memory
//! backends), `locale.rs` (startup locale precedence and persisted language
//! switch), `error.rs` (error types).

pub mod error;
pub mod locale;
pub mod preferences;

pub use error::{ConfigError, ConfigResult};
pub use locale::{
    EnvProvider, LOCALE_ENV, LocaleSource, StartupLocale, SystemEnv, load_locale, persist_locale,
};
pub use preferences::{
    FilePreferenceStore, LOCALE_KEY, MemoryPreferenceStore, PREFS_ENV, PreferenceStore, TOKEN_KEY,
    clear_token, default_preferences_path, load_token, persist_token,
};
