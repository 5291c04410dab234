//! Startup locale detection and persisted language switching.

use sehha_i18n::{DEFAULT_LOCALE, LocaleCode};
use tracing::{debug, warn};

use crate::error::ConfigResult;
use crate::preferences::{LOCALE_KEY, PreferenceStore};

/// Environment variable overriding the system language for Sehha tools.
pub const LOCALE_ENV: &str = "SEHHA_LOCALE";

/// System language variables consulted in order after [`LOCALE_ENV`].
const SYSTEM_LOCALE_VARS: &[&str] = &["LC_ALL", "LC_MESSAGES", "LANG"];

/// Read access to process environment variables.
pub trait EnvProvider {
    /// Value of `key`, if set.
    fn var(&self, key: &str) -> Option<String>;
}

/// [`EnvProvider`] backed by the real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEnv;

impl EnvProvider for SystemEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Where the startup locale came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleSource {
    /// Previously persisted user choice.
    Preference,
    /// Language environment variables.
    Environment,
    /// Nothing usable was found.
    Default,
}

/// Locale chosen at startup together with its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartupLocale {
    /// Active locale.
    pub locale: LocaleCode,
    /// Signal that selected it.
    pub source: LocaleSource,
}

/// Determine the startup locale.
///
/// Precedence: stored preference, then `SEHHA_LOCALE`, then the system
/// language variables, then English. Unreadable stores and unsupported values
/// are skipped.
pub fn load_locale(store: &impl PreferenceStore, env: &impl EnvProvider) -> StartupLocale {
    match store.get(LOCALE_KEY) {
        Ok(Some(stored)) => {
            if let Some(locale) = LocaleCode::from_lang_tag(&stored) {
                return StartupLocale {
                    locale,
                    source: LocaleSource::Preference,
                };
            }
            debug!(value = %stored, "ignoring unsupported stored locale");
        }
        Ok(None) => {}
        Err(err) => warn!(error = %err, "failed to read stored locale"),
    }

    let env_locale = std::iter::once(LOCALE_ENV)
        .chain(SYSTEM_LOCALE_VARS.iter().copied())
        .filter_map(|key| env.var(key))
        .find_map(|value| LocaleCode::from_lang_tag(&value));
    if let Some(locale) = env_locale {
        return StartupLocale {
            locale,
            source: LocaleSource::Environment,
        };
    }

    StartupLocale {
        locale: DEFAULT_LOCALE,
        source: LocaleSource::Default,
    }
}

/// Remember `locale` as the user's choice.
///
/// # Errors
///
/// Returns an error when the store cannot be written.
pub fn persist_locale(store: &impl PreferenceStore, locale: LocaleCode) -> ConfigResult<()> {
    store.set(LOCALE_KEY, locale.code())
}
