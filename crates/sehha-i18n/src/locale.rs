//! Supported locales and the process-wide display language.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::sync::{LazyLock, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::I18nError;

/// Supported display locales.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocaleCode {
    /// English.
    En,
    /// Arabic.
    Ar,
}

impl LocaleCode {
    /// All supported locales in display order.
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::En, Self::Ar]
    }

    /// Two-letter code, also the key used inside bilingual values.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }

    /// Human-friendly label for language switchers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Ar => "العربية",
        }
    }

    /// Whether the locale prefers RTL layout.
    #[must_use]
    pub const fn rtl(self) -> bool {
        matches!(self, Self::Ar)
    }

    /// Map an arbitrary language tag (`ar-EG`, `en_US.UTF-8`, `AR`) to a
    /// supported locale.
    #[must_use]
    pub fn from_lang_tag(tag: &str) -> Option<Self> {
        let lowered = tag.trim().to_ascii_lowercase();
        let base = lowered
            .split(['-', '_', '.', '@'])
            .next()
            .unwrap_or_default();
        Self::all()
            .iter()
            .copied()
            .find(|locale| locale.code() == base)
    }
}

impl Display for LocaleCode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.code())
    }
}

impl FromStr for LocaleCode {
    type Err = I18nError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_lang_tag(value).ok_or_else(|| I18nError::UnsupportedLocale {
            value: value.to_string(),
        })
    }
}

/// Default fallback locale.
pub const DEFAULT_LOCALE: LocaleCode = LocaleCode::En;

/// Current display language shared by everything rendering bilingual data.
///
/// Reads are cheap and frequent; writes only happen on an explicit language
/// switch.
#[derive(Debug)]
pub struct LocaleState {
    current: RwLock<LocaleCode>,
}

impl LocaleState {
    /// Create a state holding `locale`.
    #[must_use]
    pub const fn new(locale: LocaleCode) -> Self {
        Self {
            current: RwLock::new(locale),
        }
    }

    /// Snapshot of the current locale.
    #[must_use]
    pub fn get(&self) -> LocaleCode {
        *self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Switch to `locale`, returning the previous value.
    pub fn set(&self, locale: LocaleCode) -> LocaleCode {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, locale)
    }
}

impl Default for LocaleState {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALE)
    }
}

static GLOBAL_LOCALE: LazyLock<LocaleState> = LazyLock::new(LocaleState::default);

/// Locale currently selected for the process.
#[must_use]
pub fn current_locale() -> LocaleCode {
    GLOBAL_LOCALE.get()
}

/// Switch the process-wide locale, returning the previous one.
pub fn set_current_locale(locale: LocaleCode) -> LocaleCode {
    let previous = GLOBAL_LOCALE.set(locale);
    if previous != locale {
        info!(from = %previous, to = %locale, "display locale switched");
    }
    previous
}
