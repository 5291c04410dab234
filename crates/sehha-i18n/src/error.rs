//! Error types for locale handling.
//!
//! Normalization never fails; the only fallible surface is turning user
//! supplied text into a supported [`LocaleCode`](crate::LocaleCode).

use thiserror::Error;

/// Result alias for locale operations.
pub type Result<T> = std::result::Result<T, I18nError>;

/// Errors raised while interpreting locale input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum I18nError {
    /// The language tag did not map to a supported locale.
    #[error("unsupported locale")]
    UnsupportedLocale {
        /// Tag provided by the caller.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_locale_display() {
        let err = I18nError::UnsupportedLocale {
            value: "fr".to_string(),
        };
        assert_eq!(err.to_string(), "unsupported locale");
    }
}
