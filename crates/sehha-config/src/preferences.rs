//! Durable key-value preferences (locale choice, auth token).

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::locale::EnvProvider;

/// Preference key holding the chosen display locale.
pub const LOCALE_KEY: &str = "sehha.locale";
/// Preference key holding the bearer token of the signed-in user.
pub const TOKEN_KEY: &str = "sehha.auth.token";

/// Environment variable pointing at the preference file.
pub const PREFS_ENV: &str = "SEHHA_PREFS";

const PREFS_FILE: &str = "preferences.json";

/// Preference file location: `SEHHA_PREFS`, else `$XDG_CONFIG_HOME/sehha`,
/// else `$HOME/.config/sehha`, else `.sehha` in the working directory.
#[must_use]
pub fn default_preferences_path(env: &impl EnvProvider) -> PathBuf {
    let non_empty = |key: &str| env.var(key).filter(|value| !value.trim().is_empty());
    if let Some(explicit) = non_empty(PREFS_ENV) {
        return PathBuf::from(explicit);
    }
    let base = non_empty("XDG_CONFIG_HOME")
        .map(|config| PathBuf::from(config).join("sehha"))
        .or_else(|| non_empty("HOME").map(|home| PathBuf::from(home).join(".config").join("sehha")))
        .unwrap_or_else(|| PathBuf::from(".sehha"));
    base.join(PREFS_FILE)
}

/// Minimal string key-value store backing client preferences.
pub trait PreferenceStore {
    /// Fetch the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage cannot be read.
    fn get(&self, key: &str) -> ConfigResult<Option<String>>;

    /// Store `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage cannot be written.
    fn set(&self, key: &str, value: &str) -> ConfigResult<()>;

    /// Remove `key` if present.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage cannot be written.
    fn delete(&self, key: &str) -> ConfigResult<()>;
}

/// Preferences persisted as a flat JSON object on disk.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    /// Store backed by the file at `path` (created on first write).
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> ConfigResult<BTreeMap<String, String>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(ConfigError::Io {
                    operation: "read",
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn store(&self, entries: &BTreeMap<String, String>) -> ConfigResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                operation: "create_dir",
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let rendered =
            serde_json::to_string_pretty(entries).map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            })?;
        fs::write(&self.path, rendered).map_err(|source| ConfigError::Io {
            operation: "write",
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), entries = entries.len(), "preferences saved");
        Ok(())
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> ConfigResult<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> ConfigResult<()> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.store(&entries)
    }

    fn delete(&self, key: &str) -> ConfigResult<()> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.store(&entries)?;
        }
        Ok(())
    }
}

/// Process-local store, used by tests and one-shot invocations.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryPreferenceStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> ConfigResult<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ConfigResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> ConfigResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// Stored bearer token, ignoring blank values.
///
/// # Errors
///
/// Returns an error when the store cannot be read.
pub fn load_token(store: &impl PreferenceStore) -> ConfigResult<Option<String>> {
    Ok(store
        .get(TOKEN_KEY)?
        .filter(|token| !token.trim().is_empty()))
}

/// Remember the bearer token for later invocations.
///
/// # Errors
///
/// Returns an error when the store cannot be written.
pub fn persist_token(store: &impl PreferenceStore, token: &str) -> ConfigResult<()> {
    store.set(TOKEN_KEY, token.trim())
}

/// Forget the stored bearer token.
///
/// # Errors
///
/// Returns an error when the store cannot be written.
pub fn clear_token(store: &impl PreferenceStore) -> ConfigResult<()> {
    store.delete(TOKEN_KEY)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    struct MapEnv(HashMap<&'static str, &'static str>);

    impl EnvProvider for MapEnv {
        fn var(&self, key: &str) -> Option<String> {
            self.0.get(key).map(|value| (*value).to_string())
        }
    }

    #[test]
    fn preference_path_precedence() {
        let env = MapEnv(HashMap::from([
            (PREFS_ENV, "/tmp/custom.json"),
            ("XDG_CONFIG_HOME", "/xdg"),
            ("HOME", "/home/amal"),
        ]));
        assert_eq!(default_preferences_path(&env), PathBuf::from("/tmp/custom.json"));

        let env = MapEnv(HashMap::from([("XDG_CONFIG_HOME", "/xdg"), ("HOME", "/home/amal")]));
        assert_eq!(
            default_preferences_path(&env),
            PathBuf::from("/xdg/sehha/preferences.json")
        );

        let env = MapEnv(HashMap::from([("XDG_CONFIG_HOME", " "), ("HOME", "/home/amal")]));
        assert_eq!(
            default_preferences_path(&env),
            PathBuf::from("/home/amal/.config/sehha/preferences.json")
        );

        let env = MapEnv(HashMap::new());
        assert_eq!(
            default_preferences_path(&env),
            PathBuf::from(".sehha/preferences.json")
        );
    }

    #[test]
    fn file_store_round_trips_values() -> ConfigResult<()> {
        let dir = tempfile::tempdir().map_err(|source| ConfigError::Io {
            operation: "tempdir",
            path: PathBuf::new(),
            source,
        })?;
        let store = FilePreferenceStore::new(dir.path().join("nested").join("prefs.json"));
        assert_eq!(store.get(LOCALE_KEY)?, None);

        store.set(LOCALE_KEY, "ar")?;
        store.set(TOKEN_KEY, "secret")?;
        assert_eq!(store.get(LOCALE_KEY)?.as_deref(), Some("ar"));

        let reopened = FilePreferenceStore::new(store.path().to_path_buf());
        assert_eq!(reopened.get(TOKEN_KEY)?.as_deref(), Some("secret"));

        reopened.delete(TOKEN_KEY)?;
        assert_eq!(store.get(TOKEN_KEY)?, None);
        assert_eq!(store.get(LOCALE_KEY)?.as_deref(), Some("ar"));
        Ok(())
    }

    #[test]
    fn file_store_rejects_malformed_content() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prefs.json");
        fs::write(&path, "[1, 2]").expect("write fixture");
        let store = FilePreferenceStore::new(&path);
        assert!(matches!(store.get(LOCALE_KEY), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn empty_file_reads_as_no_preferences() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prefs.json");
        fs::write(&path, "  ").expect("write fixture");
        let store = FilePreferenceStore::new(&path);
        assert!(matches!(store.get(LOCALE_KEY), Ok(None)));
    }

    #[test]
    fn token_helpers_ignore_blank_values() -> ConfigResult<()> {
        let store = MemoryPreferenceStore::new();
        assert_eq!(load_token(&store)?, None);
        persist_token(&store, "  abc  ")?;
        assert_eq!(load_token(&store)?.as_deref(), Some("abc"));
        store.set(TOKEN_KEY, "   ")?;
        assert_eq!(load_token(&store)?, None);
        persist_token(&store, "abc")?;
        clear_token(&store)?;
        assert_eq!(load_token(&store)?, None);
        Ok(())
    }
}
