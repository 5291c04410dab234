//! API token storage commands.

use anyhow::anyhow;
use sehha_config::{PreferenceStore, clear_token, persist_token};

use crate::cli::AuthSetArgs;
use crate::client::{CliError, CliResult};

pub(crate) fn handle_auth_set(store: &impl PreferenceStore, args: &AuthSetArgs) -> CliResult<()> {
    let token = args.token.trim();
    if token.is_empty() {
        return Err(CliError::validation("token must not be empty"));
    }
    persist_token(store, token)
        .map_err(|err| CliError::failure(anyhow!(err).context("failed to store API token")))?;
    println!("API token stored.");
    Ok(())
}

pub(crate) fn handle_auth_clear(store: &impl PreferenceStore) -> CliResult<()> {
    clear_token(store)
        .map_err(|err| CliError::failure(anyhow!(err).context("failed to clear API token")))?;
    println!("API token cleared.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sehha_config::{MemoryPreferenceStore, load_token};

    #[test]
    fn tokens_are_stored_and_cleared() {
        let store = MemoryPreferenceStore::new();
        handle_auth_set(
            &store,
            &AuthSetArgs {
                token: " abc ".to_string(),
            },
        )
        .expect("token stored");
        assert_eq!(load_token(&store).expect("readable").as_deref(), Some("abc"));

        handle_auth_clear(&store).expect("token cleared");
        assert_eq!(load_token(&store).expect("readable"), None);
    }

    #[test]
    fn blank_tokens_are_rejected() {
        let store = MemoryPreferenceStore::new();
        let result = handle_auth_set(
            &store,
            &AuthSetArgs {
                token: "  ".to_string(),
            },
        );
        assert!(matches!(result, Err(CliError::Validation(_))));
    }
}
