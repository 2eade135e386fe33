use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};

use crate::model::{ApiError, MediaClient, Profile};

const TOKEN_FILE: &str = "access_token";

/// Persists the bearer token between runs.
#[derive(Clone, Debug)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(cache_dir: impl AsRef<Path>) -> Self {
        Self {
            path: cache_dir.as_ref().join(TOKEN_FILE),
        }
    }

    pub fn save(&self, token: &str) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        fs::write(&self.path, token)
            .with_context(|| format!("writing {}", self.path.display()))?;
        tracing::debug!("Saved access token to disk");
        Ok(())
    }

    pub fn get(&self) -> Option<String> {
        let token = fs::read_to_string(&self.path).ok()?;
        let token = token.trim();
        (!token.is_empty()).then(|| token.to_string())
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!("Cleared stored access token");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("removing {}", self.path.display())),
        }
    }
}

/// How the app should start given whatever token is on disk.
#[derive(Debug)]
pub enum SessionStart {
    SignedOut,
    Authenticated { token: String, profile: Profile },
    /// The token could not be checked; it is kept and the error shown.
    Unverified { token: String, error: ApiError },
}

pub async fn restore_session(store: &TokenStore, client: &MediaClient) -> SessionStart {
    let Some(token) = store.get() else {
        tracing::info!("No stored token, starting at login");
        return SessionStart::SignedOut;
    };

    match client.me(&token).await {
        Ok(profile) => {
            tracing::info!(user_id = %profile.id, role = profile.role.as_str(), "Restored session");
            SessionStart::Authenticated { token, profile }
        }
        Err(error) if error.is_auth_rejection() => {
            tracing::info!("Stored token rejected, clearing it");
            if let Err(e) = store.clear() {
                tracing::warn!(error = %e, "Could not clear rejected token");
            }
            SessionStart::SignedOut
        }
        Err(error) => {
            tracing::warn!(error = %error, "Could not verify stored token");
            SessionStart::Unverified { token, error }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{GOOD_TOKEN, fake_client};

    #[test]
    fn save_get_clear_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("nested"));
        assert_eq!(store.get(), None);

        store.save("abc").unwrap();
        assert_eq!(store.get().as_deref(), Some("abc"));

        store.clear().unwrap();
        assert_eq!(store.get(), None);
        store.clear().unwrap();
    }

    #[test]
    fn blank_file_reads_as_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path());
        fs::write(dir.path().join(TOKEN_FILE), "  \n").unwrap();
        assert_eq!(store.get(), None);
    }

    #[tokio::test]
    async fn valid_token_restores_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path());
        store.save(GOOD_TOKEN).unwrap();

        match restore_session(&store, &fake_client().await).await {
            SessionStart::Authenticated { token, profile } => {
                assert_eq!(token, GOOD_TOKEN);
                assert!(profile.is_admin());
            }
            other => panic!("unexpected start {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejected_token_is_cleared() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path());
        store.save("stale").unwrap();

        let start = restore_session(&store, &fake_client().await).await;
        assert!(matches!(start, SessionStart::SignedOut));
        assert_eq!(store.get(), None);
    }

    #[tokio::test]
    async fn unreachable_backend_keeps_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path());
        store.save("kept").unwrap();
        let client = MediaClient::new("http://127.0.0.1:9", std::time::Duration::from_secs(2)).unwrap();

        let start = restore_session(&store, &client).await;
        assert!(matches!(start, SessionStart::Unverified { .. }));
        assert_eq!(store.get().as_deref(), Some("kept"));
    }
}
