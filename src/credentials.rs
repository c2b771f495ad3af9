// src/credentials.rs
//! Credential providers for the request pipeline.
//!
//! The pipeline never reaches for global state: whoever builds it passes a
//! provider in. A provider hands out the current bearer token and forgets it
//! when the backend rejects it with a 401.

use crate::constants::{APP_DIR_NAME, AUTH_TOKEN_KEY};
use crate::types::AuthToken;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};

/// Source of the bearer token attached to outgoing requests.
#[async_trait::async_trait]
pub trait CredentialProvider: Send + Sync {
    /// The token to present, if one is stored.
    async fn token(&self) -> Option<AuthToken>;

    /// Forgets the stored token. Clearing an absent token is a no-op.
    async fn clear(&self);
}

/// Token held in process memory.
#[derive(Debug, Default)]
pub struct MemoryCredentials {
    token: RwLock<Option<AuthToken>>,
}

impl MemoryCredentials {
    pub fn new(token: Option<AuthToken>) -> Self {
        Self {
            token: RwLock::new(token),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn set(&self, token: AuthToken) {
        *self.token.write() = Some(token);
    }
}

#[async_trait::async_trait]
impl CredentialProvider for MemoryCredentials {
    async fn token(&self) -> Option<AuthToken> {
        self.token.read().clone()
    }

    async fn clear(&self) {
        self.token.write().take();
    }
}

/// Token persisted as `{"authToken": "..."}` in a JSON file.
///
/// Reads happen before every request so a token written by another process
/// is picked up. Storage failures are logged and otherwise ignored: a broken
/// credentials file means anonymous requests, never a failed call.
#[derive(Debug, Clone)]
pub struct FileCredentials {
    path: PathBuf,
}

impl FileCredentials {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$XDG_CONFIG_HOME/hoppyhour/credentials.json`, or `~/.config/...`.
    pub fn default_path() -> PathBuf {
        std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
                PathBuf::from(home).join(".config")
            })
            .join(APP_DIR_NAME)
            .join("credentials.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `token` under the fixed key, keeping any other keys in the file.
    pub async fn store(&self, token: &AuthToken) -> Result<(), std::io::Error> {
        let mut entries = self.read_entries().await.unwrap_or_default();
        entries.insert(
            AUTH_TOKEN_KEY.to_string(),
            serde_json::Value::String(token.as_str().to_string()),
        );
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(&entries)?;
        tokio::fs::write(&self.path, json).await
    }

    async fn read_entries(&self) -> Option<serde_json::Map<String, serde_json::Value>> {
        let content = tokio::fs::read_to_string(&self.path).await.ok()?;
        match serde_json::from_str(&content) {
            Ok(entries) => Some(entries),
            Err(e) => {
                log::warn!(
                    "Ignoring unreadable credentials file {}: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }
}

#[async_trait::async_trait]
impl CredentialProvider for FileCredentials {
    async fn token(&self) -> Option<AuthToken> {
        let entries = self.read_entries().await?;
        let raw = entries.get(AUTH_TOKEN_KEY)?.as_str()?;
        AuthToken::new(raw).ok()
    }

    async fn clear(&self) {
        let Some(mut entries) = self.read_entries().await else {
            return;
        };
        if entries.remove(AUTH_TOKEN_KEY).is_none() {
            return;
        }

        let result = if entries.is_empty() {
            tokio::fs::remove_file(&self.path).await
        } else {
            match serde_json::to_string_pretty(&entries) {
                Ok(json) => tokio::fs::write(&self.path, json).await,
                Err(e) => Err(e.into()),
            }
        };

        if let Err(e) = result {
            log::warn!(
                "Failed to clear token from {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("hoppyhour-credentials-{}-{}", std::process::id(), name))
            .join("credentials.json")
    }

    #[tokio::test]
    async fn test_memory_credentials_clear() {
        let creds = MemoryCredentials::new(Some(AuthToken::new("abc").unwrap()));
        assert_eq!(creds.token().await.unwrap().as_str(), "abc");
        creds.clear().await;
        assert!(creds.token().await.is_none());
        creds.clear().await;
        assert!(creds.token().await.is_none());
    }

    #[tokio::test]
    async fn test_file_credentials_store_and_clear() {
        let path = scratch_file("store");
        let creds = FileCredentials::new(&path);
        assert!(creds.token().await.is_none());

        creds.store(&AuthToken::new("tok-1").unwrap()).await.unwrap();
        assert_eq!(creds.token().await.unwrap().as_str(), "tok-1");

        creds.clear().await;
        assert!(creds.token().await.is_none());
        assert!(!path.exists());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_file_credentials_clear_keeps_other_keys() {
        let path = scratch_file("other-keys");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{"authToken":"tok","theme":"dark"}"#).unwrap();

        let creds = FileCredentials::new(&path);
        creds.clear().await;

        let remaining = std::fs::read_to_string(&path).unwrap();
        assert!(remaining.contains("theme"));
        assert!(!remaining.contains("authToken"));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_file_credentials_ignore_garbage() {
        let path = scratch_file("garbage");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();

        let creds = FileCredentials::new(&path);
        assert!(creds.token().await.is_none());
        creds.clear().await;

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
