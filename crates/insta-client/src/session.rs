//! Session file persistence
//!
//! One JSON blob per account identifier, overwritten wholesale after each
//! fresh login. Nothing here interprets the settings; that is the client's
//! concern.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::types::ClientSettings;

/// File-backed session store keyed by account identifier
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    /// Create a store rooted at `dir`; the directory is created lazily on
    /// the first save.
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Session file path for an identifier
    pub fn path(&self, identifier: &str) -> PathBuf {
        self.dir.join(format!("{}_session.json", identifier))
    }

    /// Load the saved settings for an identifier, `None` when absent
    pub async fn load(&self, identifier: &str) -> Result<Option<ClientSettings>> {
        let path = self.path(identifier);

        let data = match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let settings = serde_json::from_slice(&data)?;
        debug!("Loaded session for {} from {}", identifier, path.display());
        Ok(Some(settings))
    }

    /// Persist the settings for an identifier, replacing any previous blob
    pub async fn save(&self, identifier: &str, settings: &ClientSettings) -> Result<()> {
        let path = self.path(identifier);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let data = serde_json::to_vec(settings)?;
        tokio::fs::write(&path, data).await?;

        debug!("Saved session for {} to {}", identifier, path.display());
        Ok(())
    }

    /// Whether a session blob exists for an identifier
    pub async fn exists(&self, identifier: &str) -> bool {
        tokio::fs::try_exists(self.path(identifier))
            .await
            .unwrap_or(false)
    }

    /// Root directory of the store
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings_with_cookie(value: &str) -> ClientSettings {
        let mut settings = ClientSettings::default();
        settings
            .extra
            .insert("cookies".to_string(), json!({ "sessionid": value }));
        settings
    }

    #[tokio::test]
    async fn test_load_missing_returns_none() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path());

        let loaded = store.load("user1").await.unwrap();
        assert!(loaded.is_none());
        assert!(!store.exists("user1").await);
    }

    #[tokio::test]
    async fn test_save_creates_parent_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested").join("sessions"));

        store
            .save("user1", &settings_with_cookie("abc"))
            .await
            .unwrap();

        assert!(store.exists("user1").await);
        assert!(store.path("user1").ends_with("user1_session.json"));
    }

    #[tokio::test]
    async fn test_save_overwrites_wholesale() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path());

        let mut first = settings_with_cookie("old");
        first
            .extra
            .insert("authorization_data".to_string(), json!({"ds_user_id": "1"}));
        store.save("user1", &first).await.unwrap();

        let second = settings_with_cookie("new");
        store.save("user1", &second).await.unwrap();

        let loaded = store.load("user1").await.unwrap().unwrap();
        assert_eq!(loaded, second);
        assert!(!loaded.extra.contains_key("authorization_data"));
    }
}
