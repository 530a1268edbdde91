//! Per-account client cache and authentication flow
//!
//! Authenticated handles live for the process lifetime; there is no expiry
//! and no invalidation API. A revoked session is only discovered when a
//! downstream operation fails, and replaced the next time authentication
//! runs for that identifier.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::api::{ClientFactory, InstagramClient};
use crate::error::{InstagramError, Result};
use crate::session::FileSessionStore;

/// Process-wide mapping from account identifier to authenticated client
pub struct ClientManager {
    factory: Arc<dyn ClientFactory>,
    sessions: FileSessionStore,
    clients: DashMap<String, Arc<dyn InstagramClient>>,
    // Serializes first-time authentication per identifier so concurrent
    // cache misses cannot race on the session file or the cache insert.
    auth_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl ClientManager {
    /// Create a new client manager
    pub fn new(factory: Arc<dyn ClientFactory>, sessions: FileSessionStore) -> Self {
        Self {
            factory,
            sessions,
            clients: DashMap::new(),
            auth_locks: DashMap::new(),
        }
    }

    /// Get or create an authenticated client for `identifier`.
    ///
    /// A cached handle is returned as-is, with no freshness check. On a
    /// miss, authentication runs under a per-identifier lock; any failure
    /// surfaces as [`InstagramError::Authentication`] carrying the
    /// underlying error text. No retries.
    pub async fn get_client(
        &self,
        identifier: &str,
        username: &str,
        password: &str,
    ) -> Result<Arc<dyn InstagramClient>> {
        if let Some(client) = self.clients.get(identifier) {
            return Ok(client.value().clone());
        }

        let lock = {
            let entry = self.auth_locks.entry(identifier.to_string()).or_default();
            Arc::clone(entry.value())
        };
        let _guard = lock.lock().await;

        // Another request may have authenticated while we waited
        if let Some(client) = self.clients.get(identifier) {
            return Ok(client.value().clone());
        }

        let client = self
            .authenticate(identifier, username, password)
            .await
            .map_err(|e| {
                error!("Login failed for {}: {}", identifier, e);
                InstagramError::Authentication(e.to_string())
            })?;

        self.clients.insert(identifier.to_string(), Arc::clone(&client));
        Ok(client)
    }

    /// Number of cached client handles
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Authenticate a fresh client, preferring the saved session.
    ///
    /// At most one session read and one session write happen per attempt:
    /// the saved blob is read up front, and settings are only written back
    /// after a fresh credential login.
    async fn authenticate(
        &self,
        identifier: &str,
        username: &str,
        password: &str,
    ) -> Result<Arc<dyn InstagramClient>> {
        let client = self.factory.create()?;

        if let Some(saved) = self.sessions.load(identifier).await? {
            client.apply_settings(saved).await;
            client.login(username, password).await?;

            match client.timeline_feed().await {
                Ok(()) => {
                    info!("Logged in using saved session for user {}", identifier);
                    return Ok(client);
                }
                Err(InstagramError::LoginRequired) => {
                    info!("Session is invalid, retrying with username and password");
                    // Discard the stale session but keep the durable
                    // device identifiers.
                    let old = client.settings().await;
                    client.apply_settings(old.retain_uuids()).await;
                }
                Err(e) => return Err(e),
            }
        }

        client.login(username, password).await?;

        let settings = client.settings().await;
        self.sessions.save(identifier, &settings).await?;

        info!("Logged in and saved session for user {}", identifier);
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClientSettings, DirectThread, Media, Story, StoryExtras};
    use async_trait::async_trait;
    use serde_json::json;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::RwLock;

    struct MockClient {
        login_calls: AtomicUsize,
        probe_calls: AtomicUsize,
        probe_stale: bool,
        fail_login: bool,
        settings: RwLock<ClientSettings>,
    }

    impl MockClient {
        fn new(probe_stale: bool, fail_login: bool) -> Arc<Self> {
            Arc::new(Self {
                login_calls: AtomicUsize::new(0),
                probe_calls: AtomicUsize::new(0),
                probe_stale,
                fail_login,
                settings: RwLock::new(ClientSettings::default()),
            })
        }
    }

    #[async_trait]
    impl InstagramClient for MockClient {
        async fn login(&self, _username: &str, _password: &str) -> Result<()> {
            if self.fail_login {
                return Err(InstagramError::Api("400: bad password".to_string()));
            }
            self.login_calls.fetch_add(1, Ordering::SeqCst);
            // A successful login refreshes the cookies, keeping whatever
            // device identifiers were applied.
            self.settings
                .write()
                .await
                .extra
                .insert("cookies".to_string(), json!({ "sessionid": "fresh" }));
            Ok(())
        }

        async fn settings(&self) -> ClientSettings {
            self.settings.read().await.clone()
        }

        async fn apply_settings(&self, settings: ClientSettings) {
            *self.settings.write().await = settings;
        }

        async fn timeline_feed(&self) -> Result<()> {
            self.probe_calls.fetch_add(1, Ordering::SeqCst);
            if self.probe_stale {
                Err(InstagramError::LoginRequired)
            } else {
                Ok(())
            }
        }

        async fn photo_upload(&self, _path: &Path, _caption: Option<&str>) -> Result<Media> {
            unimplemented!("not exercised by manager tests")
        }

        async fn photo_upload_to_story(
            &self,
            _path: &Path,
            _caption: Option<&str>,
            _extras: &StoryExtras,
        ) -> Result<Story> {
            unimplemented!("not exercised by manager tests")
        }

        async fn direct_threads(
            &self,
            _amount: u32,
            _selected_filter: &str,
            _thread_message_limit: Option<u32>,
        ) -> Result<Vec<DirectThread>> {
            unimplemented!("not exercised by manager tests")
        }
    }

    struct MockFactory {
        client: Arc<MockClient>,
        create_calls: AtomicUsize,
    }

    impl MockFactory {
        fn new(client: Arc<MockClient>) -> Arc<Self> {
            Arc::new(Self {
                client,
                create_calls: AtomicUsize::new(0),
            })
        }
    }

    impl ClientFactory for MockFactory {
        fn create(&self) -> Result<Arc<dyn InstagramClient>> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::clone(&self.client) as Arc<dyn InstagramClient>)
        }
    }

    fn manager_with(
        client: &Arc<MockClient>,
        dir: &tempfile::TempDir,
    ) -> ClientManager {
        ClientManager::new(
            MockFactory::new(Arc::clone(client)),
            FileSessionStore::new(dir.path()),
        )
    }

    fn saved_settings() -> ClientSettings {
        let mut settings = ClientSettings::default();
        settings
            .uuids
            .insert("phone_id".to_string(), json!("durable-phone-id"));
        settings
            .extra
            .insert("cookies".to_string(), json!({ "sessionid": "saved" }));
        settings
    }

    #[tokio::test]
    async fn test_second_call_is_a_cache_hit() {
        let dir = tempfile::TempDir::new().unwrap();
        let mock = MockClient::new(false, false);
        let manager = manager_with(&mock, &dir);

        let first = manager.get_client("acct", "user", "pass").await.unwrap();
        let second = manager.get_client("acct", "user", "pass").await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(mock.login_calls.load(Ordering::SeqCst), 1);
        assert_eq!(manager.client_count(), 1);
    }

    #[tokio::test]
    async fn test_fresh_login_persists_session() {
        let dir = tempfile::TempDir::new().unwrap();
        let mock = MockClient::new(false, false);
        let manager = manager_with(&mock, &dir);
        let store = FileSessionStore::new(dir.path());

        manager.get_client("acct", "user", "pass").await.unwrap();

        let saved = store.load("acct").await.unwrap().unwrap();
        assert_eq!(saved.extra["cookies"]["sessionid"], "fresh");
        // No session file existed, so the probe never ran
        assert_eq!(mock.probe_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_valid_session_skips_fresh_login() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path());
        store.save("acct", &saved_settings()).await.unwrap();

        let mock = MockClient::new(false, false);
        let manager = manager_with(&mock, &dir);

        manager.get_client("acct", "user", "pass").await.unwrap();

        assert_eq!(mock.login_calls.load(Ordering::SeqCst), 1);
        assert_eq!(mock.probe_calls.load(Ordering::SeqCst), 1);
        // The probe succeeded, so the saved blob was not rewritten
        let on_disk = store.load("acct").await.unwrap().unwrap();
        assert_eq!(on_disk.extra["cookies"]["sessionid"], "saved");
    }

    #[tokio::test]
    async fn test_stale_session_falls_back_and_keeps_uuids() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path());
        store.save("acct", &saved_settings()).await.unwrap();

        let mock = MockClient::new(true, false);
        let manager = manager_with(&mock, &dir);

        manager.get_client("acct", "user", "pass").await.unwrap();

        // One login against the saved session, one fresh
        assert_eq!(mock.login_calls.load(Ordering::SeqCst), 2);
        assert_eq!(mock.probe_calls.load(Ordering::SeqCst), 1);

        let rewritten = store.load("acct").await.unwrap().unwrap();
        assert_eq!(rewritten.uuids["phone_id"], "durable-phone-id");
        assert_eq!(rewritten.extra["cookies"]["sessionid"], "fresh");
    }

    #[tokio::test]
    async fn test_login_failure_surfaces_as_authentication() {
        let dir = tempfile::TempDir::new().unwrap();
        let mock = MockClient::new(false, true);
        let manager = manager_with(&mock, &dir);

        let err = manager
            .get_client("acct", "user", "wrong")
            .await
            .err()
            .unwrap();

        match err {
            InstagramError::Authentication(msg) => assert!(msg.contains("bad password")),
            other => panic!("expected Authentication, got {:?}", other),
        }
        assert_eq!(manager.client_count(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_first_requests_authenticate_once() {
        let dir = tempfile::TempDir::new().unwrap();
        let mock = MockClient::new(false, false);
        let manager = Arc::new(manager_with(&mock, &dir));

        let a = {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.get_client("acct", "user", "pass").await })
        };
        let b = {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.get_client("acct", "user", "pass").await })
        };

        let first = a.await.unwrap().unwrap();
        let second = b.await.unwrap().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(mock.login_calls.load(Ordering::SeqCst), 1);
    }
}
