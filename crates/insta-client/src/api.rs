//! Instagram client capability and its REST bridge binding
//!
//! The gateway never speaks the Instagram wire protocol itself. All platform
//! behavior sits behind [`InstagramClient`]; the production implementation
//! forwards to an instagrapi-compatible REST bridge sidecar, shipping the
//! full settings blob with every request so the sidecar stays stateless.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::error::{InstagramError, Result};
use crate::types::{ClientSettings, DirectThread, Media, Story, StoryExtras};

/// Capability surface of the external Instagram client.
///
/// One instance represents one (potentially authenticated) session.
#[async_trait]
pub trait InstagramClient: Send + Sync {
    /// Log in with username and password, reusing any applied settings
    async fn login(&self, username: &str, password: &str) -> Result<()>;

    /// Current serialized session state
    async fn settings(&self) -> ClientSettings;

    /// Replace the session state wholesale
    async fn apply_settings(&self, settings: ClientSettings);

    /// Lightweight authenticated call used to test session validity.
    ///
    /// Returns [`InstagramError::LoginRequired`] when the session is stale.
    async fn timeline_feed(&self) -> Result<()>;

    /// Upload a photo from a local file to the feed
    async fn photo_upload(&self, path: &Path, caption: Option<&str>) -> Result<Media>;

    /// Upload a photo from a local file to the account story
    async fn photo_upload_to_story(
        &self,
        path: &Path,
        caption: Option<&str>,
        extras: &StoryExtras,
    ) -> Result<Story>;

    /// List direct-message threads
    async fn direct_threads(
        &self,
        amount: u32,
        selected_filter: &str,
        thread_message_limit: Option<u32>,
    ) -> Result<Vec<DirectThread>>;
}

/// Mints fresh, unauthenticated client handles.
///
/// The manager creates one client per account; tests inject mocks here.
pub trait ClientFactory: Send + Sync {
    fn create(&self) -> Result<Arc<dyn InstagramClient>>;
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    settings: ClientSettings,
}

#[derive(Debug, Deserialize)]
struct ThreadsResponse {
    threads: Vec<DirectThread>,
}

/// REST bridge client.
///
/// Endpoints:
/// - `POST /auth/login`     — credentials + current settings, returns the
///   logged-in settings blob
/// - `POST /timeline/feed`  — session probe; 401/403 means login required
/// - `POST /photo/upload`   — multipart file + caption + settings
/// - `POST /story/upload`   — multipart file + caption + annotation lists
/// - `POST /direct/threads` — thread listing parameters
pub struct BridgeClient {
    client: reqwest::Client,
    base_url: String,
    settings: RwLock<ClientSettings>,
}

impl BridgeClient {
    /// Create a new bridge client
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            settings: RwLock::new(ClientSettings::default()),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn settings_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(&*self.settings.read().await)?)
    }

    /// Fill in any missing durable device identifiers.
    ///
    /// The upstream client library generates these on the device side; the
    /// bridge expects them to be present before the first login.
    fn seed_uuids(settings: &mut ClientSettings) {
        for key in ["phone_id", "uuid", "client_session_id", "advertising_id"] {
            settings
                .uuids
                .entry(key.to_string())
                .or_insert_with(|| Uuid::new_v4().to_string().into());
        }
        settings
            .uuids
            .entry("android_device_id".to_string())
            .or_insert_with(|| {
                format!("android-{}", &Uuid::new_v4().simple().to_string()[..16]).into()
            });
    }
}

#[async_trait]
impl InstagramClient for BridgeClient {
    async fn login(&self, username: &str, password: &str) -> Result<()> {
        let url = self.url("/auth/login");

        {
            let mut settings = self.settings.write().await;
            Self::seed_uuids(&mut settings);
        }

        let body = serde_json::json!({
            "username": username,
            "password": password,
            "settings": self.settings_json().await?,
        });

        debug!("Logging in via bridge as {}", username);

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!("Bridge login failed: {} - {}", status, text);
            return Err(InstagramError::Api(format!("{}: {}", status, text)));
        }

        let login: LoginResponse = serde_json::from_str(&text)?;
        *self.settings.write().await = login.settings;

        info!("Logged in as {}", username);
        Ok(())
    }

    async fn settings(&self) -> ClientSettings {
        self.settings.read().await.clone()
    }

    async fn apply_settings(&self, settings: ClientSettings) {
        *self.settings.write().await = settings;
    }

    async fn timeline_feed(&self) -> Result<()> {
        let url = self.url("/timeline/feed");
        let body = serde_json::json!({ "settings": self.settings_json().await? });

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            debug!("Timeline probe rejected: {}", status);
            return Err(InstagramError::LoginRequired);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("Timeline probe failed: {} - {}", status, text);
            return Err(InstagramError::Api(format!("{}: {}", status, text)));
        }

        Ok(())
    }

    async fn photo_upload(&self, path: &Path, caption: Option<&str>) -> Result<Media> {
        let url = self.url("/photo/upload");

        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("photo.jpg")
            .to_string();

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("image/jpeg")?;

        let mut form = multipart::Form::new()
            .part("file", part)
            .text("settings", serde_json::to_string(&self.settings().await)?);
        if let Some(caption) = caption {
            form = form.text("caption", caption.to_string());
        }

        debug!("Uploading photo {}", path.display());

        let response = self.client.post(&url).multipart(form).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!("Photo upload failed: {} - {}", status, text);
            return Err(InstagramError::Api(format!("{}: {}", status, text)));
        }

        Ok(serde_json::from_str(&text)?)
    }

    async fn photo_upload_to_story(
        &self,
        path: &Path,
        caption: Option<&str>,
        extras: &StoryExtras,
    ) -> Result<Story> {
        let url = self.url("/story/upload");

        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("story.jpg")
            .to_string();

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("image/jpeg")?;

        let mut form = multipart::Form::new()
            .part("file", part)
            .text("settings", serde_json::to_string(&self.settings().await)?)
            .text("mentions", serde_json::to_string(&extras.mentions)?)
            .text("locations", serde_json::to_string(&extras.locations)?)
            .text("links", serde_json::to_string(&extras.links)?)
            .text("hashtags", serde_json::to_string(&extras.hashtags)?)
            .text("stickers", serde_json::to_string(&extras.stickers)?);
        if let Some(caption) = caption {
            form = form.text("caption", caption.to_string());
        }

        debug!("Uploading story {}", path.display());

        let response = self.client.post(&url).multipart(form).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!("Story upload failed: {} - {}", status, text);
            return Err(InstagramError::Api(format!("{}: {}", status, text)));
        }

        Ok(serde_json::from_str(&text)?)
    }

    async fn direct_threads(
        &self,
        amount: u32,
        selected_filter: &str,
        thread_message_limit: Option<u32>,
    ) -> Result<Vec<DirectThread>> {
        let url = self.url("/direct/threads");
        let body = serde_json::json!({
            "settings": self.settings_json().await?,
            "amount": amount,
            "selected_filter": selected_filter,
            "thread_message_limit": thread_message_limit,
        });

        debug!("Listing {} direct threads", amount);

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!("Thread listing failed: {} - {}", status, text);
            return Err(InstagramError::Api(format!("{}: {}", status, text)));
        }

        let threads: ThreadsResponse = serde_json::from_str(&text)?;
        Ok(threads.threads)
    }
}

/// Factory producing [`BridgeClient`] handles
pub struct BridgeClientFactory {
    base_url: String,
    timeout_secs: u64,
}

impl BridgeClientFactory {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.to_string(),
            timeout_secs,
        }
    }
}

impl ClientFactory for BridgeClientFactory {
    fn create(&self) -> Result<Arc<dyn InstagramClient>> {
        Ok(Arc::new(BridgeClient::new(
            &self.base_url,
            self.timeout_secs,
        )?))
    }
}
