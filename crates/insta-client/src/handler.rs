//! Shim operations: photo upload, story upload, thread listing
//!
//! Each operation acquires a cached or freshly authenticated client from
//! the manager and delegates to it. Failures are logged and surfaced with
//! the original message; there are no retries and no partial results.

use std::io::Write;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::error;

use crate::api::InstagramClient;
use crate::error::Result;
use crate::manager::ClientManager;
use crate::types::{DirectThread, StoryExtras};

/// Successful upload result
#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    pub media_id: String,
    pub code: String,
    pub url: String,
}

/// Flattened thread participant
#[derive(Debug, Clone, Serialize)]
pub struct ThreadUser {
    pub pk: i64,
    pub username: String,
    pub full_name: String,
    pub profile_pic_url: String,
}

/// Flattened direct-message thread
#[derive(Debug, Clone, Serialize)]
pub struct ThreadSummary {
    pub thread_id: String,
    pub thread_pk: String,
    pub users: Vec<ThreadUser>,
    /// RFC 3339 timestamp, or null when the thread has no activity
    pub last_activity: Option<String>,
}

impl From<DirectThread> for ThreadSummary {
    fn from(thread: DirectThread) -> Self {
        Self {
            thread_id: thread.id,
            thread_pk: thread.pk,
            users: thread
                .users
                .into_iter()
                .map(|user| ThreadUser {
                    pk: user.pk,
                    username: user.username,
                    full_name: user.full_name,
                    profile_pic_url: user.profile_pic_url,
                })
                .collect(),
            last_activity: thread.last_activity_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Decode a base64 image payload into a scoped temporary file.
///
/// The file is removed when the returned handle drops, on every exit path.
fn write_temp_image(image_base64: &str) -> Result<NamedTempFile> {
    let bytes = STANDARD.decode(image_base64)?;

    let mut temp = tempfile::Builder::new()
        .prefix("insta-upload-")
        .suffix(".jpg")
        .tempfile()?;
    temp.write_all(&bytes)?;
    temp.flush()?;

    Ok(temp)
}

/// Instagram operation handler
pub struct InstagramHandler {
    manager: Arc<ClientManager>,
}

impl InstagramHandler {
    /// Create a new handler on top of a client manager
    pub fn new(manager: Arc<ClientManager>) -> Self {
        Self { manager }
    }

    /// Upload a photo to the feed and return its id, shortcode and permalink
    pub async fn upload_photo(
        &self,
        identifier: &str,
        username: &str,
        password: &str,
        image_base64: &str,
        caption: Option<&str>,
    ) -> Result<UploadOutcome> {
        let client = self
            .manager
            .get_client(identifier, username, password)
            .await?;

        match Self::do_upload_photo(client.as_ref(), image_base64, caption).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                error!("Failed to upload photo: {}", e);
                Err(e)
            }
        }
    }

    async fn do_upload_photo(
        client: &dyn InstagramClient,
        image_base64: &str,
        caption: Option<&str>,
    ) -> Result<UploadOutcome> {
        let temp = write_temp_image(image_base64)?;

        let media = client.photo_upload(temp.path(), caption).await?;

        let url = format!("https://www.instagram.com/p/{}/", media.code);
        Ok(UploadOutcome {
            media_id: media.id,
            code: media.code,
            url,
        })
    }

    /// Upload a photo to the account story.
    ///
    /// Omitted annotation lists in `extras` are semantically empty.
    pub async fn upload_story(
        &self,
        identifier: &str,
        username: &str,
        password: &str,
        image_base64: &str,
        caption: Option<&str>,
        extras: StoryExtras,
    ) -> Result<UploadOutcome> {
        let client = self
            .manager
            .get_client(identifier, username, password)
            .await?;

        match Self::do_upload_story(client.as_ref(), image_base64, caption, &extras).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                error!("Failed to upload story: {}", e);
                Err(e)
            }
        }
    }

    async fn do_upload_story(
        client: &dyn InstagramClient,
        image_base64: &str,
        caption: Option<&str>,
        extras: &StoryExtras,
    ) -> Result<UploadOutcome> {
        let temp = write_temp_image(image_base64)?;

        let story = client
            .photo_upload_to_story(temp.path(), caption, extras)
            .await?;

        let url = format!(
            "https://www.instagram.com/stories/{}/{}/",
            story.user.username, story.id
        );
        Ok(UploadOutcome {
            media_id: story.id,
            code: story.code,
            url,
        })
    }

    /// List direct-message threads, flattened for the HTTP response
    pub async fn get_direct_threads(
        &self,
        identifier: &str,
        username: &str,
        password: &str,
        amount: u32,
        selected_filter: &str,
        thread_message_limit: Option<u32>,
    ) -> Result<Vec<ThreadSummary>> {
        let client = self
            .manager
            .get_client(identifier, username, password)
            .await?;

        let threads = match client
            .direct_threads(amount, selected_filter, thread_message_limit)
            .await
        {
            Ok(threads) => threads,
            Err(e) => {
                error!("Failed to get direct threads: {}", e);
                return Err(e);
            }
        };

        Ok(threads.into_iter().map(ThreadSummary::from).collect())
    }
}
