//! Data types mirrored from the Instagram bridge payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Serialized login state for one account.
///
/// Persisted wholesale to the session file and shipped with every bridge
/// request. The `uuids` map holds the durable device identifiers that
/// survive a session reset; everything else (cookies, tokens, device
/// settings) lives in the flattened remainder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Durable device identifiers
    #[serde(default)]
    pub uuids: serde_json::Map<String, Value>,

    /// Cookies, tokens and device settings as returned by the bridge
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl ClientSettings {
    pub fn is_empty(&self) -> bool {
        self.uuids.is_empty() && self.extra.is_empty()
    }

    /// A blank session retaining only the durable device identifiers
    pub fn retain_uuids(&self) -> Self {
        Self {
            uuids: self.uuids.clone(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Minimal user summary as it appears in thread listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserShort {
    pub pk: i64,
    pub username: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub profile_pic_url: String,
}

/// An uploaded feed media
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Media {
    /// Composite media identifier, e.g. `3089...179_4958...2`
    pub id: String,
    #[serde(default)]
    pub pk: i64,
    /// Shortcode used in permalinks
    pub code: String,
}

/// An uploaded story media
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    pub id: String,
    #[serde(default)]
    pub pk: i64,
    pub code: String,
    /// The posting account; its username goes into the story permalink
    pub user: UserShort,
}

/// Optional story annotations.
///
/// The bridge treats each list as an opaque JSON array; omitted lists are
/// semantically empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryExtras {
    #[serde(default)]
    pub mentions: Vec<Value>,
    #[serde(default)]
    pub locations: Vec<Value>,
    #[serde(default)]
    pub links: Vec<Value>,
    #[serde(default)]
    pub hashtags: Vec<Value>,
    #[serde(default)]
    pub stickers: Vec<Value>,
}

/// A direct-message thread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectThread {
    pub id: String,
    pub pk: String,
    #[serde(default)]
    pub users: Vec<UserShort>,
    /// Missing when the thread has never seen activity
    #[serde(default)]
    pub last_activity_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retain_uuids() {
        let mut settings = ClientSettings::default();
        settings
            .uuids
            .insert("phone_id".to_string(), Value::String("abc".to_string()));
        settings
            .extra
            .insert("cookies".to_string(), serde_json::json!({"sessionid": "x"}));

        let reset = settings.retain_uuids();
        assert_eq!(reset.uuids, settings.uuids);
        assert!(reset.extra.is_empty());
    }

    #[test]
    fn test_settings_roundtrip_flattens_extra() {
        let json = serde_json::json!({
            "uuids": {"phone_id": "abc"},
            "cookies": {"sessionid": "x"},
            "authorization_data": {"ds_user_id": "1"}
        });

        let settings: ClientSettings = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(settings.uuids.len(), 1);
        assert_eq!(settings.extra.len(), 2);

        let back = serde_json::to_value(&settings).unwrap();
        assert_eq!(back, json);
    }

    #[test]
    fn test_thread_without_activity() {
        let thread: DirectThread = serde_json::from_value(serde_json::json!({
            "id": "340282366841710300949128268427227080897",
            "pk": "17846306519131996",
            "users": [{"pk": 1, "username": "alice", "full_name": "Alice"}]
        }))
        .unwrap();

        assert!(thread.last_activity_at.is_none());
        assert_eq!(thread.users[0].profile_pic_url, "");
    }
}
