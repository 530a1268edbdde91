//! insta-client: Instagram client shim for insta-gateway
//!
//! Per-account client caching with session-file persistence on top of an
//! external Instagram client capability. The platform protocol itself lives
//! behind the [`InstagramClient`] trait; the production binding talks to an
//! instagrapi-compatible REST bridge sidecar.

pub mod api;
pub mod error;
pub mod handler;
pub mod manager;
pub mod session;
pub mod types;

pub use api::{BridgeClient, BridgeClientFactory, ClientFactory, InstagramClient};
pub use error::{InstagramError, Result};
pub use handler::{InstagramHandler, ThreadSummary, ThreadUser, UploadOutcome};
pub use manager::ClientManager;
pub use session::FileSessionStore;
pub use types::{ClientSettings, DirectThread, Media, Story, StoryExtras, UserShort};
