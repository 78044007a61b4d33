//! placement-client — HTTP integrations.
//!
//! Implements `ContentApi` for the placement REST API and `MediaUploader`
//! for the hosted media CDN, plus the config and login-session plumbing the
//! CLI builds them from.

pub mod api;
pub mod config;
pub mod error;
pub mod media;
pub mod mock;
pub mod session;

pub use api::ApiClient;
pub use config::{create_uploader, load_config, load_config_from, PlacementConfig};
pub use media::CdnUploader;
pub use session::{Credentials, SessionStore, StoredSession};
