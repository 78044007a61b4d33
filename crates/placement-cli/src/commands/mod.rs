pub mod compare;
pub mod init;
pub mod list;
pub mod login;
pub mod logout;
pub mod readiness;
pub mod scan;
pub mod upload;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use placement_client::config::load_config_from;
use placement_client::{ApiClient, Credentials, PlacementConfig, SessionStore};
use placement_core::thresholds::{self, ThresholdProfile};

/// Load config and build an API client carrying the stored session tokens.
///
/// A stored refresh token lets the client renew an expired access token;
/// the renewed pair is written back to the session file.
pub fn connect(config_path: Option<&Path>) -> Result<(PlacementConfig, ApiClient)> {
    let config = load_config_from(config_path)?;
    let mut client = ApiClient::from_config(&config.api)?;

    let store = SessionStore::default_location();
    match store.credentials(&config.api.base_url)? {
        Some(Credentials { access, refresh }) => {
            client = client.with_token(access);
            if let Some(refresh) = refresh {
                client = client.with_refresh_token(refresh).with_session(store);
            }
        }
        None => tracing::debug!("no stored session; requests are anonymous"),
    }
    Ok((config, client))
}

/// The threshold profile named on the command line, else the configured one.
pub fn load_profile(
    explicit: Option<PathBuf>,
    config: &PlacementConfig,
) -> Result<Option<ThresholdProfile>> {
    let Some(path) = explicit.or_else(|| config.thresholds_path.clone()) else {
        return Ok(None);
    };
    let profile = thresholds::parse_profile(&path)
        .with_context(|| format!("cannot use thresholds from {}", path.display()))?;
    for warning in thresholds::validate_profile(&profile) {
        tracing::warn!(level = ?warning.level, "{}", warning.message);
    }
    Ok(Some(profile))
}

/// Add a login hint to errors that need one.
pub fn explain(error: placement_core::ApiError) -> anyhow::Error {
    if error.requires_login() {
        anyhow::Error::new(error).context("run `placement login` first")
    } else {
        anyhow::Error::new(error)
    }
}
