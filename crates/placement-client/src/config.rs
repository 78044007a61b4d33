//! Client configuration and factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use placement_core::traits::MediaUploader;

use crate::media::CdnUploader;

/// Connection settings for the content API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Settings for the hosted media CDN.
///
/// Note: Custom Debug impl masks the upload preset, which acts as the
/// credential for unsigned uploads.
#[derive(Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    #[serde(default = "default_media_url")]
    pub base_url: String,
    pub cloud_name: String,
    pub upload_preset: String,
    #[serde(default = "default_upload_timeout")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for MediaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaConfig")
            .field("base_url", &self.base_url)
            .field("cloud_name", &self.cloud_name)
            .field("upload_preset", &"***")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_api_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_media_url() -> String {
    "https://api.cloudinary.com".to_string()
}
fn default_timeout() -> u64 {
    30
}
fn default_upload_timeout() -> u64 {
    300
}
fn default_parallelism() -> usize {
    4
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./placement-reports")
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub media: Option<MediaConfig>,
    /// Max concurrent bank requests during a scan.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Threshold profile used when a command does not name one.
    #[serde(default)]
    pub thresholds_path: Option<PathBuf>,
    /// Output directory for scan reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            media: None,
            parallelism: default_parallelism(),
            thresholds_path: None,
            output_dir: default_output_dir(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are copied as-is and never expanded again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `placement.toml` in the current directory
/// 2. `~/.config/placement/config.toml`
///
/// Environment variable overrides: `PLACEMENT_API_URL`, `PLACEMENT_UPLOAD_PRESET`.
pub fn load_config() -> Result<PlacementConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<PlacementConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("placement.toml");
            if local.exists() {
                Some(local)
            } else {
                config_dir()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<PlacementConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => PlacementConfig::default(),
    };

    Ok(apply_overrides(config))
}

fn apply_overrides(mut config: PlacementConfig) -> PlacementConfig {
    if let Ok(url) = std::env::var("PLACEMENT_API_URL") {
        config.api.base_url = url;
    }
    if let Ok(preset) = std::env::var("PLACEMENT_UPLOAD_PRESET") {
        if let Some(media) = config.media.as_mut() {
            media.upload_preset = preset;
        }
    }

    config.api.base_url = resolve_env_vars(&config.api.base_url);
    if let Some(media) = config.media.as_mut() {
        media.base_url = resolve_env_vars(&media.base_url);
        media.cloud_name = resolve_env_vars(&media.cloud_name);
        media.upload_preset = resolve_env_vars(&media.upload_preset);
    }
    config
}

/// `~/.config/placement`, when `HOME` is set.
pub fn config_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("placement"))
}

/// Create the media uploader described by the config.
pub fn create_uploader(config: &PlacementConfig) -> Result<Box<dyn MediaUploader>> {
    let media = config
        .media
        .as_ref()
        .context("no [media] section in config; media uploads are not configured")?;
    if media.cloud_name.is_empty() || media.upload_preset.is_empty() {
        anyhow::bail!("[media] needs both cloud_name and upload_preset");
    }
    Ok(Box::new(CdnUploader::new(media)?))
}
