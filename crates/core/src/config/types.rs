use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::transcoder::TranscoderConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Naming template for downloaded videos, see [`crate::naming`].
    #[serde(default = "default_file_path_formatting")]
    pub file_path_formatting: String,
    /// Suffix appended to the file path for the artwork image.
    #[serde(default = "default_artwork_suffix")]
    pub artwork_suffix: String,
    /// Treat any existing final container as muxed, ignoring the expected size.
    #[serde(default)]
    pub consider_all_non_partial_downloaded: bool,
    /// Shell command run after each finalized video. Empty disables it.
    #[serde(default)]
    pub post_processing_command: String,
    #[serde(default)]
    pub extras: ExtrasConfig,
    #[serde(default)]
    pub floatplane: FloatplaneConfig,
    #[serde(default)]
    pub transcoder: TranscoderConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub downloads: DownloadsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file_path_formatting: default_file_path_formatting(),
            artwork_suffix: default_artwork_suffix(),
            consider_all_non_partial_downloaded: false,
            post_processing_command: String::new(),
            extras: ExtrasConfig::default(),
            floatplane: FloatplaneConfig::default(),
            transcoder: TranscoderConfig::default(),
            database: DatabaseConfig::default(),
            downloads: DownloadsConfig::default(),
        }
    }
}

fn default_file_path_formatting() -> String {
    "./videos/%channelTitle%/%channelTitle% - S%year%E%month%%day%%hour%%minute%%second% - %videoTitle%"
        .to_string()
}

fn default_artwork_suffix() -> String {
    "-thumb".to_string()
}

/// Optional artifacts produced next to each video
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtrasConfig {
    #[serde(default = "default_true")]
    pub download_artwork: bool,
    #[serde(default = "default_true")]
    pub save_nfo: bool,
}

impl Default for ExtrasConfig {
    fn default() -> Self {
        Self {
            download_artwork: true,
            save_nfo: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Remote API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FloatplaneConfig {
    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Value of the `sails.sid` session cookie
    #[serde(default)]
    pub auth_cookie: String,
    /// Fixed edge hostname replacing the randomly selected one. Empty means unset.
    #[serde(default)]
    pub download_edge: String,
    /// Requested quality level name (e.g. "1080")
    #[serde(default = "default_quality")]
    pub quality: String,
    /// Connect timeout in seconds (default: 30)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u32,
}

impl Default for FloatplaneConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_cookie: String::new(),
            download_edge: String::new(),
            quality: default_quality(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl FloatplaneConfig {
    /// The configured override edge, if any.
    pub fn download_edge(&self) -> Option<&str> {
        let edge = self.download_edge.trim();
        (!edge.is_empty()).then_some(edge)
    }
}

fn default_base_url() -> String {
    "https://www.floatplane.com".to_string()
}

fn default_quality() -> String {
    "1080".to_string()
}

fn default_connect_timeout() -> u32 {
    30
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("floatsync.db")
}

/// Batch download configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DownloadsConfig {
    /// Maximum number of videos processed at the same time
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for DownloadsConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
        }
    }
}

fn default_max_concurrent() -> usize {
    2
}

/// Sanitized config for logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub file_path_formatting: String,
    pub artwork_suffix: String,
    pub consider_all_non_partial_downloaded: bool,
    pub post_processing_command_configured: bool,
    pub extras: ExtrasConfig,
    pub floatplane: SanitizedFloatplaneConfig,
    pub database: DatabaseConfig,
    pub downloads: DownloadsConfig,
}

/// Sanitized remote API config (cookie hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedFloatplaneConfig {
    pub base_url: String,
    pub auth_cookie_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_edge: Option<String>,
    pub quality: String,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            file_path_formatting: config.file_path_formatting.clone(),
            artwork_suffix: config.artwork_suffix.clone(),
            consider_all_non_partial_downloaded: config.consider_all_non_partial_downloaded,
            post_processing_command_configured: !config.post_processing_command.trim().is_empty(),
            extras: config.extras.clone(),
            floatplane: SanitizedFloatplaneConfig {
                base_url: config.floatplane.base_url.clone(),
                auth_cookie_configured: !config.floatplane.auth_cookie.is_empty(),
                download_edge: config.floatplane.download_edge().map(str::to_string),
                quality: config.floatplane.quality.clone(),
            },
            database: config.database.clone(),
            downloads: config.downloads.clone(),
        }
    }
}
