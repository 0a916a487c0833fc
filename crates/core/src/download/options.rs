//! Download options.

use crate::config::Config;

/// Settings the download orchestrator reads from the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    pub file_path_formatting: String,
    pub artwork_suffix: String,
    pub download_artwork: bool,
    pub save_nfo: bool,
    pub consider_all_non_partial_downloaded: bool,
    /// Requested quality level name.
    pub quality: String,
    /// Fixed edge hostname replacing the randomly selected one.
    pub download_edge: Option<String>,
}

impl DownloadOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            file_path_formatting: config.file_path_formatting.clone(),
            artwork_suffix: config.artwork_suffix.clone(),
            download_artwork: config.extras.download_artwork,
            save_nfo: config.extras.save_nfo,
            consider_all_non_partial_downloaded: config.consider_all_non_partial_downloaded,
            quality: config.floatplane.quality.clone(),
            download_edge: config.floatplane.download_edge().map(str::to_string),
        }
    }
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.extras.save_nfo = false;
        config.floatplane.download_edge = "edge.example.com".to_string();
        config.floatplane.quality = "720".to_string();

        let options = DownloadOptions::from_config(&config);
        assert!(!options.save_nfo);
        assert!(options.download_artwork);
        assert_eq!(options.quality, "720");
        assert_eq!(options.download_edge.as_deref(), Some("edge.example.com"));
    }
}
