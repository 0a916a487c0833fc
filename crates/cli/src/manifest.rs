//! The list of channels and videos to sync.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;

use floatsync_core::{SqliteVideoDb, Video, VideoInfo};

/// Videos enumerated per channel by an external tool.
#[derive(Debug, Deserialize)]
pub struct Manifest {
    pub channels: Vec<ManifestChannel>,
}

#[derive(Debug, Deserialize)]
pub struct ManifestChannel {
    pub title: String,
    #[serde(default)]
    pub videos: Vec<VideoInfo>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {:?}", path))?;
        Self::parse(&content).with_context(|| format!("Failed to parse manifest {:?}", path))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Binds every video to its channel in the database.
    pub fn into_videos(self, db: &Arc<SqliteVideoDb>) -> Vec<Video> {
        self.channels
            .into_iter()
            .flat_map(|channel| {
                let bound = Arc::new(db.channel(channel.title));
                channel
                    .videos
                    .into_iter()
                    .map(move |info| Video::new(info, bound.clone()))
            })
            .collect()
    }
}
