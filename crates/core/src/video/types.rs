//! Video and attachment part types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::channel::Channel;
use crate::naming::{TemplateValues, VideoPaths};

/// Remote metadata of a video, as enumerated from its channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInfo {
    /// Globally unique content identifier.
    pub guid: String,
    pub title: String,
    /// Rich text (HTML) description.
    #[serde(default)]
    pub description: String,
    pub release_date: DateTime<Utc>,
    /// Thumbnail image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Video attachment ids, in part order.
    pub video_attachments: Vec<String>,
}

/// One physical file composing a (possibly multi-part) video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentPart {
    pub attachment_id: String,
    /// 0-based position in the attachment list.
    pub index: usize,
}

/// A video bound to the channel that owns its persisted state.
#[derive(Clone)]
pub struct Video {
    info: VideoInfo,
    channel: Arc<dyn Channel>,
}

impl Video {
    pub fn new(info: VideoInfo, channel: Arc<dyn Channel>) -> Self {
        Self { info, channel }
    }

    pub fn guid(&self) -> &str {
        &self.info.guid
    }

    pub fn title(&self) -> &str {
        &self.info.title
    }

    pub fn description(&self) -> &str {
        &self.info.description
    }

    pub fn release_date(&self) -> DateTime<Utc> {
        self.info.release_date
    }

    pub fn thumbnail(&self) -> Option<&str> {
        self.info.thumbnail.as_deref()
    }

    pub fn info(&self) -> &VideoInfo {
        &self.info
    }

    pub fn channel(&self) -> &Arc<dyn Channel> {
        &self.channel
    }

    pub fn part_count(&self) -> usize {
        self.info.video_attachments.len()
    }

    /// The attachment parts in stable order.
    pub fn parts(&self) -> Vec<AttachmentPart> {
        self.info
            .video_attachments
            .iter()
            .enumerate()
            .map(|(index, id)| AttachmentPart {
                attachment_id: id.clone(),
                index,
            })
            .collect()
    }

    /// Values available to naming templates and hook commands.
    pub fn template_values(&self) -> TemplateValues {
        TemplateValues::new(
            self.channel.title(),
            self.info.title.clone(),
            self.info.release_date,
        )
    }

    /// Resolves the on-disk locations of this video.
    ///
    /// A title that sanitizes to an empty file name falls back to the guid.
    pub fn paths(&self, template: &str) -> VideoPaths {
        VideoPaths::resolve_or(
            template,
            &self.template_values(),
            self.part_count(),
            &self.info.guid,
        )
    }
}

impl fmt::Debug for Video {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Video")
            .field("guid", &self.info.guid)
            .field("title", &self.info.title)
            .field("channel", &self.channel.title())
            .field("parts", &self.info.video_attachments.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MemoryChannel};

    #[test]
    fn test_parts_follow_attachment_order() {
        let channel = Arc::new(MemoryChannel::new("Linus"));
        let mut info = fixtures::video_info("g1", "Title");
        info.video_attachments = vec!["b".to_string(), "a".to_string()];
        let video = Video::new(info, channel);

        let parts = video.parts();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].attachment_id, "b");
        assert_eq!(parts[0].index, 0);
        assert_eq!(parts[1].attachment_id, "a");
        assert_eq!(parts[1].index, 1);
    }

    #[test]
    fn test_paths_use_channel_title() {
        let channel = Arc::new(MemoryChannel::new("Linus"));
        let video = Video::new(fixtures::video_info("g1", "Ep 1 - Intro"), channel);
        let paths = video.paths("%channelTitle%/%videoTitle%");
        assert_eq!(paths.file_path(), std::path::Path::new("Linus/Ep 1 Intro"));
    }

    #[test]
    fn test_reserved_title_falls_back_to_guid() {
        let channel = Arc::new(MemoryChannel::new("Linus"));
        let video = Video::new(fixtures::video_info("g1", "CON"), channel);
        let paths = video.paths("%channelTitle%/%videoTitle%");
        assert_eq!(
            paths.partial_files(),
            vec![std::path::PathBuf::from("Linus/g1.partial")]
        );
    }

    #[test]
    fn test_deserialize_video_info() {
        let json = r#"{
            "guid": "abc",
            "title": "Hello",
            "description": "<p>Hi</p>",
            "releaseDate": "2023-01-02T03:04:05Z",
            "videoAttachments": ["att1"]
        }"#;
        let info: VideoInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.guid, "abc");
        assert_eq!(info.thumbnail, None);
        assert_eq!(info.video_attachments, vec!["att1".to_string()]);
    }
}
