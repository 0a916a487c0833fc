//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the collaborator traits,
//! so the whole video lifecycle can be exercised without a network, an
//! ffmpeg binary or a database.
//!
//! # Example
//!
//! ```rust,ignore
//! use floatsync_core::testing::{fixtures, MemoryChannel, MockContentApi, MockTranscoder};
//!
//! let api = Arc::new(MockContentApi::new());
//! let transcoder = Arc::new(MockTranscoder::new());
//! let channel = Arc::new(MemoryChannel::new("Linus"));
//!
//! api.set_ticket("att1", fixtures::delivery_ticket(&["edge01.example.com"])).await;
//! let video = Video::new(fixtures::video_info("g1", "Intro"), channel);
//! ```

mod memory_channel;
mod mock_content_api;
mod mock_transcoder;

pub use memory_channel::MemoryChannel;
pub use mock_content_api::MockContentApi;
pub use mock_transcoder::MockTranscoder;

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::{TimeZone, Utc};

    use crate::api::{DeliveryTicket, Edge, QualityLevel};
    use crate::video::VideoInfo;

    /// Create a single-attachment video released 2023-04-05 06:07:08 UTC.
    ///
    /// The attachment id is `"{guid}-att"`.
    pub fn video_info(guid: &str, title: &str) -> VideoInfo {
        VideoInfo {
            guid: guid.to_string(),
            title: title.to_string(),
            description: "<p>About <b>this</b> video.</p>".to_string(),
            release_date: Utc.with_ymd_and_hms(2023, 4, 5, 6, 7, 8).unwrap(),
            thumbnail: None,
            video_attachments: vec![format!("{}-att", guid)],
        }
    }

    /// Create a video with `parts` attachments named `"{guid}-att{n}"`.
    pub fn multipart_video_info(guid: &str, title: &str, parts: usize) -> VideoInfo {
        let mut info = video_info(guid, title);
        info.video_attachments = (1..=parts).map(|n| format!("{}-att{}", guid, n)).collect();
        info
    }

    /// Create a delivery ticket offering 1080, 720 and 480.
    ///
    /// The URI embeds the attachment-agnostic `/Videos/v/` path, so content
    /// can be matched on the quality part of the URL.
    pub fn delivery_ticket(edges: &[&str]) -> DeliveryTicket {
        DeliveryTicket {
            edges: edges.iter().map(|e| Edge::new(*e)).collect(),
            token: "tok".to_string(),
            uri_template: "/Videos/v/{qualityLevels}.mp4?token={token}".to_string(),
            quality_levels: ["1080", "720", "480"]
                .iter()
                .map(|q| QualityLevel::new(*q))
                .collect(),
        }
    }

    /// Create a delivery ticket whose URI contains `path_marker`.
    pub fn delivery_ticket_for(path_marker: &str, edges: &[&str]) -> DeliveryTicket {
        let mut ticket = delivery_ticket(edges);
        ticket.uri_template = format!("/Videos/{}/{{qualityLevels}}.mp4?token={{token}}", path_marker);
        ticket
    }
}
