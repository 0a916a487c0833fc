//! Metadata written alongside and into the downloaded files.

mod mtime;
mod nfo;
mod text;

pub use mtime::stamp_mtime;
pub use nfo::{season_episode, EpisodeNfo};
pub use text::html_to_text;

use chrono::Datelike;

use crate::naming::part_suffix;
use crate::transcoder::ContainerMetadata;
use crate::video::Video;

/// Container metadata for one part of a video.
pub fn container_metadata(video: &Video, part_index: usize) -> ContainerMetadata {
    let released = video.release_date();
    ContainerMetadata {
        title: Some(format!(
            "{}{}",
            video.title(),
            part_suffix(part_index, video.part_count())
        )),
        author: Some(video.channel().title().to_string()),
        year: Some(released.year()),
        date: Some(released.format("%Y%m%d").to_string()),
        description: Some(html_to_text(video.description())),
    }
}
