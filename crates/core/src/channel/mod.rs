//! Channel collaborator - the owner of a video's persisted completion state.
//!
//! A video never stores its expected size itself: it lives in the channel's
//! video database so it survives restarts and can be re-checked against the
//! bytes on disk on the next run.

mod sqlite;

pub use sqlite::{DbChannel, SqliteVideoDb};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the channel video database.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Database error: {0}")]
    Database(String),
}

/// Persisted state of one video, keyed by guid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    /// Authoritative byte count used to judge completion.
    pub expected_size: Option<u64>,
    /// When the video was marked completed.
    pub completed_at: Option<DateTime<Utc>>,
    /// Release date passed at completion.
    pub released_at: Option<DateTime<Utc>>,
}

/// The channel a video belongs to.
///
/// Implementations must make `record_expected_size_if_unset` atomic per guid,
/// as several transfers of the same video may report sizes concurrently.
pub trait Channel: Send + Sync {
    /// Display title, used in naming templates and metadata.
    fn title(&self) -> &str;

    /// Get the persisted record of a video, if any.
    fn video_record(&self, guid: &str) -> Result<Option<VideoRecord>, ChannelError>;

    /// Get the expected size of a video.
    fn expected_size(&self, guid: &str) -> Result<Option<u64>, ChannelError> {
        Ok(self
            .video_record(guid)?
            .and_then(|record| record.expected_size))
    }

    /// When the video was marked completed, if ever.
    fn completed_at(&self, guid: &str) -> Result<Option<DateTime<Utc>>, ChannelError> {
        Ok(self
            .video_record(guid)?
            .and_then(|record| record.completed_at))
    }

    /// Store the expected size only if none is recorded yet.
    ///
    /// Returns whether the value was stored.
    fn record_expected_size_if_unset(&self, guid: &str, bytes: u64) -> Result<bool, ChannelError>;

    /// Store the expected size, replacing any previous value.
    fn set_expected_size(&self, guid: &str, bytes: u64) -> Result<(), ChannelError>;

    /// Mark a video as completed.
    fn mark_completed(&self, guid: &str, released_at: DateTime<Utc>) -> Result<(), ChannelError>;
}
