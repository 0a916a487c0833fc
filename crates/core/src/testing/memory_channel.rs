//! In-memory channel for testing.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::channel::{Channel, ChannelError, VideoRecord};

/// A [`Channel`] keeping its video records in a map.
///
/// The conditional write holds the lock for the whole check-and-set, so it
/// is atomic per guid like the SQLite store.
#[derive(Debug)]
pub struct MemoryChannel {
    title: String,
    records: Mutex<HashMap<String, VideoRecord>>,
}

impl MemoryChannel {
    /// Create an empty channel.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Get a copy of every record.
    pub fn records(&self) -> HashMap<String, VideoRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Whether a video was marked completed.
    pub fn is_completed(&self, guid: &str) -> bool {
        self.records
            .lock()
            .unwrap()
            .get(guid)
            .is_some_and(|r| r.completed_at.is_some())
    }
}

impl Channel for MemoryChannel {
    fn title(&self) -> &str {
        &self.title
    }

    fn video_record(&self, guid: &str) -> Result<Option<VideoRecord>, ChannelError> {
        Ok(self.records.lock().unwrap().get(guid).cloned())
    }

    fn record_expected_size_if_unset(&self, guid: &str, bytes: u64) -> Result<bool, ChannelError> {
        let mut records = self.records.lock().unwrap();
        let record = records.entry(guid.to_string()).or_default();
        if record.expected_size.is_some() {
            return Ok(false);
        }
        record.expected_size = Some(bytes);
        Ok(true)
    }

    fn set_expected_size(&self, guid: &str, bytes: u64) -> Result<(), ChannelError> {
        self.records
            .lock()
            .unwrap()
            .entry(guid.to_string())
            .or_default()
            .expected_size = Some(bytes);
        Ok(())
    }

    fn mark_completed(&self, guid: &str, released_at: DateTime<Utc>) -> Result<(), ChannelError> {
        let mut records = self.records.lock().unwrap();
        let record = records.entry(guid.to_string()).or_default();
        record.completed_at = Some(Utc::now());
        record.released_at = Some(released_at);
        Ok(())
    }
}
