//! SQLite-backed channel video database.

use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::{Channel, ChannelError, VideoRecord};

/// SQLite database holding the video records of every channel.
pub struct SqliteVideoDb {
    conn: Mutex<Connection>,
}

impl SqliteVideoDb {
    /// Open the database, creating the file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, ChannelError> {
        let conn = Connection::open(path).map_err(|e| ChannelError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory database (useful for testing).
    pub fn in_memory() -> Result<Self, ChannelError> {
        let conn =
            Connection::open_in_memory().map_err(|e| ChannelError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), ChannelError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS videos (
                channel TEXT NOT NULL,
                guid TEXT NOT NULL,
                expected_size INTEGER,
                released_at_ms INTEGER,
                completed_at TEXT,
                PRIMARY KEY (channel, guid)
            );
            "#,
        )
        .map_err(|e| ChannelError::Database(e.to_string()))?;

        Ok(())
    }

    /// Get a channel handle scoped to the given title.
    pub fn channel(self: &Arc<Self>, title: impl Into<String>) -> DbChannel {
        DbChannel {
            title: title.into(),
            db: Arc::clone(self),
        }
    }

    fn get(&self, channel: &str, guid: &str) -> Result<Option<VideoRecord>, ChannelError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT expected_size, released_at_ms, completed_at FROM videos
             WHERE channel = ? AND guid = ?",
            params![channel, guid],
            |row| {
                let expected_size: Option<i64> = row.get(0)?;
                let released_at_ms: Option<i64> = row.get(1)?;
                let completed_at: Option<String> = row.get(2)?;
                Ok(VideoRecord {
                    expected_size: expected_size.map(|size| size as u64),
                    released_at: released_at_ms
                        .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
                    completed_at: completed_at.and_then(|s| {
                        DateTime::parse_from_rfc3339(&s)
                            .map(|dt| dt.with_timezone(&Utc))
                            .ok()
                    }),
                })
            },
        )
        .optional()
        .map_err(|e| ChannelError::Database(e.to_string()))
    }

    fn record_expected_size_if_unset(
        &self,
        channel: &str,
        guid: &str,
        bytes: u64,
    ) -> Result<bool, ChannelError> {
        let conn = self.conn.lock().unwrap();
        let changed = conn
            .execute(
                "INSERT INTO videos (channel, guid, expected_size) VALUES (?1, ?2, ?3)
                 ON CONFLICT(channel, guid) DO UPDATE SET expected_size = excluded.expected_size
                 WHERE videos.expected_size IS NULL",
                params![channel, guid, bytes as i64],
            )
            .map_err(|e| ChannelError::Database(e.to_string()))?;
        Ok(changed > 0)
    }

    fn set_expected_size(&self, channel: &str, guid: &str, bytes: u64) -> Result<(), ChannelError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO videos (channel, guid, expected_size) VALUES (?1, ?2, ?3)
             ON CONFLICT(channel, guid) DO UPDATE SET expected_size = excluded.expected_size",
            params![channel, guid, bytes as i64],
        )
        .map_err(|e| ChannelError::Database(e.to_string()))?;
        Ok(())
    }

    fn mark_completed(
        &self,
        channel: &str,
        guid: &str,
        released_at: DateTime<Utc>,
    ) -> Result<(), ChannelError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO videos (channel, guid, released_at_ms, completed_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(channel, guid) DO UPDATE SET
                released_at_ms = excluded.released_at_ms,
                completed_at = excluded.completed_at",
            params![
                channel,
                guid,
                released_at.timestamp_millis(),
                Utc::now().to_rfc3339()
            ],
        )
        .map_err(|e| ChannelError::Database(e.to_string()))?;
        Ok(())
    }
}

/// A channel whose video records live in a [`SqliteVideoDb`].
#[derive(Clone)]
pub struct DbChannel {
    title: String,
    db: Arc<SqliteVideoDb>,
}

impl Channel for DbChannel {
    fn title(&self) -> &str {
        &self.title
    }

    fn video_record(&self, guid: &str) -> Result<Option<VideoRecord>, ChannelError> {
        self.db.get(&self.title, guid)
    }

    fn record_expected_size_if_unset(&self, guid: &str, bytes: u64) -> Result<bool, ChannelError> {
        let stored = self
            .db
            .record_expected_size_if_unset(&self.title, guid, bytes)?;
        if stored {
            debug!(channel = %self.title, guid, bytes, "Recorded expected size");
        }
        Ok(stored)
    }

    fn set_expected_size(&self, guid: &str, bytes: u64) -> Result<(), ChannelError> {
        self.db.set_expected_size(&self.title, guid, bytes)
    }

    fn mark_completed(&self, guid: &str, released_at: DateTime<Utc>) -> Result<(), ChannelError> {
        self.db.mark_completed(&self.title, guid, released_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_channel(title: &str) -> DbChannel {
        Arc::new(SqliteVideoDb::in_memory().unwrap()).channel(title)
    }

    #[test]
    fn test_unknown_video_has_no_record() {
        let channel = create_test_channel("Linus");
        assert_eq!(channel.video_record("missing").unwrap(), None);
        assert_eq!(channel.expected_size("missing").unwrap(), None);
    }

    #[test]
    fn test_record_expected_size_only_once() {
        let channel = create_test_channel("Linus");
        assert!(channel.record_expected_size_if_unset("v1", 500).unwrap());
        assert!(!channel.record_expected_size_if_unset("v1", 900).unwrap());
        assert_eq!(channel.expected_size("v1").unwrap(), Some(500));
    }

    #[test]
    fn test_set_expected_size_overwrites() {
        let channel = create_test_channel("Linus");
        channel.record_expected_size_if_unset("v1", 500).unwrap();
        channel.set_expected_size("v1", 480).unwrap();
        assert_eq!(channel.expected_size("v1").unwrap(), Some(480));
    }

    #[test]
    fn test_mark_completed_keeps_expected_size() {
        let channel = create_test_channel("Linus");
        let released = Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap();
        channel.set_expected_size("v1", 1024).unwrap();
        channel.mark_completed("v1", released).unwrap();

        let record = channel.video_record("v1").unwrap().unwrap();
        assert_eq!(record.expected_size, Some(1024));
        assert_eq!(record.released_at, Some(released));
        assert!(record.completed_at.is_some());
    }

    #[test]
    fn test_channels_are_isolated() {
        let db = Arc::new(SqliteVideoDb::in_memory().unwrap());
        let first = db.channel("First");
        let second = db.channel("Second");

        first.set_expected_size("shared-guid", 10).unwrap();
        assert_eq!(second.expected_size("shared-guid").unwrap(), None);
        assert_eq!(first.title(), "First");
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("videos.db");
        {
            let db = Arc::new(SqliteVideoDb::new(&path).unwrap());
            db.channel("Linus").set_expected_size("v1", 42).unwrap();
        }
        let db = Arc::new(SqliteVideoDb::new(&path).unwrap());
        assert_eq!(db.channel("Linus").expected_size("v1").unwrap(), Some(42));
    }
}
