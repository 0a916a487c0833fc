//! Modification time stamping.

use chrono::{DateTime, Utc};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Sets the modification time of a file.
pub async fn stamp_mtime(path: &Path, at: DateTime<Utc>) -> io::Result<()> {
    let path: PathBuf = path.to_path_buf();
    let modified = SystemTime::from(at);
    tokio::task::spawn_blocking(move || {
        let file = std::fs::OpenOptions::new().write(true).open(&path)?;
        file.set_modified(modified)
    })
    .await
    .map_err(io::Error::other)?
}
