//! Types exchanged with the remote API.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A CDN host candidate for a delivery ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub hostname: String,
}

impl Edge {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
        }
    }
}

/// One available rendition of an attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityLevel {
    /// Name substituted into the URI template (e.g. "1080").
    pub name: String,
    /// Human readable label (e.g. "1080p").
    #[serde(default)]
    pub label: String,
}

impl QualityLevel {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
        }
    }
}

/// Short-lived credential and edge/quality metadata for fetching one attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryTicket {
    /// Candidate edges allowing downloads.
    pub edges: Vec<Edge>,
    pub token: String,
    /// Path template containing `{qualityLevels}` and `{token}`.
    pub uri_template: String,
    pub quality_levels: Vec<QualityLevel>,
}

/// A streaming fetch of a URL into a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub destination: PathBuf,
    /// Byte offset to resume from. `None` truncates the destination.
    pub range_start: Option<u64>,
}

impl FetchRequest {
    /// A fetch starting from byte 0.
    pub fn new(url: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            destination: destination.into(),
            range_start: None,
        }
    }
}

/// Progress of a running transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferProgress {
    /// Bytes written to the destination so far, including any resumed offset.
    pub transferred_bytes: u64,
    /// Total size of the destination once complete, when announced by the server.
    pub total_bytes: Option<u64>,
}
