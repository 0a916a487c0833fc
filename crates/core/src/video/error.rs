//! Error types for the video lifecycle.

use std::path::PathBuf;
use thiserror::Error;

use crate::api::ApiError;
use crate::channel::ChannelError;
use crate::delivery::DeliveryError;
use crate::transcoder::TranscoderError;

/// Errors that can occur while downloading or finalizing a video.
///
/// Every variant is terminal for the affected video only.
#[derive(Debug, Error)]
pub enum VideoError {
    /// Download was requested for a video that is already complete.
    #[error("Video {guid} is already downloaded")]
    AlreadyDownloaded { guid: String },

    /// Delivery could not be resolved for an attachment.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// Finalize was requested before the partial files were complete.
    #[error("Video {guid} is not downloaded: observed {observed} bytes, expected {}", display_size(.expected))]
    NotDownloaded {
        guid: String,
        observed: u64,
        expected: Option<u64>,
    },

    /// The final containers do not add up to the expected size after muxing.
    #[error("Mux validation failed for {guid}: expected {} bytes, got {actual}", display_size(.expected))]
    MuxValidationFailed {
        guid: String,
        expected: Option<u64>,
        actual: u64,
    },

    /// The transcoder exited unsuccessfully.
    #[error("Transcode failed for {}: {reason}", .output.display())]
    TranscodeFailed {
        output: PathBuf,
        reason: String,
        stderr: Option<String>,
    },

    /// The post-processing command wrote to stderr or exited unsuccessfully.
    #[error("Post-processing command failed: {stderr}")]
    PostProcessCommandFailed { command: String, stderr: String },

    /// Remote API failure outside delivery resolution.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Channel video database failure.
    #[error(transparent)]
    Channel(#[from] ChannelError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A spawned transfer task panicked or was aborted.
    #[error("Transfer task failed: {0}")]
    TaskFailed(String),
}

fn display_size(size: &Option<u64>) -> String {
    size.map_or_else(|| "unknown".to_string(), |s| s.to_string())
}

impl From<TranscoderError> for VideoError {
    fn from(err: TranscoderError) -> Self {
        match err {
            TranscoderError::ConversionFailed {
                output,
                reason,
                stderr,
            } => Self::TranscodeFailed {
                output,
                reason,
                stderr,
            },
            other => Self::TranscodeFailed {
                output: PathBuf::new(),
                reason: other.to_string(),
                stderr: None,
            },
        }
    }
}

impl VideoError {
    /// Whether re-running the pipeline for this video may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api(e) => e.is_retryable(),
            Self::Delivery(DeliveryError::Api(e)) => e.is_retryable(),
            Self::Io(_) | Self::TaskFailed(_) | Self::NotDownloaded { .. } => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_downloaded_message_includes_sizes() {
        let err = VideoError::NotDownloaded {
            guid: "g1".to_string(),
            observed: 500,
            expected: None,
        };
        assert_eq!(
            err.to_string(),
            "Video g1 is not downloaded: observed 500 bytes, expected unknown"
        );
    }

    #[test]
    fn test_mux_validation_message_includes_sizes() {
        let err = VideoError::MuxValidationFailed {
            guid: "g1".to_string(),
            expected: Some(1000),
            actual: 990,
        };
        assert!(err.to_string().contains("expected 1000 bytes, got 990"));
    }

    #[test]
    fn test_transcoder_failure_keeps_stderr() {
        let err: VideoError = TranscoderError::conversion_failed(
            PathBuf::from("out.mp4"),
            "ffmpeg exited with code: Some(1)",
            Some("moov atom not found".to_string()),
        )
        .into();

        match err {
            VideoError::TranscodeFailed { output, stderr, .. } => {
                assert_eq!(output, PathBuf::from("out.mp4"));
                assert_eq!(stderr.as_deref(), Some("moov atom not found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_retryable() {
        assert!(!VideoError::AlreadyDownloaded {
            guid: "g".to_string()
        }
        .is_retryable());
        assert!(VideoError::TaskFailed("aborted".to_string()).is_retryable());
    }
}
