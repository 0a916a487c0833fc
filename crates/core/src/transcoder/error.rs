//! Error types for the transcoder module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while remuxing.
#[derive(Debug, Error)]
pub enum TranscoderError {
    /// FFmpeg binary not found.
    #[error("FFmpeg not found at path: {path}")]
    FfmpegNotFound { path: PathBuf },

    /// Input file not found.
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// FFmpeg ran but exited unsuccessfully.
    #[error("Remux to {output} failed: {reason}")]
    ConversionFailed {
        output: PathBuf,
        reason: String,
        stderr: Option<String>,
    },

    /// I/O error while spawning or waiting for ffmpeg.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TranscoderError {
    /// Creates a new conversion failed error with stderr output.
    pub fn conversion_failed(
        output: PathBuf,
        reason: impl Into<String>,
        stderr: Option<String>,
    ) -> Self {
        Self::ConversionFailed {
            output,
            reason: reason.into(),
            stderr,
        }
    }
}
