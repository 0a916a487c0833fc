//! Mock transcoder for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::transcoder::{RemuxJob, RemuxResult, Transcoder, TranscoderError};

/// Mock implementation of the Transcoder trait.
///
/// A remux copies the input file to the output path byte for byte, so the
/// output size equals the input size.
///
/// # Example
///
/// ```rust,ignore
/// use floatsync_core::testing::MockTranscoder;
///
/// let transcoder = MockTranscoder::new();
/// transcoder.fail_outputs_containing("Part 2").await;
///
/// let jobs = transcoder.recorded_jobs().await;
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockTranscoder {
    /// Recorded remux jobs.
    jobs: Arc<RwLock<Vec<RemuxJob>>>,
    /// Remuxes to an output containing one of these fail.
    failing_fragments: Arc<RwLock<Vec<String>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<TranscoderError>>>,
    /// Report success without writing any output file.
    skip_output: Arc<RwLock<bool>>,
}

impl MockTranscoder {
    /// Create a new mock transcoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded jobs.
    pub async fn recorded_jobs(&self) -> Vec<RemuxJob> {
        self.jobs.read().await.clone()
    }

    /// Get the number of remuxes requested.
    pub async fn remux_count(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Make every remux to an output path containing `fragment` fail.
    pub async fn fail_outputs_containing(&self, fragment: &str) {
        self.failing_fragments
            .write()
            .await
            .push(fragment.to_string());
    }

    /// Make remuxes succeed without producing their output file.
    pub async fn skip_output_writes(&self) {
        *self.skip_output.write().await = true;
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: TranscoderError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl Transcoder for MockTranscoder {
    fn name(&self) -> &str {
        "mock"
    }

    async fn remux(&self, job: RemuxJob) -> Result<RemuxResult, TranscoderError> {
        self.jobs.write().await.push(job.clone());

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        let output = job.output_path.to_string_lossy().to_string();
        let failing = self
            .failing_fragments
            .read()
            .await
            .iter()
            .any(|fragment| output.contains(fragment.as_str()));
        if failing {
            return Err(TranscoderError::conversion_failed(
                job.output_path,
                "FFmpeg exited with code: Some(1)",
                Some("mock: invalid data found when processing input".to_string()),
            ));
        }

        if !tokio::fs::try_exists(&job.input_path).await.unwrap_or(false) {
            return Err(TranscoderError::InputNotFound {
                path: job.input_path,
            });
        }

        if *self.skip_output.read().await {
            return Ok(RemuxResult {
                output_path: job.output_path,
                output_size_bytes: 0,
                duration_ms: 0,
            });
        }

        let size = tokio::fs::copy(&job.input_path, &job.output_path).await?;

        Ok(RemuxResult {
            output_path: job.output_path,
            output_size_bytes: size,
            duration_ms: 0,
        })
    }

    async fn validate(&self) -> Result<(), TranscoderError> {
        Ok(())
    }
}
