//! Trait definitions for the transcoder module.

use async_trait::async_trait;

use super::error::TranscoderError;
use super::types::{RemuxJob, RemuxResult};

/// A transcoder that can copy streams into a new container.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Returns the name of this transcoder implementation.
    fn name(&self) -> &str;

    /// Copies audio and video streams verbatim into the output container,
    /// injecting the job's metadata.
    async fn remux(&self, job: RemuxJob) -> Result<RemuxResult, TranscoderError>;

    /// Validates that the transcoder is properly configured and ready.
    async fn validate(&self) -> Result<(), TranscoderError>;
}
