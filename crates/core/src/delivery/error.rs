//! Error types for the delivery module.

use thiserror::Error;

use crate::api::ApiError;

/// Errors that can occur resolving a download URL.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The delivery ticket carries no usable edge.
    #[error("No edges available for attachment {attachment_id}")]
    NoEdgesAvailable { attachment_id: String },

    /// The delivery ticket lists no quality level.
    #[error("No quality levels available for attachment {attachment_id}")]
    NoQualityLevels { attachment_id: String },

    /// Fetching the ticket failed.
    #[error("Failed to fetch delivery ticket: {0}")]
    Api(#[from] ApiError),
}
