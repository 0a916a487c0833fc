//! Trait definitions for the remote API client.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::error::ApiError;
use super::types::{DeliveryTicket, FetchRequest, TransferProgress};

/// Access to delivery tickets and content streams.
#[async_trait]
pub trait ContentApi: Send + Sync {
    /// Returns the name of this client implementation.
    fn name(&self) -> &str;

    /// Requests a download delivery ticket for an attachment.
    async fn delivery_ticket(&self, attachment_id: &str) -> Result<DeliveryTicket, ApiError>;

    /// Streams a URL into the request's destination file.
    ///
    /// Progress updates are sent while the transfer runs; a dropped receiver
    /// does not stop the transfer. Returns the number of bytes written.
    async fn fetch(
        &self,
        request: FetchRequest,
        progress_tx: Option<mpsc::Sender<TransferProgress>>,
    ) -> Result<u64, ApiError>;
}
