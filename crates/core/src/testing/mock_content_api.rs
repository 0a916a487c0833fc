//! Mock content API for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use crate::api::{ApiError, ContentApi, DeliveryTicket, FetchRequest, TransferProgress};

/// Mock implementation of the ContentApi trait.
///
/// Provides controllable behavior for testing:
/// - Pre-configured delivery tickets per attachment
/// - Content bytes served per URL fragment, or a default body
/// - Recorded fetches for assertions
/// - Injected failures
///
/// # Example
///
/// ```rust,ignore
/// use floatsync_core::testing::MockContentApi;
///
/// let api = MockContentApi::new();
/// api.set_ticket("att1", ticket).await;
/// api.set_content("720.mp4", vec![0u8; 500]).await;
///
/// // Download...
///
/// let fetches = api.recorded_fetches().await;
/// assert_eq!(fetches.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockContentApi {
    /// Delivery tickets by attachment id.
    tickets: Arc<RwLock<HashMap<String, DeliveryTicket>>>,
    /// Response bodies keyed by a fragment the URL must contain.
    content: Arc<RwLock<Vec<(String, Vec<u8>)>>>,
    /// Body served when no fragment matches.
    default_content: Arc<RwLock<Vec<u8>>>,
    /// Fetches whose URL contains one of these fail with a 500.
    failing_fragments: Arc<RwLock<Vec<String>>>,
    /// Recorded fetch requests.
    fetches: Arc<RwLock<Vec<FetchRequest>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<ApiError>>>,
}

impl Default for MockContentApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockContentApi {
    /// Create a new mock API serving 1 KiB bodies.
    pub fn new() -> Self {
        Self {
            tickets: Arc::new(RwLock::new(HashMap::new())),
            content: Arc::new(RwLock::new(Vec::new())),
            default_content: Arc::new(RwLock::new(vec![0u8; 1024])),
            failing_fragments: Arc::new(RwLock::new(Vec::new())),
            fetches: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the delivery ticket returned for an attachment.
    pub async fn set_ticket(&self, attachment_id: &str, ticket: DeliveryTicket) {
        self.tickets
            .write()
            .await
            .insert(attachment_id.to_string(), ticket);
    }

    /// Serve `body` for every URL containing `fragment`.
    pub async fn set_content(&self, fragment: &str, body: Vec<u8>) {
        self.content.write().await.push((fragment.to_string(), body));
    }

    /// Set the body served when no fragment matches.
    pub async fn set_default_content(&self, body: Vec<u8>) {
        *self.default_content.write().await = body;
    }

    /// Make every fetch of a URL containing `fragment` fail.
    pub async fn fail_fetches_containing(&self, fragment: &str) {
        self.failing_fragments
            .write()
            .await
            .push(fragment.to_string());
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: ApiError) {
        *self.next_error.write().await = Some(error);
    }

    /// Get all recorded fetches.
    pub async fn recorded_fetches(&self) -> Vec<FetchRequest> {
        self.fetches.read().await.clone()
    }

    /// Get the number of fetches performed.
    pub async fn fetch_count(&self) -> usize {
        self.fetches.read().await.len()
    }

    async fn take_error(&self) -> Option<ApiError> {
        self.next_error.write().await.take()
    }

    async fn body_for(&self, url: &str) -> Vec<u8> {
        let content = self.content.read().await;
        match content.iter().find(|(fragment, _)| url.contains(fragment.as_str())) {
            Some((_, body)) => body.clone(),
            None => self.default_content.read().await.clone(),
        }
    }
}

#[async_trait]
impl ContentApi for MockContentApi {
    fn name(&self) -> &str {
        "mock"
    }

    async fn delivery_ticket(&self, attachment_id: &str) -> Result<DeliveryTicket, ApiError> {
        if let Some(error) = self.take_error().await {
            return Err(error);
        }

        self.tickets
            .read()
            .await
            .get(attachment_id)
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 404,
                url: format!("mock://delivery/{}", attachment_id),
            })
    }

    async fn fetch(
        &self,
        request: FetchRequest,
        progress_tx: Option<mpsc::Sender<TransferProgress>>,
    ) -> Result<u64, ApiError> {
        self.fetches.write().await.push(request.clone());

        if let Some(error) = self.take_error().await {
            return Err(error);
        }

        let failing = self
            .failing_fragments
            .read()
            .await
            .iter()
            .any(|fragment| request.url.contains(fragment.as_str()));
        if failing {
            return Err(ApiError::Status {
                status: 500,
                url: request.url,
            });
        }

        let body = self.body_for(&request.url).await;
        let total = body.len() as u64;

        if let Some(tx) = &progress_tx {
            let _ = tx
                .send(TransferProgress {
                    transferred_bytes: 0,
                    total_bytes: Some(total),
                })
                .await;
        }

        tokio::fs::write(&request.destination, &body).await?;

        if let Some(tx) = &progress_tx {
            let _ = tx
                .send(TransferProgress {
                    transferred_bytes: total,
                    total_bytes: Some(total),
                })
                .await;
        }

        Ok(total)
    }
}
