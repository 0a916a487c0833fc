//! HTTP client for the Floatplane API and its CDN edges.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{COOKIE, RANGE, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::fs::OpenOptions;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::FloatplaneConfig;

use super::error::ApiError;
use super::traits::ContentApi;
use super::types::{DeliveryTicket, Edge, FetchRequest, QualityLevel, TransferProgress};

const CLIENT_USER_AGENT: &str = concat!("floatsync/", env!("CARGO_PKG_VERSION"));

/// Floatplane API client.
pub struct FloatplaneClient {
    client: Client,
    config: FloatplaneConfig,
}

impl FloatplaneClient {
    /// Create a new client.
    ///
    /// Only the connect phase has a timeout: a transfer may legitimately run for hours.
    pub fn new(config: FloatplaneConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs as u64))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the base URL without trailing slash.
    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn authenticated(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.header(USER_AGENT, CLIENT_USER_AGENT);
        if self.config.auth_cookie.is_empty() {
            builder
        } else {
            builder.header(COOKIE, format!("sails.sid={}", self.config.auth_cookie))
        }
    }

    /// Parses a delivery response body into a ticket.
    ///
    /// Edges that do not allow downloads are dropped.
    fn parse_delivery(body: &str) -> Result<DeliveryTicket, ApiError> {
        #[derive(Deserialize)]
        struct DeliveryResponse {
            #[serde(default)]
            edges: Vec<EdgeResponse>,
            resource: ResourceResponse,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct EdgeResponse {
            hostname: String,
            #[serde(default = "default_true")]
            allow_download: bool,
        }

        #[derive(Deserialize)]
        struct ResourceResponse {
            uri: String,
            data: ResourceData,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct ResourceData {
            #[serde(default)]
            token: String,
            #[serde(default)]
            quality_levels: Vec<QualityLevel>,
        }

        fn default_true() -> bool {
            true
        }

        let response: DeliveryResponse = serde_json::from_str(body)
            .map_err(|e| ApiError::InvalidResponse(format!("delivery ticket: {}", e)))?;

        Ok(DeliveryTicket {
            edges: response
                .edges
                .into_iter()
                .filter(|edge| edge.allow_download)
                .map(|edge| Edge::new(edge.hostname))
                .collect(),
            token: response.resource.data.token,
            uri_template: response.resource.uri,
            quality_levels: response.resource.data.quality_levels,
        })
    }
}

#[async_trait]
impl ContentApi for FloatplaneClient {
    fn name(&self) -> &str {
        "floatplane"
    }

    async fn delivery_ticket(&self, attachment_id: &str) -> Result<DeliveryTicket, ApiError> {
        let url = format!("{}/api/v2/cdn/delivery", self.base_url());
        let response = self
            .authenticated(self.client.get(&url))
            .query(&[("type", "download"), ("guid", attachment_id)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let ticket = Self::parse_delivery(&body)?;
        debug!(
            attachment_id,
            edges = ticket.edges.len(),
            qualities = ticket.quality_levels.len(),
            "Received delivery ticket"
        );
        Ok(ticket)
    }

    async fn fetch(
        &self,
        request: FetchRequest,
        progress_tx: Option<mpsc::Sender<TransferProgress>>,
    ) -> Result<u64, ApiError> {
        let mut builder = self.authenticated(self.client.get(&request.url));
        if let Some(start) = request.range_start {
            builder = builder.header(RANGE, format!("bytes={}-", start));
        }

        let mut response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: request.url,
            });
        }

        // An edge ignoring the range replies 200 with the whole body
        let resumed_from = match request.range_start {
            Some(start) if status == StatusCode::PARTIAL_CONTENT => start,
            Some(_) => {
                warn!(url = %request.url, "Edge ignored range request, restarting from byte 0");
                0
            }
            None => 0,
        };
        let total_bytes = response.content_length().map(|len| len + resumed_from);

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(resumed_from > 0)
            .truncate(resumed_from == 0)
            .open(&request.destination)
            .await?;
        let mut writer = BufWriter::new(file);

        let mut transferred = resumed_from;
        if let Some(ref tx) = progress_tx {
            let _ = tx
                .send(TransferProgress {
                    transferred_bytes: transferred,
                    total_bytes,
                })
                .await;
        }

        while let Some(chunk) = response.chunk().await? {
            writer.write_all(&chunk).await?;
            transferred += chunk.len() as u64;

            if let Some(ref tx) = progress_tx {
                // Non-blocking send, a slow consumer only misses intermediate updates
                let _ = tx.try_send(TransferProgress {
                    transferred_bytes: transferred,
                    total_bytes,
                });
            }
        }
        writer.flush().await?;

        Ok(transferred - resumed_from)
    }
}
