//! Edge and quality selection for a delivery ticket.

use std::cmp::Reverse;
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::api::{ContentApi, DeliveryTicket, Edge, QualityLevel};

use super::error::DeliveryError;

/// A download URL resolved for one attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDelivery {
    pub url: String,
    pub edge: String,
    pub quality: String,
}

/// Picks one edge uniformly at random.
pub fn select_edge<'a, R: Rng + ?Sized>(edges: &'a [Edge], rng: &mut R) -> Option<&'a Edge> {
    edges.choose(rng)
}

/// Picks the requested quality if available, the highest one otherwise.
///
/// Names are ordered by their leading number, descending; names without one sort last.
pub fn select_quality<'a>(levels: &'a [QualityLevel], requested: &str) -> Option<&'a QualityLevel> {
    if let Some(level) = levels.iter().find(|level| level.name == requested) {
        return Some(level);
    }

    let mut sorted: Vec<&QualityLevel> = levels.iter().collect();
    sorted.sort_by_key(|level| Reverse(numeric_prefix(&level.name)));
    sorted.first().copied()
}

fn numeric_prefix(name: &str) -> u64 {
    let digits: String = name.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// Substitutes quality and token into the ticket's URI template.
pub fn build_url(edge_hostname: &str, ticket: &DeliveryTicket, quality: &str) -> String {
    let path = ticket
        .uri_template
        .replace("{qualityLevels}", quality)
        .replace("{token}", &ticket.token);
    format!("https://{}{}", edge_hostname, path)
}

/// Resolves download URLs through the remote API.
pub struct DeliveryResolver<A: ContentApi> {
    api: Arc<A>,
    edge_override: Option<String>,
    rng: Mutex<StdRng>,
}

impl<A: ContentApi> DeliveryResolver<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            edge_override: None,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Replaces whichever edge gets selected with a fixed hostname.
    pub fn with_edge_override(mut self, hostname: Option<String>) -> Self {
        self.edge_override = hostname;
        self
    }

    /// Uses the given random source for edge selection.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    /// Fetches a ticket for the attachment and builds its download URL.
    pub async fn resolve(
        &self,
        attachment_id: &str,
        requested_quality: &str,
    ) -> Result<ResolvedDelivery, DeliveryError> {
        let ticket = self.api.delivery_ticket(attachment_id).await?;
        self.resolve_ticket(attachment_id, &ticket, requested_quality)
    }

    fn resolve_ticket(
        &self,
        attachment_id: &str,
        ticket: &DeliveryTicket,
        requested_quality: &str,
    ) -> Result<ResolvedDelivery, DeliveryError> {
        let selected = {
            let mut rng = self.rng.lock().unwrap();
            select_edge(&ticket.edges, &mut *rng).cloned()
        };
        let edge = selected.ok_or_else(|| DeliveryError::NoEdgesAvailable {
            attachment_id: attachment_id.to_string(),
        })?;

        let edge = match &self.edge_override {
            Some(hostname) => hostname.clone(),
            None => edge.hostname,
        };

        let quality = select_quality(&ticket.quality_levels, requested_quality)
            .ok_or_else(|| DeliveryError::NoQualityLevels {
                attachment_id: attachment_id.to_string(),
            })?
            .name
            .clone();

        if quality != requested_quality {
            debug!(
                attachment_id,
                requested = requested_quality,
                selected = %quality,
                "Requested quality unavailable, using highest"
            );
        }

        Ok(ResolvedDelivery {
            url: build_url(&edge, ticket, &quality),
            edge,
            quality,
        })
    }
}
