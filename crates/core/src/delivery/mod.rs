//! Delivery module resolving an attachment into a download URL.
//!
//! A fresh ticket is requested for every attachment on every download attempt.
//! One edge is picked at random among the candidates (load spreading across
//! downloads, there is no failover within one), optionally replaced by a fixed
//! operator-configured host, and the requested quality is used when available.

mod error;
mod resolver;

pub use error::DeliveryError;
pub use resolver::{build_url, select_edge, select_quality, DeliveryResolver, ResolvedDelivery};
