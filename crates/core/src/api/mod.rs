//! Remote API module: delivery tickets and content streams.
//!
//! [`ContentApi`] is the seam between the video lifecycle and the network.
//! [`FloatplaneClient`] implements it over HTTP; tests use
//! [`MockContentApi`](crate::testing::MockContentApi).

mod error;
mod floatplane;
mod traits;
mod types;

pub use error::ApiError;
pub use floatplane::FloatplaneClient;
pub use traits::ContentApi;
pub use types::{DeliveryTicket, Edge, FetchRequest, QualityLevel, TransferProgress};
