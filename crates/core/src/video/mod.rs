//! Video model and its byte-count derived state.
//!
//! A [`Video`] is the remote metadata of one entry bound to the
//! [`Channel`](crate::channel::Channel) owning its persisted expected size.
//! [`VideoState`] judges completion purely from file sizes, so it can be
//! re-evaluated at any time without side effects.

mod error;
mod state;
mod types;

pub use error::VideoError;
pub use state::{FsSizeLookup, PartSizes, SizeLookup, VideoState};
pub use types::{AttachmentPart, Video, VideoInfo};
