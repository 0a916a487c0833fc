//! Download orchestration.
//!
//! [`Downloader::start`] resolves a delivery for every attachment part and
//! spawns one streaming transfer per part into its `.partial` file. Artwork
//! and the `.nfo` sidecar are written alongside when enabled. The announced
//! sizes of the transfers are fed back into the channel as the expected size
//! when none is known yet.
//!
//! Transfers always restart from byte 0.

mod downloader;
mod options;
mod recorder;

pub use downloader::{Downloader, InFlightDownload, TransferHandle};
pub use options::DownloadOptions;
