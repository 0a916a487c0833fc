//! Transcoder module for remuxing downloaded streams into their final container.
//!
//! Streams are never re-encoded: audio and video are copied verbatim while
//! container metadata is injected.
//!
//! # Example
//!
//! ```ignore
//! use floatsync_core::transcoder::{ContainerMetadata, FfmpegTranscoder, RemuxJob, Transcoder};
//!
//! let transcoder = FfmpegTranscoder::with_defaults();
//! transcoder.validate().await?;
//!
//! let job = RemuxJob {
//!     input_path: PathBuf::from("Linus/Intro.partial"),
//!     output_path: PathBuf::from("Linus/Intro.mp4"),
//!     metadata: ContainerMetadata {
//!         title: Some("Intro".to_string()),
//!         author: Some("Linus".to_string()),
//!         ..Default::default()
//!     },
//! };
//!
//! let result = transcoder.remux(job).await?;
//! println!("Remuxed {} bytes in {} ms", result.output_size_bytes, result.duration_ms);
//! ```

mod config;
mod error;
mod ffmpeg;
mod traits;
mod types;

pub use config::TranscoderConfig;
pub use error::TranscoderError;
pub use ffmpeg::FfmpegTranscoder;
pub use traits::Transcoder;
pub use types::{ContainerMetadata, RemuxJob, RemuxResult};
