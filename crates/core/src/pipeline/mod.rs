//! Batch processing of videos.
//!
//! The core lifecycle has no scheduler of its own. [`VideoProcessor`] is the
//! caller-side runner: for each video it skips muxed ones, downloads when the
//! partial files are incomplete, awaits the transfers, finalizes and runs the
//! post-processing hook, bounding how many videos are in flight with a
//! semaphore.

mod processor;
mod types;

pub use processor::VideoProcessor;
pub use types::{BatchSummary, ProcessOutcome, ProcessReport, ProcessStage};
