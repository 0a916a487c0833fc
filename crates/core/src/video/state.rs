//! Download and mux state derived from bytes on disk.
//!
//! No state flag is ever persisted: a video is downloaded or muxed when the
//! sizes of its files add up to the expected size recorded by its channel.
//! This keeps state recoverable after a crash without any journal.

use std::path::{Path, PathBuf};

use crate::channel::ChannelError;
use crate::naming::VideoPaths;

use super::types::Video;

/// Looks up the size of a file.
pub trait SizeLookup {
    /// Size in bytes, or `None` when the file does not exist.
    fn file_size(&self, path: &Path) -> Option<u64>;
}

/// [`SizeLookup`] backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSizeLookup;

impl SizeLookup for FsSizeLookup {
    fn file_size(&self, path: &Path) -> Option<u64> {
        std::fs::metadata(path)
            .ok()
            .filter(|meta| meta.is_file())
            .map(|meta| meta.len())
    }
}

/// Observed sizes of one file per attachment part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartSizes {
    sizes: Vec<Option<u64>>,
}

impl PartSizes {
    pub fn new(sizes: Vec<Option<u64>>) -> Self {
        Self { sizes }
    }

    /// Looks up the size of every path.
    pub fn observe(paths: &[PathBuf], lookup: &dyn SizeLookup) -> Self {
        Self::new(paths.iter().map(|path| lookup.file_size(path)).collect())
    }

    pub fn sizes(&self) -> &[Option<u64>] {
        &self.sizes
    }

    /// Sum of the sizes, absent files counting as 0.
    pub fn total(&self) -> u64 {
        self.sizes.iter().flatten().sum()
    }

    /// Whether every file exists (possibly empty).
    pub fn all_present(&self) -> bool {
        !self.sizes.is_empty() && self.sizes.iter().all(Option::is_some)
    }

    /// Whether every file exists and the sizes add up to `expected`.
    pub fn matches(&self, expected: Option<u64>) -> bool {
        match expected {
            Some(expected) => self.all_present() && self.total() == expected,
            None => false,
        }
    }
}

/// Snapshot of everything completion is judged on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoState {
    pub muxed: PartSizes,
    pub partial: PartSizes,
    pub expected_size: Option<u64>,
}

impl VideoState {
    /// Observes the files of a video and its recorded expected size.
    pub fn observe(
        video: &Video,
        paths: &VideoPaths,
        lookup: &dyn SizeLookup,
    ) -> Result<Self, ChannelError> {
        Ok(Self {
            muxed: PartSizes::observe(&paths.muxed_files(), lookup),
            partial: PartSizes::observe(&paths.partial_files(), lookup),
            expected_size: video.channel().expected_size(video.guid())?,
        })
    }

    /// Whether the final containers are complete.
    ///
    /// With `consider_all_non_partial_downloaded`, any existing container counts
    /// regardless of its size.
    pub fn is_muxed(&self, consider_all_non_partial_downloaded: bool) -> bool {
        if consider_all_non_partial_downloaded {
            self.muxed.all_present()
        } else {
            self.muxed.matches(self.expected_size)
        }
    }

    /// Whether the video is muxed or its partial files are complete.
    pub fn is_downloaded(&self, consider_all_non_partial_downloaded: bool) -> bool {
        self.is_muxed(consider_all_non_partial_downloaded)
            || self.partial.matches(self.expected_size)
    }
}
