//! On-disk locations of a video and its artifacts.

use std::path::{Path, PathBuf};

use super::sanitize::sanitize_filename;
use super::template::{format_template, TemplateValues};

/// Extension of a part that is still downloading or waiting to be muxed.
pub const PARTIAL_EXTENSION: &str = "partial";

/// Extension of the final container.
pub const MUXED_EXTENSION: &str = "mp4";

/// Suffix distinguishing the parts of a multi-part video.
///
/// Empty when the video has a single part, `" - Part N"` (1-based) otherwise.
pub fn part_suffix(index: usize, part_count: usize) -> String {
    if part_count > 1 {
        format!(" - Part {}", index + 1)
    } else {
        String::new()
    }
}

/// Resolved locations for one video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoPaths {
    folder: PathBuf,
    file_path: PathBuf,
    part_count: usize,
}

impl VideoPaths {
    /// Resolves a naming template into folder and file path.
    ///
    /// The formatted template is split on `/`: every segment but the last makes up
    /// the folder, the sanitized last segment is the file stem.
    pub fn resolve(template: &str, values: &TemplateValues, part_count: usize) -> Self {
        Self::resolve_or(template, values, part_count, "")
    }

    /// Like [`VideoPaths::resolve`], but a stem that sanitizes to nothing
    /// (`CON`, `..`, only illegal characters) is replaced by `fallback_stem`.
    pub fn resolve_or(
        template: &str,
        values: &TemplateValues,
        part_count: usize,
        fallback_stem: &str,
    ) -> Self {
        let formatted = format_template(template, values);
        let (folder, stem) = match formatted.rsplit_once('/') {
            Some((folder, stem)) => (PathBuf::from(folder), stem),
            None => (PathBuf::new(), formatted.as_str()),
        };
        let mut stem = sanitize_filename(stem);
        if stem.is_empty() {
            stem = sanitize_filename(fallback_stem);
        }
        let file_path = folder.join(stem);

        Self {
            folder,
            file_path,
            part_count,
        }
    }

    /// Folder holding every file of the video.
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Folder plus sanitized stem, without any suffix or extension.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// The sanitized file stem.
    pub fn file_stem(&self) -> String {
        self.file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn part_count(&self) -> usize {
        self.part_count
    }

    pub fn part_suffix(&self, index: usize) -> String {
        part_suffix(index, self.part_count)
    }

    /// `file_path + part_suffix + "." + extension`
    pub fn part_file(&self, index: usize, extension: &str) -> PathBuf {
        self.with_suffix(&format!("{}.{}", self.part_suffix(index), extension))
    }

    /// One path per part, in attachment order.
    pub fn part_files(&self, extension: &str) -> Vec<PathBuf> {
        (0..self.part_count)
            .map(|index| self.part_file(index, extension))
            .collect()
    }

    pub fn partial_files(&self) -> Vec<PathBuf> {
        self.part_files(PARTIAL_EXTENSION)
    }

    pub fn muxed_files(&self) -> Vec<PathBuf> {
        self.part_files(MUXED_EXTENSION)
    }

    pub fn artwork_file(&self, artwork_suffix: &str) -> PathBuf {
        self.with_suffix(&format!("{artwork_suffix}.png"))
    }

    pub fn nfo_file(&self) -> PathBuf {
        self.with_suffix(".nfo")
    }

    // Appends to the raw path so dots inside the stem are never taken for an extension.
    fn with_suffix(&self, suffix: &str) -> PathBuf {
        let mut raw = self.file_path.clone().into_os_string();
        raw.push(suffix);
        PathBuf::from(raw)
    }
}
