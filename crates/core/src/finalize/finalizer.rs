//! Remux, completion bookkeeping and cleanup of a downloaded video.

use futures::future::try_join_all;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::metadata::{container_metadata, stamp_mtime};
use crate::naming::{MUXED_EXTENSION, PARTIAL_EXTENSION};
use crate::transcoder::{RemuxJob, Transcoder};
use crate::video::{FsSizeLookup, PartSizes, Video, VideoError, VideoState};

/// Settings the finalizer reads from the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizeOptions {
    pub file_path_formatting: String,
    pub consider_all_non_partial_downloaded: bool,
}

impl FinalizeOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            file_path_formatting: config.file_path_formatting.clone(),
            consider_all_non_partial_downloaded: config.consider_all_non_partial_downloaded,
        }
    }
}

impl Default for FinalizeOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Outcome of a successful finalize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizeReport {
    pub muxed_files: Vec<PathBuf>,
    /// Summed size of the final containers, now the expected size.
    pub total_bytes: u64,
}

/// Turns complete `.partial` files into final containers.
pub struct Finalizer<T: Transcoder + ?Sized> {
    transcoder: Arc<T>,
    options: FinalizeOptions,
}

impl<T: Transcoder + ?Sized> Finalizer<T> {
    pub fn new(transcoder: Arc<T>, options: FinalizeOptions) -> Self {
        Self {
            transcoder,
            options,
        }
    }

    /// Finalizes a downloaded video.
    ///
    /// Every part is remuxed concurrently; the first failure drops the
    /// remaining remuxes. On success the channel records the summed container
    /// size as the expected size and marks the video completed, the `.partial`
    /// files are removed and the containers are stamped with the release date.
    pub async fn finalize(&self, video: &Video) -> Result<FinalizeReport, VideoError> {
        let paths = video.paths(&self.options.file_path_formatting);
        let flag = self.options.consider_all_non_partial_downloaded;

        let state = VideoState::observe(video, &paths, &FsSizeLookup)?;
        if !state.partial.all_present() || !state.is_downloaded(flag) {
            return Err(VideoError::NotDownloaded {
                guid: video.guid().to_string(),
                observed: state.partial.total(),
                expected: state.expected_size,
            });
        }

        info!(guid = video.guid(), parts = paths.part_count(), "Muxing video");

        let jobs = (0..paths.part_count()).map(|index| RemuxJob {
            input_path: paths.part_file(index, PARTIAL_EXTENSION),
            output_path: paths.part_file(index, MUXED_EXTENSION),
            metadata: container_metadata(video, index),
        });
        let results = try_join_all(jobs.map(|job| self.transcoder.remux(job))).await?;
        for result in &results {
            debug!(
                output = %result.output_path.display(),
                bytes = result.output_size_bytes,
                duration_ms = result.duration_ms,
                "Remuxed part"
            );
        }

        let muxed_files = paths.muxed_files();
        let muxed_bytes = PartSizes::observe(&muxed_files, &FsSizeLookup).total();
        video
            .channel()
            .set_expected_size(video.guid(), muxed_bytes)?;

        let state = VideoState::observe(video, &paths, &FsSizeLookup)?;
        if !state.is_muxed(flag) {
            return Err(VideoError::MuxValidationFailed {
                guid: video.guid().to_string(),
                expected: state.expected_size,
                actual: state.muxed.total(),
            });
        }

        video
            .channel()
            .mark_completed(video.guid(), video.release_date())?;

        for partial in paths.partial_files() {
            match tokio::fs::remove_file(&partial).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    warn!(path = %partial.display(), "Partial file already removed");
                }
                Err(e) => return Err(e.into()),
            }
        }

        for muxed in &muxed_files {
            stamp_mtime(muxed, video.release_date()).await?;
        }

        info!(guid = video.guid(), bytes = muxed_bytes, "Video finalized");

        Ok(FinalizeReport {
            muxed_files,
            total_bytes: muxed_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Channel;
    use crate::testing::{fixtures, MemoryChannel, MockTranscoder};
    use tempfile::TempDir;

    fn options(dir: &TempDir) -> FinalizeOptions {
        FinalizeOptions {
            file_path_formatting: format!("{}/%channelTitle%/%videoTitle%", dir.path().display()),
            consider_all_non_partial_downloaded: false,
        }
    }

    fn write_partial(dir: &TempDir, name: &str, bytes: usize) {
        std::fs::create_dir_all(dir.path().join("Linus")).unwrap();
        std::fs::write(dir.path().join("Linus").join(name), vec![0u8; bytes]).unwrap();
    }

    #[tokio::test]
    async fn test_finalize_single_part() {
        let dir = TempDir::new().unwrap();
        write_partial(&dir, "Intro.partial", 500);
        let channel = Arc::new(MemoryChannel::new("Linus"));
        channel.set_expected_size("g1", 500).unwrap();
        let video = Video::new(fixtures::video_info("g1", "Intro"), channel.clone());
        let transcoder = Arc::new(MockTranscoder::new());

        let report = Finalizer::new(transcoder.clone(), options(&dir))
            .finalize(&video)
            .await
            .unwrap();

        let muxed = dir.path().join("Linus/Intro.mp4");
        assert_eq!(report.muxed_files, vec![muxed.clone()]);
        assert_eq!(report.total_bytes, 500);
        assert!(!dir.path().join("Linus/Intro.partial").exists());
        assert!(channel.is_completed("g1"));
        assert_eq!(
            std::fs::metadata(&muxed).unwrap().modified().unwrap(),
            std::time::SystemTime::from(video.release_date())
        );

        let jobs = transcoder.recorded_jobs().await;
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].metadata.author.as_deref(), Some("Linus"));
    }

    #[tokio::test]
    async fn test_finalize_twice_fails_fast() {
        let dir = TempDir::new().unwrap();
        write_partial(&dir, "Intro.partial", 500);
        let channel = Arc::new(MemoryChannel::new("Linus"));
        channel.set_expected_size("g1", 500).unwrap();
        let video = Video::new(fixtures::video_info("g1", "Intro"), channel);
        let transcoder = Arc::new(MockTranscoder::new());
        let finalizer = Finalizer::new(transcoder.clone(), options(&dir));

        finalizer.finalize(&video).await.unwrap();
        let err = finalizer.finalize(&video).await.unwrap_err();

        assert!(matches!(err, VideoError::NotDownloaded { .. }));
        assert_eq!(transcoder.remux_count().await, 1);
    }

    #[tokio::test]
    async fn test_finalize_incomplete_partial() {
        let dir = TempDir::new().unwrap();
        write_partial(&dir, "Intro.partial", 300);
        let channel = Arc::new(MemoryChannel::new("Linus"));
        channel.set_expected_size("g1", 500).unwrap();
        let video = Video::new(fixtures::video_info("g1", "Intro"), channel);
        let transcoder = Arc::new(MockTranscoder::new());

        let err = Finalizer::new(transcoder.clone(), options(&dir))
            .finalize(&video)
            .await
            .unwrap_err();

        match err {
            VideoError::NotDownloaded {
                observed, expected, ..
            } => {
                assert_eq!(observed, 300);
                assert_eq!(expected, Some(500));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(transcoder.remux_count().await, 0);
    }

    #[tokio::test]
    async fn test_finalize_transcode_failure_keeps_partials() {
        let dir = TempDir::new().unwrap();
        write_partial(&dir, "Intro - Part 1.partial", 100);
        write_partial(&dir, "Intro - Part 2.partial", 200);
        let channel = Arc::new(MemoryChannel::new("Linus"));
        channel.set_expected_size("g1", 300).unwrap();
        let video = Video::new(fixtures::multipart_video_info("g1", "Intro", 2), channel.clone());
        let transcoder = Arc::new(MockTranscoder::new());
        transcoder.fail_outputs_containing("Part 2").await;

        let err = Finalizer::new(transcoder, options(&dir))
            .finalize(&video)
            .await
            .unwrap_err();

        match err {
            VideoError::TranscodeFailed { stderr, .. } => assert!(stderr.is_some()),
            other => panic!("unexpected error: {other}"),
        }
        assert!(dir.path().join("Linus/Intro - Part 1.partial").exists());
        assert!(dir.path().join("Linus/Intro - Part 2.partial").exists());
        assert!(!channel.is_completed("g1"));
        assert_eq!(channel.expected_size("g1").unwrap(), Some(300));
    }

    #[tokio::test]
    async fn test_finalize_missing_output_fails_validation() {
        let dir = TempDir::new().unwrap();
        write_partial(&dir, "Intro.partial", 500);
        let channel = Arc::new(MemoryChannel::new("Linus"));
        channel.set_expected_size("g1", 500).unwrap();
        let video = Video::new(fixtures::video_info("g1", "Intro"), channel.clone());
        let transcoder = Arc::new(MockTranscoder::new());
        transcoder.skip_output_writes().await;

        let err = Finalizer::new(transcoder.clone(), options(&dir))
            .finalize(&video)
            .await
            .unwrap_err();

        match err {
            VideoError::MuxValidationFailed { actual, .. } => assert_eq!(actual, 0),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(transcoder.remux_count().await, 1);
        assert!(!channel.is_completed("g1"));
        assert!(dir.path().join("Linus/Intro.partial").exists());
    }

    #[tokio::test]
    async fn test_finalize_multi_part_sums_sizes() {
        let dir = TempDir::new().unwrap();
        write_partial(&dir, "Intro - Part 1.partial", 100);
        write_partial(&dir, "Intro - Part 2.partial", 200);
        let channel = Arc::new(MemoryChannel::new("Linus"));
        channel.set_expected_size("g1", 300).unwrap();
        let video = Video::new(fixtures::multipart_video_info("g1", "Intro", 2), channel.clone());
        let transcoder = Arc::new(MockTranscoder::new());

        let report = Finalizer::new(transcoder.clone(), options(&dir))
            .finalize(&video)
            .await
            .unwrap();

        assert_eq!(report.total_bytes, 300);
        assert_eq!(report.muxed_files.len(), 2);
        assert_eq!(channel.expected_size("g1").unwrap(), Some(300));

        let mut titles: Vec<String> = transcoder
            .recorded_jobs()
            .await
            .into_iter()
            .filter_map(|job| job.metadata.title)
            .collect();
        titles.sort();
        assert_eq!(titles, vec!["Intro - Part 1", "Intro - Part 2"]);
    }
}
