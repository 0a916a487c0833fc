//! Batch runner driving videos through their whole lifecycle.

use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::api::ContentApi;
use crate::config::Config;
use crate::download::{DownloadOptions, Downloader};
use crate::finalize::{FinalizeOptions, Finalizer, PostProcessHook};
use crate::transcoder::Transcoder;
use crate::video::{FsSizeLookup, Video, VideoState};

use super::types::{ProcessOutcome, ProcessReport, ProcessStage};

/// Downloads, finalizes and post-processes videos with bounded concurrency.
pub struct VideoProcessor<A: ContentApi + 'static, T: Transcoder + ?Sized> {
    downloader: Downloader<A>,
    finalizer: Finalizer<T>,
    hook: PostProcessHook,
    semaphore: Arc<Semaphore>,
    max_concurrent: usize,
}

impl<A: ContentApi + 'static, T: Transcoder + ?Sized> VideoProcessor<A, T> {
    pub fn new(api: Arc<A>, transcoder: Arc<T>, config: &Config) -> Self {
        Self::with_parts(
            Downloader::new(api, DownloadOptions::from_config(config)),
            Finalizer::new(transcoder, FinalizeOptions::from_config(config)),
            PostProcessHook::new(config.post_processing_command.clone()),
            config.downloads.max_concurrent,
        )
    }

    /// Builds a processor from already configured stages.
    pub fn with_parts(
        downloader: Downloader<A>,
        finalizer: Finalizer<T>,
        hook: PostProcessHook,
        max_concurrent: usize,
    ) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            downloader,
            finalizer,
            hook,
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Processes every video, at most `max_concurrent` at a time.
    ///
    /// Reports come back in input order. A failure only affects its own video.
    pub async fn process_all(&self, videos: &[Video]) -> Vec<ProcessReport> {
        info!(
            videos = videos.len(),
            max_concurrent = self.max_concurrent,
            "Processing videos"
        );

        join_all(videos.iter().map(|video| async move {
            let outcome = match self.semaphore.acquire().await {
                Ok(_permit) => self.process(video).await,
                Err(e) => ProcessOutcome::Failed {
                    stage: ProcessStage::Download,
                    error: e.to_string(),
                },
            };
            ProcessReport {
                guid: video.guid().to_string(),
                title: video.title().to_string(),
                outcome,
            }
        }))
        .await
    }

    /// Runs the lifecycle of a single video.
    pub async fn process(&self, video: &Video) -> ProcessOutcome {
        let flag = self.downloader.options().consider_all_non_partial_downloaded;
        let paths = video.paths(&self.downloader.options().file_path_formatting);

        let state = match VideoState::observe(video, &paths, &FsSizeLookup) {
            Ok(state) => state,
            Err(e) => return failed(video, ProcessStage::Download, e),
        };

        if state.is_muxed(flag) {
            debug!(guid = video.guid(), "Already muxed, skipping");
            return ProcessOutcome::AlreadyMuxed;
        }

        let downloaded_bytes = if state.is_downloaded(flag) {
            debug!(guid = video.guid(), "Partial files complete, skipping download");
            0
        } else {
            let download = match self.downloader.start(video).await {
                Ok(download) => download,
                Err(e) => return failed(video, ProcessStage::Download, e),
            };
            match download.join().await {
                Ok(bytes) => bytes,
                Err(e) => return failed(video, ProcessStage::Download, e),
            }
        };

        let report = match self.finalizer.finalize(video).await {
            Ok(report) => report,
            Err(e) => return failed(video, ProcessStage::Finalize, e),
        };

        let post_processed = self.hook.is_enabled();
        if let Err(e) = self.hook.run(video).await {
            return failed(video, ProcessStage::PostProcess, e);
        }

        ProcessOutcome::Finalized {
            downloaded_bytes,
            muxed_bytes: report.total_bytes,
            post_processed,
        }
    }
}

fn failed(video: &Video, stage: ProcessStage, error: impl std::fmt::Display) -> ProcessOutcome {
    warn!(guid = video.guid(), %stage, "Video failed: {}", error);
    ProcessOutcome::Failed {
        stage,
        error: error.to_string(),
    }
}
