//! Download orchestrator: one streaming transfer per attachment part.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::{ApiError, ContentApi, FetchRequest, TransferProgress};
use crate::delivery::{DeliveryResolver, ResolvedDelivery};
use crate::metadata::{stamp_mtime, EpisodeNfo};
use crate::naming::{VideoPaths, PARTIAL_EXTENSION};
use crate::video::{FsSizeLookup, Video, VideoError, VideoState};

use super::options::DownloadOptions;
use super::recorder::ExpectedSizeRecorder;

/// A running transfer of one attachment part.
#[derive(Debug)]
pub struct TransferHandle {
    pub attachment_id: String,
    pub index: usize,
    pub destination: PathBuf,
    pub delivery: ResolvedDelivery,
    progress: watch::Receiver<Option<TransferProgress>>,
    handle: JoinHandle<Result<u64, ApiError>>,
}

impl TransferHandle {
    /// Latest progress reported by the transfer.
    pub fn progress(&self) -> Option<TransferProgress> {
        *self.progress.borrow()
    }

    /// Whether the transfer task has finished.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the transfer and returns the bytes written.
    pub async fn join(self) -> Result<u64, VideoError> {
        match self.handle.await {
            Ok(result) => Ok(result?),
            Err(e) => Err(VideoError::TaskFailed(e.to_string())),
        }
    }
}

/// The transfers started for one video.
#[derive(Debug)]
pub struct InFlightDownload {
    pub guid: String,
    pub parts: Vec<TransferHandle>,
    /// Best-effort artwork fetch, if one was started.
    pub artwork: Option<JoinHandle<()>>,
}

impl InFlightDownload {
    /// Waits for every transfer.
    ///
    /// Every part is awaited even after a failure; the first failure is
    /// returned. Returns the total bytes written otherwise.
    pub async fn join(self) -> Result<u64, VideoError> {
        let mut total = 0u64;
        let mut first_error = None;

        for part in self.parts {
            let index = part.index;
            match part.join().await {
                Ok(bytes) => total += bytes,
                Err(e) => {
                    warn!(guid = %self.guid, part = index, "Transfer failed: {}", e);
                    first_error.get_or_insert(e);
                }
            }
        }

        if let Some(artwork) = self.artwork {
            let _ = artwork.await;
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(total),
        }
    }
}

/// Starts the transfers of a video into its `.partial` files.
pub struct Downloader<A: ContentApi + 'static> {
    api: Arc<A>,
    resolver: DeliveryResolver<A>,
    options: DownloadOptions,
}

impl<A: ContentApi + 'static> Downloader<A> {
    pub fn new(api: Arc<A>, options: DownloadOptions) -> Self {
        let resolver =
            DeliveryResolver::new(Arc::clone(&api)).with_edge_override(options.download_edge.clone());
        Self {
            api,
            resolver,
            options,
        }
    }

    /// Uses the given random source for edge selection.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.resolver = self.resolver.with_rng(rng);
        self
    }

    pub fn options(&self) -> &DownloadOptions {
        &self.options
    }

    /// Starts downloading a video.
    ///
    /// Fails with [`VideoError::AlreadyDownloaded`] without touching the disk
    /// when the video is already complete. Deliveries for every part are
    /// resolved before any part transfer is spawned.
    pub async fn start(&self, video: &Video) -> Result<InFlightDownload, VideoError> {
        let paths = video.paths(&self.options.file_path_formatting);
        let state = VideoState::observe(video, &paths, &FsSizeLookup)?;
        if state.is_downloaded(self.options.consider_all_non_partial_downloaded) {
            return Err(VideoError::AlreadyDownloaded {
                guid: video.guid().to_string(),
            });
        }

        info!(
            guid = video.guid(),
            title = video.title(),
            parts = video.part_count(),
            "Starting download"
        );

        tokio::fs::create_dir_all(paths.folder()).await?;

        let artwork = self.start_artwork(video, &paths);

        if self.options.save_nfo {
            self.write_nfo(video, &paths).await?;
        }

        let mut deliveries = Vec::with_capacity(video.part_count());
        for part in video.parts() {
            let delivery = self
                .resolver
                .resolve(&part.attachment_id, &self.options.quality)
                .await?;
            debug!(
                guid = video.guid(),
                part = part.index,
                edge = %delivery.edge,
                quality = %delivery.quality,
                "Resolved delivery"
            );
            deliveries.push((part, delivery));
        }

        let recorder = Arc::new(ExpectedSizeRecorder::new(
            Arc::clone(video.channel()),
            video.guid(),
            video.part_count(),
        ));

        let parts = deliveries
            .into_iter()
            .map(|(part, delivery)| {
                let destination = paths.part_file(part.index, PARTIAL_EXTENSION);
                let (progress, handle) = self.spawn_transfer(
                    FetchRequest::new(delivery.url.clone(), destination.clone()),
                    part.index,
                    Arc::clone(&recorder),
                );
                TransferHandle {
                    attachment_id: part.attachment_id,
                    index: part.index,
                    destination,
                    delivery,
                    progress,
                    handle,
                }
            })
            .collect();

        Ok(InFlightDownload {
            guid: video.guid().to_string(),
            parts,
            artwork,
        })
    }

    fn spawn_transfer(
        &self,
        request: FetchRequest,
        index: usize,
        recorder: Arc<ExpectedSizeRecorder>,
    ) -> (
        watch::Receiver<Option<TransferProgress>>,
        JoinHandle<Result<u64, ApiError>>,
    ) {
        let api = Arc::clone(&self.api);
        let (watch_tx, watch_rx) = watch::channel(None);

        let handle = tokio::spawn(async move {
            let (tx, mut rx) = mpsc::channel::<TransferProgress>(32);
            let fetch = api.fetch(request, Some(tx));
            let track = async {
                while let Some(progress) = rx.recv().await {
                    if let Some(total) = progress.total_bytes {
                        recorder.report(index, total);
                    }
                    let _ = watch_tx.send(Some(progress));
                }
            };
            let (result, ()) = tokio::join!(fetch, track);
            // No announced total: the completed transfer size stands in
            if let Ok(written) = &result {
                recorder.report(index, *written);
            }
            result
        });

        (watch_rx, handle)
    }

    fn start_artwork(&self, video: &Video, paths: &VideoPaths) -> Option<JoinHandle<()>> {
        if !self.options.download_artwork {
            return None;
        }
        let url = video.thumbnail()?.to_string();
        let destination = paths.artwork_file(&self.options.artwork_suffix);
        let api = Arc::clone(&self.api);
        let released = video.release_date();
        let guid = video.guid().to_string();

        Some(tokio::spawn(async move {
            if let Err(e) = fetch_artwork(api.as_ref(), url, destination, released).await {
                warn!(guid = %guid, "Failed to download artwork: {}", e);
            }
        }))
    }

    async fn write_nfo(&self, video: &Video, paths: &VideoPaths) -> Result<(), VideoError> {
        let nfo = EpisodeNfo::new(
            video.title(),
            video.channel().title(),
            video.description(),
            video.release_date(),
            &paths.file_stem(),
        );
        let nfo_path = paths.nfo_file();
        tokio::fs::write(&nfo_path, nfo.render()).await?;
        stamp_mtime(&nfo_path, video.release_date()).await?;
        debug!(guid = video.guid(), path = %nfo_path.display(), "Wrote nfo");
        Ok(())
    }
}

async fn fetch_artwork<A: ContentApi + ?Sized>(
    api: &A,
    url: String,
    destination: PathBuf,
    released: DateTime<Utc>,
) -> Result<(), VideoError> {
    api.fetch(FetchRequest::new(url, destination.clone()), None)
        .await?;
    stamp_mtime(&destination, released).await?;
    Ok(())
}
