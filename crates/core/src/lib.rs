pub mod api;
pub mod channel;
pub mod config;
pub mod delivery;
pub mod download;
pub mod finalize;
pub mod metadata;
pub mod naming;
pub mod pipeline;
pub mod testing;
pub mod transcoder;
pub mod video;

pub use api::{ApiError, ContentApi, FloatplaneClient};
pub use channel::{Channel, ChannelError, DbChannel, SqliteVideoDb, VideoRecord};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use delivery::{DeliveryError, DeliveryResolver, ResolvedDelivery};
pub use download::{DownloadOptions, Downloader, InFlightDownload};
pub use finalize::{FinalizeOptions, FinalizeReport, Finalizer, PostProcessHook};
pub use pipeline::{BatchSummary, ProcessOutcome, ProcessReport, VideoProcessor};
pub use transcoder::{FfmpegTranscoder, Transcoder, TranscoderConfig, TranscoderError};
pub use video::{Video, VideoError, VideoInfo, VideoState};
