mod manifest;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use floatsync_core::{
    load_config, validate_config, BatchSummary, ContentApi, FfmpegTranscoder, FloatplaneClient,
    ProcessOutcome, SanitizedConfig, SqliteVideoDb, Transcoder, VideoProcessor,
};

use manifest::Manifest;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var("FLOATSYNC_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("floatsync.toml"));
    let manifest_path = std::env::var("FLOATSYNC_MANIFEST")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("manifest.json"));

    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    validate_config(&config).context("Configuration validation failed")?;

    let sanitized = SanitizedConfig::from(&config);
    info!(
        "Configuration loaded: {}",
        serde_json::to_string(&sanitized).unwrap_or_default()
    );

    let transcoder = Arc::new(FfmpegTranscoder::new(config.transcoder.clone()));
    transcoder
        .validate()
        .await
        .context("FFmpeg is not available")?;
    info!("Using transcoder: {}", transcoder.name());

    let api = Arc::new(
        FloatplaneClient::new(config.floatplane.clone()).context("Failed to create API client")?,
    );
    info!("Using API client: {}", api.name());

    let db = Arc::new(
        SqliteVideoDb::new(&config.database.path).context("Failed to open video database")?,
    );
    info!("Video database: {:?}", config.database.path);

    let videos = Manifest::load(&manifest_path)?.into_videos(&db);
    if videos.is_empty() {
        warn!("Manifest {:?} lists no videos", manifest_path);
        return Ok(());
    }

    let processor = VideoProcessor::new(api, transcoder, &config);
    let reports = processor.process_all(&videos).await;

    for report in &reports {
        match &report.outcome {
            ProcessOutcome::Failed { stage, error } => {
                warn!("{} ({}): {} failed: {}", report.title, report.guid, stage, error)
            }
            outcome => info!("{} ({}): {:?}", report.title, report.guid, outcome),
        }
    }

    let summary = BatchSummary::from_reports(&reports);
    info!(
        "Done: {} finalized, {} already muxed, {} failed",
        summary.finalized, summary.already_muxed, summary.failed
    );

    if summary.failed > 0 {
        anyhow::bail!("{} of {} videos failed", summary.failed, reports.len());
    }

    Ok(())
}
