//! Types for batch processing results.

use serde::{Deserialize, Serialize};

/// Lifecycle step a video failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStage {
    Download,
    Finalize,
    PostProcess,
}

impl std::fmt::Display for ProcessStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Download => write!(f, "download"),
            Self::Finalize => write!(f, "finalize"),
            Self::PostProcess => write!(f, "post_process"),
        }
    }
}

/// What happened to one video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProcessOutcome {
    /// Final containers were already complete.
    AlreadyMuxed,
    /// Downloaded if needed, then muxed and recorded.
    Finalized {
        /// Bytes transferred in this run, 0 when the partials were already complete.
        downloaded_bytes: u64,
        muxed_bytes: u64,
        post_processed: bool,
    },
    Failed { stage: ProcessStage, error: String },
}

impl ProcessOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Outcome of one video in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessReport {
    pub guid: String,
    pub title: String,
    #[serde(flatten)]
    pub outcome: ProcessOutcome,
}

/// Counts over a batch of reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub already_muxed: usize,
    pub finalized: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_reports(reports: &[ProcessReport]) -> Self {
        reports
            .iter()
            .fold(Self::default(), |mut summary, report| {
                match report.outcome {
                    ProcessOutcome::AlreadyMuxed => summary.already_muxed += 1,
                    ProcessOutcome::Finalized { .. } => summary.finalized += 1,
                    ProcessOutcome::Failed { .. } => summary.failed += 1,
                }
                summary
            })
    }
}
