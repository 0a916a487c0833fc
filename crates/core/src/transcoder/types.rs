//! Types for remux jobs.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Container metadata injected while remuxing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Channel title, written to the `author` tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Compact date, `YYYYMMDD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Plain text, written to both `description` and `synopsis`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ContainerMetadata {
    /// Convert to ffmpeg metadata arguments.
    pub fn to_ffmpeg_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(ref title) = self.title {
            args.extend(["-metadata".to_string(), format!("title={}", title)]);
        }
        if let Some(ref author) = self.author {
            args.extend(["-metadata".to_string(), format!("author={}", author)]);
        }
        if let Some(year) = self.year {
            args.extend(["-metadata".to_string(), format!("year={}", year)]);
        }
        if let Some(ref date) = self.date {
            args.extend(["-metadata".to_string(), format!("date={}", date)]);
        }
        if let Some(ref description) = self.description {
            args.extend([
                "-metadata".to_string(),
                format!("description={}", description),
                "-metadata".to_string(),
                format!("synopsis={}", description),
            ]);
        }

        args
    }
}

/// A stream-copy remux request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemuxJob {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub metadata: ContainerMetadata,
}

/// Result of a successful remux.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemuxResult {
    pub output_path: PathBuf,
    pub output_size_bytes: u64,
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_args() {
        let metadata = ContainerMetadata {
            title: Some("Build - Part 1".to_string()),
            author: Some("Linus".to_string()),
            year: Some(2023),
            date: Some("20230405".to_string()),
            description: Some("Plain text".to_string()),
        };

        assert_eq!(
            metadata.to_ffmpeg_args(),
            vec![
                "-metadata",
                "title=Build - Part 1",
                "-metadata",
                "author=Linus",
                "-metadata",
                "year=2023",
                "-metadata",
                "date=20230405",
                "-metadata",
                "description=Plain text",
                "-metadata",
                "synopsis=Plain text",
            ]
        );
    }

    #[test]
    fn test_empty_metadata_has_no_args() {
        assert!(ContainerMetadata::default().to_ffmpeg_args().is_empty());
    }
}
