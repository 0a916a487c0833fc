//! FFmpeg-based transcoder implementation.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

use super::config::TranscoderConfig;
use super::error::TranscoderError;
use super::traits::Transcoder;
use super::types::{RemuxJob, RemuxResult};

/// FFmpeg-based transcoder implementation.
pub struct FfmpegTranscoder {
    config: TranscoderConfig,
}

impl FfmpegTranscoder {
    /// Creates a new FFmpeg transcoder with the given configuration.
    pub fn new(config: TranscoderConfig) -> Self {
        Self { config }
    }

    /// Creates a transcoder with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(TranscoderConfig::default())
    }

    /// Builds ffmpeg arguments for a stream-copy remux.
    fn build_remux_args(&self, input_path: &Path, output_path: &Path, metadata_args: &[String]) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(), // Overwrite output
            "-i".to_string(),
            input_path.to_string_lossy().to_string(),
        ];

        // Metadata
        args.extend(metadata_args.iter().cloned());

        // Copy streams verbatim
        args.extend([
            "-c:a".to_string(),
            "copy".to_string(),
            "-c:v".to_string(),
            "copy".to_string(),
        ]);

        // Log level
        args.extend([
            "-loglevel".to_string(),
            self.config.ffmpeg_log_level.clone(),
        ]);

        // Extra args
        args.extend(self.config.extra_ffmpeg_args.iter().cloned());

        // Output
        args.push(output_path.to_string_lossy().to_string());

        args
    }

    fn map_spawn_error(&self, e: std::io::Error) -> TranscoderError {
        if e.kind() == std::io::ErrorKind::NotFound {
            TranscoderError::FfmpegNotFound {
                path: self.config.ffmpeg_path.clone(),
            }
        } else {
            TranscoderError::Io(e)
        }
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn remux(&self, job: RemuxJob) -> Result<RemuxResult, TranscoderError> {
        let start = Instant::now();

        if !tokio::fs::try_exists(&job.input_path).await.unwrap_or(false) {
            return Err(TranscoderError::InputNotFound {
                path: job.input_path.clone(),
            });
        }

        let args = self.build_remux_args(
            &job.input_path,
            &job.output_path,
            &job.metadata.to_ffmpeg_args(),
        );
        debug!(ffmpeg = ?self.config.ffmpeg_path, ?args, "Running remux");

        // A dropped future kills the child, so a failing sibling part cancels this one
        let output = Command::new(&self.config.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| self.map_spawn_error(e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(TranscoderError::conversion_failed(
                job.output_path.clone(),
                format!("FFmpeg exited with code: {:?}", output.status.code()),
                if stderr.is_empty() { None } else { Some(stderr) },
            ));
        }

        // Verify output exists and get size
        let output_meta = tokio::fs::metadata(&job.output_path).await.map_err(|_| {
            TranscoderError::conversion_failed(
                job.output_path.clone(),
                "Output file not created",
                None,
            )
        })?;

        Ok(RemuxResult {
            output_path: job.output_path,
            output_size_bytes: output_meta.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn validate(&self) -> Result<(), TranscoderError> {
        let output = Command::new(&self.config.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.map_spawn_error(e))?;

        if !output.status.success() {
            return Err(TranscoderError::FfmpegNotFound {
                path: self.config.ffmpeg_path.clone(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcoder::ContainerMetadata;
    use std::path::PathBuf;

    #[test]
    fn test_build_remux_args_copies_streams() {
        let transcoder = FfmpegTranscoder::with_defaults();
        let metadata = ContainerMetadata {
            title: Some("Intro".to_string()),
            ..Default::default()
        };

        let args = transcoder.build_remux_args(
            Path::new("/videos/Intro.partial"),
            Path::new("/videos/Intro.mp4"),
            &metadata.to_ffmpeg_args(),
        );

        assert_eq!(&args[..3], &["-y", "-i", "/videos/Intro.partial"]);
        assert!(args.windows(2).any(|w| w == ["-metadata", "title=Intro"]));
        assert!(args.windows(2).any(|w| w == ["-c:a", "copy"]));
        assert!(args.windows(2).any(|w| w == ["-c:v", "copy"]));
        assert_eq!(args.last().unwrap(), "/videos/Intro.mp4");
        assert!(!args.iter().any(|a| a == "-crf" || a == "-b:v"));
    }

    #[test]
    fn test_build_remux_args_extra_args_before_output() {
        let config = TranscoderConfig {
            extra_ffmpeg_args: vec!["-movflags".to_string(), "+faststart".to_string()],
            ..Default::default()
        };
        let transcoder = FfmpegTranscoder::new(config);
        let args = transcoder.build_remux_args(Path::new("in"), Path::new("out.mp4"), &[]);

        let n = args.len();
        assert_eq!(&args[n - 3..], &["-movflags", "+faststart", "out.mp4"]);
    }

    #[tokio::test]
    async fn test_remux_missing_input() {
        let transcoder = FfmpegTranscoder::with_defaults();
        let job = RemuxJob {
            input_path: PathBuf::from("/nonexistent/in.partial"),
            output_path: PathBuf::from("/nonexistent/out.mp4"),
            metadata: ContainerMetadata::default(),
        };

        let err = transcoder.remux(job).await.unwrap_err();
        assert!(matches!(err, TranscoderError::InputNotFound { .. }));
    }

    #[tokio::test]
    async fn test_validate_missing_binary() {
        let transcoder = FfmpegTranscoder::new(TranscoderConfig::with_ffmpeg_path(
            PathBuf::from("/nonexistent/ffmpeg-binary"),
        ));
        let err = transcoder.validate().await.unwrap_err();
        assert!(matches!(err, TranscoderError::FfmpegNotFound { .. }));
    }
}
