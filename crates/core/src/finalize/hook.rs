//! Post-processing hook run once per finalized video.

use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use crate::naming::{format_template, TemplateValues};
use crate::video::{Video, VideoError};

/// A shell command template run after a video is finalized.
///
/// The template gets the same placeholders as the naming template. Values are
/// substituted verbatim, without shell quoting, and `%videoTitle%` comes from
/// the remote. Wrap placeholders in single quotes in the template
/// (`notify '%videoTitle%'`) so the shell does not expand `$(...)` or backticks
/// in a title. A title containing `'` still ends the quoted string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostProcessHook {
    command: String,
}

impl PostProcessHook {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Whether a command is configured.
    pub fn is_enabled(&self) -> bool {
        !self.command.trim().is_empty()
    }

    /// Runs the command for a video. Does nothing when no command is configured.
    pub async fn run(&self, video: &Video) -> Result<(), VideoError> {
        if !self.is_enabled() {
            return Ok(());
        }
        run_post_process(&self.command, &video.template_values()).await
    }
}

fn shell_command(command: &str) -> Command {
    let mut cmd = if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C");
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.arg("-c");
        cmd
    };
    cmd.arg(command);
    cmd
}

/// Substitutes the template and runs it once through the platform shell.
///
/// Any output on stderr is a failure, even with a zero exit status.
pub async fn run_post_process(template: &str, values: &TemplateValues) -> Result<(), VideoError> {
    let command = format_template(template, values);
    info!(command = %command, "Running post-processing command");

    let output = shell_command(&command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        debug!(command = %command, "Post-processing output: {}", stdout.trim());
    }

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if !stderr.is_empty() {
        return Err(VideoError::PostProcessCommandFailed { command, stderr });
    }

    if !output.status.success() {
        return Err(VideoError::PostProcessCommandFailed {
            stderr: format!("exited with code: {:?}", output.status.code()),
            command,
        });
    }

    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn values() -> TemplateValues {
        TemplateValues::new(
            "Linus",
            "Ep 1 - Intro",
            Utc.with_ymd_and_hms(2023, 4, 5, 6, 7, 8).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_substitutes_placeholders() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out.txt");
        let template = format!(
            "printf '%s' '%channelTitle%|%videoTitle%|%year%%month%' > {}",
            out.display()
        );

        run_post_process(&template, &values()).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "Linus|Ep 1 Intro|202304"
        );
    }

    #[tokio::test]
    async fn test_quoted_placeholder_is_not_expanded() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out.txt");
        let values = TemplateValues::new(
            "Linus",
            "$(echo expanded)",
            Utc.with_ymd_and_hms(2023, 4, 5, 6, 7, 8).unwrap(),
        );

        let quoted = format!("printf '%s' '%videoTitle%' > {}", out.display());
        run_post_process(&quoted, &values).await.unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "$(echo expanded)");

        let unquoted = format!("printf '%s' %videoTitle% > {}", out.display());
        run_post_process(&unquoted, &values).await.unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "expanded");
    }

    #[tokio::test]
    async fn test_stderr_is_failure_even_on_success_exit() {
        let err = run_post_process("echo oops >&2; exit 0", &values())
            .await
            .unwrap_err();
        match err {
            VideoError::PostProcessCommandFailed { stderr, .. } => assert_eq!(stderr, "oops"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_failure() {
        let err = run_post_process("exit 3", &values()).await.unwrap_err();
        assert!(matches!(err, VideoError::PostProcessCommandFailed { .. }));
    }

    #[tokio::test]
    async fn test_stdout_only_succeeds() {
        run_post_process("echo fine", &values()).await.unwrap();
    }

    #[test]
    fn test_blank_command_disables_hook() {
        assert!(!PostProcessHook::new("  ").is_enabled());
        assert!(PostProcessHook::new("echo").is_enabled());
    }
}
