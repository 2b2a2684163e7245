//! FFprobe adapter for media duration probing
//!
//! Runs the `ffprobe` binary found on `PATH`. A missing binary is not an
//! error: the duration is simply unknown.

use std::io::ErrorKind;
use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::domain::errors::*;
use crate::ports::*;

/// FFprobe-based probe adapter
pub struct FFprobeAdapter {
    program: String,
}

impl FFprobeAdapter {
    /// Create new FFprobe adapter
    pub fn new() -> Self {
        Self::with_program("ffprobe")
    }

    /// Use a specific ffprobe executable
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for FFprobeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse ffprobe's `format=duration` output
pub fn parse_duration_output(stdout: &str) -> Option<f64> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .and_then(|line| line.parse::<f64>().ok())
        .filter(|duration| duration.is_finite() && *duration > 0.0)
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    async fn probe_duration(&self, file_path: &Path) -> Result<Option<f64>, DomainError> {
        let output = Command::new(&self.program)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(file_path)
            .output()
            .await;

        let output = match output {
            Ok(output) => output,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(program = %self.program, "ffprobe not found; source duration unknown");
                return Ok(None);
            }
            Err(e) => {
                return Err(DomainError::ProbeFail(format!(
                    "Failed to run {}: {}",
                    self.program, e
                )))
            }
        };

        if !output.status.success() {
            return Err(DomainError::ProbeFail(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let duration = parse_duration_output(&String::from_utf8_lossy(&output.stdout));
        debug!(file = %file_path.display(), ?duration, "Probed source duration");
        Ok(duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_output() {
        assert_eq!(parse_duration_output("12.345000\n"), Some(12.345));
        assert_eq!(parse_duration_output("\n  7\n"), Some(7.0));
        assert_eq!(parse_duration_output("N/A\n"), None);
        assert_eq!(parse_duration_output("0.000000"), None);
        assert_eq!(parse_duration_output(""), None);
    }

    #[tokio::test]
    async fn test_missing_program_gives_unknown_duration() {
        let adapter = FFprobeAdapter::with_program("emptycut-no-such-ffprobe");
        let duration = adapter.probe_duration(Path::new("input.mp4")).await.unwrap();
        assert_eq!(duration, None);
    }
}
