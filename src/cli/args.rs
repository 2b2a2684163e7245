//! Command-line argument definitions

use std::path::PathBuf;

use clap::{Args, ValueEnum};

/// Output format for reports
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

/// Arguments for the process command
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Minimum object size as a share of the frame (0.01 - 1)
    #[arg(long, allow_hyphen_values = true)]
    pub min_area: Option<String>,

    /// Maximum object size as a share of the frame (0.01 - 1)
    #[arg(long, allow_hyphen_values = true)]
    pub max_area: Option<String>,

    /// Frames to skip between detections (1 - 140)
    #[arg(long, allow_hyphen_values = true)]
    pub skip_frames: Option<String>,

    /// Save the processed video into this directory
    #[arg(short, long)]
    pub download: Option<PathBuf>,

    /// Play the source timeline with a moving progress indicator
    #[arg(long)]
    pub play: bool,

    /// Playback speed for --play
    #[arg(long, default_value = "1.0", value_parser = parse_speed, allow_hyphen_values = true)]
    pub speed: f64,

    /// Timeline width in characters
    #[arg(long, default_value = "60")]
    pub width: usize,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Parse a playback speed, which must be a finite positive number
pub fn parse_speed(value: &str) -> Result<f64, String> {
    let speed: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if speed.is_finite() && speed > 0.0 {
        Ok(speed)
    } else {
        Err(format!("speed must be a positive number, got '{}'", value))
    }
}

/// Arguments for the timeline command
#[derive(Args, Debug)]
pub struct TimelineArgs {
    /// Source video duration in seconds
    #[arg(long)]
    pub duration: f64,

    /// Removed segment as START,END in seconds (repeatable)
    #[arg(short, long = "segment")]
    pub segments: Vec<String>,

    /// Playback position in seconds
    #[arg(short, long, default_value = "0")]
    pub position: f64,

    /// Timeline width in characters
    #[arg(long, default_value = "60")]
    pub width: usize,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_speed() {
        assert_eq!(parse_speed("1.5"), Ok(1.5));
        assert_eq!(parse_speed("0.25"), Ok(0.25));
        for bad in ["0", "-1", "NaN", "inf", "fast"] {
            assert!(parse_speed(bad).is_err(), "accepted {}", bad);
        }
    }
}
