// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Lower bound shared by both area ratios
pub const AREA_RATIO_MIN: f64 = 0.01;
/// Upper bound shared by both area ratios
pub const AREA_RATIO_MAX: f64 = 1.0;
/// Lower bound for the frame skip count
pub const SKIP_FRAMES_MIN: i64 = 1;
/// Upper bound for the frame skip count
pub const SKIP_FRAMES_MAX: i64 = 140;

pub const DEFAULT_MIN_AREA_RATIO: f64 = 0.01;
pub const DEFAULT_MAX_AREA_RATIO: f64 = 1.0;
pub const DEFAULT_SKIP_FRAMES: u32 = 10;

/// Processing parameters sent along with the video.
///
/// Every field stays inside its domain because all mutation goes through the
/// clamp rules in [`crate::domain::rules`]. Nothing relates `min_area_ratio`
/// to `max_area_ratio`; a minimum above the maximum is accepted as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcessingParameters {
    pub min_area_ratio: f64,
    pub max_area_ratio: f64,
    pub skip_frames: u32,
}

impl Default for ProcessingParameters {
    fn default() -> Self {
        Self {
            min_area_ratio: DEFAULT_MIN_AREA_RATIO,
            max_area_ratio: DEFAULT_MAX_AREA_RATIO,
            skip_frames: DEFAULT_SKIP_FRAMES,
        }
    }
}

impl ProcessingParameters {
    /// Multipart text fields, values rendered verbatim from the snapshot
    pub fn form_fields(&self) -> [(&'static str, String); 3] {
        [
            ("min_area_ratio", self.min_area_ratio.to_string()),
            ("max_area_ratio", self.max_area_ratio.to_string()),
            ("skip_frames", self.skip_frames.to_string()),
        ]
    }
}

/// A time interval of the source video the service found empty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RemovedSegment {
    pub start: f64,
    pub end: f64,
}

impl RemovedSegment {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Length in seconds (negative if the service sent end < start)
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    /// Parse `START,END` in seconds
    pub fn parse(spec: &str) -> Result<Self, DomainError> {
        let (start, end) = spec.split_once(',').ok_or_else(|| {
            DomainError::BadArgs(format!(
                "Invalid segment '{}'. Expected START,END in seconds",
                spec
            ))
        })?;
        let start = start
            .trim()
            .parse::<f64>()
            .map_err(|_| DomainError::BadArgs(format!("Invalid segment start: {}", start)))?;
        let end = end
            .trim()
            .parse::<f64>()
            .map_err(|_| DomainError::BadArgs(format!("Invalid segment end: {}", end)))?;
        Ok(Self::new(start, end))
    }
}

/// Where a submission currently stands
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum UploadState {
    #[default]
    Idle,
    InFlight,
    /// Absolute URL of the processed video
    Succeeded(String),
    /// Human-readable failure message
    Failed(String),
}

impl UploadState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, UploadState::InFlight)
    }

    pub fn failure_message(&self) -> Option<&str> {
        match self {
            UploadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

impl fmt::Display for UploadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadState::Idle => write!(f, "idle"),
            UploadState::InFlight => write!(f, "processing"),
            UploadState::Succeeded(url) => write!(f, "done: {}", url),
            UploadState::Failed(message) => write!(f, "failed: {}", message),
        }
    }
}

/// What a failed re-submission does to a previously successful result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Leave the previous result and segments visible next to the error
    #[default]
    Keep,
    /// Drop the previous result and segments
    Clear,
}

impl FailurePolicy {
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value.trim().to_lowercase().as_str() {
            "keep" => Ok(FailurePolicy::Keep),
            "clear" => Ok(FailurePolicy::Clear),
            _ => Err(DomainError::BadArgs(format!(
                "Invalid failure policy: {}. Valid policies: keep, clear",
                value
            ))),
        }
    }
}

/// A video picked by the user
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFile {
    pub path: PathBuf,
    pub file_name: String,
}

impl VideoFile {
    /// Select a file on disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(DomainError::FileNotFound(path.display().to_string()));
        }
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| DomainError::BadArgs(format!("No file name in {}", path.display())))?;
        Ok(Self {
            path: path.to_path_buf(),
            file_name,
        })
    }

    /// Content type announced for the upload part
    pub fn mime_type(&self) -> &'static str {
        let extension = self
            .path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "mp4" | "m4v" => "video/mp4",
            "mov" => "video/quicktime",
            "mkv" => "video/x-matroska",
            "webm" => "video/webm",
            "avi" => "video/x-msvideo",
            _ => "application/octet-stream",
        }
    }
}

/// Snapshot handed to the processing port
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub file: VideoFile,
    pub parameters: ProcessingParameters,
}

/// Playback position of a media source as seen by a listener
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackPosition {
    pub current_time: f64,
    /// `None` until the media has loaded
    pub duration: Option<f64>,
}

impl PlaybackPosition {
    pub fn new(current_time: f64, duration: Option<f64>) -> Self {
        Self {
            current_time,
            duration,
        }
    }

    /// Duration usable as a divisor
    pub fn known_duration(&self) -> Option<f64> {
        self.duration.filter(|d| d.is_finite() && *d > 0.0)
    }
}

#[cfg(test)]
mod tests;
