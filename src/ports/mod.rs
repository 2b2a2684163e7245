// Ports - Interface definitions (contracts)

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::watch;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Path of the processing endpoint, relative to the service origin
pub const PROCESS_VIDEO_PATH: &str = "/process_video/";

/// Success body of `POST /process_video/`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProcessResponse {
    /// Path of the processed video, resolved against the service origin
    pub result_video: String,
    #[serde(default)]
    pub removed_segments: Vec<RemovedSegment>,
    /// Source duration as measured by the service
    #[serde(default)]
    pub duration: Option<f64>,
}

/// Port for the remote video-processing service
#[async_trait]
pub trait ProcessingPort: Send + Sync {
    /// Upload a video with its parameters and wait for the processed result
    async fn process_video(&self, request: &UploadRequest) -> Result<ProcessResponse, DomainError>;

    /// Fetch `url` into `destination`, returning the number of bytes written
    async fn download(&self, url: &str, destination: &Path) -> Result<u64, DomainError>;
}

/// Port for reading media metadata
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Duration in seconds, `None` when it cannot be determined
    async fn probe_duration(&self, file_path: &Path) -> Result<Option<f64>, DomainError>;
}

/// Port for a media source that reports its playback position
pub trait PlaybackPort: Send + Sync {
    /// Register a time-update listener
    fn subscribe(&self) -> PlaybackSubscription;

    /// Number of listeners currently registered
    fn listener_count(&self) -> usize;
}

/// A registered time-update listener.
///
/// The registration is released when the value is dropped.
#[derive(Debug)]
pub struct PlaybackSubscription {
    receiver: watch::Receiver<PlaybackPosition>,
    listeners: Arc<AtomicUsize>,
}

impl PlaybackSubscription {
    /// Register on a source's position channel
    pub fn register(
        receiver: watch::Receiver<PlaybackPosition>,
        listeners: Arc<AtomicUsize>,
    ) -> Self {
        listeners.fetch_add(1, Ordering::SeqCst);
        Self {
            receiver,
            listeners,
        }
    }

    /// Latest position published by the source
    pub fn current(&self) -> PlaybackPosition {
        *self.receiver.borrow()
    }

    /// Wait for the next time-update; `None` once the source is gone
    pub async fn changed(&mut self) -> Option<PlaybackPosition> {
        self.receiver.changed().await.ok()?;
        Some(*self.receiver.borrow_and_update())
    }
}

impl Drop for PlaybackSubscription {
    fn drop(&mut self) {
        self.listeners.fetch_sub(1, Ordering::SeqCst);
    }
}
