// Result presenter - Playable reference and download affordance for a result

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::domain::errors::*;
use crate::ports::*;
use crate::utils::format_file_size;

/// File name suggested for downloaded results
pub const SUGGESTED_FILENAME: &str = "result.mp4";

/// What gets shown once a result exists
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub media_url: String,
    pub download_url: String,
    pub suggested_filename: String,
}

impl ResultView {
    /// View for a resolved result URL; nothing to show without one
    pub fn present(result_url: Option<&str>) -> Option<Self> {
        let url = result_url.filter(|url| !url.is_empty())?;
        Some(Self {
            media_url: url.to_string(),
            download_url: url.to_string(),
            suggested_filename: SUGGESTED_FILENAME.to_string(),
        })
    }
}

/// Presenter with the download action behind the affordance
pub struct ResultPresenter {
    processing_port: Arc<dyn ProcessingPort>,
}

impl ResultPresenter {
    pub fn new(processing_port: Arc<dyn ProcessingPort>) -> Self {
        Self { processing_port }
    }

    /// Save the result as the suggested file name inside `directory`
    pub async fn download(&self, view: &ResultView, directory: &Path) -> Result<PathBuf, DomainError> {
        tokio::fs::create_dir_all(directory).await.map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to create download directory {}: {}",
                directory.display(),
                e
            ))
        })?;
        let destination = directory.join(&view.suggested_filename);
        let bytes = self
            .processing_port
            .download(&view.download_url, &destination)
            .await?;
        info!(
            destination = %destination.display(),
            size = %format_file_size(bytes),
            "Result downloaded"
        );
        Ok(destination)
    }
}
