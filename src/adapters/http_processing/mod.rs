//! HTTP adapter for the processing service
//!
//! Speaks the service's multipart upload contract with `reqwest`.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use url::Url;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Error body sent with non-2xx answers
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// `reqwest`-based processing adapter
pub struct HttpProcessingAdapter {
    client: Client,
    endpoint: Url,
}

impl HttpProcessingAdapter {
    /// Create new adapter for the service at `base_url`
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("emptycut-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DomainError::InternalError(format!("Failed to build HTTP client: {}", e)))?;
        let endpoint = base_url.join(PROCESS_VIDEO_PATH).map_err(|e| {
            DomainError::ConfigFail(format!("Invalid service URL {}: {}", base_url, e))
        })?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn build_form(request: &UploadRequest) -> Result<Form, DomainError> {
        let bytes = tokio::fs::read(&request.file.path).await.map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to read {}: {}",
                request.file.path.display(),
                e
            ))
        })?;
        debug!(bytes = bytes.len(), file = %request.file.file_name, "Read upload payload");

        let part = Part::bytes(bytes)
            .file_name(request.file.file_name.clone())
            .mime_str(request.file.mime_type())
            .map_err(|e| DomainError::InternalError(format!("Invalid content type: {}", e)))?;

        let form = request
            .parameters
            .form_fields()
            .into_iter()
            .fold(Form::new().part("file", part), |form, (name, value)| {
                form.text(name, value)
            });
        Ok(form)
    }
}

/// Map a status code and body to the port's result
pub fn interpret_response(status: u16, body: &[u8]) -> Result<ProcessResponse, DomainError> {
    if (200..300).contains(&status) {
        return serde_json::from_slice(body)
            .map_err(|e| DomainError::InvalidResponse(format!("Unexpected response body: {}", e)));
    }
    Err(DomainError::Server {
        status,
        detail: error_detail(body),
    })
}

/// `detail` of an error body, when it is a plain string
pub fn error_detail(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    match parsed.detail? {
        serde_json::Value::String(detail) if !detail.is_empty() => Some(detail),
        _ => None,
    }
}

fn transport_error(e: reqwest::Error) -> DomainError {
    if e.is_timeout() {
        DomainError::Timeout(e.to_string())
    } else {
        DomainError::Transport(e.to_string())
    }
}

#[async_trait]
impl ProcessingPort for HttpProcessingAdapter {
    async fn process_video(&self, request: &UploadRequest) -> Result<ProcessResponse, DomainError> {
        let form = Self::build_form(request).await?;
        info!(endpoint = %self.endpoint, "Uploading video");

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;
        debug!(status = status.as_u16(), bytes = body.len(), "Processing service answered");

        interpret_response(status.as_u16(), &body)
    }

    async fn download(&self, url: &str, destination: &Path) -> Result<u64, DomainError> {
        let mut response = self.client.get(url).send().await.map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.map_err(transport_error)?;
            return Err(DomainError::Server {
                status: status.as_u16(),
                detail: error_detail(&body),
            });
        }

        match write_body(&mut response, destination).await {
            Ok(written) => Ok(written),
            Err(e) => {
                if let Err(remove_error) = tokio::fs::remove_file(destination).await {
                    debug!(
                        destination = %destination.display(),
                        "Could not remove partial download: {}", remove_error
                    );
                }
                Err(e)
            }
        }
    }
}

async fn write_body(response: &mut reqwest::Response, destination: &Path) -> Result<u64, DomainError> {
    let mut file = tokio::fs::File::create(destination).await.map_err(|e| {
        DomainError::FsFail(format!("Failed to create {}: {}", destination.display(), e))
    })?;
    let mut written = 0u64;
    while let Some(chunk) = response.chunk().await.map_err(transport_error)? {
        file.write_all(&chunk).await.map_err(|e| {
            DomainError::FsFail(format!("Failed to write {}: {}", destination.display(), e))
        })?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(|e| {
        DomainError::FsFail(format!("Failed to flush {}: {}", destination.display(), e))
    })?;
    Ok(written)
}
