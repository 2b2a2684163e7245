// Upload interactor - Orchestrates one submission to the processing service

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};
use url::Url;

use crate::app::session::{lock_session, SessionAction, SharedSession};
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;

/// Upper bound for one submission
pub const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Interactor for the upload use case
pub struct UploadInteractor {
    processing_port: Arc<dyn ProcessingPort>,
    base_url: Url,
    timeout: Duration,
}

impl UploadInteractor {
    /// Create new upload interactor with injected port
    pub fn new(processing_port: Arc<dyn ProcessingPort>, base_url: Url) -> Self {
        Self {
            processing_port,
            base_url,
            timeout: DEFAULT_UPLOAD_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Submit the session's selected file with a snapshot of its parameters.
    ///
    /// Resolves to `Idle` without touching the session when no file is
    /// selected. Fails with [`DomainError::Busy`] when a submission is already
    /// in flight. Every other failure ends up in the returned state.
    pub async fn submit(&self, session: &SharedSession) -> Result<UploadState, DomainError> {
        let request = {
            let mut state = lock_session(session);
            let Some(file) = state.file.clone() else {
                info!("Submit ignored: no file selected");
                return Ok(UploadState::Idle);
            };
            state.reduce(SessionAction::SubmitStarted)?;
            UploadRequest {
                file,
                parameters: state.parameters,
            }
        };

        info!(
            file = %request.file.path.display(),
            min_area_ratio = request.parameters.min_area_ratio,
            max_area_ratio = request.parameters.max_area_ratio,
            skip_frames = request.parameters.skip_frames,
            "Submitting video for processing"
        );

        let action = match self.run(&request).await {
            Ok((result_url, response)) => {
                info!(
                    %result_url,
                    removed = response.removed_segments.len(),
                    "Processing succeeded"
                );
                SessionAction::SubmitSucceeded {
                    result_url: result_url.to_string(),
                    segments: response.removed_segments,
                    source_duration: response.duration,
                }
            }
            Err(e) => {
                error!("Processing failed: {}", e);
                SessionAction::SubmitFailed {
                    message: failure_message(&e),
                }
            }
        };

        let mut state = lock_session(session);
        state.reduce(action)?;
        Ok(state.upload.clone())
    }

    async fn run(&self, request: &UploadRequest) -> Result<(Url, ProcessResponse), DomainError> {
        let response = tokio::time::timeout(self.timeout, self.processing_port.process_video(request))
            .await
            .map_err(|_| {
                warn!(timeout = ?self.timeout, "Processing request timed out");
                DomainError::Timeout(format!("No answer within {:?}", self.timeout))
            })??;
        let result_url = resolve_result_location(&self.base_url, &response.result_video)?;
        Ok((result_url, response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::session::SessionState;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    /// Processing port returning a canned answer and recording calls
    struct FakeProcessingPort {
        answer: Result<ProcessResponse, DomainError>,
        calls: Mutex<Vec<UploadRequest>>,
        gate: Option<Arc<Notify>>,
    }

    impl FakeProcessingPort {
        fn answering(answer: Result<ProcessResponse, DomainError>) -> Self {
            Self {
                answer,
                calls: Mutex::new(Vec::new()),
                gate: None,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ProcessingPort for FakeProcessingPort {
        async fn process_video(&self, request: &UploadRequest) -> Result<ProcessResponse, DomainError> {
            self.calls.lock().unwrap().push(request.clone());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.answer.clone()
        }

        async fn download(&self, _url: &str, _destination: &Path) -> Result<u64, DomainError> {
            Ok(0)
        }
    }

    fn base() -> Url {
        Url::parse("http://localhost:8000").unwrap()
    }

    fn session_with_file(dir: &tempfile::TempDir) -> SharedSession {
        let path = dir.path().join("input.mp4");
        std::fs::write(&path, b"video bytes").unwrap();
        let mut state = SessionState::default();
        state
            .reduce(SessionAction::SelectFile(Some(VideoFile::from_path(&path).unwrap())))
            .unwrap();
        state.shared()
    }

    #[tokio::test]
    async fn test_submit_success() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_with_file(&dir);
        let port = Arc::new(FakeProcessingPort::answering(Ok(ProcessResponse {
            result_video: "/files/out.mp4".to_string(),
            removed_segments: vec![RemovedSegment::new(1.0, 2.0)],
            duration: Some(12.0),
        })));
        let interactor = UploadInteractor::new(port.clone(), base());

        let state = interactor.submit(&session).await.unwrap();

        assert_eq!(
            state,
            UploadState::Succeeded("http://localhost:8000/files/out.mp4".to_string())
        );
        let session = lock_session(&session);
        assert_eq!(&*session.segments, &[RemovedSegment::new(1.0, 2.0)]);
        assert_eq!(session.source_duration, Some(12.0));
        assert!(!session.is_loading());

        let calls = port.calls.lock().unwrap();
        assert_eq!(calls[0].parameters, ProcessingParameters::default());
        assert_eq!(calls[0].file.file_name, "input.mp4");
    }

    #[tokio::test]
    async fn test_submit_sends_parameters_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_with_file(&dir);
        {
            let mut state = lock_session(&session);
            state.parameters.edit(ParameterKey::MinAreaRatio, "0.9");
            state.parameters.edit(ParameterKey::MaxAreaRatio, "0.1");
            state.parameters.edit(ParameterKey::SkipFrames, "3");
        }
        let port = Arc::new(FakeProcessingPort::answering(Ok(ProcessResponse {
            result_video: "/download/result.mp4".to_string(),
            removed_segments: vec![],
            duration: None,
        })));
        let interactor = UploadInteractor::new(port.clone(), base());

        interactor.submit(&session).await.unwrap();

        let calls = port.calls.lock().unwrap();
        assert_eq!(
            calls[0].parameters,
            ProcessingParameters {
                min_area_ratio: 0.9,
                max_area_ratio: 0.1,
                skip_frames: 3,
            }
        );
    }

    #[tokio::test]
    async fn test_submit_server_error_detail() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_with_file(&dir);
        let port = Arc::new(FakeProcessingPort::answering(Err(DomainError::Server {
            status: 400,
            detail: Some("unsupported codec".to_string()),
        })));
        let interactor = UploadInteractor::new(port, base());

        let state = interactor.submit(&session).await.unwrap();

        assert_eq!(state, UploadState::Failed("unsupported codec".to_string()));
        assert_eq!(lock_session(&session).error.as_deref(), Some("unsupported codec"));
    }

    #[tokio::test]
    async fn test_submit_transport_failure_generic_message() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_with_file(&dir);
        let port = Arc::new(FakeProcessingPort::answering(Err(DomainError::Transport(
            "connection refused".to_string(),
        ))));
        let interactor = UploadInteractor::new(port, base());

        let state = interactor.submit(&session).await.unwrap();

        assert_eq!(state, UploadState::Failed(GENERIC_FAILURE_MESSAGE.to_string()));
    }

    #[tokio::test]
    async fn test_submit_without_file_is_noop() {
        let session = SessionState::default().shared();
        let port = Arc::new(FakeProcessingPort::answering(Err(DomainError::Transport(
            "unused".to_string(),
        ))));
        let interactor = UploadInteractor::new(port.clone(), base());

        let state = interactor.submit(&session).await.unwrap();

        assert_eq!(state, UploadState::Idle);
        assert_eq!(lock_session(&session).upload, UploadState::Idle);
        assert_eq!(port.call_count(), 0);
    }

    #[tokio::test]
    async fn test_submit_rejected_while_in_flight() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_with_file(&dir);
        let gate = Arc::new(Notify::new());
        let port = Arc::new(FakeProcessingPort {
            answer: Ok(ProcessResponse {
                result_video: "/download/result.mp4".to_string(),
                removed_segments: vec![],
                duration: None,
            }),
            calls: Mutex::new(Vec::new()),
            gate: Some(gate.clone()),
        });
        let interactor = Arc::new(UploadInteractor::new(port.clone(), base()));

        let first = {
            let interactor = interactor.clone();
            let session = session.clone();
            tokio::spawn(async move { interactor.submit(&session).await })
        };
        while port.call_count() == 0 {
            tokio::task::yield_now().await;
        }

        let second = interactor.submit(&session).await;
        assert!(matches!(second, Err(DomainError::Busy(_))));
        assert_eq!(port.call_count(), 1);

        gate.notify_one();
        let state = first.await.unwrap().unwrap();
        assert!(matches!(state, UploadState::Succeeded(_)));
    }

    #[tokio::test]
    async fn test_submit_times_out_and_leaves_in_flight() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_with_file(&dir);
        let port = Arc::new(FakeProcessingPort {
            answer: Err(DomainError::Transport("never".to_string())),
            calls: Mutex::new(Vec::new()),
            gate: Some(Arc::new(Notify::new())),
        });
        let interactor =
            UploadInteractor::new(port, base()).with_timeout(Duration::from_millis(20));

        let state = interactor.submit(&session).await.unwrap();

        assert_eq!(state, UploadState::Failed(GENERIC_FAILURE_MESSAGE.to_string()));
        assert!(!lock_session(&session).is_loading());
    }

    #[tokio::test]
    async fn test_submit_missing_result_location_fails() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_with_file(&dir);
        let port = Arc::new(FakeProcessingPort::answering(Ok(ProcessResponse {
            result_video: String::new(),
            removed_segments: vec![],
            duration: None,
        })));
        let interactor = UploadInteractor::new(port, base());

        let state = interactor.submit(&session).await.unwrap();

        assert_eq!(state, UploadState::Failed(GENERIC_FAILURE_MESSAGE.to_string()));
    }
}
