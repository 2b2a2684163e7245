// Session state - Explicit container for everything the front end displays

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::ParameterKey;

/// Session state shared between the form and the timeline
pub type SharedSession = Arc<Mutex<SessionState>>;

/// State transitions the session accepts
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// Pick (or clear) the source video
    SelectFile(Option<VideoFile>),
    /// Raw text typed into one parameter field
    EditParameter { key: ParameterKey, raw: String },
    /// A submission left for the service
    SubmitStarted,
    SubmitSucceeded {
        result_url: String,
        segments: Vec<RemovedSegment>,
        source_duration: Option<f64>,
    },
    SubmitFailed { message: String },
}

/// Everything the front end shows for one user session
#[derive(Debug, Clone)]
pub struct SessionState {
    pub parameters: ProcessingParameters,
    pub file: Option<VideoFile>,
    pub upload: UploadState,
    /// Last successful result, possibly kept across a later failure
    pub result_url: Option<String>,
    /// Removed segments of the last successful result
    pub segments: Arc<[RemovedSegment]>,
    /// Source duration reported with the last successful result
    pub source_duration: Option<f64>,
    pub error: Option<String>,
    failure_policy: FailurePolicy,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(FailurePolicy::default())
    }
}

impl SessionState {
    pub fn new(failure_policy: FailurePolicy) -> Self {
        Self {
            parameters: ProcessingParameters::default(),
            file: None,
            upload: UploadState::Idle,
            result_url: None,
            segments: Arc::from(Vec::new()),
            source_duration: None,
            error: None,
            failure_policy,
        }
    }

    /// Wrap into a shareable handle
    pub fn shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// True while a submission is in flight; drives the disabled submit control
    pub fn is_loading(&self) -> bool {
        self.upload.is_in_flight()
    }

    /// Apply one action
    pub fn reduce(&mut self, action: SessionAction) -> Result<(), DomainError> {
        debug!(?action, state = %self.upload, "Reducing session action");
        match action {
            SessionAction::SelectFile(file) => {
                self.file = file;
            }
            SessionAction::EditParameter { key, raw } => {
                self.parameters.edit(key, &raw);
            }
            SessionAction::SubmitStarted => {
                if self.upload.is_in_flight() {
                    return Err(DomainError::Busy(
                        "A video is already being processed".to_string(),
                    ));
                }
                self.upload = UploadState::InFlight;
                self.error = None;
            }
            SessionAction::SubmitSucceeded {
                result_url,
                segments,
                source_duration,
            } => {
                self.upload = UploadState::Succeeded(result_url.clone());
                self.result_url = Some(result_url);
                self.segments = Arc::from(segments);
                self.source_duration = source_duration;
                self.error = None;
            }
            SessionAction::SubmitFailed { message } => {
                self.upload = UploadState::Failed(message.clone());
                self.error = Some(message);
                if self.failure_policy == FailurePolicy::Clear {
                    self.result_url = None;
                    self.segments = Arc::from(Vec::new());
                    self.source_duration = None;
                }
            }
        }
        Ok(())
    }
}

/// Lock a shared session, recovering the data if a holder panicked
pub fn lock_session(session: &SharedSession) -> MutexGuard<'_, SessionState> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}
