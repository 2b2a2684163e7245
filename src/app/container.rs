use std::sync::Arc;

use crate::adapters::{ClientConfig, FFprobeAdapter, HttpProcessingAdapter};
use crate::app::{
    presenter::ResultPresenter,
    session::{SessionState, SharedSession},
    upload_interactor::UploadInteractor,
};
use crate::domain::errors::DomainError;
use crate::ports::{ProbePort, ProcessingPort};

pub trait AppContainer: Send + Sync {
    fn upload_interactor(&self) -> Arc<UploadInteractor>;
    fn result_presenter(&self) -> Arc<ResultPresenter>;
    fn probe_port(&self) -> Arc<dyn ProbePort>;
    fn session(&self) -> SharedSession;
}

pub struct DefaultAppContainer {
    upload_interactor: Arc<UploadInteractor>,
    result_presenter: Arc<ResultPresenter>,
    probe_port: Arc<dyn ProbePort>,
    session: SharedSession,
}

impl DefaultAppContainer {
    pub fn new(config: &ClientConfig) -> Result<Self, DomainError> {
        let processing_port = Arc::new(HttpProcessingAdapter::new(&config.base_url, config.timeout)?);
        let probe_port = Arc::new(FFprobeAdapter::new());
        Ok(Self::with_ports(config, processing_port, probe_port))
    }

    /// Wire the application around explicit ports
    pub fn with_ports(
        config: &ClientConfig,
        processing_port: Arc<dyn ProcessingPort>,
        probe_port: Arc<dyn ProbePort>,
    ) -> Self {
        let upload_interactor = Arc::new(
            UploadInteractor::new(Arc::clone(&processing_port), config.base_url.clone())
                .with_timeout(config.timeout),
        );
        let result_presenter = Arc::new(ResultPresenter::new(processing_port));

        Self {
            upload_interactor,
            result_presenter,
            probe_port,
            session: SessionState::new(config.failure_policy).shared(),
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn upload_interactor(&self) -> Arc<UploadInteractor> {
        Arc::clone(&self.upload_interactor)
    }

    fn result_presenter(&self) -> Arc<ResultPresenter> {
        Arc::clone(&self.result_presenter)
    }

    fn probe_port(&self) -> Arc<dyn ProbePort> {
        Arc::clone(&self.probe_port)
    }

    fn session(&self) -> SharedSession {
        Arc::clone(&self.session)
    }
}
