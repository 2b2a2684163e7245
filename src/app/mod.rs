// Application layer - Session state, interactors and presenters

pub mod container;
pub mod presenter;
pub mod session;
pub mod timeline;
pub mod upload_interactor;

// Re-export interactors
pub use presenter::{ResultPresenter, ResultView};
pub use session::{SessionAction, SessionState, SharedSession};
pub use timeline::{TimelineModel, TimelineOverlay};
pub use upload_interactor::UploadInteractor;
