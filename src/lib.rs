//! EmptyCut CLI Library
//!
//! Front end for a remote service that cuts the segments without people out
//! of a video: parameter form, upload orchestration, removed-segment timeline
//! and result presentation.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use adapters::ClientConfig;
pub use domain::errors::DomainError;
pub use domain::model::{ProcessingParameters, RemovedSegment, UploadState};
pub use error::{EmptyCutError, EmptyCutResult};
