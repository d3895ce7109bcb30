//! Error types for the accident event pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Failures that halt the frame loop. Per-item problems (a malformed
/// detection box) are handled locally by dropping the item and never
/// surface here; end of stream is a normal `Ok(None)` from the source,
/// not an error.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("detector failure: {0}")]
    Detector(String),

    #[error("frame source failure: {0}")]
    Source(String),
}

impl PipelineError {
    pub fn detector<S: Into<String>>(msg: S) -> Self {
        Self::Detector(msg.into())
    }

    pub fn source<S: Into<String>>(msg: S) -> Self {
        Self::Source(msg.into())
    }
}
