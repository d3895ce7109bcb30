//! Detector collaborator boundary
//!
//! The pipeline treats the detector as an opaque box producing candidate
//! accident regions with confidence. Inference itself (model loading, GPU
//! placement, batching) lives behind this trait.

use crate::error::Result;
use crate::types::{Frame, RawDetection};

/// Common interface for per-frame accident detectors.
pub trait Detector: Send {
    /// Detect candidate accident regions in a single frame. A failure here
    /// halts the frame loop; the frame is treated as not processed and
    /// track state is left untouched.
    fn detect(&mut self, frame: &Frame) -> Result<Vec<RawDetection>>;

    /// Detector name for logging
    fn name(&self) -> &str;
}
