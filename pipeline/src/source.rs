//! Frame source collaborator boundary

use crate::error::Result;
use crate::types::Frame;

/// A sequential supplier of frames: a decoded video file, a live camera
/// stream, or a synthetic sequence in tests. `Ok(None)` signals end of
/// stream, which is normal termination rather than an error.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<Frame>>;

    /// Total frame count when the container knows it up front; `None` for
    /// live streams.
    fn total_frames(&self) -> Option<u64> {
        None
    }
}
