//! Multi-object tracking core for accident event detection
//!
//! Turns a noisy stream of per-frame detections into stable tracks: each
//! live track carries a constant-velocity Kalman estimate, detections are
//! associated to predicted boxes by globally optimal IoU matching, and a
//! tentative/confirmed/removed lifecycle decides when a track is real and
//! when it is gone.
//!
//! ```rust
//! use accitrack::{AccidentTracker, Bbox, Detection, TrackerConfig};
//!
//! let mut tracker = AccidentTracker::new(TrackerConfig::default());
//! let detections = vec![Detection::new(Bbox::new(10.0, 10.0, 50.0, 50.0), 0.9)];
//! let update = tracker.track(&detections);
//! assert_eq!(update.tracks.len(), 1);
//! ```

pub mod bbox;
pub mod hungarian;
pub mod kalman;
pub mod track;
pub mod tracker;

pub use bbox::{iou, ious, Bbox, Detection};
pub use hungarian::{AssignmentResult, HungarianSolver};
pub use track::Track;
pub use tracker::{AccidentTracker, FrameUpdate, TrackView, TrackerConfig};
