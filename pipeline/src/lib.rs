//! Accident event pipeline
//!
//! Drives frames from a source through an external detector and the
//! `accitrack` tracker, deduplicates confirmed tracks into accident events,
//! and reports events plus progress to collaborators over a channel.
//!
//! Upload handling, authentication, byte-range serving and re-encoding are
//! collaborator concerns; this crate only owns the frame loop between the
//! [`FrameSource`] and [`Detector`] boundaries and the event stream going
//! out.

pub mod config;
pub mod detector;
pub mod driver;
pub mod error;
pub mod events;
pub mod source;
pub mod types;

pub use config::PipelineConfig;
pub use detector::Detector;
pub use driver::{AccidentPipeline, CancelHandle, Notice, RunSummary};
pub use error::{PipelineError, Result};
pub use events::{EventLog, EventRecord, Progress, Severity};
pub use source::FrameSource;
pub use types::{Frame, ImageData, RawDetection};
