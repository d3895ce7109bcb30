//! Pipeline configuration

use accitrack::TrackerConfig;
use serde::{Deserialize, Serialize};

/// Tuning for one pipeline instance. Defaults mirror the production
/// deployment: tracks drop after 20 missed frames, confirm after 3
/// consecutive matches at IoU 0.3, and detections under 0.4 confidence are
/// discarded before tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Consecutive missed frames before a track is dropped
    pub max_age: u32,
    /// Consecutive matched frames before a track is confirmed
    pub min_hits: u32,
    /// Minimum IoU for a track/detection match
    pub iou_threshold: f32,
    /// Minimum detector confidence to admit a detection
    pub confidence_floor: f32,
    /// Emit a progress notice every this many frames. `None` derives the
    /// cadence from the source length (every 10%), falling back to 100
    /// frames for unbounded streams.
    pub progress_interval: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_age: 20,
            min_hits: 3,
            iou_threshold: 0.3,
            confidence_floor: 0.4,
            progress_interval: None,
        }
    }
}

impl PipelineConfig {
    /// Tracker-side view of this configuration.
    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            max_age: self.max_age,
            min_hits: self.min_hits,
            iou_threshold: self.iou_threshold,
            ..TrackerConfig::default()
        }
    }

    /// Progress cadence for a source of known length.
    pub fn progress_cadence(&self, total_frames: Option<u64>) -> u64 {
        self.progress_interval
            .or_else(|| total_frames.map(|total| (total / 10).max(1)))
            .unwrap_or(100)
    }
}
