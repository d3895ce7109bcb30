//! Accident event records and at-most-once reporting

use serde::Serialize;
use std::collections::HashSet;

/// Coarse severity label derived from detector confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Moderate,
    Severe,
}

impl Severity {
    pub fn from_confidence(confidence: f32) -> Self {
        if confidence >= 0.75 {
            Self::Severe
        } else if confidence >= 0.5 {
            Self::Moderate
        } else {
            Self::Minor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minor => "minor",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
        }
    }
}

/// One distinct accident, reported the frame its track first confirmed.
/// Immutable once created; retained for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EventRecord {
    /// Track identity the event belongs to
    pub id: u32,
    /// Frame on which the track confirmed
    pub frame_index: u64,
    /// Detection confidence at confirmation time
    pub confidence: f32,
}

impl EventRecord {
    pub fn severity(&self) -> Severity {
        Severity::from_confidence(self.confidence)
    }

    /// Confidence expressed as a percentage, the way downstream
    /// notifications carry it.
    pub fn severity_pct(&self) -> f32 {
        self.confidence * 100.0
    }
}

/// Periodic progress snapshot for collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progress {
    pub frames_processed: u64,
    /// `None` when the source cannot know (live streams)
    pub total_frames: Option<u64>,
    pub event_count: usize,
}

/// Remembers which track identities were already reported so each physical
/// accident is counted exactly once, no matter how long its track lives.
#[derive(Debug, Default)]
pub struct EventLog {
    reported: HashSet<u32>,
    records: Vec<EventRecord>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a record the first time an identity confirms; every later call
    /// for the same identity returns `None`.
    pub fn report_if_new(&mut self, id: u32, frame_index: u64, confidence: f32) -> Option<EventRecord> {
        if !self.reported.insert(id) {
            return None;
        }
        let record = EventRecord {
            id,
            frame_index,
            confidence,
        };
        self.records.push(record);
        Some(record)
    }

    /// Number of distinct accidents reported so far.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn each_identity_is_reported_once() {
        let mut log = EventLog::new();
        let record = log.report_if_new(1, 3, 0.9).unwrap();
        assert_eq!(record.id, 1);
        assert_eq!(record.frame_index, 3);

        for frame in 4..30 {
            assert!(log.report_if_new(1, frame, 0.9).is_none());
        }
        assert_eq!(log.count(), 1);

        assert!(log.report_if_new(2, 31, 0.6).is_some());
        assert_eq!(log.count(), 2);
    }

    #[test]
    fn severity_bands() {
        assert_eq!(Severity::from_confidence(0.95), Severity::Severe);
        assert_eq!(Severity::from_confidence(0.75), Severity::Severe);
        assert_eq!(Severity::from_confidence(0.6), Severity::Moderate);
        assert_eq!(Severity::from_confidence(0.4), Severity::Minor);
    }

    #[test]
    fn record_serializes_for_notification() {
        let record = EventRecord {
            id: 7,
            frame_index: 42,
            confidence: 0.8,
        };
        let json = serde_json::to_value(record).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["frame_index"], 42);
        assert_eq!(record.severity(), Severity::Severe);
        assert_abs_diff_eq!(record.severity_pct(), 80.0, epsilon = 1e-4);
    }
}
