//! Frame and raw-detection types crossing the collaborator boundary

use accitrack::{Bbox, Detection};

/// Raw pixel buffer handed to the detector. Decoding happens upstream;
/// the pipeline only carries the bytes through.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl ImageData {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }
}

/// One frame pulled from a source. Indices are assigned by the source and
/// increase monotonically from 1.
#[derive(Debug, Clone)]
pub struct Frame {
    pub index: u64,
    pub image: ImageData,
}

/// Detector output before validation: corner coordinates plus confidence,
/// exactly as the model emitted them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawDetection {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub confidence: f32,
}

impl RawDetection {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32, confidence: f32) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            confidence,
        }
    }

    /// Admit the detection into the tracker's domain. `None` means the box
    /// is malformed (non-finite or inverted corners, out-of-range
    /// confidence) and must be dropped at this boundary, never matched.
    pub fn validate(&self) -> Option<Detection> {
        let bbox = Bbox::new(self.x1, self.y1, self.x2, self.y2);
        if bbox.is_valid() && self.confidence.is_finite() && (0.0..=1.0).contains(&self.confidence)
        {
            Some(Detection::new(bbox, self.confidence))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_detection_is_admitted() {
        let raw = RawDetection::new(10.0, 10.0, 50.0, 50.0, 0.9);
        let det = raw.validate().unwrap();
        assert_eq!(det.bbox, Bbox::new(10.0, 10.0, 50.0, 50.0));
        assert_eq!(det.score, 0.9);
    }

    #[test]
    fn malformed_detections_are_rejected() {
        assert!(RawDetection::new(50.0, 10.0, 10.0, 50.0, 0.9)
            .validate()
            .is_none()); // inverted x
        assert!(RawDetection::new(10.0, 50.0, 50.0, 10.0, 0.9)
            .validate()
            .is_none()); // inverted y
        assert!(RawDetection::new(f32::NAN, 10.0, 50.0, 50.0, 0.9)
            .validate()
            .is_none());
        assert!(RawDetection::new(10.0, 10.0, f32::INFINITY, 50.0, 0.9)
            .validate()
            .is_none());
        assert!(RawDetection::new(10.0, 10.0, 50.0, 50.0, f32::NAN)
            .validate()
            .is_none());
        assert!(RawDetection::new(10.0, 10.0, 50.0, 50.0, 1.5)
            .validate()
            .is_none());
    }
}
