//! Axis-aligned bounding boxes and IoU similarity

use ndarray::prelude::*;
use rayon::prelude::*;

/// Axis-aligned box in pixel coordinates. A well-formed box has finite
/// corners with `x1 < x2` and `y1 < y2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bbox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Bbox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn center_x(&self) -> f32 {
        (self.x1 + self.x2) / 2.0
    }

    pub fn center_y(&self) -> f32 {
        (self.y1 + self.y2) / 2.0
    }

    /// Finite corners in the right order with positive area.
    pub fn is_valid(&self) -> bool {
        [self.x1, self.y1, self.x2, self.y2]
            .iter()
            .all(|v| v.is_finite())
            && self.x2 > self.x1
            && self.y2 > self.y1
    }

    /// Convert to observation format [center_x, center_y, area, aspect_ratio]
    /// used by the Kalman filter state.
    pub fn to_z(&self) -> [f32; 4] {
        let w = self.width();
        let h = self.height();
        let aspect = if h != 0.0 { w / h } else { 1.0 };
        [self.center_x(), self.center_y(), w * h, aspect]
    }

    /// Inverse of [`Bbox::to_z`].
    pub fn from_z(z: &[f32; 4]) -> Self {
        let [cx, cy, area, aspect] = *z;
        let h = (area / aspect).sqrt();
        let w = aspect * h;

        Self {
            x1: cx - w / 2.0,
            y1: cy - h / 2.0,
            x2: cx + w / 2.0,
            y2: cy + h / 2.0,
        }
    }
}

/// One frame's raw observation: a box plus detector confidence.
/// Lives only for the frame it was produced in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub bbox: Bbox,
    pub score: f32,
}

impl Detection {
    pub fn new(bbox: Bbox, score: f32) -> Self {
        Self { bbox, score }
    }
}

/// Intersection-over-union of two boxes. Disjoint or degenerate
/// (non-positive-area) inputs yield 0 rather than an error.
pub fn iou(a: &Bbox, b: &Bbox) -> f32 {
    let x1 = a.x1.max(b.x1);
    let y1 = a.y1.max(b.y1);
    let x2 = a.x2.min(b.x2);
    let y2 = a.y2.min(b.y2);

    if x2 <= x1 || y2 <= y1 {
        return 0.0;
    }

    let intersection = (x2 - x1) * (y2 - y1);
    let union = a.area() + b.area() - intersection;

    if union > 0.0 {
        intersection / union
    } else {
        0.0
    }
}

/// Similarity matrix between predicted track boxes (rows) and detection
/// boxes (columns).
pub fn ious(tracks: &[Bbox], detections: &[Bbox]) -> Array2<f32> {
    if tracks.is_empty() || detections.is_empty() {
        return Array2::zeros((tracks.len(), detections.len()));
    }

    let data: Vec<f32> = tracks
        .par_iter()
        .flat_map_iter(|t| detections.iter().map(move |d| iou(t, d)))
        .collect();

    Array2::from_shape_vec((tracks.len(), detections.len()), data).unwrap()
}
