//! A single tracked accident hypothesis: constant-velocity Kalman state
//! plus lifecycle bookkeeping.

use crate::bbox::{Bbox, Detection};
use crate::kalman::{KalmanFilter, KalmanParams};
use anyhow::Result;
use nalgebra::{DMatrix, DVector};

/// Measurement noise diagonal: uncertainties of the observed
/// (cx, cy, area, aspect) values.
pub const MEASUREMENT_NOISE: [f32; 4] = [1.0, 1.0, 10.0, 10.0];

/// Process noise diagonal over the full
/// (cx, cy, area, aspect, vx, vy, v_area) state.
pub const PROCESS_NOISE: [f32; 7] = [1.0, 1.0, 1.0, 1.0, 0.01, 0.01, 0.0001];

/// One hypothesis of a physical accident followed across frames.
///
/// The state vector is [cx, cy, area, aspect, vx, vy, v_area]: constant
/// velocity on position and area, constant aspect ratio. A fresh track has
/// zero velocity with inflated velocity covariance, so its first prediction
/// is stationary until an update teaches it motion.
#[derive(Debug, Clone)]
pub struct Track {
    /// Identity assigned at spawn, unique for the run, never reused.
    pub id: u32,
    kf: KalmanFilter,
    /// Frames this track has existed (each predict is one step)
    pub age: u32,
    /// Total frames with a matching detection
    pub hits: u32,
    /// Consecutive frames with a matching detection
    pub hit_streak: u32,
    /// Consecutive frames predicted without a matching detection
    pub steps_since_update: u32,
    /// Sticky once set: the track stays confirmed through misses until expiry
    pub confirmed: bool,
    /// Confidence of the most recent matched detection
    pub score: f32,
}

impl Track {
    /// Spawn a track from an unmatched detection. Counts as the first hit.
    pub fn new(id: u32, detection: &Detection, meas_var: [f32; 4], proc_var: [f32; 7]) -> Self {
        let z = detection.bbox.to_z();
        let params = KalmanParams {
            x: DVector::from_vec(vec![z[0], z[1], z[2], z[3], 0.0, 0.0, 0.0]),
            p: DMatrix::from_diagonal(&DVector::from_vec(vec![
                10.0, 10.0, 10.0, 10.0, 10000.0, 10000.0, 10000.0,
            ])),
            f: DMatrix::from_row_slice(
                7,
                7,
                &[
                    1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, // cx' = cx + vx
                    0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, // cy' = cy + vy
                    0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, // area' = area + v_area
                    0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, // aspect' = aspect
                    0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, //
                    0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, //
                    0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, //
                ],
            ),
            h: DMatrix::from_row_slice(
                4,
                7,
                &[
                    1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, //
                    0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, //
                    0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, //
                    0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, //
                ],
            ),
            r: DMatrix::from_diagonal(&DVector::from_vec(meas_var.to_vec())),
            q: DMatrix::from_diagonal(&DVector::from_vec(proc_var.to_vec())),
        };

        Track {
            id,
            kf: KalmanFilter::new(params),
            age: 0,
            hits: 1,
            hit_streak: 1,
            steps_since_update: 0,
            confirmed: false,
            score: detection.score,
        }
    }

    /// Advance the motion state one frame and return the predicted box.
    /// Must be called exactly once per track per frame, before matching.
    /// Ages the track speculatively; a subsequent [`Track::update`] resets
    /// the age when the frame turns out to be a match.
    pub fn predict(&mut self) -> Bbox {
        // Keep the predicted area positive
        if self.kf.x[6] + self.kf.x[2] <= 0.0 {
            self.kf.x[6] = 0.0;
        }

        self.kf.predict();
        self.age += 1;

        // A miss breaks the streak only while the track is still tentative
        if self.steps_since_update > 0 && !self.confirmed {
            self.hit_streak = 0;
        }
        self.steps_since_update += 1;

        self.bbox()
    }

    /// Correct the motion state with the detection matched this frame.
    pub fn update(&mut self, detection: &Detection) -> Result<()> {
        if self.steps_since_update > 0 {
            self.hits += 1;
            self.hit_streak += 1;
        }
        self.steps_since_update = 0;
        self.score = detection.score;

        let z = detection.bbox.to_z();
        self.kf.update(DVector::from_vec(z.to_vec()))
    }

    /// Box implied by the current motion state.
    pub fn bbox(&self) -> Bbox {
        let state = self.kf.state();
        Bbox::from_z(&[state[0], state[1], state[2], state[3]])
    }
}
