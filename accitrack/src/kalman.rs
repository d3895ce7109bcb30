//! Linear Kalman filter backing the per-track motion model

use anyhow::Result;
use nalgebra::{DMatrix, DVector};

/// Initial state and model matrices for a filter instance.
#[derive(Debug, Clone)]
pub struct KalmanParams {
    /// Initial state
    pub x: DVector<f32>,
    /// Initial state covariance
    pub p: DMatrix<f32>,
    /// State transition matrix
    pub f: DMatrix<f32>,
    /// Observation matrix
    pub h: DMatrix<f32>,
    /// Observation noise covariance
    pub r: DMatrix<f32>,
    /// Process noise covariance
    pub q: DMatrix<f32>,
}

/// Recursive predict/correct estimator. Dimensions are fixed by the
/// matrices handed in at construction.
#[derive(Debug, Clone)]
pub struct KalmanFilter {
    pub x: DVector<f32>,
    p: DMatrix<f32>,
    f: DMatrix<f32>,
    h: DMatrix<f32>,
    r: DMatrix<f32>,
    q: DMatrix<f32>,
}

impl KalmanFilter {
    pub fn new(params: KalmanParams) -> Self {
        Self {
            x: params.x,
            p: params.p,
            f: params.f,
            h: params.h,
            r: params.r,
            q: params.q,
        }
    }

    /// Advance the state one time step: x = F x, P = F P Fᵀ + Q.
    pub fn predict(&mut self) {
        self.x = &self.f * &self.x;
        self.p = &self.f * &self.p * self.f.transpose() + &self.q;
    }

    /// Correct the state toward an observation using the filter gain.
    pub fn update(&mut self, z: DVector<f32>) -> Result<()> {
        // Residual: y = z - H x
        let y = z - &self.h * &self.x;

        // Innovation covariance: S = H P Hᵀ + R
        let s = &self.h * &self.p * self.h.transpose() + &self.r;
        let s_inv = s
            .try_inverse()
            .ok_or_else(|| anyhow::anyhow!("innovation covariance is singular"))?;

        // Gain: K = P Hᵀ S⁻¹
        let k = &self.p * self.h.transpose() * s_inv;

        self.x = &self.x + &k * y;
        let i = DMatrix::identity(self.x.nrows(), self.x.nrows());
        self.p = (i - k * &self.h) * &self.p;

        Ok(())
    }

    pub fn state(&self) -> &DVector<f32> {
        &self.x
    }
}
