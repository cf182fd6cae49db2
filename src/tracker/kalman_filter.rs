//! Constant-velocity Kalman filter over bounding boxes.
//!
//! The state is the 8-dim vector `(cx, cy, a, h, vx, vy, va, vh)`: box center,
//! aspect ratio, height and their velocities. Measurements are the first four
//! components. Noise is scaled by the current height so that uncertainty is
//! proportional to object size. Matrices are `ndarray` arrays; the innovation
//! solve goes through a `nalgebra` Cholesky factorisation.

use nalgebra::{Matrix4, SMatrix};
use ndarray::{Array1, Array2};

use crate::error::FilterError;

const NDIM: usize = 4;
const STATE_DIM: usize = 2 * NDIM;

/// Default weight of the position standard deviation relative to height.
pub const STD_WEIGHT_POSITION: f64 = 1.0 / 20.0;
/// Default weight of the velocity standard deviation relative to height.
pub const STD_WEIGHT_VELOCITY: f64 = 1.0 / 160.0;

#[derive(Debug, Clone)]
pub struct KalmanFilter {
    motion_mat: Array2<f64>,
    update_mat: Array2<f64>,
    std_weight_position: f64,
    std_weight_velocity: f64,
}

impl Default for KalmanFilter {
    fn default() -> Self {
        Self::new(STD_WEIGHT_POSITION, STD_WEIGHT_VELOCITY)
    }
}

impl KalmanFilter {
    pub fn new(std_weight_position: f64, std_weight_velocity: f64) -> Self {
        let mut update_mat = Array2::zeros((NDIM, STATE_DIM));
        for i in 0..NDIM {
            update_mat[[i, i]] = 1.0;
        }

        Self {
            motion_mat: motion_matrix(1.0),
            update_mat,
            std_weight_position,
            std_weight_velocity,
        }
    }

    /// Create a track state from an unassociated measurement. Velocities start
    /// at zero with a wide prior.
    pub fn initiate(&self, measurement: [f64; 4]) -> (Array1<f64>, Array2<f64>) {
        let mut mean = Array1::zeros(STATE_DIM);
        for i in 0..NDIM {
            mean[i] = measurement[i];
        }

        let h = measurement[3];
        let pos = 2.0 * self.std_weight_position * h;
        let vel = 10.0 * self.std_weight_velocity * h;
        let std = [pos, pos, 1e-2, pos, vel, vel, 1e-5, vel];

        (mean, diag_squared(&std))
    }

    /// Advance the state by one frame.
    pub fn predict(
        &self,
        mean: &Array1<f64>,
        covariance: &Array2<f64>,
    ) -> (Array1<f64>, Array2<f64>) {
        self.propagate(&self.motion_mat, mean, covariance)
    }

    /// Advance the state by `dt` frames in a single step.
    ///
    /// Under the constant-velocity model the mean after `predict_step(dt)` equals
    /// the mean after `dt` unit predictions; the process noise is added once.
    pub fn predict_step(
        &self,
        mean: &Array1<f64>,
        covariance: &Array2<f64>,
        dt: f64,
    ) -> (Array1<f64>, Array2<f64>) {
        self.propagate(&motion_matrix(dt), mean, covariance)
    }

    fn propagate(
        &self,
        motion_mat: &Array2<f64>,
        mean: &Array1<f64>,
        covariance: &Array2<f64>,
    ) -> (Array1<f64>, Array2<f64>) {
        let h = mean[3];
        let pos = self.std_weight_position * h;
        let vel = self.std_weight_velocity * h;
        let motion_cov = diag_squared(&[pos, pos, 1e-2, pos, vel, vel, 1e-5, vel]);

        let new_mean = motion_mat.dot(mean);
        let new_covariance = motion_mat.dot(covariance).dot(&motion_mat.t()) + motion_cov;

        (new_mean, new_covariance)
    }

    /// Project the state distribution into measurement space.
    pub fn project(
        &self,
        mean: &Array1<f64>,
        covariance: &Array2<f64>,
    ) -> (Array1<f64>, Array2<f64>) {
        let h = mean[3];
        let pos = self.std_weight_position * h;
        let innovation_cov = diag_squared(&[pos, pos, 1e-1, pos]);

        let mean_proj = self.update_mat.dot(mean);
        let covariance_proj =
            self.update_mat.dot(covariance).dot(&self.update_mat.t()) + innovation_cov;

        (mean_proj, covariance_proj)
    }

    /// Kalman correction step.
    ///
    /// Fails when the innovation covariance cannot be factorised or the corrected
    /// state is not finite; the caller decides what happens to the track.
    pub fn update(
        &self,
        mean: &Array1<f64>,
        covariance: &Array2<f64>,
        measurement: [f64; 4],
    ) -> Result<(Array1<f64>, Array2<f64>), FilterError> {
        let (projected_mean, projected_cov) = self.project(mean, covariance);

        let s = Matrix4::from_fn(|i, j| projected_cov[[i, j]]);
        let chol = s.cholesky().ok_or(FilterError::NotPositiveDefinite)?;

        // H is [I 0], so H * P is the first four rows of P and K^T = S^-1 * H * P.
        let hp = SMatrix::<f64, NDIM, STATE_DIM>::from_fn(|i, j| covariance[[i, j]]);
        let gain_t = chol.solve(&hp);
        let kalman_gain = Array2::from_shape_fn((STATE_DIM, NDIM), |(i, j)| gain_t[(j, i)]);

        let innovation = Array1::from_iter(measurement) - &projected_mean;

        let new_mean = mean + &kalman_gain.dot(&innovation);
        let corrected = covariance - &kalman_gain.dot(&projected_cov).dot(&kalman_gain.t());
        let new_covariance = (&corrected + &corrected.t()) * 0.5;

        if !is_finite(&new_mean, &new_covariance) {
            return Err(FilterError::NonFinite);
        }
        Ok((new_mean, new_covariance))
    }
}

/// True when neither the mean nor the covariance holds NaN or infinity.
pub fn is_finite(mean: &Array1<f64>, covariance: &Array2<f64>) -> bool {
    mean.iter().all(|v| v.is_finite()) && covariance.iter().all(|v| v.is_finite())
}

fn motion_matrix(dt: f64) -> Array2<f64> {
    let mut motion_mat = Array2::eye(STATE_DIM);
    for i in 0..NDIM {
        motion_mat[[i, NDIM + i]] = dt;
    }
    motion_mat
}

fn diag_squared(std: &[f64]) -> Array2<f64> {
    Array2::from_diag(&Array1::from_iter(std.iter().map(|s| s * s)))
}
