use log::debug;
use rand::Rng;

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Squared radius of the class boundary.
pub const RADIUS_SQUARED: f64 = 1.0;

/// Two-class points in the plane separated by the unit circle.
///
/// Inputs are `N × 2` standard normal draws; labels are an `N × 1` column of
/// `+1` (outside the circle) or `-1` (on or inside it).
#[derive(Debug, Clone, PartialEq)]
pub struct CircleDataset {
    pub inputs: Matrix,
    pub labels: Matrix,
}

impl CircleDataset {
    pub fn generate<R: Rng + ?Sized>(n_samples: usize, rng: &mut R) -> Result<CircleDataset> {
        if n_samples == 0 {
            return Err(Error::Configuration("n_samples must be at least 1".into()));
        }
        let inputs = Matrix::random_normal(n_samples, 2, rng);
        let labels = Matrix {
            rows: n_samples,
            cols: 1,
            data: inputs.data.iter().map(|p| vec![label_for(p[0], p[1])]).collect(),
        };

        let outside = labels.data.iter().filter(|l| l[0] > 0.0).count();
        debug!("generated {n_samples} samples, {outside} outside the circle");

        Ok(CircleDataset { inputs, labels })
    }

    pub fn len(&self) -> usize {
        self.inputs.rows
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.rows == 0
    }

    /// `((x_min, x_max), (y_min, y_max))` of the inputs, widened by `margin`.
    pub fn bounds(&self, margin: f64) -> ((f64, f64), (f64, f64)) {
        match self.inputs.column_bounds().as_deref() {
            Some([(x0, x1), (y0, y1)]) => ((x0 - margin, x1 + margin), (y0 - margin, y1 + margin)),
            _ => ((-margin, margin), (-margin, margin)),
        }
    }
}

pub fn label_for(x: f64, y: f64) -> f64 {
    if x * x + y * y > RADIUS_SQUARED { 1.0 } else { -1.0 }
}
