use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

pub struct MseLoss;

impl MseLoss {
    /// Scalar MSE over every element: mean((predicted - expected)²)
    pub fn loss(predicted: &Matrix, expected: &Matrix) -> Result<f64> {
        if predicted.shape() != expected.shape() {
            return Err(Error::mismatch("mse", predicted.shape(), expected.shape()));
        }
        let count = (predicted.rows * predicted.cols) as f64;
        if count == 0.0 {
            return Ok(0.0);
        }
        let total: f64 = predicted.data.iter().flatten()
            .zip(expected.data.iter().flatten())
            .map(|(a, b)| (a - b).powi(2))
            .sum();
        Ok(total / count)
    }
}
