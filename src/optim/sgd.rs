use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Plain full-batch gradient descent: `p ← p − lr · g`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Checks that `grad` can be applied to `param` without touching either.
    pub fn check(&self, param: &Matrix, grad: &Matrix) -> Result<()> {
        if param.shape() != grad.shape() {
            return Err(Error::mismatch("sgd_step", param.shape(), grad.shape()));
        }
        Ok(())
    }

    /// Applies one update in place. Shapes must already agree (see `check`).
    pub fn step(&self, param: &mut Matrix, grad: &Matrix) {
        for (p_row, g_row) in param.data.iter_mut().zip(&grad.data) {
            for (p, g) in p_row.iter_mut().zip(g_row) {
                *p -= self.learning_rate * g;
            }
        }
    }
}
