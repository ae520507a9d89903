use serde::{Serialize, Deserialize};

use crate::math::matrix::Matrix;

/// Pre- and post-activation values of both layers from one forward pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardCache {
    /// `X·W1 + b1`
    pub z1: Matrix,
    /// `φ(z1)`
    pub a1: Matrix,
    /// `a1·W2 + b2`
    pub z2: Matrix,
    /// `φ(z2)`, the network output
    pub a2: Matrix,
}

impl ForwardCache {
    pub fn batch_size(&self) -> usize {
        self.a2.rows
    }
}

/// Gradients of the last backward pass, one per parameter and shaped like it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gradients {
    pub dw1: Matrix,
    pub db1: Matrix,
    pub dw2: Matrix,
    pub db2: Matrix,
}
