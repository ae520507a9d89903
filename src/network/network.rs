use log::trace;
use rand::Rng;

use crate::activation::activation::Activation;
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::network::cache::{ForwardCache, Gradients};
use crate::network::config::NetworkConfig;
use crate::optim::sgd::Sgd;

/// A fully connected network with one hidden layer, trained by full-batch
/// gradient descent.
///
/// Training is a strict alternation of `forward` and `backward` on the same
/// batch; `train_step` does both in one call. Between a `backward` and the
/// next `forward` the parameters, the cached activations and the last
/// gradients are all consistent and may be read through `&self`.
#[derive(Debug, Clone)]
pub struct TwoLayerNetwork {
    config: NetworkConfig,
    optimizer: Sgd,
    w1: Matrix,
    b1: Matrix,
    w2: Matrix,
    b2: Matrix,
    cache: Option<ForwardCache>,
    gradients: Option<Gradients>,
    backward_pending: bool,
}

impl TwoLayerNetwork {
    /// Builds a network with N(0, 1) weights and zero biases.
    ///
    /// `W1` is drawn before `W2`, row by row, from `rng`.
    pub fn new<R: Rng + ?Sized>(config: NetworkConfig, rng: &mut R) -> Result<TwoLayerNetwork> {
        config.validate()?;
        let w1 = Matrix::random_normal(config.input_dim, config.hidden_dim, rng);
        let b1 = Matrix::zeros(1, config.hidden_dim);
        let w2 = Matrix::random_normal(config.hidden_dim, config.output_dim, rng);
        let b2 = Matrix::zeros(1, config.output_dim);

        Ok(TwoLayerNetwork {
            optimizer: Sgd::new(config.learning_rate),
            config,
            w1,
            b1,
            w2,
            b2,
            cache: None,
            gradients: None,
            backward_pending: false,
        })
    }

    /// Forward pass over an `N × input_dim` batch; returns the `N × output_dim`
    /// output and caches every intermediate for the following `backward`.
    pub fn forward(&mut self, x: &Matrix) -> Result<Matrix> {
        let cache = self.evaluate(x)?;
        let output = cache.a2.clone();
        self.cache = Some(cache);
        self.backward_pending = true;
        Ok(output)
    }

    /// Same computation as `forward` but leaves the cache alone, so the
    /// network can be evaluated (e.g. on a plotting grid) mid-training.
    pub fn predict(&self, x: &Matrix) -> Result<Matrix> {
        Ok(self.evaluate(x)?.a2)
    }

    /// Hidden-layer activations `φ(x·W1 + b1)` for an arbitrary batch. Like
    /// `predict`, the cache is not touched.
    pub fn hidden_activations(&self, x: &Matrix) -> Result<Matrix> {
        Ok(self.evaluate(x)?.a1)
    }

    /// Backpropagates the batch used by the preceding `forward` and applies
    /// one gradient-descent step to all four parameters.
    ///
    /// The output error is `A2 − y` with no `φ'(Z2)` factor, even though
    /// `forward` applies `φ` at the output. Adding the factor changes the
    /// learned weights.
    ///
    /// On error nothing is modified.
    pub fn backward(&mut self, x: &Matrix, y: &Matrix) -> Result<()> {
        if !self.backward_pending {
            return Err(Error::MissingForward);
        }
        let cache = self.cache.as_ref().ok_or(Error::MissingForward)?;

        let n = cache.batch_size();
        if x.rows != n || x.cols != self.config.input_dim {
            return Err(Error::mismatch("backward_input", (n, self.config.input_dim), x.shape()));
        }
        if y.rows != n || y.cols != self.config.output_dim {
            return Err(Error::mismatch("backward_labels", cache.a2.shape(), y.shape()));
        }
        let m = n as f64;

        let delta2 = cache.a2.sub(y)?;
        let dw2 = cache.a1.transpose().dot(&delta2)?.map(|g| g / m);
        let db2 = delta2.sum_columns().map(|g| g / m);

        let act = self.config.activation;
        let delta1 = delta2
            .dot(&self.w2.transpose())?
            .hadamard(&cache.z1.map(|z| act.derivative(z)))?;
        let dw1 = x.transpose().dot(&delta1)?.map(|g| g / m);
        let db1 = delta1.sum_columns().map(|g| g / m);

        let grads = Gradients { dw1, db1, dw2, db2 };
        self.apply(&grads)?;
        trace!("applied gradient step on batch of {n}");

        self.gradients = Some(grads);
        self.backward_pending = false;
        Ok(())
    }

    /// `forward` followed by `backward` on the same batch. Returns the output
    /// of the forward half (pre-update prediction).
    pub fn train_step(&mut self, x: &Matrix, y: &Matrix) -> Result<Matrix> {
        let output = self.forward(x)?;
        self.backward(x, y)?;
        Ok(output)
    }

    fn evaluate(&self, x: &Matrix) -> Result<ForwardCache> {
        if x.rows == 0 || x.cols != self.config.input_dim {
            return Err(Error::mismatch("forward", x.shape(), self.w1.shape()));
        }
        let act = self.config.activation;
        let z1 = x.dot(&self.w1)?.add_row_broadcast(&self.b1)?;
        let a1 = z1.map(|z| act.function(z));
        let z2 = a1.dot(&self.w2)?.add_row_broadcast(&self.b2)?;
        let a2 = z2.map(|z| act.function(z));
        Ok(ForwardCache { z1, a1, z2, a2 })
    }

    fn apply(&mut self, grads: &Gradients) -> Result<()> {
        let sgd = self.optimizer;
        sgd.check(&self.w1, &grads.dw1)?;
        sgd.check(&self.b1, &grads.db1)?;
        sgd.check(&self.w2, &grads.dw2)?;
        sgd.check(&self.b2, &grads.db2)?;

        sgd.step(&mut self.w2, &grads.dw2);
        sgd.step(&mut self.b2, &grads.db2);
        sgd.step(&mut self.w1, &grads.dw1);
        sgd.step(&mut self.b1, &grads.db1);
        Ok(())
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn activation(&self) -> Activation {
        self.config.activation
    }

    pub fn learning_rate(&self) -> f64 {
        self.config.learning_rate
    }

    pub fn w1(&self) -> &Matrix {
        &self.w1
    }

    pub fn b1(&self) -> &Matrix {
        &self.b1
    }

    pub fn w2(&self) -> &Matrix {
        &self.w2
    }

    pub fn b2(&self) -> &Matrix {
        &self.b2
    }

    /// Activations of the most recent `forward`.
    pub fn cache(&self) -> Option<&ForwardCache> {
        self.cache.as_ref()
    }

    /// Gradients of the most recent successful `backward`.
    pub fn gradients(&self) -> Option<&Gradients> {
        self.gradients.as_ref()
    }
}
