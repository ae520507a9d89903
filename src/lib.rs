pub mod error;
pub mod math;
pub mod activation;
pub mod optim;
pub mod network;
pub mod loss;
pub mod data;
pub mod train;
pub mod visual;

// Convenience re-exports
pub use error::{Error, Result};
pub use math::matrix::Matrix;
pub use activation::activation::Activation;
pub use network::{ForwardCache, Gradients, NetworkConfig, TwoLayerNetwork};
pub use loss::mse::MseLoss;
pub use optim::sgd::Sgd;
pub use data::circle::CircleDataset;
pub use train::{train_loop, Observer, StepStats, TrainConfig};
pub use visual::{VisualConfig, Visualizer};
