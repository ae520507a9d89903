pub mod cache;
pub mod config;
pub mod network;

pub use cache::{ForwardCache, Gradients};
pub use config::NetworkConfig;
pub use network::TwoLayerNetwork;
