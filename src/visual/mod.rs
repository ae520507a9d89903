pub mod gif;
pub mod label;
pub mod render;
pub mod visual_config;
pub mod visualizer;

pub use visual_config::VisualConfig;
pub use visualizer::Visualizer;
