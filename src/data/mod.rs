pub mod circle;

pub use circle::CircleDataset;
