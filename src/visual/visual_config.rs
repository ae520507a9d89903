use std::path::PathBuf;

use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};

/// Rendering and output settings for the `Visualizer`.
///
/// Fields:
/// - `result_dir`      — directory the animation is written to (created on demand)
/// - `file_name`       — animation file name inside `result_dir`
/// - `panel_size`      — side length in pixels of each of the three square panels
/// - `grid_resolution` — lattice points per axis for the decision-boundary panel
/// - `grid_extent`     — the boundary panel covers `[-extent, extent]²`
/// - `frame_delay_ms`  — display time of each animation frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualConfig {
    pub result_dir: PathBuf,
    pub file_name: String,
    pub panel_size: u32,
    pub grid_resolution: usize,
    pub grid_extent: f64,
    pub frame_delay_ms: u32,
}

impl Default for VisualConfig {
    fn default() -> Self {
        VisualConfig {
            result_dir: PathBuf::from("results"),
            file_name: "visualize.gif".to_string(),
            panel_size: 300,
            grid_resolution: 100,
            grid_extent: 3.0,
            frame_delay_ms: 100,
        }
    }
}

impl VisualConfig {
    pub fn validate(&self) -> Result<()> {
        if self.panel_size < 16 {
            return Err(Error::Configuration("panel_size must be at least 16 pixels".into()));
        }
        if self.grid_resolution < 2 {
            return Err(Error::Configuration("grid_resolution must be at least 2".into()));
        }
        if !self.grid_extent.is_finite() || self.grid_extent <= 0.0 {
            return Err(Error::Configuration("grid_extent must be positive".into()));
        }
        if self.file_name.is_empty() {
            return Err(Error::Configuration("file_name must not be empty".into()));
        }
        Ok(())
    }

    pub fn output_path(&self) -> PathBuf {
        self.result_dir.join(&self.file_name)
    }
}
