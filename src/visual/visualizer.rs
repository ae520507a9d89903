use std::path::PathBuf;

use image::RgbaImage;
use log::{debug, info};

use crate::data::circle::CircleDataset;
use crate::error::{Error, Result};
use crate::network::network::TwoLayerNetwork;
use crate::train::observer::Observer;
use crate::train::step_stats::StepStats;
use crate::visual::gif::write_gif;
use crate::visual::render::render_frame;
use crate::visual::visual_config::VisualConfig;

/// Observer that renders one frame per training frame and writes the whole
/// sequence as an animated GIF on `finish`.
pub struct Visualizer {
    config: VisualConfig,
    frames: Vec<RgbaImage>,
}

impl Visualizer {
    pub fn new(config: VisualConfig) -> Result<Visualizer> {
        config.validate()?;
        Ok(Visualizer { config, frames: Vec::new() })
    }

    pub fn frames(&self) -> &[RgbaImage] {
        &self.frames
    }

    /// Encodes the collected frames into `result_dir/file_name`, creating the
    /// directory if needed, and returns the written path.
    pub fn finish(self) -> Result<PathBuf> {
        if self.frames.is_empty() {
            return Err(Error::Configuration("no frames were rendered".into()));
        }
        std::fs::create_dir_all(&self.config.result_dir)?;
        let path = self.config.output_path();
        write_gif(&path, &self.frames, self.config.frame_delay_ms)?;
        info!("wrote {} frames to {}", self.frames.len(), path.display());
        Ok(path)
    }
}

impl Observer for Visualizer {
    fn observe(
        &mut self,
        network: &TwoLayerNetwork,
        data: &CircleDataset,
        stats: &StepStats,
    ) -> Result<()> {
        let frame = render_frame(network, data, &self.config, stats.step)?;
        debug!("rendered frame {}/{} (step {})", stats.frame, stats.total_frames, stats.step);
        self.frames.push(frame);
        Ok(())
    }
}
