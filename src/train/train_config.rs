use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `steps`           — total number of full-batch forward/backward steps
/// - `steps_per_frame` — steps between two observer callbacks; a trailing
///                       remainder smaller than this is not run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub steps: usize,
    pub steps_per_frame: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig { steps: 1000, steps_per_frame: 10 }
    }
}

impl TrainConfig {
    pub fn new(steps: usize, steps_per_frame: usize) -> Self {
        TrainConfig { steps, steps_per_frame }
    }

    pub fn validate(&self) -> Result<()> {
        if self.steps_per_frame == 0 {
            return Err(Error::Configuration("steps_per_frame must be at least 1".into()));
        }
        Ok(())
    }

    /// Number of observer callbacks the run will produce.
    pub fn frames(&self) -> usize {
        if self.steps_per_frame == 0 { 0 } else { self.steps / self.steps_per_frame }
    }
}
