use serde::{Serialize, Deserialize};

/// Progress record handed to the observer after every frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepStats {
    /// 1-based frame number.
    pub frame: usize,
    /// Total frames requested for this run.
    pub total_frames: usize,
    /// Training steps completed so far.
    pub step: usize,
    /// MSE of the last forward output of this frame against the labels.
    pub loss: f64,
    /// Wall-clock duration of this frame's training steps in milliseconds.
    pub elapsed_ms: u64,
}
