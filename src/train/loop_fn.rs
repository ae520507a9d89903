use std::time::Instant;

use log::{debug, info};

use crate::data::circle::CircleDataset;
use crate::error::{Error, Result};
use crate::loss::mse::MseLoss;
use crate::network::network::TwoLayerNetwork;
use crate::train::observer::Observer;
use crate::train::step_stats::StepStats;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` on the whole of `data` for `config.frames()` frames of
/// `config.steps_per_frame` full-batch steps each, and returns the stats of
/// every frame.
///
/// After each frame the observer is called with a shared borrow of the
/// network, i.e. strictly between a `backward` and the next `forward`.
///
/// # Errors
/// The first error from the network or the observer aborts the run; no
/// partial results are returned.
pub fn train_loop<O: Observer + ?Sized>(
    network: &mut TwoLayerNetwork,
    data: &CircleDataset,
    config: &TrainConfig,
    observer: &mut O,
) -> Result<Vec<StepStats>> {
    config.validate()?;
    if data.is_empty() {
        return Err(Error::Configuration("training data is empty".into()));
    }

    let total_frames = config.frames();
    info!(
        "training {} samples for {} steps ({} frames, activation={}, lr={})",
        data.len(),
        total_frames * config.steps_per_frame,
        total_frames,
        network.activation(),
        network.learning_rate(),
    );

    let mut history = Vec::with_capacity(total_frames);
    let mut step = 0;

    for frame in 1..=total_frames {
        let t_start = Instant::now();

        // ── One frame of full-batch steps ─────────────────────────────────
        let loss = run_one_frame(network, data, config.steps_per_frame)?;
        step += config.steps_per_frame;

        let stats = StepStats {
            frame,
            total_frames,
            step,
            loss,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        debug!("frame {frame}/{total_frames} step {step}: loss = {loss:.6}");

        // ── Hand the settled network to the observer ──────────────────────
        observer.observe(network, data, &stats)?;
        history.push(stats);
    }

    if let Some(last) = history.last() {
        info!("finished after {} steps: loss = {:.6}", last.step, last.loss);
    }
    Ok(history)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Runs `steps` forward/backward pairs on the full batch and returns the MSE
/// of the last forward output.
fn run_one_frame(network: &mut TwoLayerNetwork, data: &CircleDataset, steps: usize) -> Result<f64> {
    let mut loss = 0.0;
    for _ in 0..steps {
        let output = network.train_step(&data.inputs, &data.labels)?;
        loss = MseLoss::loss(&output, &data.labels)?;
    }
    Ok(loss)
}
