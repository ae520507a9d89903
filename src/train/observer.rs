use crate::data::circle::CircleDataset;
use crate::error::Result;
use crate::network::network::TwoLayerNetwork;
use crate::train::step_stats::StepStats;

/// Receives read-only access to the network after each frame of training.
///
/// The network is borrowed immutably, so parameters, cached activations and
/// gradients are guaranteed to come from the same completed step.
pub trait Observer {
    fn observe(
        &mut self,
        network: &TwoLayerNetwork,
        data: &CircleDataset,
        stats: &StepStats,
    ) -> Result<()>;
}

/// No-op observer.
impl Observer for () {
    fn observe(&mut self, _: &TwoLayerNetwork, _: &CircleDataset, _: &StepStats) -> Result<()> {
        Ok(())
    }
}

/// Collects every `StepStats` it sees.
impl Observer for Vec<StepStats> {
    fn observe(&mut self, _: &TwoLayerNetwork, _: &CircleDataset, stats: &StepStats) -> Result<()> {
        self.push(stats.clone());
        Ok(())
    }
}
