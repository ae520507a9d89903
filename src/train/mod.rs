pub mod loop_fn;
pub mod observer;
pub mod step_stats;
pub mod train_config;

pub use loop_fn::train_loop;
pub use observer::Observer;
pub use step_stats::StepStats;
pub use train_config::TrainConfig;
