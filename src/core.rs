// src/core.rs
pub mod activations;
pub mod backprop;
pub mod evaluate;
pub mod forward;
pub mod optimizer;
pub mod params;
pub mod training;

// Re-export commonly used items
pub use activations::Activation;
pub use backprop::backprop;
pub use evaluate::{evaluate, Evaluation};
pub use forward::{forward, ForwardCache};
pub use optimizer::update_mini_batch;
pub use params::ParameterSet;
pub use training::{EpochMetric, Sample, TrainingConfig, TrainingObserver};
