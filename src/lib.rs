pub mod core;
pub mod error;
pub mod models;
pub mod prelude;
pub mod utils;

// Re-export types
pub use crate::core::{
    backprop, evaluate, forward, update_mini_batch, Activation, EpochMetric, Evaluation,
    ForwardCache, ParameterSet, Sample, TrainingConfig, TrainingObserver,
};
pub use crate::error::{NNError, Result};
pub use crate::models::{Network, NetworkState};
