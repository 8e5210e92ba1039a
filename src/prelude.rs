pub use serde::{Deserialize, Serialize};

pub use ndarray::{array, Array1, Array2};

pub use crate::error::*;
pub use crate::models::{Network, NetworkState};

// Internal re-exports
pub use crate::core::{
    Activation,
    EpochMetric,
    Evaluation,
    ForwardCache,
    ParameterSet,
    Sample,
    TrainingConfig,
    TrainingObserver,
};
