use serde::{Deserialize, Serialize};

use crate::core::activations::Activation;
use crate::core::forward::forward;
use crate::core::params::ParameterSet;
use crate::core::training::Sample;
use crate::error::Result;
use crate::utils::argmax;

/// Correct-prediction count over a labeled dataset.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub correct: usize,
    pub total: usize,
}

impl Evaluation {
    pub fn accuracy_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            100.0 * self.correct as f64 / self.total as f64
        }
    }
}

/// Argmax classification accuracy: the predicted class is the index of the
/// largest output component, compared against the index of the largest
/// target component (one-hot targets). Parameters are only read.
pub fn evaluate(
    params: &ParameterSet,
    activation: Activation,
    data: &[Sample],
) -> Result<Evaluation> {
    let mut correct = 0;
    for sample in data {
        let cache = forward(params, activation, &sample.input)?;
        if argmax(cache.output()) == argmax(&sample.target) {
            correct += 1;
        }
    }
    Ok(Evaluation {
        correct,
        total: data.len(),
    })
}
