use ndarray::Array1;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::core::activations::Activation;
use crate::core::evaluate::{evaluate, Evaluation};
use crate::core::optimizer::update_mini_batch;
use crate::core::params::ParameterSet;
use crate::error::{NNError, Result};

/// One labeled training example. Input length must equal the first topology
/// entry, target length the last.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub input: Array1<f64>,
    pub target: Array1<f64>,
}

impl Sample {
    pub fn new(input: Array1<f64>, target: Array1<f64>) -> Self {
        Self { input, target }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    pub epochs: usize,
    pub mini_batch_size: usize,
    pub learning_rate: f64,
    /// Seeds the shuffle RNG; `None` draws entropy from the OS.
    pub seed: Option<u64>,
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(NNError::ConfigError("epochs must be positive".into()));
        }
        if self.mini_batch_size == 0 {
            return Err(NNError::ConfigError(
                "mini_batch_size must be positive".into(),
            ));
        }
        if !(self.learning_rate > 0.0) {
            return Err(NNError::ConfigError(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}

/// Per-epoch training record. `evaluation` is `None` when no evaluation
/// dataset was supplied; counts are never fabricated.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EpochMetric {
    /// 1-based epoch index.
    pub epoch: usize,
    pub evaluation: Option<Evaluation>,
}

/// Lifecycle events emitted by the training loop. Implementations live
/// outside the core (console printers, file loggers, progress streams);
/// every method defaults to a no-op.
pub trait TrainingObserver {
    fn on_epoch_start(&mut self, _epoch: usize, _total_epochs: usize) {}
    fn on_mini_batch(&mut self, _epoch: usize, _batch_index: usize, _batch_len: usize) {}
    /// Read-only view of the parameters after an epoch's final update.
    fn on_parameter_snapshot(&mut self, _epoch: usize, _params: &ParameterSet) {}
    fn on_epoch_end(&mut self, _metric: &EpochMetric) {}
}

/// Mini-batch SGD over the whole dataset, one pass per epoch.
///
/// Shuffling happens on a private index permutation; the caller's dataset is
/// never reordered. Mini-batches are contiguous chunks of the permutation,
/// the last one possibly short.
pub(crate) fn run(
    params: &mut ParameterSet,
    activation: Activation,
    data: &[Sample],
    eval_data: Option<&[Sample]>,
    config: &TrainingConfig,
    observers: &mut [&mut dyn TrainingObserver],
) -> Result<Vec<EpochMetric>> {
    config.validate()?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut indices: Vec<usize> = (0..data.len()).collect();
    let mut history = Vec::with_capacity(config.epochs);

    for epoch in 1..=config.epochs {
        for obs in observers.iter_mut() {
            obs.on_epoch_start(epoch, config.epochs);
        }

        indices.shuffle(&mut rng);
        for (batch_index, chunk) in indices.chunks(config.mini_batch_size).enumerate() {
            let batch: Vec<&Sample> = chunk.iter().map(|&i| &data[i]).collect();
            update_mini_batch(params, activation, &batch, config.learning_rate)?;
            for obs in observers.iter_mut() {
                obs.on_mini_batch(epoch, batch_index, batch.len());
            }
        }

        for obs in observers.iter_mut() {
            obs.on_parameter_snapshot(epoch, params);
        }

        let evaluation = match eval_data {
            Some(eval_data) => Some(evaluate(params, activation, eval_data)?),
            None => None,
        };
        let metric = EpochMetric { epoch, evaluation };
        for obs in observers.iter_mut() {
            obs.on_epoch_end(&metric);
        }
        history.push(metric);
    }

    Ok(history)
}
