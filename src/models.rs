use std::fs::File;
use std::io::{Read, Write};

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::core::{
    backprop, evaluate, forward, update_mini_batch, Activation, EpochMetric, Evaluation,
    ForwardCache, ParameterSet, Sample, TrainingConfig, TrainingObserver,
};
use crate::core::training;
use crate::error::Result;

/// A feedforward network: a [`ParameterSet`] plus one activation applied
/// uniformly to every layer. An explicit, caller-held value; the crate keeps
/// no global instance.
#[derive(Debug, Clone)]
pub struct Network {
    params: ParameterSet,
    activation: Activation,
}

/// Neutral export of a network's state, for an external storage collaborator
/// to serialize into whatever container format it likes.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NetworkState {
    pub sizes: Vec<usize>,
    pub activation: Activation,
    pub weights: Vec<Array2<f64>>,
    pub biases: Vec<Array1<f64>>,
}

impl Network {
    /// Random network for the given topology. With a seed, initialization is
    /// reproducible; without one, parameters differ per construction.
    pub fn new(sizes: &[usize], activation: Activation, seed: Option<u64>) -> Result<Self> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            params: ParameterSet::new(sizes, &mut rng)?,
            activation,
        })
    }

    pub fn sizes(&self) -> &[usize] {
        self.params.sizes()
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    /// Pure forward pass; no intermediate state survives the call.
    pub fn predict(&self, input: &Array1<f64>) -> Result<Array1<f64>> {
        Ok(forward(&self.params, self.activation, input)?.into_output())
    }

    /// Every layer's activation vector in order, input included. Meant for
    /// external visualization.
    pub fn activations(&self, input: &Array1<f64>) -> Result<Vec<Array1<f64>>> {
        Ok(forward(&self.params, self.activation, input)?.activations)
    }

    /// Forward pass keeping the full cache, for callers that feed it to
    /// [`gradients`](Self::gradients).
    pub fn forward(&self, input: &Array1<f64>) -> Result<ForwardCache> {
        forward(&self.params, self.activation, input)
    }

    /// Per-sample gradients from a cached forward pass.
    pub fn gradients(
        &self,
        cache: &ForwardCache,
        target: &Array1<f64>,
    ) -> Result<(Vec<Array2<f64>>, Vec<Array1<f64>>)> {
        backprop(&self.params, self.activation, cache, target)
    }

    /// One SGD step over a mini-batch.
    pub fn update_mini_batch(&mut self, batch: &[&Sample], learning_rate: f64) -> Result<()> {
        update_mini_batch(&mut self.params, self.activation, batch, learning_rate)
    }

    /// Mini-batch SGD for `config.epochs` passes over `data`, returning one
    /// metric per epoch. When `eval_data` is given, each epoch ends with an
    /// argmax evaluation over it.
    pub fn train(
        &mut self,
        data: &[Sample],
        config: &TrainingConfig,
        eval_data: Option<&[Sample]>,
    ) -> Result<Vec<EpochMetric>> {
        self.train_with_observers(data, config, eval_data, &mut [])
    }

    /// Like [`train`](Self::train), additionally emitting lifecycle events to
    /// the observers after every mini-batch and epoch.
    pub fn train_with_observers(
        &mut self,
        data: &[Sample],
        config: &TrainingConfig,
        eval_data: Option<&[Sample]>,
        observers: &mut [&mut dyn TrainingObserver],
    ) -> Result<Vec<EpochMetric>> {
        training::run(
            &mut self.params,
            self.activation,
            data,
            eval_data,
            config,
            observers,
        )
    }

    pub fn evaluate(&self, data: &[Sample]) -> Result<Evaluation> {
        evaluate(&self.params, self.activation, data)
    }

    pub fn export_parameters(&self) -> NetworkState {
        let (sizes, weights, biases) = self.params.clone().into_values();
        NetworkState {
            sizes,
            activation: self.activation,
            weights,
            biases,
        }
    }

    /// Inverse of [`export_parameters`](Self::export_parameters); shapes are
    /// re-validated against the topology.
    pub fn import_parameters(state: NetworkState) -> Result<Self> {
        Ok(Self {
            params: ParameterSet::from_values(state.sizes, state.weights, state.biases)?,
            activation: state.activation,
        })
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let encoded: Vec<u8> = bincode::serialize(&self.export_parameters())?;
        File::create(path)?.write_all(&encoded)?;
        Ok(())
    }

    pub fn load(path: &str) -> Result<Network> {
        let mut buffer = Vec::new();
        File::open(path)?.read_to_end(&mut buffer)?;
        let state: NetworkState = bincode::deserialize(&buffer)?;
        Network::import_parameters(state)
    }
}
