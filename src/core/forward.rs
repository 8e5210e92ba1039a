use ndarray::Array1;

use crate::core::activations::Activation;
use crate::core::params::ParameterSet;
use crate::error::{NNError, Result};

/// Intermediate values of one forward pass, kept for backpropagation.
///
/// `activations[0]` is the input; `zs[l]` and `activations[l + 1]` belong to
/// layer l. Always holds one more activation than pre-activations.
#[derive(Debug, Clone)]
pub struct ForwardCache {
    pub zs: Vec<Array1<f64>>,
    pub activations: Vec<Array1<f64>>,
}

impl ForwardCache {
    pub fn output(&self) -> &Array1<f64> {
        &self.activations[self.activations.len() - 1]
    }

    pub fn into_output(mut self) -> Array1<f64> {
        // the cache is never constructed empty
        self.activations.pop().unwrap()
    }
}

/// Layer-by-layer forward pass: `z_l = W_l · a_{l-1} + b_l`, `a_l = f(z_l)`.
pub fn forward(
    params: &ParameterSet,
    activation: Activation,
    input: &Array1<f64>,
) -> Result<ForwardCache> {
    let expected = params.sizes()[0];
    if input.len() != expected {
        return Err(NNError::DimensionMismatch(format!(
            "input has length {}, network expects {}",
            input.len(),
            expected
        )));
    }

    let mut zs = Vec::with_capacity(params.num_layers());
    let mut activations = Vec::with_capacity(params.num_layers() + 1);
    activations.push(input.clone());

    for (w, b) in params.weights().iter().zip(params.biases()) {
        let z = w.dot(&activations[activations.len() - 1]) + b;
        let a = activation.forward(&z);
        zs.push(z);
        activations.push(a);
    }

    Ok(ForwardCache { zs, activations })
}
