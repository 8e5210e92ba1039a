use ndarray::{Array1, Array2};
use ndarray_rand::rand_distr::StandardNormal;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;

use crate::error::{NNError, Result};

/// Per-layer weight matrices and bias vectors.
///
/// Weight i has shape `(sizes[i+1], sizes[i])`, bias i has length
/// `sizes[i+1]`. Shapes are fixed at construction; only the values change.
#[derive(Debug, Clone)]
pub struct ParameterSet {
    sizes: Vec<usize>,
    weights: Vec<Array2<f64>>,
    biases: Vec<Array1<f64>>,
}

impl ParameterSet {
    /// Standard-normal initialization of every weight and bias.
    pub fn new(sizes: &[usize], rng: &mut StdRng) -> Result<Self> {
        validate_sizes(sizes)?;
        let weights = sizes
            .windows(2)
            .map(|pair| Array2::random_using((pair[1], pair[0]), StandardNormal, rng))
            .collect();
        let biases = sizes[1..]
            .iter()
            .map(|&y| Array1::random_using(y, StandardNormal, rng))
            .collect();
        Ok(Self {
            sizes: sizes.to_vec(),
            weights,
            biases,
        })
    }

    /// Construction from explicit values, used when importing a network.
    pub fn from_values(
        sizes: Vec<usize>,
        weights: Vec<Array2<f64>>,
        biases: Vec<Array1<f64>>,
    ) -> Result<Self> {
        validate_sizes(&sizes)?;
        let layers = sizes.len() - 1;
        if weights.len() != layers || biases.len() != layers {
            return Err(NNError::ShapeError(format!(
                "expected {} weight matrices and bias vectors, got {} and {}",
                layers,
                weights.len(),
                biases.len()
            )));
        }
        for (i, pair) in sizes.windows(2).enumerate() {
            if weights[i].shape() != [pair[1], pair[0]] {
                return Err(NNError::ShapeError(format!(
                    "weight {} has shape {:?}, expected ({}, {})",
                    i,
                    weights[i].shape(),
                    pair[1],
                    pair[0]
                )));
            }
            if biases[i].len() != pair[1] {
                return Err(NNError::ShapeError(format!(
                    "bias {} has length {}, expected {}",
                    i,
                    biases[i].len(),
                    pair[1]
                )));
            }
        }
        Ok(Self {
            sizes,
            weights,
            biases,
        })
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Number of weight layers (topology length minus one).
    pub fn num_layers(&self) -> usize {
        self.weights.len()
    }

    pub fn weights(&self) -> &[Array2<f64>] {
        &self.weights
    }

    pub fn biases(&self) -> &[Array1<f64>] {
        &self.biases
    }

    /// Zeroed gradient accumulators shaped like the parameters.
    pub fn zeros_like(&self) -> (Vec<Array2<f64>>, Vec<Array1<f64>>) {
        let w = self.weights.iter().map(|w| Array2::zeros(w.raw_dim())).collect();
        let b = self.biases.iter().map(|b| Array1::zeros(b.raw_dim())).collect();
        (w, b)
    }

    /// In-place gradient-descent step: `p -= scale * g` for every parameter.
    pub fn apply_update(&mut self, grad_w: &[Array2<f64>], grad_b: &[Array1<f64>], scale: f64) {
        debug_assert_eq!(grad_w.len(), self.weights.len());
        debug_assert_eq!(grad_b.len(), self.biases.len());
        for (w, gw) in self.weights.iter_mut().zip(grad_w) {
            debug_assert_eq!(w.shape(), gw.shape());
            *w -= &(scale * gw);
        }
        for (b, gb) in self.biases.iter_mut().zip(grad_b) {
            debug_assert_eq!(b.len(), gb.len());
            *b -= &(scale * gb);
        }
    }

    /// Consumes the set, handing the values to an export structure.
    pub fn into_values(self) -> (Vec<usize>, Vec<Array2<f64>>, Vec<Array1<f64>>) {
        (self.sizes, self.weights, self.biases)
    }
}

fn validate_sizes(sizes: &[usize]) -> Result<()> {
    if sizes.len() < 2 {
        return Err(NNError::ShapeError(format!(
            "topology must have at least 2 layers, got {}",
            sizes.len()
        )));
    }
    if let Some(i) = sizes.iter().position(|&s| s == 0) {
        return Err(NNError::ShapeError(format!("layer {} has size 0", i)));
    }
    Ok(())
}
