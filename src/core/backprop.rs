use ndarray::{Array1, Array2};

use crate::core::activations::Activation;
use crate::core::forward::ForwardCache;
use crate::core::params::ParameterSet;
use crate::error::{NNError, Result};
use crate::utils::outer;

/// Per-sample gradients of the quadratic cost, one `(dW, db)` pair per layer.
///
/// Pure function of the cached forward pass and the target; the parameters
/// are only read. Gradient shapes match the `ParameterSet` exactly.
pub fn backprop(
    params: &ParameterSet,
    activation: Activation,
    cache: &ForwardCache,
    target: &Array1<f64>,
) -> Result<(Vec<Array2<f64>>, Vec<Array1<f64>>)> {
    let sizes = params.sizes();
    let expected = sizes[sizes.len() - 1];
    if target.len() != expected {
        return Err(NNError::DimensionMismatch(format!(
            "target has length {}, network produces {}",
            target.len(),
            expected
        )));
    }

    let layers = params.num_layers();
    let (mut nabla_w, mut nabla_b) = params.zeros_like();

    // Output layer: delta = (a_L - y) ⊙ f'(z_L), quadratic cost.
    let mut delta =
        (cache.output() - target) * activation.derivative(&cache.zs[layers - 1]);
    nabla_w[layers - 1] = outer(&delta, &cache.activations[layers - 1]);
    nabla_b[layers - 1] = delta.clone();

    // Walk back through the hidden layers.
    for l in (0..layers - 1).rev() {
        delta = params.weights()[l + 1].t().dot(&delta) * activation.derivative(&cache.zs[l]);
        nabla_w[l] = outer(&delta, &cache.activations[l]);
        nabla_b[l] = delta.clone();
    }

    Ok((nabla_w, nabla_b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forward::forward;
    use approx::assert_relative_eq;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params() -> ParameterSet {
        let mut rng = StdRng::seed_from_u64(11);
        ParameterSet::new(&[3, 4, 2], &mut rng).unwrap()
    }

    #[test]
    fn gradient_shapes_match_parameters() {
        let params = params();
        let input = array![0.5, -0.3, 0.8];
        let target = array![1.0, 0.0];
        let cache = forward(&params, Activation::Sigmoid, &input).unwrap();
        let (nw, nb) = backprop(&params, Activation::Sigmoid, &cache, &target).unwrap();
        assert_eq!(nw.len(), params.num_layers());
        assert_eq!(nb.len(), params.num_layers());
        for i in 0..params.num_layers() {
            assert_eq!(nw[i].shape(), params.weights()[i].shape());
            assert_eq!(nb[i].len(), params.biases()[i].len());
        }
    }

    #[test]
    fn rejects_wrong_target_length() {
        let params = params();
        let cache = forward(&params, Activation::Sigmoid, &array![0.1, 0.2, 0.3]).unwrap();
        let err =
            backprop(&params, Activation::Sigmoid, &cache, &array![1.0, 0.0, 0.0]).unwrap_err();
        assert!(matches!(err, NNError::DimensionMismatch(_)));
    }

    #[test]
    fn does_not_mutate_parameters() {
        let params = params();
        let before = params.clone();
        let cache = forward(&params, Activation::Relu, &array![1.0, 2.0, 3.0]).unwrap();
        backprop(&params, Activation::Relu, &cache, &array![0.0, 1.0]).unwrap();
        assert_eq!(params.weights(), before.weights());
        assert_eq!(params.biases(), before.biases());
    }

    // Finite-difference check: perturbing a single parameter by eps changes
    // the quadratic cost by approximately eps * gradient.
    #[test]
    fn gradients_agree_with_finite_differences() {
        let params = params();
        let input = array![0.2, -0.1, 0.4];
        let target = array![0.0, 1.0];
        let cache = forward(&params, Activation::Sigmoid, &input).unwrap();
        let (nw, nb) = backprop(&params, Activation::Sigmoid, &cache, &target).unwrap();

        let cost = |p: &ParameterSet| -> f64 {
            let out = forward(p, Activation::Sigmoid, &input).unwrap().into_output();
            0.5 * (&out - &target).mapv(|d| d * d).sum()
        };

        let eps = 1e-5;
        let perturb_w = |layer: usize, i: usize, j: usize, by: f64| {
            let (sizes, mut w, b) = params.clone().into_values();
            w[layer][(i, j)] += by;
            ParameterSet::from_values(sizes, w, b).unwrap()
        };
        let perturb_b = |layer: usize, i: usize, by: f64| {
            let (sizes, w, mut b) = params.clone().into_values();
            b[layer][i] += by;
            ParameterSet::from_values(sizes, w, b).unwrap()
        };

        for layer in 0..params.num_layers() {
            for ((i, j), &g) in nw[layer].indexed_iter() {
                let numeric =
                    (cost(&perturb_w(layer, i, j, eps)) - cost(&perturb_w(layer, i, j, -eps)))
                        / (2.0 * eps);
                assert_relative_eq!(g, numeric, max_relative = 1e-4, epsilon = 1e-8);
            }
            for (i, &g) in nb[layer].indexed_iter() {
                let numeric = (cost(&perturb_b(layer, i, eps)) - cost(&perturb_b(layer, i, -eps)))
                    / (2.0 * eps);
                assert_relative_eq!(g, numeric, max_relative = 1e-4, epsilon = 1e-8);
            }
        }
    }
}
