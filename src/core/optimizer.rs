use crate::core::activations::Activation;
use crate::core::backprop::backprop;
use crate::core::forward::forward;
use crate::core::params::ParameterSet;
use crate::core::training::Sample;
use crate::error::Result;

/// One SGD step over a mini-batch.
///
/// Gradients are accumulated across the whole batch before any parameter is
/// touched, then applied in a single update scaled by
/// `learning_rate / batch.len()`. The divisor is the actual batch length, so
/// a short final batch averages correctly.
pub fn update_mini_batch(
    params: &mut ParameterSet,
    activation: Activation,
    batch: &[&Sample],
    learning_rate: f64,
) -> Result<()> {
    if batch.is_empty() {
        return Ok(());
    }

    let (mut acc_w, mut acc_b) = params.zeros_like();
    for sample in batch {
        let cache = forward(params, activation, &sample.input)?;
        let (nabla_w, nabla_b) = backprop(params, activation, &cache, &sample.target)?;
        for (acc, g) in acc_w.iter_mut().zip(&nabla_w) {
            *acc += g;
        }
        for (acc, g) in acc_b.iter_mut().zip(&nabla_b) {
            *acc += g;
        }
    }

    let scale = learning_rate / batch.len() as f64;
    params.apply_update(&acc_w, &acc_b, scale);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params() -> ParameterSet {
        let mut rng = StdRng::seed_from_u64(3);
        ParameterSet::new(&[2, 3, 2], &mut rng).unwrap()
    }

    fn samples() -> Vec<Sample> {
        vec![
            Sample::new(array![1.0, 0.0], array![1.0, 0.0]),
            Sample::new(array![0.0, 1.0], array![0.0, 1.0]),
        ]
    }

    #[test]
    fn zero_learning_rate_is_identity() {
        let mut params = params();
        let before = params.clone();
        let data = samples();
        let batch: Vec<&Sample> = data.iter().collect();
        update_mini_batch(&mut params, Activation::Sigmoid, &batch, 0.0).unwrap();
        assert_eq!(params.weights(), before.weights());
        assert_eq!(params.biases(), before.biases());
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let mut params = params();
        let before = params.clone();
        update_mini_batch(&mut params, Activation::Sigmoid, &[], 3.0).unwrap();
        assert_eq!(params.weights(), before.weights());
    }

    // The net update must be the mean of the per-sample gradients scaled by
    // the learning rate, not the sum.
    #[test]
    fn update_averages_per_sample_gradients() {
        let mut params = params();
        let before = params.clone();
        let data = samples();
        let lr = 0.5;

        let mut expected_w = before.zeros_like().0;
        let mut expected_b = before.zeros_like().1;
        for s in &data {
            let cache = forward(&before, Activation::Sigmoid, &s.input).unwrap();
            let (nw, nb) = backprop(&before, Activation::Sigmoid, &cache, &s.target).unwrap();
            for (acc, g) in expected_w.iter_mut().zip(&nw) {
                *acc += g;
            }
            for (acc, g) in expected_b.iter_mut().zip(&nb) {
                *acc += g;
            }
        }

        let batch: Vec<&Sample> = data.iter().collect();
        update_mini_batch(&mut params, Activation::Sigmoid, &batch, lr).unwrap();

        let scale = lr / data.len() as f64;
        for l in 0..params.num_layers() {
            let want = &before.weights()[l] - &(scale * &expected_w[l]);
            for (got, want) in params.weights()[l].iter().zip(want.iter()) {
                assert_relative_eq!(*got, *want, max_relative = 1e-12);
            }
            let want_b = &before.biases()[l] - &(scale * &expected_b[l]);
            for (got, want) in params.biases()[l].iter().zip(want_b.iter()) {
                assert_relative_eq!(*got, *want, max_relative = 1e-12);
            }
        }
    }
}
