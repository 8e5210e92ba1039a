use ndarray::{Array1, Array2};

/// Index of the largest component; ties resolve to the first occurrence.
pub fn argmax(v: &Array1<f64>) -> usize {
    let mut best = 0;
    let mut best_val = f64::NEG_INFINITY;
    for (i, &x) in v.iter().enumerate() {
        if x > best_val {
            best = i;
            best_val = x;
        }
    }
    best
}

/// Outer product a ⊗ b with shape (a.len(), b.len()).
pub fn outer(a: &Array1<f64>, b: &Array1<f64>) -> Array2<f64> {
    Array2::from_shape_fn((a.len(), b.len()), |(i, j)| a[i] * b[j])
}
