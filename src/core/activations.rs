use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Elementwise nonlinearity applied uniformly to every layer, output included.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Sigmoid,
    Relu,
}

impl Activation {
    pub fn forward(&self, z: &Array1<f64>) -> Array1<f64> {
        match self {
            Self::Sigmoid => z.mapv(|z| 1.0 / (1.0 + (-z).exp())),
            Self::Relu => z.mapv(|z| if z > 0.0 { z } else { 0.0 }),
        }
    }

    pub fn derivative(&self, z: &Array1<f64>) -> Array1<f64> {
        match self {
            Self::Sigmoid => z.mapv(|z| {
                let s = 1.0 / (1.0 + (-z).exp());
                s * (1.0 - s)
            }),
            // subgradient at 0 is taken as 0
            Self::Relu => z.mapv(|z| if z > 0.0 { 1.0 } else { 0.0 }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sigmoid => "sigmoid",
            Self::Relu => "relu",
        }
    }
}
