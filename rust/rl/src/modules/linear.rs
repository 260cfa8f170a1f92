use crate::{Error, Result};
use ndarray::{Array1, Array2, ArrayView1};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Affine map `W x + b` with `W` of shape `(out, in)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Linear {
    weight: Array2<f32>,
    bias: Array1<f32>,
}

impl Linear {
    /// Uniform init in `[-1/sqrt(in), 1/sqrt(in))`.
    pub fn new<R: Rng>(in_dim: usize, out_dim: usize, rng: &mut R) -> Self {
        let bound = 1. / (in_dim.max(1) as f32).sqrt();
        let weight = Array2::from_shape_fn((out_dim, in_dim), |_| rng.gen_range(-bound..bound));
        let bias = Array1::from_shape_fn(out_dim, |_| rng.gen_range(-bound..bound));

        Self { weight, bias }
    }

    pub fn in_dim(&self) -> usize {
        self.weight.ncols()
    }

    pub fn out_dim(&self) -> usize {
        self.weight.nrows()
    }

    pub fn forward(&self, module: &'static str, x: &[f32]) -> Result<Array1<f32>> {
        if x.len() != self.in_dim() {
            return Err(Error::DimensionMismatch {
                module,
                expected: self.in_dim(),
                actual: x.len(),
            });
        }

        Ok(self.weight.dot(&ArrayView1::from(x)) + &self.bias)
    }

    /// Rejects parameters loaded for a differently shaped layer.
    pub fn check_shape(&self, module: &'static str, in_dim: usize, out_dim: usize) -> Result<()> {
        if self.in_dim() != in_dim {
            return Err(Error::DimensionMismatch {
                module,
                expected: in_dim,
                actual: self.in_dim(),
            });
        }
        if self.out_dim() != out_dim || self.bias.len() != out_dim {
            return Err(Error::DimensionMismatch {
                module,
                expected: out_dim,
                actual: self.out_dim(),
            });
        }

        Ok(())
    }
}
