use super::{from_state, BeliefNetwork, Linear, Module};
use crate::{Belief, Error, Message, Result};
use rand::Rng;
use serde_json::Value;

const NAME: &str = "lbn";

/// `beta = tanh(W [z; one_hot(m)] + b)`.
#[derive(Debug, Clone)]
pub struct LinearBelief {
    params: Linear,
    z_dim: usize,
    m_dim: usize,
}

impl LinearBelief {
    pub fn new<R: Rng>(z_dim: usize, m_dim: usize, beta_dim: usize, rng: &mut R) -> Self {
        Self {
            params: Linear::new(z_dim + m_dim, beta_dim, rng),
            z_dim,
            m_dim,
        }
    }
}

impl Module for LinearBelief {
    fn name(&self) -> &'static str {
        NAME
    }

    fn state_dict(&self) -> Result<Value> {
        Ok(serde_json::to_value(&self.params)?)
    }

    fn load_state_dict(&mut self, state: Value) -> Result<()> {
        let params: Linear = from_state(state)?;
        params.check_shape(NAME, self.z_dim + self.m_dim, self.beta_dim())?;
        self.params = params;
        Ok(())
    }
}

impl BeliefNetwork for LinearBelief {
    fn beta_dim(&self) -> usize {
        self.params.out_dim()
    }

    fn infer(&self, z: &[f32], message: &Message) -> Result<Belief> {
        if z.len() != self.z_dim {
            return Err(Error::DimensionMismatch {
                module: NAME,
                expected: self.z_dim,
                actual: z.len(),
            });
        }

        let mut x = z.to_vec();
        x.extend(message.one_hot());
        let beta = self.params.forward(NAME, &x)?;

        Ok(Belief::new(beta.mapv(f32::tanh).to_vec()))
    }
}
