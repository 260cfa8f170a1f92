use super::{from_state, Linear, Module, ObservationEncoder};
use crate::config::OBSERVATION_DIM;
use crate::Result;
use gridworld::Observation;
use rand::Rng;
use serde_json::Value;

const NAME: &str = "vae";

/// `z = tanh(W o + b)` over the flattened channel-first observation.
#[derive(Debug, Clone)]
pub struct LinearEncoder {
    params: Linear,
}

impl LinearEncoder {
    pub fn new<R: Rng>(z_dim: usize, rng: &mut R) -> Self {
        Self {
            params: Linear::new(OBSERVATION_DIM, z_dim, rng),
        }
    }
}

impl Module for LinearEncoder {
    fn name(&self) -> &'static str {
        NAME
    }

    fn state_dict(&self) -> Result<Value> {
        Ok(serde_json::to_value(&self.params)?)
    }

    fn load_state_dict(&mut self, state: Value) -> Result<()> {
        let params: Linear = from_state(state)?;
        params.check_shape(NAME, OBSERVATION_DIM, self.z_dim())?;
        self.params = params;
        Ok(())
    }
}

impl ObservationEncoder for LinearEncoder {
    fn z_dim(&self) -> usize {
        self.params.out_dim()
    }

    fn encode(&self, obs: &Observation) -> Result<Vec<f32>> {
        let z = self.params.forward(NAME, &obs.flatten())?;
        Ok(z.mapv(f32::tanh).to_vec())
    }
}
