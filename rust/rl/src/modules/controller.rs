use super::{from_state, softmax, Controller, Linear, Module, PolicyOutput};
use crate::{Belief, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const NAME: &str = "controller";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Heads {
    policy: Linear,
    value: Linear,
}

/// Softmax policy head and scalar value head over `[z; beta]`.
#[derive(Debug, Clone)]
pub struct LinearController {
    heads: Heads,
    in_dim: usize,
    num_action: usize,
}

impl LinearController {
    pub fn new<R: Rng>(z_dim: usize, beta_dim: usize, num_action: usize, rng: &mut R) -> Self {
        let in_dim = z_dim + beta_dim;
        Self {
            heads: Heads {
                policy: Linear::new(in_dim, num_action, rng),
                value: Linear::new(in_dim, 1, rng),
            },
            in_dim,
            num_action,
        }
    }
}

impl Module for LinearController {
    fn name(&self) -> &'static str {
        NAME
    }

    fn state_dict(&self) -> Result<Value> {
        Ok(serde_json::to_value(&self.heads)?)
    }

    fn load_state_dict(&mut self, state: Value) -> Result<()> {
        let heads: Heads = from_state(state)?;
        heads.policy.check_shape(NAME, self.in_dim, self.num_action)?;
        heads.value.check_shape(NAME, self.in_dim, 1)?;
        self.heads = heads;
        Ok(())
    }
}

impl Controller for LinearController {
    fn evaluate(&self, z: &[f32], belief: &Belief) -> Result<PolicyOutput> {
        let mut x = z.to_vec();
        x.extend_from_slice(belief.as_slice());

        let logits = self.heads.policy.forward(NAME, &x)?;
        let value = self.heads.value.forward(NAME, &x)?[0];

        Ok(PolicyOutput {
            action_probs: softmax(&logits.to_vec()),
            value,
        })
    }
}
