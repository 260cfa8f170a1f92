use gridworld::*;
use lwm::modules::{Controller, LinearBelief, LinearEncoder, LinearSpeaker, Module, PolicyOutput};
use lwm::{Agent, AgentConfig, Belief, MessageChannel};
use rand::prelude::*;
use serde_json::Value;

/// Controller that always picks the same action.
pub struct Scripted(pub Action);

impl Module for Scripted {
    fn name(&self) -> &'static str {
        "controller"
    }

    fn state_dict(&self) -> lwm::Result<Value> {
        Ok(Value::from(self.0.index()))
    }

    fn load_state_dict(&mut self, state: Value) -> lwm::Result<()> {
        let index = state.as_u64().unwrap_or_default() as usize;
        self.0 = Action::from_index(index)?;
        Ok(())
    }
}

impl Controller for Scripted {
    fn evaluate(&self, _z: &[f32], _belief: &Belief) -> lwm::Result<PolicyOutput> {
        let mut action_probs = vec![0.; Action::ALL.len()];
        action_probs[self.0.index()] = 1.;
        Ok(PolicyOutput {
            action_probs,
            value: 0.,
        })
    }
}

#[allow(dead_code)]
pub fn seeded_env(variant: &str, seed: u64) -> Environment {
    Environment::new(EnvConfig {
        seed: Some(seed),
        ..EnvConfig::named(variant).unwrap()
    })
    .unwrap()
}

#[allow(dead_code)]
pub fn scripted_agent(action: Action, message_prob: f64, seed: u64) -> Agent {
    let config = AgentConfig {
        message_prob,
        ..AgentConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(seed);
    Agent::new(
        Box::new(LinearEncoder::new(config.z_dim, &mut rng)),
        Box::new(LinearSpeaker::new(
            config.m_tokens,
            config.m_length,
            config.speaker_buffer,
            &mut rng,
        )
        .unwrap()),
        Box::new(LinearBelief::new(
            config.z_dim,
            config.m_dim(),
            config.beta_dim,
            &mut rng,
        )),
        Box::new(Scripted(action)),
        MessageChannel::new(message_prob, Some(seed)).unwrap(),
        Some(seed),
    )
}

#[allow(dead_code)]
pub fn reference_agent(seed: u64) -> Agent {
    Agent::with_reference_modules(&AgentConfig {
        seed: Some(seed),
        ..AgentConfig::default()
    })
    .unwrap()
}

#[allow(dead_code)]
pub fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("lwm-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}
