use crate::belief::BeliefTracker;
use crate::channel::MessageChannel;
use crate::checkpoint::{CheckpointStore, Qualifier};
use crate::modules::{
    argmax, BeliefNetwork, Controller, LinearBelief, LinearController, LinearEncoder,
    LinearSpeaker, ObservationEncoder, PolicyOutput, Speaker,
};
use crate::{AgentConfig, Belief, Result, Transmission};
use gridworld::{Action, Environment, Observation};
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use std::path::PathBuf;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionSelection {
    /// Arg-max of the policy, used for test episodes.
    Greedy,
    /// Sample from the policy, used while training.
    Sample,
}

/// Output of one pass through the listener.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub action: Action,
    pub action_prob: f32,
    pub policy: PolicyOutput,
    pub latent: Vec<f32>,
    pub transmission: Transmission,
    pub belief: Belief,
    pub partial: Observation,
}

/// Speaker plus listener world model.
pub struct Agent {
    encoder: Box<dyn ObservationEncoder>,
    speaker: Box<dyn Speaker>,
    belief_net: Box<dyn BeliefNetwork>,
    controller: Box<dyn Controller>,
    channel: MessageChannel,
    rng: StdRng,
}

impl Agent {
    pub fn new(
        encoder: Box<dyn ObservationEncoder>,
        speaker: Box<dyn Speaker>,
        belief_net: Box<dyn BeliefNetwork>,
        controller: Box<dyn Controller>,
        channel: MessageChannel,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            encoder,
            speaker,
            belief_net,
            controller,
            channel,
            rng,
        }
    }

    /// Agent built from the seeded `Linear*` modules.
    pub fn with_reference_modules(config: &AgentConfig) -> Result<Self> {
        config.validate()?;
        let mut init = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let encoder = LinearEncoder::new(config.z_dim, &mut init);
        let speaker = LinearSpeaker::new(
            config.m_tokens,
            config.m_length,
            config.speaker_buffer,
            &mut init,
        )?;
        let belief_net = LinearBelief::new(config.z_dim, config.m_dim(), config.beta_dim, &mut init);
        let controller = LinearController::new(config.z_dim, config.beta_dim, config.num_action, &mut init);
        let channel = MessageChannel::new(config.message_prob, Some(init.gen()))?;

        Ok(Self::new(
            Box::new(encoder),
            Box::new(speaker),
            Box::new(belief_net),
            Box::new(controller),
            channel,
            Some(init.gen()),
        ))
    }

    pub fn encoder(&self) -> &dyn ObservationEncoder {
        self.encoder.as_ref()
    }

    pub fn controller(&self) -> &dyn Controller {
        self.controller.as_ref()
    }

    /// One step of the decision loop at time `t`.
    pub fn decide(
        &mut self,
        t: usize,
        env: &Environment,
        tracker: &mut BeliefTracker,
        selection: ActionSelection,
    ) -> Result<Decision> {
        let partial = env.render(true);
        let full = env.render(false);

        let latent = self.encoder.encode(&partial)?;
        let transmission = self.channel.transmit(t, &mut *self.speaker, &full)?;
        let belief = tracker
            .update(t, &latent, &transmission, &*self.belief_net)?
            .clone();
        let policy = self.controller.evaluate(&latent, &belief)?;

        let index = match selection {
            ActionSelection::Greedy => argmax(&policy.action_probs),
            ActionSelection::Sample => WeightedIndex::new(&policy.action_probs)?.sample(&mut self.rng),
        };
        let action = Action::from_index(index)?;
        let action_prob = policy.action_probs[index];
        trace!(t, %action, action_prob, value = policy.value, message = transmission.is_message(), "decision");

        Ok(Decision {
            action,
            action_prob,
            policy,
            latent,
            transmission,
            belief,
            partial,
        })
    }

    pub fn save_checkpoints(&self, store: &CheckpointStore, qualifier: Qualifier) -> Result<Vec<PathBuf>> {
        Ok(vec![
            store.save(&*self.encoder, qualifier)?,
            store.save(&*self.belief_net, qualifier)?,
            store.save(&*self.controller, qualifier)?,
            store.save(&*self.speaker, qualifier)?,
        ])
    }

    pub fn load_checkpoints(&mut self, store: &CheckpointStore, qualifier: Qualifier) -> Result<()> {
        store.load(&mut *self.encoder, qualifier)?;
        store.load(&mut *self.belief_net, qualifier)?;
        store.load(&mut *self.controller, qualifier)?;
        store.load(&mut *self.speaker, qualifier)?;
        Ok(())
    }
}
