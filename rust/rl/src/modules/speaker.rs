use super::{argmax, from_state, Linear, Module, Speaker};
use crate::config::OBSERVATION_DIM;
use crate::{Error, Message, Result, RingBuffer};
use gridworld::Observation;
use itertools::Itertools;
use rand::Rng;
use serde_json::Value;
use tracing::trace;

const NAME: &str = "speaker";

/// Projects the full observation onto `m_length x m_tokens` logits and picks the
/// arg-max token of every slot.
///
/// Every observation spoken about is kept in a ring buffer, the sample a
/// reconstruction objective for the speaker would be computed over.
#[derive(Debug, Clone)]
pub struct LinearSpeaker {
    params: Linear,
    m_tokens: usize,
    m_length: usize,
    memory: RingBuffer<Observation>,
}

impl LinearSpeaker {
    pub fn new<R: Rng>(
        m_tokens: usize,
        m_length: usize,
        buffer_size: usize,
        rng: &mut R,
    ) -> Result<Self> {
        if m_tokens == 0 || m_length == 0 {
            return Err(Error::InvalidConfig(format!(
                "speaker needs at least one token and one slot, got {m_tokens} tokens x {m_length} slots"
            )));
        }

        Ok(Self {
            params: Linear::new(OBSERVATION_DIM, m_tokens * m_length, rng),
            m_tokens,
            m_length,
            memory: RingBuffer::new(buffer_size)?,
        })
    }

    pub fn memory(&self) -> &RingBuffer<Observation> {
        &self.memory
    }
}

impl Module for LinearSpeaker {
    fn name(&self) -> &'static str {
        NAME
    }

    fn state_dict(&self) -> Result<Value> {
        Ok(serde_json::to_value(&self.params)?)
    }

    fn load_state_dict(&mut self, state: Value) -> Result<()> {
        let params: Linear = from_state(state)?;
        params.check_shape(NAME, OBSERVATION_DIM, self.m_tokens * self.m_length)?;
        self.params = params;
        Ok(())
    }
}

impl Speaker for LinearSpeaker {
    fn speak(&mut self, obs: &Observation) -> Result<Message> {
        let logits = self.params.forward(NAME, &obs.flatten())?.to_vec();
        let tokens = logits.chunks(self.m_tokens).map(argmax).collect_vec();

        self.memory.push(obs.clone());
        trace!(?tokens, slot = self.memory.write_index(), "speaker message");

        Message::new(tokens, self.m_tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridworld::{EnvConfig, Environment, GridVariant};
    use rand::prelude::*;
    use rstest::rstest;

    fn env(seed: u64) -> Environment {
        Environment::new(EnvConfig {
            variant: GridVariant::A,
            seed: Some(seed),
            ..EnvConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn message_has_configured_shape() {
        let mut speaker = LinearSpeaker::new(2, 10, 150, &mut StdRng::seed_from_u64(3)).unwrap();
        let m = speaker.speak(&env(1).render(false)).unwrap();
        assert_eq!(m.m_length(), 10);
        assert_eq!(m.m_tokens(), 2);
        assert!(m.tokens().iter().all(|&t| t < 2));
    }

    #[test]
    fn same_observation_same_message() {
        let mut speaker = LinearSpeaker::new(3, 4, 8, &mut StdRng::seed_from_u64(3)).unwrap();
        let obs = env(2).render(false);
        assert_eq!(speaker.speak(&obs).unwrap(), speaker.speak(&obs).unwrap());
    }

    #[test]
    fn memory_wraps_at_buffer_size() {
        let mut speaker = LinearSpeaker::new(2, 10, 3, &mut StdRng::seed_from_u64(3)).unwrap();
        let mut e = env(5);
        let mut last = None;
        for _ in 0..4 {
            e.reset();
            let obs = e.render(false);
            speaker.speak(&obs).unwrap();
            last = Some(obs);
        }

        assert_eq!(speaker.memory().len(), 3);
        assert_eq!(speaker.memory().write_index(), 1);
        assert_eq!(speaker.memory().get(0), last.as_ref());
    }

    #[rstest]
    #[case(0, 10, 150)]
    #[case(2, 0, 150)]
    #[case(2, 10, 0)]
    fn degenerate_shapes_are_rejected(
        #[case] m_tokens: usize,
        #[case] m_length: usize,
        #[case] buffer_size: usize,
    ) {
        let speaker = LinearSpeaker::new(m_tokens, m_length, buffer_size, &mut StdRng::seed_from_u64(3));
        assert!(matches!(speaker, Err(Error::InvalidConfig(_))));
    }
}
