use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Discrete code from the speaker: `m_length` slots, each one of `m_tokens` tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    tokens: Vec<usize>,
    m_tokens: usize,
}

impl Message {
    pub fn new(tokens: Vec<usize>, m_tokens: usize) -> Result<Self> {
        if let Some(&token) = tokens.iter().find(|&&tok| tok >= m_tokens) {
            return Err(Error::InvalidToken { token, m_tokens });
        }

        Ok(Self { tokens, m_tokens })
    }

    pub fn tokens(&self) -> &[usize] {
        &self.tokens
    }

    pub fn m_length(&self) -> usize {
        self.tokens.len()
    }

    pub fn m_tokens(&self) -> usize {
        self.m_tokens
    }

    /// Slot-major one-hot encoding of length `m_length * m_tokens`.
    pub fn one_hot(&self) -> Vec<f32> {
        let mut code = vec![0.; self.tokens.len() * self.m_tokens];
        for (slot, &tok) in self.tokens.iter().enumerate() {
            code[slot * self.m_tokens + tok] = 1.;
        }
        code
    }
}

/// What the listener receives at a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Transmission {
    Message(Message),
    NoMessage,
}

impl Transmission {
    pub fn message(&self) -> Option<&Message> {
        match self {
            Transmission::Message(m) => Some(m),
            Transmission::NoMessage => None,
        }
    }

    pub fn is_message(&self) -> bool {
        matches!(self, Transmission::Message(_))
    }
}

impl From<Option<Message>> for Transmission {
    fn from(m: Option<Message>) -> Self {
        m.map_or(Transmission::NoMessage, Transmission::Message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_hot_sets_one_token_per_slot() {
        let m = Message::new(vec![1, 0, 1], 2).unwrap();
        assert_eq!(m.one_hot(), vec![0., 1., 1., 0., 0., 1.]);
        assert_eq!(m.m_length(), 3);
    }

    #[test]
    fn out_of_range_tokens_are_rejected() {
        assert!(matches!(
            Message::new(vec![0, 2], 2),
            Err(Error::InvalidToken {
                token: 2,
                m_tokens: 2
            })
        ));
    }

    #[test]
    fn transmission_from_option() {
        let m = Message::new(vec![0], 2).unwrap();
        assert_eq!(
            Transmission::from(Some(m.clone())).message(),
            Some(&m)
        );
        assert!(!Transmission::from(None).is_message());
    }
}
