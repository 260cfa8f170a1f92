use crate::{sampling::Weighted, Action, Continous, Position};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub next_state: Position,
    pub probability: Continous,
    pub reward: Continous,
    pub done: bool,
}

impl Weighted<Position> for Transition {
    fn s(&self) -> Position {
        self.next_state
    }

    fn p(&self) -> Continous {
        self.probability
    }
}

/// Next-state distribution for one (state, action) pair, keyed by next position.
/// Entries keep the order in which their position was first reached.
///
/// Empty means the source position is not actionable, i.e. the episode is over.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionDistribution {
    entries: Vec<Transition>,
}

impl TransitionDistribution {
    /// Adds `transition`, summing the probability into an existing entry for the same position.
    pub fn accumulate(&mut self, transition: Transition) {
        match self
            .entries
            .iter_mut()
            .find(|t| t.next_state == transition.next_state)
        {
            Some(existing) => existing.probability += transition.probability,
            None => self.entries.push(transition),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Transition] {
        &self.entries
    }

    pub fn get(&self, next_state: Position) -> Option<&Transition> {
        self.entries.iter().find(|t| t.next_state == next_state)
    }

    /// Probability of landing on `next_state`; zero if it cannot be reached.
    pub fn probability(&self, next_state: Position) -> Continous {
        self.get(next_state).map(|t| t.probability).unwrap_or(0.)
    }

    pub fn total(&self) -> Continous {
        self.entries.iter().map(|t| t.probability).sum()
    }
}

impl<'a> IntoIterator for &'a TransitionDistribution {
    type Item = &'a Transition;
    type IntoIter = std::slice::Iter<'a, Transition>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

pub type Transitions = HashMap<(Position, Action), TransitionDistribution>;
