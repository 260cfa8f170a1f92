use crate::{Discrete, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Location of the agent within the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: Discrete,
    pub column: Discrete,
}

impl Position {
    pub const fn new(row: Discrete, column: Discrete) -> Self {
        Self { row, column }
    }

    /// The neighbouring position one move away, without any bounds or block checks.
    pub fn moved(&self, action: Action) -> Self {
        let (dr, dc) = action.delta();
        Self::new(self.row + dr, self.column + dc)
    }
}

impl From<(Discrete, Discrete)> for Position {
    fn from((row, column): (Discrete, Discrete)) -> Self {
        Self::new(row, column)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Moves available to the listener. The discriminants are the action indices the
/// controller produces, so `(a + 2) % 4` is always the opposite direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    Up = 0,
    Left = 1,
    Down = 2,
    Right = 3,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Up, Action::Left, Action::Down, Action::Right];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(Error::UnknownAction(index))
    }

    pub fn opposite(self) -> Self {
        Self::ALL[(self.index() + 2) % 4]
    }

    pub fn is_perpendicular_to(self, other: Action) -> bool {
        self != other && self != other.opposite()
    }

    fn delta(self) -> (Discrete, Discrete) {
        match self {
            Action::Up => (-1, 0),
            Action::Left => (0, -1),
            Action::Down => (1, 0),
            Action::Right => (0, 1),
        }
    }
}

impl TryFrom<usize> for Action {
    type Error = Error;

    fn try_from(index: usize) -> Result<Self> {
        Self::from_index(index)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Up => "Up",
            Action::Left => "Left",
            Action::Down => "Down",
            Action::Right => "Right",
        };
        f.write_str(name)
    }
}
