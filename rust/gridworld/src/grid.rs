use crate::{Discrete, Error, Position, Result};
use itertools::iproduct;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const GRID_ROWS: usize = 9;
pub const GRID_COLUMNS: usize = 9;

/// Number of reward placements drawn from at every reset.
pub const REWARD_DRAWS: usize = 6;

/// Per-cell attribute. The integer values are the ones the layouts are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Ordinary,
    /// Ends the game with a penalty.
    Damage,
    /// Ends the game with the reward.
    Reward,
    /// Impassable, the agent is never located here.
    Block,
}

impl Cell {
    pub fn attribute(self) -> Discrete {
        match self {
            Cell::Ordinary => 0,
            Cell::Damage => -1,
            Cell::Reward => 1,
            Cell::Block => 9,
        }
    }

    fn glyph(self) -> char {
        match self {
            Cell::Ordinary => '.',
            Cell::Damage => 'x',
            Cell::Reward => 'G',
            Cell::Block => '#',
        }
    }
}

impl TryFrom<Discrete> for Cell {
    type Error = Error;

    fn try_from(attribute: Discrete) -> Result<Self> {
        match attribute {
            0 => Ok(Cell::Ordinary),
            -1 => Ok(Cell::Damage),
            1 => Ok(Cell::Reward),
            9 => Ok(Cell::Block),
            n => Err(Error::UnknownCellAttribute(n)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Array2<Cell>,
}

impl Grid {
    pub fn row_length(&self) -> usize {
        self.cells.nrows()
    }

    pub fn column_length(&self) -> usize {
        self.cells.ncols()
    }

    pub fn contains(&self, pos: Position) -> bool {
        Self::index(pos)
            .map(|(r, c)| r < self.row_length() && c < self.column_length())
            .unwrap_or(false)
    }

    /// `None` when `pos` is outside the grid.
    pub fn get(&self, pos: Position) -> Option<Cell> {
        let (r, c) = Self::index(pos)?;
        self.cells.get((r, c)).copied()
    }

    pub fn set(&mut self, pos: Position, cell: Cell) -> Result<()> {
        let slot = Self::index(pos)
            .and_then(|(r, c)| self.cells.get_mut((r, c)))
            .ok_or(Error::OutOfBounds(pos))?;
        *slot = cell;

        Ok(())
    }

    /// Writes a position the caller knows to lie inside the grid.
    pub(crate) fn put(&mut self, pos: Position, cell: Cell) {
        debug_assert!(self.contains(pos), "{pos} is outside the grid");
        self.cells[[pos.row as usize, pos.column as usize]] = cell;
    }

    pub fn cells(&self) -> &Array2<Cell> {
        &self.cells
    }

    /// Row-major iteration over every position and its cell.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((r, c), &cell)| (Position::new(r as Discrete, c as Discrete), cell))
    }

    pub fn positions_of(&self, cell: Cell) -> Vec<Position> {
        self.iter()
            .filter(|&(_, c)| c == cell)
            .map(|(p, _)| p)
            .collect()
    }

    fn index(pos: Position) -> Option<(usize, usize)> {
        let r = usize::try_from(pos.row).ok()?;
        let c = usize::try_from(pos.column).ok()?;
        Some((r, c))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.rows().into_iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.glyph())?;
            }
        }

        Ok(())
    }
}

const LAYOUT_A: [[Discrete; GRID_COLUMNS]; GRID_ROWS] = [
    [9, 9, 9, 9, 9, 9, 9, 9, 9],
    [9, 0, 0, 0, 0, 0, 0, 0, 9],
    [9, 0, 9, 9, 9, 9, 9, 9, 9],
    [9, 0, 9, 9, 9, 9, 9, 9, 9],
    [9, 0, 0, 0, 0, 0, 0, 0, 9],
    [9, 0, 9, 9, 9, 9, 9, 9, 9],
    [9, 0, 9, 9, 9, 9, 9, 9, 9],
    [9, 0, 0, 0, 0, 0, 0, 0, 9],
    [9, 9, 9, 9, 9, 9, 9, 9, 9],
];

const LAYOUT_B: [[Discrete; GRID_COLUMNS]; GRID_ROWS] = [
    [9, 9, 9, 9, 9, 9, 9, 9, 9],
    [9, 0, 0, 0, 0, 0, 0, 0, 9],
    [9, 0, 9, 0, 9, 9, 9, 9, 9],
    [9, 0, 9, 0, 9, 0, 0, 0, 9],
    [9, 0, 9, 0, 9, 0, 0, 0, 9],
    [9, 0, 9, 0, 9, 0, 0, 0, 9],
    [9, 0, 9, 0, 9, 0, 0, 0, 9],
    [9, 0, 9, 0, 9, 0, 0, 0, 9],
    [9, 9, 9, 9, 9, 9, 9, 9, 9],
];

/// The two static maze layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GridVariant {
    #[default]
    A,
    B,
}

impl GridVariant {
    /// The layout without any reward cell.
    pub fn template(self) -> Grid {
        let rows = match self {
            GridVariant::A => &LAYOUT_A,
            GridVariant::B => &LAYOUT_B,
        };

        // Layout constants only hold 0 and 9.
        let mut cells = Array2::from_elem((GRID_ROWS, GRID_COLUMNS), Cell::Ordinary);
        for (r, c) in iproduct!(0..GRID_ROWS, 0..GRID_COLUMNS) {
            if rows[r][c] == Cell::Block.attribute() {
                cells[[r, c]] = Cell::Block;
            }
        }
        Grid { cells }
    }

    pub fn start(self) -> Position {
        match self {
            GridVariant::A => Position::new(4, 7),
            GridVariant::B => Position::new(1, 7),
        }
    }

    /// Maps a draw in `0..REWARD_DRAWS` onto a corridor slot.
    pub fn reward_slot(self, draw: usize) -> Position {
        match self {
            GridVariant::A => {
                let x = (draw % 3) as Discrete;
                let y = draw % 2;
                if y == 0 {
                    Position::new(1, x * 3 + 1)
                } else {
                    Position::new(GRID_ROWS as Discrete - 2, x * 3 + 1)
                }
            }
            // Both parities land on the same column.
            GridVariant::B => {
                let y = (draw % 3) as Discrete;
                Position::new(y * 3 + 1, 3)
            }
        }
    }

    /// Every position `reward_slot` can produce, sorted and deduplicated.
    pub fn corridor_positions(self) -> Vec<Position> {
        let mut slots = (0..REWARD_DRAWS)
            .map(|draw| self.reward_slot(draw))
            .collect::<Vec<_>>();
        slots.sort();
        slots.dedup();
        slots
    }

    pub fn name(self) -> &'static str {
        match self {
            GridVariant::A => "A",
            GridVariant::B => "B",
        }
    }
}

impl FromStr for GridVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "A" => Ok(GridVariant::A),
            "B" => Ok(GridVariant::B),
            other => Err(Error::UnknownGridVariant(other.to_string())),
        }
    }
}

impl fmt::Display for GridVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
