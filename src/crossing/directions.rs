use std::fmt;

use thiserror::Error;

/// The four compass approaches to the crossing, in clockwise order.
///
/// The cyclic order is what the right-of-way rule is defined on: a BAT
/// must yield to the approach immediately counter-clockwise from its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

/// All approaches, indexable by `Direction::index`.
pub const DIRECTIONS: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

/// Raised when an input symbol is not one of `n`, `e`, `s`, `w`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown direction symbol {0:?} (expected one of 'n', 'e', 's', 'w')")]
pub struct UnknownDirection(pub char);

impl Direction {
    /// Maps an input symbol (case-sensitive) to its approach.
    pub fn from_symbol(symbol: char) -> Result<Self, UnknownDirection> {
        match symbol {
            'n' => Ok(Direction::North),
            'e' => Ok(Direction::East),
            's' => Ok(Direction::South),
            'w' => Ok(Direction::West),
            other => Err(UnknownDirection(other)),
        }
    }

    /// Position of this approach in the cyclic order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The approach immediately counter-clockwise; its traffic has priority
    /// over ours.
    pub fn right_neighbor(self) -> Self {
        DIRECTIONS[(self.index() + DIRECTIONS.len() - 1) % DIRECTIONS.len()]
    }

    /// The approach immediately clockwise; we are the traffic *it* yields to.
    pub fn left_neighbor(self) -> Self {
        DIRECTIONS[(self.index() + 1) % DIRECTIONS.len()]
    }

    /// Full English name, used in progress lines.
    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "North",
            Direction::East => "East",
            Direction::South => "South",
            Direction::West => "West",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
