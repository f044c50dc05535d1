//! Newtype wrappers for improved type safety and domain modeling.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A cell on the 3x3 board, addressed by row and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    row: usize,
    col: usize,
}

impl Position {
    /// Create a new position, validating it's within board bounds.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidPosition`] if either coordinate is >= 3.
    pub fn new(row: usize, col: usize) -> Result<Self, crate::Error> {
        if row < 3 && col < 3 {
            Ok(Position { row, col })
        } else {
            Err(crate::Error::InvalidPosition { row, col })
        }
    }

    /// Position of a flat (row-major) cell index.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidPosition`] if the index is >= 9.
    pub fn from_index(index: usize) -> Result<Self, crate::Error> {
        Self::new(index / 3, index % 3)
    }

    pub(crate) const fn from_index_unchecked(index: usize) -> Self {
        Position {
            row: index / 3,
            col: index % 3,
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    /// Flat (row-major) index of this position.
    pub fn index(&self) -> usize {
        self.row * 3 + self.col
    }

    /// Manhattan distance between two positions.
    pub fn distance(&self, other: Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Canonical, totally ordered key of a puzzle state.
///
/// Holds the nine cell values in row-major order and renders as a nine-digit
/// string (`"123456780"`). Every visited set, transposition table and Q-table
/// in the crate is keyed by this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct StateKey([u8; 9]);

impl StateKey {
    pub(crate) const fn from_cells(cells: [u8; 9]) -> Self {
        StateKey(cells)
    }

    /// Parse a nine-digit key.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidState`] if the string is not nine digits
    /// or the digits are not a permutation of 0-8.
    pub fn parse(s: &str) -> Result<Self, crate::Error> {
        let digits: Vec<u8> = s
            .chars()
            .map(|c| c.to_digit(10).map(|d| d as u8))
            .collect::<Option<_>>()
            .ok_or_else(|| crate::Error::invalid_state(format!("key '{s}' has a non-digit")))?;
        let cells: [u8; 9] = digits.try_into().map_err(|_| {
            crate::Error::invalid_state(format!("key '{s}' must have exactly nine digits"))
        })?;
        let mut seen = [false; 9];
        for value in cells {
            if value > 8 || std::mem::replace(&mut seen[value as usize], true) {
                return Err(crate::Error::invalid_state(format!(
                    "key '{s}' is not a permutation of 0-8"
                )));
            }
        }
        Ok(StateKey(cells))
    }

    /// Cell values in row-major order.
    pub fn cells(&self) -> &[u8; 9] {
        &self.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for digit in self.0 {
            write!(f, "{digit}")?;
        }
        Ok(())
    }
}

impl FromStr for StateKey {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<StateKey> for String {
    fn from(key: StateKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for StateKey {
    type Error = crate::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}
