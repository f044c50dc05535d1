//! Puzzle state representation and basic operations

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::Move;
use crate::{
    Error, Result,
    types::{Position, StateKey},
};

/// A 3x3 sliding-tile configuration.
///
/// Cells hold the values 0-8 exactly once, in row-major order, with 0 as the
/// blank. The blank index is cached; equality and hashing depend only on the
/// cell contents since the blank is derived from them.
///
/// This type implements `Copy` since it's only 10 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "[u8; 9]", into = "[u8; 9]")]
pub struct PuzzleState {
    cells: [u8; 9],
    blank: u8,
}

/// Check that a grid is 3x3 and holds a permutation of 0..=8.
pub fn is_valid_grid<R: AsRef<[u8]>>(grid: &[R]) -> bool {
    if grid.len() != 3 || grid.iter().any(|row| row.as_ref().len() != 3) {
        return false;
    }
    let mut seen = [false; 9];
    for &value in grid.iter().flat_map(|row| row.as_ref()) {
        if value > 8 || seen[value as usize] {
            return false;
        }
        seen[value as usize] = true;
    }
    true
}

impl PuzzleState {
    /// Canonical goal: 1-8 in reading order with the blank last.
    pub const GOAL: PuzzleState = PuzzleState {
        cells: [1, 2, 3, 4, 5, 6, 7, 8, 0],
        blank: 8,
    };

    /// Create a state from row-major cells.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the cells are not a permutation of 0..=8.
    pub fn new(cells: [u8; 9]) -> Result<Self> {
        let mut seen = [false; 9];
        for (i, &value) in cells.iter().enumerate() {
            if value > 8 {
                return Err(Error::invalid_state(format!(
                    "value {value} at cell {i} is outside 0-8"
                )));
            }
            if seen[value as usize] {
                return Err(Error::invalid_state(format!(
                    "value {value} appears more than once"
                )));
            }
            seen[value as usize] = true;
        }
        let blank = Self::locate_blank(&cells)?;
        Ok(PuzzleState {
            cells,
            blank: blank as u8,
        })
    }

    /// Create a state from three rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the rows are not a permutation of 0..=8.
    pub fn from_rows(rows: [[u8; 3]; 3]) -> Result<Self> {
        let mut cells = [0u8; 9];
        for (r, row) in rows.iter().enumerate() {
            cells[r * 3..r * 3 + 3].copy_from_slice(row);
        }
        Self::new(cells)
    }

    /// Create a state from an arbitrary grid, checking its shape first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the grid is not 3x3 or not a permutation.
    pub fn from_grid<R: AsRef<[u8]>>(grid: &[R]) -> Result<Self> {
        if grid.len() != 3 || grid.iter().any(|row| row.as_ref().len() != 3) {
            return Err(Error::invalid_state("grid must be 3x3"));
        }
        let mut cells = [0u8; 9];
        for (i, &value) in grid.iter().flat_map(|row| row.as_ref()).enumerate() {
            cells[i] = value;
        }
        Self::new(cells)
    }

    /// State from cells already known to be a permutation of 0-8.
    pub(crate) const fn from_permutation(cells: [u8; 9]) -> Self {
        let mut blank = 0;
        while blank < 8 && cells[blank] != 0 {
            blank += 1;
        }
        PuzzleState {
            cells,
            blank: blank as u8,
        }
    }

    /// Default starting position: one move away from the canonical goal.
    pub const fn default_initial() -> Self {
        PuzzleState {
            cells: [1, 2, 3, 4, 5, 6, 7, 0, 8],
            blank: 7,
        }
    }

    /// Index of the single blank cell.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedState`] when zero or several blanks are present.
    pub fn locate_blank(cells: &[u8]) -> Result<usize> {
        let mut blanks = cells.iter().enumerate().filter(|&(_, &v)| v == 0);
        match (blanks.next(), blanks.next()) {
            (Some((idx, _)), None) => Ok(idx),
            _ => Err(Error::MalformedState {
                state: cells.iter().map(|v| v.to_string()).collect(),
                blanks: cells.iter().filter(|&&v| v == 0).count(),
            }),
        }
    }

    /// Cell values in row-major order.
    pub fn cells(&self) -> &[u8; 9] {
        &self.cells
    }

    /// Value at a position.
    pub fn get(&self, pos: Position) -> u8 {
        self.cells[pos.index()]
    }

    /// The three rows of the grid.
    pub fn rows(&self) -> [[u8; 3]; 3] {
        let c = &self.cells;
        [[c[0], c[1], c[2]], [c[3], c[4], c[5]], [c[6], c[7], c[8]]]
    }

    pub fn blank_index(&self) -> usize {
        self.blank as usize
    }

    pub fn blank_position(&self) -> Position {
        Position::from_index_unchecked(self.blank as usize)
    }

    /// Flat index of a tile value.
    pub fn index_of(&self, value: u8) -> Option<usize> {
        self.cells.iter().position(|&v| v == value)
    }

    /// Whether the blank can travel in the given direction.
    pub fn can_move(&self, mv: Move) -> bool {
        mv.target(self.blank as usize).is_some()
    }

    /// Legal moves in canonical order (up, down, left, right).
    pub fn legal_moves(&self) -> impl Iterator<Item = Move> + use<> {
        let blank = self.blank as usize;
        Move::ALL
            .into_iter()
            .filter(move |mv| mv.target(blank).is_some())
    }

    /// Apply a move, returning a new state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalMove`] if the blank would leave the board.
    pub fn apply(&self, mv: Move) -> Result<Self> {
        let target = mv
            .target(self.blank as usize)
            .ok_or_else(|| Error::IllegalMove {
                mv,
                state: self.key().to_string(),
            })?;
        Ok(self.swap_with_blank(target))
    }

    /// Apply a move if legal, otherwise keep the state unchanged.
    pub fn apply_or_stay(&self, mv: Move) -> Self {
        match mv.target(self.blank as usize) {
            Some(target) => self.swap_with_blank(target),
            None => *self,
        }
    }

    /// All `(move, next_state)` pairs in canonical move order.
    pub fn successors(&self) -> Vec<(Move, PuzzleState)> {
        let blank = self.blank as usize;
        Move::ALL
            .into_iter()
            .filter_map(|mv| mv.target(blank).map(|t| (mv, self.swap_with_blank(t))))
            .collect()
    }

    fn swap_with_blank(&self, target: usize) -> Self {
        let mut cells = self.cells;
        cells.swap(self.blank as usize, target);
        PuzzleState {
            cells,
            blank: target as u8,
        }
    }

    /// Swap the contents of two cells. The result is still a valid permutation.
    pub fn with_swapped(&self, a: usize, b: usize) -> Self {
        let mut cells = self.cells;
        cells.swap(a, b);
        let blank = if a == self.blank as usize {
            b
        } else if b == self.blank as usize {
            a
        } else {
            self.blank as usize
        };
        PuzzleState {
            cells,
            blank: blank as u8,
        }
    }

    pub fn is_goal(&self, goal: &PuzzleState) -> bool {
        self.cells == goal.cells
    }

    /// Number of tile pairs out of reading order, ignoring the blank.
    pub fn inversions(&self) -> usize {
        let tiles: Vec<u8> = self.cells.iter().copied().filter(|&v| v != 0).collect();
        tiles
            .iter()
            .enumerate()
            .map(|(i, &a)| tiles[i + 1..].iter().filter(|&&b| a > b).count())
            .sum()
    }

    /// Whether `goal` is reachable from this state.
    ///
    /// On a 3x3 board every move preserves inversion parity, so the two
    /// states must have inversion counts of equal parity.
    pub fn is_solvable(&self, goal: &PuzzleState) -> bool {
        self.inversions() % 2 == goal.inversions() % 2
    }

    pub fn key(&self) -> StateKey {
        StateKey::from_cells(self.cells)
    }

    /// Compact nine-digit form, e.g. `123456780`.
    pub fn compact(&self) -> String {
        self.key().to_string()
    }
}

impl Default for PuzzleState {
    fn default() -> Self {
        Self::GOAL
    }
}

impl TryFrom<[u8; 9]> for PuzzleState {
    type Error = Error;

    fn try_from(cells: [u8; 9]) -> Result<Self> {
        Self::new(cells)
    }
}

impl From<PuzzleState> for [u8; 9] {
    fn from(state: PuzzleState) -> Self {
        state.cells
    }
}

impl TryFrom<StateKey> for PuzzleState {
    type Error = Error;

    fn try_from(key: StateKey) -> Result<Self> {
        Self::new(*key.cells())
    }
}

impl FromStr for PuzzleState {
    type Err = Error;

    /// Parse nine digits, ignoring whitespace and the separators `,`, `/`,
    /// `;`, `|`, `[` and `]`. `"123456708"`, `"1 2 3 / 4 5 6 / 7 0 8"` and
    /// `"[[1,2,3],[4,5,6],[7,0,8]]"` all denote the same state.
    fn from_str(s: &str) -> Result<Self> {
        let mut digits = Vec::with_capacity(9);
        for c in s.chars() {
            if let Some(d) = c.to_digit(10) {
                digits.push(d as u8);
            } else if !(c.is_whitespace() || matches!(c, ',' | '/' | ';' | '|' | '[' | ']')) {
                return Err(Error::invalid_state(format!(
                    "unexpected character '{c}' in '{s}'"
                )));
            }
        }
        let cells: [u8; 9] = digits.try_into().map_err(|d: Vec<u8>| {
            Error::invalid_state(format!("expected 9 digits, got {} in '{s}'", d.len()))
        })?;
        Self::new(cells)
    }
}

impl fmt::Display for PuzzleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.rows().iter().enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            write!(f, "{} {} {}", row[0], row[1], row[2])?;
        }
        Ok(())
    }
}
