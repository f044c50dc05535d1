//! Blank-tile moves

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::PuzzleState;

/// Direction the blank tile travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// All moves in canonical order. Every strategy enumerates successors in
    /// this order, so ties are broken the same way everywhere.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Row and column offset of the blank.
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
        }
    }

    /// The move that undoes this one.
    pub const fn inverse(self) -> Move {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }

    /// Index into [`Move::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Move::Up => 0,
            Move::Down => 1,
            Move::Left => 2,
            Move::Right => 3,
        }
    }

    /// Cell the blank lands on when this move is made from `blank`, if in bounds.
    pub(crate) fn target(self, blank: usize) -> Option<usize> {
        let (dr, dc) = self.delta();
        let row = (blank / 3).checked_add_signed(dr)?;
        let col = (blank % 3).checked_add_signed(dc)?;
        (row < 3 && col < 3).then_some(row * 3 + col)
    }

    /// The move that turns `from` into `to`, if they are one move apart.
    pub fn between(from: &PuzzleState, to: &PuzzleState) -> Option<Move> {
        from.successors()
            .into_iter()
            .find_map(|(mv, next)| (next == *to).then_some(mv))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Move::Up => "UP",
            Move::Down => "DOWN",
            Move::Left => "LEFT",
            Move::Right => "RIGHT",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Move {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "u" => Ok(Move::Up),
            "down" | "d" => Ok(Move::Down),
            "left" | "l" => Ok(Move::Left),
            "right" | "r" => Ok(Move::Right),
            _ => Err(crate::Error::ParseMove {
                input: s.to_string(),
            }),
        }
    }
}

/// Moves connecting consecutive states of a path.
///
/// Returns `None` if two consecutive states are not one legal move apart.
pub fn moves_of_path(path: &[PuzzleState]) -> Option<Vec<Move>> {
    path.windows(2)
        .map(|pair| Move::between(&pair[0], &pair[1]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_is_involution() {
        for mv in Move::ALL {
            assert_eq!(mv.inverse().inverse(), mv);
            assert_ne!(mv.inverse(), mv);
        }
    }

    #[test]
    fn test_targets_at_corner_and_center() {
        assert_eq!(Move::Up.target(0), None);
        assert_eq!(Move::Left.target(0), None);
        assert_eq!(Move::Down.target(0), Some(3));
        assert_eq!(Move::Right.target(0), Some(1));
        assert_eq!(Move::Up.target(4), Some(1));
        assert_eq!(Move::Left.target(3), None);
        assert_eq!(Move::Right.target(5), None);
        assert_eq!(Move::Down.target(8), None);
    }

    #[test]
    fn test_parse_moves() {
        assert_eq!("RIGHT".parse::<Move>().unwrap(), Move::Right);
        assert_eq!("u".parse::<Move>().unwrap(), Move::Up);
        assert!("north".parse::<Move>().is_err());
    }

    #[test]
    fn test_moves_of_path() {
        let start = PuzzleState::default_initial();
        let next = start.apply(Move::Right).unwrap();
        assert_eq!(moves_of_path(&[start, next]), Some(vec![Move::Right]));
        assert_eq!(moves_of_path(&[start, start]), None);
        assert_eq!(moves_of_path(&[start]), Some(Vec::new()));
    }
}
