//! Assignments and domains over the nine board cells

use std::{collections::BTreeSet, fmt};

use crate::{puzzle::PuzzleState, types::Position};

/// Partial mapping from cells to digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Assignment([Option<u8>; 9]);

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: [u8; 9]) -> Self {
        Self(values.map(Some))
    }

    pub fn get(&self, pos: Position) -> Option<u8> {
        self.0[pos.index()]
    }

    pub fn assign(&mut self, pos: Position, value: u8) {
        self.0[pos.index()] = Some(value);
    }

    pub fn unassign(&mut self, pos: Position) {
        self.0[pos.index()] = None;
    }

    pub fn assigned(&self) -> usize {
        self.0.iter().flatten().count()
    }

    pub fn unassigned(&self) -> impl Iterator<Item = Position> + '_ {
        (0..9)
            .filter(|&i| self.0[i].is_none())
            .map(Position::from_index_unchecked)
    }

    pub fn is_complete(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }

    /// No digit is used twice.
    pub fn is_consistent(&self) -> bool {
        let mut seen = [false; 9];
        for &value in self.0.iter().flatten() {
            let Some(slot) = seen.get_mut(value as usize) else {
                return false;
            };
            if *slot {
                return false;
            }
            *slot = true;
        }
        true
    }

    /// Complete and a bijection onto 0-8.
    pub fn is_solution(&self) -> bool {
        self.is_complete() && self.is_consistent()
    }

    pub fn values(&self) -> &[Option<u8>; 9] {
        &self.0
    }

    /// The board this assignment describes, once it is a solution.
    pub fn to_state(&self) -> Option<PuzzleState> {
        let mut cells = [0u8; 9];
        for (cell, value) in cells.iter_mut().zip(self.0) {
            *cell = value?;
        }
        PuzzleState::new(cells).ok()
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(if i % 3 == 0 { "\n" } else { " " })?;
            }
            match value {
                Some(v) => write!(f, "{v}")?,
                None => f.write_str(".")?,
            }
        }
        Ok(())
    }
}

/// Candidate digits for each cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domains([BTreeSet<u8>; 9]);

impl Domains {
    /// Every cell may take any digit.
    pub fn full() -> Self {
        Self(std::array::from_fn(|_| (0..9).collect()))
    }

    /// Starting domains for the AC-3 solver: the corners and the centre are
    /// restricted, the edge cells are free.
    pub fn initial() -> Self {
        let mut domains = Self::full();
        let restricted: [(usize, &[u8]); 5] = [
            (0, &[1, 2, 3, 4, 5, 6, 7, 8]),
            (2, &[2, 3, 5, 6, 8]),
            (6, &[4, 6, 7, 8]),
            (8, &[0, 5, 6, 8]),
            (4, &[0, 1, 2, 3, 4, 5, 7, 8]),
        ];
        for (index, values) in restricted {
            domains.0[index] = values.iter().copied().collect();
        }
        domains
    }

    pub fn get(&self, pos: Position) -> &BTreeSet<u8> {
        &self.0[pos.index()]
    }

    pub fn set(&mut self, pos: Position, values: impl IntoIterator<Item = u8>) {
        self.0[pos.index()] = values.into_iter().collect();
    }

    pub(crate) fn get_mut(&mut self, pos: Position) -> &mut BTreeSet<u8> {
        &mut self.0[pos.index()]
    }

    pub fn len(&self, pos: Position) -> usize {
        self.0[pos.index()].len()
    }

    /// Total number of candidate values over all cells.
    pub fn total(&self) -> usize {
        self.0.iter().map(BTreeSet::len).sum()
    }
}

impl Default for Domains {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Display for Domains {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, domain) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(if i % 3 == 0 { "\n" } else { " " })?;
            }
            let digits: String = domain.iter().map(|d| char::from(b'0' + d)).collect();
            write!(f, "{{{digits}}}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(r: usize, c: usize) -> Position {
        Position::new(r, c).unwrap()
    }

    #[test]
    fn test_assignment_lifecycle() {
        let mut a = Assignment::new();
        assert_eq!(a.assigned(), 0);
        a.assign(pos(0, 0), 3);
        a.assign(pos(1, 1), 3);
        assert!(!a.is_consistent());
        a.unassign(pos(1, 1));
        assert!(a.is_consistent());
        assert_eq!(a.unassigned().count(), 8);
        assert!(!a.is_complete());
        assert_eq!(a.to_state(), None);
    }

    #[test]
    fn test_solution_maps_to_state() {
        let a = Assignment::from_values([1, 2, 3, 4, 5, 6, 7, 8, 0]);
        assert!(a.is_solution());
        assert_eq!(a.to_state(), Some(PuzzleState::GOAL));
        assert_eq!(a.to_string(), "1 2 3\n4 5 6\n7 8 0");

        let dup = Assignment::from_values([1, 1, 3, 4, 5, 6, 7, 8, 0]);
        assert!(dup.is_complete());
        assert!(!dup.is_solution());
    }

    #[test]
    fn test_initial_domains() {
        let d = Domains::initial();
        assert_eq!(d.len(pos(0, 0)), 8);
        assert_eq!(d.get(pos(0, 2)).iter().copied().collect::<Vec<_>>(), vec![2, 3, 5, 6, 8]);
        assert_eq!(d.len(pos(2, 0)), 4);
        assert_eq!(d.len(pos(2, 2)), 4);
        assert!(!d.get(pos(1, 1)).contains(&6));
        assert_eq!(d.len(pos(0, 1)), 9);
        assert_eq!(Domains::full().total(), 81);
    }
}
