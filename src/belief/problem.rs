//! Belief-space problems and the observation model

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::BeliefState;
use crate::{
    Error, Result,
    puzzle::{Move, PuzzleState},
    types::Position,
};

const fn state(cells: [u8; 9]) -> PuzzleState {
    PuzzleState::from_permutation(cells)
}

const SENSORLESS_INITIAL: [PuzzleState; 2] = [
    state([1, 2, 3, 4, 5, 6, 7, 0, 8]),
    state([1, 2, 3, 4, 5, 0, 7, 8, 6]),
];

/// The canonical goal and four variants with one pair of tiles swapped.
const SENSORLESS_GOALS: [PuzzleState; 5] = [
    state([1, 2, 3, 4, 5, 6, 7, 8, 0]),
    state([1, 2, 3, 4, 5, 6, 8, 7, 0]),
    state([1, 2, 3, 4, 6, 5, 7, 8, 0]),
    state([1, 3, 2, 4, 5, 6, 7, 8, 0]),
    state([1, 2, 3, 7, 5, 6, 4, 8, 0]),
];

const PARTIAL_INITIAL: [PuzzleState; 5] = [
    state([1, 2, 3, 4, 5, 6, 7, 8, 0]),
    state([1, 2, 3, 4, 0, 6, 7, 5, 8]),
    state([1, 2, 3, 0, 4, 6, 7, 5, 8]),
    state([0, 2, 3, 1, 4, 6, 7, 5, 8]),
    state([1, 0, 3, 4, 2, 6, 7, 5, 8]),
];

/// A single observed cell of the goal configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Observation {
    pub position: Position,
    pub value: u8,
}

impl Observation {
    pub fn new(position: Position, value: u8) -> Result<Self> {
        if value > 8 {
            return Err(Error::invalid_state(format!("observed value {value} is not a tile")));
        }
        Ok(Self { position, value })
    }

    /// Goal configurations consistent with the observation.
    ///
    /// Starts from the canonical goal, with the observed value swapped into
    /// place if needed, then adds variants that leave the observed cell
    /// alone: two tile swaps, both swaps together, and the blank moved to a
    /// neighbouring cell. Duplicates are removed, first occurrence wins.
    pub fn goal_states(&self) -> Vec<PuzzleState> {
        let known = self.position.index();
        let mut base = PuzzleState::GOAL;
        if let Some(at) = base.index_of(self.value)
            && at != known
        {
            base = base.with_swapped(at, known);
        }

        let swappable: Vec<usize> = (0..9)
            .filter(|&i| i != known && base.cells()[i] != 0)
            .collect();
        let first = base.with_swapped(swappable[0], swappable[1]);
        let second = base.with_swapped(swappable[2], swappable[3]);
        let both = first.with_swapped(swappable[2], swappable[3]);

        let blank = base.blank_index();
        let shifted = [Move::Right, Move::Down, Move::Left, Move::Up]
            .into_iter()
            .filter_map(|mv| mv.target(blank))
            .find(|&target| blank != known && target != known)
            .map_or(base, |target| base.with_swapped(blank, target));

        let mut goals = Vec::with_capacity(5);
        for goal in [base, first, second, both, shifted] {
            if !goals.contains(&goal) {
                goals.push(goal);
            }
        }
        goals
    }
}

impl Default for Observation {
    /// Tile 1 seen in the top-left corner.
    fn default() -> Self {
        Self {
            position: Position::from_index_unchecked(0),
            value: 1,
        }
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}={}", self.position.row(), self.position.col(), self.value)
    }
}

/// Parses `row,col=value` or `index=value`.
impl FromStr for Observation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || Error::ParseObservation { input: s.to_string() };
        let (cell, value) = s.split_once('=').ok_or_else(malformed)?;
        let value: u8 = value.trim().parse().map_err(|_| malformed())?;
        let numbers: Vec<usize> = cell
            .split(',')
            .map(|part| part.trim().parse().map_err(|_| malformed()))
            .collect::<Result<_>>()?;
        let position = match numbers[..] {
            [index] => Position::from_index(index)?,
            [row, col] => Position::new(row, col)?,
            _ => return Err(malformed()),
        };
        Self::new(position, value)
    }
}

/// Where a belief-space search starts and which states count as goals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeliefProblem {
    initial: BeliefState,
    goals: BeliefState,
}

impl BeliefProblem {
    pub fn new(initial: BeliefState, goals: BeliefState) -> Result<Self> {
        if initial.is_empty() || goals.is_empty() {
            return Err(Error::invalid_state(
                "belief problems need at least one initial and one goal state",
            ));
        }
        Ok(Self { initial, goals })
    }

    /// No observations: two possible starting states, five acceptable goals.
    pub fn sensorless() -> Self {
        Self {
            initial: BeliefState::new(SENSORLESS_INITIAL),
            goals: BeliefState::new(SENSORLESS_GOALS),
        }
    }

    /// Five possible starting states, goals derived from `observation`.
    pub fn partial(observation: Observation) -> Self {
        Self {
            initial: BeliefState::new(PARTIAL_INITIAL),
            goals: BeliefState::new(observation.goal_states()),
        }
    }

    pub fn initial(&self) -> &BeliefState {
        &self.initial
    }

    pub fn goals(&self) -> &BeliefState {
        &self.goals
    }
}

impl Default for BeliefProblem {
    fn default() -> Self {
        Self::sensorless()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> PuzzleState {
        text.parse().unwrap()
    }

    #[test]
    fn test_default_scenarios() {
        let sensorless = BeliefProblem::sensorless();
        assert_eq!(sensorless.initial().len(), 2);
        assert_eq!(sensorless.goals().len(), 5);
        assert!(sensorless.goals().contains(&PuzzleState::GOAL));

        let observation = "0,0=1".parse().unwrap();
        let partial = BeliefProblem::partial(observation);
        assert_eq!(partial.initial().len(), 5);
    }

    #[test]
    fn test_goals_for_matching_observation() {
        let observation: Observation = "0,0=1".parse().unwrap();
        let goals = observation.goal_states();
        assert_eq!(
            goals,
            vec![s("123456780"), s("132456780"), s("123546780"), s("132546780"), s("123456708")]
        );
    }

    #[test]
    fn test_goals_keep_observed_cell() {
        for index in 0..9 {
            for value in 0..9 {
                let position = Position::from_index(index).unwrap();
                let observation = Observation::new(position, value).unwrap();
                let goals = observation.goal_states();
                assert!(!goals.is_empty() && goals.len() <= 5);
                for goal in &goals {
                    assert_eq!(goal.cells()[index], value, "{observation} -> {}", goal.compact());
                }
                let unique: std::collections::HashSet<_> = goals.iter().collect();
                assert_eq!(unique.len(), goals.len());
            }
        }
    }

    #[test]
    fn test_observation_parsing() {
        let a: Observation = "2,2=0".parse().unwrap();
        let b: Observation = "8=0".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "2,2=0");
        assert!("3,0=1".parse::<Observation>().is_err());
        assert!("0,0=9".parse::<Observation>().is_err());
        assert!("0,0".parse::<Observation>().is_err());
        assert!("a=1".parse::<Observation>().is_err());
    }

    #[test]
    fn test_empty_beliefs_are_rejected() {
        let goals = BeliefState::new([PuzzleState::GOAL]);
        assert!(BeliefProblem::new(BeliefState::default(), goals).is_err());
    }
}
