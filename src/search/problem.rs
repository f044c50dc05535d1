//! The search problem contract and its 8-puzzle implementation

use std::{fmt::Debug, hash::Hash};

use crate::{
    Result,
    puzzle::{Heuristic, Move, PuzzleState},
    types::StateKey,
};

/// What a systematic search needs to know about a state space.
pub trait SearchProblem {
    type State: Clone + Eq + Debug;
    type Action: Copy + Debug;
    /// Canonical key used by every visited set and cost table
    type Key: Clone + Eq + Hash;

    fn initial_state(&self) -> Self::State;

    fn is_goal(&self, state: &Self::State) -> bool;

    /// `(action, next_state)` pairs in a fixed, deterministic order.
    fn successors(&self, state: &Self::State) -> Vec<(Self::Action, Self::State)>;

    fn key(&self, state: &Self::State) -> Self::Key;

    fn step_cost(&self, _from: &Self::State, _action: Self::Action, _to: &Self::State) -> u32 {
        1
    }

    fn heuristic(&self, _state: &Self::State) -> u32 {
        0
    }

    /// Whether a goal is reachable at all. Exhaustive strategies return an
    /// unsolvable result without searching when this is false.
    fn is_solvable(&self) -> bool {
        true
    }
}

/// An 8-puzzle instance: start state, goal state and heuristic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleProblem {
    initial: PuzzleState,
    goal: PuzzleState,
    heuristic: Heuristic,
}

impl PuzzleProblem {
    pub fn new(initial: PuzzleState, goal: PuzzleState) -> Self {
        Self {
            initial,
            goal,
            heuristic: Heuristic::default(),
        }
    }

    /// Build a problem from optional textual states, defaulting to the
    /// standard start (`123456708`) and goal (`123456780`).
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidState`] if either string is not a
    /// permutation of 0-8.
    pub fn parse(initial: Option<&str>, goal: Option<&str>) -> Result<Self> {
        let initial = match initial {
            Some(s) => s.parse()?,
            None => PuzzleState::default_initial(),
        };
        let goal = match goal {
            Some(s) => s.parse()?,
            None => PuzzleState::GOAL,
        };
        Ok(Self::new(initial, goal))
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_initial(mut self, initial: PuzzleState) -> Self {
        self.initial = initial;
        self
    }

    pub fn initial(&self) -> &PuzzleState {
        &self.initial
    }

    pub fn goal(&self) -> &PuzzleState {
        &self.goal
    }

    pub fn heuristic_kind(&self) -> Heuristic {
        self.heuristic
    }

    /// Heuristic value of a state against this problem's goal.
    pub fn h(&self, state: &PuzzleState) -> u32 {
        self.heuristic.evaluate(state, &self.goal)
    }
}

impl Default for PuzzleProblem {
    fn default() -> Self {
        Self::new(PuzzleState::default_initial(), PuzzleState::GOAL)
    }
}

impl SearchProblem for PuzzleProblem {
    type State = PuzzleState;
    type Action = Move;
    type Key = StateKey;

    fn initial_state(&self) -> PuzzleState {
        self.initial
    }

    fn is_goal(&self, state: &PuzzleState) -> bool {
        state.is_goal(&self.goal)
    }

    fn successors(&self, state: &PuzzleState) -> Vec<(Move, PuzzleState)> {
        state.successors()
    }

    fn key(&self, state: &PuzzleState) -> StateKey {
        state.key()
    }

    fn heuristic(&self, state: &PuzzleState) -> u32 {
        self.h(state)
    }

    fn is_solvable(&self) -> bool {
        self.initial.is_solvable(&self.goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let problem = PuzzleProblem::parse(None, None).unwrap();
        assert_eq!(problem, PuzzleProblem::default());
        assert!(problem.is_solvable());
        assert_eq!(problem.heuristic(problem.initial()), 1);
    }

    #[test]
    fn test_parse_rejects_invalid_states() {
        assert!(matches!(
            PuzzleProblem::parse(Some("112345678"), None),
            Err(crate::Error::InvalidState { .. })
        ));
        assert!(PuzzleProblem::parse(None, Some("1234")).is_err());
    }

    #[test]
    fn test_misplaced_heuristic_selection() {
        let problem = PuzzleProblem::parse(Some("867254301"), None)
            .unwrap()
            .with_heuristic(Heuristic::Misplaced);
        assert_eq!(problem.heuristic(problem.initial()), 7);
    }
}
