//! Common test utilities for the eight-puzzle test suite.
//!
//! Fixture states with known optimal depths, path legality checks and a
//! brute-force reachability oracle.

#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};

use eight_puzzle::{
    Move, PuzzleState,
    search::{PuzzleProblem, SearchResult},
};

/// Instances with their optimal solution length to the canonical goal.
pub const FIXTURES: &[(&str, usize)] = &[
    ("123456708", 1),
    ("123405786", 2),
    ("023145786", 4),
    ("413726580", 8),
    ("436718520", 12),
    ("813402765", 14),
    ("724506831", 20),
    ("867254301", 31),
];

/// Opposite inversion parity to the canonical goal.
pub const UNSOLVABLE: &str = "213456780";

pub fn state(s: &str) -> PuzzleState {
    s.parse().expect("fixture state")
}

pub fn problem(initial: &str) -> PuzzleProblem {
    PuzzleProblem::new(state(initial), PuzzleState::GOAL)
}

/// Fixtures no deeper than `max_depth`.
pub fn fixtures_up_to(max_depth: usize) -> impl Iterator<Item = (PuzzleState, usize)> {
    FIXTURES
        .iter()
        .filter(move |&&(_, depth)| depth <= max_depth)
        .map(|&(s, depth)| (state(s), depth))
}

/// Panics unless `path` starts at the problem's initial state, ends at its
/// goal and links consecutive states by exactly one legal move.
pub fn assert_legal_path(problem: &PuzzleProblem, path: &[PuzzleState]) {
    assert_eq!(path.first(), Some(problem.initial()), "path must start at the initial state");
    assert_eq!(path.last(), Some(problem.goal()), "path must end at the goal");
    for pair in path.windows(2) {
        let mv = Move::between(&pair[0], &pair[1]);
        assert!(
            mv.is_some(),
            "no legal move links {} and {}",
            pair[0].compact(),
            pair[1].compact()
        );
    }
}

/// Checks a search result: a found path must be legal.
pub fn assert_legal_result(problem: &PuzzleProblem, result: &SearchResult<PuzzleState>) {
    if let Some(path) = &result.path {
        assert_legal_path(problem, path);
        assert!(result.failure.is_none());
    } else {
        assert!(result.failure.is_some(), "a failed search must say why");
    }
}

/// Every state reachable from `start`, by plain breadth-first enumeration.
pub fn reachable_from(start: PuzzleState) -> HashSet<PuzzleState> {
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        for (_, next) in current.successors() {
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

/// Apply moves in order, failing on the first illegal one.
pub fn replay(start: PuzzleState, moves: &[Move]) -> Option<PuzzleState> {
    moves
        .iter()
        .try_fold(start, |current, &mv| current.apply(mv).ok())
}
