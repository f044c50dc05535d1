//! Distance estimates between puzzle states

use serde::{Deserialize, Serialize};

use super::PuzzleState;

/// Sum over tiles 1-8 of the row and column distance to the tile's goal cell.
///
/// Admissible: every move shifts exactly one tile by one cell.
pub fn manhattan_distance(state: &PuzzleState, goal: &PuzzleState) -> u32 {
    let mut goal_index = [0usize; 9];
    for (i, &v) in goal.cells().iter().enumerate() {
        goal_index[v as usize] = i;
    }
    state
        .cells()
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v != 0)
        .map(|(i, &v)| {
            let g = goal_index[v as usize];
            ((i / 3).abs_diff(g / 3) + (i % 3).abs_diff(g % 3)) as u32
        })
        .sum()
}

/// Number of tiles 1-8 not on their goal cell.
pub fn misplaced_tiles(state: &PuzzleState, goal: &PuzzleState) -> u32 {
    state
        .cells()
        .iter()
        .zip(goal.cells())
        .filter(|&(&v, &g)| v != 0 && v != g)
        .count() as u32
}

/// Heuristic used by the informed and local strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Heuristic {
    #[default]
    Manhattan,
    Misplaced,
}

impl Heuristic {
    pub fn evaluate(self, state: &PuzzleState, goal: &PuzzleState) -> u32 {
        match self {
            Heuristic::Manhattan => manhattan_distance(state, goal),
            Heuristic::Misplaced => misplaced_tiles(state, goal),
        }
    }
}
