//! Reward model for a single move

use crate::puzzle::PuzzleState;

/// Reward for reaching the goal
pub const GOAL_REWARD: f64 = 100.0;
/// Reward per cell that moves into its goal position
pub const PROGRESS_REWARD: f64 = 10.0;
/// Penalty per cell that leaves its goal position
pub const REGRESSION_PENALTY: f64 = 5.0;
/// Penalty for a move that changes nothing about the placement count
pub const STALL_PENALTY: f64 = 1.0;
/// Placement count from which stalling is no longer penalized
pub const NEAR_GOAL_CORRECT: usize = 7;

/// Cells (blank included) holding the same value as in `goal`.
pub fn correct_cells(state: &PuzzleState, goal: &PuzzleState) -> usize {
    state
        .cells()
        .iter()
        .zip(goal.cells())
        .filter(|(a, b)| a == b)
        .count()
}

/// Reward for moving from `before` to `after`.
///
/// # Examples
///
/// ```
/// use eight_puzzle::{puzzle::PuzzleState, q_learning::reward};
///
/// let goal = PuzzleState::GOAL;
/// let before: PuzzleState = "123456708".parse().unwrap();
/// assert_eq!(reward(&before, &goal, &goal), 100.0);
/// ```
pub fn reward(before: &PuzzleState, after: &PuzzleState, goal: &PuzzleState) -> f64 {
    if after == goal {
        return GOAL_REWARD;
    }
    let correct_before = correct_cells(before, goal);
    let correct_after = correct_cells(after, goal);
    match correct_after.cmp(&correct_before) {
        std::cmp::Ordering::Greater => PROGRESS_REWARD * (correct_after - correct_before) as f64,
        std::cmp::Ordering::Less => -REGRESSION_PENALTY * (correct_before - correct_after) as f64,
        std::cmp::Ordering::Equal if correct_after >= NEAR_GOAL_CORRECT => 0.0,
        std::cmp::Ordering::Equal => -STALL_PENALTY,
    }
}
