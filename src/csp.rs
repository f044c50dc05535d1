//! The puzzle board as a constraint satisfaction problem
//!
//! Variables are the nine cells, values are the digits 0-8, and the single
//! constraint is all-different. A solution is therefore any arrangement of
//! the nine tiles; the interest lies in how each solver gets there.

mod ac3;
mod assignment;
mod backtracking;
mod min_conflicts;

pub use ac3::ac3;
pub use assignment::{Assignment, Domains};
pub use backtracking::{backtracking_search, backtracking_with_ac3};
pub use min_conflicts::{conflict_count, min_conflicts};

use serde::Serialize;

use crate::search::Failure;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CspStats {
    /// Calls into the recursive search, or min-conflicts iterations
    pub states_explored: usize,
    pub backtracks: usize,
    /// Values removed from domains by AC-3
    pub domain_updates: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CspResult {
    pub assignment: Option<Assignment>,
    pub stats: CspStats,
    pub failure: Option<Failure>,
}

impl CspResult {
    pub fn is_success(&self) -> bool {
        self.assignment.is_some()
    }
}
