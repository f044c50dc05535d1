//! Outcomes shared by the path-returning strategies

use std::fmt;

use log::info;
use serde::{Deserialize, Serialize};

/// Why a strategy stopped without a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Failure {
    /// Start and goal have different inversion parity; nothing was searched
    Unsolvable,
    /// The frontier emptied without reaching the goal
    Exhausted,
    /// Every branch hit the depth cutoff
    DepthLimit,
    NodeLimit,
    /// No neighbour improves on the current state
    LocalOptimum,
    IterationLimit,
    /// Annealing temperature fell below its floor
    Frozen,
    TimeLimit,
}

impl Failure {
    /// Whether the failure is a budget running out rather than a proof that
    /// no solution exists in the searched space.
    pub fn is_budget(&self) -> bool {
        matches!(
            self,
            Failure::DepthLimit
                | Failure::NodeLimit
                | Failure::IterationLimit
                | Failure::Frozen
                | Failure::TimeLimit
        )
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Failure::Unsolvable => "instance is unsolvable",
            Failure::Exhausted => "search space exhausted",
            Failure::DepthLimit => "depth limit reached",
            Failure::NodeLimit => "node limit reached",
            Failure::LocalOptimum => "stuck at a local optimum",
            Failure::IterationLimit => "iteration limit reached",
            Failure::Frozen => "temperature dropped below its floor",
            Failure::TimeLimit => "time limit reached",
        };
        f.write_str(text)
    }
}

/// Path from the initial state to a goal, or the reason there is none.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<S> {
    /// Full state sequence, initial and goal inclusive
    pub path: Option<Vec<S>>,
    /// Nodes generated, the initial node included
    pub nodes_explored: usize,
    pub failure: Option<Failure>,
}

impl<S> SearchResult<S> {
    pub fn solved(path: Vec<S>, nodes_explored: usize) -> Self {
        Self {
            path: Some(path),
            nodes_explored,
            failure: None,
        }
    }

    pub fn failed(failure: Failure, nodes_explored: usize) -> Self {
        Self {
            path: None,
            nodes_explored,
            failure: Some(failure),
        }
    }

    /// Parity mismatch detected up front: no path, zero nodes.
    pub fn unsolvable() -> Self {
        Self::failed(Failure::Unsolvable, 0)
    }

    pub fn is_success(&self) -> bool {
        self.path.is_some()
    }

    /// Number of moves in the path.
    pub fn steps(&self) -> Option<usize> {
        self.path.as_ref().map(|p| p.len().saturating_sub(1))
    }

    pub fn into_parts(self) -> (Option<Vec<S>>, usize) {
        (self.path, self.nodes_explored)
    }

    pub(crate) fn logged(self, algorithm: &str) -> Self {
        match (&self.path, self.failure) {
            (Some(path), _) => info!(
                "{algorithm}: solved in {} moves, {} nodes explored",
                path.len().saturating_sub(1),
                self.nodes_explored
            ),
            (None, Some(failure)) => info!(
                "{algorithm}: no solution ({failure}), {} nodes explored",
                self.nodes_explored
            ),
            (None, None) => {
                info!("{algorithm}: no solution, {} nodes explored", self.nodes_explored)
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsolvable_has_no_nodes() {
        let result = SearchResult::<u8>::unsolvable();
        assert!(!result.is_success());
        assert_eq!(result.into_parts(), (None, 0));
    }

    #[test]
    fn test_steps_counts_moves() {
        let result = SearchResult::solved(vec![1, 2, 3], 7);
        assert_eq!(result.steps(), Some(2));
        assert!(result.failure.is_none());
    }

    #[test]
    fn test_budget_classification() {
        assert!(Failure::TimeLimit.is_budget());
        assert!(!Failure::Unsolvable.is_budget());
        assert!(!Failure::Exhausted.is_budget());
    }
}
