//! Catalogue of runnable strategies

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Every strategy the solve pipeline can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    Bfs,
    Dfs,
    Ids,
    Ucs,
    Greedy,
    AStar,
    IdaStar,
    SimpleHillClimbing,
    SteepestHillClimbing,
    Beam,
    Annealing,
    StochasticHillClimbing,
    Genetic,
    AndOr,
    Sensorless,
    PartialObservation,
    Backtracking,
    Ac3,
    MinConflicts,
    QLearning,
}

/// What a strategy hands back on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionKind {
    /// Sequence of states from the initial state to the goal
    Path,
    /// Conditional plan over non-deterministic outcomes
    Plan,
    /// Move sequence applied to a whole belief state
    Actions,
    /// Complete variable assignment
    Assignment,
}

impl Algorithm {
    pub const ALL: [Algorithm; 20] = [
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::Ids,
        Algorithm::Ucs,
        Algorithm::Greedy,
        Algorithm::AStar,
        Algorithm::IdaStar,
        Algorithm::SimpleHillClimbing,
        Algorithm::SteepestHillClimbing,
        Algorithm::Beam,
        Algorithm::Annealing,
        Algorithm::StochasticHillClimbing,
        Algorithm::Genetic,
        Algorithm::AndOr,
        Algorithm::Sensorless,
        Algorithm::PartialObservation,
        Algorithm::Backtracking,
        Algorithm::Ac3,
        Algorithm::MinConflicts,
        Algorithm::QLearning,
    ];

    /// Name used in reports
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Bfs => "Breadth-First Search",
            Algorithm::Dfs => "Depth-First Search",
            Algorithm::Ids => "Iterative Deepening Search",
            Algorithm::Ucs => "Uniform Cost Search",
            Algorithm::Greedy => "Greedy Best-First",
            Algorithm::AStar => "A* Search",
            Algorithm::IdaStar => "IDA* Search",
            Algorithm::SimpleHillClimbing => "Simple Hill Climbing",
            Algorithm::SteepestHillClimbing => "Steepest-Ascent Hill Climbing",
            Algorithm::Beam => "Beam Search",
            Algorithm::Annealing => "Simulated Annealing",
            Algorithm::StochasticHillClimbing => "Stochastic Hill Climbing",
            Algorithm::Genetic => "Genetic Algorithm",
            Algorithm::AndOr => "AND-OR Search",
            Algorithm::Sensorless => "Sensorless Search",
            Algorithm::PartialObservation => "Partial Observation Search",
            Algorithm::Backtracking => "Backtracking",
            Algorithm::Ac3 => "AC-3 Search",
            Algorithm::MinConflicts => "Min-Conflicts Search",
            Algorithm::QLearning => "Q-Learning",
        }
    }

    /// Short label accepted on the command line
    pub fn label(&self) -> &'static str {
        match self {
            Algorithm::Bfs => "bfs",
            Algorithm::Dfs => "dfs",
            Algorithm::Ids => "ids",
            Algorithm::Ucs => "ucs",
            Algorithm::Greedy => "greedy",
            Algorithm::AStar => "astar",
            Algorithm::IdaStar => "idastar",
            Algorithm::SimpleHillClimbing => "simple-hc",
            Algorithm::SteepestHillClimbing => "steepest-hc",
            Algorithm::Beam => "beam",
            Algorithm::Annealing => "annealing",
            Algorithm::StochasticHillClimbing => "stochastic-hc",
            Algorithm::Genetic => "genetic",
            Algorithm::AndOr => "and-or",
            Algorithm::Sensorless => "sensorless",
            Algorithm::PartialObservation => "partial",
            Algorithm::Backtracking => "backtracking",
            Algorithm::Ac3 => "ac3",
            Algorithm::MinConflicts => "min-conflicts",
            Algorithm::QLearning => "q-learning",
        }
    }

    pub fn solution_kind(&self) -> SolutionKind {
        match self {
            Algorithm::AndOr => SolutionKind::Plan,
            Algorithm::Sensorless | Algorithm::PartialObservation => SolutionKind::Actions,
            Algorithm::Backtracking | Algorithm::Ac3 | Algorithm::MinConflicts => {
                SolutionKind::Assignment
            }
            _ => SolutionKind::Path,
        }
    }

    /// Whether the strategy draws on the random generator.
    pub fn is_stochastic(&self) -> bool {
        matches!(
            self,
            Algorithm::Annealing
                | Algorithm::StochasticHillClimbing
                | Algorithm::Genetic
                | Algorithm::Backtracking
                | Algorithm::Ac3
                | Algorithm::MinConflicts
                | Algorithm::QLearning
        )
    }

    /// Whether the strategy ignores the problem's initial and goal states.
    ///
    /// Belief searches run on their fixed belief scenarios and the CSP
    /// strategies fill an empty board.
    pub fn uses_fixed_scenario(&self) -> bool {
        matches!(
            self.solution_kind(),
            SolutionKind::Actions | SolutionKind::Assignment
        )
    }

    fn expected_labels() -> String {
        Self::ALL
            .iter()
            .map(|a| a.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_ascii_lowercase().replace('_', "-");
        let alias = match normalised.as_str() {
            "a*" | "a-star" => Some(Algorithm::AStar),
            "ida*" | "ida-star" => Some(Algorithm::IdaStar),
            "steepest-ascent" => Some(Algorithm::SteepestHillClimbing),
            "partial-observation" => Some(Algorithm::PartialObservation),
            "qlearning" => Some(Algorithm::QLearning),
            _ => None,
        };
        alias
            .or_else(|| {
                Self::ALL
                    .into_iter()
                    .find(|a| a.label() == normalised || a.name().eq_ignore_ascii_case(s.trim()))
            })
            .ok_or_else(|| crate::Error::ParseAlgorithm {
                input: s.to_string(),
                expected: Self::expected_labels(),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_catalogue_is_complete_and_unique() {
        let labels: HashSet<_> = Algorithm::ALL.iter().map(|a| a.label()).collect();
        let names: HashSet<_> = Algorithm::ALL.iter().map(|a| a.name()).collect();
        assert_eq!(labels.len(), 20);
        assert_eq!(names.len(), 20);
    }

    #[test]
    fn test_labels_and_names_parse() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.label().parse::<Algorithm>().unwrap(), algorithm);
            assert_eq!(algorithm.name().parse::<Algorithm>().unwrap(), algorithm);
        }
        assert_eq!("A*".parse::<Algorithm>().unwrap(), Algorithm::AStar);
        assert_eq!(" Min_Conflicts ".parse::<Algorithm>().unwrap(), Algorithm::MinConflicts);
    }

    #[test]
    fn test_unknown_algorithm_lists_expected() {
        let err = "dijkstra".parse::<Algorithm>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("dijkstra"));
        assert!(message.contains("q-learning"));
    }

    #[test]
    fn test_solution_kinds() {
        assert_eq!(Algorithm::AStar.solution_kind(), SolutionKind::Path);
        assert_eq!(Algorithm::AndOr.solution_kind(), SolutionKind::Plan);
        assert_eq!(Algorithm::Sensorless.solution_kind(), SolutionKind::Actions);
        assert_eq!(Algorithm::Ac3.solution_kind(), SolutionKind::Assignment);
        assert!(Algorithm::Ac3.uses_fixed_scenario());
        assert!(!Algorithm::QLearning.uses_fixed_scenario());
    }
}
