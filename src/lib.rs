//! Classical AI search strategies over the 8-puzzle
//!
//! This crate provides:
//! - The 8-puzzle state model with solvability checks and heuristics
//! - Uninformed, informed, local and evolutionary search strategies
//! - AND-OR search over non-deterministic actions and belief-state search
//! - The puzzle as a constraint satisfaction problem (backtracking, AC-3,
//!   min-conflicts)
//! - A tabular Q-learning agent
//! - A solve pipeline with observers and plain-text trace export
//!
//! ```
//! use eight_puzzle::{
//!     ports::NoopObserver,
//!     config::SearchLimits,
//!     search::{PuzzleProblem, astar},
//! };
//!
//! let problem = PuzzleProblem::parse(Some("123405786"), None).unwrap();
//! let result = astar(&problem, &SearchLimits::default(), &mut NoopObserver);
//! assert_eq!(result.steps(), Some(2));
//! ```

pub mod belief;
pub mod cli;
pub mod config;
pub mod csp;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod ports;
pub mod puzzle;
pub mod q_learning;
pub mod search;
pub mod types;
pub mod utils;

pub use error::{Error, Result};
pub use puzzle::{Move, PuzzleState};
pub use types::{Position, StateKey};
