//! Tabular Q-learning
//!
//! The agent learns state-action values over the puzzle graph by playing
//! episodes from random scrambles of the goal, using the off-policy update
//!
//! Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
//!
//! Rewards favour moves that put cells into their goal position; see
//! [`reward()`].
//!
//! ## Usage Example
//!
//! ```no_run
//! use eight_puzzle::{
//!     config::QLearningConfig, ports::NoopObserver, puzzle::PuzzleState,
//!     q_learning::QLearningAgent,
//! };
//!
//! let mut agent = QLearningAgent::new(QLearningConfig::default()).with_seed(7);
//! let stats = agent.train(1000, &mut NoopObserver);
//! println!("success rate {:.2}", stats.success_rate);
//!
//! let start: PuzzleState = "123405786".parse().unwrap();
//! let result = agent.solve(&start, &mut NoopObserver);
//! println!("solved: {}", result.is_success());
//! ```

pub mod agent;
pub mod q_table;
pub mod reward;

pub use agent::{EpisodeOutcome, QLearningAgent, TrainingStats};
pub use q_table::QTable;
pub use reward::{correct_cells, reward};
