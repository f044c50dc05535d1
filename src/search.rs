//! Search strategies over puzzle state spaces
//!
//! The systematic strategies (uninformed and informed) are generic over
//! [`SearchProblem`]; the local and evolutionary strategies work directly on
//! [`PuzzleProblem`] since they need the move model to perturb states.

pub mod annealing;
pub mod beam;
mod frontier;
pub mod genetic;
pub mod hill_climbing;
pub mod informed;
pub mod node;
pub mod problem;
pub mod result;
pub mod stochastic;
pub mod uninformed;

pub use annealing::simulated_annealing;
pub use beam::beam_search;
pub use genetic::{Chromosome, genetic_algorithm};
pub use hill_climbing::{simple_hill_climbing, steepest_ascent_hill_climbing};
pub use informed::{astar, greedy_best_first, ida_star};
pub use node::Node;
pub use problem::{PuzzleProblem, SearchProblem};
pub use result::{Failure, SearchResult};
pub use stochastic::stochastic_hill_climbing;
pub use uninformed::{
    breadth_first_search, depth_first_search, iterative_deepening_search, uniform_cost_search,
};
