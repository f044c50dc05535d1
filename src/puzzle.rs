//! 8-puzzle state model

pub mod generate;
pub mod heuristics;
pub mod moves;
pub mod state;

pub use heuristics::{Heuristic, manhattan_distance, misplaced_tiles};
pub use moves::{Move, moves_of_path};
pub use state::{PuzzleState, is_valid_grid};
