//! Search in non-deterministic and partially observable environments
//!
//! - [`and_or_search`] builds a conditional [`Plan`] when moves can slip or
//!   overshoot, as described by an [`ActuationModel`].
//! - [`sensorless_search`] and [`partial_observation_search`] run
//!   breadth-first over [`BeliefState`]s and return a single move sequence
//!   that works from every state the agent considers possible.

mod and_or;
mod outcome;
mod plan;
mod problem;
mod search;
mod state;

pub use and_or::{AndOrResult, and_or_search};
pub use outcome::{ActuationModel, Outcome, OutcomeKind};
pub use plan::Plan;
pub use problem::{BeliefProblem, Observation};
pub use search::{
    BeliefSearchResult, BeliefSearchStats, partial_observation_search, sensorless_search,
};
pub use state::BeliefState;
