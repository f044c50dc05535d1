//! Solve and training pipeline abstractions
//!
//! This module provides composable pipelines for:
//! - Running any catalogued strategy on a problem with timing and seeding
//! - Training the Q-learning agent
//! - Recording observations during a run

pub mod algorithm;
pub mod observers;
pub mod solve;
pub mod training;

pub use algorithm::{Algorithm, SolutionKind};
pub use observers::{
    LoggingObserver, ProgressObserver, RecordedStep, RecordedSteps, RecordingObserver,
};
pub use solve::{Solution, SolvePipeline, SolveReport};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::RunObserver;
