//! CLI infrastructure for the `puzzle` binary
//!
//! This module provides the command-line interface for solving instances
//! with any catalogued strategy, training the Q-learning agent, checking
//! states and generating random instances.

pub mod commands;
pub mod output;
