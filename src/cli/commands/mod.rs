//! Subcommands of the `puzzle` binary

pub mod check;
pub mod generate;
pub mod solve;
pub mod train;
