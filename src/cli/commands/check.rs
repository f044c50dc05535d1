//! Check command - Validate a state and report its heuristic values

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use crate::{
    cli::output::Panel,
    puzzle::{PuzzleState, manhattan_distance, misplaced_tiles},
};

#[derive(Parser, Debug)]
#[command(about = "Check validity, solvability and heuristic values of a state")]
pub struct CheckArgs {
    /// State as nine digits (0 is the blank)
    pub state: String,

    /// Goal state as nine digits
    #[arg(long, short = 'g')]
    pub goal: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Facts about one state relative to a goal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateReport {
    pub state: PuzzleState,
    pub goal: PuzzleState,
    pub inversions: usize,
    pub solvable: bool,
    pub is_goal: bool,
    pub manhattan: u32,
    pub misplaced: u32,
}

impl StateReport {
    pub fn new(state: PuzzleState, goal: PuzzleState) -> Self {
        Self {
            state,
            goal,
            inversions: state.inversions(),
            solvable: state.is_solvable(&goal),
            is_goal: state.is_goal(&goal),
            manhattan: manhattan_distance(&state, &goal),
            misplaced: misplaced_tiles(&state, &goal),
        }
    }

    /// Human-readable rendering used when `--json` is not given.
    pub fn panel(&self) -> Panel {
        Panel::new(format!("State {}", self.state.compact()))
            .field("Goal", self.goal.compact())
            .field("Inversions", self.inversions)
            .flag("Solvable", self.solvable)
            .flag("At goal", self.is_goal)
            .field("Manhattan", self.manhattan)
            .field("Misplaced tiles", self.misplaced)
            .section("Grid", self.state)
    }
}

/// Parse the arguments into a report.
///
/// # Errors
///
/// Fails when the state or goal is not a permutation of 0-8.
pub fn check(args: &CheckArgs) -> Result<StateReport> {
    let state: PuzzleState = args
        .state
        .parse()
        .with_context(|| format!("'{}' is not a valid 8-puzzle state", args.state))?;
    let goal = match &args.goal {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("'{raw}' is not a valid goal state"))?,
        None => PuzzleState::GOAL,
    };
    Ok(StateReport::new(state, goal))
}

pub fn execute(args: CheckArgs) -> Result<()> {
    let report = check(&args)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    report.panel().print();
    Ok(())
}
