//! Generate command - Print random solvable instances

use anyhow::{Context, Result};
use clap::Parser;

use crate::{puzzle::PuzzleState, utils::build_rng};

#[derive(Parser, Debug)]
#[command(about = "Generate random solvable states")]
pub struct GenerateArgs {
    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Walk this many random moves away from the goal instead of shuffling
    #[arg(long, short = 's')]
    pub scramble: Option<usize>,

    /// Goal the generated states must be able to reach
    #[arg(long, short = 'g')]
    pub goal: Option<String>,

    /// Number of states to generate
    #[arg(long, short = 'n', default_value_t = 1)]
    pub count: usize,

    /// Print each state as a grid instead of nine digits
    #[arg(long)]
    pub grid: bool,
}

/// Produce the requested states.
pub fn generate(args: &GenerateArgs) -> Result<Vec<PuzzleState>> {
    let goal = match &args.goal {
        Some(raw) => raw.parse().context("invalid goal state")?,
        None => PuzzleState::GOAL,
    };
    let mut rng = build_rng(args.seed);
    let states = (0..args.count)
        .map(|_| match args.scramble {
            Some(steps) => goal.scramble(steps, &mut rng).last().copied().unwrap_or(goal),
            None => PuzzleState::random_solvable(&goal, &mut rng),
        })
        .collect();
    Ok(states)
}

pub fn execute(args: GenerateArgs) -> Result<()> {
    for (i, state) in generate(&args)?.iter().enumerate() {
        if args.grid {
            if i > 0 {
                println!();
            }
            println!("{state}");
        } else {
            println!("{}", state.compact());
        }
    }
    Ok(())
}
