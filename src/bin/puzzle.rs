//! 8-puzzle CLI - classical AI search strategies on the command line
//!
//! This CLI provides a unified interface for:
//! - Solving instances with any of the catalogued strategies
//! - Training the Q-learning agent
//! - Checking states for validity and solvability
//! - Generating random solvable instances

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

#[derive(Parser)]
#[command(name = "puzzle")]
#[command(version, about = "Classical AI search strategies for the 8-puzzle", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve an instance with one algorithm
    Solve(eight_puzzle::cli::commands::solve::SolveArgs),

    /// Train the Q-learning agent
    Train(eight_puzzle::cli::commands::train::TrainArgs),

    /// Check a state for validity and solvability
    Check(eight_puzzle::cli::commands::check::CheckArgs),

    /// Generate random solvable states
    Generate(eight_puzzle::cli::commands::generate::GenerateArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    match cli.command {
        Commands::Solve(args) => eight_puzzle::cli::commands::solve::execute(args),
        Commands::Train(args) => eight_puzzle::cli::commands::train::execute(args),
        Commands::Check(args) => eight_puzzle::cli::commands::check::execute(args),
        Commands::Generate(args) => eight_puzzle::cli::commands::generate::execute(args),
    }
}
