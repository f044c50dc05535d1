//! Solve command - Run one strategy on one instance

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    belief::Observation,
    cli::output::{Panel, move_line},
    config::SolverConfig,
    export::TraceReport,
    pipeline::{
        Algorithm, LoggingObserver, ProgressObserver, Solution, SolvePipeline, SolveReport,
    },
    puzzle::moves_of_path,
    search::PuzzleProblem,
};

#[derive(Parser, Debug)]
#[command(about = "Solve an 8-puzzle instance")]
pub struct SolveArgs {
    /// Algorithm to run (bfs, dfs, ids, ucs, greedy, astar, idastar, simple-hc,
    /// steepest-hc, beam, annealing, stochastic-hc, genetic, and-or, sensorless,
    /// partial, backtracking, ac3, min-conflicts, q-learning)
    pub algorithm: Algorithm,

    /// Initial state as nine digits (0 is the blank)
    #[arg(long, short = 'i')]
    pub initial: Option<String>,

    /// Goal state as nine digits
    #[arg(long, short = 'g')]
    pub goal: Option<String>,

    /// JSON solver configuration
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Random seed for reproducibility (overrides the configuration file)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write a plain-text trace of the run
    #[arg(long, short = 't')]
    pub trace: Option<PathBuf>,

    /// Observed goal cell for partial-observation search (`row,col=value`)
    #[arg(long)]
    pub observe: Option<Observation>,

    /// Print every state of the solution
    #[arg(long)]
    pub show_path: bool,

    /// Show a spinner while the search runs
    #[arg(long)]
    pub progress: bool,
}

/// Build the solver configuration from the file and flag overrides.
fn load_config(args: &SolveArgs) -> Result<SolverConfig> {
    let mut config = match &args.config {
        Some(path) => SolverConfig::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => SolverConfig::default(),
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    Ok(config)
}

/// Run the requested strategy and return its report.
pub fn run(args: &SolveArgs) -> Result<SolveReport> {
    let config = load_config(args)?;
    let problem = PuzzleProblem::parse(args.initial.as_deref(), args.goal.as_deref())
        .context("invalid puzzle state")?;

    let mut pipeline = SolvePipeline::new(args.algorithm, config)
        .with_observer(Box::new(LoggingObserver::default()));
    if let Some(observation) = args.observe {
        pipeline = pipeline.with_observation(observation);
    }
    if args.progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }

    let report = pipeline
        .run(&problem)
        .with_context(|| format!("{} failed", args.algorithm))?;
    Ok(report)
}

pub fn execute(args: SolveArgs) -> Result<()> {
    let report = run(&args)?;
    for panel in report_panels(&args, &report) {
        panel.print();
    }

    if let Some(path) = &args.trace {
        TraceReport::new(&report).write_to(path)?;
        println!("\nTrace written to {}", path.display());
    }

    Ok(())
}

fn report_panels(args: &SolveArgs, report: &SolveReport) -> Vec<Panel> {
    let mut panel = Panel::new(report.algorithm.name());
    if report.algorithm.uses_fixed_scenario() {
        panel = panel.field("Scenario", "fixed (initial and goal states ignored)");
    }
    let outcome = match (&report.solution, report.failure) {
        (Some(_), _) => "solved".to_string(),
        (None, Some(failure)) => failure.to_string(),
        (None, None) => "no solution".to_string(),
    };
    panel = panel
        .field("Outcome", outcome)
        .field("Steps", report.steps())
        .count("Nodes explored", report.nodes_explored)
        .field("Time", format!("{:.3}s", report.elapsed.as_secs_f64()));

    panel = match &report.solution {
        Some(Solution::Path(path)) => match moves_of_path(path) {
            Some(moves) => panel.section("Moves", move_line(&moves)),
            None => panel,
        },
        Some(Solution::Plan(plan)) => panel.section("Plan", plan),
        Some(Solution::Actions(moves)) => panel.section("Actions", move_line(moves)),
        Some(Solution::Assignment(assignment)) => panel.section("Assignment", assignment),
        None => panel,
    };
    if args.show_path {
        for (i, state) in report.states.iter().enumerate() {
            panel = panel.section(&format!("Step {i}"), state);
        }
    }
    let mut panels = vec![panel];

    if let Some(training) = &report.training {
        panels.push(
            Panel::nested("Training")
                .count("Episodes", training.episodes)
                .percent("Success rate", training.success_rate)
                .field("Average steps", format!("{:.1}", training.average_steps))
                .count("States learned", training.table_size),
        );
    }
    panels
}
