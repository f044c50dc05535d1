//! Train command - Train the Q-learning agent

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::output::{Panel, move_line},
    config::QLearningConfig,
    pipeline::{LoggingObserver, ProgressObserver, TrainingConfig, TrainingPipeline},
    ports::NoopObserver,
    puzzle::{PuzzleState, moves_of_path},
};

/// Map a user-supplied summary path to the JSON file actually written.
///
/// Directory targets get `training_summary.json`; any other extension is
/// replaced with `.json`.
pub fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Treat trailing separators or missing filename as a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train the Q-learning agent")]
pub struct TrainArgs {
    /// Number of training episodes
    #[arg(long, short = 'e', default_value_t = 1000)]
    pub episodes: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Random moves applied to the goal to produce each episode start
    #[arg(long, default_value_t = 20)]
    pub shuffle_steps: usize,

    /// Exploration rate during training
    #[arg(long, default_value_t = 0.3)]
    pub epsilon: f64,

    /// Goal state as nine digits
    #[arg(long, short = 'g')]
    pub goal: Option<String>,

    /// Solve this state with the trained agent afterwards
    #[arg(long)]
    pub solve: Option<String>,

    /// Write a JSON training summary (a directory gets training_summary.json)
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl TrainArgs {
    fn training_config(&self) -> Result<TrainingConfig> {
        let goal = match &self.goal {
            Some(raw) => raw.parse().context("invalid goal state")?,
            None => PuzzleState::GOAL,
        };
        Ok(TrainingConfig {
            q_learning: QLearningConfig::default()
                .with_episodes(self.episodes)
                .with_epsilon(self.epsilon)
                .with_shuffle_steps(self.shuffle_steps),
            seed: self.seed,
            goal,
        })
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let solve_target: Option<PuzzleState> = args
        .solve
        .as_deref()
        .map(str::parse)
        .transpose()
        .context("invalid state to solve")?;

    let summary_target = args.summary.as_ref().map(|raw| {
        let sanitized = sanitize_summary_path(raw);
        let normalized = sanitized != *raw;
        (sanitized, normalized)
    });

    let config = args.training_config()?;
    let mut pipeline =
        TrainingPipeline::new(config).with_observer(Box::new(LoggingObserver::new(100)));
    if !args.no_progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    let (mut agent, result) = pipeline.run()?;

    let mut panel = Panel::new("Q-Learning training")
        .count("Episodes", result.stats.episodes)
        .count("Successes", result.stats.successes)
        .percent("Success rate", result.stats.success_rate)
        .field("Average steps", format!("{:.1}", result.stats.average_steps))
        .count("States learned", result.stats.table_size);
    if let Some(seed) = result.seed {
        panel = panel.field("Seed", seed);
    }
    panel.print();

    if let Some(start) = solve_target {
        let solving = Panel::nested(format!("Solving {}", start.compact()));
        let outcome = agent.solve(&start, &mut NoopObserver);
        let solving = match (&outcome.path, outcome.failure) {
            (Some(path), _) => {
                let moves = moves_of_path(path).unwrap_or_default();
                solving
                    .field("Outcome", "solved")
                    .field("Steps", moves.len())
                    .field("Moves", move_line(&moves))
            }
            (None, Some(failure)) => solving.field("Outcome", failure),
            (None, None) => solving.field("Outcome", "no solution"),
        };
        solving.print();
    }

    if let Some((summary_path, normalized)) = summary_target {
        if normalized {
            println!("\nNormalizing summary path to {}", summary_path.display());
        }

        if let Some(parent) = summary_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        result.save(&summary_path)?;
        println!("\nSummary written to {}", summary_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_summary_path() {
        assert_eq!(
            sanitize_summary_path(Path::new("out/run.json")),
            PathBuf::from("out/run.json")
        );
        assert_eq!(
            sanitize_summary_path(Path::new("out/run.txt")),
            PathBuf::from("out/run.json")
        );
        assert_eq!(
            sanitize_summary_path(Path::new("out/run")),
            PathBuf::from("out/run.json")
        );
        let dir = format!("out{}", std::path::MAIN_SEPARATOR);
        assert_eq!(
            sanitize_summary_path(Path::new(&dir)),
            PathBuf::from("out").join("training_summary.json")
        );
    }

    #[test]
    fn test_training_config_from_args() {
        let args = TrainArgs::parse_from(["train", "--episodes", "12", "--epsilon", "0.5"]);
        let config = args.training_config().unwrap();
        assert_eq!(config.q_learning.episodes, 12);
        assert_eq!(config.q_learning.epsilon, 0.5);
        assert_eq!(config.goal, PuzzleState::GOAL);
    }

    #[test]
    fn test_invalid_goal_is_rejected() {
        let args = TrainArgs::parse_from(["train", "--goal", "112345678"]);
        assert!(args.training_config().is_err());
    }
}
