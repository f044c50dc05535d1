//! Training pipeline for the Q-learning agent

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use super::observers::Fanout;
use crate::{
    Result,
    config::QLearningConfig,
    ports::RunObserver,
    puzzle::PuzzleState,
    q_learning::{QLearningAgent, TrainingStats},
    utils::build_rng,
};

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub q_learning: QLearningConfig,

    /// Random seed
    pub seed: Option<u64>,

    /// Goal the agent learns to reach
    pub goal: PuzzleState,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            q_learning: QLearningConfig::default(),
            seed: None,
            goal: PuzzleState::GOAL,
        }
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    pub stats: TrainingStats,
    pub seed: Option<u64>,
    pub config: QLearningConfig,
}

impl TrainingResult {
    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Training pipeline for a Q-learning agent
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn RunObserver>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn RunObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Train a fresh agent for the configured number of episodes.
    ///
    /// Returns the trained agent along with the run statistics, so it can
    /// go on to solve instances.
    pub fn run(&mut self) -> Result<(QLearningAgent, TrainingResult)> {
        let q_learning = self.config.q_learning;
        q_learning.validate()?;

        // Notify observers of training start
        for observer in &mut self.observers {
            observer.on_run_start("Q-Learning training", Some(q_learning.episodes))?;
        }

        let mut agent = QLearningAgent::new(q_learning)
            .with_goal(self.config.goal)
            .with_rng(build_rng(self.config.seed));
        let mut fanout = Fanout::new(&mut self.observers);
        let stats = agent.train(q_learning.episodes, &mut fanout);
        fanout.finish()?;

        let summary = format!(
            "{} of {} episodes reached the goal ({:.1}%), {} states learned",
            stats.successes,
            stats.episodes,
            stats.success_rate * 100.0,
            stats.table_size
        );
        info!("{summary}");

        // Notify observers of training end
        for observer in &mut self.observers {
            observer.on_run_end(stats.successes > 0, &summary)?;
        }

        let result = TrainingResult {
            stats,
            seed: self.config.seed,
            config: q_learning,
        };
        Ok((agent, result))
    }
}
