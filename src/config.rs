//! Tunable parameters for every strategy.
//!
//! Each config carries the reference defaults and builder-style setters, and
//! [`SolverConfig`] bundles them for the pipeline and the CLI.
//!
//! # Examples
//!
//! ```
//! use eight_puzzle::config::{AnnealingConfig, SolverConfig};
//!
//! let config = SolverConfig::default()
//!     .with_seed(42)
//!     .with_annealing(AnnealingConfig::default().with_max_iterations(500));
//! assert!(config.validate().is_ok());
//! ```

use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, puzzle::Heuristic};

fn check_probability(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::invalid_config(format!(
            "{name} must be within [0, 1], got {value}"
        )))
    }
}

fn check_positive(name: &str, value: usize) -> Result<()> {
    if value > 0 {
        Ok(())
    } else {
        Err(Error::invalid_config(format!("{name} must be positive")))
    }
}

/// Depth and node budgets for the systematic searches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLimits {
    /// Deepest level expanded (`None` = unbounded)
    pub max_depth: Option<usize>,
    /// Maximum generated nodes before giving up (`None` = unbounded)
    pub max_nodes: Option<usize>,
}

impl SearchLimits {
    pub const fn unbounded() -> Self {
        Self {
            max_depth: None,
            max_nodes: None,
        }
    }

    pub const fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub const fn with_max_nodes(mut self, nodes: usize) -> Self {
        self.max_nodes = Some(nodes);
        self
    }

    pub(crate) fn depth_allows(&self, depth: usize) -> bool {
        self.max_depth.is_none_or(|max| depth <= max)
    }

    pub(crate) fn nodes_exhausted(&self, nodes: usize) -> bool {
        self.max_nodes.is_some_and(|max| nodes >= max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamConfig {
    pub beam_width: usize,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self { beam_width: 3 }
    }
}

impl BeamConfig {
    pub fn with_beam_width(mut self, width: usize) -> Self {
        self.beam_width = width;
        self
    }
}

/// Simulated annealing schedule.
///
/// Temperature is multiplied by `cooling_rate` per iteration during the first
/// third of the run and by its square afterwards. After `reheat_interval`
/// iterations without improvement it is raised by `reheat_factor`, capped at
/// half the initial temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealingConfig {
    pub initial_temp: f64,
    pub cooling_rate: f64,
    pub min_temp: f64,
    pub max_iterations: usize,
    /// Chance of picking a neighbour uniformly instead of by heuristic weight
    pub random_pick_chance: f64,
    pub reheat_interval: usize,
    pub reheat_factor: f64,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            initial_temp: 1000.0,
            cooling_rate: 0.97,
            min_temp: 0.01,
            max_iterations: 10_000,
            random_pick_chance: 0.1,
            reheat_interval: 100,
            reheat_factor: 1.5,
        }
    }
}

impl AnnealingConfig {
    pub fn with_initial_temp(mut self, temp: f64) -> Self {
        self.initial_temp = temp;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(Error::invalid_config(format!(
                "cooling_rate must be within (0, 1), got {}",
                self.cooling_rate
            )));
        }
        if self.min_temp <= 0.0 || self.initial_temp < self.min_temp {
            return Err(Error::invalid_config(
                "temperatures must satisfy 0 < min_temp <= initial_temp",
            ));
        }
        check_probability("random_pick_chance", self.random_pick_chance)?;
        check_positive("reheat_interval", self.reheat_interval)
    }
}

/// Stochastic hill climbing with sideways moves and random restarts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StochasticConfig {
    /// Iterations per restart
    pub max_iterations: usize,
    /// Chance of accepting a worsening move when nothing better exists
    pub uphill_probability: f64,
    pub restart_limit: usize,
    /// Consecutive sideways moves allowed on a plateau
    pub sideways_limit: usize,
    /// Restarts begin from a random walk of this many moves (inclusive range)
    pub min_perturbation: usize,
    pub max_perturbation: usize,
    /// Stop restarting once a path with at most this many states is found
    pub good_enough_length: usize,
}

impl Default for StochasticConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            uphill_probability: 0.3,
            restart_limit: 5,
            sideways_limit: 5,
            min_perturbation: 5,
            max_perturbation: 20,
            good_enough_length: 20,
        }
    }
}

impl StochasticConfig {
    pub fn with_restart_limit(mut self, restarts: usize) -> Self {
        self.restart_limit = restarts;
        self
    }

    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_probability("uphill_probability", self.uphill_probability)?;
        if self.min_perturbation > self.max_perturbation {
            return Err(Error::invalid_config(
                "min_perturbation must not exceed max_perturbation",
            ));
        }
        Ok(())
    }
}

/// Genetic algorithm over move sequences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticConfig {
    pub population_size: usize,
    pub generations: usize,
    pub tournament_size: usize,
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    /// Longest chromosome generated at initialization
    pub max_moves: usize,
    pub max_time_secs: f64,
    /// Share of the population copied unchanged into the next generation
    pub elite_fraction: f64,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 100,
            tournament_size: 5,
            mutation_rate: 0.1,
            crossover_rate: 0.7,
            max_moves: 50,
            max_time_secs: 30.0,
            elite_fraction: 0.1,
        }
    }
}

impl GeneticConfig {
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    pub fn with_max_moves(mut self, moves: usize) -> Self {
        self.max_moves = moves;
        self
    }

    pub fn with_max_time(mut self, time: Duration) -> Self {
        self.max_time_secs = time.as_secs_f64();
        self
    }

    pub fn max_time(&self) -> Duration {
        Duration::from_secs_f64(self.max_time_secs.max(0.0))
    }

    /// Number of individuals carried over unchanged (at least two).
    pub fn elite_count(&self) -> usize {
        ((self.population_size as f64 * self.elite_fraction) as usize)
            .max(2)
            .min(self.population_size)
    }

    pub fn validate(&self) -> Result<()> {
        check_positive("population_size", self.population_size)?;
        check_positive("tournament_size", self.tournament_size)?;
        check_positive("max_moves", self.max_moves)?;
        check_probability("mutation_rate", self.mutation_rate)?;
        check_probability("crossover_rate", self.crossover_rate)?;
        check_probability("elite_fraction", self.elite_fraction)
    }
}

/// Non-deterministic actuation model and AND-OR budgets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AndOrConfig {
    /// Probability that a move has its intended effect
    pub success_probability: f64,
    pub max_depth: usize,
    pub max_nodes: usize,
}

impl Default for AndOrConfig {
    fn default() -> Self {
        Self {
            success_probability: 0.9,
            max_depth: 30,
            max_nodes: 10_000,
        }
    }
}

impl AndOrConfig {
    pub fn with_success_probability(mut self, p: f64) -> Self {
        self.success_probability = p;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_max_nodes(mut self, nodes: usize) -> Self {
        self.max_nodes = nodes;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_probability("success_probability", self.success_probability)
    }
}

/// Budgets for the sensorless and partial-observation searches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeliefConfig {
    pub max_depth: usize,
    pub max_time_secs: f64,
}

impl Default for BeliefConfig {
    fn default() -> Self {
        Self {
            max_depth: 30,
            max_time_secs: 10.0,
        }
    }
}

impl BeliefConfig {
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_max_time(mut self, time: Duration) -> Self {
        self.max_time_secs = time.as_secs_f64();
        self
    }

    pub fn max_time(&self) -> Duration {
        Duration::from_secs_f64(self.max_time_secs.max(0.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinConflictsConfig {
    pub max_iterations: usize,
}

impl Default for MinConflictsConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
        }
    }
}

/// Tabular Q-learning hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QLearningConfig {
    pub learning_rate: f64,
    pub discount_factor: f64,
    pub epsilon: f64,
    /// Random moves applied to the goal to create an episode start
    pub shuffle_steps: usize,
    pub episode_steps: usize,
    pub episodes: usize,
    pub solve_steps: usize,
    /// Length of the exploratory episode run from an unseen state while solving
    pub burst_steps: usize,
    pub burst_epsilon: f64,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.9,
            epsilon: 0.3,
            shuffle_steps: 20,
            episode_steps: 100,
            episodes: 1000,
            solve_steps: 200,
            burst_steps: 50,
            burst_epsilon: 0.9,
        }
    }
}

impl QLearningConfig {
    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_shuffle_steps(mut self, steps: usize) -> Self {
        self.shuffle_steps = steps;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_probability("learning_rate", self.learning_rate)?;
        check_probability("discount_factor", self.discount_factor)?;
        check_probability("epsilon", self.epsilon)?;
        check_probability("burst_epsilon", self.burst_epsilon)
    }
}

/// Every strategy's parameters plus the random seed.
///
/// Missing fields fall back to their defaults when deserializing, so a JSON
/// file only needs to mention what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub heuristic: Heuristic,
    /// Limits shared by BFS, UCS, greedy and A*
    pub graph: SearchLimits,
    pub dfs: SearchLimits,
    pub ids: SearchLimits,
    pub beam: BeamConfig,
    pub annealing: AnnealingConfig,
    pub stochastic: StochasticConfig,
    pub genetic: GeneticConfig,
    pub and_or: AndOrConfig,
    pub belief: BeliefConfig,
    pub min_conflicts: MinConflictsConfig,
    pub q_learning: QLearningConfig,
    pub seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            heuristic: Heuristic::default(),
            graph: SearchLimits::unbounded(),
            dfs: SearchLimits::unbounded().with_max_depth(200),
            ids: SearchLimits::unbounded().with_max_depth(50),
            beam: BeamConfig::default(),
            annealing: AnnealingConfig::default(),
            stochastic: StochasticConfig::default(),
            genetic: GeneticConfig::default(),
            and_or: AndOrConfig::default(),
            belief: BeliefConfig::default(),
            min_conflicts: MinConflictsConfig::default(),
            q_learning: QLearningConfig::default(),
            seed: None,
        }
    }
}

impl SolverConfig {
    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_annealing(mut self, annealing: AnnealingConfig) -> Self {
        self.annealing = annealing;
        self
    }

    pub fn with_stochastic(mut self, stochastic: StochasticConfig) -> Self {
        self.stochastic = stochastic;
        self
    }

    pub fn with_genetic(mut self, genetic: GeneticConfig) -> Self {
        self.genetic = genetic;
        self
    }

    pub fn with_belief(mut self, belief: BeliefConfig) -> Self {
        self.belief = belief;
        self
    }

    pub fn with_q_learning(mut self, q_learning: QLearningConfig) -> Self {
        self.q_learning = q_learning;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_positive("beam_width", self.beam.beam_width)?;
        self.annealing.validate()?;
        self.stochastic.validate()?;
        self.genetic.validate()?;
        self.and_or.validate()?;
        self.q_learning.validate()
    }

    /// Save configuration to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }
}
