//! Q-learning agent for the 8-puzzle
//!
//! The agent trains on random scrambles of its goal and then solves a given
//! start greedily from the learned table.

use std::collections::HashSet;

use log::{debug, info};
use rand::{Rng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    config::QLearningConfig,
    ports::{SearchObserver, StepContext},
    puzzle::{Move, PuzzleState},
    q_learning::{q_table::QTable, reward::reward},
    search::{Failure, SearchResult},
    utils::build_rng,
};

const NAME: &str = "Q-Learning";

/// Result of one training episode.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeOutcome {
    pub reached_goal: bool,
    /// Moves taken
    pub steps: usize,
    /// Visited states, the start included
    pub path: Vec<PuzzleState>,
}

impl EpisodeOutcome {
    pub fn final_state(&self) -> Option<&PuzzleState> {
        self.path.last()
    }
}

/// Aggregate statistics over a batch of training episodes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrainingStats {
    pub episodes: usize,
    pub successes: usize,
    /// Fraction of episodes that reached the goal
    pub success_rate: f64,
    /// Mean episode length over successful episodes
    pub average_steps: f64,
    /// States with a row in the Q-table after training
    pub table_size: usize,
}

/// Tabular Q-learning agent (off-policy TD control)
///
/// Learns by always updating toward the maximum next-state value,
/// regardless of the action actually taken.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    q_table: QTable,
    config: QLearningConfig,
    goal: PuzzleState,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl QLearningAgent {
    /// Create an untrained agent aiming for the canonical goal.
    pub fn new(config: QLearningConfig) -> Self {
        Self {
            q_table: QTable::new(config.learning_rate, config.discount_factor, 0.0),
            config,
            goal: PuzzleState::GOAL,
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    pub fn with_goal(mut self, goal: PuzzleState) -> Self {
        self.goal = goal;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = build_rng(Some(seed));
        self.rng_seed = Some(seed);
        self
    }

    /// Use an already constructed generator.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self.rng_seed = None;
        self
    }

    pub fn goal(&self) -> &PuzzleState {
        &self.goal
    }

    pub fn config(&self) -> &QLearningConfig {
        &self.config
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn q_table_mut(&mut self) -> &mut QTable {
        &mut self.q_table
    }

    /// Forget everything learned and restart the generator from its seed.
    pub fn reset(&mut self) {
        self.q_table.reset();
        self.rng = build_rng(self.rng_seed);
    }

    /// ε-greedy action selection over the legal moves of `state`
    fn select_action_epsilon_greedy(
        &mut self,
        state: &PuzzleState,
        legal_moves: &[Move],
        epsilon: f64,
    ) -> Option<Move> {
        if self.rng.random::<f64>() < epsilon {
            legal_moves.choose(&mut self.rng).copied()
        } else {
            self.q_table.greedy_action(&state.key(), legal_moves)
        }
    }

    fn run_episode(
        &mut self,
        start: PuzzleState,
        epsilon: f64,
        max_steps: usize,
    ) -> EpisodeOutcome {
        let mut state = start;
        let mut path = vec![state];
        let mut steps = 0;
        while state != self.goal && steps < max_steps {
            let legal: Vec<Move> = state.legal_moves().collect();
            let Some(action) = self.select_action_epsilon_greedy(&state, &legal, epsilon) else {
                break;
            };
            let next = state.apply_or_stay(action);
            let r = reward(&state, &next, &self.goal);
            self.q_table.q_learning_update(state.key(), action, r, next.key());
            state = next;
            path.push(state);
            steps += 1;
        }
        EpisodeOutcome {
            reached_goal: state == self.goal,
            steps,
            path,
        }
    }

    /// Train for one episode.
    ///
    /// Starts from `start`, or from a random scramble of the goal of
    /// `shuffle_steps` moves when `start` is `None`.
    pub fn train_episode(&mut self, start: Option<PuzzleState>) -> EpisodeOutcome {
        let start = match start {
            Some(state) => state,
            None => self.scrambled_start(),
        };
        self.run_episode(start, self.config.epsilon, self.config.episode_steps)
    }

    fn scrambled_start(&mut self) -> PuzzleState {
        let walk = self.goal.scramble(self.config.shuffle_steps, &mut self.rng);
        walk.last().copied().unwrap_or(self.goal)
    }

    /// Train for `episodes` episodes from random scrambles.
    ///
    /// The observer sees one step per episode with the episode length as
    /// its score.
    pub fn train(
        &mut self,
        episodes: usize,
        observer: &mut dyn SearchObserver<PuzzleState>,
    ) -> TrainingStats {
        let mut successes = 0;
        let mut successful_steps = 0;
        for episode in 0..episodes {
            let outcome = self.train_episode(None);
            if outcome.reached_goal {
                successes += 1;
                successful_steps += outcome.steps;
            }
            if let Some(last) = outcome.final_state() {
                let status = if outcome.reached_goal { "solved" } else { "episode" };
                observer.on_step(
                    &StepContext::new(episode, last, status).with_score(outcome.steps as f64),
                );
            }
        }

        let stats = TrainingStats {
            episodes,
            successes,
            success_rate: if episodes == 0 {
                0.0
            } else {
                successes as f64 / episodes as f64
            },
            average_steps: if successes == 0 {
                0.0
            } else {
                successful_steps as f64 / successes as f64
            },
            table_size: self.q_table.size(),
        };
        info!(
            "{NAME}: trained {} episodes, {} successes, {} states in table",
            stats.episodes, stats.successes, stats.table_size
        );
        stats
    }

    /// Follow the learned policy from `start` with exploration disabled.
    ///
    /// States missing from the table trigger a short exploratory episode
    /// before a move is chosen. When the greedy move leads back to a state
    /// already on the path, a random other legal move is taken instead.
    pub fn solve(
        &mut self,
        start: &PuzzleState,
        observer: &mut dyn SearchObserver<PuzzleState>,
    ) -> SearchResult<PuzzleState> {
        if !start.is_solvable(&self.goal) {
            return SearchResult::unsolvable().logged(NAME);
        }

        let mut state = *start;
        let mut path = vec![state];
        let mut visited = HashSet::from([state.key()]);
        let mut nodes_explored = 1;

        for step in 0..self.config.solve_steps {
            if state == self.goal {
                return SearchResult::solved(path, nodes_explored).logged(NAME);
            }

            if !self.q_table.contains(&state.key()) {
                debug!("{NAME}: state {} unseen, running a training burst", state.compact());
                let burst =
                    self.run_episode(state, self.config.burst_epsilon, self.config.burst_steps);
                nodes_explored += burst.steps;
            }

            let legal: Vec<Move> = state.legal_moves().collect();
            let Some(mut action) = self.select_action_epsilon_greedy(&state, &legal, 0.0) else {
                return SearchResult::failed(Failure::Exhausted, nodes_explored).logged(NAME);
            };
            let mut next = state.apply_or_stay(action);
            if visited.contains(&next.key()) {
                let alternatives: Vec<Move> =
                    legal.iter().copied().filter(|&mv| mv != action).collect();
                let Some(&alternative) = alternatives.choose(&mut self.rng) else {
                    return SearchResult::failed(Failure::LocalOptimum, nodes_explored)
                        .logged(NAME);
                };
                action = alternative;
                next = state.apply_or_stay(action);
            }

            let score = self.q_table.get(&state.key(), action);
            visited.insert(next.key());
            state = next;
            path.push(state);
            nodes_explored += 1;
            observer.on_step(&StepContext::new(step, &state, "move").with_score(score));
        }

        if state == self.goal {
            SearchResult::solved(path, nodes_explored).logged(NAME)
        } else {
            SearchResult::failed(Failure::IterationLimit, nodes_explored).logged(NAME)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ports::NoopObserver, puzzle::moves_of_path};

    fn state(s: &str) -> PuzzleState {
        s.parse().unwrap()
    }

    fn agent(config: QLearningConfig) -> QLearningAgent {
        QLearningAgent::new(config).with_seed(42)
    }

    #[test]
    fn test_episode_from_goal_takes_no_steps() {
        let mut agent = agent(QLearningConfig::default());
        let outcome = agent.train_episode(Some(PuzzleState::GOAL));
        assert!(outcome.reached_goal);
        assert_eq!(outcome.steps, 0);
        assert_eq!(outcome.path, vec![PuzzleState::GOAL]);
    }

    #[test]
    fn test_episode_respects_step_budget() {
        let config = QLearningConfig {
            episode_steps: 5,
            ..QLearningConfig::default()
        };
        let mut agent = agent(config);
        let outcome = agent.train_episode(Some(state("867254301")));
        assert!(!outcome.reached_goal);
        assert_eq!(outcome.steps, 5);
        assert_eq!(outcome.path.len(), 6);
        assert!(moves_of_path(&outcome.path).is_some());
        assert!(agent.q_table().size() > 0);
    }

    #[test]
    fn test_training_stats_are_consistent() {
        let config = QLearningConfig::default().with_shuffle_steps(2);
        let mut agent = agent(config);
        let stats = agent.train(50, &mut NoopObserver);
        assert_eq!(stats.episodes, 50);
        assert!(stats.successes <= 50);
        assert!((stats.success_rate - stats.successes as f64 / 50.0).abs() < 1e-12);
        assert_eq!(stats.table_size, agent.q_table().size());
    }

    #[test]
    fn test_solve_follows_learned_values() {
        let mut agent = agent(QLearningConfig::default());
        let start = state("123456708");
        agent.q_table_mut().set(start.key(), Move::Right, 5.0);
        let result = agent.solve(&start, &mut NoopObserver);
        assert_eq!(result.path, Some(vec![start, PuzzleState::GOAL]));
        assert_eq!(result.nodes_explored, 2);
    }

    #[test]
    fn test_solve_after_training_near_goal() {
        let config = QLearningConfig::default().with_shuffle_steps(1);
        let mut agent = agent(config);
        agent.train(300, &mut NoopObserver);
        let start = state("123456708");
        let result = agent.solve(&start, &mut NoopObserver);
        let path = result.path.expect("trained agent solves a one-move instance");
        assert_eq!(moves_of_path(&path), Some(vec![Move::Right]));
    }

    #[test]
    fn test_solve_from_goal() {
        let mut agent = agent(QLearningConfig::default());
        let result = agent.solve(&PuzzleState::GOAL, &mut NoopObserver);
        assert_eq!(result.path, Some(vec![PuzzleState::GOAL]));
    }

    #[test]
    fn test_solve_unsolvable() {
        let mut agent = agent(QLearningConfig::default());
        let result = agent.solve(&state("213456780"), &mut NoopObserver);
        assert_eq!(result.failure, Some(Failure::Unsolvable));
        assert_eq!(agent.q_table().size(), 0);
    }

    #[test]
    fn test_solve_budget_exhaustion() {
        let config = QLearningConfig {
            solve_steps: 3,
            burst_steps: 0,
            ..QLearningConfig::default()
        };
        let mut agent = agent(config);
        let result = agent.solve(&state("867254301"), &mut NoopObserver);
        assert!(!result.is_success());
        assert!(matches!(
            result.failure,
            Some(Failure::IterationLimit | Failure::LocalOptimum)
        ));
    }

    #[test]
    fn test_reset_restores_seeded_behaviour() {
        let config = QLearningConfig::default().with_shuffle_steps(4);
        let mut agent = agent(config);
        let first = agent.train(5, &mut NoopObserver);
        agent.reset();
        let second = agent.train(5, &mut NoopObserver);
        assert_eq!(first, second);
    }
}
