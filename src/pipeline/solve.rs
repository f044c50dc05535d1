//! Solve pipeline: run one strategy on one problem
//!
//! The pipeline owns the random generator, the timing and the observer
//! fan-out, so every strategy is invoked the same way regardless of the
//! shape of its result.

use std::time::{Duration, Instant};

use log::{debug, info};
use rand::{SeedableRng, rngs::StdRng};

use super::{Algorithm, observers::Fanout};
use crate::{
    Result,
    belief::{
        BeliefProblem, Observation, Plan, and_or_search, partial_observation_search,
        sensorless_search,
    },
    config::SolverConfig,
    csp::{
        Assignment, CspResult, Domains, backtracking_search, backtracking_with_ac3, min_conflicts,
    },
    ports::RunObserver,
    puzzle::{Move, PuzzleState},
    q_learning::{QLearningAgent, TrainingStats},
    search::{
        Failure, PuzzleProblem, SearchResult, astar, beam_search, breadth_first_search,
        depth_first_search, genetic_algorithm, greedy_best_first, ida_star,
        iterative_deepening_search, simple_hill_climbing, simulated_annealing,
        steepest_ascent_hill_climbing, stochastic_hill_climbing, uniform_cost_search,
    },
    utils::build_rng,
};

/// Strategy-specific shape of a successful result.
#[derive(Debug, Clone, PartialEq)]
pub enum Solution {
    Path(Vec<PuzzleState>),
    Plan(Plan),
    Actions(Vec<Move>),
    Assignment(Assignment),
}

/// Everything known about one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveReport {
    pub algorithm: Algorithm,
    pub elapsed: Duration,
    pub solution: Option<Solution>,
    /// Nodes, belief states or CSP states explored, per strategy
    pub nodes_explored: usize,
    pub failure: Option<Failure>,
    /// States to show in a trace: the path itself, the nominal branch of a
    /// plan, one member of the belief under the action sequence, or the
    /// assigned board
    pub states: Vec<PuzzleState>,
    /// Present for Q-learning runs
    pub training: Option<TrainingStats>,
}

impl SolveReport {
    pub fn is_success(&self) -> bool {
        self.solution.is_some()
    }

    /// Moves shown in the trace.
    pub fn steps(&self) -> usize {
        self.states.len().saturating_sub(1)
    }

    /// One-line outcome description.
    pub fn summary(&self) -> String {
        match (&self.solution, self.failure) {
            (Some(_), _) => format!(
                "{}: solved, {} steps, {} nodes in {:.3}s",
                self.algorithm,
                self.steps(),
                self.nodes_explored,
                self.elapsed.as_secs_f64()
            ),
            (None, Some(failure)) => format!(
                "{}: {failure}, {} nodes in {:.3}s",
                self.algorithm,
                self.nodes_explored,
                self.elapsed.as_secs_f64()
            ),
            (None, None) => format!("{}: no solution", self.algorithm),
        }
    }
}

/// What a strategy produced, before timing is attached.
struct Outcome {
    solution: Option<Solution>,
    nodes_explored: usize,
    failure: Option<Failure>,
    states: Vec<PuzzleState>,
    training: Option<TrainingStats>,
}

impl Outcome {
    fn from_path(result: SearchResult<PuzzleState>) -> Self {
        let states = result.path.clone().unwrap_or_default();
        Self {
            solution: result.path.map(Solution::Path),
            nodes_explored: result.nodes_explored,
            failure: result.failure,
            states,
            training: None,
        }
    }

    fn from_csp(result: CspResult) -> Self {
        let states = result
            .assignment
            .and_then(|a| a.to_state())
            .into_iter()
            .collect();
        Self {
            solution: result.assignment.map(Solution::Assignment),
            nodes_explored: result.stats.states_explored,
            failure: result.failure,
            states,
            training: None,
        }
    }
}

/// Runs one algorithm on a problem with observers and timing.
pub struct SolvePipeline {
    algorithm: Algorithm,
    config: SolverConfig,
    observation: Observation,
    observers: Vec<Box<dyn RunObserver>>,
}

impl SolvePipeline {
    pub fn new(algorithm: Algorithm, config: SolverConfig) -> Self {
        Self {
            algorithm,
            config,
            observation: Observation::default(),
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn RunObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Observation used by partial-observation search.
    pub fn with_observation(mut self, observation: Observation) -> Self {
        self.observation = observation;
        self
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Run the configured algorithm on `problem`.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid configuration, for an internal
    /// invariant violation inside a strategy, or when an observer fails.
    /// Search failures are reported in the returned [`SolveReport`].
    pub fn run(&mut self, problem: &PuzzleProblem) -> Result<SolveReport> {
        self.config.validate()?;
        let problem = problem.clone().with_heuristic(self.config.heuristic);
        let label = self.algorithm.name();
        info!("Running {label} (seed {:?})", self.config.seed);
        if self.algorithm.uses_fixed_scenario() {
            debug!("{label} ignores the initial and goal states given");
        }

        for observer in &mut self.observers {
            observer.on_run_start(label, None)?;
        }

        let mut rng = build_rng(self.config.seed);
        let started = Instant::now();
        let mut fanout = Fanout::new(&mut self.observers);
        let outcome = dispatch(
            self.algorithm,
            &self.config,
            self.observation,
            &problem,
            &mut rng,
            &mut fanout,
        )?;
        let elapsed = started.elapsed();
        fanout.finish()?;

        let report = SolveReport {
            algorithm: self.algorithm,
            elapsed,
            solution: outcome.solution,
            nodes_explored: outcome.nodes_explored,
            failure: outcome.failure,
            states: outcome.states,
            training: outcome.training,
        };

        let summary = report.summary();
        for observer in &mut self.observers {
            observer.on_run_end(report.is_success(), &summary)?;
        }
        Ok(report)
    }
}

fn dispatch(
    algorithm: Algorithm,
    config: &SolverConfig,
    observation: Observation,
    problem: &PuzzleProblem,
    rng: &mut StdRng,
    observer: &mut Fanout<'_>,
) -> Result<Outcome> {
    let outcome = match algorithm {
        Algorithm::Bfs => {
            Outcome::from_path(breadth_first_search(problem, &config.graph, observer))
        }
        Algorithm::Dfs => Outcome::from_path(depth_first_search(problem, &config.dfs, observer)),
        Algorithm::Ids => {
            Outcome::from_path(iterative_deepening_search(problem, &config.ids, observer))
        }
        Algorithm::Ucs => Outcome::from_path(uniform_cost_search(problem, &config.graph, observer)),
        Algorithm::Greedy => {
            Outcome::from_path(greedy_best_first(problem, &config.graph, observer))
        }
        Algorithm::AStar => Outcome::from_path(astar(problem, &config.graph, observer)),
        Algorithm::IdaStar => Outcome::from_path(ida_star(problem, &config.graph, observer)),
        Algorithm::SimpleHillClimbing => {
            Outcome::from_path(simple_hill_climbing(problem, observer))
        }
        Algorithm::SteepestHillClimbing => {
            Outcome::from_path(steepest_ascent_hill_climbing(problem, observer))
        }
        Algorithm::Beam => Outcome::from_path(beam_search(problem, &config.beam, observer)),
        Algorithm::Annealing => Outcome::from_path(simulated_annealing(
            problem,
            &config.annealing,
            rng,
            observer,
        )),
        Algorithm::StochasticHillClimbing => Outcome::from_path(stochastic_hill_climbing(
            problem,
            &config.stochastic,
            rng,
            observer,
        )),
        Algorithm::Genetic => Outcome::from_path(genetic_algorithm(
            problem,
            &config.genetic,
            rng,
            observer,
        )),
        Algorithm::AndOr => {
            let result = and_or_search(problem, &config.and_or, observer);
            let states = result
                .plan
                .as_ref()
                .and_then(|plan| plan.nominal_path(problem.initial()))
                .unwrap_or_default();
            Outcome {
                solution: result.plan.map(Solution::Plan),
                nodes_explored: result.nodes_explored,
                failure: result.failure,
                states,
                training: None,
            }
        }
        Algorithm::Sensorless | Algorithm::PartialObservation => {
            let belief_problem = if algorithm == Algorithm::Sensorless {
                BeliefProblem::sensorless()
            } else {
                BeliefProblem::partial(observation)
            };
            let result = if algorithm == Algorithm::Sensorless {
                sensorless_search(&belief_problem, &config.belief, observer)
            } else {
                partial_observation_search(&belief_problem, &config.belief, observer)
            };
            let states = match (&result.plan, belief_problem.initial().iter().next()) {
                (Some(moves), Some(&first)) => representative_walk(first, moves),
                _ => Vec::new(),
            };
            Outcome {
                solution: result.plan.map(Solution::Actions),
                nodes_explored: result.stats.nodes_expanded,
                failure: result.failure,
                states,
                training: None,
            }
        }
        Algorithm::Backtracking => Outcome::from_csp(backtracking_search(rng, observer)),
        Algorithm::Ac3 => {
            Outcome::from_csp(backtracking_with_ac3(&Domains::initial(), rng, observer))
        }
        Algorithm::MinConflicts => {
            Outcome::from_csp(min_conflicts(&config.min_conflicts, rng, observer)?)
        }
        Algorithm::QLearning => {
            let mut agent = QLearningAgent::new(config.q_learning)
                .with_goal(*problem.goal())
                .with_rng(StdRng::from_rng(rng));
            let training = agent.train(config.q_learning.episodes, observer);
            let mut outcome = Outcome::from_path(agent.solve(problem.initial(), observer));
            outcome.training = Some(training);
            outcome
        }
    };
    Ok(outcome)
}

/// States visited by `start` when every move is applied to the whole belief.
fn representative_walk(start: PuzzleState, moves: &[Move]) -> Vec<PuzzleState> {
    let mut states = Vec::with_capacity(moves.len() + 1);
    let mut current = start;
    states.push(current);
    for &mv in moves {
        current = current.apply_or_stay(mv);
        states.push(current);
    }
    states
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::QLearningConfig, pipeline::observers::RecordingObserver};

    fn problem(initial: &str) -> PuzzleProblem {
        PuzzleProblem::parse(Some(initial), None).unwrap()
    }

    #[test]
    fn test_path_report() {
        let mut pipeline = SolvePipeline::new(Algorithm::AStar, SolverConfig::default());
        let report = pipeline.run(&problem("123456708")).unwrap();
        assert!(report.is_success());
        assert_eq!(report.steps(), 1);
        assert_eq!(report.states.last(), Some(&PuzzleState::GOAL));
        assert!(report.summary().contains("A* Search: solved, 1 steps"));
    }

    #[test]
    fn test_unsolvable_report() {
        let mut pipeline = SolvePipeline::new(Algorithm::Bfs, SolverConfig::default());
        let report = pipeline.run(&problem("213456780")).unwrap();
        assert!(!report.is_success());
        assert_eq!(report.failure, Some(Failure::Unsolvable));
        assert_eq!(report.nodes_explored, 0);
        assert!(report.states.is_empty());
    }

    #[test]
    fn test_sensorless_report_walks_first_belief_member() {
        let mut pipeline = SolvePipeline::new(Algorithm::Sensorless, SolverConfig::default());
        let report = pipeline.run(&PuzzleProblem::default()).unwrap();
        assert_eq!(
            report.solution,
            Some(Solution::Actions(vec![Move::Down, Move::Right]))
        );
        assert_eq!(report.states.len(), 3);
    }

    #[test]
    fn test_and_or_report_has_plan() {
        let mut pipeline = SolvePipeline::new(Algorithm::AndOr, SolverConfig::default());
        let report = pipeline.run(&problem("123456708")).unwrap();
        assert!(matches!(report.solution, Some(Solution::Plan(_))));
        let start: PuzzleState = "123456708".parse().unwrap();
        assert_eq!(report.states, vec![start, PuzzleState::GOAL]);
    }

    #[test]
    fn test_csp_report_has_assignment() {
        let config = SolverConfig::default().with_seed(3);
        let mut pipeline = SolvePipeline::new(Algorithm::Ac3, config);
        let report = pipeline.run(&PuzzleProblem::default()).unwrap();
        let Some(Solution::Assignment(assignment)) = report.solution else {
            panic!("expected an assignment");
        };
        assert!(assignment.is_solution());
        assert_eq!(report.states.len(), 1);
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let config = SolverConfig::default().with_seed(17);
        let first = SolvePipeline::new(Algorithm::Annealing, config.clone())
            .run(&problem("413726580"))
            .unwrap();
        let second = SolvePipeline::new(Algorithm::Annealing, config)
            .run(&problem("413726580"))
            .unwrap();
        assert_eq!(first.solution, second.solution);
        assert_eq!(first.nodes_explored, second.nodes_explored);
    }

    #[test]
    fn test_q_learning_report_carries_training() {
        let q_learning = QLearningConfig::default()
            .with_episodes(20)
            .with_shuffle_steps(2);
        let config = SolverConfig::default().with_seed(1).with_q_learning(q_learning);
        let mut pipeline = SolvePipeline::new(Algorithm::QLearning, config);
        let report = pipeline.run(&problem("123456708")).unwrap();
        assert_eq!(report.training.map(|t| t.episodes), Some(20));
    }

    #[test]
    fn test_observers_see_steps() {
        let recorder = RecordingObserver::new();
        let events = recorder.events();
        let mut pipeline = SolvePipeline::new(Algorithm::Bfs, SolverConfig::default())
            .with_observer(Box::new(recorder));
        let report = pipeline.run(&problem("123405786")).unwrap();
        let events = events.borrow();
        assert!(!events.is_empty());
        assert!(events.iter().all(|e| e.status == "expand"));
        assert!(report.is_success());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = SolverConfig::default();
        config.beam.beam_width = 0;
        let mut pipeline = SolvePipeline::new(Algorithm::Beam, config);
        assert!(pipeline.run(&PuzzleProblem::default()).is_err());
    }
}
