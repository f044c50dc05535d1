//! Breadth-first search over belief states

use std::{
    collections::{HashSet, VecDeque},
    time::Instant,
};

use log::{debug, info, warn};
use serde::Serialize;

use super::{BeliefProblem, BeliefState};
use crate::{
    config::BeliefConfig,
    ports::{SearchObserver, StepContext},
    puzzle::Move,
    search::Failure,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BeliefSearchStats {
    pub nodes_expanded: usize,
    pub max_frontier_size: usize,
    pub time_limit_reached: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BeliefSearchResult {
    /// Moves that take every initial state into the goal set
    pub plan: Option<Vec<Move>>,
    pub stats: BeliefSearchStats,
    /// `TimeLimit` when the clock ran out; `DepthLimit` or `Exhausted` when
    /// the search finished without a plan.
    pub failure: Option<Failure>,
}

impl BeliefSearchResult {
    pub fn is_success(&self) -> bool {
        self.plan.is_some()
    }
}

#[derive(Debug, Clone, Copy)]
enum Expansion {
    /// Blocked states stay where they are
    Uniform,
    /// Blocked states are discarded
    Filtered,
}

impl Expansion {
    fn apply(self, belief: &BeliefState, mv: Move) -> BeliefState {
        match self {
            Expansion::Uniform => belief.apply_uniform(mv),
            Expansion::Filtered => belief.apply_filtered(mv),
        }
    }
}

fn belief_bfs(
    name: &str,
    problem: &BeliefProblem,
    expansion: Expansion,
    config: &BeliefConfig,
    observer: &mut dyn SearchObserver<BeliefState>,
) -> BeliefSearchResult {
    let started = Instant::now();
    let max_time = config.max_time();
    let mut stats = BeliefSearchStats::default();
    let finish = |plan: Option<Vec<Move>>, failure: Option<Failure>, stats: BeliefSearchStats| {
        match &plan {
            Some(plan) => info!(
                "{name}: plan of {} moves, {} beliefs expanded",
                plan.len(),
                stats.nodes_expanded
            ),
            None => info!(
                "{name}: no plan ({}), {} beliefs expanded",
                failure.map_or_else(String::new, |f| f.to_string()),
                stats.nodes_expanded
            ),
        }
        BeliefSearchResult { plan, stats, failure }
    };

    if problem.initial().is_within(problem.goals()) {
        return finish(Some(Vec::new()), None, stats);
    }

    let mut frontier: VecDeque<(BeliefState, Vec<Move>)> =
        VecDeque::from([(problem.initial().clone(), Vec::new())]);
    let mut explored: HashSet<BeliefState> = HashSet::new();
    let mut depth_cut = false;
    let mut reported_depth = 0;

    loop {
        stats.max_frontier_size = stats.max_frontier_size.max(frontier.len());
        let Some((belief, plan)) = frontier.pop_front() else { break };
        if started.elapsed() > max_time {
            warn!("{name}: time limit of {:?} reached", max_time);
            stats.time_limit_reached = true;
            return finish(None, Some(Failure::TimeLimit), stats);
        }
        if plan.len() >= config.max_depth {
            depth_cut = true;
            continue;
        }
        if !explored.insert(belief.clone()) {
            continue;
        }
        stats.nodes_expanded += 1;
        if plan.len() > reported_depth {
            reported_depth = plan.len();
            debug!("{name}: depth {reported_depth}, frontier {}", frontier.len());
        }
        observer.on_step(
            &StepContext::new(stats.nodes_expanded, &belief, "expand")
                .with_score(belief.len() as f64),
        );

        for mv in Move::ALL {
            if started.elapsed() > max_time {
                warn!("{name}: time limit of {:?} reached", max_time);
                stats.time_limit_reached = true;
                return finish(None, Some(Failure::TimeLimit), stats);
            }
            if !belief.allows(mv) {
                continue;
            }
            let next = expansion.apply(&belief, mv);
            let mut next_plan = plan.clone();
            next_plan.push(mv);
            if next.is_within(problem.goals()) {
                return finish(Some(next_plan), None, stats);
            }
            frontier.push_back((next, next_plan));
        }
    }

    let failure = if depth_cut { Failure::DepthLimit } else { Failure::Exhausted };
    finish(None, Some(failure), stats)
}

/// Sensorless (conformant) planning.
///
/// Each move is applied to every state of the belief; a state where the move
/// is blocked stays put. Succeeds once every state of the belief is a goal.
/// The clock is checked at every frontier pop and before each move.
pub fn sensorless_search(
    problem: &BeliefProblem,
    config: &BeliefConfig,
    observer: &mut dyn SearchObserver<BeliefState>,
) -> BeliefSearchResult {
    belief_bfs("Sensorless search", problem, Expansion::Uniform, config, observer)
}

/// Planning with partial observation.
///
/// Same search as [`sensorless_search`], but the goal set comes from an
/// observation (see [`BeliefProblem::partial`]) and states on which a move is
/// blocked drop out of the belief.
pub fn partial_observation_search(
    problem: &BeliefProblem,
    config: &BeliefConfig,
    observer: &mut dyn SearchObserver<BeliefState>,
) -> BeliefSearchResult {
    belief_bfs("Partial observation search", problem, Expansion::Filtered, config, observer)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{belief::Observation, ports::NoopObserver, puzzle::PuzzleState};

    /// Applies the plan to every initial state the way the search does.
    fn run_plan(problem: &BeliefProblem, plan: &[Move], expansion: Expansion) -> BeliefState {
        plan.iter()
            .fold(problem.initial().clone(), |belief, &mv| expansion.apply(&belief, mv))
    }

    #[test]
    fn test_sensorless_default_plan() {
        let problem = BeliefProblem::sensorless();
        let result = sensorless_search(&problem, &BeliefConfig::default(), &mut NoopObserver);
        let plan = result.plan.expect("plan");
        assert_eq!(plan, vec![Move::Down, Move::Right]);
        assert!(run_plan(&problem, &plan, Expansion::Uniform).is_within(problem.goals()));
        assert!(!result.stats.time_limit_reached);
        assert!(result.stats.nodes_expanded >= 1);
        assert!(result.stats.max_frontier_size >= 1);
    }

    #[test]
    fn test_partial_observation_plan() {
        let problem = BeliefProblem::partial("0,0=1".parse::<Observation>().unwrap());
        let config = BeliefConfig::default();
        let result = partial_observation_search(&problem, &config, &mut NoopObserver);
        let plan = result.plan.expect("plan");
        let end = run_plan(&problem, &plan, Expansion::Filtered);
        assert!(end.is_within(problem.goals()));
    }

    #[test]
    fn test_initial_goal_belief_needs_no_moves() {
        let goal = BeliefState::new([PuzzleState::GOAL]);
        let problem = BeliefProblem::new(goal.clone(), goal).unwrap();
        let result = sensorless_search(&problem, &BeliefConfig::default(), &mut NoopObserver);
        assert_eq!(result.plan, Some(Vec::new()));
    }

    #[test]
    fn test_time_limit_is_distinct_from_no_plan() {
        let problem = BeliefProblem::sensorless();
        let config = BeliefConfig::default().with_max_time(Duration::ZERO);
        let result = sensorless_search(&problem, &config, &mut NoopObserver);
        assert_eq!(result.failure, Some(Failure::TimeLimit));
        assert!(result.stats.time_limit_reached);
    }

    #[test]
    fn test_depth_limit() {
        let problem = BeliefProblem::sensorless();
        let config = BeliefConfig::default().with_max_depth(1);
        let result = sensorless_search(&problem, &config, &mut NoopObserver);
        assert_eq!(result.failure, Some(Failure::DepthLimit));
        assert!(!result.stats.time_limit_reached);
    }

    #[test]
    fn test_unreachable_goal_stops_at_depth_limit() {
        // Opposite parity: no move sequence reaches it from either state
        let initial = BeliefState::new(["123456708".parse::<PuzzleState>().unwrap()]);
        let goals = BeliefState::new(["213456780".parse::<PuzzleState>().unwrap()]);
        let problem = BeliefProblem::new(initial, goals).unwrap();
        let config = BeliefConfig::default().with_max_depth(4);
        let result = partial_observation_search(&problem, &config, &mut NoopObserver);
        assert_eq!(result.failure, Some(Failure::DepthLimit));
    }
}
