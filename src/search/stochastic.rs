//! Stochastic hill climbing with sideways moves and random restarts

use std::{collections::HashSet, rc::Rc};

use log::debug;
use rand::{Rng, seq::IndexedRandom};

use super::{Failure, Node, PuzzleProblem, SearchResult};
use crate::{
    config::StochasticConfig,
    ports::{SearchObserver, StepContext},
    puzzle::{Move, PuzzleState},
    utils::weighted_index,
};

type PuzzleNode = Node<PuzzleState, Move>;

/// Start node of a restart: the initial state, or after the first restart a
/// random walk away from it. The walk stays in the node chain, so every
/// returned path still begins at the problem's initial state.
fn restart_node<R: Rng + ?Sized>(
    problem: &PuzzleProblem,
    config: &StochasticConfig,
    restart: usize,
    rng: &mut R,
) -> Rc<PuzzleNode> {
    let mut node = Node::root(*problem.initial(), problem.h(problem.initial()));
    if restart == 0 {
        return node;
    }
    let steps = rng.random_range(config.min_perturbation..=config.max_perturbation);
    for _ in 0..steps {
        let moves: Vec<Move> = node.state.legal_moves().collect();
        let Some(&mv) = moves.choose(rng) else { break };
        let next = node.state.apply_or_stay(mv);
        node = Node::child(&node, mv, next, 1, problem.h(&next));
    }
    node
}

/// Stochastic hill climbing.
///
/// Unvisited neighbours fall into better, sideways and worse buckets. A
/// better neighbour is picked with probability proportional to its
/// improvement; failing that, up to `sideways_limit` consecutive sideways
/// moves cross a plateau; failing that, a worse neighbour is taken with
/// probability `uphill_probability`, weighted by exp(-w / 2) toward small
/// degradations. Otherwise the climb falls back to its best node or stops.
///
/// Restarts repeat the climb from random walks off the initial state and the
/// shortest solution across all restarts wins. Restarting stops early once a
/// solution of at most `good_enough_length` states is known.
pub fn stochastic_hill_climbing<R: Rng + ?Sized>(
    problem: &PuzzleProblem,
    config: &StochasticConfig,
    rng: &mut R,
    observer: &mut dyn SearchObserver<PuzzleState>,
) -> SearchResult<PuzzleState> {
    const NAME: &str = "Stochastic hill climbing";
    if !problem.initial().is_solvable(problem.goal()) {
        return SearchResult::unsolvable().logged(NAME);
    }

    let mut nodes = 0;
    let mut best_solution: Option<Vec<PuzzleState>> = None;
    let mut failure = Failure::LocalOptimum;
    let mut step = 0;

    for restart in 0..config.restart_limit {
        let mut current = restart_node(problem, config, restart, rng);
        debug!(
            "{NAME}: restart {restart} from h = {} after {} random moves",
            current.heuristic, current.depth
        );
        observer.on_step(&StepContext::new(step, &current.state, "restart"));
        step += 1;
        nodes += 1;

        let mut visited: HashSet<_> = current.path().iter().map(|s| s.key()).collect();
        let mut best = Rc::clone(&current);
        let mut plateau = 0;
        let mut iterations = 0;

        while !current.state.is_goal(problem.goal()) && iterations < config.max_iterations {
            let mut better = Vec::new();
            let mut sideways = Vec::new();
            let mut worse = Vec::new();
            for (mv, next) in current.state.successors() {
                if visited.contains(&next.key()) {
                    continue;
                }
                let child = Node::child(&current, mv, next, 1, problem.h(&next));
                nodes += 1;
                if child.heuristic < best.heuristic {
                    best = Rc::clone(&child);
                    plateau = 0;
                }
                match child.heuristic.cmp(&current.heuristic) {
                    std::cmp::Ordering::Less => better.push(child),
                    std::cmp::Ordering::Equal => sideways.push(child),
                    std::cmp::Ordering::Greater => worse.push(child),
                }
            }
            iterations += 1;

            let chosen = if !better.is_empty() {
                let weights: Vec<f64> = better
                    .iter()
                    .map(|n| (current.heuristic - n.heuristic) as f64)
                    .collect();
                weighted_index(&weights, rng).map(|i| better.swap_remove(i))
            } else if !sideways.is_empty() && plateau < config.sideways_limit {
                plateau += 1;
                sideways.choose(rng).cloned()
            } else if !worse.is_empty() && rng.random::<f64>() < config.uphill_probability {
                plateau = 0;
                let weights: Vec<f64> = worse
                    .iter()
                    .map(|n| (-((n.heuristic - current.heuristic) as f64) / 2.0).exp())
                    .collect();
                weighted_index(&weights, rng).map(|i| worse.swap_remove(i))
            } else {
                None
            };

            match chosen {
                Some(next) => {
                    visited.insert(next.state.key());
                    current = next;
                    observer.on_step(
                        &StepContext::new(step, &current.state, "climb")
                            .with_score(current.heuristic as f64),
                    );
                    step += 1;
                }
                None if best.heuristic < current.heuristic => {
                    current = Rc::clone(&best);
                    plateau = 0;
                }
                None => break,
            }
        }

        if current.state.is_goal(problem.goal()) {
            let path = current.path();
            debug!("{NAME}: restart {restart} reached the goal in {} states", path.len());
            if best_solution.as_ref().is_none_or(|known| path.len() < known.len()) {
                best_solution = Some(path);
            }
            if best_solution
                .as_ref()
                .is_some_and(|known| known.len() <= config.good_enough_length)
            {
                break;
            }
        } else if iterations >= config.max_iterations {
            failure = Failure::IterationLimit;
        }
    }

    match best_solution {
        Some(path) => SearchResult::solved(path, nodes).logged(NAME),
        None => SearchResult::failed(failure, nodes).logged(NAME),
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{ports::NoopObserver, puzzle::moves_of_path};

    #[test]
    fn test_paths_start_at_initial_state() {
        let p = PuzzleProblem::parse(Some("413726580"), None).unwrap();
        let config = StochasticConfig::default().with_restart_limit(10);
        let mut solved = 0;
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let result = stochastic_hill_climbing(&p, &config, &mut rng, &mut NoopObserver);
            if let Some(path) = result.path {
                solved += 1;
                assert_eq!(path[0], *p.initial());
                assert!(path.last().unwrap().is_goal(p.goal()));
                assert!(moves_of_path(&path).is_some());
            }
        }
        assert!(solved > 0);
    }

    #[test]
    fn test_first_restart_solves_easy_instance() {
        let p = PuzzleProblem::parse(Some("123405786"), None).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let config = StochasticConfig::default();
        let result = stochastic_hill_climbing(&p, &config, &mut rng, &mut NoopObserver);
        assert_eq!(result.steps(), Some(2));
    }

    #[test]
    fn test_unsolvable_short_circuits() {
        let p = PuzzleProblem::parse(Some("213456780"), None).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let config = StochasticConfig::default();
        let result = stochastic_hill_climbing(&p, &config, &mut rng, &mut NoopObserver);
        assert_eq!(result.failure, Some(Failure::Unsolvable));
    }

    #[test]
    fn test_zero_restarts_fails_cleanly() {
        let p = PuzzleProblem::parse(Some("413726580"), None).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let config = StochasticConfig::default().with_restart_limit(0);
        let result = stochastic_hill_climbing(&p, &config, &mut rng, &mut NoopObserver);
        assert!(!result.is_success());
        assert_eq!(result.nodes_explored, 0);
    }
}
