//! Simulated annealing

use std::{collections::HashSet, rc::Rc};

use log::debug;
use rand::Rng;

use super::{Failure, Node, PuzzleProblem, SearchResult};
use crate::{
    config::AnnealingConfig,
    ports::{SearchObserver, StepContext},
    puzzle::{Move, PuzzleState},
    utils::weighted_index,
};

type PuzzleNode = Node<PuzzleState, Move>;

/// Simulated annealing over unvisited neighbours.
///
/// Each iteration picks a candidate among the unvisited neighbours: uniformly
/// with probability `random_pick_chance` (accepted outright), otherwise with
/// weight 1 / (h + 1) and accepted if it does not worsen h or with
/// probability exp(-dh / T). A goal among the neighbours ends the run at
/// once. With no unvisited neighbour left the walk falls back to the best
/// node seen. Runs until the temperature drops below `min_temp` or
/// `max_iterations` pass; the best node is then returned only if it is the
/// goal.
pub fn simulated_annealing<R: Rng + ?Sized>(
    problem: &PuzzleProblem,
    config: &AnnealingConfig,
    rng: &mut R,
    observer: &mut dyn SearchObserver<PuzzleState>,
) -> SearchResult<PuzzleState> {
    const NAME: &str = "Simulated annealing";
    if !problem.initial().is_solvable(problem.goal()) {
        return SearchResult::unsolvable().logged(NAME);
    }

    let mut current: Rc<PuzzleNode> = Node::root(*problem.initial(), problem.h(problem.initial()));
    let mut best = Rc::clone(&current);
    let mut visited = HashSet::from([current.state.key()]);
    let mut temp = config.initial_temp;
    let mut nodes = 1;
    let mut iterations = 0;
    let mut last_improvement = 0;
    let cooling_switch = config.max_iterations / 3;

    while temp > config.min_temp && iterations < config.max_iterations {
        if current.state.is_goal(problem.goal()) {
            return SearchResult::solved(current.path(), nodes).logged(NAME);
        }
        observer.on_step(&StepContext::new(iterations, &current.state, "anneal").with_score(temp));

        let mut neighbours = Vec::new();
        for (mv, next) in current.state.successors() {
            if visited.contains(&next.key()) {
                continue;
            }
            let child = Node::child(&current, mv, next, 1, problem.h(&next));
            nodes += 1;
            if child.state.is_goal(problem.goal()) {
                return SearchResult::solved(child.path(), nodes).logged(NAME);
            }
            if child.heuristic < best.heuristic {
                best = Rc::clone(&child);
                last_improvement = iterations;
            }
            neighbours.push(child);
        }

        if neighbours.is_empty() {
            if best.heuristic < current.heuristic {
                current = Rc::clone(&best);
            }
        } else if rng.random::<f64>() < config.random_pick_chance {
            let idx = rng.random_range(0..neighbours.len());
            let chosen = neighbours.swap_remove(idx);
            visited.insert(chosen.state.key());
            current = chosen;
        } else {
            let weights: Vec<f64> = neighbours
                .iter()
                .map(|n| 1.0 / (n.heuristic as f64 + 1.0))
                .collect();
            if let Some(idx) = weighted_index(&weights, rng) {
                let chosen = neighbours.swap_remove(idx);
                let delta = chosen.heuristic as f64 - current.heuristic as f64;
                if delta <= 0.0 || rng.random::<f64>() < (-delta / temp).exp() {
                    visited.insert(chosen.state.key());
                    current = chosen;
                }
            }
        }

        temp *= if iterations < cooling_switch {
            config.cooling_rate
        } else {
            config.cooling_rate * config.cooling_rate
        };
        iterations += 1;

        if iterations.is_multiple_of(config.reheat_interval)
            && iterations - last_improvement >= config.reheat_interval
        {
            temp = (temp * config.reheat_factor).min(config.initial_temp / 2.0);
            debug!("{NAME}: reheating to {temp:.3} at iteration {iterations}");
            observer.on_step(
                &StepContext::new(iterations, &current.state, "reheat").with_score(temp),
            );
        }
    }

    if best.heuristic < current.heuristic {
        current = best;
    }
    if current.state.is_goal(problem.goal()) {
        return SearchResult::solved(current.path(), nodes).logged(NAME);
    }
    let failure = if iterations >= config.max_iterations {
        Failure::IterationLimit
    } else {
        Failure::Frozen
    };
    SearchResult::failed(failure, nodes).logged(NAME)
}
