//! Deterministic hill climbing

use std::{collections::HashSet, rc::Rc};

use super::{Failure, Node, PuzzleProblem, SearchResult};
use crate::{
    ports::{SearchObserver, StepContext},
    puzzle::{Move, PuzzleState},
};

type PuzzleNode = Node<PuzzleState, Move>;

/// Which improving neighbour to move to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ascent {
    FirstImproving,
    Steepest,
}

fn climb(
    problem: &PuzzleProblem,
    ascent: Ascent,
    name: &str,
    observer: &mut dyn SearchObserver<PuzzleState>,
) -> SearchResult<PuzzleState> {
    if !problem.initial().is_solvable(problem.goal()) {
        return SearchResult::unsolvable().logged(name);
    }

    let mut current: Rc<PuzzleNode> = Node::root(*problem.initial(), problem.h(problem.initial()));
    let mut visited = HashSet::from([current.state.key()]);
    let mut nodes = 1;
    let mut step = 0;

    while !current.state.is_goal(problem.goal()) {
        observer.on_step(
            &StepContext::new(step, &current.state, "climb").with_score(current.heuristic as f64),
        );
        step += 1;

        let mut best: Option<Rc<PuzzleNode>> = None;
        for (mv, next) in current.state.successors() {
            if visited.contains(&next.key()) {
                continue;
            }
            let h = problem.h(&next);
            nodes += 1;
            let bar = best.as_ref().map_or(current.heuristic, |b| b.heuristic);
            if h < bar {
                best = Some(Node::child(&current, mv, next, 1, h));
                if ascent == Ascent::FirstImproving {
                    break;
                }
            }
        }

        let Some(next) = best else {
            return SearchResult::failed(Failure::LocalOptimum, nodes).logged(name);
        };
        visited.insert(next.state.key());
        current = next;
    }

    SearchResult::solved(current.path(), nodes).logged(name)
}

/// Move to the first neighbour with a strictly lower heuristic.
///
/// Fails at a local optimum. Already visited states are never revisited.
pub fn simple_hill_climbing(
    problem: &PuzzleProblem,
    observer: &mut dyn SearchObserver<PuzzleState>,
) -> SearchResult<PuzzleState> {
    climb(problem, Ascent::FirstImproving, "Simple hill climbing", observer)
}

/// Evaluate every neighbour and move to the best one if it improves.
pub fn steepest_ascent_hill_climbing(
    problem: &PuzzleProblem,
    observer: &mut dyn SearchObserver<PuzzleState>,
) -> SearchResult<PuzzleState> {
    climb(problem, Ascent::Steepest, "Steepest-ascent hill climbing", observer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ports::NoopObserver, puzzle::moves_of_path};

    fn problem(initial: &str) -> PuzzleProblem {
        PuzzleProblem::parse(Some(initial), None).unwrap()
    }

    #[test]
    fn test_climbs_easy_instance() {
        let p = problem("123405786");
        for result in [
            simple_hill_climbing(&p, &mut NoopObserver),
            steepest_ascent_hill_climbing(&p, &mut NoopObserver),
        ] {
            let path = result.path.unwrap();
            assert_eq!(path.len(), 3);
            assert!(moves_of_path(&path).is_some());
        }
    }

    #[test]
    fn test_local_optimum_is_reported() {
        // h = 4 here, six moves from the goal, and no neighbour is better
        let p = problem("152436780");
        let result = steepest_ascent_hill_climbing(&p, &mut NoopObserver);
        assert_eq!(result.failure, Some(Failure::LocalOptimum));
        assert!(result.nodes_explored > 1);
    }

    #[test]
    fn test_unsolvable_short_circuits() {
        let result = simple_hill_climbing(&problem("213456780"), &mut NoopObserver);
        assert_eq!(result.failure, Some(Failure::Unsolvable));
    }

    #[test]
    fn test_steepest_never_increases_heuristic() {
        let p = problem("413726580");
        let result = steepest_ascent_hill_climbing(&p, &mut NoopObserver);
        if let Some(path) = result.path {
            let hs: Vec<u32> = path.iter().map(|s| p.h(s)).collect();
            assert!(hs.windows(2).all(|w| w[1] < w[0]));
        }
    }
}
