//! Beam search

use std::{collections::HashSet, rc::Rc};

use log::trace;

use super::{Failure, Node, PuzzleProblem, SearchResult};
use crate::{
    config::BeamConfig,
    ports::{SearchObserver, StepContext},
    puzzle::{Move, PuzzleState},
};

/// Level-by-level search keeping only the `beam_width` best successors.
///
/// Successors of the whole beam are ranked by f = g + h (stable, so ties keep
/// generation order). Succeeds as soon as a goal is generated and fails when
/// a level produces no unvisited successor.
pub fn beam_search(
    problem: &PuzzleProblem,
    config: &BeamConfig,
    observer: &mut dyn SearchObserver<PuzzleState>,
) -> SearchResult<PuzzleState> {
    const NAME: &str = "Beam search";
    if !problem.initial().is_solvable(problem.goal()) {
        return SearchResult::unsolvable().logged(NAME);
    }

    let root: Rc<Node<PuzzleState, Move>> =
        Node::root(*problem.initial(), problem.h(problem.initial()));
    if root.state.is_goal(problem.goal()) {
        return SearchResult::solved(root.path(), 1).logged(NAME);
    }

    let mut visited = HashSet::from([root.state.key()]);
    let mut beam = vec![root];
    let mut nodes = 1;
    let mut step = 0;

    while !beam.is_empty() {
        let mut successors = Vec::new();
        for node in &beam {
            observer.on_step(
                &StepContext::new(step, &node.state, "expand").with_score(node.f() as f64),
            );
            step += 1;

            for (mv, next) in node.state.successors() {
                if visited.contains(&next.key()) {
                    continue;
                }
                let child = Node::child(node, mv, next, 1, problem.h(&next));
                if child.state.is_goal(problem.goal()) {
                    return SearchResult::solved(child.path(), nodes + 1).logged(NAME);
                }
                visited.insert(child.state.key());
                successors.push(child);
                nodes += 1;
            }
        }

        if successors.is_empty() {
            return SearchResult::failed(Failure::Exhausted, nodes).logged(NAME);
        }
        successors.sort_by_key(|node| node.f());
        successors.truncate(config.beam_width.max(1));
        trace!(
            "{NAME}: level {} keeps f = {:?}",
            successors[0].depth,
            successors.iter().map(|n| n.f()).collect::<Vec<_>>()
        );
        beam = successors;
    }

    SearchResult::failed(Failure::Exhausted, nodes).logged(NAME)
}
