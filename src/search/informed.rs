//! Informed search: greedy best-first, A* and IDA*

use std::{
    collections::{HashMap, HashSet},
    rc::Rc,
};

use log::{debug, trace};

use super::{Failure, Node, SearchProblem, SearchResult, frontier::PriorityFrontier};
use crate::{
    config::SearchLimits,
    ports::{SearchObserver, StepContext},
};

type NodeRef<P> = Rc<Node<<P as SearchProblem>::State, <P as SearchProblem>::Action>>;

/// Greedy best-first search ordered purely by the heuristic.
///
/// Fast but not optimal. Uses the same visited-set discipline as BFS.
pub fn greedy_best_first<P: SearchProblem>(
    problem: &P,
    limits: &SearchLimits,
    observer: &mut dyn SearchObserver<P::State>,
) -> SearchResult<P::State> {
    const NAME: &str = "Greedy";
    if !problem.is_solvable() {
        return SearchResult::unsolvable().logged(NAME);
    }

    let initial = problem.initial_state();
    let h = problem.heuristic(&initial);
    let root: NodeRef<P> = Node::root(initial, h);
    let mut visited = HashSet::from([problem.key(&root.state)]);
    let mut frontier = PriorityFrontier::new();
    frontier.push(h, root);
    let mut nodes = 1;
    let mut step = 0;

    while let Some(node) = frontier.pop() {
        observer.on_step(
            &StepContext::new(step, &node.state, "expand").with_score(node.heuristic as f64),
        );
        step += 1;

        if problem.is_goal(&node.state) {
            return SearchResult::solved(node.path(), nodes).logged(NAME);
        }
        if !limits.depth_allows(node.depth + 1) {
            continue;
        }

        for (action, next) in problem.successors(&node.state) {
            if !visited.insert(problem.key(&next)) {
                continue;
            }
            let cost = problem.step_cost(&node.state, action, &next);
            let h = problem.heuristic(&next);
            frontier.push(h, Node::child(&node, action, next, cost, h));
            nodes += 1;
            if limits.nodes_exhausted(nodes) {
                return SearchResult::failed(Failure::NodeLimit, nodes).logged(NAME);
            }
        }
    }

    SearchResult::failed(Failure::Exhausted, nodes).logged(NAME)
}

/// A* search ordered by f = g + h, ties broken by insertion order.
///
/// A state is re-inserted whenever it is reached with a strictly cheaper g,
/// even if it was seen before; outdated frontier entries are skipped on pop.
/// Returns an optimal path when the heuristic is admissible.
pub fn astar<P: SearchProblem>(
    problem: &P,
    limits: &SearchLimits,
    observer: &mut dyn SearchObserver<P::State>,
) -> SearchResult<P::State> {
    const NAME: &str = "A*";
    if !problem.is_solvable() {
        return SearchResult::unsolvable().logged(NAME);
    }

    let initial = problem.initial_state();
    let h = problem.heuristic(&initial);
    let root: NodeRef<P> = Node::root(initial, h);
    let mut best_cost = HashMap::from([(problem.key(&root.state), 0u32)]);
    let mut frontier = PriorityFrontier::new();
    frontier.push(root.f(), root);
    let mut nodes = 1;
    let mut step = 0;

    while let Some(node) = frontier.pop() {
        if best_cost
            .get(&problem.key(&node.state))
            .is_some_and(|&g| node.path_cost > g)
        {
            trace!("{NAME}: skipping stale entry with g = {}", node.path_cost);
            continue;
        }

        observer
            .on_step(&StepContext::new(step, &node.state, "expand").with_score(node.f() as f64));
        step += 1;

        if problem.is_goal(&node.state) {
            debug!("{NAME}: peak frontier size {}", frontier.max_len());
            return SearchResult::solved(node.path(), nodes).logged(NAME);
        }
        if !limits.depth_allows(node.depth + 1) {
            continue;
        }

        for (action, next) in problem.successors(&node.state) {
            let step_cost = problem.step_cost(&node.state, action, &next);
            let g = node.path_cost + step_cost;
            let key = problem.key(&next);
            if best_cost.get(&key).is_some_and(|&known| known <= g) {
                continue;
            }
            best_cost.insert(key, g);
            let h = problem.heuristic(&next);
            let child = Node::child(&node, action, next, step_cost, h);
            frontier.push(child.f(), child);
            nodes += 1;
            if limits.nodes_exhausted(nodes) {
                return SearchResult::failed(Failure::NodeLimit, nodes).logged(NAME);
            }
        }
    }

    SearchResult::failed(Failure::Exhausted, nodes).logged(NAME)
}

enum Probe {
    Found,
    /// Smallest f that exceeded the threshold; `None` if nothing was pruned
    Exceeded(Option<u32>),
    NodeLimit,
}

struct IdaStar<'a, P: SearchProblem> {
    problem: &'a P,
    limits: &'a SearchLimits,
    observer: &'a mut dyn SearchObserver<P::State>,
    path: Vec<P::State>,
    nodes: usize,
    step: usize,
}

impl<P: SearchProblem> IdaStar<'_, P> {
    fn probe(&mut self, g: u32, threshold: u32) -> Probe {
        let Some(current) = self.path.last().cloned() else {
            return Probe::Exceeded(None);
        };
        let f = g + self.problem.heuristic(&current);
        if f > threshold {
            return Probe::Exceeded(Some(f));
        }

        self.observer
            .on_step(&StepContext::new(self.step, &current, "expand").with_score(f as f64));
        self.step += 1;

        if self.problem.is_goal(&current) {
            return Probe::Found;
        }

        let mut min_overflow: Option<u32> = None;
        for (action, next) in self.problem.successors(&current) {
            // Cycle check against the live path only.
            if self.path.contains(&next) {
                continue;
            }
            let cost = self.problem.step_cost(&current, action, &next);
            self.path.push(next);
            self.nodes += 1;
            if self.limits.nodes_exhausted(self.nodes) {
                return Probe::NodeLimit;
            }
            match self.probe(g + cost, threshold) {
                Probe::Found => return Probe::Found,
                Probe::NodeLimit => return Probe::NodeLimit,
                Probe::Exceeded(Some(overflow)) => {
                    min_overflow = Some(min_overflow.map_or(overflow, |m| m.min(overflow)));
                }
                Probe::Exceeded(None) => {}
            }
            self.path.pop();
        }
        Probe::Exceeded(min_overflow)
    }
}

/// IDA*: depth-first probes bounded by an f threshold.
///
/// The threshold starts at h(initial) and rises to the smallest f that
/// overflowed in the previous probe. States may be revisited across probes;
/// within a probe only the current path is checked for cycles. Fails when a
/// probe prunes nothing, i.e. the next threshold would be infinite.
pub fn ida_star<P: SearchProblem>(
    problem: &P,
    limits: &SearchLimits,
    observer: &mut dyn SearchObserver<P::State>,
) -> SearchResult<P::State> {
    const NAME: &str = "IDA*";
    if !problem.is_solvable() {
        return SearchResult::unsolvable().logged(NAME);
    }

    let initial = problem.initial_state();
    let mut threshold = problem.heuristic(&initial);
    let mut search = IdaStar {
        problem,
        limits,
        observer,
        path: vec![initial],
        nodes: 0,
        step: 0,
    };

    loop {
        debug!("{NAME}: probing with threshold {threshold}");
        // The root counts once per probe, as in iterative deepening.
        search.nodes += 1;
        if limits.nodes_exhausted(search.nodes) {
            return SearchResult::failed(Failure::NodeLimit, search.nodes).logged(NAME);
        }
        match search.probe(0, threshold) {
            Probe::Found => {
                return SearchResult::solved(search.path, search.nodes).logged(NAME);
            }
            Probe::NodeLimit => {
                return SearchResult::failed(Failure::NodeLimit, search.nodes).logged(NAME);
            }
            Probe::Exceeded(None) => {
                return SearchResult::failed(Failure::Exhausted, search.nodes).logged(NAME);
            }
            Probe::Exceeded(Some(next)) => threshold = next,
        }
    }
}
