//! Uninformed search: BFS, depth-limited DFS, iterative deepening and UCS
//!
//! Node counts include the initial node and every node generated afterwards.
//! Unsolvable instances return immediately with zero nodes.

use std::{
    collections::{HashMap, HashSet, VecDeque},
    rc::Rc,
};

use log::{debug, trace};

use super::{Failure, Node, SearchProblem, SearchResult, frontier::PriorityFrontier};
use crate::{
    config::SearchLimits,
    ports::{SearchObserver, StepContext},
};

type NodeRef<P> = Rc<Node<<P as SearchProblem>::State, <P as SearchProblem>::Action>>;

/// Breadth-first search with a FIFO frontier.
///
/// Children are goal-tested as they are generated, so the returned path is
/// shortest in moves. Expansion follows the problem's successor order.
pub fn breadth_first_search<P: SearchProblem>(
    problem: &P,
    limits: &SearchLimits,
    observer: &mut dyn SearchObserver<P::State>,
) -> SearchResult<P::State> {
    const NAME: &str = "BFS";
    if !problem.is_solvable() {
        return SearchResult::unsolvable().logged(NAME);
    }

    let root: NodeRef<P> = Node::root(problem.initial_state(), 0);
    if problem.is_goal(&root.state) {
        return SearchResult::solved(root.path(), 1).logged(NAME);
    }

    let mut visited = HashSet::from([problem.key(&root.state)]);
    let mut frontier = VecDeque::from([root]);
    let mut nodes = 1;
    let mut cut_off = false;
    let mut step = 0;

    while let Some(node) = frontier.pop_front() {
        observer.on_step(&StepContext::new(step, &node.state, "expand"));
        step += 1;

        if !limits.depth_allows(node.depth + 1) {
            cut_off = true;
            continue;
        }

        for (action, next) in problem.successors(&node.state) {
            if !visited.insert(problem.key(&next)) {
                continue;
            }
            let cost = problem.step_cost(&node.state, action, &next);
            let child = Node::child(&node, action, next, cost, 0);
            nodes += 1;
            if problem.is_goal(&child.state) {
                return SearchResult::solved(child.path(), nodes).logged(NAME);
            }
            if limits.nodes_exhausted(nodes) {
                return SearchResult::failed(Failure::NodeLimit, nodes).logged(NAME);
            }
            frontier.push_back(child);
        }
    }

    let failure = if cut_off {
        Failure::DepthLimit
    } else {
        Failure::Exhausted
    };
    SearchResult::failed(failure, nodes).logged(NAME)
}

/// Depth-first search with a LIFO frontier, bounded by `limits.max_depth`.
///
/// Every state generated is recorded with the shallowest depth it was reached
/// at, and is only pushed again when a later route reaches it shallower. That
/// record is what prevents cycling, and it keeps a state first met near the
/// cutoff from hiding a shorter route through it, so a goal within
/// `max_depth` moves is always found.
pub fn depth_first_search<P: SearchProblem>(
    problem: &P,
    limits: &SearchLimits,
    observer: &mut dyn SearchObserver<P::State>,
) -> SearchResult<P::State> {
    const NAME: &str = "DFS";
    if !problem.is_solvable() {
        return SearchResult::unsolvable().logged(NAME);
    }

    let root: NodeRef<P> = Node::root(problem.initial_state(), 0);
    let mut shallowest = HashMap::from([(problem.key(&root.state), 0usize)]);
    let mut stack = vec![root];
    let mut nodes = 1;
    let mut cut_off = false;
    let mut step = 0;

    while let Some(node) = stack.pop() {
        if shallowest
            .get(&problem.key(&node.state))
            .is_some_and(|&depth| depth < node.depth)
        {
            continue;
        }
        observer.on_step(&StepContext::new(step, &node.state, "expand"));
        step += 1;

        if problem.is_goal(&node.state) {
            return SearchResult::solved(node.path(), nodes).logged(NAME);
        }
        if !limits.depth_allows(node.depth + 1) {
            cut_off = true;
            continue;
        }

        for (action, next) in problem.successors(&node.state) {
            let depth = node.depth + 1;
            let key = problem.key(&next);
            if shallowest.get(&key).is_some_and(|&seen| seen <= depth) {
                continue;
            }
            shallowest.insert(key, depth);
            let cost = problem.step_cost(&node.state, action, &next);
            stack.push(Node::child(&node, action, next, cost, 0));
            nodes += 1;
            if limits.nodes_exhausted(nodes) {
                return SearchResult::failed(Failure::NodeLimit, nodes).logged(NAME);
            }
        }
    }

    let failure = if cut_off {
        Failure::DepthLimit
    } else {
        Failure::Exhausted
    };
    SearchResult::failed(failure, nodes).logged(NAME)
}

enum DepthLimited<N> {
    Found(N),
    CutOff,
    Exhausted,
    NodeLimit,
}

/// Iterative deepening: depth-limited DFS for limits 0, 1, ..., `max_depth`.
///
/// Node counts accumulate across iterations. Within an iteration a state is
/// re-expanded only when reached at a shallower depth than before, so the
/// first iteration that can reach the goal finds it.
pub fn iterative_deepening_search<P: SearchProblem>(
    problem: &P,
    limits: &SearchLimits,
    observer: &mut dyn SearchObserver<P::State>,
) -> SearchResult<P::State> {
    const NAME: &str = "IDS";
    if !problem.is_solvable() {
        return SearchResult::unsolvable().logged(NAME);
    }

    let max_depth = limits.max_depth.unwrap_or(usize::MAX);
    let mut total_nodes = 0;
    let mut step = 0;

    for depth_limit in 0..=max_depth {
        debug!("{NAME}: depth limit {depth_limit}");
        let outcome = depth_limited::<P>(
            problem,
            depth_limit,
            limits,
            &mut total_nodes,
            &mut step,
            observer,
        );
        match outcome {
            DepthLimited::Found(node) => {
                return SearchResult::solved(node.path(), total_nodes).logged(NAME);
            }
            DepthLimited::Exhausted => {
                return SearchResult::failed(Failure::Exhausted, total_nodes).logged(NAME);
            }
            DepthLimited::NodeLimit => {
                return SearchResult::failed(Failure::NodeLimit, total_nodes).logged(NAME);
            }
            DepthLimited::CutOff => {}
        }
    }

    SearchResult::failed(Failure::DepthLimit, total_nodes).logged(NAME)
}

fn depth_limited<P: SearchProblem>(
    problem: &P,
    depth_limit: usize,
    limits: &SearchLimits,
    nodes: &mut usize,
    step: &mut usize,
    observer: &mut dyn SearchObserver<P::State>,
) -> DepthLimited<NodeRef<P>> {
    let root: NodeRef<P> = Node::root(problem.initial_state(), 0);
    let mut shallowest = HashMap::from([(problem.key(&root.state), 0usize)]);
    let mut stack = vec![root];
    let mut cut_off = false;
    *nodes += 1;

    while let Some(node) = stack.pop() {
        observer.on_step(&StepContext::new(*step, &node.state, "expand"));
        *step += 1;

        if problem.is_goal(&node.state) {
            return DepthLimited::Found(node);
        }
        if node.depth >= depth_limit {
            cut_off = true;
            continue;
        }

        // Reversed so the stack pops successors in canonical order.
        for (action, next) in problem.successors(&node.state).into_iter().rev() {
            let depth = node.depth + 1;
            let key = problem.key(&next);
            if shallowest.get(&key).is_some_and(|&seen| seen <= depth) {
                continue;
            }
            shallowest.insert(key, depth);
            let cost = problem.step_cost(&node.state, action, &next);
            stack.push(Node::child(&node, action, next, cost, 0));
            *nodes += 1;
            if limits.nodes_exhausted(*nodes) {
                return DepthLimited::NodeLimit;
            }
        }
    }

    if cut_off {
        DepthLimited::CutOff
    } else {
        DepthLimited::Exhausted
    }
}

/// Uniform-cost search over accumulated path cost g.
///
/// Keeps the cheapest known cost per state and skips stale frontier entries.
/// A goal generated as a child is held as a candidate and returned once no
/// cheaper frontier entry remains, which keeps the result optimal for any
/// positive step costs.
pub fn uniform_cost_search<P: SearchProblem>(
    problem: &P,
    limits: &SearchLimits,
    observer: &mut dyn SearchObserver<P::State>,
) -> SearchResult<P::State> {
    const NAME: &str = "UCS";
    if !problem.is_solvable() {
        return SearchResult::unsolvable().logged(NAME);
    }

    let root: NodeRef<P> = Node::root(problem.initial_state(), 0);
    let mut best_cost = HashMap::from([(problem.key(&root.state), 0u32)]);
    let mut frontier = PriorityFrontier::new();
    frontier.push(0, root);
    let mut nodes = 1;
    let mut candidate: Option<NodeRef<P>> = None;
    let mut step = 0;

    while let Some(node) = frontier.pop() {
        if let Some(goal) = &candidate
            && node.path_cost >= goal.path_cost
        {
            break;
        }
        let key = problem.key(&node.state);
        if best_cost.get(&key).is_some_and(|&cost| node.path_cost > cost) {
            trace!("{NAME}: skipping stale entry at cost {}", node.path_cost);
            continue;
        }

        observer.on_step(
            &StepContext::new(step, &node.state, "expand").with_score(node.path_cost as f64),
        );
        step += 1;

        if problem.is_goal(&node.state) {
            return SearchResult::solved(node.path(), nodes).logged(NAME);
        }
        if !limits.depth_allows(node.depth + 1) {
            continue;
        }

        for (action, next) in problem.successors(&node.state) {
            let cost = node.path_cost + problem.step_cost(&node.state, action, &next);
            let next_key = problem.key(&next);
            if best_cost.get(&next_key).is_some_and(|&known| known <= cost) {
                continue;
            }
            best_cost.insert(next_key, cost);
            let child = Node::child(&node, action, next, cost - node.path_cost, 0);
            nodes += 1;
            if problem.is_goal(&child.state)
                && candidate
                    .as_ref()
                    .is_none_or(|goal| child.path_cost < goal.path_cost)
            {
                candidate = Some(Rc::clone(&child));
            }
            if limits.nodes_exhausted(nodes) {
                return SearchResult::failed(Failure::NodeLimit, nodes).logged(NAME);
            }
            frontier.push(child.path_cost, child);
        }
    }

    match candidate {
        Some(goal) => SearchResult::solved(goal.path(), nodes).logged(NAME),
        None => SearchResult::failed(Failure::Exhausted, nodes).logged(NAME),
    }
}
