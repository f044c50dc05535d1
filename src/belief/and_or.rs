//! AND-OR graph search

use log::{debug, info, trace};

use super::{ActuationModel, Plan};
use crate::{
    config::AndOrConfig,
    ports::{SearchObserver, StepContext},
    puzzle::PuzzleState,
    search::{Failure, PuzzleProblem},
};

#[derive(Debug, Clone, PartialEq)]
pub struct AndOrResult {
    pub plan: Option<Plan>,
    /// OR nodes visited
    pub nodes_explored: usize,
    pub failure: Option<Failure>,
}

impl AndOrResult {
    pub fn is_success(&self) -> bool {
        self.plan.is_some()
    }
}

struct AndOr<'a> {
    problem: &'a PuzzleProblem,
    model: ActuationModel,
    max_nodes: usize,
    nodes: usize,
    node_limit_hit: bool,
    depth_limit_hit: bool,
    observer: &'a mut dyn SearchObserver<PuzzleState>,
}

impl AndOr<'_> {
    fn or_search(
        &mut self,
        state: PuzzleState,
        path: &mut Vec<PuzzleState>,
        depth: usize,
    ) -> Option<Plan> {
        self.nodes += 1;
        if self.nodes >= self.max_nodes {
            self.node_limit_hit = true;
            return None;
        }
        self.observer.on_step(
            &StepContext::new(self.nodes, &state, "or").with_score(self.problem.h(&state) as f64),
        );
        if state.is_goal(self.problem.goal()) {
            return Some(Plan::Goal);
        }
        if depth == 0 {
            self.depth_limit_hit = true;
            return None;
        }
        if path.contains(&state) {
            trace!("AND-OR: cycle at {}", state.compact());
            return None;
        }

        // Most promising intended outcome first
        let mut moves: Vec<_> = state
            .successors()
            .into_iter()
            .map(|(mv, next)| (self.problem.h(&next), mv))
            .collect();
        moves.sort_by_key(|&(h, _)| h);

        path.push(state);
        let mut found = None;
        for (_, mv) in moves {
            let outcomes = self.model.outcomes(&state, mv);
            let targets: Vec<PuzzleState> = outcomes.iter().map(|o| o.state).collect();
            if let Some(contingency) = self.and_search(state, &targets, path, depth - 1) {
                found = Some(Plan::action(mv, contingency));
                break;
            }
            if self.node_limit_hit {
                break;
            }
        }
        path.pop();
        found
    }

    fn and_search(
        &mut self,
        origin: PuzzleState,
        outcomes: &[PuzzleState],
        path: &mut Vec<PuzzleState>,
        depth: usize,
    ) -> Option<Plan> {
        let mut subplans: Vec<(PuzzleState, Plan)> = Vec::with_capacity(outcomes.len());
        for &outcome in outcomes {
            if subplans.iter().any(|(s, _)| *s == outcome) {
                continue;
            }
            let plan = if outcome == origin {
                Plan::Retry
            } else {
                self.or_search(outcome, path, depth)?
            };
            subplans.push((outcome, plan));
        }
        Some(Plan::Contingency { subplans })
    }
}

/// AND-OR search for a conditional plan under non-deterministic moves.
///
/// OR nodes try moves in order of the heuristic value of their intended
/// outcome; AND nodes need a sub-plan for every outcome. An outcome equal to
/// a state already on the current OR path fails that branch, except for a
/// slip back to the state the move was attempted from, which becomes
/// [`Plan::Retry`]. The search gives up when `max_nodes` OR nodes have been
/// visited.
pub fn and_or_search(
    problem: &PuzzleProblem,
    config: &AndOrConfig,
    observer: &mut dyn SearchObserver<PuzzleState>,
) -> AndOrResult {
    const NAME: &str = "AND-OR search";
    if !problem.initial().is_solvable(problem.goal()) {
        info!("{NAME}: unsolvable instance");
        return AndOrResult {
            plan: None,
            nodes_explored: 0,
            failure: Some(Failure::Unsolvable),
        };
    }

    let mut search = AndOr {
        problem,
        model: ActuationModel::new(config.success_probability),
        max_nodes: config.max_nodes,
        nodes: 0,
        node_limit_hit: false,
        depth_limit_hit: false,
        observer,
    };
    let plan = search.or_search(*problem.initial(), &mut Vec::new(), config.max_depth);
    let failure = match &plan {
        Some(_) => None,
        None if search.node_limit_hit => Some(Failure::NodeLimit),
        None if search.depth_limit_hit => Some(Failure::DepthLimit),
        None => Some(Failure::Exhausted),
    };
    if let Some(plan) = &plan {
        debug!("{NAME}: plan of depth {}", plan.depth());
    }
    info!(
        "{NAME}: {} after {} nodes",
        failure.map_or_else(|| "plan found".to_string(), |f| f.to_string()),
        search.nodes
    );
    AndOrResult {
        plan,
        nodes_explored: search.nodes,
        failure,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ports::NoopObserver, puzzle::Move};

    fn problem(initial: &str) -> PuzzleProblem {
        PuzzleProblem::parse(Some(initial), None).unwrap()
    }

    #[test]
    fn test_one_move_plan_with_retry() {
        let p = problem("123456708");
        let result = and_or_search(&p, &AndOrConfig::default(), &mut NoopObserver);
        let plan = result.plan.expect("plan");
        assert_eq!(plan.first_move(), Some(Move::Right));
        assert!(plan.verify(p.initial(), p.goal(), &ActuationModel::default(), 30));
        assert!(result.nodes_explored <= 3);
    }

    #[test]
    fn test_two_move_plan_covers_all_outcomes() {
        let p = problem("123405786");
        let config = AndOrConfig::default();
        let result = and_or_search(&p, &config, &mut NoopObserver);
        let plan = result.plan.expect("plan");
        let model = ActuationModel::new(config.success_probability);
        assert!(plan.verify(p.initial(), p.goal(), &model, config.max_depth));
        let nominal = plan.nominal_path(p.initial()).unwrap();
        assert_eq!(nominal.first(), Some(p.initial()));
        assert_eq!(nominal.last(), Some(p.goal()));
    }

    #[test]
    fn test_goal_initial_state() {
        let p = problem("123456780");
        let result = and_or_search(&p, &AndOrConfig::default(), &mut NoopObserver);
        assert_eq!(result.plan, Some(Plan::Goal));
    }

    #[test]
    fn test_node_budget_is_reported() {
        let p = problem("867254301");
        let config = AndOrConfig::default().with_max_nodes(50);
        let result = and_or_search(&p, &config, &mut NoopObserver);
        assert_eq!(result.failure, Some(Failure::NodeLimit));
        assert_eq!(result.nodes_explored, 50);
    }

    #[test]
    fn test_depth_budget_is_reported() {
        let p = problem("123405786");
        let config = AndOrConfig::default().with_max_depth(1);
        let result = and_or_search(&p, &config, &mut NoopObserver);
        assert_eq!(result.failure, Some(Failure::DepthLimit));
    }

    #[test]
    fn test_unsolvable_short_circuits() {
        let p = problem("213456780");
        let result = and_or_search(&p, &AndOrConfig::default(), &mut NoopObserver);
        assert_eq!(result.failure, Some(Failure::Unsolvable));
        assert_eq!(result.nodes_explored, 0);
    }
}
