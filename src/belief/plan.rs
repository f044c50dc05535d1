//! Conditional plans

use std::fmt;

use super::ActuationModel;
use crate::puzzle::{Move, PuzzleState};

/// A conditional plan produced by AND-OR search.
///
/// `Action` nodes say what to do; the `Contingency` that follows says how to
/// continue for each state the action may lead to. `Retry` marks an outcome
/// that leaves the state unchanged: the agent repeats the action it just
/// attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    Goal,
    Action { mv: Move, next: Box<Plan> },
    Contingency { subplans: Vec<(PuzzleState, Plan)> },
    Retry,
}

impl Plan {
    pub fn action(mv: Move, next: Plan) -> Self {
        Plan::Action {
            mv,
            next: Box::new(next),
        }
    }

    pub fn first_move(&self) -> Option<Move> {
        match self {
            Plan::Action { mv, .. } => Some(*mv),
            Plan::Contingency { subplans } => subplans.first().and_then(|(_, p)| p.first_move()),
            Plan::Goal | Plan::Retry => None,
        }
    }

    /// Number of actions on the longest branch.
    pub fn depth(&self) -> usize {
        match self {
            Plan::Goal | Plan::Retry => 0,
            Plan::Action { next, .. } => 1 + next.depth(),
            Plan::Contingency { subplans } => {
                subplans.iter().map(|(_, p)| p.depth()).max().unwrap_or(0)
            }
        }
    }

    /// The branch to follow once `state` has been observed.
    fn branch(&self, state: &PuzzleState) -> Option<&Plan> {
        match self {
            Plan::Contingency { subplans } => {
                subplans.iter().find(|(s, _)| s == state).map(|(_, p)| p)
            }
            other => Some(other),
        }
    }

    /// States visited when every action has its intended effect.
    pub fn nominal_path(&self, initial: &PuzzleState) -> Option<Vec<PuzzleState>> {
        let mut state = *initial;
        let mut path = vec![state];
        let mut plan = self;
        loop {
            match plan {
                Plan::Goal => return Some(path),
                Plan::Retry => return None,
                Plan::Action { mv, next } => {
                    state = state.apply(*mv).ok()?;
                    path.push(state);
                    plan = next.branch(&state)?;
                }
                Plan::Contingency { .. } => plan = plan.branch(&state)?,
            }
        }
    }

    /// Checks that following the plan from `initial` reaches `goal` under
    /// every outcome `model` allows, within `bound` actions per branch.
    ///
    /// A `Retry` branch is accepted only for outcomes that return to the
    /// state the action was attempted from; such a loop ends as soon as any
    /// other outcome occurs.
    pub fn verify(
        &self,
        initial: &PuzzleState,
        goal: &PuzzleState,
        model: &ActuationModel,
        bound: usize,
    ) -> bool {
        match self {
            Plan::Goal => initial == goal,
            Plan::Retry => false,
            Plan::Contingency { .. } => self
                .branch(initial)
                .is_some_and(|p| p.verify(initial, goal, model, bound)),
            Plan::Action { mv, next } => {
                if bound == 0 || !initial.can_move(*mv) {
                    return false;
                }
                model
                    .outcomes(initial, *mv)
                    .iter()
                    .all(|outcome| match next.branch(&outcome.state) {
                        Some(Plan::Retry) => outcome.state == *initial,
                        Some(branch) => branch.verify(&outcome.state, goal, model, bound - 1),
                        None => false,
                    })
            }
        }
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let pad = " ".repeat(indent);
        match self {
            Plan::Goal => writeln!(f, "{pad}goal reached"),
            Plan::Retry => writeln!(f, "{pad}retry"),
            Plan::Action { mv, next } => {
                writeln!(f, "{pad}{mv}")?;
                next.render(f, indent + 2)
            }
            Plan::Contingency { subplans } => {
                for (state, plan) in subplans {
                    writeln!(f, "{pad}if {}:", state.compact())?;
                    plan.render(f, indent + 2)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 0)
    }
}
