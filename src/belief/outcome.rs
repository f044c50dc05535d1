//! Non-deterministic actuation

use serde::{Deserialize, Serialize};

use crate::puzzle::{Move, PuzzleState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// The move has its intended effect
    Intended,
    /// Nothing happens
    Slip,
    /// The move is carried out twice
    Overshoot,
}

/// One possible result of attempting a move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    pub state: PuzzleState,
    pub probability: f64,
    pub kind: OutcomeKind,
}

/// Actuator that succeeds with `success_probability` and otherwise either
/// slips or overshoots with equal probability.
///
/// An illegal intended move leaves the state unchanged. When the second half
/// of an overshoot would be illegal, its probability goes to the slip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActuationModel {
    pub success_probability: f64,
}

impl Default for ActuationModel {
    fn default() -> Self {
        Self {
            success_probability: 0.9,
        }
    }
}

impl ActuationModel {
    pub fn new(success_probability: f64) -> Self {
        Self {
            success_probability: success_probability.clamp(0.0, 1.0),
        }
    }

    /// Possible outcomes of `mv` from `state`, intended first. Outcomes with
    /// zero probability are left out; probabilities sum to one.
    pub fn outcomes(&self, state: &PuzzleState, mv: Move) -> Vec<Outcome> {
        let failure = (1.0 - self.success_probability) / 2.0;
        let intended = state.apply_or_stay(mv);
        let mut slip = failure;
        let mut outcomes = vec![Outcome {
            state: intended,
            probability: self.success_probability,
            kind: OutcomeKind::Intended,
        }];

        let overshoot = state.apply(mv).and_then(|once| once.apply(mv));
        match overshoot {
            Ok(twice) => outcomes.push(Outcome {
                state: twice,
                probability: failure,
                kind: OutcomeKind::Overshoot,
            }),
            Err(_) => slip += failure,
        }
        outcomes.insert(
            1,
            Outcome {
                state: *state,
                probability: slip,
                kind: OutcomeKind::Slip,
            },
        );
        outcomes.retain(|o| o.probability > 0.0);
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> PuzzleState {
        text.parse().unwrap()
    }

    #[test]
    fn test_three_outcomes_when_overshoot_is_legal() {
        let model = ActuationModel::default();
        let outcomes = model.outcomes(&s("123456708"), Move::Up);
        let kinds: Vec<_> = outcomes.iter().map(|o| o.kind).collect();
        assert_eq!(kinds, vec![OutcomeKind::Intended, OutcomeKind::Slip, OutcomeKind::Overshoot]);
        assert_eq!(outcomes[0].state, s("123406758"));
        assert_eq!(outcomes[1].state, s("123456708"));
        assert_eq!(outcomes[2].state, s("103426758"));
        let total: f64 = outcomes.iter().map(|o| o.probability).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_illegal_overshoot_merges_into_slip() {
        let model = ActuationModel::default();
        let outcomes = model.outcomes(&s("123456708"), Move::Right);
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].state, s("123456780"));
        assert!((outcomes[0].probability - 0.9).abs() < 1e-9);
        assert_eq!(outcomes[1].kind, OutcomeKind::Slip);
        assert!((outcomes[1].probability - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_certain_success_is_deterministic() {
        let model = ActuationModel::new(1.0);
        let outcomes = model.outcomes(&s("123456708"), Move::Left);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].state, s("123456078"));
    }
}
