//! Belief states: sets of states the agent cannot tell apart

use std::fmt;

use crate::puzzle::{Move, PuzzleState};

/// A set of possible puzzle states.
///
/// States are kept sorted and deduplicated, so two beliefs holding the same
/// states compare and hash equal whatever order they were built in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct BeliefState(Vec<PuzzleState>);

impl BeliefState {
    pub fn new(states: impl IntoIterator<Item = PuzzleState>) -> Self {
        let mut states: Vec<_> = states.into_iter().collect();
        states.sort_unstable();
        states.dedup();
        Self(states)
    }

    pub fn states(&self) -> &[PuzzleState] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &PuzzleState> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, state: &PuzzleState) -> bool {
        self.0.binary_search(state).is_ok()
    }

    /// Whether any state in the belief allows `mv`.
    pub fn allows(&self, mv: Move) -> bool {
        self.0.iter().any(|s| s.can_move(mv))
    }

    /// Applies `mv` to every state; states where it is illegal stay put.
    pub fn apply_uniform(&self, mv: Move) -> Self {
        Self::new(self.0.iter().map(|s| s.apply_or_stay(mv)))
    }

    /// Applies `mv` to every state; states where it is illegal are dropped.
    pub fn apply_filtered(&self, mv: Move) -> Self {
        Self::new(self.0.iter().filter_map(|s| s.apply(mv).ok()))
    }

    /// True when the belief is non-empty and every state is one of `goals`.
    pub fn is_within(&self, goals: &BeliefState) -> bool {
        !self.is_empty() && self.0.iter().all(|s| goals.contains(s))
    }
}

impl FromIterator<PuzzleState> for BeliefState {
    fn from_iter<I: IntoIterator<Item = PuzzleState>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<'a> IntoIterator for &'a BeliefState {
    type Item = &'a PuzzleState;
    type IntoIter = std::slice::Iter<'a, PuzzleState>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for BeliefState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, state) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", state.compact())?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn s(text: &str) -> PuzzleState {
        text.parse().unwrap()
    }

    #[test]
    fn test_equality_ignores_order_and_duplicates() {
        let a = BeliefState::new([s("123456708"), s("123450786")]);
        let b = BeliefState::new([s("123450786"), s("123456708"), s("123450786")]);
        assert_eq!(a, b);
        assert_eq!(b.len(), 2);
        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_uniform_application_keeps_blocked_states() {
        let belief = BeliefState::new([s("123456708"), s("123450786")]);
        let next = belief.apply_uniform(Move::Right);
        assert_eq!(next, BeliefState::new([s("123456780"), s("123450786")]));
    }

    #[test]
    fn test_filtered_application_drops_blocked_states() {
        let belief = BeliefState::new([s("123456708"), s("123450786")]);
        let next = belief.apply_filtered(Move::Right);
        assert_eq!(next, BeliefState::new([s("123456780")]));
        assert!(belief.apply_filtered(Move::Down).len() == 1);
    }

    #[test]
    fn test_merging_collapses_duplicates() {
        // RIGHT is blocked for the goal and completes the other state
        let belief = BeliefState::new([s("123456780"), s("123456708")]);
        let next = belief.apply_uniform(Move::Right);
        assert_eq!(next.len(), 1);
        assert!(next.contains(&s("123456780")));
    }

    #[test]
    fn test_is_within() {
        let goals = BeliefState::new([s("123456780"), s("123456870")]);
        assert!(BeliefState::new([s("123456780")]).is_within(&goals));
        assert!(!BeliefState::new([s("123456780"), s("123456708")]).is_within(&goals));
        assert!(!BeliefState::default().is_within(&goals));
    }

    #[test]
    fn test_display_lists_compact_states() {
        let belief = BeliefState::new([s("123456780")]);
        assert_eq!(belief.to_string(), "{123456780}");
    }
}
