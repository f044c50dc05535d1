//! Q-table implementation for tabular Q-learning

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{puzzle::Move, types::StateKey};

/// Q-table mapping (state, move) pairs to Q-values
///
/// Rows are created lazily, one per state, holding a value for each of the
/// four moves in [`Move::ALL`] order. Moves that are illegal from a state keep
/// their initial value forever.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    /// Q-values: canonical state -> value per move index
    q_values: HashMap<StateKey, [f64; 4]>,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
    /// Initial Q-value for unseen state-action pairs
    q_init: f64,
}

impl QTable {
    /// Create a new Q-table
    pub fn new(learning_rate: f64, discount_factor: f64, q_init: f64) -> Self {
        Self {
            q_values: HashMap::new(),
            learning_rate,
            discount_factor,
            q_init,
        }
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: &StateKey, action: Move) -> f64 {
        self.q_values
            .get(state)
            .map_or(self.q_init, |row| row[action.index()])
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: StateKey, action: Move, value: f64) {
        self.ensure(state)[action.index()] = value;
    }

    /// Whether the state already has a row.
    pub fn contains(&self, state: &StateKey) -> bool {
        self.q_values.contains_key(state)
    }

    /// Row for `state`, created with the initial value if missing.
    pub fn ensure(&mut self, state: StateKey) -> &mut [f64; 4] {
        let q_init = self.q_init;
        self.q_values.entry(state).or_insert([q_init; 4])
    }

    /// Maximum Q-value over all four moves of a state
    pub fn max_q(&self, state: &StateKey) -> f64 {
        self.q_values.get(state).map_or(self.q_init, |row| {
            row.iter().copied().fold(f64::NEG_INFINITY, f64::max)
        })
    }

    /// Select greedy action (highest Q-value) from legal actions
    ///
    /// Ties go to the move listed first.
    pub fn greedy_action(&self, state: &StateKey, legal_actions: &[Move]) -> Option<Move> {
        let mut best: Option<(Move, f64)> = None;
        for &action in legal_actions {
            let q = self.get(state, action);
            if best.is_none_or(|(_, best_q)| q > best_q) {
                best = Some((action, q));
            }
        }
        best.map(|(action, _)| action)
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// Both rows are created if missing.
    pub fn q_learning_update(
        &mut self,
        state: StateKey,
        action: Move,
        reward: f64,
        next_state: StateKey,
    ) {
        self.ensure(next_state);
        let max_next_q = self.max_q(&next_state);
        let current_q = self.get(&state, action);
        let td_target = reward + self.discount_factor * max_next_q;
        let td_error = td_target - current_q;
        let new_q = current_q + self.learning_rate * td_error;
        self.set(state, action, new_q);
    }

    /// Drop every learned value
    pub fn reset(&mut self) {
        self.q_values.clear();
    }

    /// Number of states with a row
    pub fn size(&self) -> usize {
        self.q_values.len()
    }
}
