//! Random puzzle instances

use rand::{Rng, seq::IndexedRandom, seq::SliceRandom};

use super::{Move, PuzzleState};

impl PuzzleState {
    /// Uniformly shuffled state that can reach `goal`.
    pub fn random_solvable<R: Rng + ?Sized>(goal: &PuzzleState, rng: &mut R) -> PuzzleState {
        let mut cells = *goal.cells();
        cells.shuffle(rng);
        let state = PuzzleState::new(cells).unwrap_or(*goal);
        if state.is_solvable(goal) {
            return state;
        }
        // Swapping two tiles flips inversion parity.
        let blank = state.blank_index();
        let mut tiles = (0..9).filter(|&i| i != blank);
        match (tiles.next(), tiles.next()) {
            (Some(a), Some(b)) => state.with_swapped(a, b),
            _ => state,
        }
    }

    /// Random walk of `steps` legal moves starting from `self`.
    ///
    /// Returns the visited states including the starting one, so the result
    /// always holds `steps + 1` states.
    pub fn scramble<R: Rng + ?Sized>(&self, steps: usize, rng: &mut R) -> Vec<PuzzleState> {
        let mut walk = Vec::with_capacity(steps + 1);
        let mut current = *self;
        walk.push(current);
        for _ in 0..steps {
            let moves: Vec<Move> = current.legal_moves().collect();
            let Some(&mv) = moves.choose(rng) else { break };
            current = current.apply_or_stay(mv);
            walk.push(current);
        }
        walk
    }
}
