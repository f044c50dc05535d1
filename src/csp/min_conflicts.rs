//! Min-conflicts local search

use log::{error, info, trace};
use rand::{Rng, seq::{IndexedRandom, SliceRandom}};

use super::{Assignment, CspResult, CspStats};
use crate::{
    Error, Result,
    config::MinConflictsConfig,
    ports::{SearchObserver, StepContext},
    search::Failure,
    types::Position,
};

/// Surplus copies of repeated digits plus digits missing altogether.
/// Unassigned cells count as missing digits.
pub fn conflict_count(assignment: &Assignment) -> usize {
    let mut counts = [0usize; 9];
    for &value in assignment.values().iter().flatten() {
        if let Some(count) = counts.get_mut(value as usize) {
            *count += 1;
        }
    }
    counts.iter().map(|&c| if c == 0 { 1 } else { c - 1 }).sum()
}

fn conflicting_cells(assignment: &Assignment) -> Vec<Position> {
    let values = assignment.values();
    (0..9)
        .filter(|&i| values[i].is_some_and(|v| (0..9).any(|j| j != i && values[j] == Some(v))))
        .map(Position::from_index_unchecked)
        .collect()
}

/// A complete assignment with three digits used twice and three others
/// once, so the search always starts from six conflicts.
fn conflicted_start<R: Rng + ?Sized>(rng: &mut R) -> Assignment {
    let mut digits: Vec<u8> = (0..9).collect();
    digits.shuffle(rng);
    let mut values: Vec<u8> = digits[..3].iter().flat_map(|&d| [d, d]).collect();
    values.extend_from_slice(&digits[3..6]);
    values.shuffle(rng);
    let mut start = [0u8; 9];
    start.copy_from_slice(&values);
    Assignment::from_values(start)
}

/// Min-conflicts: repeatedly pick a random conflicting cell and give it the
/// digit (other than its current one) that leaves the fewest conflicts,
/// breaking ties at random.
///
/// # Errors
///
/// Returns [`Error::InvariantViolation`] if the assignment has no
/// conflicting cell yet is not a solution, which a complete assignment
/// under all-different cannot be.
pub fn min_conflicts<R: Rng + ?Sized>(
    config: &MinConflictsConfig,
    rng: &mut R,
    observer: &mut dyn SearchObserver<Assignment>,
) -> Result<CspResult> {
    const NAME: &str = "Min-conflicts";
    let mut current = conflicted_start(rng);
    let mut stats = CspStats::default();

    for _ in 0..config.max_iterations {
        stats.states_explored += 1;
        if current.is_solution() {
            info!("{NAME}: solved after {} iterations", stats.states_explored);
            return Ok(CspResult {
                assignment: Some(current),
                stats,
                failure: None,
            });
        }

        let conflicting = conflicting_cells(&current);
        let Some(&var) = conflicting.choose(rng) else {
            let message = format!("no conflicting cell in the unsolved assignment\n{current}");
            error!("{NAME}: {message}");
            return Err(Error::InvariantViolation { message });
        };

        let old = current.get(var);
        let mut best = usize::MAX;
        let mut best_values = Vec::new();
        for value in (0..9).filter(|&v| Some(v) != old) {
            current.assign(var, value);
            let conflicts = conflict_count(&current);
            if conflicts < best {
                best = conflicts;
                best_values.clear();
            }
            if conflicts == best {
                best_values.push(value);
            }
        }
        let value = best_values.choose(rng).copied().or(old).unwrap_or(0);
        current.assign(var, value);
        trace!("{NAME}: {var} {old:?} -> {value}, {best} conflicts");
        observer.on_step(
            &StepContext::new(stats.states_explored, &current, "reassign")
                .with_score(best as f64),
        );
    }

    if current.is_solution() {
        info!("{NAME}: solved on the last iteration");
        return Ok(CspResult {
            assignment: Some(current),
            stats,
            failure: None,
        });
    }
    info!("{NAME}: no solution within {} iterations", config.max_iterations);
    Ok(CspResult {
        assignment: None,
        stats,
        failure: Some(Failure::IterationLimit),
    })
}
