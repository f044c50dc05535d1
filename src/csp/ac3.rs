//! Arc consistency (AC-3) for the all-different constraint

use std::collections::VecDeque;

use log::{debug, trace};

use super::{CspStats, Domains};
use crate::types::Position;

fn cells() -> impl Iterator<Item = Position> {
    (0..9).map(Position::from_index_unchecked)
}

/// Removes from `xi` every value with no different value left in `xj`.
/// Under all-different that only happens when `xj` is a singleton.
fn revise(domains: &mut Domains, xi: Position, xj: Position, stats: &mut CspStats) -> bool {
    let support = domains.get(xj).clone();
    let before = domains.len(xi);
    domains
        .get_mut(xi)
        .retain(|&x| support.iter().any(|&y| y != x));
    let removed = before - domains.len(xi);
    if removed > 0 {
        trace!("AC-3: removed {removed} value(s) from {xi} against {xj}");
    }
    stats.domain_updates += removed;
    removed > 0
}

/// Makes every arc `(xi, xj)` consistent, shrinking `domains` in place.
///
/// Returns `false` as soon as a domain becomes empty; the domains are then
/// left in their partially revised state.
pub fn ac3(domains: &mut Domains, stats: &mut CspStats) -> bool {
    let mut queue: VecDeque<(Position, Position)> = cells()
        .flat_map(|xi| cells().filter(move |&xj| xj != xi).map(move |xj| (xi, xj)))
        .collect();
    let initial_arcs = queue.len();
    let mut processed = 0;

    while let Some((xi, xj)) = queue.pop_front() {
        processed += 1;
        if revise(domains, xi, xj, stats) {
            if domains.len(xi) == 0 {
                debug!("AC-3: domain of {xi} wiped out after {processed} arcs");
                return false;
            }
            queue.extend(cells().filter(|&xk| xk != xi && xk != xj).map(|xk| (xk, xi)));
        }
    }
    debug!(
        "AC-3: consistent after {processed} arcs ({initial_arcs} initial), {} values removed",
        stats.domain_updates
    );
    true
}
