//! Backtracking search for a complete assignment

use log::{debug, info};
use rand::{Rng, seq::{IndexedRandom, SliceRandom}};

use super::{Assignment, CspResult, CspStats, Domains, ac3};
use crate::{
    ports::{SearchObserver, StepContext},
    search::Failure,
    types::Position,
};

/// How the next cell and its candidate values are chosen.
enum VariableOrder<'a> {
    /// Smallest domain first (ties by board order), values from the domain
    MinimumRemaining(&'a Domains),
    /// Random cell, all nine digits
    Random,
}

struct Backtracker<'a, R: Rng + ?Sized> {
    order: VariableOrder<'a>,
    rng: &'a mut R,
    stats: CspStats,
    observer: &'a mut dyn SearchObserver<Assignment>,
}

impl<R: Rng + ?Sized> Backtracker<'_, R> {
    fn select(&mut self, assignment: &Assignment) -> Option<Position> {
        match self.order {
            VariableOrder::MinimumRemaining(domains) => {
                assignment.unassigned().min_by_key(|&p| domains.len(p))
            }
            VariableOrder::Random => {
                let open: Vec<Position> = assignment.unassigned().collect();
                open.choose(&mut *self.rng).copied()
            }
        }
    }

    fn candidates(&mut self, var: Position) -> Vec<u8> {
        let mut values: Vec<u8> = match self.order {
            VariableOrder::MinimumRemaining(domains) => domains.get(var).iter().copied().collect(),
            VariableOrder::Random => (0..9).collect(),
        };
        values.shuffle(&mut *self.rng);
        values
    }

    fn backtrack(&mut self, assignment: &mut Assignment) -> bool {
        self.stats.states_explored += 1;
        self.observer
            .on_step(&StepContext::new(self.stats.states_explored, &*assignment, "assign"));
        let Some(var) = self.select(assignment) else {
            return assignment.is_solution();
        };
        for value in self.candidates(var) {
            assignment.assign(var, value);
            if assignment.is_consistent() && self.backtrack(assignment) {
                return true;
            }
            assignment.unassign(var);
            self.stats.backtracks += 1;
        }
        false
    }
}

fn run<R: Rng + ?Sized>(
    name: &str,
    order: VariableOrder<'_>,
    stats: CspStats,
    rng: &mut R,
    observer: &mut dyn SearchObserver<Assignment>,
) -> CspResult {
    let mut assignment = Assignment::new();
    let mut search = Backtracker {
        order,
        rng,
        stats,
        observer,
    };
    let solved = search.backtrack(&mut assignment);
    let stats = search.stats;
    info!(
        "{name}: {} after {} states, {} backtracks",
        if solved { "solved" } else { "failed" },
        stats.states_explored,
        stats.backtracks
    );
    CspResult {
        assignment: solved.then_some(assignment),
        stats,
        failure: (!solved).then_some(Failure::Exhausted),
    }
}

/// Plain backtracking: random unassigned cell, digits in random order,
/// consistency checked after every tentative assignment.
pub fn backtracking_search<R: Rng + ?Sized>(
    rng: &mut R,
    observer: &mut dyn SearchObserver<Assignment>,
) -> CspResult {
    run("Backtracking", VariableOrder::Random, CspStats::default(), rng, observer)
}

/// AC-3 over `domains`, then backtracking with the minimum-remaining-values
/// heuristic on the reduced domains. Values of a cell are tried in random
/// order.
pub fn backtracking_with_ac3<R: Rng + ?Sized>(
    domains: &Domains,
    rng: &mut R,
    observer: &mut dyn SearchObserver<Assignment>,
) -> CspResult {
    const NAME: &str = "AC-3 search";
    let mut stats = CspStats::default();
    let mut reduced = domains.clone();
    if !ac3(&mut reduced, &mut stats) {
        info!("{NAME}: a domain was wiped out, no assignment exists");
        return CspResult {
            assignment: None,
            stats,
            failure: Some(Failure::Exhausted),
        };
    }
    debug!("{NAME}: {} candidate values after AC-3", reduced.total());
    run(NAME, VariableOrder::MinimumRemaining(&reduced), stats, rng, observer)
}
