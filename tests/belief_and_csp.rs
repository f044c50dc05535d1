//! Plan verification for the belief-space strategies and bijection checks
//! for the CSP solvers

use std::collections::HashSet;

use eight_puzzle::{
    Position, PuzzleState,
    belief::{
        ActuationModel, BeliefProblem, Observation, and_or_search, partial_observation_search,
        sensorless_search,
    },
    config::{AndOrConfig, BeliefConfig, MinConflictsConfig},
    csp::{Assignment, Domains, backtracking_search, backtracking_with_ac3, min_conflicts},
    ports::NoopObserver,
    search::PuzzleProblem,
};
use rand::{SeedableRng, rngs::StdRng};

mod common;

use common::{fixtures_up_to, replay};

fn assert_bijection(assignment: &Assignment) {
    assert!(assignment.is_complete());
    let values: HashSet<u8> = assignment.values().iter().flatten().copied().collect();
    assert_eq!(values, (0..9).collect::<HashSet<u8>>());
    assert!(assignment.to_state().is_some());
}

#[test]
fn test_and_or_plans_hold_under_every_outcome() {
    let config = AndOrConfig::default();
    let model = ActuationModel::new(config.success_probability);
    for (initial, depth) in fixtures_up_to(4) {
        let p = PuzzleProblem::new(initial, PuzzleState::GOAL);
        let result = and_or_search(&p, &config, &mut NoopObserver);
        if depth <= 2 {
            assert!(result.is_success(), "no plan for {}", initial.compact());
        }
        if let Some(plan) = &result.plan {
            assert!(plan.verify(p.initial(), p.goal(), &model, config.max_depth));
            let nominal = plan.nominal_path(p.initial()).expect("nominal branch");
            assert_eq!(nominal.last(), Some(p.goal()));
        }
    }
}

#[test]
fn test_and_or_with_reliable_actuator_is_a_linear_plan() {
    let config = AndOrConfig::default().with_success_probability(1.0);
    let model = ActuationModel::new(1.0);
    let p = PuzzleProblem::new("123405786".parse().unwrap(), PuzzleState::GOAL);
    let plan = and_or_search(&p, &config, &mut NoopObserver)
        .plan
        .expect("plan");
    assert!(plan.verify(p.initial(), p.goal(), &model, config.max_depth));
    assert_eq!(plan.nominal_path(p.initial()).map(|path| path.len()), Some(3));
}

#[test]
fn test_sensorless_plan_solves_every_initial_state() {
    let problem = BeliefProblem::sensorless();
    let result = sensorless_search(&problem, &BeliefConfig::default(), &mut NoopObserver);
    let plan = result.plan.expect("sensorless plan");
    for start in problem.initial() {
        let end = plan.iter().fold(*start, |state, &mv| state.apply_or_stay(mv));
        assert!(problem.goals().contains(&end), "{} ends at {}", start.compact(), end.compact());
    }
}

#[test]
fn test_partial_observation_plans_reach_goal_beliefs() {
    let observations = [(0, 0, 1), (1, 1, 5), (2, 2, 0), (0, 1, 2)];
    for (row, col, value) in observations {
        let observation = Observation::new(Position::new(row, col).unwrap(), value).unwrap();
        let problem = BeliefProblem::partial(observation);
        for goal in problem.goals() {
            assert_eq!(goal.get(observation.position), observation.value);
        }

        let result =
            partial_observation_search(&problem, &BeliefConfig::default(), &mut NoopObserver);
        let Some(plan) = result.plan else {
            assert!(result.failure.is_some());
            continue;
        };
        // States blocked by a move drop out of the belief; the rest must
        // all end on a goal.
        let survivors: Vec<PuzzleState> = problem
            .initial()
            .iter()
            .filter_map(|&start| replay(start, &plan))
            .collect();
        assert!(!survivors.is_empty());
        for end in survivors {
            assert!(problem.goals().contains(&end), "observation {observation}");
        }
    }
}

#[test]
fn test_default_observation_has_a_plan() {
    let problem = BeliefProblem::partial(Observation::default());
    let result = partial_observation_search(&problem, &BeliefConfig::default(), &mut NoopObserver);
    assert!(result.plan.is_some_and(|plan| !plan.is_empty()));
}

#[test]
fn test_backtracking_assignments_are_bijections() {
    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        let result = backtracking_search(&mut rng, &mut NoopObserver);
        assert_bijection(result.assignment.as_ref().expect("assignment"));
    }
}

#[test]
fn test_ac3_assignments_respect_initial_domains() {
    let domains = Domains::initial();
    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        let result = backtracking_with_ac3(&domains, &mut rng, &mut NoopObserver);
        let assignment = result.assignment.expect("assignment");
        assert_bijection(&assignment);
        for index in 0..9 {
            let pos = Position::from_index(index).unwrap();
            let value = assignment.get(pos).unwrap();
            assert!(domains.get(pos).contains(&value), "{value} outside domain of {pos}");
        }
    }
}

#[test]
fn test_min_conflicts_assignments_are_bijections() {
    let mut solved = 0;
    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        let result = min_conflicts(&MinConflictsConfig::default(), &mut rng, &mut NoopObserver)
            .expect("no invariant violation");
        if let Some(assignment) = &result.assignment {
            assert_bijection(assignment);
            solved += 1;
        } else {
            assert!(result.failure.is_some());
        }
    }
    assert!(solved > 0);
}
