//! Property tests for the path-returning strategies

use eight_puzzle::{
    Move, PuzzleState,
    config::{
        AnnealingConfig, BeamConfig, GeneticConfig, QLearningConfig, SearchLimits,
        StochasticConfig,
    },
    ports::NoopObserver,
    puzzle::{manhattan_distance, moves_of_path},
    q_learning::QLearningAgent,
    search::{
        Failure, PuzzleProblem, astar, beam_search, breadth_first_search, depth_first_search,
        genetic_algorithm, greedy_best_first, ida_star, iterative_deepening_search,
        simple_hill_climbing, simulated_annealing, steepest_ascent_hill_climbing,
        stochastic_hill_climbing, uniform_cost_search,
    },
};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

mod common;

use common::{
    UNSOLVABLE, assert_legal_path, assert_legal_result, fixtures_up_to, problem, reachable_from,
    state,
};

fn steps(path: &Option<Vec<PuzzleState>>) -> Option<usize> {
    path.as_ref().map(|p| p.len() - 1)
}

#[test]
fn test_one_move_scenario() {
    let p = problem("123456708");
    let unbounded = SearchLimits::unbounded();
    let results = [
        breadth_first_search(&p, &unbounded, &mut NoopObserver),
        uniform_cost_search(&p, &unbounded, &mut NoopObserver),
        astar(&p, &unbounded, &mut NoopObserver),
    ];
    for result in results {
        let path = result.path.expect("one-move instance is solvable");
        assert_eq!(moves_of_path(&path), Some(vec![Move::Right]));
        assert!(result.nodes_explored <= 5);
    }
}

#[test]
fn test_exhaustive_searches_agree_on_optimal_length() {
    let unbounded = SearchLimits::unbounded();
    for (initial, depth) in fixtures_up_to(14) {
        let p = PuzzleProblem::new(initial, PuzzleState::GOAL);
        let bfs = breadth_first_search(&p, &unbounded, &mut NoopObserver);
        let ucs = uniform_cost_search(&p, &unbounded, &mut NoopObserver);
        assert_eq!(steps(&bfs.path), Some(depth), "BFS on {}", initial.compact());
        assert_eq!(steps(&ucs.path), Some(depth), "UCS on {}", initial.compact());
        assert_legal_path(&p, bfs.path.as_deref().unwrap_or_default());
    }
}

#[test]
fn test_admissible_searches_are_optimal() {
    let unbounded = SearchLimits::unbounded();
    for (initial, depth) in fixtures_up_to(20) {
        let p = PuzzleProblem::new(initial, PuzzleState::GOAL);
        let a = astar(&p, &unbounded, &mut NoopObserver);
        let ida = ida_star(&p, &unbounded, &mut NoopObserver);
        assert_eq!(steps(&a.path), Some(depth), "A* on {}", initial.compact());
        assert_eq!(steps(&ida.path), Some(depth), "IDA* on {}", initial.compact());
        assert_legal_result(&p, &a);
        assert_legal_result(&p, &ida);
    }
}

#[test]
fn test_astar_solves_hardest_fixture() {
    let p = problem("867254301");
    let result = astar(&p, &SearchLimits::unbounded(), &mut NoopObserver);
    assert_eq!(result.steps(), Some(31));
    assert_legal_result(&p, &result);
}

#[test]
fn test_iterative_deepening_is_optimal_for_shallow_instances() {
    let limits = SearchLimits::unbounded().with_max_depth(50);
    for (initial, depth) in fixtures_up_to(8) {
        let p = PuzzleProblem::new(initial, PuzzleState::GOAL);
        let result = iterative_deepening_search(&p, &limits, &mut NoopObserver);
        assert_eq!(steps(&result.path), Some(depth));
        assert_legal_result(&p, &result);
    }
}

#[test]
fn test_every_path_strategy_returns_legal_paths() {
    let mut rng = StdRng::seed_from_u64(11);
    let dfs_limits = SearchLimits::unbounded().with_max_depth(200);
    for (initial, _) in fixtures_up_to(8) {
        let p = PuzzleProblem::new(initial, PuzzleState::GOAL);
        let results = [
            depth_first_search(&p, &dfs_limits, &mut NoopObserver),
            greedy_best_first(&p, &SearchLimits::unbounded(), &mut NoopObserver),
            simple_hill_climbing(&p, &mut NoopObserver),
            steepest_ascent_hill_climbing(&p, &mut NoopObserver),
            beam_search(&p, &BeamConfig::default(), &mut NoopObserver),
            simulated_annealing(&p, &AnnealingConfig::default(), &mut rng, &mut NoopObserver),
            stochastic_hill_climbing(
                &p,
                &StochasticConfig::default(),
                &mut rng,
                &mut NoopObserver,
            ),
            genetic_algorithm(&p, &GeneticConfig::default(), &mut rng, &mut NoopObserver),
        ];
        for result in &results {
            assert_legal_result(&p, result);
        }
    }
}

#[test]
fn test_greedy_always_succeeds_on_solvable_instances() {
    for (initial, _) in fixtures_up_to(14) {
        let p = PuzzleProblem::new(initial, PuzzleState::GOAL);
        let result = greedy_best_first(&p, &SearchLimits::unbounded(), &mut NoopObserver);
        assert!(result.is_success(), "greedy on {}", initial.compact());
        assert_legal_result(&p, &result);
    }
}

#[test]
fn test_q_learning_paths_are_legal() {
    let config = QLearningConfig::default()
        .with_episodes(300)
        .with_shuffle_steps(4);
    let mut agent = QLearningAgent::new(config).with_seed(5);
    agent.train(config.episodes, &mut NoopObserver);
    for (initial, _) in fixtures_up_to(4) {
        let p = PuzzleProblem::new(initial, PuzzleState::GOAL);
        let result = agent.solve(&initial, &mut NoopObserver);
        assert_legal_result(&p, &result);
    }
}

#[test]
fn test_unsolvable_instance_short_circuits() {
    let p = problem(UNSOLVABLE);
    let unbounded = SearchLimits::unbounded();
    for result in [
        breadth_first_search(&p, &unbounded, &mut NoopObserver),
        uniform_cost_search(&p, &unbounded, &mut NoopObserver),
        astar(&p, &unbounded, &mut NoopObserver),
        ida_star(&p, &unbounded, &mut NoopObserver),
    ] {
        assert_eq!(result.failure, Some(Failure::Unsolvable));
        assert_eq!(result.nodes_explored, 0);
    }
}

#[test]
fn test_solvability_matches_reachability() {
    let component = reachable_from(PuzzleState::GOAL);
    assert_eq!(component.len(), 181_440);

    let mut rng = StdRng::seed_from_u64(2024);
    let mut cells = *PuzzleState::GOAL.cells();
    for _ in 0..300 {
        cells.shuffle(&mut rng);
        let candidate = PuzzleState::new(cells).unwrap();
        assert_eq!(
            candidate.is_solvable(&PuzzleState::GOAL),
            component.contains(&candidate),
            "parity check disagrees for {}",
            candidate.compact()
        );
    }

    // Solvable for the canonical goal, not for a goal of the other parity.
    let scenario = state("813402765");
    let odd_goal = state(UNSOLVABLE);
    assert!(scenario.is_solvable(&PuzzleState::GOAL));
    assert!(component.contains(&scenario));
    assert!(!scenario.is_solvable(&odd_goal));
    assert!(!component.contains(&odd_goal));
}

#[test]
fn test_moves_are_reversible_and_keep_validity() {
    let mut rng = StdRng::seed_from_u64(8);
    for _ in 0..50 {
        let s = PuzzleState::random_solvable(&PuzzleState::GOAL, &mut rng);
        for mv in s.legal_moves() {
            let next = s.apply(mv).unwrap();
            let changed = s
                .cells()
                .iter()
                .zip(next.cells())
                .filter(|(a, b)| a != b)
                .count();
            assert_eq!(changed, 2);
            assert_eq!(next.apply(mv.inverse()).unwrap(), s);
        }
    }
}

#[test]
fn test_manhattan_scenarios() {
    let goal = PuzzleState::GOAL;
    let shifted_goal = PuzzleState::from_rows([[1, 2, 3], [4, 5, 6], [0, 7, 8]]).unwrap();
    assert_eq!(manhattan_distance(&goal, &goal), 0);
    assert_eq!(manhattan_distance(&goal, &shifted_goal), 2);
}
