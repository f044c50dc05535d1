//! Genetic search over move sequences

use std::{borrow::Cow, cell::OnceCell, collections::HashSet, time::Instant};

use log::{debug, trace};
use rand::{Rng, seq::IndexedRandom};

use super::{Failure, PuzzleProblem, SearchResult};
use crate::{
    config::GeneticConfig,
    ports::{SearchObserver, StepContext},
    puzzle::{Move, PuzzleState},
};

/// Fitness weight of the remaining heuristic distance
const DISTANCE_WEIGHT: f64 = 10.0;
/// Fitness weight of each effective move
const LENGTH_WEIGHT: f64 = 0.1;

#[derive(Debug, Clone)]
struct Evaluation {
    /// Initial and goal state of the problem this was computed for
    problem: (PuzzleState, PuzzleState),
    fitness: f64,
    /// States actually visited, starting at the initial state
    path: Vec<PuzzleState>,
    solved: bool,
}

/// A candidate solution: a sequence of moves played from the initial state.
///
/// Illegal moves and moves that would revisit a state are skipped when the
/// sequence is played, and play stops at the goal. Fitness is lower for
/// better individuals: `0.1 * moves` for a sequence that reaches the goal,
/// `10 * h + 0.1 * moves` otherwise, counting effective moves only.
///
/// The evaluation is computed on first use and memoized for that problem.
/// Asking about another problem recomputes without touching the cache;
/// replacing the moves clears it.
#[derive(Debug, Clone, Default)]
pub struct Chromosome {
    moves: Vec<Move>,
    evaluation: OnceCell<Evaluation>,
}

impl Chromosome {
    pub fn new(moves: Vec<Move>) -> Self {
        Self {
            moves,
            evaluation: OnceCell::new(),
        }
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn set_moves(&mut self, moves: Vec<Move>) {
        self.moves = moves;
        self.evaluation = OnceCell::new();
    }

    pub fn is_evaluated(&self) -> bool {
        self.evaluation.get().is_some()
    }

    fn evaluate(&self, problem: &PuzzleProblem) -> Cow<'_, Evaluation> {
        let cached = self.evaluation.get_or_init(|| self.play(problem));
        if cached.problem == (*problem.initial(), *problem.goal()) {
            Cow::Borrowed(cached)
        } else {
            Cow::Owned(self.play(problem))
        }
    }

    fn play(&self, problem: &PuzzleProblem) -> Evaluation {
        let mut current = *problem.initial();
        let mut path = vec![current];
        let mut seen = HashSet::from([current.key()]);
        for &mv in &self.moves {
            if current.is_goal(problem.goal()) {
                break;
            }
            let Ok(next) = current.apply(mv) else { continue };
            if !seen.insert(next.key()) {
                continue;
            }
            current = next;
            path.push(current);
        }
        let effective = (path.len() - 1) as f64;
        let solved = current.is_goal(problem.goal());
        let fitness = if solved {
            LENGTH_WEIGHT * effective
        } else {
            DISTANCE_WEIGHT * problem.h(&current) as f64 + LENGTH_WEIGHT * effective
        };
        Evaluation {
            problem: (*problem.initial(), *problem.goal()),
            fitness,
            path,
            solved,
        }
    }

    pub fn fitness(&self, problem: &PuzzleProblem) -> f64 {
        self.evaluate(problem).fitness
    }

    pub fn final_state(&self, problem: &PuzzleProblem) -> PuzzleState {
        let evaluation = self.evaluate(problem);
        evaluation.path.last().copied().unwrap_or(*problem.initial())
    }

    pub fn is_solution(&self, problem: &PuzzleProblem) -> bool {
        self.evaluate(problem).solved
    }

    /// The effective path from the initial state to the goal, if reached.
    pub fn solution(&self, problem: &PuzzleProblem) -> Option<Vec<PuzzleState>> {
        let evaluation = self.evaluate(problem);
        evaluation.solved.then(|| evaluation.path.clone())
    }
}

fn random_move<R: Rng + ?Sized>(rng: &mut R) -> Move {
    Move::ALL[rng.random_range(0..Move::ALL.len())]
}

/// A quarter of the population (at most ten) are cycle-free random walks
/// from the initial state; the rest are uniformly random move strings.
fn initial_population<R: Rng + ?Sized>(
    problem: &PuzzleProblem,
    config: &GeneticConfig,
    rng: &mut R,
) -> Vec<Chromosome> {
    let walkers = (config.population_size / 4).min(10);
    let max = config.max_moves.max(1);
    (0..config.population_size)
        .map(|i| {
            let moves = if i < walkers {
                let mut current = *problem.initial();
                let mut seen = HashSet::from([current.key()]);
                let mut moves = Vec::new();
                for _ in 0..rng.random_range(max / 2..=max) {
                    let legal: Vec<Move> = current.legal_moves().collect();
                    let Some(&mv) = legal.choose(rng) else { break };
                    moves.push(mv);
                    current = current.apply_or_stay(mv);
                    if !seen.insert(current.key()) || current.is_goal(problem.goal()) {
                        break;
                    }
                }
                moves
            } else {
                (0..rng.random_range(1..=max)).map(|_| random_move(rng)).collect()
            };
            Chromosome::new(moves)
        })
        .collect()
}

/// Best of `size` distinct individuals drawn at random, or `None` for an
/// empty population. A size of zero still draws one.
fn tournament<'a, R: Rng + ?Sized>(
    population: &'a [Chromosome],
    size: usize,
    problem: &PuzzleProblem,
    rng: &mut R,
) -> Option<&'a Chromosome> {
    population
        .choose_multiple(rng, size.clamp(1, population.len().max(1)))
        .min_by(|a, b| a.fitness(problem).total_cmp(&b.fitness(problem)))
}

/// Point crossover (one or two cut points) with probability 0.7, uniform
/// crossover otherwise. Parents are copied when no crossover happens.
fn crossover<R: Rng + ?Sized>(
    a: &Chromosome,
    b: &Chromosome,
    rate: f64,
    rng: &mut R,
) -> (Vec<Move>, Vec<Move>) {
    let (a, b) = (a.moves(), b.moves());
    if rng.random::<f64>() > rate {
        return (a.to_vec(), b.to_vec());
    }

    if rng.random::<f64>() < 0.7 {
        let shortest = a.len().min(b.len());
        if shortest <= 1 {
            return (a.to_vec(), b.to_vec());
        }
        if shortest > 3 && rng.random::<f64>() < 0.5 {
            let first = rng.random_range(1..=shortest / 2);
            let second = rng.random_range(first + 1..shortest);
            let splice = |x: &[Move], y: &[Move]| {
                [&x[..first], &y[first..second], &x[second..]].concat()
            };
            (splice(a, b), splice(b, a))
        } else {
            let cut = rng.random_range(1..shortest);
            ([&a[..cut], &b[cut..]].concat(), [&b[..cut], &a[cut..]].concat())
        }
    } else {
        let mut left = Vec::new();
        let mut right = Vec::new();
        for i in 0..a.len().max(b.len()) {
            let (x, y) = if rng.random::<f64>() < 0.5 { (a, b) } else { (b, a) };
            left.extend(x.get(i));
            right.extend(y.get(i));
        }
        (left, right)
    }
}

/// Point mutation with random growth or shrinkage (p = 0.5), legality-aware
/// repair (p = 0.3), or a reversed, rotated or replaced run of moves (p = 0.2).
fn mutate<R: Rng + ?Sized>(
    mut moves: Vec<Move>,
    problem: &PuzzleProblem,
    rate: f64,
    rng: &mut R,
) -> Vec<Move> {
    const MAX_LENGTH_CHANGE: i32 = 3;
    let strategy = rng.random::<f64>();

    if strategy < 0.5 {
        for mv in moves.iter_mut() {
            if rng.random::<f64>() < rate {
                *mv = random_move(rng);
            }
        }
        let change = rng.random_range(-MAX_LENGTH_CHANGE..=MAX_LENGTH_CHANGE);
        if change > 0 {
            for _ in 0..change {
                let at = rng.random_range(0..=moves.len());
                moves.insert(at, random_move(rng));
            }
        } else if change < 0 && moves.len() > change.unsigned_abs() as usize {
            for _ in 0..change.unsigned_abs() {
                let at = rng.random_range(0..moves.len());
                moves.remove(at);
            }
        }
    } else if strategy < 0.8 {
        let mut current = *problem.initial();
        for mv in moves.iter_mut() {
            if rng.random::<f64>() < rate {
                let legal: Vec<Move> = current.legal_moves().collect();
                if let Some(&replacement) = legal.choose(rng) {
                    *mv = replacement;
                }
            }
            current = current.apply_or_stay(*mv);
        }
    } else if moves.len() > 3 {
        let run = rng.random_range(2..=(moves.len() / 2).min(5));
        let start = rng.random_range(0..=moves.len() - run);
        let segment = &mut moves[start..start + run];
        match rng.random_range(0..3) {
            0 => segment.reverse(),
            1 => segment.rotate_right(1),
            _ => segment.iter_mut().for_each(|mv| *mv = random_move(rng)),
        }
    }
    moves
}

/// Genetic algorithm with tournament selection, elitism and mixed
/// crossover and mutation operators.
///
/// Every individual created counts as one explored node. The run stops on a
/// goal-reaching champion, on `max_time` or after `generations`; in the last
/// two cases the final population and the best individual seen are checked
/// once more before failing. An empty population fails at once with
/// [`Failure::IterationLimit`].
pub fn genetic_algorithm<R: Rng + ?Sized>(
    problem: &PuzzleProblem,
    config: &GeneticConfig,
    rng: &mut R,
    observer: &mut dyn SearchObserver<PuzzleState>,
) -> SearchResult<PuzzleState> {
    const NAME: &str = "Genetic algorithm";
    if !problem.initial().is_solvable(problem.goal()) {
        return SearchResult::unsolvable().logged(NAME);
    }

    if config.population_size == 0 {
        debug!("{NAME}: empty population, nothing to evolve");
        return SearchResult::failed(Failure::IterationLimit, 0).logged(NAME);
    }

    let started = Instant::now();
    let max_time = config.max_time();
    let mut population = initial_population(problem, config, rng);
    let mut nodes = population.len();
    let mut best: Option<Chromosome> = None;
    let mut failure = Failure::IterationLimit;

    for generation in 0..config.generations {
        if started.elapsed() > max_time {
            debug!("{NAME}: time limit hit at generation {generation}");
            failure = Failure::TimeLimit;
            break;
        }

        population.sort_by(|a, b| a.fitness(problem).total_cmp(&b.fitness(problem)));
        let Some(champion) = population.first() else {
            break;
        };
        if best
            .as_ref()
            .is_none_or(|b| champion.fitness(problem) < b.fitness(problem))
        {
            best = Some(champion.clone());
        }
        observer.on_step(
            &StepContext::new(generation, &champion.final_state(problem), "evolve")
                .with_score(champion.fitness(problem)),
        );
        trace!(
            "{NAME}: generation {generation} best fitness {:.1}",
            champion.fitness(problem)
        );
        if let Some(path) = champion.solution(problem) {
            return SearchResult::solved(path, nodes).logged(NAME);
        }

        let mut next: Vec<Chromosome> = population[..config.elite_count()].to_vec();
        while next.len() < config.population_size {
            let a = tournament(&population, config.tournament_size, problem, rng);
            let b = tournament(&population, config.tournament_size, problem, rng);
            let (Some(a), Some(b)) = (a, b) else { break };
            let (left, right) = crossover(a, b, config.crossover_rate, rng);
            next.push(Chromosome::new(mutate(left, problem, config.mutation_rate, rng)));
            if next.len() < config.population_size {
                next.push(Chromosome::new(mutate(right, problem, config.mutation_rate, rng)));
            }
            nodes += 2;
        }
        population = next;
    }

    let solution = population
        .iter()
        .chain(best.as_ref())
        .find_map(|c| c.solution(problem));
    match solution {
        Some(path) => SearchResult::solved(path, nodes).logged(NAME),
        None => SearchResult::failed(failure, nodes).logged(NAME),
    }
}
