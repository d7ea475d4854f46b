//! Breadth-first search over canonical states.
//!
//! Every distinct [`StateKey`] is stored once in an arena in discovery order,
//! each entry pointing at the arena index of the state it was reached from.
//! The frontier holds arena indices waiting to be expanded, and the memo holds
//! every key discovered so far. Because the search runs level by level and
//! tries slots and directions in a fixed order, the first winning state found
//! is at minimal depth, and among equally short solutions the one met first
//! in that order is returned.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use rustc_hash::FxHashSet;

use crate::board::Board;
use crate::error::ConfigError;
use crate::grid::Grid;
use crate::piece::{footprint, PieceKind, Slot};
use crate::point::{Direction, Point};
use crate::state::{StateKey, Step};
use crate::DEFAULT_GOAL;

// How often the clock is read when a time budget is set.
const CLOCK_CHECK_INTERVAL: usize = 1024;
const PROGRESS_LOG_INTERVAL: usize = 4096;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolverConfig {
    /// Cell the sun's top-left corner must reach.
    pub goal: Point,
    /// Give up after expanding this many states.
    pub max_iterations: Option<usize>,
    /// Give up once this much wall-clock time has passed.
    pub time_budget: Option<Duration>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            goal: DEFAULT_GOAL,
            max_iterations: None,
            time_budget: None,
        }
    }
}

impl SolverConfig {
    pub fn with_goal(mut self, goal: Point) -> Self {
        self.goal = goal;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let fits = footprint(PieceKind::Sun, self.goal, Direction::Stay)
            .iter()
            .all(|c| c.in_bounds());
        if fits {
            Ok(())
        } else {
            Err(ConfigError::InvalidGoal { goal: self.goal })
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SearchStatus {
    Running,
    Solved,
    Exhausted,
    Abandoned,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct SearchStats {
    /// States taken off the frontier and expanded.
    pub iterations: usize,
    /// Distinct canonical keys recorded in the memo.
    pub discovered: usize,
    pub peak_frontier: usize,
    pub elapsed: Duration,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Solved(Solution),
    /// Every reachable state was expanded without meeting the goal. The
    /// iteration count is then the size of the reachable state space.
    Exhausted(SearchStats),
    /// A budget ran out first; the goal may or may not be reachable.
    Abandoned(SearchStats),
}

impl Outcome {
    pub fn stats(&self) -> &SearchStats {
        match self {
            Outcome::Solved(solution) => &solution.stats,
            Outcome::Exhausted(stats) | Outcome::Abandoned(stats) => stats,
        }
    }

    pub fn solution(&self) -> Option<&Solution> {
        match self {
            Outcome::Solved(solution) => Some(solution),
            _ => None,
        }
    }
}

/// A shortest sequence of configurations from the start to the goal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    path: Vec<StateKey>,
    stats: SearchStats,
}

impl Solution {
    /// Number of single-cell moves.
    pub fn moves(&self) -> usize {
        self.path.len() - 1
    }

    /// Start first, goal last.
    pub fn states(&self) -> &[StateKey] {
        &self.path
    }

    pub fn boards(&self) -> impl Iterator<Item = Board> + '_ {
        self.path.iter().map(|&key| Board::from_key(key))
    }

    /// One step per move. Adjacent path states are always one move apart.
    pub fn steps(&self) -> impl Iterator<Item = Step> + '_ {
        self.path.windows(2).filter_map(|pair| {
            let step = pair[0].step_to(pair[1]);
            debug_assert!(step.is_some(), "{} -> {} is not one move", pair[0], pair[1]);
            step
        })
    }

    pub fn final_board(&self) -> Board {
        // Paths always hold at least the start.
        Board::from_key(self.path[self.path.len() - 1])
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }
}

#[derive(Clone, Copy, Debug)]
struct Node {
    key: StateKey,
    parent: Option<u32>,
}

/// Reusable search workspace. Each call to [`Solver::solve`] starts from
/// scratch; nothing carries over between solves.
#[derive(Clone, Debug)]
pub struct Solver {
    config: SolverConfig,
    grid: Grid,
    memo: FxHashSet<u64>,
    arena: Vec<Node>,
    frontier: VecDeque<u32>,
    status: SearchStatus,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Solver {
            config,
            grid: Grid::new(),
            memo: FxHashSet::with_capacity_and_hasher(1 << 15, Default::default()),
            arena: Vec::with_capacity(1 << 15),
            frontier: VecDeque::with_capacity(1 << 10),
            status: SearchStatus::Running,
        })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Status of the most recent solve.
    pub fn status(&self) -> SearchStatus {
        self.status
    }

    /// Runs the search to completion from `start`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `start` has pieces off the board or on
    /// top of each other. Not finding a solution is an [`Outcome`], not an
    /// error.
    pub fn solve(&mut self, start: &Board) -> Result<Outcome, ConfigError> {
        start.validate()?;
        self.reset();

        let started = Instant::now();
        let goal = self.config.goal;
        let start_key = start.key();
        log::debug!("solving from {start_key} toward sun at {goal}");

        self.arena.push(Node {
            key: start_key,
            parent: None,
        });
        self.memo.insert(start_key.raw());

        if start_key.sun() == goal {
            self.status = SearchStatus::Solved;
            return Ok(Outcome::Solved(Solution {
                path: vec![start_key],
                stats: self.stats(0, 0, started),
            }));
        }

        self.frontier.push_back(0);
        let mut iterations = 0;
        let mut peak_frontier = 1;

        let outcome = loop {
            // An empty frontier takes precedence over a spent budget.
            if !self.frontier.is_empty() && self.over_budget(iterations, started) {
                self.status = SearchStatus::Abandoned;
                break Outcome::Abandoned(self.stats(iterations, peak_frontier, started));
            }
            let Some(current) = self.frontier.pop_front() else {
                self.status = SearchStatus::Exhausted;
                break Outcome::Exhausted(self.stats(iterations, peak_frontier, started));
            };
            iterations += 1;

            if let Some(win) = self.expand(current, goal) {
                self.status = SearchStatus::Solved;
                let path = self.path_to(win);
                break Outcome::Solved(Solution {
                    path,
                    stats: self.stats(iterations, peak_frontier, started),
                });
            }

            peak_frontier = peak_frontier.max(self.frontier.len());
            if iterations % PROGRESS_LOG_INTERVAL == 0 {
                log::trace!(
                    "{iterations} expanded, {} discovered, frontier {}",
                    self.memo.len(),
                    self.frontier.len()
                );
            }
        };

        self.frontier.clear();

        match &outcome {
            Outcome::Solved(solution) => log::debug!(
                "solved in {} moves after {} iterations",
                solution.moves(),
                iterations
            ),
            Outcome::Exhausted(stats) => log::debug!(
                "no solution; {} reachable states exhausted",
                stats.iterations
            ),
            Outcome::Abandoned(stats) => log::debug!(
                "budget exhausted after {} iterations",
                stats.iterations
            ),
        }
        Ok(outcome)
    }

    fn reset(&mut self) {
        self.grid.reset();
        self.memo.clear();
        self.arena.clear();
        self.frontier.clear();
        self.status = SearchStatus::Running;
    }

    fn over_budget(&self, iterations: usize, started: Instant) -> bool {
        if matches!(self.config.max_iterations, Some(max) if iterations >= max) {
            return true;
        }
        match self.config.time_budget {
            Some(budget) if iterations % CLOCK_CHECK_INTERVAL == 0 => started.elapsed() >= budget,
            _ => false,
        }
    }

    /// Generates every unseen successor of arena entry `current`. Returns the
    /// arena index of a winning state as soon as one turns up.
    fn expand(&mut self, current: u32, goal: Point) -> Option<u32> {
        let key = self.arena[current as usize].key;
        let positions = key.positions();
        self.grid.load(&positions);

        for slot in Slot::ALL {
            let kind = slot.kind();
            let origin = positions[slot.index()];
            let here = footprint(kind, origin, Direction::Stay);
            self.grid.vacate(&here);

            for direction in Direction::MOVES {
                if !self.grid.is_valid(&footprint(kind, origin, direction)) {
                    continue;
                }
                let next = key.with_slot(slot, origin.step(direction));
                if !self.memo.insert(next.raw()) {
                    continue;
                }

                let index = self.arena.len() as u32;
                self.arena.push(Node {
                    key: next,
                    parent: Some(current),
                });
                if next.sun() == goal {
                    return Some(index);
                }
                self.frontier.push_back(index);
            }

            self.grid.occupy(&here);
        }

        None
    }

    /// Walks parent links from `last` back to the start.
    fn path_to(&self, last: u32) -> Vec<StateKey> {
        let mut path = Vec::new();
        let mut cursor = Some(last);
        while let Some(index) = cursor {
            let node = self.arena[index as usize];
            path.push(node.key);
            cursor = node.parent;
        }
        path.reverse();
        path
    }

    fn stats(&self, iterations: usize, peak_frontier: usize, started: Instant) -> SearchStats {
        SearchStats {
            iterations,
            discovered: self.memo.len(),
            peak_frontier,
            elapsed: started.elapsed(),
        }
    }
}

/// Solves from `start` with the default configuration.
pub fn solve(start: &Board) -> Result<Outcome, ConfigError> {
    Solver::new(SolverConfig::default())?.solve(start)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Four moves from the goal: wide up, small up, small right, sun right.
    const NEAR_GOAL: &str = "TTTT\nTTTT\nss..\nSSWW\nSSss\n";

    // The sun is boxed in; only six canonical states are reachable.
    const STUCK: &str = "Tss.\nTSSs\nTSST\nT.TT\nWWTs\n";

    fn board(text: &str) -> Board {
        text.parse().expect("valid layout")
    }

    fn solver() -> Solver {
        Solver::new(SolverConfig::default()).expect("default config is valid")
    }

    #[test]
    fn test_near_goal() {
        let outcome = solver().solve(&board(NEAR_GOAL)).expect("valid board");
        let solution = outcome.solution().expect("solvable");
        assert_eq!(solution.moves(), 4);
        assert_eq!(solution.final_board().sun(), DEFAULT_GOAL);
        assert_eq!(solution.boards().next(), Some(board(NEAR_GOAL)));
    }

    #[test]
    fn test_path_is_a_chain_of_legal_steps() {
        let outcome = solver().solve(&board(NEAR_GOAL)).expect("valid board");
        let solution = outcome.solution().expect("solvable");

        let steps: Vec<Step> = solution.steps().collect();
        assert_eq!(steps.len(), solution.moves());
        assert_eq!(steps[0].kind, PieceKind::Wide);
        assert_eq!(steps[0].direction, Direction::Up);
        assert_eq!(steps[3].kind, PieceKind::Sun);
        assert_eq!(steps[3].direction, Direction::Right);

        // Replaying each step on a live board reproduces the path.
        let mut live = board(NEAR_GOAL);
        for (step, expected) in steps.iter().zip(solution.boards().skip(1)) {
            assert!(live.apply_step(step.from, step.to), "illegal step {step}");
            assert_eq!(live, expected);
        }
    }

    #[test]
    fn test_exhausted_counts_reachable_states() {
        let mut solver = solver();
        let outcome = solver.solve(&board(STUCK)).expect("valid board");
        match outcome {
            Outcome::Exhausted(stats) => {
                assert_eq!(stats.iterations, 6);
                assert_eq!(stats.discovered, 6);
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
        assert_eq!(solver.status(), SearchStatus::Exhausted);
    }

    #[test]
    fn test_start_on_goal() {
        let text = "TTTT\nTTTT\nsWWs\nsSSs\n.SS.\n";
        let outcome = solver().solve(&board(text)).expect("valid board");
        let solution = outcome.solution().expect("already solved");
        assert_eq!(solution.moves(), 0);
        assert_eq!(solution.stats().iterations, 0);
        assert_eq!(solution.steps().count(), 0);
    }

    #[test]
    fn test_iteration_budget_abandons() {
        let config = SolverConfig::default().with_max_iterations(10);
        let mut solver = Solver::new(config).expect("valid config");
        let outcome = solver.solve(&Board::standard()).expect("valid board");
        match outcome {
            Outcome::Abandoned(stats) => assert_eq!(stats.iterations, 10),
            other => panic!("expected abandonment, got {other:?}"),
        }
        assert_eq!(solver.status(), SearchStatus::Abandoned);
    }

    #[test]
    fn test_zero_time_budget_abandons_immediately() {
        let config = SolverConfig::default().with_time_budget(Duration::ZERO);
        let outcome = Solver::new(config)
            .expect("valid config")
            .solve(&Board::standard())
            .expect("valid board");
        assert!(matches!(outcome, Outcome::Abandoned(SearchStats { iterations: 0, .. })));
    }

    #[test]
    fn test_invalid_goal_rejected() {
        for goal in [
            Point::new(3, 0),
            Point::new(0, 4),
            Point::new(-1, 2),
            Point::new(i8::MAX, 0),
            Point::new(0, i8::MAX),
        ] {
            assert_eq!(
                Solver::new(SolverConfig::default().with_goal(goal)).err(),
                Some(ConfigError::InvalidGoal { goal })
            );
        }
    }

    #[test]
    fn test_overlapping_start_rejected() {
        let mut start = Board::standard();
        start
            .set_position(Slot::Small1, Point::new(1, 2))
            .expect("on the board");
        assert_eq!(
            solver().solve(&start),
            Err(ConfigError::Overlap {
                cell: Point::new(1, 2)
            })
        );
    }

    #[test]
    fn test_solver_is_reusable() {
        let mut solver = solver();
        let first = solver.solve(&board(NEAR_GOAL)).expect("valid board");
        let _ = solver.solve(&board(STUCK)).expect("valid board");
        let again = solver.solve(&board(NEAR_GOAL)).expect("valid board");
        assert_eq!(first.solution().map(Solution::states), again.solution().map(Solution::states));
        assert_eq!(first.stats().discovered, again.stats().discovered);
        assert_eq!(solver.status(), SearchStatus::Solved);
    }

    #[test]
    fn test_memo_never_repeats_keys() {
        let mut solver = solver();
        let outcome = solver.solve(&board(STUCK)).expect("valid board");
        let keys: FxHashSet<StateKey> = solver.arena.iter().map(|node| node.key).collect();
        assert_eq!(keys.len(), solver.arena.len());
        assert_eq!(solver.memo.len(), outcome.stats().discovered);
    }

    #[test]
    fn test_memo_never_repeats_keys_on_standard_start() {
        let mut solver = solver();
        let outcome = solver.solve(&Board::standard()).expect("valid board");
        let keys: FxHashSet<StateKey> = solver.arena.iter().map(|node| node.key).collect();
        assert!(solver.arena.len() > 20_000);
        assert_eq!(keys.len(), solver.arena.len());
        assert_eq!(solver.memo.len(), solver.arena.len());
        assert_eq!(solver.memo.len(), outcome.stats().discovered);
    }

    #[test]
    fn test_steps_cover_every_move() {
        let outcome = solver().solve(&Board::standard()).expect("valid board");
        let solution = outcome.solution().expect("solvable");
        assert_eq!(solution.steps().count(), solution.moves());
        assert_eq!(solution.boards().count(), solution.moves() + 1);
    }
}
