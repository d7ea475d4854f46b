//! Breadth-first solver for the "Setting Sun" sliding-block puzzle.
//!
//! Ten pieces sit on a 4x5 board: one 2x2 sun, one 1x2 wide block, four 2x1
//! tall blocks and four 1x1 small blocks. Pieces slide one cell at a time into
//! free space and the puzzle is solved once the sun reaches the goal cell.
//!
//! The search works on [`StateKey`]s: every configuration is packed into a
//! single `u64`, with the interchangeable tall and small pieces kept in sorted
//! order so that physically identical boards share one key. That collapses the
//! raw permutation space to a few tens of thousands of states, which a plain
//! BFS with a visited set explores in milliseconds.
//!
//! ```
//! use setting_sun::{Board, Outcome, Solver, SolverConfig};
//!
//! let mut solver = Solver::new(SolverConfig::default())?;
//! match solver.solve(&Board::standard())? {
//!     Outcome::Solved(solution) => assert_eq!(solution.moves(), 112),
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! # Ok::<(), setting_sun::ConfigError>(())
//! ```

mod board;
mod error;
mod grid;
mod piece;
mod point;
mod solver;
mod state;

pub use board::Board;
pub use error::{ConfigError, ParseLayoutError, ParsePointError};
pub use grid::Grid;
pub use piece::{footprint, Footprint, Piece, PieceKind, Slot};
pub use point::{Direction, Point};
pub use solver::{solve, Outcome, SearchStats, SearchStatus, Solution, Solver, SolverConfig};
pub use state::{StateKey, Step};

pub const BOARD_WIDTH: usize = 4;
pub const BOARD_HEIGHT: usize = 5;
pub const PIECE_COUNT: usize = 10;

/// Where the sun has to end up unless configured otherwise.
pub const DEFAULT_GOAL: Point = Point::new(1, 3);
