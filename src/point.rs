use std::fmt;
use std::str::FromStr;

use crate::error::ParsePointError;
use crate::{BOARD_HEIGHT, BOARD_WIDTH};

// Offsets in (col, row) order, indexed by `Direction as usize`.
const DIR_OFFSETS: [(i8, i8); 5] = [(0, -1), (0, 1), (-1, 0), (1, 0), (0, 0)];

/// A board cell. Ordering is by column, then row, which is the order the
/// codec keeps interchangeable pieces in.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[repr(C)]
pub struct Point {
    pub col: i8,
    pub row: i8,
}

impl Point {
    #[inline(always)]
    pub const fn new(col: i8, row: i8) -> Self {
        Point { col, row }
    }

    #[inline(always)]
    pub fn in_bounds(self) -> bool {
        self.col >= 0
            && (self.col as usize) < BOARD_WIDTH
            && self.row >= 0
            && (self.row as usize) < BOARD_HEIGHT
    }

    /// Wraps at the `i8` limits; a wrapped point is always off the board.
    #[inline(always)]
    pub fn offset(self, dcol: i8, drow: i8) -> Self {
        Point::new(self.col.wrapping_add(dcol), self.row.wrapping_add(drow))
    }

    #[inline(always)]
    pub fn step(self, direction: Direction) -> Self {
        let (dcol, drow) = DIR_OFFSETS[direction as usize];
        self.offset(dcol, drow)
    }

    /// Packs an in-bounds point into 6 bits: column in the high three, row in
    /// the low three.
    #[inline(always)]
    pub(crate) fn pack(self) -> u64 {
        (((self.col as u64) & 0b111) << 3) | ((self.row as u64) & 0b111)
    }

    #[inline(always)]
    pub(crate) fn unpack(bits: u64) -> Self {
        Point {
            col: ((bits >> 3) & 0b111) as i8,
            row: (bits & 0b111) as i8,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.col, self.row)
    }
}

/// Parses `COL,ROW`, optionally wrapped in parentheses.
impl FromStr for Point {
    type Err = ParsePointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let inner = trimmed
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(trimmed);
        let (col, row) = inner
            .split_once(',')
            .ok_or_else(|| ParsePointError::MissingComma(s.to_owned()))?;
        let parse = |part: &str| {
            part.trim()
                .parse::<i8>()
                .map_err(|_| ParsePointError::BadNumber(part.trim().to_owned()))
        };
        Ok(Point::new(parse(col)?, parse(row)?))
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    Stay,
}

impl Direction {
    /// The four real moves, in the order the search tries them.
    pub const MOVES: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// The single step that heads from `from` toward `to`, if the two share a
    /// row or a column and differ.
    pub fn toward(from: Point, to: Point) -> Option<Direction> {
        use std::cmp::Ordering::*;
        match (to.col.cmp(&from.col), to.row.cmp(&from.row)) {
            (Equal, Less) => Some(Direction::Up),
            (Equal, Greater) => Some(Direction::Down),
            (Less, Equal) => Some(Direction::Left),
            (Greater, Equal) => Some(Direction::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Stay => "stay",
        })
    }
}
