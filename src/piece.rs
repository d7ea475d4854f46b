use std::fmt;
use std::ops::Range;

use arrayvec::ArrayVec;

use crate::point::{Direction, Point};

/// Cells covered by one piece. Returned by value, so a footprint never
/// aliases another piece's cells or an earlier call's result.
pub type Footprint = ArrayVec<Point, 4>;

// Offsets from the top-left reference cell, (col, row). The reference cell
// always comes first.
const SUN_SHAPE: [(i8, i8); 4] = [(0, 0), (1, 0), (0, 1), (1, 1)];
const WIDE_SHAPE: [(i8, i8); 2] = [(0, 0), (1, 0)];
const TALL_SHAPE: [(i8, i8); 2] = [(0, 0), (0, 1)];
const SMALL_SHAPE: [(i8, i8); 1] = [(0, 0)];

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PieceKind {
    Sun,
    Wide,
    Tall,
    Small,
}

impl PieceKind {
    pub const ALL: [PieceKind; 4] = [
        PieceKind::Sun,
        PieceKind::Wide,
        PieceKind::Tall,
        PieceKind::Small,
    ];

    #[inline(always)]
    pub const fn shape(self) -> &'static [(i8, i8)] {
        match self {
            PieceKind::Sun => &SUN_SHAPE,
            PieceKind::Wide => &WIDE_SHAPE,
            PieceKind::Tall => &TALL_SHAPE,
            PieceKind::Small => &SMALL_SHAPE,
        }
    }

    /// How many pieces of this kind are on the board.
    pub const fn count(self) -> usize {
        match self {
            PieceKind::Sun | PieceKind::Wide => 1,
            PieceKind::Tall | PieceKind::Small => 4,
        }
    }

    /// Slot indices owned by this kind inside a [`StateKey`](crate::StateKey).
    pub const fn slots(self) -> Range<usize> {
        match self {
            PieceKind::Sun => 0..1,
            PieceKind::Wide => 1..2,
            PieceKind::Tall => 2..6,
            PieceKind::Small => 6..10,
        }
    }

    /// Layout glyph.
    pub const fn symbol(self) -> char {
        match self {
            PieceKind::Sun => 'S',
            PieceKind::Wide => 'W',
            PieceKind::Tall => 'T',
            PieceKind::Small => 's',
        }
    }

    pub fn from_symbol(glyph: char) -> Option<Self> {
        PieceKind::ALL.into_iter().find(|kind| kind.symbol() == glyph)
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PieceKind::Sun => "sun",
            PieceKind::Wide => "wide",
            PieceKind::Tall => "tall",
            PieceKind::Small => "small",
        })
    }
}

/// Cells a `kind` piece with its reference at `origin` covers after moving
/// one step in `direction`. Cells may lie off the board; the grid rejects
/// those.
#[inline]
pub fn footprint(kind: PieceKind, origin: Point, direction: Direction) -> Footprint {
    let base = origin.step(direction);
    kind.shape()
        .iter()
        .map(|&(dcol, drow)| base.offset(dcol, drow))
        .collect()
}

/// One of the ten fixed positions of a packed state, in canonical order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(u8)]
pub enum Slot {
    Sun,
    Wide,
    Tall1,
    Tall2,
    Tall3,
    Tall4,
    Small1,
    Small2,
    Small3,
    Small4,
}

impl Slot {
    pub const ALL: [Slot; 10] = [
        Slot::Sun,
        Slot::Wide,
        Slot::Tall1,
        Slot::Tall2,
        Slot::Tall3,
        Slot::Tall4,
        Slot::Small1,
        Slot::Small2,
        Slot::Small3,
        Slot::Small4,
    ];

    /// Looks up the slot for a piece identity; `None` if the identity is
    /// outside `1..=kind.count()`.
    pub fn new(kind: PieceKind, identity: u8) -> Option<Slot> {
        let identity = usize::from(identity);
        if identity == 0 || identity > kind.count() {
            return None;
        }
        Slot::ALL.get(kind.slots().start + identity - 1).copied()
    }

    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn kind(self) -> PieceKind {
        match self {
            Slot::Sun => PieceKind::Sun,
            Slot::Wide => PieceKind::Wide,
            Slot::Tall1 | Slot::Tall2 | Slot::Tall3 | Slot::Tall4 => PieceKind::Tall,
            Slot::Small1 | Slot::Small2 | Slot::Small3 | Slot::Small4 => PieceKind::Small,
        }
    }

    pub const fn identity(self) -> u8 {
        (self.index() - self.kind().slots().start + 1) as u8
    }
}

/// A placed piece. The identity only tells apart pieces of the same kind and
/// plays no part in the board's observable state.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Piece {
    kind: PieceKind,
    identity: u8,
    origin: Point,
}

impl Piece {
    pub const fn new(kind: PieceKind, identity: u8, origin: Point) -> Self {
        Piece {
            kind,
            identity,
            origin,
        }
    }

    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    pub const fn identity(&self) -> u8 {
        self.identity
    }

    /// Top-left cell.
    pub const fn origin(&self) -> Point {
        self.origin
    }

    /// Sun and wide always map to their single slot, whatever identity they
    /// were given.
    pub fn slot(&self) -> Option<Slot> {
        let identity = if self.kind.count() == 1 { 1 } else { self.identity };
        Slot::new(self.kind, identity)
    }

    #[inline]
    pub fn footprint(&self, direction: Direction) -> Footprint {
        footprint(self.kind, self.origin, direction)
    }
}
