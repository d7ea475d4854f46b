use thiserror::Error;

use crate::piece::PieceKind;
use crate::point::Point;

/// A board or solver setup that cannot be searched. Raised before any search
/// work begins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("expected {expected} pieces, found {found}")]
    PieceCount { expected: usize, found: usize },

    #[error("expected {expected} {kind} piece(s), found {found}")]
    KindCount {
        kind: PieceKind,
        expected: usize,
        found: usize,
    },

    #[error("{kind} identity {identity} is outside 1..={max}")]
    IdentityOutOfRange {
        kind: PieceKind,
        identity: u8,
        max: usize,
    },

    #[error("duplicate {kind} identity {identity}")]
    DuplicateIdentity { kind: PieceKind, identity: u8 },

    #[error("{kind} piece at {origin} extends past the board")]
    OutOfBounds { kind: PieceKind, origin: Point },

    #[error("pieces overlap at {cell}")]
    Overlap { cell: Point },

    #[error("goal {goal} is not a cell the sun can occupy")]
    InvalidGoal { goal: Point },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseLayoutError {
    #[error("expected 5 rows, found {found}")]
    RowCount { found: usize },

    #[error("row {row} has {found} cells, expected at most 4")]
    RowTooLong { row: usize, found: usize },

    #[error("unknown glyph {glyph:?} at {at}")]
    UnknownGlyph { glyph: char, at: Point },

    #[error("{kind} piece starting at {at} is incomplete")]
    BrokenPiece { kind: PieceKind, at: Point },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsePointError {
    #[error("expected COL,ROW, got {0:?}")]
    MissingComma(String),

    #[error("invalid coordinate {0:?}")]
    BadNumber(String),
}
