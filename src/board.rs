use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use crate::error::{ConfigError, ParseLayoutError};
use crate::grid::Grid;
use crate::piece::{footprint, Piece, PieceKind, Slot};
use crate::point::{Direction, Point};
use crate::state::StateKey;
use crate::{BOARD_HEIGHT, BOARD_WIDTH, PIECE_COUNT};

const EMPTY_GLYPH: char = '.';

/// The live placement of all ten pieces.
///
/// This is what a front end keeps in sync with whatever the player sees: it
/// can read and write each slot and ask whether a single-cell drag is legal.
/// Two boards compare equal when they describe the same physical layout, no
/// matter which tall or small piece sits where.
#[derive(Clone, Debug)]
pub struct Board {
    positions: [Point; PIECE_COUNT],
}

impl Board {
    /// The usual starting layout, sun top-centre:
    ///
    /// ```text
    /// TSST
    /// TSST
    /// .WW.
    /// TssT
    /// TssT
    /// ```
    pub fn standard() -> Self {
        Board {
            positions: [
                Point::new(1, 0),
                Point::new(1, 2),
                Point::new(0, 0),
                Point::new(3, 0),
                Point::new(0, 3),
                Point::new(3, 3),
                Point::new(1, 3),
                Point::new(1, 4),
                Point::new(2, 3),
                Point::new(2, 4),
            ],
        }
    }

    /// Builds a board from a list of pieces. Sun and wide identities are
    /// ignored; tall and small identities must be distinct and in `1..=4`.
    pub fn from_pieces(pieces: &[Piece]) -> Result<Self, ConfigError> {
        if pieces.len() != PIECE_COUNT {
            return Err(ConfigError::PieceCount {
                expected: PIECE_COUNT,
                found: pieces.len(),
            });
        }
        for kind in PieceKind::ALL {
            let found = pieces.iter().filter(|p| p.kind() == kind).count();
            if found != kind.count() {
                return Err(ConfigError::KindCount {
                    kind,
                    expected: kind.count(),
                    found,
                });
            }
        }

        let mut positions = [Point::default(); PIECE_COUNT];
        let mut filled = [false; PIECE_COUNT];
        for piece in pieces {
            let slot = piece.slot().ok_or(ConfigError::IdentityOutOfRange {
                kind: piece.kind(),
                identity: piece.identity(),
                max: piece.kind().count(),
            })?;
            if std::mem::replace(&mut filled[slot.index()], true) {
                return Err(ConfigError::DuplicateIdentity {
                    kind: piece.kind(),
                    identity: piece.identity(),
                });
            }
            positions[slot.index()] = piece.origin();
        }

        Self::from_positions(positions)
    }

    /// Builds a board from reference cells indexed by [`Slot`].
    pub fn from_positions(positions: [Point; PIECE_COUNT]) -> Result<Self, ConfigError> {
        let board = Board { positions };
        board.validate()?;
        Ok(board)
    }

    /// Unpacks a key produced by the codec. Keys only ever come from valid
    /// boards, so this cannot fail.
    pub fn from_key(key: StateKey) -> Self {
        Board {
            positions: key.positions(),
        }
    }

    /// Checks that every piece is on the board and no two pieces overlap.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut grid = Grid::new();
        for slot in Slot::ALL {
            let kind = slot.kind();
            let origin = self.positions[slot.index()];
            let cells = footprint(kind, origin, Direction::Stay);
            if !cells.iter().all(|c| c.in_bounds()) {
                return Err(ConfigError::OutOfBounds { kind, origin });
            }
            if let Some(&cell) = cells.iter().find(|&&c| grid.is_occupied(c)) {
                return Err(ConfigError::Overlap { cell });
            }
            grid.occupy(&cells);
        }
        Ok(())
    }

    #[inline]
    pub fn position(&self, slot: Slot) -> Point {
        self.positions[slot.index()]
    }

    /// Moves a slot's reference cell without checking for collisions, as a
    /// front end does when it syncs a dropped sprite. Placements that leave
    /// the board are refused.
    pub fn set_position(&mut self, slot: Slot, origin: Point) -> Result<(), ConfigError> {
        let kind = slot.kind();
        if !footprint(kind, origin, Direction::Stay)
            .iter()
            .all(|c| c.in_bounds())
        {
            return Err(ConfigError::OutOfBounds { kind, origin });
        }
        self.positions[slot.index()] = origin;
        Ok(())
    }

    pub fn positions(&self) -> &[Point; PIECE_COUNT] {
        &self.positions
    }

    pub fn sun(&self) -> Point {
        self.position(Slot::Sun)
    }

    pub fn pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        Slot::ALL
            .into_iter()
            .map(|slot| Piece::new(slot.kind(), slot.identity(), self.position(slot)))
    }

    pub fn key(&self) -> StateKey {
        StateKey::encode(&self.positions)
    }

    /// The slot whose reference (top-left) cell is `origin`.
    pub fn piece_at(&self, origin: Point) -> Option<Slot> {
        Slot::ALL
            .into_iter()
            .find(|&slot| self.position(slot) == origin)
    }

    /// Whether the piece whose reference cell is `from` can slide one cell
    /// toward `to`. Only straight moves count; an unknown `from`, a diagonal
    /// or `to == from` all answer `false`.
    pub fn is_single_step_legal(&self, from: Point, to: Point) -> bool {
        self.legal_step(from, to).is_some()
    }

    /// Slides the piece at `from` one cell toward `to` if that is legal.
    /// Returns whether the board changed.
    pub fn apply_step(&mut self, from: Point, to: Point) -> bool {
        match self.legal_step(from, to) {
            Some((slot, direction)) => {
                self.positions[slot.index()] = from.step(direction);
                true
            }
            None => false,
        }
    }

    fn legal_step(&self, from: Point, to: Point) -> Option<(Slot, Direction)> {
        let slot = self.piece_at(from)?;
        let direction = Direction::toward(from, to)?;
        let kind = slot.kind();

        let mut grid = Grid::new();
        grid.load(&self.positions);
        // The piece may slide into cells it is leaving.
        grid.vacate(&footprint(kind, from, Direction::Stay));
        grid.is_valid(&footprint(kind, from, direction))
            .then_some((slot, direction))
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Board {}

impl Default for Board {
    fn default() -> Self {
        Board::standard()
    }
}

/// Five lines of four glyphs: `S` sun, `W` wide, `T` tall, `s` small and
/// `.` for a free cell.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut glyphs = [[EMPTY_GLYPH; BOARD_WIDTH]; BOARD_HEIGHT];
        for piece in self.pieces() {
            for cell in piece.footprint(Direction::Stay) {
                glyphs[cell.row as usize][cell.col as usize] = piece.kind().symbol();
            }
        }
        for row in &glyphs {
            for &glyph in row {
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Parses the [`Display`](fmt::Display) format. Blank lines and lines
/// starting with `#` are skipped, a space also means a free cell, and short
/// rows are padded with free cells. A row with no pieces must be spelled
/// with dots.
impl FromStr for Board {
    type Err = ParseLayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: SmallVec<[&str; BOARD_HEIGHT]> = s
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| {
                let trimmed = line.trim();
                !trimmed.is_empty() && !trimmed.starts_with('#')
            })
            .collect();
        if rows.len() != BOARD_HEIGHT {
            return Err(ParseLayoutError::RowCount { found: rows.len() });
        }

        let mut glyphs = [[EMPTY_GLYPH; BOARD_WIDTH]; BOARD_HEIGHT];
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found > BOARD_WIDTH {
                return Err(ParseLayoutError::RowTooLong { row, found });
            }
            for (col, glyph) in line.chars().enumerate() {
                glyphs[row][col] = glyph;
            }
        }

        let mut claimed = [[false; BOARD_WIDTH]; BOARD_HEIGHT];
        let mut identities = [0u8; 4];
        let mut pieces: SmallVec<[Piece; PIECE_COUNT]> = SmallVec::new();

        // Row-major scan meets every piece at its top-left cell first.
        for row in 0..BOARD_HEIGHT {
            for col in 0..BOARD_WIDTH {
                let glyph = glyphs[row][col];
                if claimed[row][col] || glyph == EMPTY_GLYPH || glyph == ' ' {
                    continue;
                }
                let at = Point::new(col as i8, row as i8);
                let kind = PieceKind::from_symbol(glyph)
                    .ok_or(ParseLayoutError::UnknownGlyph { glyph, at })?;

                let cells = footprint(kind, at, Direction::Stay);
                let intact = cells.iter().all(|c| {
                    c.in_bounds()
                        && !claimed[c.row as usize][c.col as usize]
                        && glyphs[c.row as usize][c.col as usize] == glyph
                });
                if !intact {
                    return Err(ParseLayoutError::BrokenPiece { kind, at });
                }
                for c in &cells {
                    claimed[c.row as usize][c.col as usize] = true;
                }

                let identity = &mut identities[kind as usize];
                *identity = identity.saturating_add(1);
                pieces.push(Piece::new(kind, *identity, at));
            }
        }

        Board::from_pieces(&pieces).map_err(ParseLayoutError::from)
    }
}
