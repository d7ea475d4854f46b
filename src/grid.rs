use crate::piece::{footprint, Slot};
use crate::point::{Direction, Point};
use crate::{BOARD_HEIGHT, BOARD_WIDTH, PIECE_COUNT};

/// Occupancy of the 4x5 board, row-major. Rebuilt from a configuration before
/// each use; it carries no identity of its own.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Grid {
    cells: [[bool; BOARD_WIDTH]; BOARD_HEIGHT],
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.cells = [[false; BOARD_WIDTH]; BOARD_HEIGHT];
    }

    /// Marks `cells` as taken. Cells must be on the board.
    #[inline(always)]
    pub fn occupy(&mut self, cells: &[Point]) {
        for p in cells {
            self.cells[p.row as usize][p.col as usize] = true;
        }
    }

    /// Marks `cells` as free. Cells must be on the board.
    #[inline(always)]
    pub fn vacate(&mut self, cells: &[Point]) {
        for p in cells {
            self.cells[p.row as usize][p.col as usize] = false;
        }
    }

    /// True only when every cell is on the board and free.
    #[inline(always)]
    pub fn is_valid(&self, cells: &[Point]) -> bool {
        cells
            .iter()
            .all(|&p| p.in_bounds() && !self.cells[p.row as usize][p.col as usize])
    }

    /// Off-board cells count as occupied.
    pub fn is_occupied(&self, p: Point) -> bool {
        !p.in_bounds() || self.cells[p.row as usize][p.col as usize]
    }

    /// Clears the grid and occupies the footprint of every piece in a full
    /// configuration indexed by [`Slot`].
    pub fn load(&mut self, positions: &[Point; PIECE_COUNT]) {
        self.reset();
        for slot in Slot::ALL {
            self.occupy(&footprint(slot.kind(), positions[slot.index()], Direction::Stay));
        }
    }

    #[cfg(test)]
    fn free_cells(&self) -> usize {
        self.cells.iter().flatten().filter(|&&taken| !taken).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_grid_accepts_in_range_cells() {
        let grid = Grid::new();
        assert!(grid.is_valid(&[Point::new(0, 0), Point::new(3, 4)]));
        assert_eq!(grid.free_cells(), BOARD_WIDTH * BOARD_HEIGHT);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let grid = Grid::new();
        for p in [
            Point::new(-1, 0),
            Point::new(4, 0),
            Point::new(0, -1),
            Point::new(0, 5),
        ] {
            assert!(!grid.is_valid(&[Point::new(1, 1), p]), "{p} accepted");
            assert!(grid.is_occupied(p));
        }
    }

    #[test]
    fn test_occupy_and_vacate() {
        let mut grid = Grid::new();
        let cells = [Point::new(1, 1), Point::new(2, 1)];
        grid.occupy(&cells);
        assert!(!grid.is_valid(&cells[..1]));
        assert!(!grid.is_valid(&[Point::new(2, 1), Point::new(3, 1)]));
        assert!(grid.is_valid(&[Point::new(3, 1)]));

        grid.vacate(&cells);
        assert!(grid.is_valid(&cells));

        grid.occupy(&cells);
        grid.reset();
        assert!(grid.is_valid(&cells));
    }

    #[test]
    fn test_load_standard_layout() {
        let mut grid = Grid::new();
        grid.load(crate::Board::standard().positions());
        // 20 cells, 18 of them covered.
        assert_eq!(grid.free_cells(), 2);
        assert!(!grid.is_occupied(Point::new(0, 2)));
        assert!(!grid.is_occupied(Point::new(3, 2)));
        assert!(grid.is_occupied(Point::new(1, 0)));
    }
}
