//! Canonical 60-bit packing of a full board configuration.
//!
//! Each of the ten [`Slot`]s takes six bits (three for the column, three for
//! the row). The sun sits in the highest field and `Small4` in the lowest.
//! The four tall and the four small positions are always stored sorted by
//! (column, row), so any relabelling of those interchangeable pieces packs to
//! the same key.

use std::fmt;

use smallvec::SmallVec;

use crate::piece::{PieceKind, Slot};
use crate::point::{Direction, Point};
use crate::PIECE_COUNT;

const FIELD_BITS: u32 = 6;
const FIELD_MASK: u64 = (1 << FIELD_BITS) - 1;

#[inline(always)]
const fn shift(index: usize) -> u32 {
    FIELD_BITS * (PIECE_COUNT - 1 - index) as u32
}

#[inline(always)]
fn read_field(raw: u64, index: usize) -> Point {
    Point::unpack((raw >> shift(index)) & FIELD_MASK)
}

#[inline(always)]
fn write_field(raw: u64, index: usize, p: Point) -> u64 {
    (raw & !(FIELD_MASK << shift(index))) | (p.pack() << shift(index))
}

/// Rewrites a four-slot group in ascending order. Sun and wide are
/// single-slot groups and are left alone.
#[inline]
fn sort_group(raw: u64, kind: PieceKind) -> u64 {
    let slots = kind.slots();
    if slots.len() < 2 {
        return raw;
    }
    let mut group = [Point::default(); 4];
    for (dst, index) in group.iter_mut().zip(slots.clone()) {
        *dst = read_field(raw, index);
    }
    group.sort_unstable();
    group
        .iter()
        .zip(slots)
        .fold(raw, |acc, (&p, index)| write_field(acc, index, p))
}

/// A canonical board configuration.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct StateKey(u64);

impl StateKey {
    /// Packs positions indexed by [`Slot`]. Positions must be on the board.
    pub fn encode(positions: &[Point; PIECE_COUNT]) -> Self {
        let raw = positions
            .iter()
            .enumerate()
            .fold(0, |acc, (index, &p)| write_field(acc, index, p));
        let raw = sort_group(raw, PieceKind::Tall);
        StateKey(sort_group(raw, PieceKind::Small))
    }

    #[inline(always)]
    pub const fn raw(self) -> u64 {
        self.0
    }

    #[inline(always)]
    pub fn decode(self, slot: Slot) -> Point {
        read_field(self.0, slot.index())
    }

    #[inline(always)]
    pub fn sun(self) -> Point {
        self.decode(Slot::Sun)
    }

    pub fn positions(self) -> [Point; PIECE_COUNT] {
        let mut out = [Point::default(); PIECE_COUNT];
        for (index, p) in out.iter_mut().enumerate() {
            *p = read_field(self.0, index);
        }
        out
    }

    /// Moves one slot to `p` and restores the sorted order of its group. The
    /// moved piece may end up under a different slot of the same kind.
    #[inline]
    pub fn with_slot(self, slot: Slot, p: Point) -> Self {
        let raw = write_field(self.0, slot.index(), p);
        StateKey(sort_group(raw, slot.kind()))
    }

    /// Describes the single-cell move that turns `self` into `next`, or
    /// `None` if the two keys are not one move apart.
    pub fn step_to(self, next: StateKey) -> Option<Step> {
        let before = self.positions();
        let after = next.positions();
        let mut found = None;

        for kind in PieceKind::ALL {
            let slots = kind.slots();
            let old = &before[slots.clone()];
            let new = &after[slots];
            let left: SmallVec<[Point; 4]> =
                old.iter().copied().filter(|p| !new.contains(p)).collect();
            let arrived: SmallVec<[Point; 4]> =
                new.iter().copied().filter(|p| !old.contains(p)).collect();
            match (left.as_slice(), arrived.as_slice()) {
                ([], []) => {}
                (&[from], &[to]) if found.is_none() => {
                    let direction = Direction::toward(from, to)?;
                    if from.step(direction) != to {
                        return None;
                    }
                    found = Some(Step {
                        kind,
                        from,
                        to,
                        direction,
                    });
                }
                _ => return None,
            }
        }

        found
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#017x}", self.0)
    }
}

/// One piece sliding one cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Step {
    pub kind: PieceKind,
    pub from: Point,
    pub to: Point,
    pub direction: Direction,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} -> {}", self.kind, self.direction, self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard() -> [Point; PIECE_COUNT] {
        *crate::Board::standard().positions()
    }

    #[test]
    fn test_layout_of_fields() {
        let key = StateKey::encode(&standard());
        // Sun (1,0) lands in bits 54..60.
        assert_eq!(key.raw() >> 54, Point::new(1, 0).pack());
        assert_eq!(key.raw() >> 60, 0);
        assert_eq!(key.decode(Slot::Wide), Point::new(1, 2));
    }

    #[test]
    fn test_groups_are_sorted() {
        let mut positions = standard();
        positions.swap(Slot::Tall1.index(), Slot::Tall4.index());
        positions.swap(Slot::Small2.index(), Slot::Small3.index());
        let key = StateKey::encode(&positions);

        let decoded = key.positions();
        assert!(decoded[2..6].windows(2).all(|w| w[0] < w[1]));
        assert!(decoded[6..10].windows(2).all(|w| w[0] < w[1]));
        assert_eq!(key, StateKey::encode(&standard()));
    }

    #[test]
    fn test_with_slot_resorts_group() {
        let key = StateKey::encode(&standard());
        // Small1 holds (1,3); moved to (3,2) it sorts to the end of the group.
        let moved = key.with_slot(Slot::Small1, Point::new(3, 2));
        assert_eq!(moved.decode(Slot::Small4), Point::new(3, 2));
        assert_eq!(moved.decode(Slot::Small1), Point::new(1, 4));

        let mut positions = standard();
        positions[Slot::Small1.index()] = Point::new(3, 2);
        assert_eq!(moved, StateKey::encode(&positions));
    }

    #[test]
    fn test_with_slot_sun_has_no_group() {
        let key = StateKey::encode(&standard());
        let moved = key.with_slot(Slot::Sun, Point::new(1, 1));
        assert_eq!(moved.sun(), Point::new(1, 1));
        assert_eq!(moved.positions()[1..], key.positions()[1..]);
    }

    #[test]
    fn test_step_to() {
        let key = StateKey::encode(&standard());
        let next = key.with_slot(Slot::Wide, Point::new(0, 2));
        assert_eq!(
            key.step_to(next),
            Some(Step {
                kind: PieceKind::Wide,
                from: Point::new(1, 2),
                to: Point::new(0, 2),
                direction: Direction::Left,
            })
        );

        let tall = key.with_slot(Slot::Tall2, Point::new(0, 2));
        let step = key.step_to(tall).expect("one move apart");
        assert_eq!(step.kind, PieceKind::Tall);
        assert_eq!(step.direction, Direction::Up);

        assert_eq!(key.step_to(key), None);
        let two_moves = next.with_slot(Slot::Tall2, Point::new(0, 2));
        assert_eq!(key.step_to(two_moves), None);
        let jump = key.with_slot(Slot::Sun, Point::new(1, 2));
        assert_eq!(key.step_to(jump), None);
    }
}
