// Copyright 2023 Tobin Edwards
//
//    Licensed under the Apache License, Version 2.0 (the "License");
//    you may not use this file except in compliance with the License.
//    You may obtain a copy of the License at
//
//        http://www.apache.org/licenses/LICENSE-2.0
//
//    Unless required by applicable law or agreed to in writing, software
//    distributed under the License is distributed on an "AS IS" BASIS,
//    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//    See the License for the specific language governing permissions and
//    limitations under the License.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, BitAnd, BitOr, BitOrAssign, Not};
use strum_macros::EnumIter;

use super::grid::BoardError;

pub const NUM_ROWS: usize = 10;
pub const NUM_COLS: usize = 9;
pub const NUM_SQUARES: usize = NUM_ROWS * NUM_COLS;

/// Last row of the top half; the river runs between this row and the next.
pub const RIVER_TOP: usize = 4;

/// Coordinates of a single intersection. Row 0 is the top of the board.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    row: usize,
    column: usize,
}

impl Position {
    /// Fails with `BoardError::OutOfBounds` unless `row < 10` and `column < 9`.
    pub fn new(row: usize, column: usize) -> Result<Self> {
        Self::try_new(row, column)
            .ok_or_else(|| BoardError::OutOfBounds { row, column }.into())
    }

    #[inline]
    pub const fn try_new(row: usize, column: usize) -> Option<Self> {
        if row < NUM_ROWS && column < NUM_COLS {
            Some(Self { row, column })
        } else {
            None
        }
    }

    #[inline]
    pub const fn from_index(index: usize) -> Self {
        debug_assert!(index < NUM_SQUARES);
        Self {
            row: index / NUM_COLS,
            column: index % NUM_COLS,
        }
    }

    #[inline]
    pub const fn to_index(&self) -> usize {
        self.row * NUM_COLS + self.column
    }
    #[inline]
    pub const fn to_mask(&self) -> Mask {
        Mask::new(0x1 << (127 - self.to_index()))
    }
    #[inline]
    pub const fn row(&self) -> usize {
        self.row
    }
    #[inline]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// All 90 positions in row-major order.
    pub fn iter() -> impl Iterator<Item = Self> {
        (0..NUM_SQUARES).map(Self::from_index)
    }

    /// The same intersection seen from the other end of the board.
    #[inline]
    pub const fn mirrored(&self) -> Self {
        Self {
            row: NUM_ROWS - 1 - self.row,
            column: self.column,
        }
    }

    pub fn in_top_half(&self) -> bool {
        self.row <= RIVER_TOP
    }

    pub fn in_palace(&self) -> bool {
        (3..=5).contains(&self.column) && (self.row <= 2 || self.row > NUM_ROWS - 4)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// A displacement in rows and columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Offset {
    pub rows: isize,
    pub columns: isize,
}

impl Offset {
    pub const fn new(rows: isize, columns: isize) -> Self {
        Self { rows, columns }
    }

    pub const fn scale(self, factor: isize) -> Self {
        Self::new(self.rows * factor, self.columns * factor)
    }
}

impl Add<Offset> for Position {
    type Output = Option<Position>;
    fn add(self, rhs: Offset) -> Self::Output {
        let row = self.row.checked_add_signed(rhs.rows)?;
        let column = self.column.checked_add_signed(rhs.columns)?;
        Position::try_new(row, column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Direction {
    UpLeft,
    Up,
    UpRight,
    Left,
    Right,
    DownLeft,
    Down,
    DownRight,
}

use Direction::{Down, DownLeft, DownRight, Left, Right, Up, UpLeft, UpRight};

impl Direction {
    #[inline]
    pub fn is_orthogonal(&self) -> bool {
        matches!(*self, Up | Left | Right | Down)
    }
    #[inline]
    pub fn is_diagonal(&self) -> bool {
        matches!(*self, UpLeft | UpRight | DownLeft | DownRight)
    }
    /// Down the board first, then up, right, left.
    pub fn orthogonals() -> impl Iterator<Item = Self> {
        [Down, Up, Right, Left].into_iter()
    }
    pub fn diagonals() -> impl Iterator<Item = Self> {
        [DownRight, UpLeft, DownLeft, UpRight].into_iter()
    }
}

impl From<Direction> for Offset {
    fn from(value: Direction) -> Self {
        match value {
            UpLeft => Self::new(-1, -1),
            Up => Self::new(-1, 0),
            UpRight => Self::new(-1, 1),
            Left => Self::new(0, -1),
            Right => Self::new(0, 1),
            DownLeft => Self::new(1, -1),
            Down => Self::new(1, 0),
            DownRight => Self::new(1, 1),
        }
    }
}

impl Add<Direction> for Position {
    type Output = Option<Position>;
    fn add(self, rhs: Direction) -> Self::Output {
        let offset: Offset = rhs.into();
        self + offset
    }
}

/// A set of positions, one bit per intersection (the top 90 bits of a u128).
#[derive(Clone, Serialize, Deserialize, Copy, PartialEq, Eq, Hash, Default)]
pub struct Mask(u128);

impl Mask {
    const BOARD: u128 = !0 << (128 - NUM_SQUARES);

    #[inline]
    pub const fn new(val: u128) -> Self {
        Self(val & Self::BOARD)
    }

    #[inline]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[inline]
    pub const fn all() -> Self {
        Self(Self::BOARD)
    }

    pub fn from_positions<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = Position>,
    {
        positions
            .into_iter()
            .map(|position| position.to_mask())
            .reduce(|m1, m2| m1 | m2)
            .unwrap_or_default()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub const fn contains(&self, position: Position) -> bool {
        (self.0 & position.to_mask().0) != 0
    }

    #[inline]
    pub fn set(&mut self, position: Position) {
        self.0 |= position.to_mask().0;
    }

    #[inline]
    pub fn reset(&mut self, position: Position) {
        self.0 &= !position.to_mask().0;
    }

    pub fn iter(&self) -> MaskIter {
        MaskIter(self.0)
    }
}

impl fmt::Debug for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..NUM_ROWS {
            for column in 0..NUM_COLS {
                let position = Position { row, column };
                write!(f, "{}", if self.contains(position) { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Not for Mask {
    type Output = Self;
    fn not(self) -> Self::Output {
        Self(!self.0 & Self::BOARD)
    }
}

impl BitOr for Mask {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Mask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Mask {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

/// Yields positions in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaskIter(u128);

impl Iterator for MaskIter {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 != 0 {
            let position = Position::from_index(self.0.leading_zeros() as usize);
            self.0 &= !position.to_mask().0;
            return Some(position);
        }
        None
    }
}

impl DoubleEndedIterator for MaskIter {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.0 != 0 {
            let position = Position::from_index(127 - self.0.trailing_zeros() as usize);
            self.0 &= !position.to_mask().0;
            return Some(position);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn pos(row: usize, column: usize) -> Position {
        Position::new(row, column).unwrap()
    }

    #[test]
    fn test_position_bounds() {
        assert!(Position::new(9, 8).is_ok());
        assert!(Position::new(10, 0).is_err());
        assert!(Position::new(0, 9).is_err());
    }
    #[test]
    fn test_out_of_bounds_error() {
        let err = Position::new(12, 3).unwrap_err();
        match err.downcast_ref::<BoardError>() {
            Some(BoardError::OutOfBounds { row, column }) => {
                assert_eq!((*row, *column), (12, 3));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
    #[test]
    fn test_index_is_row_major() {
        assert_eq!(pos(0, 0).to_index(), 0);
        assert_eq!(pos(1, 0).to_index(), 9);
        assert_eq!(pos(9, 8).to_index(), 89);
        for position in Position::iter() {
            assert_eq!(Position::from_index(position.to_index()), position);
        }
    }
    #[test]
    fn test_add_offset_stays_on_board() {
        assert_eq!(pos(0, 0) + Up, None);
        assert_eq!(pos(0, 0) + Left, None);
        assert_eq!(pos(9, 8) + Down, None);
        assert_eq!(pos(9, 8) + Right, None);
        assert_eq!(pos(4, 4) + Down, Some(pos(5, 4)));
        assert_eq!(pos(4, 4) + Offset::new(-2, 1), Some(pos(2, 5)));
    }
    #[test]
    fn test_no_wraparound_between_rows() {
        // column 8 + 1 must not spill into the next row
        assert_eq!(pos(3, 8) + Right, None);
        assert_eq!(pos(3, 0) + Left, None);
    }
    #[test]
    fn test_directions() {
        assert_eq!(Direction::iter().filter(|d| d.is_orthogonal()).count(), 4);
        assert_eq!(Direction::iter().filter(|d| d.is_diagonal()).count(), 4);
        assert!(Direction::orthogonals().all(|d| d.is_orthogonal()));
        assert!(Direction::diagonals().all(|d| d.is_diagonal()));
    }
    #[test]
    fn test_palace() {
        assert!(pos(0, 3).in_palace());
        assert!(pos(2, 5).in_palace());
        assert!(pos(7, 4).in_palace());
        assert!(pos(9, 5).in_palace());
        assert!(!pos(3, 4).in_palace());
        assert!(!pos(6, 4).in_palace());
        assert!(!pos(0, 2).in_palace());
        assert!(!pos(9, 6).in_palace());
    }
    #[test]
    fn test_mirrored() {
        assert_eq!(pos(0, 4).mirrored(), pos(9, 4));
        assert_eq!(pos(3, 2).mirrored(), pos(6, 2));
    }
    #[test]
    fn test_mask_iter_is_row_major() {
        let mask = Mask::from_positions([pos(9, 8), pos(0, 1), pos(4, 4)]);
        assert_eq!(mask.len(), 3);
        let forward: Vec<_> = mask.iter().collect();
        assert_eq!(forward, vec![pos(0, 1), pos(4, 4), pos(9, 8)]);
        let backward: Vec<_> = mask.iter().rev().collect();
        assert_eq!(backward, vec![pos(9, 8), pos(4, 4), pos(0, 1)]);
    }
    #[test]
    fn test_mask_all_and_not() {
        assert_eq!(Mask::all().len(), NUM_SQUARES);
        assert!((!Mask::all()).is_empty());
        let mut mask = Mask::empty();
        mask.set(pos(5, 5));
        assert!(mask.contains(pos(5, 5)));
        assert_eq!((!mask).len(), NUM_SQUARES - 1);
        mask.reset(pos(5, 5));
        assert!(mask.is_empty());
    }
    #[test]
    fn test_mask_set_operations() {
        let top = Mask::from_positions([pos(0, 0), pos(0, 1)]);
        let mut left = pos(0, 0).to_mask();
        left |= pos(9, 0).to_mask();
        assert_eq!((top & left).iter().collect::<Vec<_>>(), vec![pos(0, 0)]);
        assert_eq!((top | left).len(), 3);
        assert!((top & !top).is_empty());
    }
}
