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
use std::ops::{Index, IndexMut};
use thiserror::Error;

use super::material::{Piece, PieceCounts, PieceKind, Side};
use super::square::{Mask, Position, NUM_COLS, NUM_ROWS};

/// Contents of one intersection: `None` when empty.
pub type Square = Option<Piece>;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardError {
    #[error("Invalid board height: expecting 10 rows, found {0}")]
    InvalidHeight(usize),
    #[error("Invalid board width at row {row}: expecting 9 columns, found {columns}")]
    InvalidWidth { row: usize, columns: usize },
    #[error("Invalid square data at ({row}, {column}): a piece needs both a kind and a side")]
    InvalidSquareData { row: usize, column: usize },
    #[error("Invalid (row, column) ({row}, {column}): expecting row < 10 and column < 9")]
    OutOfBounds { row: usize, column: usize },
    #[error("No {0} on the board")]
    PieceNotFound(Piece),
}

impl BoardError {
    /// Wrong number of rows or columns, as opposed to bad contents.
    pub fn is_shape_error(&self) -> bool {
        matches!(self, Self::InvalidHeight(_) | Self::InvalidWidth { .. })
    }
}

/// Loosely-typed square contents, as supplied by a caller or a config file.
/// Either both fields are set or neither is.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SquareData {
    #[serde(default)]
    pub kind: Option<PieceKind>,
    #[serde(default)]
    pub side: Option<Side>,
}

impl SquareData {
    pub fn to_square(&self) -> Option<Square> {
        match (self.kind, self.side) {
            (Some(kind), Some(side)) => Some(Some(Piece::new(side, kind))),
            (None, None) => Some(None),
            _ => None,
        }
    }
}

impl From<Square> for SquareData {
    fn from(square: Square) -> Self {
        Self {
            kind: square.map(|piece| piece.kind()),
            side: square.map(|piece| piece.side()),
        }
    }
}

/// Checks that `rows` is exactly 10 rows of 9 squares and that every square
/// is either empty or names both a kind and a side. Reports the first
/// violation found, scanning row-major.
pub fn validate_board_content(rows: &[Vec<SquareData>]) -> Result<()> {
    check_dimensions(rows)?;
    for (row, squares) in rows.iter().enumerate() {
        for (column, data) in squares.iter().enumerate() {
            if data.to_square().is_none() {
                return Err(BoardError::InvalidSquareData { row, column }.into());
            }
        }
    }
    Ok(())
}

fn check_dimensions<T>(rows: &[Vec<T>]) -> Result<()> {
    if rows.len() != NUM_ROWS {
        return Err(BoardError::InvalidHeight(rows.len()).into());
    }
    for (row, squares) in rows.iter().enumerate() {
        if squares.len() != NUM_COLS {
            return Err(BoardError::InvalidWidth {
                row,
                columns: squares.len(),
            }
            .into());
        }
    }
    Ok(())
}

/// A complete 10x9 board snapshot. Copies are deep and independent.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid([[Square; NUM_COLS]; NUM_ROWS]);

impl Default for Grid {
    fn default() -> Self {
        Self::empty()
    }
}

impl Grid {
    pub const fn empty() -> Self {
        Self([[None; NUM_COLS]; NUM_ROWS])
    }

    /// Builds a grid from caller rows, failing unless they are exactly 10x9.
    pub fn from_rows(rows: &[Vec<Square>]) -> Result<Self> {
        check_dimensions(rows)?;
        let mut grid = Self::empty();
        for (row, squares) in rows.iter().enumerate() {
            grid.0[row].copy_from_slice(squares);
        }
        Ok(grid)
    }

    /// Builds a grid from loosely-typed rows after `validate_board_content`.
    pub fn from_data(rows: &[Vec<SquareData>]) -> Result<Self> {
        validate_board_content(rows)?;
        let mut grid = Self::empty();
        for position in Position::iter() {
            // validated above, every square converts
            let data = rows[position.row()][position.column()];
            grid[position] = data.to_square().unwrap_or_default();
        }
        Ok(grid)
    }

    pub fn to_rows(&self) -> Vec<Vec<Square>> {
        self.0.iter().map(|row| row.to_vec()).collect()
    }

    pub fn to_data(&self) -> Vec<Vec<SquareData>> {
        self.0
            .iter()
            .map(|row| row.iter().map(|&square| square.into()).collect())
            .collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Square; NUM_COLS]> {
        self.0.iter()
    }

    /// Occupied positions with their pieces, row-major.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::iter().filter_map(move |position| self[position].map(|piece| (position, piece)))
    }

    #[inline]
    pub fn is_vacant(&self, position: Position) -> bool {
        self[position].is_none()
    }

    #[inline]
    pub fn is_occupied(&self, position: Position) -> bool {
        self[position].is_some()
    }

    pub fn occupied(&self) -> Mask {
        Mask::from_positions(self.pieces().map(|(position, _)| position))
    }

    pub fn occupied_by(&self, side: Side) -> Mask {
        Mask::from_positions(
            self.pieces()
                .filter(|(_, piece)| piece.side() == side)
                .map(|(position, _)| position),
        )
    }

    pub fn clear(&mut self) {
        *self = Self::empty();
    }

    /// Reverses the row order, turning the board around.
    pub fn flip(&mut self) {
        self.0.reverse();
    }

    pub fn piece_counts(&self) -> PieceCounts {
        let mut counts = PieceCounts::default();
        for (_, piece) in self.pieces() {
            counts.add(piece);
        }
        counts
    }

    /// First square, row-major, holding `piece`.
    pub fn locate(&self, piece: Piece) -> Result<Position> {
        self.pieces()
            .find(|&(_, found)| found == piece)
            .map(|(position, _)| position)
            .ok_or_else(|| BoardError::PieceNotFound(piece).into())
    }

    /// Red sits on top when the red general is in one of the first three rows.
    pub fn is_red_on_top(&self) -> Result<bool> {
        let general = self.locate(Piece::RG)?;
        Ok(general.row() <= 2)
    }

    pub fn top_side(&self) -> Result<Side> {
        Ok(if self.is_red_on_top()? {
            Side::Red
        } else {
            Side::Black
        })
    }
}

impl Index<Position> for Grid {
    type Output = Square;
    #[inline]
    fn index(&self, index: Position) -> &Self::Output {
        &self.0[index.row()][index.column()]
    }
}

impl IndexMut<Position> for Grid {
    #[inline]
    fn index_mut(&mut self, index: Position) -> &mut Self::Output {
        &mut self.0[index.row()][index.column()]
    }
}

impl AsRef<Grid> for Grid {
    fn as_ref(&self) -> &Grid {
        self
    }
}
