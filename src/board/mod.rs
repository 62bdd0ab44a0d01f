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

//! Xiangqi board state and move generation
//!
//! A _board_ holds the 10-by-9 grid of a Xiangqi (Chinese Chess)
//! game and answers two questions: where may the piece on a given
//! intersection move, and what does the board look like after a move.
//! The following features are supported:
//!
//! [x] Move rules for all seven pieces (palace, river, elephant eye,
//!     horse leg, cannon screen)
//! [x] Either side on top, derived from where the red general stands
//! [x] Rank notation in and out, `dd-dd` move strings
//! [x] Free placement ("void pieces") mode
//! [ ] Check, checkmate and the flying-general rule
//! [ ] Repetition and perpetual-check rules
//! [ ] Move history and take backs
//!
//! Some of the key abstractions include:
//!
//! * A `Position` is the (row, column) of one intersection. Row 0 is
//!   the top of the board and column 0 the left. Positions can only be
//!   built inside the board; `Position::new` reports anything else as
//!   `BoardError::OutOfBounds`. Adding an `Offset` or a `Direction` to a
//!   position yields `None` when it would leave the board.
//!
//! * A `Mask` is a 90-bit set of positions held in a `u128`. Masks are
//!   handy for answering "is this a destination?" in constant time and
//!   combine with `|`, `|=`, `&` and `!`.
//!
//! * A `Piece` is a `PieceKind` of a specific `Side`. An empty
//!   intersection is `None`, so a `Square` (`Option<Piece>`) never has
//!   a kind without a side.
//!
//! * A `Grid` is a complete snapshot of the 90 squares. It is `Copy`,
//!   so every snapshot handed out is independent of the board it came
//!   from. The side on top is never stored: it is read from the row of
//!   the red general, and fails with `BoardError::PieceNotFound` when
//!   there is none.
//!
//! * Move generation is a set of plain functions, one per kind,
//!   selected by `rule_for`. `valid_moves` looks up the piece and
//!   dispatches. The rules apply capture rules only; nothing stops a
//!   move that leaves the mover's general exposed.
//!
//! * `Board` owns a grid plus the void-pieces flag. `apply_move`
//!   checks only that the origin holds a piece and that the destination
//!   is free (or that void pieces are on); callers are expected to
//!   pick destinations from `valid_moves` first.
//!

use anyhow::Result;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

mod config;
mod grid;
mod layout;
mod material;
mod moves;
mod notation;
mod square;

pub use config::*;
pub use grid::*;
pub use layout::*;
pub use material::*;
pub use moves::*;
pub use notation::*;
pub use square::*;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash, Default)]
pub struct Board {
    grid: Grid,
    void_pieces: bool,
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn starting(red_on_bottom: bool) -> Self {
        Self::from_grid(starting_grid(red_on_bottom))
    }

    pub fn from_grid(grid: Grid) -> Self {
        Self {
            grid,
            void_pieces: false,
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self> {
        Ok(Self::from_grid(parse_fen(fen)?))
    }

    /// Builds a board from validated configuration.
    pub fn from_config(config: &BoardConfig) -> Result<Self> {
        let grid = config.content.to_grid(config.red_on_bottom)?;
        debug!(
            "board configured: {} (void pieces {})",
            grid, config.void_pieces
        );
        Ok(Self {
            grid,
            void_pieces: config.void_pieces,
        })
    }

    #[inline]
    pub fn void_pieces(&self) -> bool {
        self.void_pieces
    }

    pub fn set_void_pieces(&mut self, void_pieces: bool) {
        self.void_pieces = void_pieces;
    }

    pub fn square_at(&self, row: usize, column: usize) -> Result<Square> {
        Ok(self.grid[Position::new(row, column)?])
    }

    /// An independent copy of the current grid.
    #[inline]
    pub fn snapshot(&self) -> Grid {
        self.grid
    }

    /// Replaces every square; the board is untouched if `rows` is not 10x9.
    pub fn replace(&mut self, rows: &[Vec<Square>]) -> Result<()> {
        self.grid = Grid::from_rows(rows)?;
        debug!("board replaced: {}", self.grid);
        Ok(())
    }

    /// Moves the piece on `mv.from` to `mv.to`. Returns false and leaves the
    /// board unchanged when the origin is empty, or when the destination is
    /// occupied and void pieces are off. Piece geometry is not checked.
    pub fn apply_move(&mut self, mv: Move) -> bool {
        let Some(piece) = self.grid[mv.from] else {
            debug!("move {} rejected: nothing to move", mv);
            return false;
        };
        if self.grid.is_occupied(mv.to) && !self.void_pieces {
            debug!("move {} rejected: destination occupied", mv);
            return false;
        }
        self.grid[mv.from] = None;
        self.grid[mv.to] = Some(piece);
        true
    }

    /// Parses a `dd-dd` move string and applies it.
    pub fn submit_move(&mut self, s: &str) -> Result<bool> {
        let mv = parse_move(s)?;
        Ok(self.apply_move(mv))
    }

    pub fn place(&mut self, row: usize, column: usize, kind: PieceKind, side: Side) -> Result<()> {
        self.grid[Position::new(row, column)?] = Some(Piece::new(side, kind));
        Ok(())
    }

    pub fn remove(&mut self, row: usize, column: usize) -> Result<()> {
        self.grid[Position::new(row, column)?] = None;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.grid.clear();
    }

    pub fn set_starting_layout(&mut self, red_on_bottom: bool) {
        self.grid = starting_grid(red_on_bottom);
    }

    pub fn piece_counts(&self) -> PieceCounts {
        self.grid.piece_counts()
    }

    pub fn locate(&self, kind: PieceKind, side: Side) -> Result<Position> {
        self.grid.locate(Piece::new(side, kind))
    }

    pub fn is_red_on_top(&self) -> Result<bool> {
        self.grid.is_red_on_top()
    }

    /// Turns the board around so the side on top moves to the bottom.
    pub fn flip(&mut self) {
        self.grid.flip();
    }

    pub fn valid_moves(&self, row: usize, column: usize) -> Result<Vec<Position>> {
        self.valid_moves_from(Position::new(row, column)?)
    }

    pub fn destinations(&self, row: usize, column: usize) -> Result<Mask> {
        self.destination_mask(Position::new(row, column)?)
    }

    pub fn fen(&self) -> String {
        to_fen(&self.grid)
    }
}

impl AsRef<Grid> for Board {
    fn as_ref(&self) -> &Grid {
        &self.grid
    }
}

impl ValidMoves for Board {}

impl Index<Position> for Board {
    type Output = Square;
    #[inline]
    fn index(&self, index: Position) -> &Self::Output {
        &self.grid[index]
    }
}

/// One line per row, top first, `.` for an empty intersection.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for squares in self.grid.rows() {
            let line: String = squares
                .iter()
                .map(|square| square.map_or('.', |piece| piece.to_char()))
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
