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
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::grid::Grid;
use super::material::Piece;
use super::moves::Move;
use super::square::{Position, NUM_COLS, NUM_ROWS};

const RANK_DELIMITER: char = '/';
const MOVE_DELIMITER: char = '-';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("Invalid board notation: {0}")]
    InvalidFormat(String),
    #[error("Invalid board notation: no piece for letter '{0}'")]
    UnmappedLetter(char),
    #[error("Invalid move string \"{0}\": expecting five characters shaped like 12-34")]
    InvalidMoveString(String),
}
use NotationError::*;

/// Parse rank notation into a grid. Ranks run top to bottom, separated by
/// `/`; a digit is a run of empty squares and a letter is a piece,
/// uppercase for red.
pub fn parse_fen(fen: &str) -> Result<Grid> {
    let ranks: Vec<&str> = fen.split(RANK_DELIMITER).collect();
    if ranks.len() != NUM_ROWS {
        return Err(InvalidFormat(format!(
            "expecting {} ranks, found {}",
            NUM_ROWS,
            ranks.len()
        ))
        .into());
    }
    let mut grid = Grid::empty();
    for (row, rank) in ranks.into_iter().enumerate() {
        let mut column = 0;
        let too_wide = || InvalidFormat(format!("rank {} is wider than 9", row + 1));
        for c in rank.chars() {
            match c.to_digit(10) {
                Some(0) => {
                    return Err(InvalidFormat(format!("zero-length run in rank {}", row + 1)).into())
                }
                Some(run) => column += run as usize,
                None if c.is_alphabetic() => {
                    let piece = Piece::from_char(c).ok_or(UnmappedLetter(c))?;
                    if column >= NUM_COLS {
                        return Err(too_wide().into());
                    }
                    grid[Position::new(row, column)?] = Some(piece);
                    column += 1;
                }
                None => {
                    return Err(InvalidFormat(format!("unexpected '{}' in rank {}", c, row + 1)).into())
                }
            }
            if column > NUM_COLS {
                return Err(too_wide().into());
            }
        }
        if column != NUM_COLS {
            return Err(InvalidFormat(format!(
                "rank {} covers {} columns, expecting 9",
                row + 1,
                column
            ))
            .into());
        }
    }
    Ok(grid)
}

/// Rank notation for `grid`, with no trailing delimiter.
pub fn to_fen(grid: &Grid) -> String {
    let mut fen = String::new();
    for (row, squares) in grid.rows().enumerate() {
        if row > 0 {
            fen.push(RANK_DELIMITER);
        }
        let mut empty = 0;
        for square in squares {
            match square {
                Some(piece) => {
                    if empty > 0 {
                        fen.push_str(&empty.to_string());
                        empty = 0;
                    }
                    fen.push(piece.to_char());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            fen.push_str(&empty.to_string());
        }
    }
    fen
}

/// Parse a `dd-dd` move string: origin row and column, then destination
/// row and column, each a single 1-indexed digit.
pub fn parse_move(s: &str) -> Result<Move> {
    let invalid = || InvalidMoveString(s.to_string());
    let chars: Vec<char> = s.chars().collect();
    if chars.len() != 5 || chars[2] != MOVE_DELIMITER {
        return Err(invalid().into());
    }
    let mut digits = [0; 4];
    for (digit, index) in digits.iter_mut().zip([0, 1, 3, 4]) {
        *digit = match chars[index].to_digit(10) {
            Some(value) if value > 0 => value as usize - 1,
            _ => return Err(invalid().into()),
        };
    }
    let from = Position::new(digits[0], digits[1])?;
    let to = Position::new(digits[2], digits[3])?;
    Ok(Move::new(from, to))
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_fen(self))
    }
}

impl FromStr for Grid {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_fen(s)
    }
}

impl FromStr for Move {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_move(s)
    }
}
