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

use super::grid::{Grid, SquareData};
use super::layout::starting_grid;
use super::notation::parse_fen;

/// Where a new board gets its pieces from.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub enum BoardContent {
    /// The opening layout, oriented by `BoardConfig::red_on_bottom`.
    Start,
    /// Rank notation such as `rheagaehr/9/1c5c1/...`.
    Notation(String),
    /// Ten rows of nine squares.
    Grid(Vec<Vec<SquareData>>),
    #[default]
    Empty,
}

impl BoardContent {
    pub fn to_grid(&self, red_on_bottom: bool) -> Result<Grid> {
        match self {
            Self::Start => Ok(starting_grid(red_on_bottom)),
            Self::Notation(fen) => parse_fen(fen),
            Self::Grid(rows) => Grid::from_data(rows),
            Self::Empty => Ok(Grid::empty()),
        }
    }
}

/// Construction options for a `Board`. Missing fields take their defaults:
/// an empty board, red on top, void pieces off.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct BoardConfig {
    pub content: BoardContent,
    /// Only read for `BoardContent::Start`.
    pub red_on_bottom: bool,
    pub void_pieces: bool,
}

impl BoardConfig {
    pub fn new(content: BoardContent) -> Self {
        Self {
            content,
            ..Default::default()
        }
    }

    pub fn with_red_on_bottom(mut self, red_on_bottom: bool) -> Self {
        self.red_on_bottom = red_on_bottom;
        self
    }

    pub fn with_void_pieces(mut self, void_pieces: bool) -> Self {
        self.void_pieces = void_pieces;
        self
    }
}
