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

use once_cell::sync::Lazy;

use super::grid::Grid;
use super::material::{Piece, PieceKind, Side};
use super::square::{Position, NUM_COLS};

use PieceKind::*;

/// Opening layout in rank notation with red on top.
pub const RED_TOP_START: &str = "RHEAGAEHR/9/1C5C1/S1S1S1S1S/9/9/s1s1s1s1s/1c5c1/9/rheagaehr";
/// Opening layout in rank notation with red on the bottom.
pub const RED_BOTTOM_START: &str = "rheagaehr/9/1c5c1/s1s1s1s1s/9/9/S1S1S1S1S/1C5C1/9/RHEAGAEHR";

const BACK_RANK: [PieceKind; NUM_COLS] = [
    Chariot, Horse, Elephant, Advisor, General, Advisor, Elephant, Horse, Chariot,
];
const CANNON_COLUMNS: [usize; 2] = [1, 7];
const SOLDIER_COLUMNS: [usize; 5] = [0, 2, 4, 6, 8];

// Rows for the side that starts at the top; the other side is mirrored.
const BACK_ROW: usize = 0;
const CANNON_ROW: usize = 2;
const SOLDIER_ROW: usize = 3;

static RED_TOP_LAYOUT: Lazy<Grid> = Lazy::new(|| build(Side::Red));
static RED_BOTTOM_LAYOUT: Lazy<Grid> = Lazy::new(|| build(Side::Black));

/// The canonical opening position: 16 pieces per side, red on the bottom
/// when `red_on_bottom` is set.
pub fn starting_grid(red_on_bottom: bool) -> Grid {
    if red_on_bottom {
        *RED_BOTTOM_LAYOUT
    } else {
        *RED_TOP_LAYOUT
    }
}

fn build(top: Side) -> Grid {
    let bottom = !top;
    let mut grid = Grid::empty();
    let mut place = |row: usize, column: usize, kind: PieceKind| {
        if let Some(position) = Position::try_new(row, column) {
            grid[position] = Some(Piece::new(top, kind));
            grid[position.mirrored()] = Some(Piece::new(bottom, kind));
        }
    };
    for (column, kind) in BACK_RANK.into_iter().enumerate() {
        place(BACK_ROW, column, kind);
    }
    for column in CANNON_COLUMNS {
        place(CANNON_ROW, column, Cannon);
    }
    for column in SOLDIER_COLUMNS {
        place(SOLDIER_ROW, column, Soldier);
    }
    grid
}
