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
use log::trace;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::successors;
use thiserror::Error;

use super::grid::Grid;
use super::material::{PieceKind, Side};
use super::square::{Direction, Mask, Offset, Position, NUM_SQUARES};

use Direction::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("No piece at {0} to move")]
    EmptySquare(Position),
}

/// A displacement of whatever piece stands on `from`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

impl Move {
    pub const fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }
}

/// The 1-indexed `dd-dd` form read by `parse_move`. Row 10 has no single
/// digit, so moves touching it print but do not parse back.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}-{}{}",
            self.from.row() + 1,
            self.from.column() + 1,
            self.to.row() + 1,
            self.to.column() + 1
        )
    }
}

/// Destinations for a piece of `side` standing on `from`, in generation order.
pub type MoveRule = fn(&Grid, Position, Side) -> Result<Vec<Position>>;

pub fn rule_for(kind: PieceKind) -> MoveRule {
    match kind {
        PieceKind::General => general_moves,
        PieceKind::Advisor => advisor_moves,
        PieceKind::Elephant => elephant_moves,
        PieceKind::Cannon => cannon_moves,
        PieceKind::Chariot => chariot_moves,
        PieceKind::Horse => horse_moves,
        PieceKind::Soldier => soldier_moves,
    }
}

/// Every destination the piece on `from` may move to. Capture rules only:
/// a move that exposes the mover's own general is not filtered out.
pub fn valid_moves(grid: &Grid, from: Position) -> Result<Vec<Position>> {
    let piece = grid[from].ok_or(MoveError::EmptySquare(from))?;
    trace!("generating moves for {} at {}", piece, from);
    rule_for(piece.kind())(grid, from, piece.side())
}

pub trait ValidMoves: AsRef<Grid> {
    fn valid_moves_from(&self, from: Position) -> Result<Vec<Position>> {
        valid_moves(self.as_ref(), from)
    }

    fn destination_mask(&self, from: Position) -> Result<Mask> {
        Ok(Mask::from_positions(self.valid_moves_from(from)?))
    }
}

impl ValidMoves for Grid {}

/// An empty square, or one held by the other side.
#[inline]
fn admits(grid: &Grid, to: Position, side: Side) -> bool {
    grid[to].map_or(true, |piece| piece.side() != side)
}

fn is_on_top(grid: &Grid, side: Side) -> Result<bool> {
    Ok(grid.top_side()? == side)
}

/// Squares along `direction`, nearest first, up to the edge of the board.
fn ray(from: Position, direction: Direction) -> impl Iterator<Item = Position> {
    successors(from + direction, move |&position| position + direction)
}

pub fn general_moves(grid: &Grid, from: Position, side: Side) -> Result<Vec<Position>> {
    Ok(GENERAL_STEPS[from.to_index()]
        .iter()
        .copied()
        .filter(|&to| admits(grid, to, side))
        .collect())
}

pub fn advisor_moves(grid: &Grid, from: Position, side: Side) -> Result<Vec<Position>> {
    Ok(ADVISOR_STEPS[from.to_index()]
        .iter()
        .copied()
        .filter(|&to| admits(grid, to, side))
        .collect())
}

/// Two diagonal steps over an empty eye, never across the river.
pub fn elephant_moves(grid: &Grid, from: Position, side: Side) -> Result<Vec<Position>> {
    let on_top = is_on_top(grid, side)?;
    Ok(ELEPHANT_JUMPS[from.to_index()]
        .iter()
        .filter(|&&(eye, to)| {
            to.in_top_half() == on_top && grid.is_vacant(eye) && admits(grid, to, side)
        })
        .map(|&(_, to)| to)
        .collect())
}

pub fn horse_moves(grid: &Grid, from: Position, side: Side) -> Result<Vec<Position>> {
    Ok(HORSE_JUMPS[from.to_index()]
        .iter()
        .filter(|&&(leg, to)| grid.is_vacant(leg) && admits(grid, to, side))
        .map(|&(_, to)| to)
        .collect())
}

pub fn chariot_moves(grid: &Grid, from: Position, side: Side) -> Result<Vec<Position>> {
    let mut moves = Vec::new();
    for direction in Direction::orthogonals() {
        for to in ray(from, direction) {
            if grid.is_vacant(to) {
                moves.push(to);
                continue;
            }
            if admits(grid, to, side) {
                moves.push(to);
            }
            break;
        }
    }
    Ok(moves)
}

/// Slides like a chariot without capturing; captures only by jumping
/// exactly one screen of either side onto the next piece beyond it.
pub fn cannon_moves(grid: &Grid, from: Position, side: Side) -> Result<Vec<Position>> {
    let mut moves = Vec::new();
    for direction in Direction::orthogonals() {
        let mut squares = ray(from, direction);
        for to in squares.by_ref() {
            if grid.is_occupied(to) {
                break;
            }
            moves.push(to);
        }
        // past the screen, if any
        if let Some(target) = squares.find(|&to| grid.is_occupied(to)) {
            if admits(grid, target, side) {
                moves.push(target);
            }
        }
    }
    Ok(moves)
}

/// One step forward; once across the river, also one step sideways.
pub fn soldier_moves(grid: &Grid, from: Position, side: Side) -> Result<Vec<Position>> {
    let on_top = is_on_top(grid, side)?;
    let forward = if on_top { Down } else { Up };
    let crossed = from.in_top_half() != on_top;
    let steps = if crossed {
        vec![Right, Left, forward]
    } else {
        vec![forward]
    };
    Ok(steps
        .into_iter()
        .filter_map(|direction| from + direction)
        .filter(|&to| admits(grid, to, side))
        .collect())
}

static GENERAL_STEPS: Lazy<[Vec<Position>; NUM_SQUARES]> =
    Lazy::new(|| palace_steps(&Direction::orthogonals().collect::<Vec<_>>()));

static ADVISOR_STEPS: Lazy<[Vec<Position>; NUM_SQUARES]> =
    Lazy::new(|| palace_steps(&Direction::diagonals().collect::<Vec<_>>()));

fn palace_steps(directions: &[Direction]) -> [Vec<Position>; NUM_SQUARES] {
    std::array::from_fn(|index| {
        let from = Position::from_index(index);
        directions
            .iter()
            .filter_map(|&direction| from + direction)
            .filter(|to| to.in_palace())
            .collect()
    })
}

/// (eye, destination) per square.
static ELEPHANT_JUMPS: Lazy<[Vec<(Position, Position)>; NUM_SQUARES]> = Lazy::new(|| {
    std::array::from_fn(|index| {
        let from = Position::from_index(index);
        [DownRight, DownLeft, UpRight, UpLeft]
            .into_iter()
            .filter_map(|direction| {
                let jump = Offset::from(direction).scale(2);
                Some(((from + direction)?, (from + jump)?))
            })
            .collect()
    })
});

/// (leg, destination) per square.
static HORSE_JUMPS: Lazy<[Vec<(Position, Position)>; NUM_SQUARES]> = Lazy::new(|| {
    const JUMPS: [(Direction, Direction); 8] = [
        (Down, Right),
        (Down, Left),
        (Up, Right),
        (Up, Left),
        (Right, Down),
        (Right, Up),
        (Left, Down),
        (Left, Up),
    ];
    std::array::from_fn(|index| {
        let from = Position::from_index(index);
        JUMPS
            .into_iter()
            .filter_map(|(long, short)| {
                let leg = (from + long)?;
                let to = ((leg + long)? + short)?;
                Some((leg, to))
            })
            .collect()
    })
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::layout::starting_grid;
    use crate::board::material::Piece;
    use crate::board::grid::BoardError;

    fn pos(row: usize, column: usize) -> Position {
        Position::new(row, column).unwrap()
    }

    /// Red general on top, black general on the bottom, plus `pieces`.
    fn grid_with(pieces: &[(usize, usize, Piece)]) -> Grid {
        let mut grid = Grid::empty();
        grid[pos(0, 4)] = Some(Piece::RG);
        grid[pos(9, 4)] = Some(Piece::BG);
        for &(row, column, piece) in pieces {
            grid[pos(row, column)] = Some(piece);
        }
        grid
    }

    fn positions(squares: &[(usize, usize)]) -> Vec<Position> {
        squares.iter().map(|&(row, column)| pos(row, column)).collect()
    }

    #[test]
    fn test_general_confined_to_palace() {
        let grid = grid_with(&[]);
        let moves = valid_moves(&grid, pos(0, 4)).unwrap();
        assert_eq!(moves, positions(&[(1, 4), (0, 5), (0, 3)]));
    }
    #[test]
    fn test_general_blocked_by_own_advisors() {
        let grid = starting_grid(false);
        assert_eq!(valid_moves(&grid, pos(0, 4)).unwrap(), positions(&[(1, 4)]));
    }
    #[test]
    fn test_general_at_palace_corner() {
        let grid = grid_with(&[(7, 3, Piece::BG)]);
        let moves = valid_moves(&grid, pos(7, 3)).unwrap();
        assert_eq!(moves, positions(&[(8, 3), (7, 4)]));
    }
    #[test]
    fn test_general_captures_in_palace() {
        let grid = grid_with(&[(1, 4, Piece::BS)]);
        let moves = valid_moves(&grid, pos(0, 4)).unwrap();
        assert!(moves.contains(&pos(1, 4)));
    }
    #[test]
    fn test_advisor_moves() {
        let grid = starting_grid(false);
        assert_eq!(valid_moves(&grid, pos(0, 3)).unwrap(), positions(&[(1, 4)]));
        let grid = grid_with(&[(1, 4, Piece::RA)]);
        let moves = valid_moves(&grid, pos(1, 4)).unwrap();
        assert_eq!(moves, positions(&[(2, 5), (0, 3), (2, 3), (0, 5)]));
    }
    #[test]
    fn test_elephant_eye_blocked() {
        let grid = grid_with(&[(0, 2, Piece::RE), (1, 3, Piece::BS)]);
        let moves = valid_moves(&grid, pos(0, 2)).unwrap();
        assert!(!moves.contains(&pos(2, 4)));
        assert!(moves.contains(&pos(2, 0)));
        assert_eq!(moves, positions(&[(2, 0)]));
    }
    #[test]
    fn test_elephant_stays_on_own_side() {
        let grid = grid_with(&[(4, 2, Piece::RE)]);
        let moves = valid_moves(&grid, pos(4, 2)).unwrap();
        assert_eq!(moves, positions(&[(2, 4), (2, 0)]));

        let grid = grid_with(&[(5, 2, Piece::BE)]);
        let moves = valid_moves(&grid, pos(5, 2)).unwrap();
        assert_eq!(moves, positions(&[(7, 4), (7, 0)]));
    }
    #[test]
    fn test_horse_opening_jumps() {
        let grid = starting_grid(false);
        assert_eq!(
            valid_moves(&grid, pos(0, 1)).unwrap(),
            positions(&[(2, 2), (2, 0)])
        );
    }
    #[test]
    fn test_horse_leg_blocked() {
        let grid = grid_with(&[(4, 4, Piece::RH), (5, 4, Piece::BS)]);
        let moves = valid_moves(&grid, pos(4, 4)).unwrap();
        assert_eq!(
            moves,
            positions(&[(2, 5), (2, 3), (5, 6), (3, 6), (5, 2), (3, 2)])
        );
    }
    #[test]
    fn test_horse_captures_but_not_own_side() {
        let grid = grid_with(&[(4, 4, Piece::RH), (6, 5, Piece::BS), (6, 3, Piece::RS)]);
        let moves = valid_moves(&grid, pos(4, 4)).unwrap();
        assert!(moves.contains(&pos(6, 5)));
        assert!(!moves.contains(&pos(6, 3)));
        assert_eq!(moves.len(), 7);
    }
    #[test]
    fn test_chariot_slides_until_blocked() {
        let grid = starting_grid(false);
        assert_eq!(
            valid_moves(&grid, pos(0, 0)).unwrap(),
            positions(&[(1, 0), (2, 0)])
        );
    }
    #[test]
    fn test_chariot_captures_first_enemy() {
        let grid = grid_with(&[(5, 0, Piece::RR), (5, 3, Piece::BS), (5, 5, Piece::BH)]);
        let moves = valid_moves(&grid, pos(5, 0)).unwrap();
        assert!(moves.contains(&pos(5, 3)));
        assert!(!moves.contains(&pos(5, 4)));
        assert!(!moves.contains(&pos(5, 5)));
        // four down, five up, three right
        assert_eq!(moves.len(), 12);
    }
    #[test]
    fn test_cannon_screen_capture() {
        let grid = grid_with(&[(7, 1, Piece::RC), (5, 1, Piece::RS), (3, 1, Piece::BH)]);
        let moves = valid_moves(&grid, pos(7, 1)).unwrap();
        assert!(moves.contains(&pos(3, 1)));
        assert!(!moves.contains(&pos(4, 1)));
        assert!(!moves.contains(&pos(5, 1)));
        assert!(moves.contains(&pos(6, 1)));
        assert!(!moves.contains(&pos(2, 1)));
    }
    #[test]
    fn test_cannon_enemy_screen() {
        let grid = grid_with(&[(7, 1, Piece::RC), (5, 1, Piece::BS), (3, 1, Piece::BH)]);
        let moves = valid_moves(&grid, pos(7, 1)).unwrap();
        assert!(moves.contains(&pos(3, 1)));
        assert!(!moves.contains(&pos(5, 1)));
    }
    #[test]
    fn test_cannon_cannot_capture_own_side_or_without_screen() {
        let grid = grid_with(&[(7, 1, Piece::RC), (5, 1, Piece::BS), (3, 1, Piece::RH)]);
        let moves = valid_moves(&grid, pos(7, 1)).unwrap();
        assert!(!moves.contains(&pos(3, 1)));
        assert!(!moves.contains(&pos(5, 1)));
    }
    #[test]
    fn test_cannon_jumps_only_one_screen() {
        let grid = grid_with(&[
            (7, 1, Piece::RC),
            (6, 1, Piece::BS),
            (5, 1, Piece::BS),
            (4, 1, Piece::BH),
        ]);
        let moves = valid_moves(&grid, pos(7, 1)).unwrap();
        assert!(moves.contains(&pos(5, 1)));
        assert!(!moves.contains(&pos(4, 1)));
    }
    #[test]
    fn test_cannon_opening_moves() {
        let grid = starting_grid(false);
        let moves = valid_moves(&grid, pos(2, 1)).unwrap();
        // across the board onto the black horse, over the black cannon
        assert!(moves.contains(&pos(9, 1)));
        assert!(!moves.contains(&pos(7, 1)));
        assert!(moves.contains(&pos(1, 1)));
        assert!(!moves.contains(&pos(0, 1)));
        assert!(moves.contains(&pos(2, 6)));
        assert!(moves.contains(&pos(2, 0)));
    }
    #[test]
    fn test_soldier_before_river() {
        let grid = starting_grid(false);
        assert_eq!(valid_moves(&grid, pos(3, 0)).unwrap(), positions(&[(4, 0)]));
        assert_eq!(valid_moves(&grid, pos(6, 4)).unwrap(), positions(&[(5, 4)]));
    }
    #[test]
    fn test_soldier_after_river() {
        let grid = grid_with(&[(5, 4, Piece::RS), (4, 2, Piece::BS)]);
        assert_eq!(
            valid_moves(&grid, pos(5, 4)).unwrap(),
            positions(&[(5, 5), (5, 3), (6, 4)])
        );
        assert_eq!(
            valid_moves(&grid, pos(4, 2)).unwrap(),
            positions(&[(4, 3), (4, 1), (3, 2)])
        );
    }
    #[test]
    fn test_soldier_at_far_edge_moves_sideways() {
        let grid = grid_with(&[(9, 0, Piece::RS)]);
        assert_eq!(valid_moves(&grid, pos(9, 0)).unwrap(), positions(&[(9, 1)]));
        let grid = grid_with(&[(0, 8, Piece::BS)]);
        assert_eq!(valid_moves(&grid, pos(0, 8)).unwrap(), positions(&[(0, 7)]));
    }
    #[test]
    fn test_soldier_follows_orientation() {
        let mut grid = grid_with(&[(3, 0, Piece::RS)]);
        grid.flip();
        // red now on the bottom: the soldier at (6, 0) advances upward
        assert_eq!(valid_moves(&grid, pos(6, 0)).unwrap(), positions(&[(5, 0)]));
    }
    #[test]
    fn test_empty_square() {
        let grid = starting_grid(true);
        let err = valid_moves(&grid, pos(4, 4)).unwrap_err();
        assert_eq!(
            err.downcast_ref::<MoveError>(),
            Some(&MoveError::EmptySquare(pos(4, 4)))
        );
    }
    #[test]
    fn test_missing_general() {
        let mut grid = Grid::empty();
        grid[pos(3, 0)] = Some(Piece::RS);
        grid[pos(0, 2)] = Some(Piece::BE);
        for from in [pos(3, 0), pos(0, 2)] {
            let err = valid_moves(&grid, from).unwrap_err();
            assert_eq!(
                err.downcast_ref::<BoardError>(),
                Some(&BoardError::PieceNotFound(Piece::RG))
            );
        }
    }
    #[test]
    fn test_rules_usable_directly() {
        let grid = grid_with(&[]);
        // a rule can be asked about a hypothetical piece
        let moves = rule_for(PieceKind::Chariot)(&grid, pos(4, 0), Side::Black).unwrap();
        assert_eq!(moves.len(), 9 + 8);
    }
    #[test]
    fn test_destination_mask() {
        let grid = starting_grid(true);
        let mask = grid.destination_mask(pos(9, 1)).unwrap();
        assert_eq!(mask.len(), 2);
        assert!(mask.contains(pos(7, 2)));
        assert!(mask.contains(pos(7, 0)));
    }
    #[test]
    fn test_every_piece_in_start_has_expected_move_count() {
        let grid = starting_grid(true);
        let total: usize = grid
            .pieces()
            .map(|(from, _)| grid.valid_moves_from(from).unwrap().len())
            .sum();
        // per side: chariots 2+2, horses 2+2, elephants 2+2, advisors 1+1,
        // general 1, cannons 12+12, soldiers 5
        assert_eq!(total, 2 * 44);
    }
    #[test]
    fn test_tables_stay_on_board() {
        for index in 0..NUM_SQUARES {
            assert!(GENERAL_STEPS[index].len() <= 4);
            assert!(ADVISOR_STEPS[index].len() <= 4);
            assert!(ELEPHANT_JUMPS[index].len() <= 4);
            assert!(HORSE_JUMPS[index].len() <= 8);
        }
        assert_eq!(HORSE_JUMPS[pos(0, 0).to_index()].len(), 2);
        assert_eq!(ADVISOR_STEPS[pos(1, 4).to_index()].len(), 4);
        assert!(ADVISOR_STEPS[pos(4, 4).to_index()].is_empty());
    }
}
