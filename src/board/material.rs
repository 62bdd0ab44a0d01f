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

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Index, IndexMut, Not};
use strum_macros::Display;
use strum_macros::EnumIter;

/// A piece of a specific side. An empty square is `None`, never a `Piece`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    side: Side,
    kind: PieceKind,
}

impl Piece {
    pub const RG: Self = Self::red(General);
    pub const RA: Self = Self::red(Advisor);
    pub const RE: Self = Self::red(Elephant);
    pub const RC: Self = Self::red(Cannon);
    pub const RR: Self = Self::red(Chariot);
    pub const RH: Self = Self::red(Horse);
    pub const RS: Self = Self::red(Soldier);

    pub const BG: Self = Self::black(General);
    pub const BA: Self = Self::black(Advisor);
    pub const BE: Self = Self::black(Elephant);
    pub const BC: Self = Self::black(Cannon);
    pub const BR: Self = Self::black(Chariot);
    pub const BH: Self = Self::black(Horse);
    pub const BS: Self = Self::black(Soldier);

    #[inline]
    pub const fn new(side: Side, kind: PieceKind) -> Self {
        Self { side, kind }
    }

    #[inline]
    pub const fn red(kind: PieceKind) -> Self {
        Self::new(Red, kind)
    }

    #[inline]
    pub const fn black(kind: PieceKind) -> Self {
        Self::new(Black, kind)
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    #[inline]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Reads a notation letter: uppercase is red, lowercase is black.
    pub fn from_char(c: char) -> Option<Self> {
        let kind = PieceKind::from_letter(c.to_ascii_uppercase())?;
        let side = if c.is_ascii_uppercase() { Red } else { Black };
        Some(Self::new(side, kind))
    }

    pub fn to_char(&self) -> char {
        let letter = self.kind.letter();
        match self.side {
            Red => letter,
            Black => letter.to_ascii_lowercase(),
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.side, self.kind)
    }
}

use Side::{Black, Red};

#[derive(Debug, Serialize, Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Side {
    Red,
    Black,
}

impl Not for Side {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        match self {
            Red => Black,
            Black => Red,
        }
    }
}

/// A value held once per side.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pair<T>((T, T));

impl<T> Pair<T> {
    pub fn red(&self) -> &T {
        &self.0 .0
    }
    pub fn red_mut(&mut self) -> &mut T {
        &mut self.0 .0
    }
    pub fn black(&self) -> &T {
        &self.0 .1
    }
    pub fn black_mut(&mut self) -> &mut T {
        &mut self.0 .1
    }
}

impl<T: Hash> Hash for Pair<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.red().hash(state);
        self.black().hash(state);
    }
}

impl<T> Index<Side> for Pair<T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, index: Side) -> &Self::Output {
        match index {
            Red => self.red(),
            Black => self.black(),
        }
    }
}

impl<T> IndexMut<Side> for Pair<T> {
    #[inline(always)]
    fn index_mut(&mut self, index: Side) -> &mut Self::Output {
        match index {
            Red => self.red_mut(),
            Black => self.black_mut(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum PieceKind {
    General,
    Advisor,
    Elephant,
    Cannon,
    Chariot,
    Horse,
    Soldier,
}
use PieceKind::{Advisor, Cannon, Chariot, Elephant, General, Horse, Soldier};

impl PieceKind {
    pub const COUNT: usize = 7;

    pub const fn to_index(&self) -> usize {
        *self as usize
    }

    /// Maps an uppercase notation letter to its kind.
    pub const fn from_letter(c: char) -> Option<Self> {
        match c {
            'A' => Some(Advisor),
            'C' => Some(Cannon),
            'R' => Some(Chariot),
            'E' => Some(Elephant),
            'G' => Some(General),
            'H' => Some(Horse),
            'S' => Some(Soldier),
            _ => None,
        }
    }

    pub const fn letter(&self) -> char {
        match *self {
            Advisor => 'A',
            Cannon => 'C',
            Chariot => 'R',
            Elephant => 'E',
            General => 'G',
            Horse => 'H',
            Soldier => 'S',
        }
    }
}

/// How many of each kind one side has on the board.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KindCounts([u8; PieceKind::COUNT]);

impl KindCounts {
    pub fn total(&self) -> usize {
        self.0.iter().map(|&count| count as usize).sum()
    }
}

impl Index<PieceKind> for KindCounts {
    type Output = u8;
    fn index(&self, kind: PieceKind) -> &Self::Output {
        &self.0[kind.to_index()]
    }
}

impl IndexMut<PieceKind> for KindCounts {
    fn index_mut(&mut self, kind: PieceKind) -> &mut Self::Output {
        &mut self.0[kind.to_index()]
    }
}

/// Living pieces per side and kind. Every (side, kind) pair is present,
/// with a count of zero when the board has none.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PieceCounts(Pair<KindCounts>);

impl PieceCounts {
    pub fn get(&self, side: Side, kind: PieceKind) -> usize {
        self.0[side][kind] as usize
    }
    pub fn total(&self, side: Side) -> usize {
        self.0[side].total()
    }
    pub(crate) fn add(&mut self, piece: Piece) {
        self.0[piece.side()][piece.kind()] += 1;
    }
}

impl Index<Side> for PieceCounts {
    type Output = KindCounts;
    fn index(&self, side: Side) -> &Self::Output {
        &self.0[side]
    }
}
