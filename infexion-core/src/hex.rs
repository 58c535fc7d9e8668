//! Hex board geometry with axial (r, q) coordinates
//!
//! The board is a `BOARD_N` x `BOARD_N` rhombus. Coordinate arithmetic wraps
//! modulo `BOARD_N`, so the board behaves like a torus when stacks spread.

use std::fmt;
use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

/// Board dimension (cells per row and per column)
pub const BOARD_N: i8 = 7;

/// Number of cells on the board
pub const BOARD_CELLS: usize = (BOARD_N as usize) * (BOARD_N as usize);

/// Axial hex coordinates, always kept inside `0..BOARD_N`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexPos {
    pub r: i8,
    pub q: i8,
}

impl HexPos {
    pub const fn new(r: i8, q: i8) -> Self {
        Self { r, q }
    }

    /// Build a coordinate, wrapping both components onto the board
    pub fn wrapped(r: i32, q: i32) -> Self {
        let n = BOARD_N as i32;
        Self {
            r: r.rem_euclid(n) as i8,
            q: q.rem_euclid(n) as i8,
        }
    }

    /// Check if this coordinate is on the board
    pub fn is_valid(&self) -> bool {
        (0..BOARD_N).contains(&self.r) && (0..BOARD_N).contains(&self.q)
    }

    /// Dense row-major index, `None` when off the board
    pub fn index(&self) -> Option<usize> {
        if self.is_valid() {
            Some(self.r as usize * BOARD_N as usize + self.q as usize)
        } else {
            None
        }
    }

    /// Inverse of [`HexPos::index`]
    pub fn from_index(index: usize) -> Self {
        let n = BOARD_N as usize;
        Self::new((index / n % n) as i8, (index % n) as i8)
    }

    /// Neighbor in a direction (wraps)
    pub fn neighbor(self, dir: HexDir) -> HexPos {
        self + dir.vector()
    }

    /// The cell `steps` cells away along `dir` (wraps)
    pub fn offset(self, dir: HexDir, steps: i8) -> HexPos {
        self + dir.vector() * steps
    }

    /// All board coordinates in row-major order
    pub fn all() -> impl Iterator<Item = HexPos> {
        (0..BOARD_N).flat_map(|r| (0..BOARD_N).map(move |q| HexPos::new(r, q)))
    }
}

impl fmt::Display for HexPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.r, self.q)
    }
}

/// Displacement between two coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HexVec {
    pub dr: i8,
    pub dq: i8,
}

impl HexVec {
    pub const fn new(dr: i8, dq: i8) -> Self {
        Self { dr, dq }
    }
}

impl Mul<i8> for HexVec {
    type Output = HexVec;

    fn mul(self, k: i8) -> HexVec {
        HexVec::new(self.dr.wrapping_mul(k), self.dq.wrapping_mul(k))
    }
}

impl Add<HexVec> for HexPos {
    type Output = HexPos;

    fn add(self, v: HexVec) -> HexPos {
        HexPos::wrapped(self.r as i32 + v.dr as i32, self.q as i32 + v.dq as i32)
    }
}

/// The six hex directions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HexDir {
    DownRight,
    Down,
    DownLeft,
    UpLeft,
    Up,
    UpRight,
}

/// Directions in generation order
pub const DIRECTIONS: [HexDir; 6] = [
    HexDir::DownRight,
    HexDir::Down,
    HexDir::DownLeft,
    HexDir::UpLeft,
    HexDir::Up,
    HexDir::UpRight,
];

impl HexDir {
    /// Unit vector (dr, dq)
    pub const fn vector(self) -> HexVec {
        match self {
            HexDir::DownRight => HexVec::new(0, 1),
            HexDir::Down => HexVec::new(-1, 1),
            HexDir::DownLeft => HexVec::new(-1, 0),
            HexDir::UpLeft => HexVec::new(0, -1),
            HexDir::Up => HexVec::new(1, -1),
            HexDir::UpRight => HexVec::new(1, 0),
        }
    }

    pub fn opposite(self) -> HexDir {
        match self {
            HexDir::DownRight => HexDir::UpLeft,
            HexDir::Down => HexDir::Up,
            HexDir::DownLeft => HexDir::UpRight,
            HexDir::UpLeft => HexDir::DownRight,
            HexDir::Up => HexDir::Down,
            HexDir::UpRight => HexDir::DownLeft,
        }
    }
}

impl From<HexDir> for HexVec {
    fn from(dir: HexDir) -> Self {
        dir.vector()
    }
}

impl fmt::Display for HexDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.vector();
        write!(f, "[{}, {}]", v.dr, v.dq)
    }
}
