//! Star board geometry with axial coordinates
//!
//! Cells are addressed two ways:
//! - [`PositionKey`]: the human-readable `"<column>-<row>"` key used by callers
//! - [`Hex`]: axial `(q, r)` coordinates used for adjacency and distances
//!
//! The two are related by a fixed per-row offset table, which makes the
//! mapping a bijection over the 121 cells of the star.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of rows on the board
pub const ROW_COUNT: usize = 17;

/// Cells per row, top to bottom
pub const ROW_LENGTHS: [u8; ROW_COUNT] = [1, 2, 3, 4, 13, 12, 11, 10, 9, 10, 11, 12, 13, 4, 3, 2, 1];

/// Axial `q` of column 0 in each row
const ROW_Q_START: [i8; ROW_COUNT] = [0, -1, -2, -3, -8, -8, -8, -8, -8, -9, -10, -11, -12, -8, -8, -8, -8];

/// Total number of cells on the board
pub const CELL_COUNT: usize = 121;

/// Direction vectors in axial coordinates (dq, dr)
pub const DIRECTIONS: [(i8, i8); 6] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, -1),
    (-1, 1),
];

// ============================================================================
// AXIAL COORDINATES
// ============================================================================

/// Axial hex coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hex {
    pub q: i8,
    pub r: i8,
}

impl Hex {
    pub const fn new(q: i8, r: i8) -> Self {
        Self { q, r }
    }

    /// Check if this hex is a cell of the star
    pub fn is_valid(&self) -> bool {
        PositionKey::from_hex(*self).is_some()
    }

    /// Distance between two hexes: max(|dq|, |dr|, |dq + dr|)
    pub fn distance_to(&self, other: Hex) -> i32 {
        let dq = self.q as i32 - other.q as i32;
        let dr = self.r as i32 - other.r as i32;
        dq.abs().max(dr.abs()).max((dq + dr).abs())
    }

    /// Step `steps` cells in direction (0-5)
    pub fn offset(&self, direction: usize, steps: i8) -> Hex {
        let (dq, dr) = DIRECTIONS[direction % 6];
        Hex::new(self.q + dq * steps, self.r + dr * steps)
    }

    /// Get neighbor in direction (0-5)
    pub fn neighbor(&self, direction: usize) -> Hex {
        self.offset(direction, 1)
    }
}

// ============================================================================
// POSITION KEYS
// ============================================================================

/// A board cell in `"<column>-<row>"` form
///
/// Construction always validates against [`ROW_LENGTHS`], so holding a
/// `PositionKey` means holding a real cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PositionKey {
    row: u8,
    col: u8,
}

/// Reasons a position key string is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsePositionError {
    #[error("position key {0:?} is not of the form <column>-<row>")]
    Malformed(String),
    #[error("position {0:?} is outside the board")]
    OffBoard(String),
}

impl PositionKey {
    /// Build a key from column and row, or None if off the board
    pub fn new(col: u8, row: u8) -> Option<Self> {
        let len = *ROW_LENGTHS.get(row as usize)?;
        (col < len).then_some(Self { row, col })
    }

    /// Const constructor for literal tables; panics at compile time on bad cells
    pub(crate) const fn cell(col: u8, row: u8) -> Self {
        assert!((row as usize) < ROW_COUNT && col < ROW_LENGTHS[row as usize]);
        Self { row, col }
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    pub fn col(&self) -> u8 {
        self.col
    }

    /// Axial coordinates of this cell
    pub fn to_hex(&self) -> Hex {
        Hex::new(ROW_Q_START[self.row as usize] + self.col as i8, self.row as i8)
    }

    /// Cell at the given axial coordinates, or None outside the star
    pub fn from_hex(hex: Hex) -> Option<Self> {
        if hex.r < 0 || hex.r as usize >= ROW_COUNT {
            return None;
        }
        let col = hex.q as i16 - ROW_Q_START[hex.r as usize] as i16;
        if col < 0 || col > u8::MAX as i16 {
            return None;
        }
        Self::new(col as u8, hex.r as u8)
    }

    /// Hex distance between two cells
    pub fn distance_to(&self, other: PositionKey) -> i32 {
        self.to_hex().distance_to(other.to_hex())
    }

    /// Neighbouring cell in direction (0-5), if on the board
    pub fn neighbor(&self, direction: usize) -> Option<PositionKey> {
        Self::from_hex(self.to_hex().neighbor(direction))
    }

    /// Cell two steps away in direction (0-5), if on the board
    pub fn beyond(&self, direction: usize) -> Option<PositionKey> {
        Self::from_hex(self.to_hex().offset(direction, 2))
    }

    /// Direction index from self to an adjacent cell
    pub fn direction_to_neighbor(&self, other: PositionKey) -> Option<usize> {
        (0..6).find(|&d| self.neighbor(d) == Some(other))
    }

    /// Direction index from self to the cell two steps away in a straight line
    pub fn direction_to_landing(&self, other: PositionKey) -> Option<usize> {
        (0..6).find(|&d| self.beyond(d) == Some(other))
    }
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.col, self.row)
    }
}

impl FromStr for PositionKey {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParsePositionError::Malformed(s.to_string());
        let (col, row) = s.split_once('-').ok_or_else(malformed)?;
        let col: u8 = col.trim().parse().map_err(|_| malformed())?;
        let row: u8 = row.trim().parse().map_err(|_| malformed())?;
        Self::new(col, row).ok_or_else(|| ParsePositionError::OffBoard(s.to_string()))
    }
}

impl Serialize for PositionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PositionKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Iterate every cell of the board, row by row
pub fn all_positions() -> impl Iterator<Item = PositionKey> {
    ROW_LENGTHS
        .iter()
        .enumerate()
        .flat_map(|(row, &len)| (0..len).map(move |col| PositionKey { row: row as u8, col }))
}
