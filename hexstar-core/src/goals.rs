//! Home zones, goal cells and goal distances
//!
//! Each of the six star points is a [`HomeZone`] of ten cells. The same ten
//! cells are home for the zone's owner and the goal for whoever starts in the
//! opposite point.

use crate::board::PositionKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Number of home zones on the board
pub const ZONE_COUNT: usize = 6;

/// Cells per zone
pub const ZONE_SIZE: usize = 10;

/// Priority cells per zone
pub const PRIORITY_SIZE: usize = 3;

const fn c(col: u8, row: u8) -> PositionKey {
    PositionKey::cell(col, row)
}

/// Zone cells, in their hand-tuned order
static ZONE_CELLS: [[PositionKey; ZONE_SIZE]; ZONE_COUNT] = [
    [c(0, 0), c(1, 1), c(0, 3), c(1, 3), c(2, 3), c(0, 1), c(0, 2), c(1, 2), c(2, 2), c(3, 3)],
    [c(0, 4), c(2, 4), c(0, 5), c(2, 5), c(1, 6), c(1, 4), c(3, 4), c(1, 5), c(0, 6), c(0, 7)],
    [c(12, 4), c(10, 4), c(11, 5), c(9, 5), c(9, 6), c(11, 4), c(9, 4), c(10, 5), c(10, 6), c(9, 7)],
    [c(3, 13), c(1, 13), c(0, 14), c(2, 14), c(1, 15), c(2, 13), c(0, 13), c(1, 14), c(0, 15), c(0, 16)],
    [c(0, 9), c(0, 11), c(1, 11), c(0, 12), c(2, 12), c(0, 10), c(1, 10), c(2, 11), c(1, 12), c(3, 12)],
    [c(9, 9), c(9, 11), c(10, 11), c(10, 12), c(12, 12), c(9, 10), c(10, 10), c(11, 11), c(9, 12), c(11, 12)],
];

/// Most valuable cells of each zone, best first
static PRIORITY_CELLS: [[PositionKey; PRIORITY_SIZE]; ZONE_COUNT] = [
    [c(0, 0), c(0, 1), c(1, 1)],
    [c(0, 4), c(1, 4), c(0, 5)],
    [c(12, 4), c(11, 4), c(11, 5)],
    [c(0, 16), c(1, 15), c(0, 15)],
    [c(0, 12), c(1, 12), c(0, 11)],
    [c(12, 12), c(11, 12), c(11, 11)],
];

/// Colour names used in piece zone tags
const ZONE_COLORS: [&str; ZONE_COUNT] = ["white", "blue", "green", "black", "red", "yellow"];

// ============================================================================
// HOME ZONE
// ============================================================================

/// One of the six star points (0-5)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HomeZone(u8);

impl HomeZone {
    pub const ALL: [HomeZone; ZONE_COUNT] = [
        HomeZone(0),
        HomeZone(1),
        HomeZone(2),
        HomeZone(3),
        HomeZone(4),
        HomeZone(5),
    ];

    pub fn new(index: u8) -> Option<Self> {
        ((index as usize) < ZONE_COUNT).then_some(Self(index))
    }

    /// Parse the zone from a `"<zone>-<colour>"` piece tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        let head = tag.split('-').next()?;
        head.trim().parse::<u8>().ok().and_then(Self::new)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// The zone directly across the board (0↔3, 1↔5, 2↔4)
    pub fn opposite(&self) -> HomeZone {
        match self.0 {
            0 => HomeZone(3),
            3 => HomeZone(0),
            1 => HomeZone(5),
            5 => HomeZone(1),
            2 => HomeZone(4),
            _ => HomeZone(2),
        }
    }

    pub fn cells(&self) -> &'static [PositionKey; ZONE_SIZE] {
        &ZONE_CELLS[self.index()]
    }

    pub fn priority_cells(&self) -> &'static [PositionKey; PRIORITY_SIZE] {
        &PRIORITY_CELLS[self.index()]
    }

    pub fn contains(&self, pos: PositionKey) -> bool {
        self.cells().contains(&pos)
    }

    /// Rank of a priority cell (0 = most valuable)
    pub fn priority_rank(&self, pos: PositionKey) -> Option<usize> {
        self.priority_cells().iter().position(|&p| p == pos)
    }

    pub fn is_priority(&self, pos: PositionKey) -> bool {
        self.priority_rank(pos).is_some()
    }

    pub fn color(&self) -> &'static str {
        ZONE_COLORS[self.index()]
    }

    /// Tag carried by pieces that start in this zone
    pub fn tag(&self) -> String {
        format!("{}-{}", self.0, self.color())
    }

    /// Shortest hex distance from `pos` to any cell of this zone
    pub fn distance_from(&self, pos: PositionKey) -> i32 {
        self.cells()
            .iter()
            .map(|&cell| pos.distance_to(cell))
            .min()
            .unwrap_or(0)
    }

    /// Normalized depth (0..1) of a cell inside this zone; 0 outside it
    pub fn depth_of(&self, pos: PositionKey) -> f64 {
        self.cells()
            .iter()
            .position(|&cell| cell == pos)
            .map(|i| depth_table(*self)[i])
            .unwrap_or(0.0)
    }
}

impl TryFrom<u8> for HomeZone {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        HomeZone::new(value).ok_or_else(|| format!("home zone {} out of range 0-5", value))
    }
}

impl From<HomeZone> for u8 {
    fn from(zone: HomeZone) -> u8 {
        zone.0
    }
}

impl fmt::Display for HomeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// GOAL DEPTH
// ============================================================================

static DEPTH_CACHE: [OnceLock<[f64; ZONE_SIZE]>; ZONE_COUNT] = [
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
];

/// Depth scores for a zone, aligned with [`HomeZone::cells`]
fn depth_table(zone: HomeZone) -> &'static [f64; ZONE_SIZE] {
    DEPTH_CACHE[zone.index()].get_or_init(|| compute_depths(zone))
}

/// Project every cell on the zone's mean axial vector and normalize to 0..1,
/// oriented so the long tail of the distribution is the deep end.
fn compute_depths(zone: HomeZone) -> [f64; ZONE_SIZE] {
    let cells = *zone.cells();
    let hexes = cells.map(|cell| cell.to_hex());
    let n = ZONE_SIZE as f64;
    let avg_q = hexes.iter().map(|h| h.q as f64).sum::<f64>() / n;
    let avg_r = hexes.iter().map(|h| h.r as f64).sum::<f64>() / n;

    let dots = hexes.map(|h| h.q as f64 * avg_q + h.r as f64 * avg_r);
    let min_dot = dots.iter().copied().fold(f64::INFINITY, f64::min);
    let max_dot = dots.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg_dot = dots.iter().sum::<f64>() / n;
    let span = max_dot - min_dot;
    if span.abs() < 1e-6 {
        return [0.0; ZONE_SIZE];
    }

    let use_max = (max_dot - avg_dot) >= (avg_dot - min_dot);
    dots.map(|dot| {
        if use_max {
            (dot - min_dot) / span
        } else {
            (max_dot - dot) / span
        }
    })
}
