//! Move generation and validation
//!
//! ## Architecture
//! - Level 2: jump-chain search, turn validation
//! - Level 3: simple moves, single jumps, step validation
//! - Level 4: move value types

use crate::board::PositionKey;
use crate::error::MoveError;
use crate::goals::HomeZone;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Set of occupied cells, regardless of owner
pub type Occupancy = FxHashSet<PositionKey>;

// ============================================================================
// MOVE TYPES (Level 4)
// ============================================================================

/// One atomic relocation inside a turn
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hop {
    pub origin: PositionKey,
    pub destination: PositionKey,
}

/// Ordered cells of a jump turn: `[origin, landing1, landing2, ...]`
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JumpChain(Vec<PositionKey>);

impl JumpChain {
    /// A chain needs an origin and at least one landing
    pub fn new(cells: Vec<PositionKey>) -> Option<Self> {
        (cells.len() >= 2).then_some(Self(cells))
    }

    pub fn cells(&self) -> &[PositionKey] {
        &self.0
    }

    pub fn origin(&self) -> PositionKey {
        self.0[0]
    }

    pub fn landing(&self) -> PositionKey {
        self.0[self.0.len() - 1]
    }

    /// Number of hops in the chain
    pub fn hop_count(&self) -> usize {
        self.0.len() - 1
    }

    pub fn hops(&self) -> Vec<Hop> {
        self.0
            .windows(2)
            .map(|w| Hop { origin: w[0], destination: w[1] })
            .collect()
    }

    /// Cut the chain at its first landing inside `goal`
    pub fn trimmed_at_goal(&self, goal: HomeZone) -> JumpChain {
        match self.0.iter().skip(1).position(|&cell| goal.contains(cell)) {
            Some(i) => JumpChain(self.0[..i + 2].to_vec()),
            None => self.clone(),
        }
    }
}

/// Kind of a validated step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepKind {
    Simple,
    Jump,
}

/// A whole turn for one piece: a simple step or a jump chain
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TurnMove {
    /// Index of the moved piece in its snapshot / state
    pub piece: usize,
    pub origin: PositionKey,
    pub destination: PositionKey,
    /// Present for jump turns
    pub chain: Option<JumpChain>,
}

impl TurnMove {
    pub fn simple(piece: usize, origin: PositionKey, destination: PositionKey) -> Self {
        Self { piece, origin, destination, chain: None }
    }

    pub fn jump(piece: usize, chain: JumpChain) -> Self {
        Self {
            piece,
            origin: chain.origin(),
            destination: chain.landing(),
            chain: Some(chain),
        }
    }

    pub fn is_jump(&self) -> bool {
        self.chain.is_some()
    }

    /// Hops needed to replay the turn
    pub fn hops(&self) -> Vec<Hop> {
        match &self.chain {
            Some(chain) => chain.hops(),
            None => vec![Hop { origin: self.origin, destination: self.destination }],
        }
    }
}

// ============================================================================
// GENERATION (Level 3)
// ============================================================================

/// Adjacent empty cells
pub fn simple_moves(origin: PositionKey, occupied: &Occupancy) -> Vec<PositionKey> {
    (0..6)
        .filter_map(|d| origin.neighbor(d))
        .filter(|cell| !occupied.contains(cell))
        .collect()
}

/// Landings of a single hop over an adjacent occupied cell
pub fn single_jump_landings(origin: PositionKey, occupied: &Occupancy) -> Vec<PositionKey> {
    (0..6)
        .filter_map(|d| {
            let middle = origin.neighbor(d)?;
            let landing = origin.beyond(d)?;
            (occupied.contains(&middle) && !occupied.contains(&landing)).then_some(landing)
        })
        .collect()
}

/// Whether a piece at `origin` has any simple move or jump
pub fn has_any_move(origin: PositionKey, occupied: &Occupancy) -> bool {
    !simple_moves(origin, occupied).is_empty() || !single_jump_landings(origin, occupied).is_empty()
}

// ============================================================================
// JUMP CHAINS (Level 2)
// ============================================================================

/// All maximal jump chains starting at `origin`
///
/// The moving piece has left `origin`, so that cell is neither a hurdle nor
/// blocking, but a chain may not land back on it. A landing already used in
/// the current chain is forbidden.
pub fn jump_chains(origin: PositionKey, occupied: &Occupancy) -> Vec<JumpChain> {
    let mut board = occupied.clone();
    board.remove(&origin);

    let mut chains = Vec::new();
    let mut path = vec![origin];
    let mut visited = FxHashSet::default();
    extend_chain(origin, &board, &mut path, &mut visited, &mut chains);
    chains
}

fn extend_chain(
    at: PositionKey,
    board: &Occupancy,
    path: &mut Vec<PositionKey>,
    visited: &mut FxHashSet<PositionKey>,
    chains: &mut Vec<JumpChain>,
) {
    let origin = path[0];
    let mut extended = false;

    for d in 0..6 {
        let (Some(middle), Some(landing)) = (at.neighbor(d), at.beyond(d)) else {
            continue;
        };
        if !board.contains(&middle)
            || board.contains(&landing)
            || landing == origin
            || visited.contains(&landing)
        {
            continue;
        }

        extended = true;
        visited.insert(landing);
        path.push(landing);
        extend_chain(landing, board, path, visited, chains);
        path.pop();
        visited.remove(&landing);
    }

    if !extended && path.len() >= 2 {
        chains.push(JumpChain(path.clone()));
    }
}

// ============================================================================
// VALIDATION (Level 2-3)
// ============================================================================

/// Check one hop against the current occupancy
pub fn validate_step(
    origin: PositionKey,
    destination: PositionKey,
    occupied: &Occupancy,
    allow_simple: bool,
) -> Result<StepKind, MoveError> {
    if origin == destination {
        return Err(MoveError::SameCell(origin));
    }
    if occupied.contains(&destination) {
        return Err(MoveError::DestinationOccupied(destination));
    }

    if origin.direction_to_neighbor(destination).is_some() {
        return if allow_simple {
            Ok(StepKind::Simple)
        } else {
            Err(MoveError::SimpleNotAllowed { from: origin, to: destination })
        };
    }

    match origin.direction_to_landing(destination) {
        Some(d) if origin.neighbor(d).is_some_and(|middle| occupied.contains(&middle)) => {
            Ok(StepKind::Jump)
        }
        _ => Err(MoveError::NotReachable { from: origin, to: destination }),
    }
}

/// Replay a whole turn hop by hop
///
/// A single hop may be a simple step when `allow_simple` is set; a multi-hop
/// turn must consist of jumps only.
pub fn validate_turn(hops: &[Hop], occupied: &Occupancy, allow_simple: bool) -> Result<(), MoveError> {
    if hops.is_empty() {
        return Err(MoveError::EmptyTurn);
    }

    let chain_mode = hops.len() > 1;
    let mut board = occupied.clone();

    for (i, hop) in hops.iter().enumerate() {
        if i > 0 && hops[i - 1].destination != hop.origin {
            return Err(MoveError::Disconnected {
                index: i,
                expected: hops[i - 1].destination,
                found: hop.origin,
            });
        }
        validate_step(hop.origin, hop.destination, &board, allow_simple && !chain_mode)?;
        board.remove(&hop.origin);
        board.insert(hop.destination);
    }

    Ok(())
}
