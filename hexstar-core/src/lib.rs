//! HEXSTAR Core - Board, move generation and heuristic agent
//!
//! This crate provides the core logic for six-point star jumping play:
//! - Board geometry (121 cells, axial coordinates, `"col-row"` keys)
//! - Simple moves, jump chains and turn validation
//! - Home/goal zones with priority cells and goal depth
//! - Match snapshots and standard starting layouts
//! - One-ply heuristic agent ("Max")

pub mod board;
pub mod goals;
pub mod error;
pub mod moves;
pub mod snapshot;
pub mod setup;
pub mod eval;
pub mod decision;
pub mod max;

// Re-exports for convenient access
pub use board::{all_positions, Hex, PositionKey, ParsePositionError, CELL_COUNT, DIRECTIONS, ROW_LENGTHS};
pub use goals::HomeZone;
pub use error::{MoveError, SetupError, SuggestError};
pub use moves::{
    has_any_move, jump_chains, simple_moves, single_jump_landings, validate_step, validate_turn, Hop,
    JumpChain, Occupancy, StepKind, TurnMove,
};
pub use snapshot::{ActiveTurn, LastMove, Piece, Snapshot, SuggestRequest};
pub use setup::{active_zones, standard_snapshot};
pub use eval::{evaluate_state, Weights};
pub use decision::{AgentKind, Decision, MoveAgent};
pub use max::{MaxAgent, ScoreDetail};
