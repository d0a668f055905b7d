//! Error types shared by both agents

use crate::board::PositionKey;
use thiserror::Error;

/// Reasons a move suggestion cannot be produced
///
/// Every variant is a caller-visible, non-retryable condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SuggestError {
    #[error("player id is required")]
    MissingPlayer,

    #[error("no pieces are registered for the match")]
    EmptySnapshot,

    #[error("player {0} has no pieces in the match")]
    NoPlayerPieces(String),

    /// `tag` is the first non-empty zone tag found for the player, if any
    #[error("could not resolve a goal zone for player {player} (zone tag {})", describe_tag(.tag))]
    UnresolvedGoalZone { player: String, tag: Option<String> },

    #[error("no players are registered for the match")]
    NoPlayers,

    #[error("player {0} does not take part in the match")]
    PlayerNotInMatch(String),

    #[error("there is no active turn")]
    NoActiveTurn,

    #[error("it is {active}'s turn, not {requested}'s")]
    NotPlayersTurn { active: String, requested: String },

    #[error("two pieces occupy {0}")]
    DuplicatePosition(PositionKey),

    #[error("no legal moves available for player {0}")]
    NoLegalMoves(String),
}

fn describe_tag(tag: &Option<String>) -> String {
    match tag {
        Some(tag) => format!("{:?}", tag),
        None => "missing".to_string(),
    }
}

impl SuggestError {
    /// True for the blocked-player condition, as opposed to bad input
    pub fn is_no_legal_moves(&self) -> bool {
        matches!(self, SuggestError::NoLegalMoves(_))
    }
}

/// Reasons a single hop or a whole turn is illegal
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("origin and destination are the same cell {0}")]
    SameCell(PositionKey),

    #[error("destination {0} is occupied")]
    DestinationOccupied(PositionKey),

    #[error("simple moves are not allowed here ({from} -> {to})")]
    SimpleNotAllowed { from: PositionKey, to: PositionKey },

    #[error("{to} is not reachable from {from} in one step")]
    NotReachable { from: PositionKey, to: PositionKey },

    #[error("hop {index} starts at {found}, expected {expected}")]
    Disconnected { index: usize, expected: PositionKey, found: PositionKey },

    #[error("a turn must contain at least one step")]
    EmptyTurn,
}

/// Reasons a standard starting layout cannot be built
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("no standard layout for {0} players (supported: 2, 3, 4, 6)")]
    UnsupportedPlayerCount(usize),

    #[error("player id {0:?} appears twice")]
    DuplicatePlayer(String),
}
