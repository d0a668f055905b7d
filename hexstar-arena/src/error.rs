//! Reasons a comparison match is aborted

use hexstar_core::{MoveError, PositionKey, SetupError, SuggestError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArenaError {
    #[error("could not set up the match: {0}")]
    Setup(#[from] SetupError),

    #[error("turn {turn}: {player} could not suggest a move: {source}")]
    Suggest {
        turn: u32,
        player: String,
        source: SuggestError,
    },

    #[error("turn {turn}: suggested piece {piece} does not exist")]
    UnknownPiece { turn: u32, piece: String },

    #[error("turn {turn}: piece {piece} does not belong to {player}")]
    ForeignPiece { turn: u32, piece: String, player: String },

    #[error("turn {turn}: suggested origin {suggested} but piece {piece} is on {actual:?}")]
    OriginMismatch {
        turn: u32,
        piece: String,
        suggested: PositionKey,
        actual: Option<PositionKey>,
    },

    #[error("turn {turn}: suggested destination {suggested} but the hops end on {actual}")]
    DestinationMismatch {
        turn: u32,
        suggested: PositionKey,
        actual: PositionKey,
    },

    #[error("turn {turn}: invalid move: {source}")]
    InvalidMove { turn: u32, source: MoveError },
}
