//! HEXSTAR Arena - Max vs MCTS comparison matches
//!
//! This crate plays the two agents against each other from the standard
//! two-player start:
//! - Single matches with every hop validated before it is applied
//! - Per-side progress statistics
//! - Series over several turn limits, run in parallel
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 2: run_series (phases)
//! - Level 3: GameRunner::play_game (steps)
//! - Level 4: utilities, configuration

mod config;
mod error;
mod game_runner;
mod match_play;

pub use config::{ArenaConfig, DEFAULT_TURNS};
pub use error::ArenaError;
pub use game_runner::{GameOutcome, GameRunner, PlayerStats};
pub use match_play::{run_series, SeriesResult, SeriesSummary};
