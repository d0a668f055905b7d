//! Configuration types for comparison matches
//!
//! Level 4 - Utilities and configuration

use hexstar_core::Weights;
use hexstar_mcts::MctsConfig;
use serde::{Deserialize, Serialize};

/// Turn counts played by a default series
pub const DEFAULT_TURNS: [u32; 6] = [10, 30, 50, 70, 90, 110];

/// Settings for a Max-vs-MCTS series
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// One match per entry, each lasting that many turns (both sides counted)
    pub turns: Vec<u32>,
    /// MCTS rollout seed for turn `t` is `seed_base + t`
    pub seed_base: u64,
    /// Weights for the Max side
    pub weights: Weights,
    /// Search settings for the MCTS side; the seed is overridden per turn
    pub mcts: MctsConfig,
    /// Pass the mover's previous move to the agents
    pub track_last_move: bool,
    /// Abort on an invalid suggestion; otherwise count it and pass the turn
    pub strict: bool,
    /// Run matches of a series in parallel
    pub parallel: bool,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            turns: DEFAULT_TURNS.to_vec(),
            seed_base: 123,
            weights: Weights::default(),
            mcts: MctsConfig::default().with_simulations(250),
            track_last_move: true,
            strict: true,
            parallel: true,
        }
    }
}

impl ArenaConfig {
    pub fn with_turns(mut self, turns: Vec<u32>) -> Self {
        self.turns = turns;
        self
    }

    pub fn with_simulations(mut self, simulations: u32) -> Self {
        self.mcts.simulations = simulations;
        self
    }

    pub fn with_seed_base(mut self, seed_base: u64) -> Self {
        self.seed_base = seed_base;
        self
    }

    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = weights;
        self
    }

    /// Count invalid suggestions instead of aborting
    pub fn lenient(mut self) -> Self {
        self.strict = false;
        self
    }

    /// Play matches one after another
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// MCTS settings for turn `turn`
    pub fn mcts_for_turn(&self, turn: u32) -> MctsConfig {
        self.mcts.clone().with_seed(self.seed_base.wrapping_add(u64::from(turn)))
    }
}
