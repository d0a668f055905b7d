//! HEXSTAR MCTS - Monte Carlo Tree Search agent
//!
//! This crate provides the search-based agent:
//! - Immutable game state over whole turn-moves
//! - Arena tree with UCB1 selection
//! - Seeded random rollouts
//! - Backpropagation of requester-relative values

pub mod state;
pub mod tree;
pub mod rollout;
pub mod search;
pub mod agent;

use serde::{Deserialize, Serialize};

pub use agent::MctsAgent;
pub use state::GameState;
pub use search::{run_search, SearchResult};

/// MCTS configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// Requested iterations per decision
    pub simulations: u32,
    /// Turn cap for each rollout
    pub rollout_depth: u32,
    pub exploration: f64,
    /// Fixed rollout seed; drawn at random per call when None
    pub seed: Option<u64>,
    /// Limit iterations to `10 + 2 * root moves`
    pub cap_simulations: bool,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            simulations: 25,
            rollout_depth: 40,
            exploration: 1.41, // sqrt(2)
            seed: None,
            cap_simulations: true,
        }
    }
}

impl MctsConfig {
    pub fn with_simulations(mut self, simulations: u32) -> Self {
        self.simulations = simulations;
        self
    }

    pub fn with_rollout_depth(mut self, depth: u32) -> Self {
        self.rollout_depth = depth;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn uncapped(mut self) -> Self {
        self.cap_simulations = false;
        self
    }

    /// Iterations to run for a root with `root_moves` children
    pub fn iterations_for(&self, root_moves: usize) -> u32 {
        if self.cap_simulations {
            let cap = u32::try_from(10 + 2 * root_moves).unwrap_or(u32::MAX);
            self.simulations.min(cap)
        } else {
            self.simulations
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iteration_cap() {
        let config = MctsConfig::default().with_simulations(250);
        assert_eq!(config.iterations_for(5), 20);
        assert_eq!(config.iterations_for(200), 250);
        assert_eq!(config.clone().uncapped().iterations_for(5), 250);
        assert_eq!(MctsConfig::default().iterations_for(100), 25);
    }

    #[test]
    fn test_config_json() {
        let config: MctsConfig = serde_json::from_str(r#"{"simulations": 60, "seed": 5}"#).unwrap();
        assert_eq!(config.simulations, 60);
        assert_eq!(config.seed, Some(5));
        assert_eq!(config.rollout_depth, 40);
        assert!(config.cap_simulations);
    }
}
