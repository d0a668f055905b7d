//! Match play - a series of matches over several turn limits
//!
//! Level 2 - Phase-level implementation

use hexstar_core::AgentKind;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::game_runner::{GameOutcome, GameRunner};

/// Result of a series (one match per turn limit)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeriesResult {
    /// Outcomes in the order of the configured turn limits
    pub outcomes: Vec<GameOutcome>,
    pub summary: SeriesSummary,
}

/// Aggregate over a series
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub matches: u32,
    /// Matches where Max reduced its distance more
    pub max_leads: u32,
    pub mcts_leads: u32,
    pub ties: u32,
    pub max_avg_delta: f64,
    pub mcts_avg_delta: f64,
    pub max_avg_progress_per_move: f64,
    pub mcts_avg_progress_per_move: f64,
}

impl SeriesSummary {
    pub fn from_outcomes(outcomes: &[GameOutcome]) -> Self {
        let mut summary = SeriesSummary {
            matches: outcomes.len() as u32,
            ..Default::default()
        };
        if outcomes.is_empty() {
            return summary;
        }

        for outcome in outcomes {
            match outcome.leader_by_distance() {
                Some(AgentKind::Max) => summary.max_leads += 1,
                Some(AgentKind::Mcts) => summary.mcts_leads += 1,
                None => summary.ties += 1,
            }
            summary.max_avg_delta += outcome.max.delta_total_dist();
            summary.mcts_avg_delta += outcome.mcts.delta_total_dist();
            summary.max_avg_progress_per_move += outcome.max.avg_progress_per_move();
            summary.mcts_avg_progress_per_move += outcome.mcts.avg_progress_per_move();
        }

        let n = outcomes.len() as f64;
        summary.max_avg_delta /= n;
        summary.mcts_avg_delta /= n;
        summary.max_avg_progress_per_move /= n;
        summary.mcts_avg_progress_per_move /= n;
        summary
    }

    /// Side that led more matches; None when even
    pub fn overall_leader(&self) -> Option<AgentKind> {
        match self.max_leads.cmp(&self.mcts_leads) {
            std::cmp::Ordering::Greater => Some(AgentKind::Max),
            std::cmp::Ordering::Less => Some(AgentKind::Mcts),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Play one match per configured turn limit (Level 2 phase)
///
/// Matches are independent (each starts from the standard layout), so they
/// run in parallel unless the configuration asks otherwise.
pub fn run_series(config: &ArenaConfig) -> Result<SeriesResult, ArenaError> {
    let runner = GameRunner::new(config.clone());

    let outcomes: Vec<GameOutcome> = if config.parallel {
        config
            .turns
            .par_iter()
            .map(|&turns| runner.play_game(turns))
            .collect::<Result<_, _>>()?
    } else {
        config
            .turns
            .iter()
            .map(|&turns| runner.play_game(turns))
            .collect::<Result<_, _>>()?
    };

    let summary = SeriesSummary::from_outcomes(&outcomes);
    info!(
        matches = summary.matches,
        max_leads = summary.max_leads,
        mcts_leads = summary.mcts_leads,
        ties = summary.ties,
        "series finished"
    );
    Ok(SeriesResult { outcomes, summary })
}
