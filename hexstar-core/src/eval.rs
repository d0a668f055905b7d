//! Position evaluation for the heuristic agent
//!
//! ## Architecture
//! - Level 1: [`Weights`] configuration
//! - Level 2: state score (distances, blocked pieces, pieces at home)
//! - Level 3: goal priority terms

use crate::board::PositionKey;
use crate::goals::{HomeZone, PRIORITY_SIZE};
use crate::moves::has_any_move;
use crate::snapshot::Snapshot;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// WEIGHTS (Level 1)
// ============================================================================

/// Heuristic weights for move scoring
///
/// Missing fields in a weights file fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    /// Sum of goal distances over the player's pieces
    pub total_dist: f64,
    /// Goal distance of the most advanced piece
    pub front_dist: f64,
    /// Pieces with no simple move and no jump
    pub blocked: f64,
    pub progress_adv: f64,
    pub progress_back: f64,
    pub jump_bonus: f64,
    pub nojump_penalty: f64,
    /// Per hop of a chain
    pub chain_len_bonus: f64,
    pub reverse_penalty: f64,
    pub same_piece_penalty: f64,
    /// Per unit of goal distance at the destination
    pub far_destination: f64,

    // Home zone
    pub home_penalty: f64,
    pub home_exit_bonus: f64,
    pub home_stay_penalty: f64,
    pub home_return_penalty: f64,
    pub home_ignore_penalty: f64,
    pub home_priority_leave_bonus: f64,
    pub home_priority_stay_penalty: f64,
    pub home_priority_return_penalty: f64,
    pub home_outside_ignore_penalty: f64,
    pub home_progress_bonus: f64,

    // Goal zone
    pub goal_move_penalty: f64,
    pub goal_reloc_penalty: f64,
    pub goal_stay_penalty: f64,
    pub goal_entry_bonus: f64,
    pub goal_rearrange_bonus: f64,
    pub goal_priority_base: f64,
    pub goal_priority_fill_bonus: f64,
    pub goal_priority_gap_penalty: f64,
    pub goal_priority_block_penalty: f64,
    pub goal_depth_bonus: f64,
    pub goal_chain_bonus: f64,
    pub lone_piece_bonus: f64,
    pub outside_move_bonus: f64,
    pub win_move_bonus: f64,

    /// Scale applied to goal rewards while pieces remain at home
    pub home_goal_suppression: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            total_dist: 1.0,
            front_dist: 0.6,
            blocked: 0.4,
            progress_adv: 0.4,
            progress_back: 0.8,
            jump_bonus: 0.2,
            nojump_penalty: 0.2,
            chain_len_bonus: 0.15,
            reverse_penalty: 2.0,
            same_piece_penalty: 0.2,
            far_destination: 0.5,

            home_penalty: 34.0,
            home_exit_bonus: 520.0,
            home_stay_penalty: 280.0,
            home_return_penalty: 460.0,
            home_ignore_penalty: 120.0,
            home_priority_leave_bonus: 520.0,
            home_priority_stay_penalty: 420.0,
            home_priority_return_penalty: 560.0,
            home_outside_ignore_penalty: 420.0,
            home_progress_bonus: 180.0,

            goal_move_penalty: 3.0,
            goal_reloc_penalty: 12.0,
            goal_stay_penalty: 8.0,
            goal_entry_bonus: 12.0,
            goal_rearrange_bonus: 4.0,
            goal_priority_base: 9.0,
            goal_priority_fill_bonus: 72.0,
            goal_priority_gap_penalty: 30.0,
            goal_priority_block_penalty: 15.0,
            goal_depth_bonus: 4.0,
            goal_chain_bonus: 4.0,
            lone_piece_bonus: 80.0,
            outside_move_bonus: 2.5,
            win_move_bonus: 200.0,

            home_goal_suppression: 0.25,
        }
    }
}

impl Weights {
    /// Load weights from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading weights {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("parsing weights {}", path.display()))
    }
}

// ============================================================================
// STATE SCORE (Level 2)
// ============================================================================

/// Static score of one player's position, with its components
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateScore {
    pub score: f64,
    pub total_distance: f64,
    pub front_distance: f64,
    pub blocked: u32,
    pub home_pieces: u32,
}

/// Score `player`'s pieces against `goal`; higher is better
///
/// Pieces without a position or without a readable zone tag are ignored.
/// A player with nothing left to score gets negative infinity.
pub fn evaluate_state(snapshot: &Snapshot, player: &str, goal: HomeZone, weights: &Weights) -> StateScore {
    let occupied = snapshot.occupied();
    let mut total_distance = 0.0;
    let mut front: Option<i32> = None;
    let mut counted = 0;
    let mut blocked = 0;
    let mut home_pieces = 0;

    for piece in snapshot.pieces.iter().filter(|p| p.owner == player) {
        let (Some(home), Some(pos)) = (piece.home_zone(), piece.position) else {
            continue;
        };

        let dist = goal.distance_from(pos);
        total_distance += dist as f64;
        front = Some(front.map_or(dist, |f| f.min(dist)));
        counted += 1;

        if home.contains(pos) {
            home_pieces += 1;
        }
        if !has_any_move(pos, &occupied) {
            blocked += 1;
        }
    }

    if counted == 0 {
        return StateScore {
            score: f64::NEG_INFINITY,
            total_distance: f64::INFINITY,
            front_distance: f64::INFINITY,
            blocked,
            home_pieces,
        };
    }

    let front_distance = front.unwrap_or(0) as f64;
    let score = -(weights.total_dist * total_distance
        + weights.front_dist * front_distance
        + weights.blocked * blocked as f64
        + weights.home_penalty * home_pieces as f64);

    StateScore {
        score,
        total_distance,
        front_distance,
        blocked,
        home_pieces,
    }
}

// ============================================================================
// GOAL PRIORITY (Level 3)
// ============================================================================

/// Empty priority cells in the goal and the pieces standing in their way
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PriorityGap {
    /// Non-positive
    pub penalty: f64,
    pub missing: usize,
    pub blockers: usize,
}

/// Penalty for goal priority cells the player has not filled yet
///
/// Blockers (own pieces on non-priority goal cells) only count while some
/// priority cell is still empty.
pub fn priority_gap(positions: &[PositionKey], goal: HomeZone, weights: &Weights) -> PriorityGap {
    let filled = goal
        .priority_cells()
        .iter()
        .filter(|cell| positions.contains(cell))
        .count();
    let missing = PRIORITY_SIZE - filled;
    if missing == 0 {
        return PriorityGap::default();
    }

    let blockers = positions
        .iter()
        .filter(|&&pos| goal.contains(pos) && !goal.is_priority(pos))
        .count();

    let mut penalty = -weights.goal_priority_gap_penalty * missing as f64;
    if blockers > 0 {
        penalty -= weights.goal_priority_block_penalty * blockers as f64;
    }
    PriorityGap { penalty, missing, blockers }
}

/// Bonus for landing on a goal priority cell; best cell earns the most
pub fn priority_bonus(pos: PositionKey, goal: HomeZone, weights: &Weights) -> f64 {
    match goal.priority_rank(pos) {
        Some(rank) => (PRIORITY_SIZE - rank).max(1) as f64 * weights.goal_priority_base,
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Piece;

    fn key(s: &str) -> PositionKey {
        s.parse().unwrap()
    }

    fn zone(i: u8) -> HomeZone {
        HomeZone::new(i).unwrap()
    }

    #[test]
    fn test_default_weights_roundtrip() {
        let w = Weights::default();
        assert_eq!(w.home_exit_bonus, 520.0);
        assert_eq!(w.home_goal_suppression, 0.25);
        let partial: Weights = serde_json::from_str(r#"{"jump_bonus": 1.5}"#).unwrap();
        assert_eq!(partial.jump_bonus, 1.5);
        assert_eq!(partial.win_move_bonus, 200.0);
    }

    #[test]
    fn test_state_score_components() {
        let snap = Snapshot {
            pieces: vec![
                Piece::new("a", "p", "0-white", Some(key("0-0"))),
                Piece::new("b", "p", "0-white", Some(key("4-8"))),
                Piece::new("c", "q", "3-black", Some(key("0-16"))),
            ],
            ..Default::default()
        };
        let w = Weights::default();
        let goal = zone(3);
        let s = evaluate_state(&snap, "p", goal, &w);
        let d0 = goal.distance_from(key("0-0")) as f64;
        let d1 = goal.distance_from(key("4-8")) as f64;
        assert_eq!(s.total_distance, d0 + d1);
        assert_eq!(s.front_distance, d0.min(d1));
        assert_eq!(s.home_pieces, 1);
        assert_eq!(s.blocked, 0);
        let expected = -(d0 + d1) - 0.6 * d0.min(d1) - 34.0;
        assert!((s.score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_blocked_piece_counted() {
        // Tip piece with both neighbours and both jump landings taken
        let snap = Snapshot {
            pieces: vec![
                Piece::new("a", "p", "0-white", Some(key("0-0"))),
                Piece::new("b", "q", "3-black", Some(key("0-1"))),
                Piece::new("c", "q", "3-black", Some(key("1-1"))),
                Piece::new("d", "q", "3-black", Some(key("0-2"))),
                Piece::new("e", "q", "3-black", Some(key("2-2"))),
            ],
            ..Default::default()
        };
        let s = evaluate_state(&snap, "p", zone(3), &Weights::default());
        assert_eq!(s.blocked, 1);
    }

    #[test]
    fn test_no_pieces_scores_negative_infinity() {
        let snap = Snapshot {
            pieces: vec![Piece::new("a", "p", "0-white", None)],
            ..Default::default()
        };
        let s = evaluate_state(&snap, "p", zone(3), &Weights::default());
        assert_eq!(s.score, f64::NEG_INFINITY);
    }

    #[test]
    fn test_priority_gap() {
        let w = Weights::default();
        let goal = zone(3);

        let empty = priority_gap(&[], goal, &w);
        assert_eq!(empty.missing, 3);
        assert_eq!(empty.penalty, -90.0);

        let blocked = priority_gap(&[key("3-13"), key("0-16")], goal, &w);
        assert_eq!(blocked.missing, 2);
        assert_eq!(blocked.blockers, 1);
        assert_eq!(blocked.penalty, -75.0);

        let full = priority_gap(&[key("0-16"), key("1-15"), key("0-15"), key("3-13")], goal, &w);
        assert_eq!(full, PriorityGap::default());
    }

    #[test]
    fn test_priority_bonus_ranks() {
        let w = Weights::default();
        let goal = zone(3);
        assert_eq!(priority_bonus(key("0-16"), goal, &w), 27.0);
        assert_eq!(priority_bonus(key("1-15"), goal, &w), 18.0);
        assert_eq!(priority_bonus(key("0-15"), goal, &w), 9.0);
        assert_eq!(priority_bonus(key("3-13"), goal, &w), 0.0);
    }
}
