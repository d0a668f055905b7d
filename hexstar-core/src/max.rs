//! One-ply heuristic agent ("Max")
//!
//! Every legal turn of the requester is applied to a copy of the snapshot and
//! scored; the best adjusted score wins. No randomness, so the same input
//! always yields the same decision.
//!
//! ## Architecture
//! - Level 1: [`MaxAgent::suggest_move`]
//! - Level 2: candidate generation and best-chain ranking
//! - Level 3: per-move scoring ([`ScoreDetail`])

use crate::board::PositionKey;
use crate::decision::{AgentKind, Decision, MoveAgent};
use crate::error::SuggestError;
use crate::eval::{evaluate_state, priority_bonus, priority_gap, Weights};
use crate::goals::HomeZone;
use crate::moves::{jump_chains, simple_moves, JumpChain};
use crate::snapshot::{LastMove, Snapshot, SuggestRequest};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

/// Breakdown of a candidate's score
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreDetail {
    pub dist_total: f64,
    pub dist_min: f64,
    pub blocked: u32,
    pub home_pieces: u32,
    pub dist_before: i32,
    pub dist_after: i32,
    pub piece_progress: f64,

    pub far_penalty: f64,
    pub priority_gap_penalty: f64,
    pub win_bonus: f64,
    pub goal_entry_bonus: f64,
    pub goal_rearrange_bonus: f64,
    pub goal_priority_bonus: f64,
    pub priority_fill_bonus: f64,
    pub goal_move_penalty: f64,
    pub goal_reloc_penalty: f64,
    pub goal_stay_penalty: f64,
    pub goal_depth_bonus: f64,
    pub goal_chain_bonus: f64,
    pub lone_piece_bonus: f64,
    pub outside_move_bonus: f64,

    pub home_exit_bonus: f64,
    pub home_stay_penalty: f64,
    pub home_return_penalty: f64,
    pub home_ignore_penalty: f64,
    pub home_progress_bonus: f64,
    pub home_outside_ignore_penalty: f64,
    pub home_priority_leave_bonus: f64,
    pub home_priority_stay_penalty: f64,
    pub home_priority_return_penalty: f64,

    pub outside_before: usize,
    pub outside_after: usize,
    pub home_before: usize,
    pub home_after: usize,
    pub priority_missing_before: usize,
    pub priority_missing_after: usize,
    pub priority_blockers_before: usize,
    pub priority_blockers_after: usize,
    pub entered_goal: bool,
    pub rearranging_goal: bool,
    pub fills_priority: bool,
    pub outside_progress_available: bool,
    /// 1.0, or the suppression factor while pieces remain at home
    pub goal_scale: f64,

    // Turn-level adjustments
    pub is_jump: bool,
    pub chain_hops: usize,
    pub jump_bonus: f64,
    pub chain_bonus: f64,
    pub nojump_penalty: f64,
    pub reverse_penalty: f64,
    pub same_piece_penalty: f64,
    pub delta: f64,
}

/// Heuristic one-ply agent
#[derive(Clone, Debug, Default)]
pub struct MaxAgent {
    weights: Weights,
}

/// Legal moves of one piece, computed once per call
struct PieceMoves {
    index: usize,
    origin: PositionKey,
    simple: Vec<PositionKey>,
    chains: Vec<JumpChain>,
}

/// Facts about the requester that do not depend on the candidate
struct MoveContext<'a> {
    player: &'a str,
    goal: HomeZone,
    home: HomeZone,
    positions: Vec<PositionKey>,
    outside_progress: bool,
}

struct Candidate {
    piece: usize,
    origin: PositionKey,
    destination: PositionKey,
    chain: Option<JumpChain>,
    score: f64,
    detail: ScoreDetail,
}

impl MaxAgent {
    pub fn new(weights: Weights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    // ========================================================================
    // CANDIDATES (Level 2)
    // ========================================================================

    /// Pick the chain that gets closest to the goal
    ///
    /// Chains are cut at their first goal landing and deduplicated, then
    /// ranked by distance gained, priority bonus at the landing, hop count
    /// and straight-line travel. Earlier chains win exact ties.
    fn best_chain(&self, origin: PositionKey, chains: &[JumpChain], goal: HomeZone) -> Option<JumpChain> {
        let mut trimmed: Vec<JumpChain> = Vec::new();
        for chain in chains {
            let cut = chain.trimmed_at_goal(goal);
            if !trimmed.contains(&cut) {
                trimmed.push(cut);
            }
        }

        let dist_before = goal.distance_from(origin);
        let rank = |chain: &JumpChain| {
            let landing = chain.landing();
            (
                (dist_before - goal.distance_from(landing)) as f64,
                priority_bonus(landing, goal, &self.weights),
                chain.hop_count(),
                origin.distance_to(landing),
            )
        };

        let mut best: Option<(JumpChain, (f64, f64, usize, i32))> = None;
        for chain in trimmed {
            let r = rank(&chain);
            let better = match &best {
                None => true,
                Some((_, b)) => r
                    .0
                    .total_cmp(&b.0)
                    .then(r.1.total_cmp(&b.1))
                    .then(r.2.cmp(&b.2))
                    .then(r.3.cmp(&b.3))
                    == Ordering::Greater,
            };
            if better {
                best = Some((chain, r));
            }
        }
        best.map(|(chain, _)| chain)
    }

    /// Whether some piece outside the goal can enter it or get closer
    fn outside_progress_possible(moves: &[PieceMoves], goal: HomeZone) -> bool {
        moves.iter().any(|pm| {
            if goal.contains(pm.origin) {
                return false;
            }
            let before = goal.distance_from(pm.origin);
            let gains = |cell: &PositionKey| goal.contains(*cell) || goal.distance_from(*cell) < before;
            pm.simple.iter().any(gains)
                || pm.chains.iter().any(|chain| chain.cells()[1..].iter().any(gains))
        })
    }

    // ========================================================================
    // SCORING (Level 3)
    // ========================================================================

    /// Score the snapshot after moving one piece, with the per-move terms
    fn score_after_move(
        &self,
        ctx: &MoveContext<'_>,
        snapshot: &Snapshot,
        piece: usize,
        origin: PositionKey,
        destination: PositionKey,
        chain: Option<&JumpChain>,
    ) -> (f64, ScoreDetail) {
        let w = &self.weights;
        let (goal, home) = (ctx.goal, ctx.home);
        let mut d = ScoreDetail {
            outside_progress_available: ctx.outside_progress,
            ..Default::default()
        };

        let before = &ctx.positions;
        let outside_before: Vec<PositionKey> = before.iter().copied().filter(|&p| !goal.contains(p)).collect();
        let home_before = before.iter().filter(|&&p| home.contains(p)).count();
        let home_priority_before = before.iter().filter(|&&p| home.is_priority(p)).count();
        let gap_before = priority_gap(before, goal, w);
        let empty_priority_before: Vec<PositionKey> = goal
            .priority_cells()
            .iter()
            .copied()
            .filter(|cell| !before.contains(cell))
            .collect();

        let origin_in_goal = goal.contains(origin);
        let dest_in_goal = goal.contains(destination);
        let origin_in_home = home.contains(origin);
        let dest_in_home = home.contains(destination);
        let origin_in_home_priority = home.is_priority(origin);
        let dest_in_home_priority = home.is_priority(destination);
        let lone_candidate = outside_before.len() == 1 && outside_before[0] == origin;

        // Hypothetical position
        let mut after_snapshot = snapshot.clone();
        after_snapshot.relocate(piece, destination);
        let state = evaluate_state(&after_snapshot, ctx.player, goal, w);
        let mut score = state.score;
        d.dist_total = state.total_distance;
        d.dist_min = state.front_distance;
        d.blocked = state.blocked;
        d.home_pieces = state.home_pieces;

        // Progress of the moved piece
        d.dist_before = goal.distance_from(origin);
        d.dist_after = goal.distance_from(destination);
        d.piece_progress = (d.dist_before - d.dist_after) as f64;
        score += if d.piece_progress >= 0.0 {
            w.progress_adv * d.piece_progress
        } else {
            w.progress_back * d.piece_progress
        };
        d.far_penalty = w.far_destination * d.dist_after as f64;
        score -= d.far_penalty;

        let after = after_snapshot.positions_of(ctx.player);
        let outside_after = after.iter().filter(|&&p| !goal.contains(p)).count();
        let home_after = after.iter().filter(|&&p| home.contains(p)).count();
        let home_priority_after = after.iter().filter(|&&p| home.is_priority(p)).count();
        let gap_after = priority_gap(&after, goal, w);
        let entered_goal = dest_in_goal && !origin_in_goal;
        let fills_priority = origin_in_goal
            && !goal.is_priority(origin)
            && dest_in_goal
            && empty_priority_before.contains(&destination);
        d.priority_gap_penalty = -gap_after.penalty;
        score += gap_after.penalty;

        // Goal terms; bonuses are added after home suppression below
        let mut entry = 0.0;
        let mut rearrange = 0.0;
        let mut fill = 0.0;
        let mut depth = 0.0;
        let mut priority = 0.0;
        let mut chain_entry = 0.0;
        if !after.is_empty() {
            if outside_after == 0 {
                d.win_bonus = w.win_move_bonus;
                score += d.win_bonus;
            } else if entered_goal && outside_after < outside_before.len() {
                entry = w.goal_entry_bonus;
            }

            if origin_in_goal && outside_after > 0 {
                if dest_in_goal && fills_priority {
                    fill = w.goal_priority_fill_bonus;
                } else if dest_in_goal && !ctx.outside_progress {
                    rearrange = w.goal_rearrange_bonus;
                    d.rearranging_goal = true;
                } else {
                    d.goal_move_penalty = w.goal_move_penalty;
                    score -= d.goal_move_penalty;
                    if outside_before.len() > 1 {
                        d.goal_reloc_penalty = w.goal_reloc_penalty;
                        score -= d.goal_reloc_penalty;
                    }
                    if dest_in_goal {
                        d.goal_stay_penalty = w.goal_stay_penalty;
                        score -= d.goal_stay_penalty;
                    }
                }
            }

            if dest_in_goal {
                let origin_depth = if origin_in_goal { goal.depth_of(origin) } else { 0.0 };
                let gain = goal.depth_of(destination) - origin_depth;
                if gain > 0.0 {
                    depth = gain * w.goal_depth_bonus;
                }
                priority = priority_bonus(destination, goal, w);
            }

            if chain.is_some() && entered_goal && outside_after < outside_before.len() {
                chain_entry = w.goal_chain_bonus;
            }
        }
        let lone = if lone_candidate { w.lone_piece_bonus } else { 0.0 };
        let outside_move = if origin_in_goal { 0.0 } else { w.outside_move_bonus };

        // Home terms
        if home_after < home_before {
            d.home_exit_bonus = w.home_exit_bonus * (home_before - home_after) as f64;
            score += d.home_exit_bonus;
        }
        if origin_in_home && dest_in_home {
            d.home_stay_penalty = w.home_stay_penalty;
            score -= d.home_stay_penalty;
            if d.piece_progress > 0.0 {
                d.home_progress_bonus = w.home_progress_bonus * d.piece_progress;
                score += d.home_progress_bonus;
            } else if home_before > 0 {
                d.home_ignore_penalty = w.home_ignore_penalty;
                score -= d.home_ignore_penalty;
            }
        }
        if !origin_in_home && dest_in_home {
            d.home_return_penalty = w.home_return_penalty;
            score -= d.home_return_penalty;
        }
        if home_before > 0 && !origin_in_home && !dest_in_home {
            d.home_outside_ignore_penalty = w.home_outside_ignore_penalty;
            score -= d.home_outside_ignore_penalty;
        }

        if origin_in_home_priority && !dest_in_home_priority {
            d.home_priority_leave_bonus = w.home_priority_leave_bonus;
            score += d.home_priority_leave_bonus;
        }
        if origin_in_home_priority && dest_in_home_priority {
            d.home_priority_stay_penalty = w.home_priority_stay_penalty;
            score -= d.home_priority_stay_penalty;
        }
        if !origin_in_home_priority && dest_in_home_priority {
            d.home_priority_return_penalty = w.home_priority_return_penalty;
            score -= d.home_priority_return_penalty;
        }
        if home_priority_before > 0 && home_priority_after == home_priority_before {
            let extra = w.home_priority_stay_penalty * 0.5;
            d.home_priority_stay_penalty += extra;
            score -= extra;
        }

        // Goal rewards are damped while pieces still sit at home; only
        // positive rewards count, so a negative weight disables its term
        let vacated_home = home_before > home_after;
        let goal_scale = if home_after == 0 || vacated_home { 1.0 } else { w.home_goal_suppression };
        d.goal_scale = goal_scale;
        let scaled = |bonus: f64| {
            let value = bonus * goal_scale;
            if value > 0.0 {
                value
            } else {
                0.0
            }
        };
        d.goal_entry_bonus = scaled(entry);
        d.goal_rearrange_bonus = scaled(rearrange);
        d.goal_priority_bonus = scaled(priority);
        d.priority_fill_bonus = scaled(fill);
        d.goal_depth_bonus = scaled(depth);
        d.goal_chain_bonus = scaled(chain_entry);
        d.lone_piece_bonus = scaled(lone);
        d.outside_move_bonus = scaled(outside_move);
        score += d.goal_entry_bonus
            + d.goal_rearrange_bonus
            + d.goal_priority_bonus
            + d.priority_fill_bonus
            + d.goal_depth_bonus
            + d.goal_chain_bonus
            + d.lone_piece_bonus
            + d.outside_move_bonus;

        d.entered_goal = entered_goal;
        d.fills_priority = fill > 0.0;
        d.outside_before = outside_before.len();
        d.outside_after = outside_after;
        d.home_before = home_before;
        d.home_after = home_after;
        d.priority_missing_before = empty_priority_before.len();
        d.priority_missing_after = gap_after.missing;
        d.priority_blockers_before = gap_before.blockers;
        d.priority_blockers_after = gap_after.blockers;

        (score, d)
    }

    /// Jump, chain, no-jump, reverse and same-piece terms; returns the adjusted score
    #[allow(clippy::too_many_arguments)]
    fn apply_turn_adjustments(
        &self,
        detail: &mut ScoreDetail,
        score: f64,
        baseline: f64,
        chain: Option<&JumpChain>,
        any_jump: bool,
        last: Option<&LastMove>,
        piece_id: &str,
        (origin, destination): (PositionKey, PositionKey),
    ) -> f64 {
        let w = &self.weights;
        detail.is_jump = chain.is_some();
        detail.chain_hops = chain.map_or(0, JumpChain::hop_count);
        detail.jump_bonus = if detail.is_jump { w.jump_bonus } else { 0.0 };
        detail.chain_bonus = detail.chain_hops as f64 * w.chain_len_bonus;
        let goal_progress = detail.entered_goal || detail.rearranging_goal || detail.fills_priority;
        if any_jump && !detail.is_jump && !goal_progress {
            detail.nojump_penalty = w.nojump_penalty;
        }
        if last.is_some_and(|l| l.is_reversed_by(origin, destination)) {
            detail.reverse_penalty = w.reverse_penalty;
        }
        if last.is_some_and(|l| l.moved_piece(piece_id)) {
            detail.same_piece_penalty = w.same_piece_penalty;
        }

        let adjustment = detail.jump_bonus + detail.chain_bonus
            - detail.nojump_penalty
            - detail.reverse_penalty
            - detail.same_piece_penalty;
        detail.delta = score + adjustment - baseline;
        score + adjustment
    }
}

// ============================================================================
// ENTRY POINT (Level 1)
// ============================================================================

impl MoveAgent for MaxAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Max
    }

    fn suggest_move(&self, snapshot: &Snapshot, request: &SuggestRequest) -> Result<Decision, SuggestError> {
        let player = request.player.as_str();
        let goal = snapshot.requester_goal(player)?;
        if let Some(turn) = &snapshot.turn {
            if turn.player != player {
                return Err(SuggestError::NotPlayersTurn {
                    active: turn.player.clone(),
                    requested: player.to_string(),
                });
            }
        }

        let w = &self.weights;
        let occupied = snapshot.occupied();

        let mut moves = Vec::new();
        for index in snapshot.piece_indices(player) {
            let Some(origin) = snapshot.pieces[index].position else {
                continue;
            };
            let mut simple = if request.allow_simple {
                simple_moves(origin, &occupied)
            } else {
                Vec::new()
            };
            // Key text order keeps ties stable across runs
            simple.sort_by_key(|k| k.to_string());
            moves.push(PieceMoves {
                index,
                origin,
                simple,
                chains: jump_chains(origin, &occupied),
            });
        }
        let any_jump = moves.iter().any(|pm| !pm.chains.is_empty());

        let ctx = MoveContext {
            player,
            goal,
            home: goal.opposite(),
            positions: snapshot.positions_of(player),
            outside_progress: Self::outside_progress_possible(&moves, goal),
        };

        let baseline = evaluate_state(snapshot, player, goal, w).score + priority_gap(&ctx.positions, goal, w).penalty;

        let last = request.last_move.as_ref();
        let mut best: Option<Candidate> = None;
        for pm in &moves {
            let piece_id = snapshot.pieces[pm.index].id.as_str();
            let mut candidates: Vec<(PositionKey, Option<JumpChain>)> =
                pm.simple.iter().map(|&dest| (dest, None)).collect();
            if let Some(chain) = self.best_chain(pm.origin, &pm.chains, goal) {
                candidates.push((chain.landing(), Some(chain)));
            }

            for (destination, chain) in candidates {
                let (score, mut detail) =
                    self.score_after_move(&ctx, snapshot, pm.index, pm.origin, destination, chain.as_ref());

                let adjusted = self.apply_turn_adjustments(
                    &mut detail,
                    score,
                    baseline,
                    chain.as_ref(),
                    any_jump,
                    last,
                    piece_id,
                    (pm.origin, destination),
                );
                let is_jump = detail.is_jump;

                let replace = match &best {
                    None => true,
                    Some(b) => adjusted > b.score || (adjusted == b.score && is_jump && !b.detail.is_jump),
                };
                if replace {
                    best = Some(Candidate {
                        piece: pm.index,
                        origin: pm.origin,
                        destination,
                        chain,
                        score: adjusted,
                        detail,
                    });
                }
            }
        }

        let best = best.ok_or_else(|| SuggestError::NoLegalMoves(player.to_string()))?;
        debug!(
            player,
            piece = %snapshot.pieces[best.piece].id,
            from = %best.origin,
            to = %best.destination,
            score = best.score,
            "max agent decision"
        );

        let mut decision = Decision::new(
            AgentKind::Max,
            snapshot.pieces[best.piece].id.clone(),
            best.origin,
            best.destination,
            best.score,
        );
        decision.baseline = Some(baseline);
        decision.delta = Some(best.detail.delta);
        decision.hop_sequence = best.chain.map(|c| c.hops());
        decision.detail = Some(best.detail);
        Ok(decision)
    }
}
