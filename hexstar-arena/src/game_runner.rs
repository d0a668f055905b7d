//! Game runner - plays one Max-vs-MCTS match
//!
//! Level 3 - Step-level implementation
//!
//! Both agents start from the standard two-player layout (Max on zone 0,
//! MCTS on zone 3, Max moves first). Every suggestion is checked before it
//! is applied: the piece must belong to the mover, the first hop must start
//! where the piece stands and each hop must pass step validation.

use hexstar_core::{
    standard_snapshot, validate_turn, AgentKind, Decision, LastMove, MaxAgent, MoveAgent, Snapshot,
    SuggestError, SuggestRequest,
};
use hexstar_mcts::MctsAgent;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ArenaConfig;
use crate::error::ArenaError;

// ============================================================================
// STATISTICS
// ============================================================================

/// Per-side counters for one match
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub moves: u32,
    /// Turns made of more than one hop
    pub chains: u32,
    /// Hops played inside those turns
    pub chain_steps: u32,
    /// Suggestions rejected in lenient mode
    pub invalid_moves: u32,
    /// Turns passed because no piece could move
    pub skipped: u32,
    pub total_dist_start: f64,
    pub total_dist_end: f64,
    /// Sum over own turns of (distance before - distance after)
    pub progress_sum: f64,
    pub in_goal_end: u32,
}

impl PlayerStats {
    pub fn avg_progress_per_move(&self) -> f64 {
        if self.moves == 0 {
            0.0
        } else {
            self.progress_sum / self.moves as f64
        }
    }

    /// Reduction of total goal distance over the match
    pub fn delta_total_dist(&self) -> f64 {
        self.total_dist_start - self.total_dist_end
    }
}

/// Outcome of a single match
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameOutcome {
    /// Turn limit of the match
    pub turns: u32,
    /// Turns actually played (a win ends the match early)
    pub turns_played: u32,
    pub max: PlayerStats,
    pub mcts: PlayerStats,
    /// Side that brought every piece home, if any
    pub winner: Option<AgentKind>,
}

impl GameOutcome {
    pub fn stats(&self, side: AgentKind) -> &PlayerStats {
        match side {
            AgentKind::Max => &self.max,
            AgentKind::Mcts => &self.mcts,
        }
    }

    fn stats_mut(&mut self, side: AgentKind) -> &mut PlayerStats {
        match side {
            AgentKind::Max => &mut self.max,
            AgentKind::Mcts => &mut self.mcts,
        }
    }

    /// Side with the larger distance reduction; None on a tie
    pub fn leader_by_distance(&self) -> Option<AgentKind> {
        let (max, mcts) = (self.max.delta_total_dist(), self.mcts.delta_total_dist());
        if max > mcts {
            Some(AgentKind::Max)
        } else if mcts > max {
            Some(AgentKind::Mcts)
        } else {
            None
        }
    }
}

// ============================================================================
// GAME RUNNER
// ============================================================================

/// Plays matches with a fixed configuration
pub struct GameRunner {
    config: ArenaConfig,
    max: MaxAgent,
}

impl GameRunner {
    pub fn new(config: ArenaConfig) -> Self {
        let max = MaxAgent::new(config.weights.clone());
        Self { config, max }
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Play one match of at most `turns` turns
    pub fn play_game(&self, turns: u32) -> Result<GameOutcome, ArenaError> {
        let sides = [AgentKind::Max, AgentKind::Mcts];
        let players = sides.map(|s| s.to_string());
        let mut snapshot = standard_snapshot(&players)?;
        let mut last_moves: [Option<LastMove>; 2] = [None, None];

        let mut outcome = GameOutcome {
            turns,
            turns_played: 0,
            max: PlayerStats::default(),
            mcts: PlayerStats::default(),
            winner: None,
        };
        for (side, player) in sides.iter().zip(&players) {
            outcome.stats_mut(*side).total_dist_start = total_distance(&snapshot, player);
        }

        for t in 1..=turns {
            if let Some(side) = winner(&snapshot, &sides) {
                outcome.winner = Some(side);
                break;
            }
            let Some(turn) = snapshot.turn.clone() else { break };
            let Some(idx) = players.iter().position(|p| *p == turn.player) else { break };
            let side = sides[idx];
            let player = players[idx].as_str();
            outcome.turns_played = t;

            let mut request = SuggestRequest::new(player);
            if self.config.track_last_move {
                if let Some(last) = last_moves[idx].clone() {
                    request = request.with_last_move(last);
                }
            }

            let decision = match self.suggest(side, &snapshot, &request, t) {
                Ok(decision) => decision,
                Err(source) if source.is_no_legal_moves() => {
                    info!(turn = t, player, "no legal move, passing");
                    outcome.stats_mut(side).skipped += 1;
                    snapshot.advance_turn();
                    continue;
                }
                Err(source) => {
                    return Err(ArenaError::Suggest {
                        turn: t,
                        player: player.to_string(),
                        source,
                    })
                }
            };

            let before = total_distance(&snapshot, player);
            match apply_decision(&mut snapshot, &decision, player, t) {
                Ok(()) => {}
                Err(err) if !self.config.strict => {
                    warn!(turn = t, player, error = %err, "rejected suggestion");
                    outcome.stats_mut(side).invalid_moves += 1;
                    snapshot.advance_turn();
                    continue;
                }
                Err(err) => return Err(err),
            }
            let after = total_distance(&snapshot, player);

            let hops = decision.hops();
            let stats = outcome.stats_mut(side);
            stats.moves += 1;
            if hops.len() > 1 {
                stats.chains += 1;
                stats.chain_steps += hops.len() as u32;
            }
            stats.progress_sum += before - after;

            debug!(
                turn = t,
                player,
                piece = %decision.piece_id,
                from = %decision.origin,
                to = %decision.destination,
                hops = hops.len(),
                progress = before - after,
                "turn played"
            );

            last_moves[idx] = Some(LastMove {
                piece_id: Some(decision.piece_id.clone()),
                origin: decision.origin,
                destination: decision.destination,
            });
            snapshot.advance_turn();
        }

        if outcome.winner.is_none() {
            outcome.winner = winner(&snapshot, &sides);
        }
        for (side, player) in sides.iter().zip(&players) {
            let stats = outcome.stats_mut(*side);
            stats.total_dist_end = total_distance(&snapshot, player);
            stats.in_goal_end = pieces_in_goal(&snapshot, player);
        }

        info!(
            turns,
            played = outcome.turns_played,
            max_delta = outcome.max.delta_total_dist(),
            mcts_delta = outcome.mcts.delta_total_dist(),
            winner = ?outcome.winner,
            "match finished"
        );
        Ok(outcome)
    }

    fn suggest(
        &self,
        side: AgentKind,
        snapshot: &Snapshot,
        request: &SuggestRequest,
        turn: u32,
    ) -> Result<Decision, SuggestError> {
        match side {
            AgentKind::Max => self.max.suggest_move(snapshot, request),
            AgentKind::Mcts => MctsAgent::new(self.config.mcts_for_turn(turn)).suggest_move(snapshot, request),
        }
    }
}

// ============================================================================
// HELPERS (Level 4)
// ============================================================================

/// Check a decision against the snapshot and play it
fn apply_decision(snapshot: &mut Snapshot, decision: &Decision, player: &str, turn: u32) -> Result<(), ArenaError> {
    let idx = snapshot
        .pieces
        .iter()
        .position(|p| p.id == decision.piece_id)
        .ok_or_else(|| ArenaError::UnknownPiece {
            turn,
            piece: decision.piece_id.clone(),
        })?;
    let piece = &snapshot.pieces[idx];
    if piece.owner != player {
        return Err(ArenaError::ForeignPiece {
            turn,
            piece: piece.id.clone(),
            player: player.to_string(),
        });
    }

    let hops = decision.hops();
    if piece.position != Some(decision.origin) || hops.first().map(|h| h.origin) != Some(decision.origin) {
        return Err(ArenaError::OriginMismatch {
            turn,
            piece: piece.id.clone(),
            suggested: decision.origin,
            actual: piece.position,
        });
    }

    if let Some(last) = hops.last() {
        if last.destination != decision.destination {
            return Err(ArenaError::DestinationMismatch {
                turn,
                suggested: decision.destination,
                actual: last.destination,
            });
        }
    }

    validate_turn(&hops, &snapshot.occupied(), true).map_err(|source| ArenaError::InvalidMove { turn, source })?;
    snapshot.relocate(idx, decision.destination);
    Ok(())
}

fn total_distance(snapshot: &Snapshot, player: &str) -> f64 {
    let Some(goal) = snapshot.goal_zone_of(player) else { return 0.0 };
    snapshot
        .positions_of(player)
        .into_iter()
        .map(|pos| goal.distance_from(pos) as f64)
        .sum()
}

fn pieces_in_goal(snapshot: &Snapshot, player: &str) -> u32 {
    let Some(goal) = snapshot.goal_zone_of(player) else { return 0 };
    snapshot
        .positions_of(player)
        .into_iter()
        .filter(|&pos| goal.contains(pos))
        .count() as u32
}

fn winner(snapshot: &Snapshot, sides: &[AgentKind; 2]) -> Option<AgentKind> {
    sides.iter().copied().find(|side| snapshot.has_won(&side.to_string()))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use hexstar_core::{Hop, PositionKey};

    fn key(s: &str) -> PositionKey {
        s.parse().unwrap()
    }

    fn quick_config() -> ArenaConfig {
        ArenaConfig::default().with_simulations(8).sequential()
    }

    #[test]
    fn test_short_match_plays_legal_turns() {
        let runner = GameRunner::new(quick_config());
        let outcome = runner.play_game(6).unwrap();

        assert_eq!(outcome.turns_played, 6);
        let played = |s: &PlayerStats| s.moves + s.skipped + s.invalid_moves;
        assert_eq!(played(&outcome.max), 3);
        assert_eq!(played(&outcome.mcts), 3);
        assert_eq!(outcome.max.invalid_moves + outcome.mcts.invalid_moves, 0);
        assert!(outcome.winner.is_none());
        assert!((outcome.max.delta_total_dist() - outcome.max.progress_sum).abs() < 1e-9);
        assert!((outcome.mcts.delta_total_dist() - outcome.mcts.progress_sum).abs() < 1e-9);
    }

    #[test]
    fn test_match_is_reproducible() {
        let runner = GameRunner::new(quick_config());
        assert_eq!(runner.play_game(4).unwrap(), runner.play_game(4).unwrap());
    }

    #[test]
    fn test_zero_turns() {
        let outcome = GameRunner::new(quick_config()).play_game(0).unwrap();
        assert_eq!(outcome.turns_played, 0);
        assert_eq!(outcome.max.moves, 0);
        assert_eq!(outcome.max.delta_total_dist(), 0.0);
        assert_eq!(outcome.leader_by_distance(), None);
    }

    #[test]
    fn test_leader_by_distance() {
        let mut outcome = GameOutcome {
            turns: 10,
            turns_played: 10,
            max: PlayerStats { total_dist_start: 40.0, total_dist_end: 30.0, ..Default::default() },
            mcts: PlayerStats { total_dist_start: 40.0, total_dist_end: 35.0, ..Default::default() },
            winner: None,
        };
        assert_eq!(outcome.leader_by_distance(), Some(AgentKind::Max));
        outcome.mcts.total_dist_end = 20.0;
        assert_eq!(outcome.leader_by_distance(), Some(AgentKind::Mcts));
        outcome.mcts.total_dist_end = 30.0;
        assert_eq!(outcome.leader_by_distance(), None);
    }

    #[test]
    fn test_avg_progress() {
        let stats = PlayerStats { moves: 4, progress_sum: 6.0, ..Default::default() };
        assert_eq!(stats.avg_progress_per_move(), 1.5);
        assert_eq!(PlayerStats::default().avg_progress_per_move(), 0.0);
    }

    #[test]
    fn test_rejects_bad_decisions() {
        let mut snap = standard_snapshot(&["max", "mcts"]).unwrap();
        let own = snap.pieces.iter().find(|p| p.owner == "max" && p.position == Some(key("3-3"))).unwrap().id.clone();
        let foreign = snap.pieces.iter().find(|p| p.owner == "mcts").unwrap().id.clone();

        let unknown = Decision::new(AgentKind::Max, "nope", key("3-3"), key("4-4"), 0.0);
        assert!(matches!(apply_decision(&mut snap, &unknown, "max", 1), Err(ArenaError::UnknownPiece { .. })));

        let theirs = Decision::new(AgentKind::Max, foreign, key("3-13"), key("4-12"), 0.0);
        assert!(matches!(apply_decision(&mut snap, &theirs, "max", 1), Err(ArenaError::ForeignPiece { .. })));

        let moved = Decision::new(AgentKind::Max, own.clone(), key("2-3"), key("2-4"), 0.0);
        assert!(matches!(apply_decision(&mut snap, &moved, "max", 1), Err(ArenaError::OriginMismatch { .. })));

        let far = Decision::new(AgentKind::Max, own.clone(), key("3-3"), key("6-6"), 0.0);
        assert!(matches!(apply_decision(&mut snap, &far, "max", 1), Err(ArenaError::InvalidMove { .. })));

        // A two-hop turn may not contain a simple step
        let mut mixed = Decision::new(AgentKind::Max, own, key("3-3"), key("4-5"), 0.0);
        mixed.hop_sequence = Some(vec![
            Hop { origin: key("3-3"), destination: key("3-4") },
            Hop { origin: key("3-4"), destination: key("4-5") },
        ]);
        assert!(matches!(apply_decision(&mut snap, &mixed, "max", 1), Err(ArenaError::InvalidMove { .. })));
    }

    #[test]
    fn test_rejects_destination_off_the_hops() {
        let mut snap = standard_snapshot(&["max", "mcts"]).unwrap();
        let idx = snap.pieces.iter().position(|p| p.owner == "max" && p.position == Some(key("3-3"))).unwrap();
        let own = snap.pieces[idx].id.clone();

        // The step itself is legal but ends on 7-4, not the claimed 8-4
        let mut decision = Decision::new(AgentKind::Max, own, key("3-3"), key("8-4"), 0.0);
        decision.hop_sequence = Some(vec![Hop { origin: key("3-3"), destination: key("7-4") }]);
        assert_eq!(
            apply_decision(&mut snap, &decision, "max", 2),
            Err(ArenaError::DestinationMismatch {
                turn: 2,
                suggested: key("8-4"),
                actual: key("7-4"),
            })
        );
        assert_eq!(snap.pieces[idx].position, Some(key("3-3")));
    }

    #[test]
    fn test_applies_valid_decision() {
        let mut snap = standard_snapshot(&["max", "mcts"]).unwrap();
        let request = SuggestRequest::new("max");
        let decision = MaxAgent::default().suggest_move(&snap, &request).unwrap();
        apply_decision(&mut snap, &decision, "max", 1).unwrap();
        let piece = snap.pieces.iter().find(|p| p.id == decision.piece_id).unwrap();
        assert_eq!(piece.position, Some(decision.destination));
    }
}
