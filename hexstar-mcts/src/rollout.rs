//! Rollout (simulation) for MCTS
//!
//! Plays uniformly random turn-moves from a state and scores the outcome
//! for the requesting player.
//!
//! ## Architecture
//! - Level 2: Rollout engine (owns the seeded generator)
//! - Level 3: Single rollout, outcome value
//! - Level 4: Random move selection

use crate::state::GameState;
use hexstar_core::TurnMove;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// ROLLOUT RESULT
// ============================================================================

/// Result of a rollout simulation
#[derive(Clone, Debug, PartialEq)]
pub struct RolloutResult {
    /// Value in [-1, 1] for the requester
    pub value: f64,
    pub moves_played: u32,
    /// Player index that completed its goal, if any
    pub winner: Option<usize>,
}

// ============================================================================
// VALUE (Level 3)
// ============================================================================

/// Value of a non-terminal state for `requester`
///
/// Compares the requester's remaining goal distance with the average of the
/// other players: positive when the requester is closer to finishing.
pub fn distance_value(state: &GameState, requester: usize) -> f64 {
    let players = state.roster().players.len();
    let mine = state.remaining_distance(requester) as f64;
    let others: Vec<f64> = (0..players)
        .filter(|&p| p != requester)
        .map(|p| state.remaining_distance(p) as f64)
        .collect();

    let value = if others.is_empty() {
        (1.0 - mine) / (1.0 + mine)
    } else {
        let avg_other = others.iter().sum::<f64>() / others.len() as f64;
        (avg_other - mine) / (avg_other + mine).max(1.0)
    };
    value.clamp(-1.0, 1.0)
}

/// +1 when the requester won, -1 when someone else did
fn winner_value(winner: usize, requester: usize) -> f64 {
    if winner == requester {
        1.0
    } else {
        -1.0
    }
}

/// Perform a single random rollout
///
/// Stops at a winner, at a player with no legal move (scored -1), or after
/// `max_depth` turns (scored by [`distance_value`]).
pub fn rollout<R: Rng>(state: &GameState, requester: usize, max_depth: u32, rng: &mut R) -> RolloutResult {
    let mut current = state.clone();
    let mut moves_played = 0;

    while moves_played < max_depth {
        if let Some(winner) = current.winner() {
            return RolloutResult {
                value: winner_value(winner, requester),
                moves_played,
                winner: Some(winner),
            };
        }

        let legal_moves = current.legal_moves();
        if legal_moves.is_empty() {
            return RolloutResult {
                value: -1.0,
                moves_played,
                winner: None,
            };
        }

        let mv = select_random_move(&legal_moves, rng);
        current = current.apply(mv);
        moves_played += 1;
    }

    let winner = current.winner();
    let value = match winner {
        Some(w) => winner_value(w, requester),
        None => distance_value(&current, requester),
    };
    RolloutResult {
        value,
        moves_played,
        winner,
    }
}

/// Select a random move uniformly from the list
fn select_random_move<'a, R: Rng>(moves: &'a [TurnMove], rng: &mut R) -> &'a TurnMove {
    let idx = rng.gen_range(0..moves.len());
    &moves[idx]
}

// ============================================================================
// ROLLOUT ENGINE (Level 2)
// ============================================================================

/// Runs rollouts with one seeded generator for the whole search
pub struct RolloutEngine {
    max_depth: u32,
    requester: usize,
    rng: ChaCha8Rng,
}

impl RolloutEngine {
    pub fn new(max_depth: u32, requester: usize, seed: u64) -> Self {
        Self {
            max_depth,
            requester,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn run(&mut self, state: &GameState) -> RolloutResult {
        rollout(state, self.requester, self.max_depth, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexstar_core::{standard_snapshot, ActiveTurn, HomeZone, Piece, PositionKey, Snapshot};

    fn key(s: &str) -> PositionKey {
        s.parse().unwrap()
    }

    fn opening() -> GameState {
        let snap = standard_snapshot(&["p", "q"]).unwrap();
        GameState::from_snapshot(&snap, "p", true).unwrap()
    }

    #[test]
    fn test_rollout_respects_depth() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let result = rollout(&opening(), 0, 6, &mut rng);
        assert!(result.moves_played <= 6);
        assert!((-1.0..=1.0).contains(&result.value));
    }

    #[test]
    fn test_seeded_rollouts_repeat() {
        let state = opening();
        let mut a = RolloutEngine::new(30, 0, 42);
        let mut b = RolloutEngine::new(30, 0, 42);
        for _ in 0..5 {
            assert_eq!(a.run(&state), b.run(&state));
        }
    }

    #[test]
    fn test_symmetric_opening_is_even() {
        let state = opening();
        assert_eq!(distance_value(&state, 0), 0.0);
        assert_eq!(distance_value(&state, 1), 0.0);
    }

    #[test]
    fn test_win_and_loss_values() {
        let goal = HomeZone::new(3).unwrap();
        let mut pieces: Vec<Piece> = goal
            .cells()
            .iter()
            .enumerate()
            .map(|(i, &c)| Piece::new(format!("p{}", i), "p", "0-white", Some(c)))
            .collect();
        pieces.push(Piece::new("q1", "q", "3-black", Some(key("4-8"))));
        let snap = Snapshot {
            pieces,
            players: vec!["p".into(), "q".into()],
            turn: Some(ActiveTurn { number: 9, player: "q".into() }),
        };
        let state = GameState::from_snapshot(&snap, "q", true).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let for_p = rollout(&state, 0, 10, &mut rng);
        assert_eq!(for_p.value, 1.0);
        assert_eq!(for_p.winner, Some(0));
        assert_eq!(for_p.moves_played, 0);

        let for_q = rollout(&state, 1, 10, &mut rng);
        assert_eq!(for_q.value, -1.0);
    }

    #[test]
    fn test_single_player_value() {
        let snap = Snapshot {
            pieces: vec![Piece::new("p1", "p", "0-white", Some(key("4-8")))],
            players: vec!["p".into()],
            turn: None,
        };
        let state = GameState::from_snapshot(&snap, "p", true).unwrap();
        let d = state.remaining_distance(0) as f64;
        assert_eq!(distance_value(&state, 0), ((1.0 - d) / (1.0 + d)).clamp(-1.0, 1.0));
    }
}
