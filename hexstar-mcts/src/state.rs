//! Immutable game state used by the search
//!
//! A state is a value: [`GameState::apply`] returns a new state and leaves
//! the original untouched. Everything that never changes during a search
//! (players, goals, piece owners) lives in a shared [`Roster`].
//!
//! ## Architecture
//! - Level 2: construction from a snapshot, move application
//! - Level 3: legal turn-moves, winner, goal distances

use hexstar_core::{
    jump_chains, simple_moves, HomeZone, Occupancy, PositionKey, Snapshot, SuggestError, TurnMove,
};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Data shared by every state of one search
#[derive(Debug)]
pub struct Roster {
    /// Player ids in turn order
    pub players: Vec<String>,
    /// Goal zone per player, same order
    pub goals: Vec<HomeZone>,
    pub piece_ids: Vec<String>,
    /// Owning player index per piece; None for pieces of non-participants
    pub owners: Vec<Option<usize>>,
    pub allow_simple: bool,
}

/// Snapshot of a match during search
#[derive(Clone, Debug)]
pub struct GameState {
    roster: Arc<Roster>,
    positions: Vec<Option<PositionKey>>,
    current: usize,
    last_move: Option<TurnMove>,
}

impl GameState {
    // ========================================================================
    // Level 2: Construction and transitions
    // ========================================================================

    /// Build the root state with `player` to move
    pub fn from_snapshot(snapshot: &Snapshot, player: &str, allow_simple: bool) -> Result<Self, SuggestError> {
        if snapshot.players.is_empty() {
            return Err(SuggestError::NoPlayers);
        }
        let current = snapshot
            .players
            .iter()
            .position(|p| p == player)
            .ok_or_else(|| SuggestError::PlayerNotInMatch(player.to_string()))?;

        let goals = snapshot
            .players
            .iter()
            .map(|p| snapshot.resolve_goal(p))
            .collect::<Result<Vec<_>, _>>()?;

        let owners = snapshot
            .pieces
            .iter()
            .map(|piece| snapshot.players.iter().position(|p| *p == piece.owner))
            .collect();

        let roster = Roster {
            players: snapshot.players.clone(),
            goals,
            piece_ids: snapshot.pieces.iter().map(|p| p.id.clone()).collect(),
            owners,
            allow_simple,
        };

        Ok(Self {
            roster: Arc::new(roster),
            positions: snapshot.pieces.iter().map(|p| p.position).collect(),
            current,
            last_move: None,
        })
    }

    /// New state with `mv` played and the turn passed on
    pub fn apply(&self, mv: &TurnMove) -> GameState {
        let mut positions = self.positions.clone();
        if let Some(slot) = positions.get_mut(mv.piece) {
            *slot = Some(mv.destination);
        }
        GameState {
            roster: Arc::clone(&self.roster),
            positions,
            current: (self.current + 1) % self.roster.players.len(),
            last_move: Some(mv.clone()),
        }
    }

    // ========================================================================
    // Level 3: Queries
    // ========================================================================

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Index of the player to move
    pub fn current_player(&self) -> usize {
        self.current
    }

    pub fn player_index(&self, id: &str) -> Option<usize> {
        self.roster.players.iter().position(|p| p == id)
    }

    pub fn piece_id(&self, piece: usize) -> &str {
        &self.roster.piece_ids[piece]
    }

    pub fn position(&self, piece: usize) -> Option<PositionKey> {
        self.positions.get(piece).copied().flatten()
    }

    /// Move that produced this state
    pub fn last_move(&self) -> Option<&TurnMove> {
        self.last_move.as_ref()
    }

    pub fn occupied(&self) -> Occupancy {
        self.positions.iter().flatten().copied().collect()
    }

    fn pieces_of(&self, player: usize) -> impl Iterator<Item = (usize, PositionKey)> + '_ {
        self.positions
            .iter()
            .enumerate()
            .filter(move |(i, _)| self.roster.owners[*i] == Some(player))
            .filter_map(|(i, pos)| pos.map(|p| (i, p)))
    }

    /// Whole-turn moves for the player to move
    ///
    /// One entry per simple step and per maximal jump chain. When several
    /// turns bring the same piece to the same cell only the shortest is kept.
    pub fn legal_moves(&self) -> Vec<TurnMove> {
        let occupied = self.occupied();
        let mut moves: Vec<TurnMove> = Vec::new();
        let mut seen: FxHashMap<(usize, PositionKey), usize> = FxHashMap::default();

        let mut push = |mv: TurnMove| {
            let len = mv.chain.as_ref().map_or(1, |c| c.hop_count());
            match seen.get(&(mv.piece, mv.destination)) {
                Some(&idx) => {
                    let existing = moves[idx].chain.as_ref().map_or(1, |c| c.hop_count());
                    if len < existing {
                        moves[idx] = mv;
                    }
                }
                None => {
                    seen.insert((mv.piece, mv.destination), moves.len());
                    moves.push(mv);
                }
            }
        };

        for (piece, origin) in self.pieces_of(self.current) {
            if self.roster.allow_simple {
                for dest in simple_moves(origin, &occupied) {
                    push(TurnMove::simple(piece, origin, dest));
                }
            }
            for chain in jump_chains(origin, &occupied) {
                push(TurnMove::jump(piece, chain));
            }
        }
        moves
    }

    /// First player, in turn order, with every piece inside its goal
    pub fn winner(&self) -> Option<usize> {
        (0..self.roster.players.len()).find(|&player| {
            let goal = self.roster.goals[player];
            let mut any = false;
            for (_, pos) in self.pieces_of(player) {
                if !goal.contains(pos) {
                    return false;
                }
                any = true;
            }
            any
        })
    }

    pub fn is_terminal(&self) -> bool {
        self.winner().is_some()
    }

    /// Sum of goal distances over a player's pieces
    pub fn remaining_distance(&self, player: usize) -> i32 {
        let goal = self.roster.goals[player];
        self.pieces_of(player).map(|(_, pos)| goal.distance_from(pos)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexstar_core::{standard_snapshot, validate_turn, ActiveTurn, Piece};

    fn key(s: &str) -> PositionKey {
        s.parse().unwrap()
    }

    fn duel(pieces: Vec<Piece>) -> Snapshot {
        Snapshot {
            pieces,
            players: vec!["p".into(), "q".into()],
            turn: Some(ActiveTurn { number: 1, player: "p".into() }),
        }
    }

    #[test]
    fn test_from_snapshot_errors() {
        let mut snap = duel(vec![Piece::new("p1", "p", "0-white", Some(key("0-0")))]);
        assert!(matches!(
            GameState::from_snapshot(&snap, "q", true),
            Err(SuggestError::UnresolvedGoalZone { .. })
        ));
        assert!(matches!(
            GameState::from_snapshot(&snap, "z", true),
            Err(SuggestError::PlayerNotInMatch(_))
        ));
        snap.players.clear();
        assert!(matches!(GameState::from_snapshot(&snap, "p", true), Err(SuggestError::NoPlayers)));
    }

    #[test]
    fn test_apply_is_pure() {
        let snap = standard_snapshot(&["p", "q"]).unwrap();
        let state = GameState::from_snapshot(&snap, "p", true).unwrap();
        let moves = state.legal_moves();
        assert!(!moves.is_empty());

        let next = state.apply(&moves[0]);
        assert_eq!(state.current_player(), 0);
        assert_eq!(next.current_player(), 1);
        assert_eq!(state.position(moves[0].piece), Some(moves[0].origin));
        assert_eq!(next.position(moves[0].piece), Some(moves[0].destination));
        assert_eq!(next.last_move(), Some(&moves[0]));
    }

    #[test]
    fn test_legal_moves_are_valid_turns() {
        let snap = standard_snapshot(&["p", "q"]).unwrap();
        let state = GameState::from_snapshot(&snap, "p", true).unwrap();
        let occupied = state.occupied();
        for mv in state.legal_moves() {
            assert!(validate_turn(&mv.hops(), &occupied, true).is_ok(), "{:?}", mv);
            let next = state.apply(&mv);
            assert_eq!(next.occupied().len(), occupied.len());
        }
    }

    #[test]
    fn test_jumps_only_state() {
        let snap = duel(vec![
            Piece::new("p1", "p", "1-blue", Some(key("0-4"))),
            Piece::new("q1", "q", "5-yellow", Some(key("1-4"))),
        ]);
        let state = GameState::from_snapshot(&snap, "p", false).unwrap();
        let moves = state.legal_moves();
        assert_eq!(moves.len(), 1);
        assert!(moves[0].is_jump());
        assert_eq!(moves[0].destination, key("2-4"));
    }

    #[test]
    fn test_no_duplicate_destinations() {
        let snap = standard_snapshot(&["p", "q"]).unwrap();
        let state = GameState::from_snapshot(&snap, "p", true).unwrap();
        let moves = state.legal_moves();
        let mut keys: Vec<_> = moves.iter().map(|m| (m.piece, m.destination)).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), moves.len());
    }

    #[test]
    fn test_winner_detection() {
        let goal = HomeZone::new(3).unwrap();
        let mut pieces: Vec<Piece> = goal
            .cells()
            .iter()
            .enumerate()
            .map(|(i, &c)| Piece::new(format!("p{}", i), "p", "0-white", Some(c)))
            .collect();
        pieces.push(Piece::new("q1", "q", "3-black", Some(key("4-8"))));
        let state = GameState::from_snapshot(&duel(pieces), "q", true).unwrap();
        assert_eq!(state.winner(), Some(0));
        assert_eq!(state.remaining_distance(0), 0);
        assert!(state.remaining_distance(1) > 0);
    }
}
