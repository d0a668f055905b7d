//! Search-based agent
//!
//! Validates the request, builds the root [`GameState`], runs the search and
//! turns the chosen root move into a [`Decision`].

use crate::rollout::RolloutEngine;
use crate::search::{run_search, SearchResult};
use crate::state::GameState;
use crate::tree::MctsTree;
use crate::MctsConfig;
use hexstar_core::{AgentKind, Decision, LastMove, MoveAgent, Snapshot, SuggestError, SuggestRequest, TurnMove};
use tracing::{debug, warn};

/// MCTS player
#[derive(Clone, Debug, Default)]
pub struct MctsAgent {
    config: MctsConfig,
}

impl MctsAgent {
    pub fn new(config: MctsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Input checks that come before any search
    fn check_request(snapshot: &Snapshot, player: &str) -> Result<(), SuggestError> {
        if player.is_empty() {
            return Err(SuggestError::MissingPlayer);
        }
        if snapshot.pieces.is_empty() {
            return Err(SuggestError::EmptySnapshot);
        }
        if snapshot.players.is_empty() {
            return Err(SuggestError::NoPlayers);
        }
        if !snapshot.players.iter().any(|p| p == player) {
            return Err(SuggestError::PlayerNotInMatch(player.to_string()));
        }
        if snapshot.piece_indices(player).next().is_none() {
            return Err(SuggestError::NoPlayerPieces(player.to_string()));
        }
        match &snapshot.turn {
            None => return Err(SuggestError::NoActiveTurn),
            Some(turn) if turn.player != player => {
                return Err(SuggestError::NotPlayersTurn {
                    active: turn.player.clone(),
                    requested: player.to_string(),
                })
            }
            Some(_) => {}
        }
        snapshot.validate()
    }

    /// Does `mv` undo the requester's previous move?
    fn undoes(mv: &TurnMove, state: &GameState, last: &LastMove) -> bool {
        let same_piece = last.piece_id.as_deref().map_or(true, |id| id == state.piece_id(mv.piece));
        same_piece && last.is_reversed_by(mv.origin, mv.destination)
    }

    fn decision_for(state: &GameState, mv: &TurnMove, score: f64) -> Decision {
        let mut decision = Decision::new(
            AgentKind::Mcts,
            state.piece_id(mv.piece),
            mv.origin,
            mv.destination,
            score,
        );
        decision.hop_sequence = mv.chain.as_ref().map(|c| c.hops());
        decision
    }

    /// Pick the move to play from a finished search
    fn choose<'a>(&self, result: &'a SearchResult, root_moves: &'a [TurnMove]) -> &'a TurnMove {
        match result.best_move() {
            Some(mv) => mv,
            None => {
                warn!("search tree has no chosen root move, falling back to first legal move");
                &root_moves[0]
            }
        }
    }
}

impl MoveAgent for MctsAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Mcts
    }

    fn suggest_move(&self, snapshot: &Snapshot, request: &SuggestRequest) -> Result<Decision, SuggestError> {
        let player = request.player.as_str();
        Self::check_request(snapshot, player)?;

        let state = GameState::from_snapshot(snapshot, player, request.allow_simple)?;
        let root_moves = state.legal_moves();

        match root_moves.len() {
            0 => return Err(SuggestError::NoLegalMoves(player.to_string())),
            1 => {
                let mut decision = Self::decision_for(&state, &root_moves[0], 0.0);
                decision.simulations = Some(0);
                return Ok(decision);
            }
            _ => {}
        }

        let iterations = self.config.iterations_for(root_moves.len());
        let seed = self.config.seed.unwrap_or_else(rand::random);
        let requester = state.current_player();
        let mut engine = RolloutEngine::new(self.config.rollout_depth, requester, seed);
        let tree = MctsTree::new(state.clone(), requester);
        let result = run_search(tree, iterations, self.config.exploration, &mut engine);

        let mut chosen = self.choose(&result, &root_moves);
        if let Some(last) = &request.last_move {
            if Self::undoes(chosen, &state, last) {
                if let Some(alt) = root_moves.iter().find(|mv| !Self::undoes(mv, &state, last)) {
                    debug!(from = %chosen.origin, to = %chosen.destination, "avoiding reversal of previous move");
                    chosen = alt;
                }
            }
        }

        let (score, estimated) = match result.stats_for(chosen) {
            Some(stats) if stats.visits > 0 => (stats.value, Some(stats.mean)),
            Some(stats) => (stats.value, None),
            None => (0.0, None),
        };

        debug!(
            player,
            iterations,
            root_moves = root_moves.len(),
            nodes = result.tree.len(),
            from = %chosen.origin,
            to = %chosen.destination,
            "mcts agent decision"
        );

        let mut decision = Self::decision_for(&state, chosen, score);
        decision.simulations = Some(iterations);
        decision.estimated_value = estimated;
        Ok(decision)
    }
}
