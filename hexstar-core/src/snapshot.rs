//! Match snapshot handed to the agents
//!
//! A snapshot is everything an agent may look at: every piece of the match,
//! the participation order and the currently open turn. Agents never keep
//! state between calls, so the requester's previous move travels in the
//! [`SuggestRequest`].

use crate::board::PositionKey;
use crate::error::SuggestError;
use crate::goals::HomeZone;
use crate::moves::Occupancy;
use anyhow::Context;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A single piece of the match
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    pub id: String,
    pub owner: String,
    /// `"<zone>-<colour>"`, e.g. `"0-white"`
    pub zone_tag: String,
    pub position: Option<PositionKey>,
}

impl Piece {
    pub fn new(id: impl Into<String>, owner: impl Into<String>, zone_tag: impl Into<String>, position: Option<PositionKey>) -> Self {
        Self {
            id: id.into(),
            owner: owner.into(),
            zone_tag: zone_tag.into(),
            position,
        }
    }

    /// Zone this piece started in
    pub fn home_zone(&self) -> Option<HomeZone> {
        HomeZone::from_tag(&self.zone_tag)
    }
}

/// The turn currently open in the match
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveTurn {
    pub number: u32,
    pub player: String,
}

/// Pieces, participation order and open turn of one match
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub pieces: Vec<Piece>,
    /// Player ids in participation order
    #[serde(default)]
    pub players: Vec<String>,
    #[serde(default)]
    pub turn: Option<ActiveTurn>,
}

impl Snapshot {
    /// Load a snapshot from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading snapshot {}", path.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&content)
            .with_context(|| format!("parsing snapshot {}", path.display()))?;
        Ok(snapshot)
    }

    /// Cells holding any piece, whatever its owner
    pub fn occupied(&self) -> Occupancy {
        self.pieces.iter().filter_map(|p| p.position).collect()
    }

    /// Reject snapshots where two pieces share a cell
    pub fn validate(&self) -> Result<(), SuggestError> {
        let mut seen = FxHashSet::default();
        for pos in self.pieces.iter().filter_map(|p| p.position) {
            if !seen.insert(pos) {
                return Err(SuggestError::DuplicatePosition(pos));
            }
        }
        Ok(())
    }

    /// Indices of the pieces owned by `player`
    pub fn piece_indices<'a>(&'a self, player: &'a str) -> impl Iterator<Item = usize> + 'a {
        self.pieces
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.owner == player)
            .map(|(i, _)| i)
    }

    /// Positions of the on-board pieces of `player`
    pub fn positions_of(&self, player: &str) -> Vec<PositionKey> {
        self.pieces
            .iter()
            .filter(|p| p.owner == player)
            .filter_map(|p| p.position)
            .collect()
    }

    /// First non-empty zone tag among `player`'s pieces
    pub fn zone_tag_of(&self, player: &str) -> Option<&str> {
        self.pieces
            .iter()
            .find(|p| p.owner == player && !p.zone_tag.is_empty())
            .map(|p| p.zone_tag.as_str())
    }

    /// Home zone of `player`, read from its first tagged piece
    pub fn home_zone_of(&self, player: &str) -> Option<HomeZone> {
        self.zone_tag_of(player).and_then(HomeZone::from_tag)
    }

    /// Goal zone of `player`, or an error naming the tag that failed to parse
    pub fn resolve_goal(&self, player: &str) -> Result<HomeZone, SuggestError> {
        self.goal_zone_of(player).ok_or_else(|| SuggestError::UnresolvedGoalZone {
            player: player.to_string(),
            tag: self.zone_tag_of(player).map(str::to_string),
        })
    }

    /// Goal zone of `player`: the zone opposite its home
    pub fn goal_zone_of(&self, player: &str) -> Option<HomeZone> {
        self.home_zone_of(player).map(|zone| zone.opposite())
    }

    /// True when `player` has pieces on the board and all of them sit in its goal
    pub fn has_won(&self, player: &str) -> bool {
        let Some(goal) = self.goal_zone_of(player) else {
            return false;
        };
        let positions = self.positions_of(player);
        !positions.is_empty() && positions.iter().all(|&pos| goal.contains(pos))
    }

    /// Common input checks for a suggestion; returns the requester's goal zone
    pub fn requester_goal(&self, player: &str) -> Result<HomeZone, SuggestError> {
        if player.is_empty() {
            return Err(SuggestError::MissingPlayer);
        }
        if self.pieces.is_empty() {
            return Err(SuggestError::EmptySnapshot);
        }
        if self.piece_indices(player).next().is_none() {
            return Err(SuggestError::NoPlayerPieces(player.to_string()));
        }
        self.validate()?;
        self.resolve_goal(player)
    }

    /// Move one piece; the caller is responsible for legality
    pub fn relocate(&mut self, piece: usize, destination: PositionKey) {
        if let Some(p) = self.pieces.get_mut(piece) {
            p.position = Some(destination);
        }
    }

    /// Open turn for the next player in participation order
    pub fn advance_turn(&mut self) {
        if self.players.is_empty() {
            self.turn = None;
            return;
        }
        let (number, next) = match &self.turn {
            Some(turn) => {
                let idx = self.players.iter().position(|p| *p == turn.player).unwrap_or(0);
                (turn.number + 1, (idx + 1) % self.players.len())
            }
            None => (1, 0),
        };
        self.turn = Some(ActiveTurn {
            number,
            player: self.players[next].clone(),
        });
    }
}

/// The requester's previous move, used against back-and-forth play
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastMove {
    #[serde(default)]
    pub piece_id: Option<String>,
    pub origin: PositionKey,
    pub destination: PositionKey,
}

impl LastMove {
    /// True when `origin -> destination` undoes this move
    pub fn is_reversed_by(&self, origin: PositionKey, destination: PositionKey) -> bool {
        self.destination == origin && self.origin == destination
    }

    pub fn moved_piece(&self, piece_id: &str) -> bool {
        self.piece_id.as_deref() == Some(piece_id)
    }
}

fn default_allow_simple() -> bool {
    true
}

/// Who is asking, and under which constraints
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestRequest {
    pub player: String,
    /// When false only jumps are considered
    #[serde(default = "default_allow_simple")]
    pub allow_simple: bool,
    #[serde(default)]
    pub last_move: Option<LastMove>,
}

impl SuggestRequest {
    pub fn new(player: impl Into<String>) -> Self {
        Self {
            player: player.into(),
            allow_simple: true,
            last_move: None,
        }
    }

    pub fn jumps_only(mut self) -> Self {
        self.allow_simple = false;
        self
    }

    pub fn with_last_move(mut self, last_move: LastMove) -> Self {
        self.last_move = Some(last_move);
        self
    }
}
