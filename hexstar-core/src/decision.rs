//! Agent output and the agent interface

use crate::board::PositionKey;
use crate::error::SuggestError;
use crate::moves::Hop;
use crate::snapshot::{Snapshot, SuggestRequest};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which agent produced a decision
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Max,
    Mcts,
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentKind::Max => write!(f, "max"),
            AgentKind::Mcts => write!(f, "mcts"),
        }
    }
}

/// One suggested turn
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub piece_id: String,
    pub origin: PositionKey,
    pub destination: PositionKey,
    pub agent: AgentKind,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulations: Option<u32>,
    /// Every hop of a jump turn, in order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hop_sequence: Option<Vec<Hop>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<crate::max::ScoreDetail>,
}

impl Decision {
    pub fn new(agent: AgentKind, piece_id: impl Into<String>, origin: PositionKey, destination: PositionKey, score: f64) -> Self {
        Self {
            piece_id: piece_id.into(),
            origin,
            destination,
            agent,
            score,
            estimated_value: None,
            simulations: None,
            hop_sequence: None,
            baseline: None,
            delta: None,
            detail: None,
        }
    }

    pub fn is_jump_chain(&self) -> bool {
        self.hop_sequence.is_some()
    }

    /// Hops to replay: the chain when present, otherwise the single step
    pub fn hops(&self) -> Vec<Hop> {
        match &self.hop_sequence {
            Some(hops) => hops.clone(),
            None => vec![Hop { origin: self.origin, destination: self.destination }],
        }
    }
}

/// A move-suggestion agent
pub trait MoveAgent: Send + Sync {
    fn kind(&self) -> AgentKind;

    fn suggest_move(&self, snapshot: &Snapshot, request: &SuggestRequest) -> Result<Decision, SuggestError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> PositionKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_decision_json_shape() {
        let mut d = Decision::new(AgentKind::Mcts, "p1", key("0-4"), key("4-4"), 3.0);
        d.simulations = Some(14);
        d.hop_sequence = Some(vec![
            Hop { origin: key("0-4"), destination: key("2-4") },
            Hop { origin: key("2-4"), destination: key("4-4") },
        ]);
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["agent"], "mcts");
        assert_eq!(json["origin"], "0-4");
        assert_eq!(json["hop_sequence"][1]["destination"], "4-4");
        assert!(json.get("baseline").is_none());

        let back: Decision = serde_json::from_value(json).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn test_single_step_hops() {
        let d = Decision::new(AgentKind::Max, "p1", key("0-0"), key("0-1"), 0.0);
        assert!(!d.is_jump_chain());
        assert_eq!(d.hops(), vec![Hop { origin: key("0-0"), destination: key("0-1") }]);
    }
}
