//! MCTS Tree structure and node management
//!
//! Uses arena allocation: the tree owns every state, nodes point to their
//! parent by index.
//!
//! ## Architecture
//! - Level 2: Tree operations (select_leaf, expand, backpropagate)
//! - Level 3: UCB1 calculation, node accessors
//! - Level 4: Statistics

use crate::state::GameState;
use hexstar_core::TurnMove;

// ============================================================================
// TYPES
// ============================================================================

/// Node identifier (index into arena)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

/// Statistics for a tree node
#[derive(Clone, Debug, Default)]
pub struct NodeStats {
    pub visits: u32,
    /// Sum of backed-up values, from the requester's point of view
    pub value: f64,
}

impl NodeStats {
    /// Mean value; 0 for unvisited nodes
    pub fn mean(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.value / self.visits as f64
        }
    }
}

/// A node in the MCTS tree
#[derive(Clone, Debug)]
pub struct MctsNode {
    pub state: GameState,
    pub parent: Option<NodeId>,
    /// Move that led to this node (None for root)
    pub incoming_move: Option<TurnMove>,
    pub children: Vec<NodeId>,
    pub expanded: bool,
    pub terminal: bool,
    pub stats: NodeStats,
}

impl MctsNode {
    pub fn new(state: GameState, parent: Option<NodeId>, incoming_move: Option<TurnMove>) -> Self {
        let terminal = state.is_terminal();
        Self {
            state,
            parent,
            incoming_move,
            children: Vec::new(),
            expanded: false,
            terminal,
            stats: NodeStats::default(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

// ============================================================================
// MCTS TREE (Level 2 - Tree Operations)
// ============================================================================

/// MCTS search tree with arena allocation
#[derive(Debug)]
pub struct MctsTree {
    nodes: Vec<MctsNode>,
    /// Player index the values are scored for
    requester: usize,
}

impl MctsTree {
    /// Create a tree whose values favour `requester`
    pub fn new(root_state: GameState, requester: usize) -> Self {
        Self {
            nodes: vec![MctsNode::new(root_state, None, None)],
            requester,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn requester(&self) -> usize {
        self.requester
    }

    pub fn get(&self, id: NodeId) -> &MctsNode {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walk down by UCB1 until reaching a node without children
    pub fn select_leaf(&self, exploration: f64) -> NodeId {
        let mut current = self.root();
        while !self.get(current).terminal {
            match self.select_best_child(current, exploration) {
                Some(child) => current = child,
                None => break,
            }
        }
        current
    }

    /// Add one child per legal turn-move
    ///
    /// Returns the first new child, or None when the node is terminal,
    /// already expanded or has no legal move.
    pub fn expand(&mut self, node_id: NodeId) -> Option<NodeId> {
        let node = self.get(node_id);
        if node.terminal || node.expanded {
            return None;
        }

        let moves = node.state.legal_moves();
        let children: Vec<MctsNode> = moves
            .into_iter()
            .map(|mv| MctsNode::new(node.state.apply(&mv), Some(node_id), Some(mv)))
            .collect();

        let first = self.nodes.len();
        let ids: Vec<NodeId> = (first..first + children.len()).map(NodeId).collect();
        self.nodes.extend(children);

        let node = self.get_mut(node_id);
        node.expanded = true;
        node.children = ids;
        node.children.first().copied()
    }

    /// Add a visit and `value` to every node from `leaf_id` up to the root
    pub fn backpropagate(&mut self, leaf_id: NodeId, value: f64) {
        let mut current = Some(leaf_id);
        while let Some(node_id) = current {
            let node = self.get_mut(node_id);
            node.stats.visits += 1;
            node.stats.value += value;
            current = node.parent;
        }
    }

    // ========================================================================
    // Level 3: Selection Helpers
    // ========================================================================

    /// Child with the highest UCB1; the first one wins ties
    fn select_best_child(&self, node_id: NodeId, exploration: f64) -> Option<NodeId> {
        let node = self.get(node_id);
        let parent_visits = node.stats.visits;
        let sign = if node.state.current_player() == self.requester { 1.0 } else { -1.0 };

        let mut best: Option<(NodeId, f64)> = None;
        for &child in &node.children {
            let ucb = self.ucb1(child, parent_visits, exploration, sign);
            if best.map_or(true, |(_, b)| ucb > b) {
                best = Some((child, ucb));
            }
        }
        best.map(|(id, _)| id)
    }

    /// UCB1 = sign * value/visits + C * sqrt(ln(parent_visits) / visits)
    ///
    /// `sign` is negative when an opponent picks at the parent, so they
    /// prefer children that are bad for the requester.
    fn ucb1(&self, node_id: NodeId, parent_visits: u32, exploration: f64, sign: f64) -> f64 {
        let stats = &self.get(node_id).stats;
        if stats.visits == 0 {
            return f64::INFINITY;
        }
        let exploitation = sign * stats.mean();
        let exploration_term = exploration * ((parent_visits.max(1) as f64).ln() / stats.visits as f64).sqrt();
        exploitation + exploration_term
    }

    // ========================================================================
    // Level 4: Best Move Selection
    // ========================================================================

    /// Root child with the most visits, then the highest value sum
    pub fn best_child(&self) -> Option<NodeId> {
        let root = self.get(self.root());
        let mut best: Option<NodeId> = None;
        for &child in &root.children {
            let better = match best {
                None => true,
                Some(b) => {
                    let (c, b) = (&self.get(child).stats, &self.get(b).stats);
                    c.visits > b.visits || (c.visits == b.visits && c.value > b.value)
                }
            };
            if better {
                best = Some(child);
            }
        }
        best
    }

    /// Root child reached by `mv`
    pub fn child_for(&self, mv: &TurnMove) -> Option<NodeId> {
        self.get(self.root())
            .children
            .iter()
            .copied()
            .find(|&id| self.get(id).incoming_move.as_ref() == Some(mv))
    }

    /// Total simulations run (root visits)
    pub fn total_simulations(&self) -> u32 {
        self.get(self.root()).stats.visits
    }
}

// ============================================================================
// TESTS
// ============================================================================
