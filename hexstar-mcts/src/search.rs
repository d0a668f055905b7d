//! MCTS Search Loop
//!
//! Implements the core MCTS algorithm:
//! 1. Selection - Use UCB1 to traverse tree
//! 2. Expansion - Add every child of the leaf
//! 3. Simulation - Random rollout from the first new child
//! 4. Backpropagation - Update statistics
//!
//! ## Architecture
//! - Level 2: Search loop coordination
//! - Level 3: Individual MCTS phases
//! - Level 4: Utilities

use crate::rollout::RolloutEngine;
use crate::tree::{MctsTree, NodeId};
use hexstar_core::TurnMove;

// ============================================================================
// SEARCH RESULT
// ============================================================================

/// Result of MCTS search
#[derive(Debug)]
pub struct SearchResult {
    /// The final tree after search
    pub tree: MctsTree,
    pub total_simulations: u32,
    /// Statistics for each root move
    pub move_stats: Vec<MoveStatistics>,
}

/// Statistics for a single move at root
#[derive(Clone, Debug)]
pub struct MoveStatistics {
    pub mv: TurnMove,
    pub visits: u32,
    pub value: f64,
    pub mean: f64,
}

impl SearchResult {
    /// Root move with the best (visits, value)
    pub fn best_move(&self) -> Option<&TurnMove> {
        self.tree
            .best_child()
            .and_then(|id| self.tree.get(id).incoming_move.as_ref())
    }

    /// Statistics for one root move
    pub fn stats_for(&self, mv: &TurnMove) -> Option<&MoveStatistics> {
        self.move_stats.iter().find(|s| s.mv == *mv)
    }

    /// All moves sorted by visits
    pub fn moves_by_visits(&self) -> Vec<(&TurnMove, u32)> {
        let mut moves: Vec<_> = self.move_stats.iter().map(|s| (&s.mv, s.visits)).collect();
        moves.sort_by(|a, b| b.1.cmp(&a.1));
        moves
    }
}

// ============================================================================
// SEARCH LOOP (Level 2 - Main Coordination)
// ============================================================================

/// Run `iterations` MCTS iterations on `tree`
pub fn run_search(
    mut tree: MctsTree,
    iterations: u32,
    exploration: f64,
    rollout_engine: &mut RolloutEngine,
) -> SearchResult {
    for _ in 0..iterations {
        run_single_iteration(&mut tree, exploration, rollout_engine);
    }

    let total_simulations = tree.total_simulations();
    let move_stats = collect_move_statistics(&tree);

    SearchResult {
        tree,
        total_simulations,
        move_stats,
    }
}

// ============================================================================
// ITERATION (Level 3)
// ============================================================================

/// Single MCTS iteration
pub fn run_single_iteration(tree: &mut MctsTree, exploration: f64, rollout_engine: &mut RolloutEngine) {
    // Phase 1: Selection
    let leaf_id = tree.select_leaf(exploration);

    // Phase 2: Expansion
    let simulation_node = tree.expand(leaf_id).unwrap_or(leaf_id);

    // Phase 3: Simulation
    let value = simulate_node(tree, simulation_node, rollout_engine);

    // Phase 4: Backpropagation
    tree.backpropagate(simulation_node, value);
}

/// Rollout value of a node; a terminal node is scored without playing on
fn simulate_node(tree: &MctsTree, node_id: NodeId, rollout_engine: &mut RolloutEngine) -> f64 {
    rollout_engine.run(&tree.get(node_id).state).value
}

// ============================================================================
// STATISTICS COLLECTION (Level 4 - Utilities)
// ============================================================================

/// Collect statistics for root moves
fn collect_move_statistics(tree: &MctsTree) -> Vec<MoveStatistics> {
    let root = tree.get(tree.root());
    root.children
        .iter()
        .filter_map(|&id| {
            let child = tree.get(id);
            let mv = child.incoming_move.clone()?;
            Some(MoveStatistics {
                mv,
                visits: child.stats.visits,
                value: child.stats.value,
                mean: child.stats.mean(),
            })
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::GameState;
    use hexstar_core::standard_snapshot;

    fn opening_tree() -> MctsTree {
        let snap = standard_snapshot(&["p", "q"]).unwrap();
        MctsTree::new(GameState::from_snapshot(&snap, "p", true).unwrap(), 0)
    }

    #[test]
    fn test_iterations_count_root_visits() {
        let mut engine = RolloutEngine::new(10, 0, 3);
        let result = run_search(opening_tree(), 12, 1.41, &mut engine);
        assert_eq!(result.total_simulations, 12);
        let child_visits: u32 = result.move_stats.iter().map(|s| s.visits).sum();
        assert_eq!(child_visits, 12);
    }

    #[test]
    fn test_best_move_is_root_move() {
        let tree = opening_tree();
        let root_moves = tree.get(NodeId::ROOT).state.legal_moves();
        let mut engine = RolloutEngine::new(10, 0, 9);
        let result = run_search(tree, 20, 1.41, &mut engine);
        let best = result.best_move().unwrap();
        assert!(root_moves.contains(best));
        assert!(result.stats_for(best).is_some());
        assert_eq!(result.moves_by_visits()[0].1, result.stats_for(best).unwrap().visits);
    }

    #[test]
    fn test_search_is_reproducible() {
        let run = |seed| {
            let mut engine = RolloutEngine::new(15, 0, seed);
            let result = run_search(opening_tree(), 25, 1.41, &mut engine);
            result.best_move().cloned()
        };
        assert_eq!(run(11), run(11));
    }
}
