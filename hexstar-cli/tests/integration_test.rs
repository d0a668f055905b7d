//! Integration tests for the HEXSTAR move suggester
//!
//! Tests the full stack: board geometry, move generation, both agents and
//! the comparison arena

use hexstar_arena::{run_series, ArenaConfig};
use hexstar_core::{
    all_positions, jump_chains, simple_moves, standard_snapshot, validate_turn, AgentKind, HomeZone, MaxAgent,
    MoveAgent, PositionKey, Snapshot, SuggestRequest, TurnMove, CELL_COUNT,
};
use hexstar_mcts::{MctsAgent, MctsConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn mcts() -> MctsAgent {
    MctsAgent::new(MctsConfig::default().with_seed(5))
}

/// All whole-turn moves of `player`, simple steps and maximal chains
fn turn_moves(snapshot: &Snapshot, player: &str) -> Vec<TurnMove> {
    let occupied = snapshot.occupied();
    let mut moves = Vec::new();
    for idx in snapshot.piece_indices(player) {
        let Some(origin) = snapshot.pieces[idx].position else { continue };
        for dest in simple_moves(origin, &occupied) {
            moves.push(TurnMove::simple(idx, origin, dest));
        }
        for chain in jump_chains(origin, &occupied) {
            moves.push(TurnMove::jump(idx, chain));
        }
    }
    moves
}

/// Play a suggestion onto the snapshot after checking it
fn play(snapshot: &mut Snapshot, player: &str, hops: &[hexstar_core::Hop], piece_id: &str) {
    validate_turn(hops, &snapshot.occupied(), true).unwrap();
    let idx = snapshot.pieces.iter().position(|p| p.id == piece_id).unwrap();
    assert_eq!(snapshot.pieces[idx].owner, player);
    assert_eq!(snapshot.pieces[idx].position, Some(hops[0].origin));
    snapshot.relocate(idx, hops.last().unwrap().destination);
    snapshot.advance_turn();
}

// ============================================================================
// GEOMETRY TESTS
// ============================================================================

#[test]
fn test_geometry_bijection() {
    let cells: Vec<PositionKey> = all_positions().collect();
    assert_eq!(cells.len(), CELL_COUNT);
    for key in cells {
        let text = key.to_string();
        assert_eq!(text.parse::<PositionKey>().unwrap(), key);
        assert_eq!(PositionKey::from_hex(key.to_hex()), Some(key));
    }
}

#[test]
fn test_zones_are_disjoint_and_opposed() {
    for zone in HomeZone::ALL {
        assert_eq!(zone.opposite().opposite(), zone);
        for other in HomeZone::ALL.iter().filter(|z| **z != zone) {
            assert!(zone.cells().iter().all(|c| !other.contains(*c)));
        }
    }
}

// ============================================================================
// MOVE GENERATION TESTS
// ============================================================================

#[test]
fn test_random_play_stays_legal() {
    let players = ["a", "b", "c", "d", "e", "f"];
    let mut snapshot = standard_snapshot(&players).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(2024);

    for _ in 0..120 {
        let player = snapshot.turn.as_ref().unwrap().player.clone();
        let moves = turn_moves(&snapshot, &player);
        if moves.is_empty() {
            snapshot.advance_turn();
            continue;
        }
        let mv = &moves[rng.gen_range(0..moves.len())];
        let piece_id = snapshot.pieces[mv.piece].id.clone();
        play(&mut snapshot, &player, &mv.hops(), &piece_id);
        assert_eq!(snapshot.occupied().len(), 60);
        snapshot.validate().unwrap();
    }
}

// ============================================================================
// AGENT TESTS
// ============================================================================

#[test]
fn test_agents_on_every_layout() {
    let names = ["a", "b", "c", "d", "e", "f"];
    for n in [2, 3, 4, 6] {
        let snapshot = standard_snapshot(&names[..n]).unwrap();
        let request = SuggestRequest::new("a");
        let agents: [Box<dyn MoveAgent>; 2] = [Box::new(MaxAgent::default()), Box::new(mcts())];
        for agent in &agents {
            let decision = agent.suggest_move(&snapshot, &request).unwrap();
            let mut copy = snapshot.clone();
            play(&mut copy, "a", &decision.hops(), &decision.piece_id);
            assert_eq!(decision.agent, agent.kind());
        }
    }
}

#[test]
fn test_agents_alternate_for_several_turns() {
    let mut snapshot = standard_snapshot(&["max", "mcts"]).unwrap();
    let max = MaxAgent::default();
    let mcts = mcts();

    for _ in 0..12 {
        let player = snapshot.turn.as_ref().unwrap().player.clone();
        let agent: &dyn MoveAgent = if player == "max" { &max } else { &mcts };
        let decision = agent.suggest_move(&snapshot, &SuggestRequest::new(player.clone())).unwrap();
        let hops = decision.hops();
        assert_eq!(hops[0].origin, decision.origin);
        assert_eq!(hops.last().unwrap().destination, decision.destination);
        play(&mut snapshot, &player, &hops, &decision.piece_id);
    }
    assert_eq!(snapshot.turn.as_ref().unwrap().number, 13);
}

#[test]
fn test_snapshot_json_contract() {
    let json = r#"{
        "pieces": [
            {"id": "p1", "owner": "p", "zone_tag": "0-white", "position": "3-3"},
            {"id": "p2", "owner": "p", "zone_tag": "0-white", "position": null},
            {"id": "q1", "owner": "q", "zone_tag": "3-black", "position": "3-13"}
        ],
        "players": ["p", "q"],
        "turn": {"number": 1, "player": "p"}
    }"#;
    let snapshot: Snapshot = serde_json::from_str(json).unwrap();
    let decision = MaxAgent::default()
        .suggest_move(&snapshot, &SuggestRequest::new("p"))
        .unwrap();
    assert_eq!(decision.piece_id, "p1");

    let out = serde_json::to_value(&decision).unwrap();
    assert_eq!(out["agent"], "max");
    assert_eq!(out["origin"], "3-3");
    assert!(out.get("simulations").is_none());
}

// ============================================================================
// ARENA TESTS
// ============================================================================

#[test]
fn test_arena_series_is_strictly_legal() {
    let config = ArenaConfig::default().with_turns(vec![4, 8]).with_simulations(10);
    let result = run_series(&config).unwrap();
    assert_eq!(result.summary.matches, 2);
    for outcome in &result.outcomes {
        let max = outcome.stats(AgentKind::Max);
        let mcts = outcome.stats(AgentKind::Mcts);
        assert_eq!(max.invalid_moves + mcts.invalid_moves, 0);
        assert_eq!(max.moves + max.skipped + mcts.moves + mcts.skipped, outcome.turns_played);
    }
}
