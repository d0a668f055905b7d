//! Max vs MCTS timing benchmark
//!
//! Compares:
//! 1. Time to suggest a move on the opening and on a developed position
//! 2. How the MCTS time scales with the simulation budget

use hexstar_core::{standard_snapshot, MaxAgent, MoveAgent, Snapshot, SuggestRequest};
use hexstar_mcts::{MctsAgent, MctsConfig};
use std::time::Instant;

// ============================================================================
// TEST POSITIONS
// ============================================================================

fn opening(players: &[&str]) -> Snapshot {
    standard_snapshot(players).expect("supported player count")
}

/// Opening followed by `turns` Max moves for every player
fn developed(players: &[&str], turns: usize) -> Snapshot {
    let mut snapshot = opening(players);
    let agent = MaxAgent::default();
    for _ in 0..turns * players.len() {
        let Some(turn) = snapshot.turn.clone() else { break };
        let Ok(decision) = agent.suggest_move(&snapshot, &SuggestRequest::new(turn.player)) else {
            break;
        };
        let piece = snapshot
            .pieces
            .iter()
            .position(|p| p.id == decision.piece_id)
            .expect("decision names a known piece");
        snapshot.relocate(piece, decision.destination);
        snapshot.advance_turn();
    }
    snapshot
}

// ============================================================================
// BENCHMARK STRUCTURES
// ============================================================================

#[derive(Clone, Debug)]
struct BenchmarkResult {
    player: String,
    config: String,
    position: String,
    avg_move_time_ms: f64,
}

impl BenchmarkResult {
    fn to_table_row(&self) -> String {
        format!(
            "| {:<6} | {:<16} | {:<10} | {:>10.2}ms |",
            self.player, self.config, self.position, self.avg_move_time_ms
        )
    }
}

fn time_agent(agent: &dyn MoveAgent, snapshot: &Snapshot, repeats: usize) -> f64 {
    let Some(turn) = &snapshot.turn else { return 0.0 };
    let request = SuggestRequest::new(turn.player.clone());
    let mut total = 0.0;
    for _ in 0..repeats {
        let start = Instant::now();
        let _ = agent.suggest_move(snapshot, &request);
        total += start.elapsed().as_secs_f64() * 1000.0;
    }
    total / repeats as f64
}

// ============================================================================
// BENCHMARK: Time to Find Move
// ============================================================================

fn benchmark_move_time(snapshot: &Snapshot, position_name: &str) -> Vec<BenchmarkResult> {
    println!("\n=== MOVE TIME: {} ===", position_name);
    let mut results = Vec::new();

    let avg = time_agent(&MaxAgent::default(), snapshot, 10);
    println!("  Max ... {:.2}ms", avg);
    results.push(BenchmarkResult {
        player: "Max".into(),
        config: "one ply".into(),
        position: position_name.into(),
        avg_move_time_ms: avg,
    });

    for sims in [25, 100, 250] {
        let agent = MctsAgent::new(MctsConfig::default().with_simulations(sims).with_seed(123).uncapped());
        let avg = time_agent(&agent, snapshot, 3);
        println!("  MCTS {} sims ... {:.2}ms", sims, avg);
        results.push(BenchmarkResult {
            player: "MCTS".into(),
            config: format!("{} sims", sims),
            position: position_name.into(),
            avg_move_time_ms: avg,
        });
    }

    results
}

// ============================================================================
// MAIN
// ============================================================================

fn main() {
    println!("\n=== HEXSTAR: Max vs MCTS Benchmark ===");

    let players = ["max", "mcts"];
    let mut all_results = Vec::new();
    all_results.extend(benchmark_move_time(&opening(&players), "opening"));
    all_results.extend(benchmark_move_time(&developed(&players, 10), "turn 10"));
    all_results.extend(benchmark_move_time(&opening(&["a", "b", "c", "d", "e", "f"]), "6 players"));

    println!("\n| Player | Config           | Position   | Avg move time |");
    println!("|--------|------------------|------------|---------------|");
    for result in &all_results {
        println!("{}", result.to_table_row());
    }

    println!("\nMCTS simulation scaling:");
    for position in ["opening", "turn 10", "6 players"] {
        let mcts: Vec<_> = all_results
            .iter()
            .filter(|r| r.player == "MCTS" && r.position == position)
            .collect();
        for pair in mcts.windows(2) {
            let scaling = pair[1].avg_move_time_ms / pair[0].avg_move_time_ms.max(f64::EPSILON);
            println!("  {}: {} -> {}: {:.2}x slower", position, pair[0].config, pair[1].config, scaling);
        }
    }
}
