//! Compare command - Max vs MCTS series
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_config(), report_results()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use hexstar_arena::{run_series, ArenaConfig, GameOutcome, PlayerStats, SeriesResult, DEFAULT_TURNS};
use hexstar_core::Weights;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Turn limits, one match each (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub turns: Vec<u32>,

    /// MCTS iterations requested per turn
    #[arg(long, default_value = "250")]
    pub simulations: u32,

    /// MCTS turns per rollout
    #[arg(long, default_value = "40")]
    pub rollout_depth: u32,

    /// Base of the per-turn MCTS seed (overridden by --seed)
    #[arg(long, default_value = "123")]
    pub seed_base: u64,

    /// Max weights JSON file
    #[arg(long, value_name = "FILE")]
    pub weights: Option<PathBuf>,

    /// Play matches one at a time
    #[arg(long)]
    pub sequential: bool,

    /// Count invalid suggestions instead of aborting
    #[arg(long)]
    pub lenient: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run compare command
pub fn run(args: CompareArgs, seed: Option<u64>) -> Result<()> {
    let config = build_config(&args, seed)?;

    tracing::info!(
        turns = ?config.turns,
        simulations = config.mcts.simulations,
        seed_base = config.seed_base,
        "starting comparison"
    );

    let result = run_series(&config).context("comparison aborted")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        report_results(&result);
    }
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn build_config(args: &CompareArgs, seed: Option<u64>) -> Result<ArenaConfig> {
    let turns = if args.turns.is_empty() {
        DEFAULT_TURNS.to_vec()
    } else {
        args.turns.clone()
    };

    let mut config = ArenaConfig::default()
        .with_turns(turns)
        .with_simulations(args.simulations)
        .with_seed_base(seed.unwrap_or(args.seed_base));
    config.mcts = config.mcts.with_rollout_depth(args.rollout_depth);

    if let Some(path) = &args.weights {
        config = config.with_weights(Weights::load(path)?);
    }
    if args.sequential {
        config = config.sequential();
    }
    if args.lenient {
        config = config.lenient();
    }
    Ok(config)
}

fn report_results(result: &SeriesResult) {
    println!("\n=== Max vs MCTS ===");
    for outcome in &result.outcomes {
        print_outcome(outcome);
    }

    let s = &result.summary;
    println!("\n=== Summary ({} matches) ===", s.matches);
    println!("  Max leads:  {}", s.max_leads);
    println!("  MCTS leads: {}", s.mcts_leads);
    println!("  Ties:       {}", s.ties);
    println!("  Avg distance reduction: max {:.2}, mcts {:.2}", s.max_avg_delta, s.mcts_avg_delta);
    println!(
        "  Avg progress per move:  max {:.3}, mcts {:.3}",
        s.max_avg_progress_per_move, s.mcts_avg_progress_per_move
    );
    match s.overall_leader() {
        Some(side) => println!("  Overall: {}", side),
        None => println!("  Overall: tie"),
    }
}

// ============================================================================
// LEVEL 4 - FORMATTING
// ============================================================================

fn print_outcome(outcome: &GameOutcome) {
    println!("\n--- {} turns ({} played) ---", outcome.turns, outcome.turns_played);
    println!("  {}", stats_line("max ", &outcome.max));
    println!("  {}", stats_line("mcts", &outcome.mcts));
    let leader = outcome
        .leader_by_distance()
        .map_or_else(|| "tie".to_string(), |side| side.to_string());
    println!("  leader by distance: {}", leader);
    if let Some(winner) = outcome.winner {
        println!("  winner: {}", winner);
    }
}

fn stats_line(label: &str, s: &PlayerStats) -> String {
    format!(
        "{}: moves={} chains={} chain_steps={} skipped={} invalid={} dist {:.0} -> {:.0} (delta {:.0}) avg_progress={:.3} in_goal={}",
        label,
        s.moves,
        s.chains,
        s.chain_steps,
        s.skipped,
        s.invalid_moves,
        s.total_dist_start,
        s.total_dist_end,
        s.delta_total_dist(),
        s.avg_progress_per_move(),
        s.in_goal_end
    )
}
