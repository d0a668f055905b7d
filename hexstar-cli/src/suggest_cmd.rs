//! Suggest command - one decision from a JSON snapshot
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_request(), build_agent()
//! - Level 4: argument types

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};

use hexstar_core::{LastMove, MaxAgent, MoveAgent, PositionKey, Snapshot, SuggestRequest, Weights};
use hexstar_mcts::{MctsAgent, MctsConfig};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AgentChoice {
    Max,
    Mcts,
}

#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// Snapshot JSON file
    #[arg(long, value_name = "FILE")]
    pub snapshot: PathBuf,

    /// Player to suggest for
    #[arg(long)]
    pub player: String,

    #[arg(long, value_enum, default_value = "max")]
    pub agent: AgentChoice,

    /// Only jumps are allowed this turn
    #[arg(long)]
    pub no_simple: bool,

    /// MCTS iterations requested
    #[arg(long, default_value = "25")]
    pub simulations: u32,

    /// MCTS turns per rollout
    #[arg(long, default_value = "40")]
    pub rollout_depth: u32,

    /// Run every requested iteration instead of capping by root moves
    #[arg(long)]
    pub uncapped: bool,

    /// Max weights JSON file (missing fields keep their defaults)
    #[arg(long, value_name = "FILE")]
    pub weights: Option<PathBuf>,

    /// Origin of the player's previous move
    #[arg(long, value_name = "KEY")]
    pub last_from: Option<PositionKey>,

    /// Destination of the player's previous move
    #[arg(long, value_name = "KEY")]
    pub last_to: Option<PositionKey>,

    /// Piece moved by the player's previous move
    #[arg(long, value_name = "ID")]
    pub last_piece: Option<String>,

    /// Pretty-print the decision
    #[arg(long)]
    pub pretty: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run suggest command
///
/// 1. Load the snapshot
/// 2. Build request and agent
/// 3. Print the decision as JSON
pub fn run(args: SuggestArgs, seed: Option<u64>) -> Result<()> {
    let snapshot = Snapshot::load(&args.snapshot)?;
    let request = build_request(&args)?;
    let agent = build_agent(&args, seed)?;

    tracing::info!(player = %request.player, agent = %agent.kind(), "suggesting move");

    let decision = agent
        .suggest_move(&snapshot, &request)
        .with_context(|| format!("no suggestion for player {}", request.player))?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&decision)?
    } else {
        serde_json::to_string(&decision)?
    };
    println!("{}", json);
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn build_request(args: &SuggestArgs) -> Result<SuggestRequest> {
    let mut request = SuggestRequest::new(args.player.clone());
    if args.no_simple {
        request = request.jumps_only();
    }

    match (args.last_from, args.last_to) {
        (Some(origin), Some(destination)) => {
            request = request.with_last_move(LastMove {
                piece_id: args.last_piece.clone(),
                origin,
                destination,
            });
        }
        (None, None) => {
            if args.last_piece.is_some() {
                bail!("--last-piece needs --last-from and --last-to");
            }
        }
        _ => bail!("--last-from and --last-to must be given together"),
    }
    Ok(request)
}

fn build_agent(args: &SuggestArgs, seed: Option<u64>) -> Result<Box<dyn MoveAgent>> {
    match args.agent {
        AgentChoice::Max => {
            let weights = match &args.weights {
                Some(path) => Weights::load(path)?,
                None => Weights::default(),
            };
            Ok(Box::new(MaxAgent::new(weights)))
        }
        AgentChoice::Mcts => {
            let mut config = MctsConfig::default()
                .with_simulations(args.simulations)
                .with_rollout_depth(args.rollout_depth);
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }
            if args.uncapped {
                config = config.uncapped();
            }
            Ok(Box::new(MctsAgent::new(config)))
        }
    }
}
