//! HEXSTAR CLI - Command-line interface
//!
//! Commands:
//! - suggest: Suggest a move for one player from a JSON snapshot
//! - compare: Play Max against MCTS over several turn limits
//! - board: Print the board geometry and zones as JSON

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod board_cmd;
mod compare_cmd;
mod suggest_cmd;

#[derive(Parser)]
#[command(name = "hexstar")]
#[command(about = "Move suggestions for six-player star checkers")]
struct Cli {
    /// Random seed for reproducible searches
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest a move for one player
    Suggest(suggest_cmd::SuggestArgs),
    /// Play Max against MCTS and report progress
    Compare(compare_cmd::CompareArgs),
    /// Print cells, zones and priority cells
    Board(board_cmd::BoardArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so JSON output stays clean; filter with RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Suggest(args) => suggest_cmd::run(args, cli.seed),
        Commands::Compare(args) => compare_cmd::run(args, cli.seed),
        Commands::Board(args) => board_cmd::run(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_seed_after_subcommand() {
        let cli = Cli::try_parse_from(["hexstar", "board", "--seed", "9"]).unwrap();
        assert_eq!(cli.seed, Some(9));
        assert!(matches!(cli.command, Commands::Board(_)));
    }

    #[test]
    fn test_suggest_requires_snapshot_and_player() {
        assert!(Cli::try_parse_from(["hexstar", "suggest", "--player", "p"]).is_err());
        assert!(Cli::try_parse_from(["hexstar", "suggest", "--snapshot", "s.json"]).is_err());
        let cli = Cli::try_parse_from(["hexstar", "suggest", "--snapshot", "s.json", "--player", "p"]).unwrap();
        assert!(matches!(cli.command, Commands::Suggest(_)));
    }

    #[test]
    fn test_unknown_subcommand() {
        assert!(Cli::try_parse_from(["hexstar", "evolve"]).is_err());
    }
}
