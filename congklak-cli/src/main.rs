//! Congklak CLI - Command-line interface
//!
//! Commands:
//! - play: Play against the engine
//! - match: Engine vs engine games
//! - analyze: Search a single position

mod analyze;
mod match_cmd;
mod play;

use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use congklak_core::{Difficulty, EngineConfig, Player, PITS_PER_SIDE};

#[derive(Parser)]
#[command(name = "congklak")]
#[command(about = "Congklak (Mancala) with a time-bounded alpha-beta engine")]
struct Cli {
    /// Random seed for reproducible matches
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game against the engine
    Play(play::PlayArgs),
    /// Play engine vs engine games
    Match(match_cmd::MatchArgs),
    /// Search a single position
    Analyze(analyze::AnalyzeArgs),
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play::run(args),
        Commands::Match(args) => match_cmd::run(args, cli.seed),
        Commands::Analyze(args) => analyze::run(args),
    }
}

/// Engine settings from a config file if given, else the difficulty preset
fn engine_config(difficulty: Difficulty, path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            let config = EngineConfig::load(path)?;
            tracing::info!("Loaded engine config from {}", path.display());
            Ok(config)
        }
        None => Ok(EngineConfig::from_difficulty(difficulty)),
    }
}

/// 1-based pit label as seen from `player`'s side
fn pit_label(pit: usize, player: Player) -> usize {
    match player {
        Player::South => pit + 1,
        Player::North => 13 - pit,
    }
}

/// Board index for a 1-based label on `player`'s side
fn pit_from_label(label: usize, player: Player) -> Option<usize> {
    if !(1..=PITS_PER_SIDE).contains(&label) {
        return None;
    }
    Some(match player {
        Player::South => label - 1,
        Player::North => 13 - label,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pit_labels_round_trip() {
        for player in [Player::South, Player::North] {
            for pit in player.pits() {
                let label = pit_label(pit, player);
                assert!((1..=6).contains(&label));
                assert_eq!(pit_from_label(label, player), Some(pit));
            }
        }
        assert_eq!(pit_from_label(0, Player::South), None);
        assert_eq!(pit_from_label(7, Player::North), None);
    }

    #[test]
    fn test_engine_config_from_difficulty() {
        let config = engine_config(Difficulty::Hard, None).unwrap();
        assert_eq!(config.limits, Difficulty::Hard.limits());
    }
}
