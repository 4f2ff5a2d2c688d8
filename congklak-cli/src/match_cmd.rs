//! Match command - play engine vs engine games
//!
//! - run(): orchestration
//! - play_match(), report_results(): phases
//! - play_single_game(), compute_match_statistics(): steps

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use congklak_core::{AlphaBetaAI, Difficulty, EngineConfig, Game, Outcome, Player};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// Difficulty of the first engine
    #[arg(long, default_value = "easy")]
    pub first: Difficulty,

    /// Difficulty of the second engine
    #[arg(long, default_value = "medium")]
    pub second: Difficulty,

    /// Number of games to play (will alternate sides)
    #[arg(long, default_value = "2")]
    pub games: usize,

    /// Per-move time budget in seconds for both engines
    #[arg(long, value_name = "SECS")]
    pub move_time: Option<f64>,

    /// Random opening plies before the engines take over
    #[arg(long, default_value = "0")]
    pub random_plies: usize,

    /// Maximum plies per game
    #[arg(long, default_value = "400")]
    pub max_plies: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    /// Side the first engine played
    first_side: Player,
    /// None if the ply limit was reached
    outcome: Option<Outcome>,
    south_store: u8,
    north_store: u8,
    plies: usize,
}

impl GameRecord {
    /// First engine's store minus second engine's store
    fn margin(&self) -> i32 {
        let south = self.south_store as i32;
        let north = self.north_store as i32;
        match self.first_side {
            Player::South => south - north,
            Player::North => north - south,
        }
    }
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    games: Vec<GameRecord>,
    first_wins: usize,
    second_wins: usize,
    draws: usize,
    avg_margin: f32,
}

// ============================================================================
// ORCHESTRATION
// ============================================================================

/// Run match command
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    let first = engine_for(args.first, args.move_time)?;
    let second = engine_for(args.second, args.move_time)?;

    tracing::info!(
        "Starting match: {} vs {} ({} games, {} random plies)",
        args.first,
        args.second,
        args.games,
        args.random_plies
    );

    let results = play_match(&first, &second, &args, seed)?;

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// PHASES
// ============================================================================

fn engine_for(difficulty: Difficulty, move_time: Option<f64>) -> Result<AlphaBetaAI> {
    let mut config = EngineConfig::from_difficulty(difficulty);
    if let Some(secs) = move_time {
        config.limits.max_time = Duration::try_from_secs_f64(secs)
            .with_context(|| format!("Invalid move time: {}", secs))?;
    }
    Ok(AlphaBetaAI::new(config))
}

/// Play all games in the match
fn play_match(
    first: &AlphaBetaAI,
    second: &AlphaBetaAI,
    args: &MatchArgs,
    seed: Option<u64>,
) -> Result<MatchResults> {
    let mut rng = create_rng(seed);
    let mut games = Vec::with_capacity(args.games);

    for game_num in 0..args.games {
        // Alternate sides for fairness
        let first_side = if game_num % 2 == 0 {
            Player::South
        } else {
            Player::North
        };
        let (south, north) = match first_side {
            Player::South => (first, second),
            Player::North => (second, first),
        };

        let game = play_single_game(south, north, args.random_plies, args.max_plies, &mut rng)?;
        let (south_store, north_store) = game.scores();
        let record = GameRecord {
            game_number: game_num + 1,
            first_side,
            outcome: game.outcome(),
            south_store,
            north_store,
            plies: game.history().len(),
        };

        tracing::info!(
            "Game {}: {:?} ({}-{}, {} plies)",
            record.game_number,
            record.outcome,
            record.south_store,
            record.north_store,
            record.plies
        );

        games.push(record);
    }

    Ok(compute_match_statistics(games))
}

/// Report match results
fn report_results(results: &MatchResults, args: &MatchArgs) {
    if args.json {
        print_json_results(results, args);
    } else {
        print_text_results(results, args);
    }
}

// ============================================================================
// STEPS
// ============================================================================

/// Play one game: random opening plies, then each engine moves for its side
fn play_single_game(
    south: &AlphaBetaAI,
    north: &AlphaBetaAI,
    random_plies: usize,
    max_plies: usize,
    rng: &mut ChaCha8Rng,
) -> Result<Game> {
    let mut game = Game::new();

    for _ in 0..random_plies {
        if game.is_over() {
            break;
        }
        let moves = game.board().valid_moves(game.to_move());
        let Some(&pit) = moves.choose(rng) else {
            break;
        };
        game.play(pit)?;
    }

    while !game.is_over() && game.history().len() < max_plies {
        let player = game.to_move();
        let ai = match player {
            Player::South => south,
            Player::North => north,
        };
        let Some(pit) = ai.best_move(game.board(), player) else {
            tracing::warn!("{} has no move at ply {}", player, game.history().len());
            break;
        };
        game.play(pit)?;
    }

    Ok(game)
}

/// Compute aggregate statistics from game records
fn compute_match_statistics(games: Vec<GameRecord>) -> MatchResults {
    let first_wins = games
        .iter()
        .filter(|g| g.outcome == Some(Outcome::Win(g.first_side)))
        .count();
    let second_wins = games
        .iter()
        .filter(|g| g.outcome == Some(Outcome::Win(g.first_side.opponent())))
        .count();
    let draws = games.len() - first_wins - second_wins;

    let total_margin: i32 = games.iter().map(|g| g.margin()).sum();
    let avg_margin = if games.is_empty() {
        0.0
    } else {
        total_margin as f32 / games.len() as f32
    };

    MatchResults {
        games,
        first_wins,
        second_wins,
        draws,
        avg_margin,
    }
}

// ============================================================================
// UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn percent(count: usize, total: usize) -> f32 {
    if total > 0 {
        count as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Print results as JSON
fn print_json_results(results: &MatchResults, args: &MatchArgs) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        first_side: Player,
        result: String,
        south_store: u8,
        north_store: u8,
        plies: usize,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        first: Difficulty,
        second: Difficulty,
        total_games: usize,
        first_wins: usize,
        second_wins: usize,
        draws: usize,
        avg_margin: f32,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        first: args.first,
        second: args.second,
        total_games: results.games.len(),
        first_wins: results.first_wins,
        second_wins: results.second_wins,
        draws: results.draws,
        avg_margin: results.avg_margin,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                first_side: g.first_side,
                result: describe(g.outcome),
                south_store: g.south_store,
                north_store: g.north_store,
                plies: g.plies,
            })
            .collect(),
    };

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::warn!("Failed to serialize results: {}", e),
    }
}

/// Print results as text
fn print_text_results(results: &MatchResults, args: &MatchArgs) {
    let total = results.games.len();

    println!("\n=== Match Results ===");
    println!("Total games:  {}", total);
    println!(
        "{:<8} wins: {} ({:.1}%)",
        args.first.to_string(),
        results.first_wins,
        percent(results.first_wins, total)
    );
    println!(
        "{:<8} wins: {} ({:.1}%)",
        args.second.to_string(),
        results.second_wins,
        percent(results.second_wins, total)
    );
    println!(
        "Draws:         {} ({:.1}%)",
        results.draws,
        percent(results.draws, total)
    );
    println!("Avg margin:    {:+.1} (first engine)", results.avg_margin);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {}: first as {}, {} ({}-{}) in {} plies",
            game.game_number,
            game.first_side,
            describe(game.outcome),
            game.south_store,
            game.north_store,
            game.plies
        );
    }
}

fn describe(outcome: Option<Outcome>) -> String {
    match outcome {
        Some(Outcome::Win(player)) => format!("{} wins", player),
        Some(Outcome::Draw) => "draw".to_string(),
        None => "unfinished".to_string(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use congklak_core::SearchLimits;

    fn record(game_number: usize, first_side: Player, south: u8, north: u8) -> GameRecord {
        let outcome = match south.cmp(&north) {
            std::cmp::Ordering::Greater => Outcome::Win(Player::South),
            std::cmp::Ordering::Less => Outcome::Win(Player::North),
            std::cmp::Ordering::Equal => Outcome::Draw,
        };
        GameRecord {
            game_number,
            first_side,
            outcome: Some(outcome),
            south_store: south,
            north_store: north,
            plies: 40,
        }
    }

    #[test]
    fn test_compute_match_statistics_empty() {
        let results = compute_match_statistics(vec![]);
        assert_eq!(results.first_wins, 0);
        assert_eq!(results.second_wins, 0);
        assert_eq!(results.draws, 0);
        assert_eq!(results.avg_margin, 0.0);
    }

    #[test]
    fn test_compute_match_statistics() {
        let games = vec![
            record(1, Player::South, 30, 18),
            record(2, Player::North, 30, 18),
            record(3, Player::South, 24, 24),
            GameRecord {
                outcome: None,
                ..record(4, Player::North, 10, 20)
            },
        ];

        let results = compute_match_statistics(games);
        assert_eq!(results.first_wins, 1);
        assert_eq!(results.second_wins, 1);
        assert_eq!(results.draws, 2);
        // Margins: +12, -12, 0, +10
        assert_eq!(results.avg_margin, 2.5);
    }

    #[test]
    fn test_create_rng_deterministic() {
        let mut rng1 = create_rng(Some(42));
        let mut rng2 = create_rng(Some(42));

        use rand::Rng;
        assert_eq!(rng1.gen::<u64>(), rng2.gen::<u64>());
    }

    #[test]
    fn test_play_single_game_finishes() {
        let ai = AlphaBetaAI::new(EngineConfig {
            limits: SearchLimits::new(1, Duration::from_secs(10)),
            ..EngineConfig::default()
        });
        let mut rng = create_rng(Some(7));
        let game = play_single_game(&ai, &ai, 4, 400, &mut rng).unwrap();

        assert!(game.is_over());
        let (south, north) = game.scores();
        assert_eq!(south as u32 + north as u32, 48);
    }

    #[test]
    fn test_ply_limit() {
        let ai = AlphaBetaAI::new(EngineConfig {
            limits: SearchLimits::new(1, Duration::from_secs(10)),
            ..EngineConfig::default()
        });
        let mut rng = create_rng(Some(7));
        let game = play_single_game(&ai, &ai, 0, 3, &mut rng).unwrap();
        assert!(game.history().len() <= 3);
    }

    #[test]
    fn test_engine_move_time_override() {
        let ai = engine_for(Difficulty::Expert, Some(0.25)).unwrap();
        assert_eq!(ai.config.limits.max_time, Duration::from_millis(250));
        assert_eq!(ai.config.limits.max_depth, 12);
        assert!(engine_for(Difficulty::Easy, Some(-1.0)).is_err());
    }
}
