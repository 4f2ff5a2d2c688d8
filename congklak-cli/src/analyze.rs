//! Analyze command - search a single position

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use congklak_core::{game_phase, AlphaBetaAI, Board, Difficulty, Player, SearchResult};

use crate::{engine_config, pit_label};

#[derive(Args)]
pub struct AnalyzeArgs {
    /// 14 counts: pits 0-5, South store, pits 7-12, North store
    #[arg(long, default_value = "4,4,4,4,4,4,0,4,4,4,4,4,4,0")]
    pub board: String,

    /// Side to move (0/south or 1/north)
    #[arg(long, default_value = "0")]
    pub player: Player,

    /// Engine strength (easy, medium, hard, expert or 1-4)
    #[arg(long, default_value = "medium")]
    pub difficulty: Difficulty,

    /// Override the maximum search depth
    #[arg(long)]
    pub depth: Option<u32>,

    /// Engine config JSON file (overrides --difficulty)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run analyze command
pub fn run(args: AnalyzeArgs) -> Result<()> {
    let board: Board = args
        .board
        .parse()
        .with_context(|| format!("Invalid board: {}", args.board))?;

    let mut config = engine_config(args.difficulty, args.config.as_deref())?;
    if let Some(depth) = args.depth {
        config.limits.max_depth = depth;
    }
    let ai = AlphaBetaAI::new(config);

    if board.is_game_over() {
        tracing::warn!("Position is already over; no move will be found");
    }

    let static_eval = ai.evaluate(&board, args.player);
    let result = ai.search(&board, args.player);

    if args.json {
        print_json(&board, args.player, static_eval, &result)?;
    } else {
        print_text(&board, args.player, static_eval, &result);
    }
    Ok(())
}

fn print_json(board: &Board, player: Player, static_eval: f64, result: &SearchResult) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        pits: &'a [u8],
        player: Player,
        phase: f64,
        static_eval: f64,
        /// Null when no move was found
        value: Option<f64>,
        best_move: Option<usize>,
        depth: u32,
        nodes: u64,
        elapsed_secs: f64,
    }

    let output = JsonOutput {
        pits: board.pits(),
        player,
        phase: game_phase(board),
        static_eval,
        value: result.best_move.map(|_| result.value),
        best_move: result.best_move,
        depth: result.depth,
        nodes: result.nodes,
        elapsed_secs: result.elapsed.as_secs_f64(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_text(board: &Board, player: Player, static_eval: f64, result: &SearchResult) {
    println!("{}", board);
    println!();
    println!("To move:      {}", player);
    println!("Phase:        {:.3}", game_phase(board));
    println!("Static eval:  {:+.4}", static_eval);

    match result.best_move {
        Some(pit) => {
            println!(
                "Best move:    pit {} (index {})",
                pit_label(pit, player),
                pit
            );
            println!("Value:        {:+.4}", result.value);
        }
        None => println!("Best move:    none"),
    }
    println!("Depth:        {}", result.depth);
    println!("Nodes:        {}", result.nodes);
    println!("Time:         {:.3}s", result.elapsed.as_secs_f64());
}
