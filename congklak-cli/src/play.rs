//! Play command - human vs engine on the terminal

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Args;

use congklak_core::{AlphaBetaAI, Difficulty, Game, Outcome, Player};

use crate::{engine_config, pit_from_label, pit_label};

#[derive(Args)]
pub struct PlayArgs {
    /// Engine strength (easy, medium, hard, expert or 1-4)
    #[arg(long, default_value = "medium")]
    pub difficulty: Difficulty,

    /// Engine config JSON file (overrides --difficulty)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Let the engine take South and move first
    #[arg(long)]
    pub ai_first: bool,
}

/// Run play command
pub fn run(args: PlayArgs) -> Result<()> {
    let config = engine_config(args.difficulty, args.config.as_deref())?;
    let ai = AlphaBetaAI::new(config);
    let human = if args.ai_first {
        Player::North
    } else {
        Player::South
    };

    tracing::info!(
        "Starting game: you play {}, engine depth={} time={:.1}s",
        human,
        ai.config.limits.max_depth,
        ai.config.limits.max_time.as_secs_f64()
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut game = Game::new();
    let mut human_time = Duration::ZERO;
    let mut engine_time = Duration::ZERO;

    print_board(&game, human);

    while !game.is_over() {
        let player = game.to_move();
        let turn = if player == human {
            let started = Instant::now();
            let pit = read_move(&game, human, &mut lines)?;
            human_time += started.elapsed();
            game.play(pit)?
        } else {
            println!("Engine is thinking...");
            let result = ai.search(game.board(), player);
            engine_time += result.elapsed;
            let Some(pit) = result.best_move else {
                println!("Engine has no move available");
                break;
            };
            println!(
                "Engine plays pit {} (depth {}, {:.2}s)",
                pit_label(pit, player),
                result.depth,
                result.elapsed.as_secs_f64()
            );
            game.play(pit)?
        };

        print_board(&game, human);
        if turn.captured > 0 {
            println!("{} captures {} stones", turn.player, turn.captured);
        }
        if turn.extra_turn && !turn.game_over {
            println!("{} moves again", turn.player);
        }
    }

    report_result(&game, human, human_time, engine_time);
    Ok(())
}

/// Prompt until the human enters a playable pit
fn read_move<I>(game: &Game, human: Player, lines: &mut I) -> Result<usize>
where
    I: Iterator<Item = io::Result<String>>,
{
    loop {
        let labels: Vec<usize> = game
            .board()
            .valid_moves(human)
            .into_iter()
            .map(|pit| pit_label(pit, human))
            .collect();
        print!("Choose a pit {:?}: ", labels);
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            bail!("Input closed before the game finished");
        };
        let line = line.context("Failed to read move")?;

        let Ok(label) = line.trim().parse::<usize>() else {
            println!("Please enter a number.");
            continue;
        };
        match pit_from_label(label, human) {
            Some(pit) if game.board().pit(pit) > 0 => return Ok(pit),
            _ => println!("Invalid pit. Choose a pit with stones."),
        }
    }
}

fn print_board(game: &Game, human: Player) {
    let (south, north) = game.scores();
    println!();
    println!("{}", game.board());
    println!(
        "South store: {}  North store: {}  (you are {})",
        south, north, human
    );
}

fn report_result(game: &Game, human: Player, human_time: Duration, engine_time: Duration) {
    let (south, north) = game.scores();

    println!("\n=== Game Over ===");
    println!("Moves:        {}", game.history().len());
    println!("Your time:    {:.2}s", human_time.as_secs_f64());
    println!("Engine time:  {:.2}s", engine_time.as_secs_f64());
    println!("Final score:  South {} - North {}", south, north);

    match game.outcome() {
        Some(Outcome::Win(winner)) if winner == human => println!("You win!"),
        Some(Outcome::Win(_)) => println!("Engine wins!"),
        Some(Outcome::Draw) => println!("It's a draw!"),
        None => println!("Game stopped before the end."),
    }
}
