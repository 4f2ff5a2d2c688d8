//! Time-bounded alpha-beta AI

use crate::board::{Board, Player};
use crate::config::{Difficulty, EngineConfig, SearchLimits};
use crate::eval::{evaluate_with, EvalWeights};
use crate::game::Game;
use std::time::{Duration, Instant};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Iterative deepening stops once this share of the budget is spent
const EARLY_STOP_FRACTION: f64 = 0.85;

/// Move ordering is only worth its cost above this remaining depth
const ORDERING_MIN_DEPTH: u32 = 2;

// ============================================================================
// DEADLINE
// ============================================================================

/// Time source behind a [`Deadline`]
pub trait Clock {
    /// Time spent since the search started
    fn elapsed(&self) -> Duration;
}

impl Clock for Instant {
    fn elapsed(&self) -> Duration {
        Instant::elapsed(self)
    }
}

/// Soft wall-clock budget, polled at node entry and between sibling moves
#[derive(Clone, Copy, Debug)]
pub struct Deadline<C = Instant> {
    clock: C,
    budget: Duration,
}

impl Deadline {
    pub fn new(budget: Duration) -> Self {
        Self::with_clock(Instant::now(), budget)
    }
}

impl<C: Clock> Deadline<C> {
    pub fn with_clock(clock: C, budget: Duration) -> Self {
        Self { clock, budget }
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed()
    }

    pub fn expired(&self) -> bool {
        self.elapsed() > self.budget
    }

    fn past_fraction(&self, fraction: f64) -> bool {
        self.elapsed() > self.budget.mul_f64(fraction)
    }
}

// ============================================================================
// SEARCH RESULT
// ============================================================================

/// Outcome of an iterative deepening search
#[derive(Clone, Debug)]
pub struct SearchResult {
    /// Evaluation from the searching player's perspective
    pub value: f64,
    /// None if no depth produced a move
    pub best_move: Option<usize>,
    /// Last depth whose result was recorded
    pub depth: u32,
    /// Nodes visited across all depths
    pub nodes: u64,
    pub elapsed: Duration,
}

// ============================================================================
// ALPHA-BETA
// ============================================================================

/// Per-search state threaded through the recursion
struct Searcher<'a, C> {
    root: Player,
    deadline: Deadline<C>,
    weights: &'a EvalWeights,
    nodes: u64,
}

impl<C: Clock> Searcher<'_, C> {
    fn evaluate(&self, board: &Board) -> f64 {
        evaluate_with(board, self.root, self.weights)
    }

    /// Minimax with explicit max/min nodes. Scores are always from the
    /// root player's perspective, never negated between plies.
    fn alphabeta(
        &mut self,
        board: &Board,
        depth: u32,
        mut alpha: f64,
        mut beta: f64,
        current: Player,
    ) -> (f64, Option<usize>) {
        self.nodes += 1;

        if self.deadline.expired() || depth == 0 || board.is_game_over() {
            return (self.evaluate(board), None);
        }

        let mut moves = board.valid_moves(current);
        if moves.is_empty() {
            return (self.evaluate(board), None);
        }

        let maximizing = current == self.root;
        if depth > ORDERING_MIN_DEPTH {
            self.order_moves(board, &mut moves, current, maximizing);
        }

        let mut value = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        let mut best_move = None;

        for pit in moves {
            let (child, extra_turn) = board.apply_move(pit, current);
            let next = if extra_turn { current } else { current.opponent() };
            let (score, _) = self.alphabeta(&child, depth - 1, alpha, beta, next);

            if maximizing {
                if score > value {
                    value = score;
                    best_move = Some(pit);
                }
                alpha = alpha.max(value);
            } else {
                if score < value {
                    value = score;
                    best_move = Some(pit);
                }
                beta = beta.min(value);
            }

            if beta <= alpha || self.deadline.expired() {
                break;
            }
        }

        (value, best_move)
    }

    /// Sort by one-ply evaluation: best first for the maximizer, worst first
    /// for the minimizer. Equal scores keep pit order in the same direction.
    fn order_moves(&self, board: &Board, moves: &mut Vec<usize>, current: Player, maximizing: bool) {
        let mut scored: Vec<(f64, usize)> = moves
            .iter()
            .map(|&pit| {
                let (child, _) = board.apply_move(pit, current);
                (self.evaluate(&child), pit)
            })
            .collect();

        scored.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        if maximizing {
            scored.reverse();
        }

        moves.clear();
        moves.extend(scored.into_iter().map(|(_, pit)| pit));
    }
}

/// Iterative deepening from depth 1 to `limits.max_depth`.
///
/// Each depth gets the whole budget as its deadline; a new depth is not
/// started once 85% of it is spent. Any depth that returns a move replaces
/// the recorded result, including one cut short by the clock.
pub fn search_with(
    board: &Board,
    player: Player,
    limits: &SearchLimits,
    weights: &EvalWeights,
) -> SearchResult {
    search_until(
        board,
        player,
        limits.max_depth,
        weights,
        Deadline::new(limits.max_time),
    )
}

/// Iterative deepening against an explicit deadline
pub(crate) fn search_until<C: Clock>(
    board: &Board,
    player: Player,
    max_depth: u32,
    weights: &EvalWeights,
    deadline: Deadline<C>,
) -> SearchResult {
    let mut searcher = Searcher {
        root: player,
        deadline,
        weights,
        nodes: 0,
    };

    let mut value = f64::NEG_INFINITY;
    let mut best_move = None;
    let mut reached = 0;

    for depth in 1..=max_depth {
        if searcher.deadline.past_fraction(EARLY_STOP_FRACTION) {
            tracing::debug!("Out of time before depth {}", depth);
            break;
        }

        let (depth_value, depth_move) =
            searcher.alphabeta(board, depth, f64::NEG_INFINITY, f64::INFINITY, player);

        if let Some(pit) = depth_move {
            value = depth_value;
            best_move = Some(pit);
            reached = depth;
            tracing::debug!(
                "Depth {}: move={} value={:.4} nodes={}",
                depth,
                pit,
                value,
                searcher.nodes
            );
        }
    }

    SearchResult {
        value,
        best_move,
        depth: reached,
        nodes: searcher.nodes,
        elapsed: searcher.deadline.elapsed(),
    }
}

/// Search with the default evaluation weights
pub fn search(board: &Board, player: Player, max_time: Duration, max_depth: u32) -> SearchResult {
    search_with(
        board,
        player,
        &SearchLimits::new(max_depth, max_time),
        &EvalWeights::default(),
    )
}

// ============================================================================
// ALPHA-BETA AI
// ============================================================================

/// Alpha-Beta AI player
#[derive(Clone, Debug, Default)]
pub struct AlphaBetaAI {
    pub config: EngineConfig,
}

impl AlphaBetaAI {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self::new(EngineConfig::from_difficulty(difficulty))
    }

    /// Run a full search for `player`
    pub fn search(&self, board: &Board, player: Player) -> SearchResult {
        search_with(board, player, &self.config.limits, &self.config.weights)
    }

    /// Get best move for `player`
    pub fn best_move(&self, board: &Board, player: Player) -> Option<usize> {
        self.search(board, player).best_move
    }

    /// Evaluate a position
    pub fn evaluate(&self, board: &Board, player: Player) -> f64 {
        evaluate_with(board, player, &self.config.weights)
    }

    /// Play both sides until the game ends or `max_plies` moves are made
    pub fn play_game(&self, mut game: Game, max_plies: usize) -> Game {
        while !game.is_over() && game.history().len() < max_plies {
            let player = game.to_move();
            let Some(pit) = self.best_move(game.board(), player) else {
                break;
            };
            if let Err(e) = game.play(pit) {
                tracing::warn!("Engine produced an unplayable move {}: {}", pit, e);
                break;
            }
        }
        game
    }
}

// ============================================================================
// TESTS
// ============================================================================
