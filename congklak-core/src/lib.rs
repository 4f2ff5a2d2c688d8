//! Congklak Core - Game engine and AI
//!
//! This crate provides the core logic for a six-pit Congklak (Mancala) game:
//! - Board representation with sowing, capture and extra-turn rules
//! - Turn flow and end-of-game collection
//! - Phase-weighted position evaluation
//! - Time-bounded iterative-deepening alpha-beta AI
//! - Difficulty presets and JSON engine configuration

pub mod board;
pub mod game;
pub mod eval;
pub mod ai;
pub mod config;

// Re-exports for convenient access
pub use board::{Board, BoardError, MoveOutcome, Outcome, Player, BOARD_SIZE, PITS_PER_SIDE, TOTAL_STONES};
pub use game::{Game, GameError, Turn};
pub use eval::{evaluate, evaluate_with, game_phase, EvalWeights};
pub use ai::{search, search_with, AlphaBetaAI, Clock, Deadline, SearchResult};
pub use config::{ConfigError, Difficulty, EngineConfig, SearchLimits};
