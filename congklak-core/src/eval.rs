//! Position evaluation
//!
//! Scores combine material (stores and stones on each side), mobility and
//! three tactical signals read off simulated sowings: extra turns we can
//! take, captures we can make and extra turns the opponent can take. Weights
//! are interpolated by game phase so the store difference dominates late.

use crate::board::{opposite, Board, Player, PITS_PER_SIDE, TOTAL_STONES};
use serde::{Deserialize, Serialize};

/// Heuristic weights for position evaluation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalWeights {
    /// Store differential weight at the start of the game
    pub store_base: f64,
    /// Added to the store weight as the game phase reaches 1
    pub store_phase: f64,
    pub side_base: f64,
    /// Fraction of the side weight lost by the end of the game
    pub side_phase_decay: f64,
    pub mobility_base: f64,
    pub mobility_phase_decay: f64,
    pub extra_turn_weight: f64,
    pub extra_turn_scale: f64,
    pub capture_weight: f64,
    pub capture_scale: f64,
    pub threat_weight: f64,
    pub threat_scale: f64,
    /// Divisor applied to the weighted sum before squashing
    pub output_scale: f64,
}

/// Weights used by [`evaluate`]
pub const DEFAULT_WEIGHTS: EvalWeights = EvalWeights {
    store_base: 10.0,
    store_phase: 15.0,
    side_base: 3.0,
    side_phase_decay: 0.5,
    mobility_base: 2.5,
    mobility_phase_decay: 0.7,
    extra_turn_weight: 4.0,
    extra_turn_scale: 3.0,
    capture_weight: 5.0,
    capture_scale: 10.0,
    threat_weight: 3.5,
    threat_scale: 3.0,
    output_scale: 12.0,
};

impl Default for EvalWeights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}

/// Tactical signals from simulating every sowing on one side
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Tactics {
    /// Moves whose last stone lands in the mover's store
    extra_turns: u32,
    /// Stones sitting opposite the empty pits our sowings would end in
    capture_value: u32,
}

fn tactics(board: &Board, player: Player) -> Tactics {
    let mut found = Tactics::default();
    for pit in player.pits() {
        if board.pit(pit) == 0 {
            continue;
        }
        let landing = board.landing(pit, player);
        if landing == player.store() {
            found.extra_turns += 1;
        } else if player.owns_pit(landing) && board.pit(landing) == 0 {
            found.capture_value += board.pit(opposite(landing)) as u32;
        }
    }
    found
}

/// 0 at the start, approaching 1 as the pits drain into the stores
pub fn game_phase(board: &Board) -> f64 {
    1.0 - board.stones_in_play() as f64 / TOTAL_STONES as f64
}

/// Evaluate `board` from `player`'s perspective, in (-1, 1)
pub fn evaluate(board: &Board, player: Player) -> f64 {
    evaluate_with(board, player, &DEFAULT_WEIGHTS)
}

/// Evaluate with custom weights
pub fn evaluate_with(board: &Board, player: Player, weights: &EvalWeights) -> f64 {
    let opponent = player.opponent();
    let phase = game_phase(board);

    let store_diff =
        (board.store(player) as f64 - board.store(opponent) as f64) / TOTAL_STONES as f64;
    let store_weight = weights.store_base + weights.store_phase * phase;

    let my_side = board.side_stones(player) as f64;
    let opp_side = board.side_stones(opponent) as f64;
    let in_play = my_side + opp_side;
    let side_diff = if in_play > 0.0 {
        (my_side - opp_side) / in_play
    } else {
        0.0
    };
    let side_weight = weights.side_base * (1.0 - weights.side_phase_decay * phase);

    let mobility_diff = (board.mobility(player) as f64 - board.mobility(opponent) as f64)
        / PITS_PER_SIDE as f64;
    let mobility_weight = weights.mobility_base * (1.0 - weights.mobility_phase_decay * phase);

    let mine = tactics(board, player);
    let theirs = tactics(board, opponent);

    let extra_score = (mine.extra_turns as f64 / weights.extra_turn_scale).tanh();
    let capture_score = (mine.capture_value as f64 / weights.capture_scale).tanh();
    let threat_score = -(theirs.extra_turns as f64 / weights.threat_scale).tanh();

    let total = store_weight * store_diff
        + side_weight * side_diff
        + mobility_weight * mobility_diff
        + weights.extra_turn_weight * extra_score
        + weights.capture_weight * capture_score
        + weights.threat_weight * threat_score;

    (total / weights.output_scale).tanh()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn random_position(rng: &mut ChaCha8Rng, plies: usize) -> (Board, Player) {
        let mut board = Board::new();
        let mut player = Player::South;
        for _ in 0..plies {
            let moves = board.valid_moves(player);
            let Some(&pit) = moves.choose(rng) else {
                break;
            };
            let (next, extra) = board.apply_move(pit, player);
            board = next;
            if !extra {
                player = player.opponent();
            }
            if board.is_game_over() {
                break;
            }
        }
        (board, player)
    }

    #[test]
    fn test_initial_position_near_zero() {
        let board = Board::new();
        let south = evaluate(&board, Player::South);
        let north = evaluate(&board, Player::North);
        assert!(south.abs() < 0.05, "south score {} should be near 0", south);
        assert!(north.abs() < 0.05, "north score {} should be near 0", north);
        // Both sides see one extra-turn move for themselves and one for the opponent
        assert!((south - north).abs() < 1e-12);
    }

    #[test]
    fn test_game_phase() {
        assert_eq!(game_phase(&Board::new()), 0.0);
        let drained = Board::from_pits([0, 0, 0, 0, 0, 0, 24, 0, 0, 0, 0, 0, 0, 24]).unwrap();
        assert_eq!(game_phase(&drained), 1.0);
    }

    #[test]
    fn test_bounded() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for plies in 0..200 {
            let (board, _) = random_position(&mut rng, plies % 60);
            for player in [Player::South, Player::North] {
                let score = evaluate(&board, player);
                assert!(score > -1.0 && score < 1.0, "score {} out of range", score);
            }
        }

        let lopsided = Board::from_pits([0, 0, 0, 0, 0, 0, 48, 0, 0, 0, 0, 0, 0, 0]).unwrap();
        let score = evaluate(&lopsided, Player::South);
        assert!(score > 0.9 && score < 1.0);
        assert!(evaluate(&lopsided, Player::North) < -0.9);
    }

    #[test]
    fn test_bounded_on_extreme_boards() {
        let extremes = [
            [0, 0, 0, 0, 0, 0, 48, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 48],
            [48, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 48, 0],
            [8, 8, 8, 8, 8, 8, 0, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 8, 8, 8, 8, 8, 8, 0],
            [0, 0, 0, 0, 0, 24, 0, 0, 0, 0, 0, 0, 24, 0],
            [0, 0, 0, 0, 0, 0, 24, 4, 4, 4, 4, 4, 4, 0],
            [1, 0, 1, 0, 1, 0, 0, 14, 0, 14, 0, 14, 0, 3],
            [6, 5, 4, 3, 2, 1, 0, 1, 2, 3, 4, 5, 6, 6],
        ];

        for pits in extremes {
            let board = Board::from_pits(pits).unwrap();
            for player in [Player::South, Player::North] {
                let score = evaluate(&board, player);
                assert!(
                    score > -1.0 && score < 1.0,
                    "score {} out of range for {:?} on {:?}",
                    score,
                    player,
                    pits
                );
            }
        }

        let north_sweep = Board::from_pits(extremes[1]).unwrap();
        assert!(evaluate(&north_sweep, Player::North) > 0.9);
        assert!(evaluate(&north_sweep, Player::South) < -0.9);
    }

    #[test]
    fn test_mirrored_board_same_score_for_swapped_player() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for plies in 0..100 {
            let (board, _) = random_position(&mut rng, plies % 40);
            let direct = evaluate(&board, Player::South);
            let mirrored = evaluate(&board.mirrored(), Player::North);
            assert!((direct - mirrored).abs() < 1e-12);
        }
    }

    #[test]
    fn test_antisymmetric_without_tactics() {
        // Seven stones always land on the far side: no tactical terms
        let board = Board::from_pits([0, 0, 0, 7, 7, 7, 5, 0, 0, 0, 7, 7, 7, 1]).unwrap();
        assert_eq!(tactics(&board, Player::South), Tactics::default());
        assert_eq!(tactics(&board, Player::North), Tactics::default());

        let south = evaluate(&board, Player::South);
        let north = evaluate(&board, Player::North);
        assert!(south > 0.0);
        assert!((south + north).abs() < 1e-12);
    }

    #[test]
    fn test_tactics_extra_turn_and_capture() {
        // Pit 2 (4 stones) reaches the store; pit 0 (1 stone) ends in empty pit 1
        let board = Board::from_pits([1, 0, 4, 4, 4, 4, 0, 4, 4, 4, 4, 6, 4, 0]).unwrap();
        let found = tactics(&board, Player::South);
        assert_eq!(found.extra_turns, 1);
        assert_eq!(found.capture_value, 6);
    }

    #[test]
    fn test_threat_lowers_score() {
        // North pit 12 holds one stone: a free extra turn for North
        let quiet = Board::from_pits([3, 3, 3, 3, 3, 3, 0, 3, 3, 3, 3, 3, 2, 0]).unwrap();
        let threat = Board::from_pits([3, 3, 3, 3, 3, 3, 0, 3, 3, 3, 3, 4, 1, 0]).unwrap();
        assert!(evaluate(&threat, Player::South) < evaluate(&quiet, Player::South));
    }

    #[test]
    fn test_store_lead_matters_more_late() {
        let early = Board::from_pits([4, 4, 4, 4, 4, 3, 3, 4, 4, 4, 4, 4, 3, 0]).unwrap();
        let late = Board::from_pits([0, 0, 0, 0, 1, 0, 25, 0, 0, 0, 0, 0, 1, 21]).unwrap();
        let w = EvalWeights::default();
        let early_weight = w.store_base + w.store_phase * game_phase(&early);
        let late_weight = w.store_base + w.store_phase * game_phase(&late);
        assert!(late_weight > early_weight);
    }

    #[test]
    fn test_custom_weights() {
        let board = Board::from_pits([4, 4, 4, 4, 4, 4, 10, 4, 4, 4, 4, 4, 4, 0]).unwrap();
        let store_only = EvalWeights {
            side_base: 0.0,
            mobility_base: 0.0,
            extra_turn_weight: 0.0,
            capture_weight: 0.0,
            threat_weight: 0.0,
            ..EvalWeights::default()
        };
        let expected = ((10.0 * 10.0 / 48.0) / 12.0f64).tanh();
        assert!((evaluate_with(&board, Player::South, &store_only) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_weights_json_defaults() {
        let parsed: EvalWeights = serde_json::from_str(r#"{"capture_weight": 2.0}"#).unwrap();
        assert_eq!(parsed.capture_weight, 2.0);
        assert_eq!(parsed.store_base, DEFAULT_WEIGHTS.store_base);
    }
}
