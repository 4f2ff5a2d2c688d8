//! Turn flow: alternating movers, extra turns and end-of-game collection

use crate::board::{Board, Outcome, Player};
use serde::{Deserialize, Serialize};

/// Reasons a requested move is refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("the game is already over")]
    GameOver,

    #[error("pit {pit} does not belong to {player}")]
    NotOwnPit { pit: usize, player: Player },

    #[error("pit {0} is empty")]
    EmptyPit(usize),
}

/// One applied move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub pit: usize,
    pub player: Player,
    /// The same player moves next
    pub extra_turn: bool,
    /// Stones moved into the store by a capture
    pub captured: u8,
    /// This move ended the game
    pub game_over: bool,
}

/// Game in progress (South moves first)
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    to_move: Player,
    history: Vec<Turn>,
    finished: bool,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self::from_position(Board::new(), Player::South)
    }

    /// Resume from an arbitrary position. A finished board is collected at once.
    pub fn from_position(board: Board, to_move: Player) -> Self {
        let mut game = Self {
            board,
            to_move,
            history: Vec::new(),
            finished: false,
        };
        game.check_finished();
        game
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Player {
        self.to_move
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn is_over(&self) -> bool {
        self.finished
    }

    /// Store counts as (South, North)
    pub fn scores(&self) -> (u8, u8) {
        (self.board.store(Player::South), self.board.store(Player::North))
    }

    /// Final result, once the game is over
    pub fn outcome(&self) -> Option<Outcome> {
        self.finished.then(|| self.board.outcome())
    }

    /// Sow from `pit` for the player to move
    pub fn play(&mut self, pit: usize) -> Result<Turn, GameError> {
        if self.finished {
            return Err(GameError::GameOver);
        }
        let player = self.to_move;
        if !player.owns_pit(pit) {
            return Err(GameError::NotOwnPit { pit, player });
        }
        if self.board.pit(pit) == 0 {
            return Err(GameError::EmptyPit(pit));
        }

        let result = self.board.apply_move_detailed(pit, player);
        self.board = result.board;
        if !result.extra_turn {
            self.to_move = player.opponent();
        }
        self.check_finished();

        let turn = Turn {
            pit,
            player,
            extra_turn: result.extra_turn,
            captured: result.captured,
            game_over: self.finished,
        };
        self.history.push(turn);
        Ok(turn)
    }

    fn check_finished(&mut self) {
        if !self.finished && self.board.is_game_over() {
            self.board.collect_remaining();
            self.finished = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_new_game() {
        let game = Game::new();
        assert_eq!(game.to_move(), Player::South);
        assert!(!game.is_over());
        assert_eq!(game.outcome(), None);
        assert_eq!(game.scores(), (0, 0));
    }

    #[test]
    fn test_extra_turn_keeps_mover() {
        let mut game = Game::new();
        let turn = game.play(2).unwrap();
        assert!(turn.extra_turn);
        assert_eq!(game.to_move(), Player::South);

        let turn = game.play(0).unwrap();
        assert!(!turn.extra_turn);
        assert_eq!(game.to_move(), Player::North);
        assert_eq!(game.history().len(), 2);
    }

    #[test]
    fn test_rejects_bad_moves() {
        let mut game = Game::new();
        assert_eq!(
            game.play(8),
            Err(GameError::NotOwnPit {
                pit: 8,
                player: Player::South
            })
        );
        assert_eq!(
            game.play(6),
            Err(GameError::NotOwnPit {
                pit: 6,
                player: Player::South
            })
        );

        game.play(2).unwrap();
        assert_eq!(game.play(2), Err(GameError::EmptyPit(2)));
        assert!(game.history().len() == 1);
    }

    #[test]
    fn test_capture_reported() {
        let board = Board::from_pits([1, 0, 4, 4, 4, 4, 14, 4, 4, 4, 4, 4, 4, 0]).unwrap();
        let mut game = Game::from_position(board, Player::South);
        let turn = game.play(0).unwrap();
        assert_eq!(turn.captured, 5);
        assert_eq!(game.scores().0, 19);
    }

    #[test]
    fn test_game_over_collects_once() {
        // South's last stone goes into the store, emptying South's side
        let board = Board::from_pits([0, 0, 0, 0, 0, 1, 20, 2, 3, 0, 0, 0, 1, 21]).unwrap();
        let mut game = Game::from_position(board, Player::South);
        let turn = game.play(5).unwrap();

        assert!(turn.game_over);
        assert!(game.is_over());
        assert_eq!(game.scores(), (21, 27));
        assert_eq!(game.outcome(), Some(Outcome::Win(Player::North)));
        assert_eq!(game.play(7), Err(GameError::GameOver));
    }

    #[test]
    fn test_finished_position() {
        let board = Board::from_pits([0, 0, 0, 0, 0, 0, 24, 0, 0, 0, 0, 20, 4, 0]).unwrap();
        let game = Game::from_position(board, Player::North);
        assert!(game.is_over());
        assert_eq!(game.outcome(), Some(Outcome::Draw));
    }

    #[test]
    fn test_random_games_conserve_stones() {
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        for _ in 0..200 {
            let mut game = Game::new();
            while !game.is_over() {
                let moves = game.board().valid_moves(game.to_move());
                let pit = *moves.choose(&mut rng).unwrap();
                game.play(pit).unwrap();
                assert_eq!(game.board().total(), 48);
            }
            assert_eq!(game.board().stones_in_play(), 0);
            let (south, north) = game.scores();
            assert_eq!(south as u32 + north as u32, 48);
        }
    }
}
