//! Board representation and sowing rules
//!
//! The board is a flat array of 14 counts walked circularly in ascending
//! order: indices 0-5 are South's pits, 6 is South's store, 7-12 are North's
//! pits and 13 is North's store.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Pits on each side of the board
pub const PITS_PER_SIDE: usize = 6;

/// Pits plus stores
pub const BOARD_SIZE: usize = 14;

/// Stones in every pit at the start of a game
pub const STARTING_STONES: u8 = 4;

/// Stones in play for a standard game
pub const TOTAL_STONES: u32 = 48;

const SOUTH_STORE: usize = 6;
const NORTH_STORE: usize = 13;

// ============================================================================
// ERRORS
// ============================================================================

/// Errors raised when building a board from text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("expected 14 counts, found {0}")]
    WrongLength(usize),

    #[error("invalid count {value:?} at index {index}")]
    InvalidCount { index: usize, value: String },

    #[error("board holds {0} stones, more than a single pit can hold")]
    TooManyStones(u32),

    #[error("unknown player {0:?} (expected 0, 1, south or north)")]
    UnknownPlayer(String),
}

// ============================================================================
// PLAYER
// ============================================================================

/// Side of the board. South is player 0, North is player 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Player {
    South = 0,
    North = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::South => Player::North,
            Player::North => Player::South,
        }
    }

    /// Index of this player's store
    pub fn store(self) -> usize {
        match self {
            Player::South => SOUTH_STORE,
            Player::North => NORTH_STORE,
        }
    }

    /// Indices of this player's pits
    pub fn pits(self) -> Range<usize> {
        match self {
            Player::South => 0..SOUTH_STORE,
            Player::North => SOUTH_STORE + 1..NORTH_STORE,
        }
    }

    pub fn owns_pit(self, index: usize) -> bool {
        self.pits().contains(&index)
    }
}

impl From<Player> for u8 {
    fn from(player: Player) -> u8 {
        player as u8
    }
}

impl TryFrom<u8> for Player {
    type Error = BoardError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Player::South),
            1 => Ok(Player::North),
            other => Err(BoardError::UnknownPlayer(other.to_string())),
        }
    }
}

impl FromStr for Player {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "south" => Ok(Player::South),
            "1" | "north" => Ok(Player::North),
            _ => Err(BoardError::UnknownPlayer(s.to_string())),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::South => write!(f, "South"),
            Player::North => write!(f, "North"),
        }
    }
}

/// Pit facing `index` across the board
pub fn opposite(index: usize) -> usize {
    12 - index
}

/// Final result of a collected board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win(Player),
    Draw,
}

// ============================================================================
// SOWING
// ============================================================================

/// Indices that receive a stone when sowing, in order.
///
/// The opponent's store is stepped over without consuming a stone.
#[derive(Clone, Debug)]
pub struct SowingPath {
    pos: usize,
    remaining: u8,
    skip: usize,
}

impl Iterator for SowingPath {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        loop {
            self.pos = (self.pos + 1) % BOARD_SIZE;
            if self.pos != self.skip {
                break;
            }
        }
        self.remaining -= 1;
        Some(self.pos)
    }
}

/// Result of applying a move, with the capture size for reporting
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub board: Board,
    pub extra_turn: bool,
    /// Stones moved into the store by a capture (0 if none)
    pub captured: u8,
}

// ============================================================================
// BOARD
// ============================================================================

/// Board snapshot (copy to mutate)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Board {
    pits: [u8; BOARD_SIZE],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Standard starting position: four stones per pit, empty stores
    pub fn new() -> Self {
        let mut pits = [STARTING_STONES; BOARD_SIZE];
        pits[SOUTH_STORE] = 0;
        pits[NORTH_STORE] = 0;
        Self { pits }
    }

    /// Build from raw counts. The total must fit in a `u8` so no pit can overflow.
    pub fn from_pits(pits: [u8; BOARD_SIZE]) -> Result<Self, BoardError> {
        let board = Self { pits };
        let total = board.total();
        if total > u8::MAX as u32 {
            return Err(BoardError::TooManyStones(total));
        }
        Ok(board)
    }

    pub fn pits(&self) -> &[u8; BOARD_SIZE] {
        &self.pits
    }

    pub fn pit(&self, index: usize) -> u8 {
        self.pits[index]
    }

    pub fn store(&self, player: Player) -> u8 {
        self.pits[player.store()]
    }

    /// Stones in a player's pits, stores excluded
    pub fn side_stones(&self, player: Player) -> u32 {
        player.pits().map(|i| self.pits[i] as u32).sum()
    }

    /// Stones in all pits, stores excluded
    pub fn stones_in_play(&self) -> u32 {
        self.side_stones(Player::South) + self.side_stones(Player::North)
    }

    pub fn total(&self) -> u32 {
        self.pits.iter().map(|&c| c as u32).sum()
    }

    /// Indices receiving stones if `player` sows from `pit`
    pub fn sowing_path(&self, pit: usize, player: Player) -> SowingPath {
        SowingPath {
            pos: pit,
            remaining: self.pits[pit],
            skip: player.opponent().store(),
        }
    }

    /// Where the last stone sown from `pit` would land (`pit` itself if empty)
    pub fn landing(&self, pit: usize, player: Player) -> usize {
        self.sowing_path(pit, player).last().unwrap_or(pit)
    }

    /// Apply a move, returning the new board and whether the mover goes again.
    ///
    /// Sowing from an empty pit, or from a pit the player does not own,
    /// returns an unchanged copy with no extra turn.
    pub fn apply_move(&self, pit: usize, player: Player) -> (Board, bool) {
        let outcome = self.apply_move_detailed(pit, player);
        (outcome.board, outcome.extra_turn)
    }

    /// Same as [`Board::apply_move`], also reporting captured stones
    pub fn apply_move_detailed(&self, pit: usize, player: Player) -> MoveOutcome {
        let mut next = *self;
        if !player.owns_pit(pit) || self.pits[pit] == 0 {
            return MoveOutcome {
                board: next,
                extra_turn: false,
                captured: 0,
            };
        }

        next.pits[pit] = 0;
        let mut last = pit;
        for index in self.sowing_path(pit, player) {
            next.pits[index] += 1;
            last = index;
        }

        let mut captured = 0;
        if player.owns_pit(last) && next.pits[last] == 1 {
            let across = opposite(last);
            if next.pits[across] > 0 {
                captured = next.pits[last] + next.pits[across];
                next.pits[player.store()] += captured;
                next.pits[last] = 0;
                next.pits[across] = 0;
            }
        }

        MoveOutcome {
            board: next,
            extra_turn: last == player.store(),
            captured,
        }
    }

    /// Pits the player can sow from, in ascending order
    pub fn valid_moves(&self, player: Player) -> Vec<usize> {
        player.pits().filter(|&i| self.pits[i] > 0).collect()
    }

    /// Number of legal moves, without allocating
    pub fn mobility(&self, player: Player) -> usize {
        player.pits().filter(|&i| self.pits[i] > 0).count()
    }

    fn side_empty(&self, player: Player) -> bool {
        player.pits().all(|i| self.pits[i] == 0)
    }

    /// Either side has run out of stones in its pits
    pub fn is_game_over(&self) -> bool {
        self.side_empty(Player::South) || self.side_empty(Player::North)
    }

    /// Sweep the stones left on the non-empty side into that side's store.
    pub fn collect_remaining(&mut self) {
        let sweeping = if self.side_empty(Player::South) {
            Player::North
        } else if self.side_empty(Player::North) {
            Player::South
        } else {
            return;
        };

        for i in sweeping.pits() {
            self.pits[sweeping.store()] += self.pits[i];
            self.pits[i] = 0;
        }
    }

    /// Compare stores. Meaningful once remaining stones are collected.
    pub fn outcome(&self) -> Outcome {
        let south = self.store(Player::South);
        let north = self.store(Player::North);
        match south.cmp(&north) {
            std::cmp::Ordering::Greater => Outcome::Win(Player::South),
            std::cmp::Ordering::Less => Outcome::Win(Player::North),
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }

    /// Board with the two halves swapped, as seen by the other player
    pub fn mirrored(&self) -> Self {
        let mut pits = [0; BOARD_SIZE];
        for (i, slot) in pits.iter_mut().enumerate() {
            *slot = self.pits[(i + SOUTH_STORE + 1) % BOARD_SIZE];
        }
        Self { pits }
    }
}

impl FromStr for Board {
    type Err = BoardError;

    /// Parse 14 counts separated by commas and/or whitespace
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty())
            .collect();
        if fields.len() != BOARD_SIZE {
            return Err(BoardError::WrongLength(fields.len()));
        }

        let mut pits = [0u8; BOARD_SIZE];
        for (index, field) in fields.iter().enumerate() {
            pits[index] = field.parse().map_err(|_| BoardError::InvalidCount {
                index,
                value: field.to_string(),
            })?;
        }

        Board::from_pits(pits)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct RawBoard {
            pits: [u8; BOARD_SIZE],
        }

        let raw = RawBoard::deserialize(deserializer)?;
        Board::from_pits(raw.pits).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for i in Player::North.pits().rev() {
            write!(f, "{:>3}", self.pits[i])?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>3}{:width$}{:>3}",
            self.pits[NORTH_STORE],
            "",
            self.pits[SOUTH_STORE],
            width = PITS_PER_SIDE * 3
        )?;
        write!(f, "   ")?;
        for i in Player::South.pits() {
            write!(f, "{:>3}", self.pits[i])?;
        }
        Ok(())
    }
}
