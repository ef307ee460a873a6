//! Bingo — per-person boards, win detection, completion tracking, ranking.
//!
//! DESIGN
//! ======
//! Boards are never stored. Every read recomputes the layout from the
//! person's id and the current tile pool snapshot, so editing a tile label
//! is a single row update with no fan-out. The only per-person state is the
//! set of checked positions and the first completion timestamp.
//!
//! Everything in this module is pure: callers pass the pool and the clock
//! reading in, and persist whatever comes back.

pub mod layout;
pub mod leaderboard;
pub mod lines;
pub mod pool;
pub mod tracker;

pub use layout::{Board, CENTER_POSITION, CELL_COUNT, GRID_SIZE, Tile, generate_board};
pub use leaderboard::{LeaderboardEntry, rank_completions};
pub use lines::{WINNING_LINES, has_bingo, winning_positions};
pub use pool::{CENTER_ITEM_INDEX, POOL_SIZE, TileItem, TilePool};
pub use tracker::{CheckedSet, PersonBoardState, ToggleOutcome};

use crate::error::ErrorCode;
use crate::store::StoreError;

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum BingoError {
    #[error("tile pool must contain exactly {expected} items (found {found})", expected = POOL_SIZE)]
    Configuration { found: usize },
    #[error("tile position {0} is out of range (expected 0..={max})", max = CELL_COUNT - 1)]
    InvalidPosition(i64),
    #[error("person not found: {0}")]
    PersonNotFound(i64),
    #[error("bingo tile not found: {0}")]
    TileNotFound(i64),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl BingoError {
    /// True for the caller-error class (bad position, unknown person or tile).
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidPosition(_) | Self::PersonNotFound(_) | Self::TileNotFound(_))
    }
}

impl ErrorCode for BingoError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "E_BINGO_CONFIG",
            Self::InvalidPosition(_) => "E_INVALID_POSITION",
            Self::PersonNotFound(_) => "E_PERSON_NOT_FOUND",
            Self::TileNotFound(_) => "E_TILE_NOT_FOUND",
            Self::Store(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Store(e) => e.retryable(),
            _ => false,
        }
    }
}
