//! Deterministic per-person board layout.
//!
//! DESIGN
//! ======
//! The free item always sits at grid position 12. The other 24 items fill
//! the remaining positions (ascending) in the order given by a Fisher–Yates
//! shuffle of `0..24` seeded from the person id.
//!
//! Seed rule: the low 32 bits of `person_id` (two's complement), with zero
//! replaced by 1. The generator is the 32-bit mixer the planner has always
//! used, reproduced bit-for-bit so layouts match boards people have already
//! seen. It is not cryptographic.

use serde::Serialize;

use super::BingoError;
use super::pool::{TileItem, TilePool};

/// Width and height of the grid.
pub const GRID_SIZE: usize = 5;

/// Total cells on a board.
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// Row-major index of the free tile (row 2, col 2).
pub const CENTER_POSITION: usize = 12;

// =============================================================================
// PRNG
// =============================================================================

/// Small deterministic 32-bit generator keyed on a person id.
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    #[must_use]
    pub fn from_person_id(person_id: i64) -> Self {
        // Truncation is the seed rule.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let low = person_id as u32;
        Self { state: if low == 0 { 1 } else { low } }
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut s = self.state;
        s = (s ^ (s >> 15)).wrapping_mul(s | 1);
        s ^= s.wrapping_add((s ^ (s >> 7)).wrapping_mul(s | 61));
        self.state = s;
        s ^ (s >> 14)
    }
}

/// Permutation of `0..len` for the given person.
#[must_use]
pub fn seeded_permutation(len: usize, person_id: i64) -> Vec<usize> {
    let mut rng = SeededRng::from_person_id(person_id);
    let mut order: Vec<usize> = (0..len).collect();
    for i in (1..len).rev() {
        let bound = u32::try_from(i + 1).unwrap_or(u32::MAX);
        let j = (rng.next_u32() % bound) as usize;
        order.swap(i, j);
    }
    order
}

// =============================================================================
// BOARD
// =============================================================================

/// One cell of a generated board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tile {
    pub position: usize,
    pub label: String,
}

/// A person's 5×5 board, row-major, one tile per position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    pub person_id: i64,
    pub tiles: Vec<Tile>,
}

impl Board {
    /// Label at a grid position, if the position is on the board.
    #[must_use]
    pub fn label_at(&self, position: usize) -> Option<&str> {
        self.tiles.get(position).map(|t| t.label.as_str())
    }

    /// Labels grouped into rows for display.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(GRID_SIZE)
    }
}

/// Build a board from a raw pool.
///
/// # Errors
///
/// Returns [`BingoError::Configuration`] if the pool is not exactly 25 items.
pub fn generate_board(person_id: i64, items: &[TileItem]) -> Result<Board, BingoError> {
    let pool = TilePool::new(items.to_vec())?;
    Ok(layout_board(person_id, &pool))
}

/// Build a board from an already validated pool.
#[must_use]
pub fn layout_board(person_id: i64, pool: &TilePool) -> Board {
    let others: Vec<&TileItem> = pool.others().collect();
    let order = seeded_permutation(others.len(), person_id);

    let mut labels: Vec<String> = vec![String::new(); CELL_COUNT];
    labels[CENTER_POSITION].clone_from(&pool.center().label);

    let free_positions = (0..CELL_COUNT).filter(|p| *p != CENTER_POSITION);
    for (position, item_index) in free_positions.zip(order) {
        labels[position].clone_from(&others[item_index].label);
    }

    let tiles = labels
        .into_iter()
        .enumerate()
        .map(|(position, label)| Tile { position, label })
        .collect();

    Board { person_id, tiles }
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod tests;
