//! Bingo service — boards, toggles, tile edits and the leaderboard.
//!
//! DESIGN
//! ======
//! Thin orchestration over the pure `bingo` module. Every call loads what
//! it needs from the store (the pool snapshot, one person's record), runs
//! the pure logic, and writes back through the store's per-person critical
//! section. Nothing is cached between calls, so a label edit is visible on
//! the very next board read.
//!
//! ERROR HANDLING
//! ==============
//! `Configuration` and the invalid-argument variants are caller bugs and
//! are never retried here. Store errors pass through unchanged.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::bingo::pool::{normalize_label, placeholder_items};
use crate::bingo::tracker::{CompletionClaim, validate_position};
use crate::bingo::{
    BingoError, CheckedSet, LeaderboardEntry, Tile, TileItem, TilePool, ToggleOutcome, layout, rank_completions,
};
use crate::clock::Clock;
use crate::store::{AttendanceStatus, BingoStore, Person, PersonRecord};

// =============================================================================
// TYPES
// =============================================================================

/// Board as shown to one person: layout plus their progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    pub person_id: i64,
    pub tiles: Vec<Tile>,
    pub checked: CheckedSet,
    /// Cells on a completed line, for highlighting.
    pub winning_positions: BTreeSet<usize>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
}

/// Result of toggling one tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleResult {
    pub checked: CheckedSet,
    #[serde(skip)]
    pub outcome: ToggleOutcome,
    #[serde(with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
}

// =============================================================================
// SERVICE
// =============================================================================

#[derive(Clone)]
pub struct BingoService {
    store: Arc<dyn BingoStore>,
    clock: Arc<dyn Clock>,
}

impl BingoService {
    #[must_use]
    pub fn new(store: Arc<dyn BingoStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    // -------------------------------------------------------------------------
    // tiles
    // -------------------------------------------------------------------------

    /// The pool in display order.
    ///
    /// # Errors
    ///
    /// Returns a store error if the pool cannot be read.
    pub async fn list_tiles(&self) -> Result<Vec<TileItem>, BingoError> {
        Ok(self.store.list_tiles().await?)
    }

    /// Install the placeholder pool if there is none. Returns whether it was installed.
    ///
    /// # Errors
    ///
    /// Returns a store error if the write fails.
    pub async fn seed_tiles(&self) -> Result<bool, BingoError> {
        let seeded = self.store.seed_tiles_if_empty(&placeholder_items()).await?;
        if seeded {
            info!("seeded placeholder bingo tiles");
        }
        Ok(seeded)
    }

    /// Replace one tile's label. Whitespace is trimmed; empty is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`BingoError::TileNotFound`] for an unknown id.
    pub async fn edit_tile_label(&self, tile_id: i64, label: &str) -> Result<TileItem, BingoError> {
        let label = normalize_label(label);
        let item = self
            .store
            .update_tile_label(tile_id, &label)
            .await?
            .ok_or(BingoError::TileNotFound(tile_id))?;
        info!(tile_id, label = %item.label, "bingo tile relabelled");
        Ok(item)
    }

    // -------------------------------------------------------------------------
    // boards
    // -------------------------------------------------------------------------

    /// Lay out a person's board from the current pool and attach their progress.
    ///
    /// # Errors
    ///
    /// Returns [`BingoError::Configuration`] if the pool is not 25 items and
    /// [`BingoError::PersonNotFound`] for an unknown person.
    pub async fn get_board(&self, person_id: i64) -> Result<BoardView, BingoError> {
        let pool = TilePool::new(self.store.list_tiles().await?)?;
        let record = self
            .store
            .get_person(person_id)
            .await?
            .ok_or(BingoError::PersonNotFound(person_id))?;

        let board = layout::layout_board(person_id, &pool);
        debug!(person_id, checked = record.board.checked.len(), "board generated");

        Ok(BoardView {
            person_id,
            tiles: board.tiles,
            winning_positions: record.board.winning_positions(),
            checked: record.board.checked,
            completed_at: record.board.completed_at,
        })
    }

    /// Flip one tile for a person, stamping their first completion if this wins.
    ///
    /// # Errors
    ///
    /// Returns [`BingoError::InvalidPosition`] outside `0..=24` and
    /// [`BingoError::PersonNotFound`] for an unknown person.
    pub async fn toggle_tile(&self, person_id: i64, position: i64) -> Result<ToggleResult, BingoError> {
        let position = validate_position(position)?;

        let mut outcome = None;
        let clock = &self.clock;
        let board = self
            .store
            .modify_board(person_id, &mut |board| outcome = Some(board.toggle(position, clock.now())))
            .await?
            .ok_or(BingoError::PersonNotFound(person_id))?;
        let outcome = outcome.ok_or(BingoError::PersonNotFound(person_id))?;

        if outcome.newly_completed {
            info!(person_id, position, completed_at = ?board.completed_at, "bingo completed");
        } else {
            debug!(person_id, position, checked = outcome.checked, "tile toggled");
        }

        Ok(ToggleResult { checked: board.checked, outcome, completed_at: board.completed_at })
    }

    /// Claim a completion without toggling. Keeps an earlier stamp if one exists.
    ///
    /// # Errors
    ///
    /// Returns [`BingoError::PersonNotFound`] for an unknown person.
    pub async fn mark_complete(&self, person_id: i64) -> Result<CompletionClaim, BingoError> {
        let mut claim = None;
        let clock = &self.clock;
        self.store
            .modify_board(person_id, &mut |board| claim = Some(board.claim_completion(clock.now())))
            .await?
            .ok_or(BingoError::PersonNotFound(person_id))?;
        let claim = claim.ok_or(BingoError::PersonNotFound(person_id))?;

        if let CompletionClaim::Recorded(at) = claim {
            info!(person_id, completed_at = %at, "bingo completion claimed");
        }
        Ok(claim)
    }

    /// Clear every checked set after the pool changes shape. Completions stay.
    ///
    /// # Errors
    ///
    /// Returns a store error if the update fails.
    pub async fn reset_checks(&self) -> Result<u64, BingoError> {
        let touched = self.store.clear_all_checks().await?;
        info!(touched, "cleared bingo checks");
        Ok(touched)
    }

    /// Ranked first completions among people who are going.
    ///
    /// # Errors
    ///
    /// Returns a store error if members cannot be read.
    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, BingoError> {
        let people = self.store.list_people().await?;
        Ok(rank_completions(&people))
    }

    // -------------------------------------------------------------------------
    // people
    // -------------------------------------------------------------------------

    /// # Errors
    ///
    /// Returns a store error if the insert fails.
    pub async fn add_person(&self, name: &str, status: AttendanceStatus) -> Result<Person, BingoError> {
        let person = self.store.create_person(name.trim(), status).await?;
        info!(person_id = person.id, status = person.status.as_str(), "member added");
        Ok(person)
    }

    /// # Errors
    ///
    /// Returns a store error if the write fails.
    pub async fn upsert_person(&self, person: &Person) -> Result<Person, BingoError> {
        Ok(self.store.upsert_person(person).await?)
    }

    /// # Errors
    ///
    /// Returns [`BingoError::PersonNotFound`] for an unknown person.
    pub async fn set_status(&self, person_id: i64, status: AttendanceStatus) -> Result<Person, BingoError> {
        self.store
            .set_status(person_id, status)
            .await?
            .ok_or(BingoError::PersonNotFound(person_id))
    }

    /// # Errors
    ///
    /// Returns a store error if members cannot be read.
    pub async fn list_people(&self) -> Result<Vec<PersonRecord>, BingoError> {
        Ok(self.store.list_people().await?)
    }
}

#[cfg(test)]
#[path = "bingo_test.rs"]
mod tests;
