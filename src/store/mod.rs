//! Storage seam for the tile pool and per-person bingo state.
//!
//! ARCHITECTURE
//! ============
//! `BingoStore` is the only thing the service talks to. Two backends:
//! `MemoryStore` for tests and embedding, `PgStore` for the shared festival
//! database. Both serialise mutations of one person's board through
//! [`BingoStore::modify_board`], which runs the caller's closure inside a
//! per-person critical section (a mutex in memory, a row lock in Postgres).
//! There is never a lock spanning two people.

pub mod memory;
pub mod postgres;

use serde::{Deserialize, Serialize};

use crate::bingo::{PersonBoardState, TileItem};
use crate::error::ErrorCode;

pub use memory::MemoryStore;
pub use postgres::PgStore;

// =============================================================================
// TYPES
// =============================================================================

/// Attendance status of a group member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttendanceStatus {
    #[default]
    Going,
    Maybe,
    NotGoing,
}

impl AttendanceStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Going => "going",
            Self::Maybe => "maybe",
            Self::NotGoing => "not-going",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "going" => Some(Self::Going),
            "maybe" => Some(Self::Maybe),
            "not-going" | "not_going" => Some(Self::NotGoing),
            _ => None,
        }
    }
}

/// Group member as the bingo component sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub status: AttendanceStatus,
}

/// A member plus their bingo state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonRecord {
    pub person: Person,
    pub board: PersonBoardState,
}

impl PersonRecord {
    #[must_use]
    pub fn new(person: Person) -> Self {
        let board = PersonBoardState::new(person.id);
        Self { person, board }
    }
}

/// Mutation applied to one person's board inside the store's critical section.
pub type BoardMutation<'a> = &'a mut (dyn FnMut(&mut PersonBoardState) + Send);

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

impl ErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Database(_) => "E_DATABASE",
            Self::Migrate(_) => "E_MIGRATE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Database(sqlx::Error::PoolTimedOut | sqlx::Error::Io(_)))
    }
}

// =============================================================================
// TRAIT
// =============================================================================

#[async_trait::async_trait]
pub trait BingoStore: Send + Sync {
    /// All pool rows in `(sort_order, id)` order.
    async fn list_tiles(&self) -> Result<Vec<TileItem>, StoreError>;

    /// Set a tile's label. `None` if the tile does not exist.
    async fn update_tile_label(&self, tile_id: i64, label: &str) -> Result<Option<TileItem>, StoreError>;

    /// Install `items` only if the pool is empty. Returns whether anything was written.
    async fn seed_tiles_if_empty(&self, items: &[TileItem]) -> Result<bool, StoreError>;

    /// Add a member with a store-assigned id.
    async fn create_person(&self, name: &str, status: AttendanceStatus) -> Result<Person, StoreError>;

    /// Insert or update a member with a known id. Bingo state is left untouched.
    async fn upsert_person(&self, person: &Person) -> Result<Person, StoreError>;

    /// Change a member's attendance. `None` if the member does not exist.
    async fn set_status(&self, person_id: i64, status: AttendanceStatus) -> Result<Option<Person>, StoreError>;

    async fn get_person(&self, person_id: i64) -> Result<Option<PersonRecord>, StoreError>;

    /// Every member, ascending id.
    async fn list_people(&self) -> Result<Vec<PersonRecord>, StoreError>;

    /// Read, mutate and write one person's board atomically.
    /// Returns the state after `mutate`, or `None` if the person does not exist.
    async fn modify_board(
        &self,
        person_id: i64,
        mutate: BoardMutation<'_>,
    ) -> Result<Option<PersonBoardState>, StoreError>;

    /// Empty every member's checked set, keeping completions. Returns rows touched.
    async fn clear_all_checks(&self) -> Result<u64, StoreError>;
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
