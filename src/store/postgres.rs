//! Postgres store.
//!
//! DESIGN
//! ======
//! Bingo state lives on the `members` row (`bingo_checked`,
//! `bingo_completed_at`) and the pool in `bingo_items`. `modify_board` opens
//! a transaction and takes `SELECT ... FOR UPDATE` on the member row, so two
//! concurrent toggles for the same person queue on the row lock while other
//! members stay writable.

use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::warn;

use super::{AttendanceStatus, BingoStore, BoardMutation, Person, PersonRecord, StoreError};
use crate::bingo::tracker::{decode_checked, encode_checked};
use crate::bingo::{PersonBoardState, TileItem};

type MemberRow = (i64, String, String, serde_json::Value, Option<OffsetDateTime>);

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn parse_status(person_id: i64, raw: &str) -> AttendanceStatus {
    AttendanceStatus::parse(raw).unwrap_or_else(|| {
        warn!(person_id, status = raw, "unknown attendance status; treating as not going");
        AttendanceStatus::NotGoing
    })
}

fn record_from_row((id, name, status, checked, completed_at): MemberRow) -> PersonRecord {
    let status = parse_status(id, &status);
    PersonRecord {
        person: Person { id, name, status },
        board: PersonBoardState { person_id: id, checked: decode_checked(&checked), completed_at },
    }
}

#[async_trait::async_trait]
impl BingoStore for PgStore {
    async fn list_tiles(&self) -> Result<Vec<TileItem>, StoreError> {
        let rows = sqlx::query_as::<_, (i64, String, i32)>(
            "SELECT id, label, sort_order FROM bingo_items ORDER BY sort_order, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, label, sort_order)| TileItem { id, label, sort_order })
            .collect())
    }

    async fn update_tile_label(&self, tile_id: i64, label: &str) -> Result<Option<TileItem>, StoreError> {
        let row = sqlx::query_as::<_, (i64, String, i32)>(
            "UPDATE bingo_items SET label = $2 WHERE id = $1 RETURNING id, label, sort_order",
        )
        .bind(tile_id)
        .bind(label)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, label, sort_order)| TileItem { id, label, sort_order }))
    }

    async fn seed_tiles_if_empty(&self, items: &[TileItem]) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("LOCK TABLE bingo_items IN EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        let existing: i64 = sqlx::query_scalar("SELECT count(*) FROM bingo_items")
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        for item in items {
            sqlx::query("INSERT INTO bingo_items (label, sort_order) VALUES ($1, $2)")
                .bind(&item.label)
                .bind(item.sort_order)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(true)
    }

    async fn create_person(&self, name: &str, status: AttendanceStatus) -> Result<Person, StoreError> {
        let id: i64 = sqlx::query_scalar("INSERT INTO members (name, status) VALUES ($1, $2) RETURNING id")
            .bind(name)
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(Person { id, name: name.to_owned(), status })
    }

    async fn upsert_person(&self, person: &Person) -> Result<Person, StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "INSERT INTO members (id, name, status) VALUES ($1, $2, $3) \
             ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, status = EXCLUDED.status",
        )
        .bind(person.id)
        .bind(&person.name)
        .bind(person.status.as_str())
        .execute(&mut *tx)
        .await?;

        // Explicit ids bypass the identity sequence; move it past them so
        // create_person never hands out a taken id.
        sqlx::query(
            "SELECT setval(pg_get_serial_sequence('members', 'id'), \
             GREATEST((SELECT max(id) FROM members), 1))",
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(person.clone())
    }

    async fn set_status(&self, person_id: i64, status: AttendanceStatus) -> Result<Option<Person>, StoreError> {
        let row = sqlx::query_as::<_, (i64, String)>(
            "UPDATE members SET status = $2 WHERE id = $1 RETURNING id, name",
        )
        .bind(person_id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, name)| Person { id, name, status }))
    }

    async fn get_person(&self, person_id: i64) -> Result<Option<PersonRecord>, StoreError> {
        let row = sqlx::query_as::<_, MemberRow>(
            "SELECT id, name, status, bingo_checked, bingo_completed_at FROM members WHERE id = $1",
        )
        .bind(person_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(record_from_row))
    }

    async fn list_people(&self) -> Result<Vec<PersonRecord>, StoreError> {
        let rows = sqlx::query_as::<_, MemberRow>(
            "SELECT id, name, status, bingo_checked, bingo_completed_at FROM members ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(record_from_row).collect())
    }

    async fn modify_board(
        &self,
        person_id: i64,
        mutate: BoardMutation<'_>,
    ) -> Result<Option<PersonBoardState>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, (serde_json::Value, Option<OffsetDateTime>)>(
            "SELECT bingo_checked, bingo_completed_at FROM members WHERE id = $1 FOR UPDATE",
        )
        .bind(person_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((checked, completed_at)) = row else {
            tx.rollback().await?;
            return Ok(None);
        };

        let mut board = PersonBoardState { person_id, checked: decode_checked(&checked), completed_at };
        mutate(&mut board);

        sqlx::query("UPDATE members SET bingo_checked = $2, bingo_completed_at = $3 WHERE id = $1")
            .bind(person_id)
            .bind(encode_checked(&board.checked))
            .bind(board.completed_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(board))
    }

    async fn clear_all_checks(&self) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE members SET bingo_checked = '[]'::jsonb WHERE bingo_checked <> '[]'::jsonb",
        )
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
#[path = "postgres_test.rs"]
mod tests;
