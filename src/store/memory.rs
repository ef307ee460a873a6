//! In-memory store.
//!
//! DESIGN
//! ======
//! Each person lives behind their own `Mutex`, held in a map guarded by an
//! `RwLock`. `modify_board` takes the map lock only long enough to clone the
//! person's `Arc`, then holds that person's mutex across read-decide-write.
//! Toggles for different people never contend.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use tokio::sync::{Mutex, RwLock};

use super::{AttendanceStatus, BingoStore, BoardMutation, Person, PersonRecord, StoreError};
use crate::bingo::pool::sort_items;
use crate::bingo::{PersonBoardState, TileItem};

type PersonSlot = Arc<Mutex<PersonRecord>>;

pub struct MemoryStore {
    tiles: RwLock<Vec<TileItem>>,
    people: RwLock<BTreeMap<i64, PersonSlot>>,
    next_person_id: AtomicI64,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self { tiles: RwLock::new(Vec::new()), people: RwLock::new(BTreeMap::new()), next_person_id: AtomicI64::new(1) }
    }

    /// Store pre-populated with a tile pool.
    #[must_use]
    pub fn with_tiles(items: Vec<TileItem>) -> Self {
        Self { tiles: RwLock::new(items), ..Self::new() }
    }

    async fn slot(&self, person_id: i64) -> Option<PersonSlot> {
        self.people.read().await.get(&person_id).cloned()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl BingoStore for MemoryStore {
    async fn list_tiles(&self) -> Result<Vec<TileItem>, StoreError> {
        let mut items = self.tiles.read().await.clone();
        sort_items(&mut items);
        Ok(items)
    }

    async fn update_tile_label(&self, tile_id: i64, label: &str) -> Result<Option<TileItem>, StoreError> {
        let mut tiles = self.tiles.write().await;
        let Some(item) = tiles.iter_mut().find(|t| t.id == tile_id) else {
            return Ok(None);
        };
        label.clone_into(&mut item.label);
        Ok(Some(item.clone()))
    }

    async fn seed_tiles_if_empty(&self, items: &[TileItem]) -> Result<bool, StoreError> {
        let mut tiles = self.tiles.write().await;
        if !tiles.is_empty() {
            return Ok(false);
        }
        tiles.extend_from_slice(items);
        Ok(true)
    }

    async fn create_person(&self, name: &str, status: AttendanceStatus) -> Result<Person, StoreError> {
        let mut people = self.people.write().await;
        let mut id = self.next_person_id.fetch_add(1, Ordering::Relaxed);
        while people.contains_key(&id) {
            id = self.next_person_id.fetch_add(1, Ordering::Relaxed);
        }
        let person = Person { id, name: name.to_owned(), status };
        people.insert(id, Arc::new(Mutex::new(PersonRecord::new(person.clone()))));
        Ok(person)
    }

    async fn upsert_person(&self, person: &Person) -> Result<Person, StoreError> {
        let slot = {
            let mut people = self.people.write().await;
            match people.get(&person.id) {
                Some(slot) => slot.clone(),
                None => {
                    people.insert(person.id, Arc::new(Mutex::new(PersonRecord::new(person.clone()))));
                    return Ok(person.clone());
                }
            }
        };
        let mut record = slot.lock().await;
        record.person.name.clone_from(&person.name);
        record.person.status = person.status;
        Ok(record.person.clone())
    }

    async fn set_status(&self, person_id: i64, status: AttendanceStatus) -> Result<Option<Person>, StoreError> {
        let Some(slot) = self.slot(person_id).await else {
            return Ok(None);
        };
        let mut record = slot.lock().await;
        record.person.status = status;
        Ok(Some(record.person.clone()))
    }

    async fn get_person(&self, person_id: i64) -> Result<Option<PersonRecord>, StoreError> {
        let Some(slot) = self.slot(person_id).await else {
            return Ok(None);
        };
        let record = slot.lock().await.clone();
        Ok(Some(record))
    }

    async fn list_people(&self) -> Result<Vec<PersonRecord>, StoreError> {
        let slots: Vec<PersonSlot> = self.people.read().await.values().cloned().collect();
        let mut out = Vec::with_capacity(slots.len());
        for slot in slots {
            out.push(slot.lock().await.clone());
        }
        Ok(out)
    }

    async fn modify_board(
        &self,
        person_id: i64,
        mutate: BoardMutation<'_>,
    ) -> Result<Option<PersonBoardState>, StoreError> {
        let Some(slot) = self.slot(person_id).await else {
            return Ok(None);
        };
        let mut record = slot.lock().await;
        mutate(&mut record.board);
        Ok(Some(record.board.clone()))
    }

    async fn clear_all_checks(&self) -> Result<u64, StoreError> {
        let slots: Vec<PersonSlot> = self.people.read().await.values().cloned().collect();
        let mut touched = 0;
        for slot in slots {
            let mut record = slot.lock().await;
            if !record.board.checked.is_empty() {
                record.board.clear_checks();
                touched += 1;
            }
        }
        Ok(touched)
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
