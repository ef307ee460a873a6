//! Tile pool — the shared, editable set of 25 labels every board is built from.
//!
//! The pool has no intrinsic order beyond `(sort_order, id)`. Sorted index
//! [`CENTER_ITEM_INDEX`] is the free tile by convention; nothing about the
//! item itself marks it.

use serde::{Deserialize, Serialize};

use super::BingoError;

/// Number of items a valid pool holds.
pub const POOL_SIZE: usize = 25;

/// Sorted pool index of the free/center item.
pub const CENTER_ITEM_INDEX: usize = 20;

/// One row of the `bingo_items` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileItem {
    pub id: i64,
    pub label: String,
    pub sort_order: i32,
}

/// Validated pool snapshot, sorted by `(sort_order, id)`.
#[derive(Debug, Clone)]
pub struct TilePool {
    items: Vec<TileItem>,
}

impl TilePool {
    /// Sort and validate a raw pool.
    ///
    /// # Errors
    ///
    /// Returns [`BingoError::Configuration`] unless exactly [`POOL_SIZE`] items are given.
    pub fn new(mut items: Vec<TileItem>) -> Result<Self, BingoError> {
        if items.len() != POOL_SIZE {
            return Err(BingoError::Configuration { found: items.len() });
        }
        sort_items(&mut items);
        Ok(Self { items })
    }

    #[must_use]
    pub fn items(&self) -> &[TileItem] {
        &self.items
    }

    /// The free tile shown at the center of every board.
    #[must_use]
    pub fn center(&self) -> &TileItem {
        &self.items[CENTER_ITEM_INDEX]
    }

    /// The 24 shuffled items, in sorted order with the center removed.
    pub fn others(&self) -> impl Iterator<Item = &TileItem> {
        self.items
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != CENTER_ITEM_INDEX)
            .map(|(_, item)| item)
    }
}

/// Total order used everywhere the pool is listed.
pub fn sort_items(items: &mut [TileItem]) {
    items.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then(a.id.cmp(&b.id)));
}

/// Labels are stored trimmed. An empty label is allowed.
#[must_use]
pub fn normalize_label(raw: &str) -> String {
    raw.trim().to_owned()
}

/// Placeholder pool (`Item 0` .. `Item 24`) installed into an empty store.
#[must_use]
pub fn placeholder_items() -> Vec<TileItem> {
    (0..POOL_SIZE)
        .map(|i| {
            let n = i32::try_from(i).unwrap_or(i32::MAX);
            TileItem { id: i64::from(n) + 1, label: format!("Item {i}"), sort_order: n }
        })
        .collect()
}

#[cfg(test)]
#[path = "pool_test.rs"]
mod tests;
