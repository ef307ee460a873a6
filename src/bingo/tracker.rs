//! Per-person checked tiles and first-completion recording.
//!
//! DESIGN
//! ======
//! `completed_at` is write-once. The first toggle that leaves any line fully
//! checked stamps it; later toggles, second lines and unchecks never touch
//! it again. Callers must apply [`PersonBoardState::toggle`] inside the
//! store's per-person critical section so two concurrent toggles cannot both
//! observe an unset completion and stamp different times.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::BingoError;
use super::layout::CELL_COUNT;
use super::lines;

/// Checked grid positions, `0..25`.
pub type CheckedSet = BTreeSet<usize>;

/// Validate a caller-supplied position.
///
/// # Errors
///
/// Returns [`BingoError::InvalidPosition`] outside `0..=24`.
pub fn validate_position(position: i64) -> Result<usize, BingoError> {
    usize::try_from(position)
        .ok()
        .filter(|p| *p < CELL_COUNT)
        .ok_or(BingoError::InvalidPosition(position))
}

// =============================================================================
// STATE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonBoardState {
    pub person_id: i64,
    pub checked: CheckedSet,
    #[serde(with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
}

/// Result of a single toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// Whether the toggled position is checked afterwards.
    pub checked: bool,
    /// Whether this toggle stamped the completion time.
    pub newly_completed: bool,
}

/// Result of an explicit completion claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionClaim {
    Recorded(OffsetDateTime),
    AlreadyCompleted(OffsetDateTime),
}

impl CompletionClaim {
    #[must_use]
    pub fn completed_at(self) -> OffsetDateTime {
        match self {
            Self::Recorded(at) | Self::AlreadyCompleted(at) => at,
        }
    }
}

impl PersonBoardState {
    #[must_use]
    pub fn new(person_id: i64) -> Self {
        Self { person_id, checked: CheckedSet::new(), completed_at: None }
    }

    /// Flip one position and stamp the completion time if this is the first win.
    pub fn toggle(&mut self, position: usize, now: OffsetDateTime) -> ToggleOutcome {
        let checked = if self.checked.remove(&position) {
            false
        } else {
            self.checked.insert(position);
            true
        };

        let newly_completed = self.completed_at.is_none() && self.has_bingo();
        if newly_completed {
            self.completed_at = Some(now);
        }

        ToggleOutcome { checked, newly_completed }
    }

    /// Record completion unconditionally, keeping any earlier stamp.
    pub fn claim_completion(&mut self, now: OffsetDateTime) -> CompletionClaim {
        match self.completed_at {
            Some(at) => CompletionClaim::AlreadyCompleted(at),
            None => {
                self.completed_at = Some(now);
                CompletionClaim::Recorded(now)
            }
        }
    }

    /// Drop all checks. Completion is kept.
    pub fn clear_checks(&mut self) {
        self.checked.clear();
    }

    #[must_use]
    pub fn has_bingo(&self) -> bool {
        lines::has_bingo(&self.checked)
    }

    #[must_use]
    pub fn winning_positions(&self) -> BTreeSet<usize> {
        lines::winning_positions(&self.checked)
    }
}

// =============================================================================
// STORAGE CODEC
// =============================================================================

/// Encode a checked set for the `bingo_checked` JSON column.
#[must_use]
pub fn encode_checked(checked: &CheckedSet) -> serde_json::Value {
    serde_json::Value::from(checked.iter().copied().collect::<Vec<usize>>())
}

/// Decode the `bingo_checked` column.
///
/// Accepts the current array form (`[0, 3, 12]`) and the older map form
/// (`{"0": true, "3": false}`). Anything unparseable decodes as empty, as do
/// entries outside the grid.
#[must_use]
pub fn decode_checked(value: &serde_json::Value) -> CheckedSet {
    let in_range = |p: &usize| *p < CELL_COUNT;
    match value {
        serde_json::Value::Array(entries) => entries
            .iter()
            .filter_map(serde_json::Value::as_u64)
            .filter_map(|p| usize::try_from(p).ok())
            .filter(in_range)
            .collect(),
        serde_json::Value::Object(map) => map
            .iter()
            .filter(|(_, v)| v.as_bool().unwrap_or(false))
            .filter_map(|(k, _)| k.parse::<usize>().ok())
            .filter(in_range)
            .collect(),
        _ => CheckedSet::new(),
    }
}

#[cfg(test)]
#[path = "tracker_test.rs"]
mod tests;
