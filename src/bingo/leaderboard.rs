//! Leaderboard — first completion wins.
//!
//! Only people who are going appear. Someone who completed a line and then
//! opted out drops off the board even though their timestamp is kept.
//! Ties on `completed_at` break on ascending person id.

use serde::Serialize;
use time::OffsetDateTime;

use crate::store::{AttendanceStatus, PersonRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub person_id: i64,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub completed_at: OffsetDateTime,
    pub rank: usize,
}

/// Rank every going person with a completion, earliest first.
#[must_use]
pub fn rank_completions<'a>(people: impl IntoIterator<Item = &'a PersonRecord>) -> Vec<LeaderboardEntry> {
    let mut finished: Vec<(OffsetDateTime, i64, &str)> = people
        .into_iter()
        .filter(|p| p.person.status == AttendanceStatus::Going)
        .filter_map(|p| {
            p.board
                .completed_at
                .map(|at| (at, p.person.id, p.person.name.as_str()))
        })
        .collect();

    finished.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

    finished
        .into_iter()
        .enumerate()
        .map(|(i, (completed_at, person_id, name))| LeaderboardEntry {
            person_id,
            name: name.to_owned(),
            completed_at,
            rank: i + 1,
        })
        .collect()
}

#[cfg(test)]
#[path = "leaderboard_test.rs"]
mod tests;
