//! Festival group bingo: deterministic per-person boards, completion
//! tracking and a first-to-finish leaderboard.

pub mod bingo;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod services;
pub mod state;
pub mod store;
