//! Domain services used by the CLI.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business logic and talk to the store through the
//! `BingoStore` trait so the binary can stay focused on argument parsing
//! and output formatting.

pub mod bingo;
