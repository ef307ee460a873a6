//! Grepable error codes shared by every layer.
//!
//! Each error enum maps its variants to a stable `E_*` code so the CLI and
//! any embedding application can report failures without matching on
//! display strings.

pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}
