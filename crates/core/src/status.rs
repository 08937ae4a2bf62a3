//! Status codes for store operations
//!
//! The harness asserts outcomes as small integers:
//! - `0`: success
//! - `1`: not found
//! - anything else: engine-specific error
//!
//! Operations return `StoreResult<T>`; `Status::of` folds a result back into
//! the integer form for reporting and comparison.

use std::fmt;

use crate::error::StoreResult;

/// Outcome of a store operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Operation succeeded (code 0)
    Ok,
    /// Key was not present (code 1)
    NotFound,
    /// Engine-specific error (any other code)
    Error(i32),
}

impl Status {
    /// Integer form of this status
    pub fn code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::NotFound => 1,
            Status::Error(code) => code,
        }
    }

    /// Parse an integer status code
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Status::Ok,
            1 => Status::NotFound,
            other => Status::Error(other),
        }
    }

    /// Status of an operation result
    pub fn of<T>(result: &StoreResult<T>) -> Self {
        match result {
            Ok(_) => Status::Ok,
            Err(e) => e.status(),
        }
    }

    /// True for code 0
    pub fn is_ok(self) -> bool {
        self == Status::Ok
    }

    /// True for any code outside {0, 1}
    pub fn is_error(self) -> bool {
        matches!(self, Status::Error(_))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ok => write!(f, "0 (ok)"),
            Status::NotFound => write!(f, "1 (not found)"),
            Status::Error(code) => write!(f, "{} (error)", code),
        }
    }
}
