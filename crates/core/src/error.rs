//! Error types for the store client contract
//!
//! Three families live here:
//! - `StoreError`: data-level outcomes and backend malfunctions returned by
//!   `StoreClient` operations. Every variant maps to a status code.
//! - `SequenceExhausted`: consuming a `ByteSequence` past its end.
//! - `BackendUnavailable`: the backend under test could not be provisioned.
//!
//! We use `thiserror` for `Display` and `Error` implementations.

use thiserror::Error;

use crate::status::Status;

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Status code used when a backend reports a reserved code (0 or 1) as a failure
pub const GENERIC_ERROR_CODE: i32 = 2;

/// Errors returned by `StoreClient` operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Key does not exist in the table (status 1)
    #[error("not found: {table}/{key}")]
    NotFound {
        /// Table identifier
        table: String,
        /// Record key
        key: String,
    },

    /// Insert of a key that already exists (status 2)
    #[error("duplicate key: {table}/{key}")]
    DuplicateKey {
        /// Table identifier
        table: String,
        /// Record key
        key: String,
    },

    /// Table identifier failed validation (status 3)
    #[error("invalid table identifier: {0:?}")]
    InvalidTable(String),

    /// Backend was stopped or never started (status 4)
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// A field value broke the `ByteSequence` contract while being read (status 5)
    #[error("invalid value for field '{field}': {source}")]
    InvalidValue {
        /// Field whose sequence failed
        field: String,
        /// Underlying sequence failure
        source: SequenceExhausted,
    },

    /// Engine-specific failure carrying its own code
    #[error("backend error ({code}): {message}")]
    Backend {
        /// Engine-specific status code
        code: i32,
        /// Human-readable detail
        message: String,
    },
}

impl StoreError {
    /// Create a not-found error
    pub fn not_found(table: impl Into<String>, key: impl Into<String>) -> Self {
        StoreError::NotFound {
            table: table.into(),
            key: key.into(),
        }
    }

    /// Create a duplicate-key error
    pub fn duplicate_key(table: impl Into<String>, key: impl Into<String>) -> Self {
        StoreError::DuplicateKey {
            table: table.into(),
            key: key.into(),
        }
    }

    /// Create an engine-specific error
    pub fn backend(code: i32, message: impl Into<String>) -> Self {
        StoreError::Backend {
            code,
            message: message.into(),
        }
    }

    /// Check if this is a not-found outcome
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// Status code reported for this error
    ///
    /// Codes 0 and 1 are reserved for success and not-found, so a backend
    /// error carrying either is reported as `GENERIC_ERROR_CODE`.
    pub fn status(&self) -> Status {
        match self {
            StoreError::NotFound { .. } => Status::NotFound,
            StoreError::DuplicateKey { .. } => Status::Error(2),
            StoreError::InvalidTable(_) => Status::Error(3),
            StoreError::Unavailable(_) => Status::Error(4),
            StoreError::InvalidValue { .. } => Status::Error(5),
            StoreError::Backend { code, .. } => match *code {
                0 | 1 => Status::Error(GENERIC_ERROR_CODE),
                other => Status::Error(other),
            },
        }
    }
}

/// A `ByteSequence` was consumed past its last byte
///
/// This is a contract violation by the caller, not a data condition.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("byte sequence exhausted after {consumed} bytes")]
pub struct SequenceExhausted {
    /// Bytes handed out before the failing call
    pub consumed: usize,
}

/// The backend under test could not be constructed or started
///
/// Conformance runs treat this as inconclusive rather than as a failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("backend '{backend}' unavailable: {reason}")]
pub struct BackendUnavailable {
    /// Backend name
    pub backend: String,
    /// Why it could not be provisioned
    pub reason: String,
}

impl BackendUnavailable {
    /// Create a new unavailability error
    pub fn new(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        BackendUnavailable {
            backend: backend.into(),
            reason: reason.into(),
        }
    }
}
