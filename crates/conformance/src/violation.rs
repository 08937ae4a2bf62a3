//! Contract violations detected by the suite
//!
//! A violation means the adapter broke the client contract. Unlike an
//! unavailable backend, it always fails the scenario.

use kvharness_core::Status;
use thiserror::Error;

/// A broken expectation, tagged with the scenario step that found it
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Operation returned the wrong status
    #[error("{step}: expected status {expected}, got {actual}")]
    StatusMismatch {
        /// Scenario step
        step: String,
        /// Status the contract requires
        expected: Status,
        /// Status the adapter returned
        actual: Status,
    },

    /// Requested field absent from a successful read
    #[error("{step}: field '{field}' missing from result")]
    MissingField {
        /// Scenario step
        step: String,
        /// Field name
        field: String,
    },

    /// Field present that the projection did not request
    #[error("{step}: unrequested field '{field}' in result")]
    UnexpectedField {
        /// Scenario step
        step: String,
        /// Field name
        field: String,
    },

    /// Value byte differs from what was written
    #[error("{step}: field '{field}' byte {position}: expected {expected}, got {actual}")]
    ByteMismatch {
        /// Scenario step
        step: String,
        /// Field name
        field: String,
        /// Zero-based byte offset
        position: usize,
        /// Byte written
        expected: u8,
        /// Byte read back
        actual: u8,
    },

    /// Sequence ended before every written byte was read
    #[error("{step}: field '{field}' ended after {actual_len} of {expected_len} bytes")]
    ValueTooShort {
        /// Scenario step
        step: String,
        /// Field name
        field: String,
        /// Length written
        expected_len: usize,
        /// Bytes available
        actual_len: usize,
    },

    /// Sequence still had bytes after the written value
    #[error("{step}: field '{field}' has bytes beyond its {expected_len}-byte value")]
    ValueTooLong {
        /// Scenario step
        step: String,
        /// Field name
        field: String,
        /// Length written
        expected_len: usize,
    },

    /// `has_next` reported a byte that `next_byte` then refused
    #[error(
        "{step}: field '{field}' sequence exhausted at byte {position} after has_next() was true"
    )]
    SequenceExhausted {
        /// Scenario step
        step: String,
        /// Field name
        field: String,
        /// Zero-based byte offset
        position: usize,
    },

    /// Scan returned more records than requested
    #[error("{step}: scan returned {returned} records for count {count}")]
    ScanOverflow {
        /// Scenario step
        step: String,
        /// Requested count
        count: usize,
        /// Records returned
        returned: usize,
    },

    /// Scan returned a different number of records than the table holds
    #[error("{step}: scan expected {expected} records, got {returned}")]
    ScanCountMismatch {
        /// Scenario step
        step: String,
        /// Records the table holds in the window
        expected: usize,
        /// Records returned
        returned: usize,
    },
}

impl Violation {
    /// Scenario step the violation was found in
    pub fn step(&self) -> &str {
        match self {
            Violation::StatusMismatch { step, .. }
            | Violation::MissingField { step, .. }
            | Violation::UnexpectedField { step, .. }
            | Violation::ByteMismatch { step, .. }
            | Violation::ValueTooShort { step, .. }
            | Violation::ValueTooLong { step, .. }
            | Violation::SequenceExhausted { step, .. }
            | Violation::ScanOverflow { step, .. }
            | Violation::ScanCountMismatch { step, .. } => step,
        }
    }
}
