//! Core types and traits for kvharness
//!
//! This crate defines the store client contract shared by every backend:
//! - ByteSequence: single-pass byte stream for field values
//! - Record / FieldSet: stored field mapping and read projection
//! - Status: integer outcome model (0 ok, 1 not found, other error)
//! - StoreError: data-level outcomes and backend malfunctions
//! - StoreClient: the CRUD + scan capability set
//! - BackendLauncher / BackendHandle: engine lifecycle collaborators
//! - Key helpers: table validation, zero-padded keys, index encoding

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod key;
pub mod record;
pub mod sequence;
pub mod status;
pub mod traits;

pub use error::{BackendUnavailable, SequenceExhausted, StoreError, StoreResult};
pub use key::{decode_index, encode_index, pad_key, validate_table};
pub use record::{FieldSet, Record};
pub use sequence::{ByteCursor, ByteSequence, IterSequence};
pub use status::Status;
pub use traits::{BackendHandle, BackendLauncher, StoreClient};
