//! Core traits for the store client contract
//!
//! `StoreClient` is the capability set every backend adapter implements.
//! The conformance suite is written once against it and instantiated per
//! backend. `BackendLauncher` / `BackendHandle` describe the lifecycle of an
//! embedded or local engine that must be running before the first operation.

use crate::error::{BackendUnavailable, StoreResult};
use crate::record::{FieldSet, Record};

/// Store client contract shared by every backend
///
/// All operations take a table identifier naming a logical namespace.
/// Data-level outcomes travel in the `Result`:
///
/// | Operation | `Ok` | Expected `Err` |
/// |-----------|------|----------------|
/// | insert    | stored | `DuplicateKey` |
/// | read      | projected record | `NotFound` |
/// | update    | fields overwritten | `NotFound` |
/// | delete    | removed | `NotFound` |
/// | scan      | up to `count` records | - |
///
/// Any other error is an engine malfunction.
///
/// Thread safety: a single instance must be reusable across any number of
/// sequential operations (requires Send + Sync).
pub trait StoreClient: Send + Sync {
    /// Backend name for logs and reports
    fn backend_name(&self) -> &'static str;

    /// Store a new record under `key`
    ///
    /// Consumes every field's sequence.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKey` if `key` already exists, or a backend error.
    fn insert(&self, table: &str, key: &str, record: Record) -> StoreResult<()>;

    /// Read a record, keeping only `fields` (`None` or empty = all)
    ///
    /// The returned record is owned by the caller and shares no state with
    /// the store.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `key` does not exist. No partial record is
    /// produced in that case.
    fn read(&self, table: &str, key: &str, fields: Option<&FieldSet>) -> StoreResult<Record>;

    /// Overwrite the given fields of an existing record
    ///
    /// Fields not named in `record` keep their stored values.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `key` does not exist.
    fn update(&self, table: &str, key: &str, record: Record) -> StoreResult<()>;

    /// Remove a record
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `key` does not exist, including when it was
    /// already deleted.
    fn delete(&self, table: &str, key: &str) -> StoreResult<()>;

    /// Read up to `count` records with keys >= `start_key`, ascending
    ///
    /// The lower bound is inclusive. Fewer than `count` records are returned
    /// when the table runs out; `count == 0` returns an empty vector. The
    /// projection in `fields` applies to each record and never changes
    /// which records are returned or their order.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn scan(
        &self,
        table: &str,
        start_key: &str,
        count: usize,
        fields: Option<&FieldSet>,
    ) -> StoreResult<Vec<Record>>;
}

impl<T: StoreClient + ?Sized> StoreClient for Box<T> {
    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    fn insert(&self, table: &str, key: &str, record: Record) -> StoreResult<()> {
        (**self).insert(table, key, record)
    }

    fn read(&self, table: &str, key: &str, fields: Option<&FieldSet>) -> StoreResult<Record> {
        (**self).read(table, key, fields)
    }

    fn update(&self, table: &str, key: &str, record: Record) -> StoreResult<()> {
        (**self).update(table, key, record)
    }

    fn delete(&self, table: &str, key: &str) -> StoreResult<()> {
        (**self).delete(table, key)
    }

    fn scan(
        &self,
        table: &str,
        start_key: &str,
        count: usize,
        fields: Option<&FieldSet>,
    ) -> StoreResult<Vec<Record>> {
        (**self).scan(table, start_key, count, fields)
    }
}

/// Starts a backend engine before a conformance run
pub trait BackendLauncher {
    /// Handle to the running engine
    type Handle: BackendHandle;

    /// Backend name for logs and reports
    fn name(&self) -> &str;

    /// Start the engine
    ///
    /// # Errors
    ///
    /// Returns `BackendUnavailable` when the engine cannot be provisioned.
    /// Callers skip the run rather than fail it.
    fn start(&self) -> Result<Self::Handle, BackendUnavailable>;
}

/// A running backend engine
pub trait BackendHandle {
    /// Stop the engine
    ///
    /// Idempotent: stopping an already stopped handle does nothing.
    fn stop(&mut self);

    /// Whether the engine is still running
    fn is_running(&self) -> bool;
}
