//! Conformance Test Suite
//!
//! Runs the conformance scenarios end to end through the public facade.
//!
//! ## Modules
//!
//! - `reference_adapters`: both reference stores must be conformant
//! - `broken_adapters`: deliberately faulty adapters must fail the right scenario
//! - `lifecycle`: unavailable backends skip, handles are always stopped
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all conformance tests
//! cargo test --test conformance
//!
//! # Run broken adapter tests only
//! cargo test --test conformance broken_adapters::
//! ```

use kvharness::storage::OrderedStore;
use kvharness::{
    BackendUnavailable, FieldSet, Record, StoreClient, StoreError, StoreResult,
};

mod broken_adapters;
mod lifecycle;
mod reference_adapters;

/// Misbehavior injected by `FaultyStore`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Delete reports success for keys that do not exist
    DeleteAlwaysOk,
    /// Scan returns one record more than requested
    ScanOverflow,
    /// Scan drops the first record of the range
    ExclusiveScanStart,
    /// Read and scan return every field regardless of projection
    IgnoreProjection,
    /// Read drops the last byte of every value
    TruncateValues,
    /// Update of a missing key creates it
    UpdateUpserts,
    /// Read of a missing key reports a generic error instead of not found
    MissingIsError,
}

/// `OrderedStore` with one injected contract violation
#[derive(Debug, Clone)]
pub struct FaultyStore {
    inner: OrderedStore,
    fault: Fault,
}

impl FaultyStore {
    pub fn new(fault: Fault) -> Self {
        FaultyStore {
            inner: OrderedStore::new(),
            fault,
        }
    }
}

impl StoreClient for FaultyStore {
    fn backend_name(&self) -> &'static str {
        "faulty"
    }

    fn insert(&self, table: &str, key: &str, record: Record) -> StoreResult<()> {
        self.inner.insert(table, key, record)
    }

    fn read(&self, table: &str, key: &str, fields: Option<&FieldSet>) -> StoreResult<Record> {
        match self.fault {
            Fault::IgnoreProjection => self.inner.read(table, key, None),
            Fault::TruncateValues => {
                let mut values = self.inner.read(table, key, fields)?.into_materialized();
                for bytes in values.values_mut() {
                    bytes.pop();
                }
                Ok(Record::from_materialized(values))
            }
            Fault::MissingIsError => self.inner.read(table, key, fields).map_err(|e| {
                if e.is_not_found() {
                    StoreError::backend(7, "lookup failed")
                } else {
                    e
                }
            }),
            _ => self.inner.read(table, key, fields),
        }
    }

    fn update(&self, table: &str, key: &str, record: Record) -> StoreResult<()> {
        if self.fault == Fault::UpdateUpserts && self.inner.read(table, key, None).is_err() {
            return self.inner.insert(table, key, record);
        }
        self.inner.update(table, key, record)
    }

    fn delete(&self, table: &str, key: &str) -> StoreResult<()> {
        match self.inner.delete(table, key) {
            Err(e) if e.is_not_found() && self.fault == Fault::DeleteAlwaysOk => Ok(()),
            other => other,
        }
    }

    fn scan(
        &self,
        table: &str,
        start_key: &str,
        count: usize,
        fields: Option<&FieldSet>,
    ) -> StoreResult<Vec<Record>> {
        match self.fault {
            Fault::ScanOverflow => self.inner.scan(table, start_key, count + 1, fields),
            Fault::IgnoreProjection => self.inner.scan(table, start_key, count, None),
            Fault::ExclusiveScanStart => {
                let mut records = self.inner.scan(table, start_key, count + 1, fields)?;
                if !records.is_empty() {
                    records.remove(0);
                }
                records.truncate(count);
                Ok(records)
            }
            _ => self.inner.scan(table, start_key, count, fields),
        }
    }
}

/// Factory producing a fresh `FaultyStore` per scenario
pub fn faulty(fault: Fault) -> impl FnMut() -> Result<FaultyStore, BackendUnavailable> {
    move || Ok(FaultyStore::new(fault))
}
