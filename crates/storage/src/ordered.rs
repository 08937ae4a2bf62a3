//! OrderedStore: reference adapter backed by one ordered map
//!
//! This module implements `StoreClient` using:
//! - `BTreeMap<table, BTreeMap<key, StoredRecord>>` so scans walk keys in order
//! - `parking_lot::RwLock` for thread-safe access
//! - `AtomicU64` for monotonically increasing write versions
//!
//! # Design Notes
//!
//! - **Drain before lock**: incoming sequences are consumed before the write
//!   lock is taken, so a slow streaming value never blocks readers
//! - **Copy on read**: read and scan hand out fresh cursors over copies; the
//!   caller owns the result outright
//! - **Clone shares state**: clones are additional clients of the same store

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use kvharness_core::{validate_table, FieldSet, Record, StoreClient, StoreError, StoreResult};

use crate::engine::Liveness;
use crate::stored_record::StoredRecord;

const BACKEND: &str = "ordered";

type Table = BTreeMap<String, StoredRecord>;

/// Reference adapter using a BTreeMap with RwLock
#[derive(Debug, Clone)]
pub struct OrderedStore {
    /// Table identifier → ordered rows
    tables: Arc<RwLock<BTreeMap<String, Table>>>,
    /// Global version counter for monotonically increasing versions
    version: Arc<AtomicU64>,
    /// Liveness of the owning engine, if any
    liveness: Liveness,
}

impl OrderedStore {
    /// Create a new empty standalone store
    pub fn new() -> Self {
        Self::attached(Liveness::always())
    }

    pub(crate) fn attached(liveness: Liveness) -> Self {
        Self {
            tables: Arc::new(RwLock::new(BTreeMap::new())),
            version: Arc::new(AtomicU64::new(0)),
            liveness,
        }
    }

    /// Allocate the next version atomically
    fn next_version(&self) -> u64 {
        self.version.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Highest version assigned so far
    pub fn current_version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    /// Version of the last write to `key`, if present
    pub fn version_of(&self, table: &str, key: &str) -> Option<u64> {
        let tables = self.tables.read();
        tables.get(table)?.get(key).map(StoredRecord::version)
    }

    /// Number of records in `table`
    pub fn table_len(&self, table: &str) -> usize {
        self.tables.read().get(table).map_or(0, BTreeMap::len)
    }

    fn precheck(&self, table: &str) -> StoreResult<()> {
        self.liveness.check(BACKEND)?;
        validate_table(table)
    }
}

impl Default for OrderedStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreClient for OrderedStore {
    fn backend_name(&self) -> &'static str {
        BACKEND
    }

    fn insert(&self, table: &str, key: &str, record: Record) -> StoreResult<()> {
        self.precheck(table)?;
        let fields = record.try_into_materialized()?;

        let mut tables = self.tables.write();
        let rows = tables.entry(table.to_string()).or_default();
        if rows.contains_key(key) {
            debug!(
                target: "kvharness::store",
                backend = BACKEND,
                table,
                key,
                "Insert rejected: duplicate key"
            );
            return Err(StoreError::duplicate_key(table, key));
        }
        let version = self.next_version();
        rows.insert(key.to_string(), StoredRecord::new(fields, version));
        debug!(target: "kvharness::store", backend = BACKEND, table, key, version, "Inserted");
        Ok(())
    }

    fn read(&self, table: &str, key: &str, fields: Option<&FieldSet>) -> StoreResult<Record> {
        self.precheck(table)?;
        let tables = self.tables.read();
        match tables.get(table).and_then(|rows| rows.get(key)) {
            Some(stored) => Ok(stored.to_record(fields)),
            None => {
                debug!(target: "kvharness::store", backend = BACKEND, table, key, "Read miss");
                Err(StoreError::not_found(table, key))
            }
        }
    }

    fn update(&self, table: &str, key: &str, record: Record) -> StoreResult<()> {
        self.precheck(table)?;
        let fields = record.try_into_materialized()?;

        let mut tables = self.tables.write();
        let stored = tables
            .get_mut(table)
            .and_then(|rows| rows.get_mut(key))
            .ok_or_else(|| StoreError::not_found(table, key))?;
        let version = self.next_version();
        stored.overwrite(fields, version);
        debug!(target: "kvharness::store", backend = BACKEND, table, key, version, "Updated");
        Ok(())
    }

    fn delete(&self, table: &str, key: &str) -> StoreResult<()> {
        self.precheck(table)?;
        let mut tables = self.tables.write();
        let removed = tables.get_mut(table).and_then(|rows| rows.remove(key));
        match removed {
            Some(_) => {
                debug!(target: "kvharness::store", backend = BACKEND, table, key, "Deleted");
                Ok(())
            }
            None => Err(StoreError::not_found(table, key)),
        }
    }

    fn scan(
        &self,
        table: &str,
        start_key: &str,
        count: usize,
        fields: Option<&FieldSet>,
    ) -> StoreResult<Vec<Record>> {
        self.precheck(table)?;
        let tables = self.tables.read();
        let Some(rows) = tables.get(table) else {
            return Ok(Vec::new());
        };

        let results: Vec<Record> = rows
            .range::<str, _>((Bound::Included(start_key), Bound::Unbounded))
            .take(count)
            .map(|(_, stored)| stored.to_record(fields))
            .collect();

        trace!(
            target: "kvharness::store",
            backend = BACKEND,
            table,
            start_key,
            count,
            returned = results.len(),
            "Scanned"
        );
        Ok(results)
    }
}
