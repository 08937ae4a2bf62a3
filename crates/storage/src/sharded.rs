//! Sharded storage
//!
//! Replaces the single RwLock of `OrderedStore` with a DashMap keyed by
//! table, so operations on different tables never contend.
//!
//! # Design
//!
//! - DashMap: 16-way sharded by default, fine-grained locking per table
//! - FxHasher: fast non-crypto hash for table identifiers
//! - Per-table BTreeMap: keeps keys ordered for range scans
//!
//! # Versioning
//!
//! A single `AtomicU64` is shared by all tables, so versions stay globally
//! monotonic even though tables are locked independently.

use std::collections::BTreeMap;
use std::hash::BuildHasherDefault;
use std::ops::Bound;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use rustc_hash::FxHasher;
use tracing::{debug, trace};

use kvharness_core::{validate_table, FieldSet, Record, StoreClient, StoreError, StoreResult};

use crate::engine::Liveness;
use crate::stored_record::StoredRecord;

const BACKEND: &str = "sharded";

/// Ordered rows of one table
pub type TableShard = BTreeMap<String, StoredRecord>;

type FxBuildHasher = BuildHasherDefault<FxHasher>;

/// Reference adapter sharded by table
#[derive(Debug, Clone)]
pub struct ShardedStore {
    shards: Arc<DashMap<String, TableShard, FxBuildHasher>>,
    version: Arc<AtomicU64>,
    liveness: Liveness,
}

impl ShardedStore {
    /// Create a new empty standalone store
    pub fn new() -> Self {
        Self::attached(Liveness::always())
    }

    pub(crate) fn attached(liveness: Liveness) -> Self {
        Self {
            shards: Arc::new(DashMap::with_hasher(FxBuildHasher::default())),
            version: Arc::new(AtomicU64::new(0)),
            liveness,
        }
    }

    #[inline]
    fn next_version(&self) -> u64 {
        self.version.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Highest version assigned so far
    pub fn current_version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    /// Number of tables that have ever received a write
    pub fn table_count(&self) -> usize {
        self.shards.len()
    }

    /// Number of records in `table`
    pub fn table_len(&self, table: &str) -> usize {
        self.shards.get(table).map_or(0, |shard| shard.value().len())
    }

    fn precheck(&self, table: &str) -> StoreResult<()> {
        self.liveness.check(BACKEND)?;
        validate_table(table)
    }
}

impl Default for ShardedStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreClient for ShardedStore {
    fn backend_name(&self) -> &'static str {
        BACKEND
    }

    fn insert(&self, table: &str, key: &str, record: Record) -> StoreResult<()> {
        self.precheck(table)?;
        let fields = record.try_into_materialized()?;

        let mut shard = self.shards.entry(table.to_string()).or_default();
        let rows = shard.value_mut();
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
        let found = self
            .shards
            .get(table)
            .and_then(|shard| shard.value().get(key).map(|stored| stored.to_record(fields)));
        found.ok_or_else(|| {
            debug!(target: "kvharness::store", backend = BACKEND, table, key, "Read miss");
            StoreError::not_found(table, key)
        })
    }

    fn update(&self, table: &str, key: &str, record: Record) -> StoreResult<()> {
        self.precheck(table)?;
        let fields = record.try_into_materialized()?;

        let mut shard = self
            .shards
            .get_mut(table)
            .ok_or_else(|| StoreError::not_found(table, key))?;
        let stored = shard
            .value_mut()
            .get_mut(key)
            .ok_or_else(|| StoreError::not_found(table, key))?;
        let version = self.next_version();
        stored.overwrite(fields, version);
        debug!(target: "kvharness::store", backend = BACKEND, table, key, version, "Updated");
        Ok(())
    }

    fn delete(&self, table: &str, key: &str) -> StoreResult<()> {
        self.precheck(table)?;
        let removed = self
            .shards
            .get_mut(table)
            .and_then(|mut shard| shard.value_mut().remove(key));
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
        let Some(shard) = self.shards.get(table) else {
            return Ok(Vec::new());
        };

        let results: Vec<Record> = shard
            .value()
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

#[cfg(test)]
mod tests {
    use super::*;
    use kvharness_core::{ByteCursor, Status};
    use std::thread;

    fn record(bytes: &[u8]) -> Record {
        Record::new().with_field("a", ByteCursor::from(bytes))
    }

    struct EmptyPromise;

    impl kvharness_core::ByteSequence for EmptyPromise {
        fn has_next(&mut self) -> bool {
            true
        }

        fn next_byte(&mut self) -> Result<u8, kvharness_core::SequenceExhausted> {
            Err(kvharness_core::SequenceExhausted { consumed: 0 })
        }
    }

    #[test]
    fn test_broken_value_rejected_not_stored() {
        let store = ShardedStore::new();
        let result = store.insert("test", "k", Record::new().with_field("a", EmptyPromise));
        assert_eq!(Status::of(&result), Status::Error(5));
        assert_eq!(store.table_len("test"), 0);
    }

    #[test]
    fn test_tables_are_independent() {
        let store = ShardedStore::new();
        store.insert("t1", "k", record(&[1])).unwrap();
        store.insert("t2", "k", record(&[2])).unwrap();

        assert_eq!(store.table_count(), 2);
        store.delete("t1", "k").unwrap();
        assert_eq!(store.table_len("t1"), 0);
        assert_eq!(store.table_len("t2"), 1);
    }

    #[test]
    fn test_delete_in_missing_table_is_not_found() {
        let store = ShardedStore::new();
        assert_eq!(Status::of(&store.delete("nope", "k")), Status::NotFound);
        // A miss does not leave an empty shard behind
        assert_eq!(store.table_count(), 0);
    }

    #[test]
    fn test_update_missing_table_is_not_found() {
        let store = ShardedStore::new();
        assert_eq!(
            Status::of(&store.update("nope", "k", record(&[1]))),
            Status::NotFound
        );
    }

    #[test]
    fn test_scan_inclusive_start_and_projection() {
        let store = ShardedStore::new();
        for key in ["a", "b", "c", "d"] {
            let rec = record(key.as_bytes()).with_field("other", ByteCursor::from("x"));
            store.insert("t", key, rec).unwrap();
        }

        let results = store
            .scan("t", "b", 2, Some(&FieldSet::single("a")))
            .unwrap();
        let values: Vec<Vec<u8>> = results
            .into_iter()
            .map(|mut r| {
                assert_eq!(r.len(), 1);
                r.get_mut("a").unwrap().drain()
            })
            .collect();
        assert_eq!(values, vec![b"b".to_vec(), b"c".to_vec()]);
    }

    #[test]
    fn test_concurrent_inserts_across_tables() {
        let store = ShardedStore::new();
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let store = store.clone();
                thread::spawn(move || {
                    for i in 0..50 {
                        let table = format!("table{}", t);
                        let key = format!("{:03}", i);
                        store.insert(&table, &key, record(&[i as u8])).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.current_version(), 200);
        for t in 0..4 {
            assert_eq!(store.table_len(&format!("table{}", t)), 50);
        }
    }
}
