//! Reference model for tracking expected store state
//!
//! The reference model keeps an in-memory copy of what a correct adapter
//! should contain, and predicts the status of every operation. Tests apply
//! the same operations to an adapter and the model, then compare.
//!
//! # Example
//!
//! ```ignore
//! use kvharness_storage::testing::{dump_table, ReferenceModel};
//!
//! let mut model = ReferenceModel::new();
//! let expected = model.insert("test", "k", fields);
//! let actual = Status::of(&client.insert("test", "k", record));
//! assert_eq!(expected, actual);
//!
//! let mismatches = model.compare_table("test", &dump_table(&client, "test", &keys)?);
//! assert!(mismatches.is_empty());
//! ```

use std::collections::{BTreeMap, HashMap};

use kvharness_core::{Record, Status, StoreClient, StoreResult};

/// Materialized contents of one table: key → field → bytes
pub type TableContents = BTreeMap<String, BTreeMap<String, Vec<u8>>>;

/// Reference model tracking expected store state
pub struct ReferenceModel {
    /// Expected rows per table
    tables: HashMap<String, TableContents>,
    /// Applied operations in order
    ops: Vec<Operation>,
}

/// Operation recorded in the reference model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Insert of a new record
    Insert {
        /// Table identifier
        table: String,
        /// Record key
        key: String,
        /// Fields written
        fields: BTreeMap<String, Vec<u8>>,
    },
    /// Field overwrite
    Update {
        /// Table identifier
        table: String,
        /// Record key
        key: String,
        /// Fields written
        fields: BTreeMap<String, Vec<u8>>,
    },
    /// Record removal
    Delete {
        /// Table identifier
        table: String,
        /// Record key
        key: String,
    },
}

impl ReferenceModel {
    /// Create a new empty reference model
    pub fn new() -> Self {
        ReferenceModel {
            tables: HashMap::new(),
            ops: Vec::new(),
        }
    }

    /// Apply an insert; returns the status a correct adapter reports
    pub fn insert(&mut self, table: &str, key: &str, fields: BTreeMap<String, Vec<u8>>) -> Status {
        let rows = self.tables.entry(table.to_string()).or_default();
        if rows.contains_key(key) {
            return Status::Error(2);
        }
        rows.insert(key.to_string(), fields.clone());
        self.ops.push(Operation::Insert {
            table: table.to_string(),
            key: key.to_string(),
            fields,
        });
        Status::Ok
    }

    /// Apply an update; returns the status a correct adapter reports
    pub fn update(&mut self, table: &str, key: &str, fields: BTreeMap<String, Vec<u8>>) -> Status {
        let Some(stored) = self.tables.get_mut(table).and_then(|rows| rows.get_mut(key)) else {
            return Status::NotFound;
        };
        stored.extend(fields.clone());
        self.ops.push(Operation::Update {
            table: table.to_string(),
            key: key.to_string(),
            fields,
        });
        Status::Ok
    }

    /// Apply a delete; returns the status a correct adapter reports
    pub fn delete(&mut self, table: &str, key: &str) -> Status {
        let removed = self
            .tables
            .get_mut(table)
            .and_then(|rows| rows.remove(key));
        if removed.is_none() {
            return Status::NotFound;
        }
        self.ops.push(Operation::Delete {
            table: table.to_string(),
            key: key.to_string(),
        });
        Status::Ok
    }

    /// Expected fields of a record
    pub fn get(&self, table: &str, key: &str) -> Option<&BTreeMap<String, Vec<u8>>> {
        self.tables.get(table)?.get(key)
    }

    /// Expected scan result: up to `count` keys >= `start_key`
    pub fn expected_scan(&self, table: &str, start_key: &str, count: usize) -> Vec<String> {
        self.tables
            .get(table)
            .map(|rows| {
                rows.range(start_key.to_string()..)
                    .take(count)
                    .map(|(key, _)| key.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Compare expected table contents against actual
    ///
    /// Returns list of mismatches found.
    pub fn compare_table(&self, table: &str, actual: &TableContents) -> Vec<StateMismatch> {
        let mut mismatches = Vec::new();
        let empty = TableContents::new();
        let expected = self.tables.get(table).unwrap_or(&empty);

        // Check for missing or different records
        for (key, expected_fields) in expected {
            match actual.get(key) {
                Some(actual_fields) if actual_fields == expected_fields => {}
                Some(actual_fields) => mismatches.push(StateMismatch {
                    entity: format!("{}:{}", table, key),
                    expected: format!("{:?}", expected_fields),
                    actual: format!("{:?}", actual_fields),
                }),
                None => mismatches.push(StateMismatch {
                    entity: format!("{}:{}", table, key),
                    expected: format!("{:?}", expected_fields),
                    actual: "not found".to_string(),
                }),
            }
        }

        // Check for unexpected records in actual
        for key in actual.keys() {
            if !expected.contains_key(key) {
                mismatches.push(StateMismatch {
                    entity: format!("{}:{}", table, key),
                    expected: "not present".to_string(),
                    actual: "found".to_string(),
                });
            }
        }

        mismatches
    }

    /// Get total applied operations
    pub fn total_operations(&self) -> usize {
        self.ops.len()
    }

    /// Get applied operations
    pub fn operations(&self) -> &[Operation] {
        &self.ops
    }

    /// Reset model to empty state
    pub fn reset(&mut self) {
        self.tables.clear();
        self.ops.clear();
    }
}

impl Default for ReferenceModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Read back every record of a table through the client contract
///
/// Scan results carry no keys, so each candidate in `keys` is read
/// individually. Candidates the adapter reports as not found are skipped.
pub fn dump_table<C: StoreClient + ?Sized>(
    client: &C,
    table: &str,
    keys: &[String],
) -> StoreResult<TableContents> {
    let mut contents = TableContents::new();
    for key in keys {
        match client.read(table, key, None) {
            Ok(record) => {
                contents.insert(key.clone(), record.into_materialized());
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }
    }
    Ok(contents)
}

/// Drain a scan result into materialized field maps
pub fn materialize_all(records: Vec<Record>) -> Vec<BTreeMap<String, Vec<u8>>> {
    records.into_iter().map(Record::into_materialized).collect()
}

/// State mismatch found during comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateMismatch {
    /// Entity identifier (e.g., "table:key")
    pub entity: String,
    /// Expected value
    pub expected: String,
    /// Actual value
    pub actual: String,
}

impl std::fmt::Display for StateMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: expected {}, got {}",
            self.entity, self.expected, self.actual
        )
    }
}
