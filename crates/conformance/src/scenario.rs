//! Conformance scenarios
//!
//! The three canonical scenarios are the ones every adapter must pass:
//! insert/read/delete, insert/read/update and a windowed scan. The extended
//! scenarios exercise edge cases of the same operations.
//!
//! Each scenario runs against a fresh client but may share the backing
//! store with the others, so keys never collide across scenarios.

use std::fmt;

use tracing::trace;

use kvharness_core::{encode_index, pad_key, ByteCursor, FieldSet, Record, Status, StoreClient};

use crate::checks::{expect_bytes, expect_ok, expect_projected, expect_scan_len, expect_status};
use crate::config::ConformanceConfig;
use crate::violation::Violation;

/// Value written by the canonical scenarios
const INITIAL_VALUE: [u8; 4] = [1, 2, 3, 4];
/// Value written by the update step
const UPDATED_VALUE: [u8; 4] = [5, 6, 7, 8];

/// Keys used by the scan_edges scenario, in sort order
const EDGE_KEYS: [&str; 3] = ["b", "d", "f"];
/// Second field written by scan_edges so projections have something to drop
const EDGE_EXTRA_FIELD: &str = "extra";

/// A named conformance check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    /// Insert, read back, delete, confirm gone, delete again
    InsertReadDelete,
    /// Insert, read back, update, read the new value
    InsertReadUpdate,
    /// Insert numbered records and scan a window from the middle
    Scan,
    /// Read a key that was never written
    ReadMissing,
    /// Scan with count zero, past the end, between keys and with a projection
    ScanEdges,
    /// Update a key that was never written
    UpdateMissing,
}

impl Scenario {
    /// Scenarios every adapter must pass
    pub const CANONICAL: [Scenario; 3] = [
        Scenario::InsertReadDelete,
        Scenario::InsertReadUpdate,
        Scenario::Scan,
    ];

    /// Edge-case scenarios run when `extended` is set
    pub const EXTENDED: [Scenario; 3] = [
        Scenario::ReadMissing,
        Scenario::ScanEdges,
        Scenario::UpdateMissing,
    ];

    /// Scenarios to run, canonical first
    pub fn all(extended: bool) -> Vec<Scenario> {
        let mut scenarios = Self::CANONICAL.to_vec();
        if extended {
            scenarios.extend(Self::EXTENDED);
        }
        scenarios
    }

    /// Stable snake_case name
    pub fn name(self) -> &'static str {
        match self {
            Scenario::InsertReadDelete => "insert_read_delete",
            Scenario::InsertReadUpdate => "insert_read_update",
            Scenario::Scan => "scan",
            Scenario::ReadMissing => "read_missing",
            Scenario::ScanEdges => "scan_edges",
            Scenario::UpdateMissing => "update_missing",
        }
    }

    /// Look a scenario up by name
    pub fn from_name(name: &str) -> Option<Scenario> {
        Self::CANONICAL
            .into_iter()
            .chain(Self::EXTENDED)
            .find(|scenario| scenario.name() == name)
    }

    /// True for the three scenarios every adapter must pass
    pub fn is_canonical(self) -> bool {
        Self::CANONICAL.contains(&self)
    }

    /// Run this scenario against `client`
    ///
    /// # Errors
    ///
    /// Returns the first contract violation observed.
    pub fn run<C: StoreClient + ?Sized>(
        self,
        client: &C,
        config: &ConformanceConfig,
    ) -> Result<(), Violation> {
        match self {
            Scenario::InsertReadDelete => insert_read_delete(client, config),
            Scenario::InsertReadUpdate => insert_read_update(client, config),
            Scenario::Scan => scan(client, config),
            Scenario::ReadMissing => read_missing(client, config),
            Scenario::ScanEdges => scan_edges(client, config),
            Scenario::UpdateMissing => update_missing(client, config),
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn single_field(field: &str, bytes: &[u8]) -> Record {
    Record::new().with_field(field, ByteCursor::from(bytes))
}

/// Insert `a = [1,2,3,4]` under `key` and read it back through a projection
fn insert_and_verify<C: StoreClient + ?Sized>(
    client: &C,
    config: &ConformanceConfig,
    key: &str,
) -> Result<(), Violation> {
    let table = config.table.as_str();
    let field = config.field.as_str();

    expect_ok("insert", client.insert(table, key, single_field(field, &INITIAL_VALUE)))?;

    let projection = FieldSet::single(field);
    let mut read = expect_ok("read after insert", client.read(table, key, Some(&projection)))?;
    expect_projected("read after insert", &read, &projection)?;
    expect_bytes("read after insert", &mut read, field, &INITIAL_VALUE)
}

fn insert_read_delete<C: StoreClient + ?Sized>(
    client: &C,
    config: &ConformanceConfig,
) -> Result<(), Violation> {
    let table = config.table.as_str();
    let key = "delete";

    insert_and_verify(client, config, key)?;

    expect_ok("delete", client.delete(table, key))?;
    trace!(target: "kvharness::conformance", table, key, "Deleted, confirming absence");

    // A not-found read yields no record at all
    expect_status("read after delete", Status::NotFound, &client.read(table, key, None))?;
    expect_status("delete again", Status::NotFound, &client.delete(table, key))
}

fn insert_read_update<C: StoreClient + ?Sized>(
    client: &C,
    config: &ConformanceConfig,
) -> Result<(), Violation> {
    let table = config.table.as_str();
    let field = config.field.as_str();
    let key = "update";

    insert_and_verify(client, config, key)?;

    expect_ok("update", client.update(table, key, single_field(field, &UPDATED_VALUE)))?;

    let mut read = expect_ok("read after update", client.read(table, key, None))?;
    expect_bytes("read after update", &mut read, field, &UPDATED_VALUE)
}

fn scan<C: StoreClient + ?Sized>(client: &C, config: &ConformanceConfig) -> Result<(), Violation> {
    let table = config.table.as_str();
    let field = config.field.as_str();

    for i in 0..config.scan_records {
        let key = pad_key(u64::from(i), config.key_width);
        let record = single_field(field, &encode_index(i));
        expect_ok("scan insert", client.insert(table, &key, record))?;
    }

    let start_key = pad_key(u64::from(config.scan_start), config.key_width);
    let count = config.scan_count as usize;
    let mut records = expect_ok("scan", client.scan(table, &start_key, count, None))?;
    expect_scan_len("scan", &records, count, count)?;

    for (offset, record) in records.iter_mut().enumerate() {
        let index = config.scan_start + offset as u32;
        let step = format!("scan record {}", offset);
        expect_bytes(&step, record, field, &encode_index(index))?;
    }
    Ok(())
}

fn read_missing<C: StoreClient + ?Sized>(
    client: &C,
    config: &ConformanceConfig,
) -> Result<(), Violation> {
    let table = config.table.as_str();
    let key = "never-written";

    expect_status("read missing", Status::NotFound, &client.read(table, key, None))?;
    let projection = FieldSet::single(config.field.as_str());
    expect_status(
        "projected read missing",
        Status::NotFound,
        &client.read(table, key, Some(&projection)),
    )?;
    expect_status("delete missing", Status::NotFound, &client.delete(table, key))
}

fn update_missing<C: StoreClient + ?Sized>(
    client: &C,
    config: &ConformanceConfig,
) -> Result<(), Violation> {
    let table = config.table.as_str();
    let key = "never-inserted";

    expect_status(
        "update missing",
        Status::NotFound,
        &client.update(table, key, single_field(&config.field, &UPDATED_VALUE)),
    )?;
    // Update must not have created the key
    expect_status("read after update missing", Status::NotFound, &client.read(table, key, None))
}

fn scan_edges<C: StoreClient + ?Sized>(
    client: &C,
    config: &ConformanceConfig,
) -> Result<(), Violation> {
    let table = format!("{}_edges", config.table);
    let table = table.as_str();
    let field = config.field.as_str();

    for (i, key) in EDGE_KEYS.iter().enumerate() {
        let record =
            single_field(field, &[i as u8]).with_field(EDGE_EXTRA_FIELD, ByteCursor::from("x"));
        expect_ok("edge insert", client.insert(table, key, record))?;
    }

    let empty = expect_ok("scan count 0", client.scan(table, EDGE_KEYS[0], 0, None))?;
    expect_scan_len("scan count 0", &empty, 0, 0)?;

    // Only "f" lies at or after "e"
    let mut tail = expect_ok("scan past end", client.scan(table, "e", 5, None))?;
    expect_scan_len("scan past end", &tail, 5, 1)?;
    expect_bytes("scan past end", &mut tail[0], field, &[2])?;

    // A start key between stored keys begins at the next one
    let mut between = expect_ok("scan between keys", client.scan(table, "c", 1, None))?;
    expect_scan_len("scan between keys", &between, 1, 1)?;
    expect_bytes("scan between keys", &mut between[0], field, &[1])?;

    let projection = FieldSet::single(field);
    let mut projected = expect_ok(
        "projected scan",
        client.scan(table, EDGE_KEYS[0], EDGE_KEYS.len(), Some(&projection)),
    )?;
    expect_scan_len("projected scan", &projected, EDGE_KEYS.len(), EDGE_KEYS.len())?;
    for (i, record) in projected.iter_mut().enumerate() {
        let step = format!("projected scan record {}", i);
        expect_projected(&step, record, &projection)?;
        expect_bytes(&step, record, field, &[i as u8])?;
    }
    Ok(())
}
