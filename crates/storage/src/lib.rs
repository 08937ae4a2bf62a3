//! Reference storage adapters for kvharness
//!
//! This crate implements the `StoreClient` contract twice, so the
//! conformance suite always has something real to run against:
//! - OrderedStore: BTreeMap-based storage behind one RwLock
//! - ShardedStore: DashMap of per-table BTreeMaps
//! - EmbeddedEngine / EngineHandle: start/stop lifecycle for either store
//! - StoredRecord: materialized fields plus write version
//! - testing: reference model for adapter correctness checks

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine;
pub mod ordered;
pub mod sharded;
pub mod stored_record;
pub mod testing;

pub use engine::{EmbeddedEngine, EngineHandle, EngineKind, Liveness};
pub use ordered::OrderedStore;
pub use sharded::{ShardedStore, TableShard};
pub use stored_record::StoredRecord;
