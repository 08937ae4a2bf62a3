//! kvharness - key-value store client contract and conformance harness
//!
//! Benchmark harnesses talk to many storage engines through one contract:
//! insert, read, update, delete and scan over records of named byte fields,
//! with outcomes reported as status codes (0 ok, 1 not found, other error).
//! This crate bundles the contract, two reference adapters and the suite
//! every adapter must pass.
//!
//! # Quick Start
//!
//! ```
//! use kvharness::{ConformanceSuite, BackendUnavailable};
//! use kvharness::storage::OrderedStore;
//!
//! let report =
//!     ConformanceSuite::default().run(|| Ok::<_, BackendUnavailable>(OrderedStore::new()));
//! assert!(report.is_conformant());
//! ```
//!
//! # Layout
//!
//! - crate root: `StoreClient`, `Record`, `ByteSequence`, `Status`, errors
//! - [`storage`]: `OrderedStore`, `ShardedStore`, `EmbeddedEngine`
//! - [`conformance`]: `ConformanceSuite`, scenarios, reports, config

pub use kvharness_conformance as conformance;
pub use kvharness_storage as storage;

pub use kvharness_conformance::{
    ConformanceConfig, ConformanceSuite, Outcome, Scenario, SuiteReport, Violation,
};
pub use kvharness_core::*;
