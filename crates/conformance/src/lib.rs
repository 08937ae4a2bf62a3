//! Conformance suite for kvharness store adapters
//!
//! Every backend adapter must pass the same behavioral checks:
//! - Scenarios: insert/read/delete, insert/read/update, windowed scan, and
//!   edge cases of the same operations
//! - Checks: byte-exact value comparison through the single-pass contract
//! - Violations: typed description of the first broken expectation
//! - Reports: per-scenario outcome, conformant / inconclusive classification
//! - Config: `conformance.toml` overrides for table, field and scan window
//!
//! # Example
//!
//! ```ignore
//! use kvharness_conformance::ConformanceSuite;
//!
//! let report = ConformanceSuite::default().run(|| connect_my_adapter());
//! report.assert_conformant();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod checks;
pub mod config;
pub mod report;
pub mod scenario;
pub mod suite;
pub mod violation;

pub use config::{ConfigError, ConformanceConfig, CONFIG_FILE_NAME};
pub use report::{Outcome, ScenarioResult, SuiteReport};
pub use scenario::Scenario;
pub use suite::ConformanceSuite;
pub use violation::Violation;
