//! Testing utilities for adapter correctness
//!
//! - **Reference Model**: in-memory model of expected table state that also
//!   predicts the status of every operation
//! - **dump_table**: read a table back through the client contract
//!
//! # Example
//!
//! ```ignore
//! use kvharness_storage::testing::ReferenceModel;
//!
//! let mut model = ReferenceModel::new();
//! assert_eq!(model.insert("test", "k", fields), Status::Ok);
//! assert_eq!(model.delete("test", "missing"), Status::NotFound);
//! ```

mod reference_model;

pub use reference_model::{
    dump_table, materialize_all, Operation, ReferenceModel, StateMismatch, TableContents,
};
