//! Key and table helpers
//!
//! Keys sort as plain strings. A caller that wants numeric order across
//! more than nine values zero-pads its keys to a fixed width; the store
//! itself never interprets key contents.
//!
//! ## Contract
//!
//! - Table identifiers must not be empty
//! - Keys are compared byte-for-byte, ordered lexicographically
//! - `pad_key` never truncates: indices wider than `width` are kept whole

use crate::error::{StoreError, StoreResult};

/// Validate a table identifier
///
/// # Examples
///
/// ```
/// use kvharness_core::key::validate_table;
///
/// assert!(validate_table("test").is_ok());
/// assert!(validate_table("").is_err());
/// ```
pub fn validate_table(table: &str) -> StoreResult<()> {
    if table.is_empty() {
        return Err(StoreError::InvalidTable(table.to_string()));
    }
    Ok(())
}

/// Zero-pad an index to `width` digits
///
/// # Examples
///
/// ```
/// use kvharness_core::key::pad_key;
///
/// assert_eq!(pad_key(7, 5), "00007");
/// assert_eq!(pad_key(123456, 5), "123456");
/// ```
pub fn pad_key(index: u64, width: usize) -> String {
    format!("{:0width$}", index, width = width)
}

/// Encode an index as 4 little-endian bytes
pub fn encode_index(index: u32) -> [u8; 4] {
    index.to_le_bytes()
}

/// Decode 4 little-endian bytes back into an index
///
/// Returns `None` unless exactly 4 bytes are given.
pub fn decode_index(bytes: &[u8]) -> Option<u32> {
    let array: [u8; 4] = bytes.try_into().ok()?;
    Some(u32::from_le_bytes(array))
}
