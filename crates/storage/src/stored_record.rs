//! Storage-layer record representation
//!
//! `Record` carries single-pass sequences, which cannot be kept inside a
//! store. Adapters drain incoming sequences into a `StoredRecord` of owned
//! buffers and hand out fresh cursors on every read.

use std::collections::BTreeMap;

use kvharness_core::{FieldSet, Record};

/// A stored record: materialized fields plus the version of its last write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    /// Field name → bytes
    fields: BTreeMap<String, Vec<u8>>,
    /// Version assigned by the store on insert or last update
    version: u64,
}

impl StoredRecord {
    /// Create a stored record at the given version
    pub fn new(fields: BTreeMap<String, Vec<u8>>, version: u64) -> Self {
        StoredRecord { fields, version }
    }

    /// Stored fields
    #[inline]
    pub fn fields(&self) -> &BTreeMap<String, Vec<u8>> {
        &self.fields
    }

    /// Version of the last write
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Overwrite the given fields, keeping the rest
    pub fn overwrite(&mut self, fields: BTreeMap<String, Vec<u8>>, version: u64) {
        self.fields.extend(fields);
        self.version = version;
    }

    /// Produce a caller-owned record with the requested projection
    pub fn to_record(&self, projection: Option<&FieldSet>) -> Record {
        Record::projected_from(&self.fields, projection)
    }

    /// Total value bytes held by this record
    pub fn size_bytes(&self) -> usize {
        self.fields.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &[u8])]) -> BTreeMap<String, Vec<u8>> {
        pairs
            .iter()
            .map(|(name, bytes)| (name.to_string(), bytes.to_vec()))
            .collect()
    }

    #[test]
    fn test_overwrite_keeps_untouched_fields() {
        let mut stored = StoredRecord::new(fields(&[("a", &[1]), ("b", &[2])]), 1);
        stored.overwrite(fields(&[("a", &[9, 9])]), 2);

        assert_eq!(stored.version(), 2);
        assert_eq!(stored.fields()["a"], vec![9, 9]);
        assert_eq!(stored.fields()["b"], vec![2]);
        assert_eq!(stored.size_bytes(), 3);
    }

    #[test]
    fn test_to_record_hands_out_fresh_cursors() {
        let stored = StoredRecord::new(fields(&[("a", &[1, 2])]), 1);

        let mut first = stored.to_record(None);
        assert_eq!(first.get_mut("a").unwrap().drain(), vec![1, 2]);

        // A second read starts from the beginning again
        let mut second = stored.to_record(None);
        assert_eq!(second.get_mut("a").unwrap().drain(), vec![1, 2]);
    }

    #[test]
    fn test_to_record_projection() {
        let stored = StoredRecord::new(fields(&[("a", &[1]), ("b", &[2])]), 1);
        let record = stored.to_record(Some(&FieldSet::single("b")));
        assert_eq!(record.field_names().collect::<Vec<_>>(), vec!["b"]);
    }
}
