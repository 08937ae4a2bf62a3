//! Records and field projections
//!
//! A `Record` maps field names to single-pass `ByteSequence` values. Records
//! are created by callers before insert/update and by adapters when
//! materializing read and scan results. Field order carries no meaning;
//! a `BTreeMap` keeps iteration deterministic.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{StoreError, StoreResult};
use crate::sequence::{ByteCursor, ByteSequence};

/// Field name → value mapping for one stored item
#[derive(Debug, Default)]
pub struct Record {
    fields: BTreeMap<String, Box<dyn ByteSequence>>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with_field(
        mut self,
        name: impl Into<String>,
        value: impl ByteSequence + 'static,
    ) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert a field, returning the previous value if the name was present
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl ByteSequence + 'static,
    ) -> Option<Box<dyn ByteSequence>> {
        self.fields.insert(name.into(), Box::new(value))
    }

    /// Insert an already boxed value
    pub fn insert_boxed(
        &mut self,
        name: impl Into<String>,
        value: Box<dyn ByteSequence>,
    ) -> Option<Box<dyn ByteSequence>> {
        self.fields.insert(name.into(), value)
    }

    /// Mutable access to a field's sequence for consumption
    pub fn get_mut(&mut self, name: &str) -> Option<&mut (dyn ByteSequence + 'static)> {
        self.fields.get_mut(name).map(|value| value.as_mut())
    }

    /// Remove a field and take ownership of its sequence
    pub fn take(&mut self, name: &str) -> Option<Box<dyn ByteSequence>> {
        self.fields.remove(name)
    }

    /// Drop every field the projection does not select
    pub fn project(&mut self, fields: &FieldSet) {
        self.fields.retain(|name, _| fields.selects(name));
    }

    /// Check whether a field is present
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the record holds no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Drop every field, leaving the record reusable
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Field names in ascending order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Consume the record into its fields
    pub fn into_fields(self) -> impl Iterator<Item = (String, Box<dyn ByteSequence>)> {
        self.fields.into_iter()
    }

    /// Drain every field's sequence into an owned buffer
    pub fn into_materialized(self) -> BTreeMap<String, Vec<u8>> {
        self.fields
            .into_iter()
            .map(|(name, mut value)| (name, value.drain()))
            .collect()
    }

    /// Drain every field, failing on the first sequence that breaks its contract
    ///
    /// Adapters use this on incoming records so a misbehaving value is
    /// rejected instead of stored truncated.
    pub fn try_into_materialized(self) -> StoreResult<BTreeMap<String, Vec<u8>>> {
        self.fields
            .into_iter()
            .map(|(name, mut value)| match value.try_drain() {
                Ok(bytes) => Ok((name, bytes)),
                Err(source) => Err(StoreError::InvalidValue { field: name, source }),
            })
            .collect()
    }

    /// Build a record of fresh cursors over owned buffers
    pub fn from_materialized(fields: BTreeMap<String, Vec<u8>>) -> Self {
        fields
            .into_iter()
            .map(|(name, bytes)| (name, ByteCursor::new(bytes)))
            .collect()
    }

    /// Build a record from stored bytes, keeping only the selected fields
    ///
    /// Used by adapters to answer read and scan. The stored bytes are copied
    /// so the returned record shares nothing with the store.
    pub fn projected_from(stored: &BTreeMap<String, Vec<u8>>, fields: Option<&FieldSet>) -> Self {
        stored
            .iter()
            .filter(|(name, _)| selects(fields, name))
            .map(|(name, bytes)| (name.clone(), ByteCursor::new(bytes.clone())))
            .collect()
    }
}

impl<S: ByteSequence + 'static> FromIterator<(String, S)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, S)>>(iter: T) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

/// Set of field names to project on read or scan
///
/// An empty set, like no set at all, selects every field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    names: BTreeSet<String>,
}

impl FieldSet {
    /// Create an empty set (selects all fields)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set containing a single field
    pub fn single(name: impl Into<String>) -> Self {
        let mut set = FieldSet::new();
        set.insert(name);
        set
    }

    /// Add a field name
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    /// Check membership
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Number of names
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True if no names were given
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in ascending order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Whether this projection keeps `name`
    pub fn selects(&self, name: &str) -> bool {
        self.names.is_empty() || self.names.contains(name)
    }
}

impl<S: Into<String>> FromIterator<S> for FieldSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        FieldSet {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Whether an optional projection keeps `name` (`None` keeps everything)
pub fn selects(fields: Option<&FieldSet>, name: &str) -> bool {
    fields.map_or(true, |set| set.selects(name))
}
