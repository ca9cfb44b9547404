//! Snapshot structures delivered by a backend poll.
//!
//! A poll captures the whole target store at once: every collection, every
//! record. Snapshots are immutable after capture; the next poll builds a new
//! one instead of patching the last.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::value::Value;

/// One record: an ordered field-name → value mapping.
///
/// Field order is the producer's insertion order. Records in the same
/// collection may expose different field sets.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field. An existing field keeps its position, the value is
    /// replaced.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        if let Some(slot) = self.fields.iter_mut().find(|(k, _)| *k == name) {
            slot.1 = value;
        } else {
            self.fields.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.set(name, value);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RecordVisitor)
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = Record;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a record object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Record, A::Error> {
        let mut record = Record::new();
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            record.set(key, value);
        }
        Ok(record)
    }
}

/// A named, ordered set of records within one snapshot.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Collection {
    pub name: String,
    pub records: Vec<Record>,
}

impl Collection {
    pub fn new(name: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }

    /// Effective column set: the union of observed field names across all
    /// records, in first-occurrence order.
    pub fn columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        for record in &self.records {
            for (name, _) in record.fields() {
                if !columns.iter().any(|c| c == name) {
                    columns.push(name.clone());
                }
            }
        }
        columns
    }
}

/// Identity of a store as reported by the backend.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct StoreMeta {
    pub name: String,
    pub version: u32,
}

/// A point-in-time capture of every collection in one store.
///
/// Collection names within a snapshot are unique.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct StoreSnapshot {
    pub name: String,
    pub version: u32,
    pub collections: Vec<Collection>,
}

impl StoreSnapshot {
    pub fn new(meta: StoreMeta, collections: Vec<Collection>) -> Self {
        Self {
            name: meta.name,
            version: meta.version,
            collections,
        }
    }

    pub fn meta(&self) -> StoreMeta {
        StoreMeta {
            name: self.name.clone(),
            version: self.version,
        }
    }

    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.name == name)
    }
}
