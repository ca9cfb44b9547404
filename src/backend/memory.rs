//! In-memory backend with pre-built store scenarios.
//!
//! Used by tests and by the `--demo` mode of the binary. Stores live behind
//! shared handles so a test can mutate records between polls and failure
//! injection can exercise the degraded paths.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::warn;

use crate::model::{BinaryInfo, Record, StoreMeta, Value};

use super::{BackendError, StoreBackend, StoreHandle};

#[derive(Debug, Default)]
struct StoreData {
    version: u32,
    collections: Vec<(String, Vec<Record>)>,
    failing: HashSet<String>,
}

/// Backend serving stores held entirely in memory.
#[derive(Default)]
pub struct MemoryBackend {
    stores: Vec<(String, Arc<Mutex<StoreData>>)>,
    hidden: HashSet<String>,
    fail_list: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an empty store.
    pub fn add_store(&mut self, name: &str, version: u32) {
        let data = StoreData {
            version,
            ..StoreData::default()
        };
        self.stores
            .push((name.to_string(), Arc::new(Mutex::new(data))));
    }

    /// Replaces the records of one collection, creating it if needed.
    pub fn set_records(&mut self, store: &str, collection: &str, records: Vec<Record>) {
        if let Some(shared) = self.shared_store(store) {
            shared.set_records(collection, records);
        }
    }

    /// Makes `list_stores` fail with a connection error.
    pub fn fail_list(&mut self) {
        self.fail_list = true;
    }

    /// Removes a store from enumeration while keeping it openable, forcing
    /// callers onto the probe path.
    pub fn hide_from_list(&mut self, name: &str) {
        self.hidden.insert(name.to_string());
    }

    /// Makes reads of one collection fail (degrading to empty).
    pub fn fail_collection(&mut self, store: &str, collection: &str) {
        if let Some((_, data)) = self.stores.iter().find(|(n, _)| n == store) {
            lock(data).failing.insert(collection.to_string());
        }
    }

    /// A mutable grip on one store, for changing data between polls.
    pub fn shared_store(&self, name: &str) -> Option<SharedStore> {
        self.stores
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, data)| SharedStore { data: data.clone() })
    }

    /// A construction-documentation store resembling real field data: a
    /// protocol register plus address, fibre-measurement, and document
    /// collections referring back to it.
    pub fn construction_site() -> Self {
        let mut backend = Self::new();
        let name = crate::view::DEFAULT_STORE_NAME;
        backend.add_store(name, 2);

        backend.set_records(
            name,
            "protocols",
            vec![
                rec(vec![
                    ("id", num(1.0)),
                    ("name", text("Trench acceptance §12")),
                    ("status", text("open")),
                    ("createdAt", text("2026-07-02T09:14:00Z")),
                    ("inspector", text("M. Keller")),
                ]),
                rec(vec![
                    ("id", num(2.0)),
                    ("name", text("Splice closure audit")),
                    ("status", text("closed")),
                    ("createdAt", text("2026-07-19T13:40:00Z")),
                    ("inspector", text("A. Brandt")),
                ]),
                rec(vec![
                    ("id", num(3.0)),
                    ("name", text("Duct pressure test")),
                    ("status", text("open")),
                    ("createdAt", text("2026-08-01T07:55:00Z")),
                ]),
            ],
        );

        backend.set_records(
            name,
            "addresses",
            vec![
                rec(vec![
                    ("id", num(11.0)),
                    ("street", text("Lindenweg 4")),
                    ("city", text("Potsdam")),
                    ("zip", text("14467")),
                    ("protocolId", num(1.0)),
                ]),
                rec(vec![
                    ("id", num(12.0)),
                    ("street", text("Am Kanal 18")),
                    ("city", text("Potsdam")),
                    ("zip", text("14473")),
                    ("protocolId", num(1.0)),
                ]),
                rec(vec![
                    ("id", num(13.0)),
                    ("street", text("Feldstrasse 2")),
                    ("city", text("Werder")),
                    ("protocolId", num(2.0)),
                ]),
            ],
        );

        backend.set_records(
            name,
            "fibreOnLocations",
            vec![
                rec(vec![
                    ("id", num(21.0)),
                    ("location", text("DP-07 / Lindenweg")),
                    ("fibreCount", num(48.0)),
                    ("attenuationDb", num(-3.5)),
                    ("protocolId", num(1.0)),
                ]),
                rec(vec![
                    ("id", num(22.0)),
                    ("location", text("DP-09 / Am Kanal")),
                    ("fibreCount", num(96.0)),
                    ("attenuationDb", num(-2.1)),
                    ("protocolId", num(3.0)),
                ]),
            ],
        );

        backend.set_records(
            name,
            "documents",
            vec![
                rec(vec![
                    ("id", num(31.0)),
                    ("title", text("Trench photo east")),
                    ("file", binary(34_520, "image/png", "trench-east.png")),
                    ("protocolId", num(1.0)),
                ]),
                rec(vec![
                    ("id", num(32.0)),
                    ("title", text("As-built plan")),
                    ("file", binary(2_480_113, "application/pdf", "as-built.pdf")),
                    ("protocolId", num(2.0)),
                ]),
                rec(vec![
                    ("id", num(33.0)),
                    ("title", text("Camera roll import")),
                    ("file", binary(1_572_864, "image/jpeg", "")),
                    ("protocolId", num(3.0)),
                ]),
                rec(vec![
                    ("id", num(34.0)),
                    ("title", text("Signature scan")),
                    ("file", binary(18_204, "", "signature.bin")),
                ]),
            ],
        );

        backend.set_records(
            name,
            "syncQueue",
            vec![
                rec(vec![
                    ("id", num(41.0)),
                    ("op", text("upload")),
                    (
                        "payload",
                        Value::Object(vec![
                            ("documentId".to_string(), num(31.0)),
                            ("attempts".to_string(), num(2.0)),
                            ("lastError".to_string(), Value::Null),
                        ]),
                    ),
                    (
                        "pendingIds",
                        Value::Array(vec![num(31.0), num(33.0), num(34.0)]),
                    ),
                    ("retries", num(0.0)),
                ]),
                rec(vec![
                    ("id", num(42.0)),
                    ("op", text("delete")),
                    ("payload", Value::Object(vec![])),
                    ("retries", num(-1.0)),
                ]),
            ],
        );

        backend
    }
}

impl StoreBackend for MemoryBackend {
    fn list_stores(&self) -> Result<Vec<StoreMeta>, BackendError> {
        if self.fail_list {
            return Err(BackendError::Connection(
                "store enumeration disabled".to_string(),
            ));
        }
        Ok(self
            .stores
            .iter()
            .filter(|(name, _)| !self.hidden.contains(name))
            .map(|(name, data)| StoreMeta {
                name: name.clone(),
                version: lock(data).version,
            })
            .collect())
    }

    fn open(&self, name: &str, _version: Option<u32>) -> Result<Box<dyn StoreHandle>, BackendError> {
        let Some((_, data)) = self.stores.iter().find(|(n, _)| n == name) else {
            return Err(BackendError::Connection(format!(
                "store not found: {}",
                name
            )));
        };
        Ok(Box::new(MemoryHandle {
            name: name.to_string(),
            data: data.clone(),
        }))
    }
}

/// Mutable grip on one in-memory store.
#[derive(Clone)]
pub struct SharedStore {
    data: Arc<Mutex<StoreData>>,
}

impl SharedStore {
    /// Replaces the records of one collection, creating it if needed.
    pub fn set_records(&self, collection: &str, records: Vec<Record>) {
        let mut data = lock(&self.data);
        if let Some(slot) = data.collections.iter_mut().find(|(n, _)| n == collection) {
            slot.1 = records;
        } else {
            data.collections.push((collection.to_string(), records));
        }
    }

    pub fn push_record(&self, collection: &str, record: Record) {
        let mut data = lock(&self.data);
        if let Some(slot) = data.collections.iter_mut().find(|(n, _)| n == collection) {
            slot.1.push(record);
        } else {
            data.collections
                .push((collection.to_string(), vec![record]));
        }
    }
}

#[derive(Debug)]
struct MemoryHandle {
    name: String,
    data: Arc<Mutex<StoreData>>,
}

impl StoreHandle for MemoryHandle {
    fn meta(&self) -> StoreMeta {
        StoreMeta {
            name: self.name.clone(),
            version: lock(&self.data).version,
        }
    }

    fn collections(&self) -> Result<Vec<String>, BackendError> {
        Ok(lock(&self.data)
            .collections
            .iter()
            .map(|(name, _)| name.clone())
            .collect())
    }

    fn read_all(&self, collection: &str) -> Vec<Record> {
        let data = lock(&self.data);
        if data.failing.contains(collection) {
            warn!("read failed for collection {}", collection);
            return Vec::new();
        }
        data.collections
            .iter()
            .find(|(name, _)| name == collection)
            .map(|(_, records)| records.clone())
            .unwrap_or_default()
    }
}

fn lock(data: &Arc<Mutex<StoreData>>) -> MutexGuard<'_, StoreData> {
    data.lock().unwrap_or_else(|e| e.into_inner())
}

fn rec(pairs: Vec<(&str, Value)>) -> Record {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

fn num(n: f64) -> Value {
    Value::Number(n)
}

fn text(s: &str) -> Value {
    Value::String(s.to_string())
}

fn binary(size: u64, mime: &str, name: &str) -> Value {
    Value::Binary(BinaryInfo {
        size,
        mime_type: mime.to_string(),
        name_hint: name.to_string(),
    })
}
