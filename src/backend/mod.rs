//! Backend adapters that enumerate and read the inspected store.
//!
//! The sync loop talks to storage only through the `StoreBackend` trait, so
//! the polling pipeline does not care where records actually live:
//! - `DirBackend`: a directory tree of JSON collection files
//! - `MemoryBackend`: canned in-memory stores for tests and demos

mod dir;
mod memory;

pub use dir::DirBackend;
pub use memory::MemoryBackend;

use tracing::warn;

use crate::model::{Collection, Record, StoreMeta, StoreSnapshot};

/// Error types for backend operations.
///
/// Neither variant is fatal: the poll loop degrades to empty data and the
/// next tick retries unconditionally.
#[derive(Debug, Clone)]
pub enum BackendError {
    /// The backend itself is unusable (e.g. the data root is missing).
    Unavailable(String),
    /// A store, collection, or record read failed.
    Connection(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::Unavailable(msg) => write!(f, "Backend unavailable: {}", msg),
            BackendError::Connection(msg) => write!(f, "Connection error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

/// Abstraction over the storage holding inspected stores.
///
/// Implementations must never create a store as a side effect of opening
/// one; `resolve_target` probes for existence by opening.
pub trait StoreBackend: Send {
    /// Enumerates the stores the backend knows about.
    ///
    /// May legitimately fail or come back empty; callers fall back to a
    /// direct open probe.
    fn list_stores(&self) -> Result<Vec<StoreMeta>, BackendError>;

    /// Opens a store by name. `version` is passed through when known from
    /// `list_stores`.
    fn open(&self, name: &str, version: Option<u32>) -> Result<Box<dyn StoreHandle>, BackendError>;
}

/// An open store. Dropping the handle closes it.
pub trait StoreHandle: std::fmt::Debug {
    /// The store's identity as opened.
    fn meta(&self) -> StoreMeta;

    /// Names of the collections in the store.
    fn collections(&self) -> Result<Vec<String>, BackendError>;

    /// Reads every record of one collection.
    ///
    /// Internal failures degrade to an empty sequence so one bad collection
    /// cannot block the others.
    fn read_all(&self, collection: &str) -> Vec<Record>;

    /// Captures the whole store as one snapshot.
    fn snapshot(&self) -> Result<StoreSnapshot, BackendError> {
        let names = self.collections()?;
        let collections = names
            .into_iter()
            .map(|name| {
                let records = self.read_all(&name);
                Collection::new(name, records)
            })
            .collect();
        Ok(StoreSnapshot::new(self.meta(), collections))
    }
}

/// Locates the target store.
///
/// The store list is consulted first; a store missing from the list (or a
/// backend that cannot enumerate) gets a direct open probe. A probed store
/// counts as present only when it reports at least one collection, so a
/// would-be creation artifact is still treated as "not found".
pub fn resolve_target(
    backend: &dyn StoreBackend,
    name: &str,
) -> Result<Option<Box<dyn StoreHandle>>, BackendError> {
    match backend.list_stores() {
        Ok(stores) => {
            if let Some(meta) = stores.into_iter().find(|m| m.name == name) {
                return backend.open(name, Some(meta.version)).map(Some);
            }
        }
        Err(err @ BackendError::Unavailable(_)) => return Err(err),
        Err(err) => warn!("store enumeration failed: {}", err),
    }

    match backend.open(name, None) {
        Ok(handle) => match handle.collections() {
            Ok(collections) if !collections.is_empty() => Ok(Some(handle)),
            Ok(_) => Ok(None),
            Err(err) => {
                warn!("store probe failed: {}", err);
                Ok(None)
            }
        },
        Err(err @ BackendError::Unavailable(_)) => Err(err),
        Err(_) => Ok(None),
    }
}
