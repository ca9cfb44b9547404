//! Directory-tree backend.
//!
//! Layout: `<root>/<store>/<collection>.json`, each file holding a JSON array
//! of records. An optional `version` file inside the store directory holds
//! the store version (defaults to 1). Opening never creates anything on
//! disk.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::model::{Record, StoreMeta};

use super::{BackendError, StoreBackend, StoreHandle};

const VERSION_FILE: &str = "version";

/// Backend reading stores from subdirectories of a data root.
#[derive(Debug, Clone)]
pub struct DirBackend {
    root: PathBuf,
}

impl DirBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl StoreBackend for DirBackend {
    fn list_stores(&self) -> Result<Vec<StoreMeta>, BackendError> {
        let entries = fs::read_dir(&self.root).map_err(|e| {
            BackendError::Unavailable(format!("data root {}: {}", self.root.display(), e))
        })?;
        let mut stores = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| BackendError::Connection(e.to_string()))?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            stores.push(StoreMeta {
                name: name.to_string(),
                version: read_version(&path),
            });
        }
        stores.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(stores)
    }

    fn open(&self, name: &str, _version: Option<u32>) -> Result<Box<dyn StoreHandle>, BackendError> {
        if name.is_empty() || name == ".." || name.contains(['/', '\\']) {
            return Err(BackendError::Connection(format!(
                "invalid store name: {}",
                name
            )));
        }
        if !self.root.is_dir() {
            return Err(BackendError::Unavailable(format!(
                "data root missing: {}",
                self.root.display()
            )));
        }
        let dir = self.root.join(name);
        // A missing store directory is reported, never created.
        if !dir.is_dir() {
            return Err(BackendError::Connection(format!("store not found: {}", name)));
        }
        let meta = StoreMeta {
            name: name.to_string(),
            version: read_version(&dir),
        };
        Ok(Box::new(DirHandle { dir, meta }))
    }
}

#[derive(Debug)]
struct DirHandle {
    dir: PathBuf,
    meta: StoreMeta,
}

impl StoreHandle for DirHandle {
    fn meta(&self) -> StoreMeta {
        self.meta.clone()
    }

    fn collections(&self) -> Result<Vec<String>, BackendError> {
        let entries = fs::read_dir(&self.dir)
            .map_err(|e| BackendError::Connection(format!("store {}: {}", self.meta.name, e)))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| BackendError::Connection(e.to_string()))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        // read_dir order is platform-dependent.
        names.sort();
        Ok(names)
    }

    fn read_all(&self, collection: &str) -> Vec<Record> {
        let path = self.dir.join(format!("{}.json", collection));
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) => {
                warn!("read failed for {}: {}", path.display(), err);
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<Record>>(&text) {
            Ok(records) => records,
            Err(err) => {
                warn!("parse failed for {}: {}", path.display(), err);
                Vec::new()
            }
        }
    }
}

fn read_version(dir: &Path) -> u32 {
    fs::read_to_string(dir.join(VERSION_FILE))
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(1)
}
