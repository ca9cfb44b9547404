//! Snapshot change detection.
//!
//! Every poll result is reduced to a 64-bit signature over a canonical byte
//! encoding. Re-renders are suppressed when the signature repeats, so a busy
//! poll interval costs nothing while the store is quiet.

use std::sync::atomic::{AtomicU64, Ordering};

use xxhash_rust::xxh3::Xxh3;

use super::snapshot::{Record, StoreSnapshot};
use super::value::Value;

/// Content signature of a delivered snapshot list.
///
/// Only equality is meaningful; signatures are never persisted or sent over
/// the transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fingerprint {
    /// Hash of the canonical encoding.
    Content(u64),
    /// Substitute issued when canonical encoding fails. Each carries a fresh
    /// sequence number, so the comparison always reports a change and the
    /// render is forced rather than suppressed.
    Forced(u64),
}

/// Value nesting deeper than this aborts canonical encoding.
const MAX_DEPTH: usize = 128;

static FORCED_SEQ: AtomicU64 = AtomicU64::new(0);

struct DepthExceeded;

/// Fingerprints a single store snapshot.
pub fn fingerprint(snapshot: &StoreSnapshot) -> Fingerprint {
    fingerprint_stores(std::slice::from_ref(snapshot))
}

/// Fingerprints the full delivered list (zero or one stores).
pub fn fingerprint_stores(stores: &[StoreSnapshot]) -> Fingerprint {
    let mut hasher = Xxh3::new();
    match write_stores(&mut hasher, stores) {
        Ok(()) => Fingerprint::Content(hasher.digest()),
        Err(DepthExceeded) => Fingerprint::Forced(FORCED_SEQ.fetch_add(1, Ordering::Relaxed)),
    }
}

/// Decides whether a freshly fingerprinted list needs a render.
///
/// `had_prior_data` is true only when the previously delivered list and the
/// candidate both contain a store; an empty list always renders so the view
/// reflects a store that has gone away.
pub fn should_render(prev: Option<&Fingerprint>, next: &Fingerprint, had_prior_data: bool) -> bool {
    !(had_prior_data && prev == Some(next))
}

fn write_stores(h: &mut Xxh3, stores: &[StoreSnapshot]) -> Result<(), DepthExceeded> {
    write_len(h, stores.len());
    for store in stores {
        write_str(h, &store.name);
        h.update(&store.version.to_le_bytes());
        write_len(h, store.collections.len());
        for collection in &store.collections {
            write_str(h, &collection.name);
            write_len(h, collection.records.len());
            for record in &collection.records {
                write_record(h, record)?;
            }
        }
    }
    Ok(())
}

fn write_record(h: &mut Xxh3, record: &Record) -> Result<(), DepthExceeded> {
    write_len(h, record.len());
    for (name, value) in record.fields() {
        write_str(h, name);
        write_value(h, value, 0)?;
    }
    Ok(())
}

fn write_value(h: &mut Xxh3, value: &Value, depth: usize) -> Result<(), DepthExceeded> {
    if depth > MAX_DEPTH {
        return Err(DepthExceeded);
    }
    match value {
        Value::Null => h.update(&[0]),
        Value::Bool(b) => h.update(&[1, *b as u8]),
        Value::Number(n) => {
            h.update(&[2]);
            h.update(&n.to_bits().to_le_bytes());
        }
        Value::String(s) => {
            h.update(&[3]);
            write_str(h, s);
        }
        Value::Array(items) => {
            h.update(&[4]);
            write_len(h, items.len());
            for item in items {
                write_value(h, item, depth + 1)?;
            }
        }
        Value::Object(fields) => {
            h.update(&[5]);
            write_len(h, fields.len());
            for (key, item) in fields {
                write_str(h, key);
                write_value(h, item, depth + 1)?;
            }
        }
        // Binary values participate with size and type only: raw bytes are
        // not held, and a renamed file is not a data change.
        Value::Binary(info) => {
            h.update(&[6]);
            h.update(&info.size.to_le_bytes());
            write_str(h, &info.mime_type);
        }
    }
    Ok(())
}

fn write_len(h: &mut Xxh3, len: usize) {
    h.update(&(len as u64).to_le_bytes());
}

fn write_str(h: &mut Xxh3, s: &str) {
    write_len(h, s.len());
    h.update(s.as_bytes());
}
