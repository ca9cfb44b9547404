//! Data model shared by the sync loop and the view.

pub mod fingerprint;
pub mod snapshot;
pub mod value;

pub use fingerprint::{Fingerprint, fingerprint, fingerprint_stores, should_render};
pub use snapshot::{Collection, Record, StoreMeta, StoreSnapshot};
pub use value::{BinaryInfo, Value, format_number};
