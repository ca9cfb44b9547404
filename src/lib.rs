//! storescope - Live inspector for local persistent record stores.
//!
//! A sync loop polls the target store, fingerprints each snapshot, and
//! publishes changes over a message transport; the TUI renders them as
//! sortable, relation-aware tables. Loop and view only ever talk through
//! the transport, so they can share a thread or run on separate ones.

pub mod backend;
pub mod model;
pub mod sync;
pub mod transport;
pub mod tui;
pub mod view;
