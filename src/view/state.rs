//! The view-side session state.
//!
//! One `ViewState` exists per open inspector view. It is created when the
//! view opens, mutated only by transport messages and local interaction, and
//! dropped when the view closes. Sort and selection live in here, not in the
//! snapshot, so they survive polls.

use chrono::{DateTime, Local};
use tracing::debug;

use crate::model::{Fingerprint, StoreSnapshot, fingerprint_stores, should_render};
use crate::sync::DEFAULT_INTERVAL_MS;
use crate::transport::Message;

use super::table::TableModel;
use super::tabs::{StoreProfile, Tab};

pub struct ViewState {
    /// The target store, used for the missing-store banner.
    pub store_name: String,
    pub active_tab: Tab,
    /// Sort and selection, owned here across polls.
    pub table: TableModel,
    /// The last applied snapshot; `None` before the first delivery and after
    /// the store goes away.
    pub last_snapshot: Option<StoreSnapshot>,
    last_fingerprint: Option<Fingerprint>,
    pub auto_refresh: bool,
    pub refresh_interval_ms: u64,
    /// Wall-clock time of the last applied snapshot.
    pub last_update_at: Option<DateTime<Local>>,
    /// Transient note shown in the header, cleared on the next snapshot.
    pub status_message: Option<String>,
}

/// What applying one message changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Nothing visible changed; no re-render needed.
    Nothing,
    /// Refresh settings changed.
    Settings,
    /// New snapshot data was applied.
    Snapshot,
}

impl ViewState {
    pub fn new(store_name: impl Into<String>, profile: StoreProfile) -> Self {
        Self {
            store_name: store_name.into(),
            active_tab: Tab::default(),
            table: TableModel::new(profile),
            last_snapshot: None,
            last_fingerprint: None,
            auto_refresh: true,
            refresh_interval_ms: DEFAULT_INTERVAL_MS,
            last_update_at: None,
            status_message: None,
        }
    }

    /// Applies one inbound transport message.
    pub fn apply_message(&mut self, msg: Message) -> Applied {
        match msg {
            Message::SnapshotUpdate { stores } => self.apply_update(stores),
            Message::AutoState { enabled } => {
                self.auto_refresh = enabled;
                Applied::Settings
            }
            Message::IntervalState { ms } => {
                self.refresh_interval_ms = ms;
                Applied::Settings
            }
            // Loop-bound kinds are not meant for this side.
            Message::RefreshRequest | Message::ToggleAuto { .. } | Message::SetInterval { .. } => {
                Applied::Nothing
            }
        }
    }

    /// Applies a delivered snapshot list, suppressing re-renders when the
    /// fingerprint repeats. An empty list always applies, so the view shows
    /// a store that has gone away.
    fn apply_update(&mut self, stores: Vec<StoreSnapshot>) -> Applied {
        let fp = fingerprint_stores(&stores);
        let had_prior = self.last_snapshot.is_some() && !stores.is_empty();
        if !should_render(self.last_fingerprint.as_ref(), &fp, had_prior) {
            debug!("delivered snapshot unchanged, not re-rendering");
            return Applied::Nothing;
        }
        self.last_fingerprint = Some(fp);
        self.last_snapshot = stores.into_iter().next();
        self.last_update_at = Some(Local::now());
        self.status_message = None;
        Applied::Snapshot
    }

    /// Switches tabs. Re-rendering uses the already-held snapshot; no fetch
    /// is triggered.
    pub fn switch_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Collection, Record, StoreMeta, Value};

    fn store(n: f64) -> StoreSnapshot {
        let mut record = Record::new();
        record.set("id", Value::Number(n));
        StoreSnapshot::new(
            StoreMeta {
                name: "db".to_string(),
                version: 1,
            },
            vec![Collection::new("protocols", vec![record])],
        )
    }

    fn state() -> ViewState {
        ViewState::new("db", StoreProfile::default())
    }

    #[test]
    fn test_first_snapshot_applies_even_when_empty() {
        let mut state = state();
        assert_eq!(
            state.apply_message(Message::SnapshotUpdate { stores: Vec::new() }),
            Applied::Snapshot
        );
        assert!(state.last_snapshot.is_none());
        assert!(state.last_update_at.is_some());
    }

    #[test]
    fn test_identical_snapshot_is_suppressed() {
        let mut state = state();
        let stores = vec![store(1.0)];
        assert_eq!(
            state.apply_message(Message::SnapshotUpdate {
                stores: stores.clone()
            }),
            Applied::Snapshot
        );
        assert_eq!(
            state.apply_message(Message::SnapshotUpdate { stores }),
            Applied::Nothing
        );
        assert_eq!(
            state.apply_message(Message::SnapshotUpdate {
                stores: vec![store(2.0)]
            }),
            Applied::Snapshot
        );
    }

    #[test]
    fn test_store_going_away_still_applies() {
        let mut state = state();
        state.apply_message(Message::SnapshotUpdate {
            stores: vec![store(1.0)],
        });
        assert_eq!(
            state.apply_message(Message::SnapshotUpdate { stores: Vec::new() }),
            Applied::Snapshot
        );
        assert!(state.last_snapshot.is_none());
        // Repeated empty deliveries keep applying; there is no prior data to
        // suppress against.
        assert_eq!(
            state.apply_message(Message::SnapshotUpdate { stores: Vec::new() }),
            Applied::Snapshot
        );
    }

    #[test]
    fn test_snapshot_clears_status_message() {
        let mut state = state();
        state.status_message = Some("Refreshing data...".to_string());
        state.apply_message(Message::SnapshotUpdate {
            stores: vec![store(1.0)],
        });
        assert!(state.status_message.is_none());
    }

    #[test]
    fn test_settings_messages() {
        let mut state = state();
        assert!(state.auto_refresh);
        assert_eq!(
            state.apply_message(Message::AutoState { enabled: false }),
            Applied::Settings
        );
        assert!(!state.auto_refresh);
        assert_eq!(
            state.apply_message(Message::IntervalState { ms: 900 }),
            Applied::Settings
        );
        assert_eq!(state.refresh_interval_ms, 900);
        // Loop-bound kinds are ignored here.
        assert_eq!(
            state.apply_message(Message::RefreshRequest),
            Applied::Nothing
        );
    }

    #[test]
    fn test_sort_and_selection_survive_snapshot_updates() {
        let mut state = state();
        state.apply_message(Message::SnapshotUpdate {
            stores: vec![store(1.0)],
        });
        state.table.toggle_sort("protocols", "id");
        let snapshot = state.last_snapshot.clone().unwrap();
        state
            .table
            .select(snapshot.collection("protocols").unwrap(), 0);

        state.apply_message(Message::SnapshotUpdate {
            stores: vec![store(2.0)],
        });
        assert!(state.table.sort_spec("protocols").is_some());
        assert!(state.table.selection().is_some());
    }
}
