//! The host-side sync engine.
//!
//! Each tick fetches the target store, fingerprints the result and publishes
//! a `SnapshotUpdate` only when the data actually changed. Control messages
//! from the view (manual refresh, auto toggle, cadence change) are serviced
//! between ticks. Fetches run synchronously inside the pump, so at most one
//! is ever in flight.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::backend::{BackendError, StoreBackend, resolve_target};
use crate::model::{Fingerprint, StoreSnapshot, fingerprint_stores, should_render};
use crate::transport::{Message, Transport};

use super::clamp_interval_ms;
use super::poll::PollTimer;

pub struct SyncEngine {
    backend: Box<dyn StoreBackend>,
    transport: Box<dyn Transport>,
    target: String,
    timer: PollTimer,
    last_fingerprint: Option<Fingerprint>,
    had_data: bool,
    last_error: Option<BackendError>,
}

impl SyncEngine {
    pub fn new(
        backend: Box<dyn StoreBackend>,
        transport: Box<dyn Transport>,
        target: impl Into<String>,
        interval_ms: u64,
    ) -> Self {
        let interval = Duration::from_millis(clamp_interval_ms(interval_ms));
        Self {
            backend,
            transport,
            target: target.into(),
            timer: PollTimer::new(interval),
            last_fingerprint: None,
            had_data: false,
            last_error: None,
        }
    }

    /// First fetch plus the auto/interval handshake, in that order: the view
    /// gets data first, then the authoritative refresh settings.
    pub fn startup(&mut self, now: Instant) {
        self.timer.start(now);
        if self.timer.poll(now) {
            self.tick();
        }
        self.transport.send(Message::AutoState { enabled: true });
        self.transport.send(Message::IntervalState {
            ms: self.interval_ms(),
        });
    }

    /// Services inbound control messages, then fires a due tick.
    pub fn pump(&mut self, now: Instant) {
        for msg in self.transport.drain() {
            self.handle_message(msg, now);
        }
        if self.timer.poll(now) {
            self.tick();
        }
    }

    /// True once the view endpoint is gone and the engine should wind down.
    pub fn is_disconnected(&self) -> bool {
        self.transport.is_closed()
    }

    /// The failure recorded by the most recent fetch, if any.
    pub fn last_error(&self) -> Option<&BackendError> {
        self.last_error.as_ref()
    }

    fn handle_message(&mut self, msg: Message, now: Instant) {
        match msg {
            Message::RefreshRequest => self.tick(),
            Message::ToggleAuto { enabled } => {
                if enabled {
                    self.timer.start(now);
                } else {
                    self.timer.stop();
                }
                self.transport.send(Message::AutoState { enabled });
            }
            Message::SetInterval { ms } => {
                let ms = clamp_interval_ms(ms);
                self.timer.set_interval(Duration::from_millis(ms), now);
                self.transport.send(Message::IntervalState { ms });
            }
            // View-bound kinds are not meant for this side.
            Message::SnapshotUpdate { .. }
            | Message::AutoState { .. }
            | Message::IntervalState { .. } => {}
        }
    }

    fn tick(&mut self) {
        let stores = self.fetch();
        let fp = fingerprint_stores(&stores);
        let had_prior = self.had_data && !stores.is_empty();
        if !should_render(self.last_fingerprint.as_ref(), &fp, had_prior) {
            debug!("snapshot unchanged, update suppressed");
            return;
        }
        self.last_fingerprint = Some(fp);
        self.had_data = !stores.is_empty();
        self.transport.send(Message::SnapshotUpdate { stores });
    }

    fn fetch(&mut self) -> Vec<StoreSnapshot> {
        match resolve_target(self.backend.as_ref(), &self.target) {
            Ok(Some(handle)) => match handle.snapshot() {
                Ok(snapshot) => {
                    self.last_error = None;
                    return vec![snapshot];
                }
                Err(err) => {
                    warn!("snapshot capture failed: {}", err);
                    self.last_error = Some(err);
                }
            },
            Ok(None) => {
                debug!("store {} not found", self.target);
                self.last_error = None;
            }
            Err(err) => {
                warn!("backend unavailable: {}", err);
                self.last_error = Some(err);
            }
        }
        Vec::new()
    }

    fn interval_ms(&self) -> u64 {
        self.timer.interval().as_millis() as u64
    }
}
