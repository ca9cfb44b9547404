//! Cross-context transport over thread channels.
//!
//! Frames are JSON-encoded messages wrapped in an envelope carrying the
//! sender's peer id. The receiver drops envelopes whose sender is not the
//! expected peer, and frames that fail to decode — both silently, at trace
//! level only.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{Message, Transport};

/// Identity token of one endpoint.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct PeerId(u64);

impl PeerId {
    fn next() -> Self {
        static SEQ: AtomicU64 = AtomicU64::new(1);
        PeerId(SEQ.fetch_add(1, Ordering::Relaxed))
    }
}

/// One JSON frame with its sender identity.
#[derive(Clone, Serialize, Deserialize, Debug)]
struct Envelope {
    from: PeerId,
    frame: String,
}

/// Endpoint whose peer runs in another thread.
///
/// FIFO within each direction; no ordering guarantee across the two
/// directions.
pub struct ChannelTransport {
    self_id: PeerId,
    expected_peer: PeerId,
    tx: Sender<Envelope>,
    rx: Receiver<Envelope>,
    closed: AtomicBool,
}

impl ChannelTransport {
    /// Creates a connected endpoint pair with fresh identities.
    pub fn pair() -> (ChannelTransport, ChannelTransport) {
        let left_id = PeerId::next();
        let right_id = PeerId::next();
        let (left_tx, right_rx) = mpsc::channel();
        let (right_tx, left_rx) = mpsc::channel();
        (
            ChannelTransport {
                self_id: left_id,
                expected_peer: right_id,
                tx: left_tx,
                rx: left_rx,
                closed: AtomicBool::new(false),
            },
            ChannelTransport {
                self_id: right_id,
                expected_peer: left_id,
                tx: right_tx,
                rx: right_rx,
                closed: AtomicBool::new(false),
            },
        )
    }
}

impl Transport for ChannelTransport {
    fn send(&self, msg: Message) {
        let frame = match serde_json::to_string(&msg) {
            Ok(frame) => frame,
            Err(err) => {
                trace!("dropping unencodable frame: {}", err);
                return;
            }
        };
        let envelope = Envelope {
            from: self.self_id,
            frame,
        };
        if self.tx.send(envelope).is_err() {
            self.closed.store(true, Ordering::Relaxed);
        }
    }

    fn drain(&self) -> Vec<Message> {
        let mut messages = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(envelope) => {
                    if envelope.from != self.expected_peer {
                        trace!("dropping frame from untrusted sender {:?}", envelope.from);
                        continue;
                    }
                    match serde_json::from_str(&envelope.frame) {
                        Ok(msg) => messages.push(msg),
                        Err(err) => trace!("dropping undecodable frame: {}", err),
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.closed.store(true, Ordering::Relaxed);
                    break;
                }
            }
        }
        messages
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }
}
