//! Duplex messaging between the sync loop and the view.
//!
//! Both directions speak the same small set of tagged messages, fire and
//! forget: no acknowledgment, no retry, the latest message wins. The two
//! implementations are interchangeable — `LocalTransport` when the view
//! shares the loop's thread, `ChannelTransport` when the view runs in its
//! own thread with no shared state.

mod channel;
mod local;

pub use channel::{ChannelTransport, PeerId};
pub use local::LocalTransport;

use serde::{Deserialize, Serialize};

use crate::model::StoreSnapshot;

/// Wire messages, tagged by `type` on the wire.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Message {
    /// Loop → view: a fresh snapshot list (zero or one stores; empty when
    /// the target store is gone).
    SnapshotUpdate { stores: Vec<StoreSnapshot> },

    /// View → loop: poll now, regardless of the timer.
    RefreshRequest,

    /// View → loop: turn periodic polling on or off.
    ToggleAuto { enabled: bool },

    /// View → loop: change the polling cadence.
    SetInterval { ms: u64 },

    /// Loop → view: the authoritative auto-refresh state.
    AutoState { enabled: bool },

    /// Loop → view: the authoritative polling cadence.
    IntervalState { ms: u64 },
}

/// One endpoint of the duplex channel.
pub trait Transport: Send {
    /// Queues a message to the peer. Never blocks; a message that cannot be
    /// delivered is dropped without notice.
    fn send(&self, msg: Message);

    /// Takes every pending inbound message, in delivery order.
    fn drain(&self) -> Vec<Message>;

    /// True once the peer endpoint is gone for good.
    fn is_closed(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_tags_are_camel_case() {
        assert_eq!(
            serde_json::to_value(Message::RefreshRequest).unwrap(),
            json!({"type": "refreshRequest"})
        );
        assert_eq!(
            serde_json::to_value(Message::ToggleAuto { enabled: true }).unwrap(),
            json!({"type": "toggleAuto", "enabled": true})
        );
        assert_eq!(
            serde_json::to_value(Message::SetInterval { ms: 750 }).unwrap(),
            json!({"type": "setInterval", "ms": 750})
        );
        assert_eq!(
            serde_json::to_value(Message::SnapshotUpdate { stores: Vec::new() }).unwrap(),
            json!({"type": "snapshotUpdate", "stores": []})
        );
        assert_eq!(
            serde_json::to_value(Message::IntervalState { ms: 500 }).unwrap(),
            json!({"type": "intervalState", "ms": 500})
        );
    }

    #[test]
    fn test_unknown_tag_does_not_decode() {
        assert!(serde_json::from_str::<Message>(r#"{"type":"mystery"}"#).is_err());
    }
}
