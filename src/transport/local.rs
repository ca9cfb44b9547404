//! Same-context transport: a crossed pair of in-memory queues.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{Message, Transport};

type Queue = Arc<Mutex<VecDeque<Message>>>;

/// Endpoint whose peer lives in the same execution context.
///
/// Delivery order is exactly call order and nothing is serialized, so there
/// is no sender identity to verify.
pub struct LocalTransport {
    inbox: Queue,
    outbox: Queue,
}

impl LocalTransport {
    /// Creates a connected endpoint pair.
    pub fn pair() -> (LocalTransport, LocalTransport) {
        let a = Arc::new(Mutex::new(VecDeque::new()));
        let b = Arc::new(Mutex::new(VecDeque::new()));
        (
            LocalTransport {
                inbox: a.clone(),
                outbox: b.clone(),
            },
            LocalTransport {
                inbox: b,
                outbox: a,
            },
        )
    }
}

impl Transport for LocalTransport {
    fn send(&self, msg: Message) {
        lock(&self.outbox).push_back(msg);
    }

    fn drain(&self) -> Vec<Message> {
        lock(&self.inbox).drain(..).collect()
    }
}

fn lock(queue: &Queue) -> MutexGuard<'_, VecDeque<Message>> {
    queue.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_is_crossed() {
        let (a, b) = LocalTransport::pair();
        a.send(Message::RefreshRequest);
        b.send(Message::AutoState { enabled: true });

        assert_eq!(b.drain(), vec![Message::RefreshRequest]);
        assert_eq!(a.drain(), vec![Message::AutoState { enabled: true }]);
    }

    #[test]
    fn test_drain_preserves_order_and_empties() {
        let (a, b) = LocalTransport::pair();
        a.send(Message::SetInterval { ms: 100 });
        a.send(Message::SetInterval { ms: 200 });
        a.send(Message::RefreshRequest);

        let drained = b.drain();
        assert_eq!(
            drained,
            vec![
                Message::SetInterval { ms: 100 },
                Message::SetInterval { ms: 200 },
                Message::RefreshRequest,
            ]
        );
        assert!(b.drain().is_empty());
    }
}
