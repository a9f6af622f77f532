//! Outbound "notify private recipient" callback (`spec.md` §6).
//!
//! This is the seam the out-of-scope network transport plugs into: the core
//! never knows how a `PrivateEvent` reaches a client, only that it does.
//! Shape is modeled directly on the teacher's `audit::AuditSink` trio
//! (`AuditEvent`/`AuditSink`/`StdoutAuditSink`/`InMemoryAuditSink`), renamed
//! to the spec's own vocabulary.

use crate::types::{ClientId, OrderId, Side, Timestamp};
use rust_decimal::Decimal;
use serde::Serialize;

/// Status of a single private notification. Matches the closed set in
/// `spec.md` §6.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum EventStatus {
    NewOrder,
    PartialFill,
    Filled,
    Cancelled,
    Amended,
    NewFill,
    Rejected,
}

/// One private notification delivered to the owner of an order. Only the
/// fields relevant to `status` are populated; the rest are `None`.
#[derive(Clone, Debug, Serialize)]
pub struct PrivateEvent {
    pub status: EventStatus,
    pub engine_ts: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl PrivateEvent {
    pub fn new(status: EventStatus, engine_ts: Timestamp) -> Self {
        Self {
            status,
            engine_ts,
            order_id: None,
            side: None,
            quantity: None,
            remaining: None,
            price: None,
            created: None,
            updated: None,
            reason: None,
        }
    }
}

/// Sink for private notifications. Implementations deliver to stdout/log,
/// or buffer in memory for tests; a transport adapter would implement this
/// to push over a websocket/FIX session.
pub trait PrivateNotifier {
    fn notify(&mut self, client_id: &ClientId, event: PrivateEvent);
}

/// Logs every notification at `info` level via the `log` facade. Default
/// notifier for binaries that don't otherwise care about delivery.
#[derive(Default)]
pub struct LoggingNotifier;

impl PrivateNotifier for LoggingNotifier {
    fn notify(&mut self, client_id: &ClientId, event: PrivateEvent) {
        log::info!("private notification to {client_id}: {:?}", event.status);
        log::debug!("  {event:?}");
    }
}

/// Discards every notification. Used internally where an operation must
/// reuse a primitive that emits its own notification (e.g. [`queue_add`](crate::queue::queue_add))
/// but the caller intends to emit a single, different notification itself.
#[derive(Default)]
pub struct NullNotifier;

impl PrivateNotifier for NullNotifier {
    fn notify(&mut self, _client_id: &ClientId, _event: PrivateEvent) {}
}

/// Buffers notifications for inspection in tests. Not thread-safe; the core
/// is single-writer (`spec.md` §5) so this does not need interior locking.
#[derive(Default)]
pub struct InMemoryNotifier {
    events: Vec<(ClientId, PrivateEvent)>,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[(ClientId, PrivateEvent)] {
        &self.events
    }

    pub fn events_for(&self, client_id: &ClientId) -> Vec<&PrivateEvent> {
        self.events
            .iter()
            .filter(|(c, _)| c == client_id)
            .map(|(_, e)| e)
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl PrivateNotifier for InMemoryNotifier {
    fn notify(&mut self, client_id: &ClientId, event: PrivateEvent) {
        self.events.push((client_id.clone(), event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_notifier_records_per_client() {
        let mut n = InMemoryNotifier::new();
        let alice = ClientId::from("alice");
        let bob = ClientId::from("bob");
        n.notify(&alice, PrivateEvent::new(EventStatus::NewOrder, 1));
        n.notify(&bob, PrivateEvent::new(EventStatus::NewOrder, 2));
        n.notify(&alice, PrivateEvent::new(EventStatus::Filled, 3));

        assert_eq!(n.events().len(), 3);
        assert_eq!(n.events_for(&alice).len(), 2);
        assert_eq!(n.events_for(&bob).len(), 1);
    }
}
