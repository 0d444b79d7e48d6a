use ratscrew_engine::game::MatchState;
use ratscrew_engine::seats::SessionId;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

// Observers whose buffer fills up are dropped.
const EVENT_CHANNEL_BUFFER: usize = 256;

pub type EventSender = mpsc::Sender<TableEvent>;
pub type EventReceiver = mpsc::Receiver<TableEvent>;

pub struct EventSubscription {
    bus: EventBus,
    subscriber_id: usize,
    pub receiver: EventReceiver,
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.subscriber_id);
    }
}

/// Fan-out of table events to every connected observer.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    inner: Arc<EventBusInner>,
}

#[derive(Debug, Default)]
struct EventBusInner {
    subscribers: RwLock<Vec<(usize, EventSender)>>,
    next_id: AtomicUsize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> EventSubscription {
        let (subscriber_id, receiver) = self.subscribe_raw();
        EventSubscription {
            bus: self.clone(),
            subscriber_id,
            receiver,
        }
    }

    fn subscribe_raw(&self) -> (usize, EventReceiver) {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_BUFFER);
        let id = self.inner.next_id.fetch_add(1, Ordering::AcqRel);
        match self.inner.subscribers.write() {
            Ok(mut guard) => guard.push((id, tx)),
            Err(poisoned) => poisoned.into_inner().push((id, tx)),
        }

        tracing::info!(subscriber_id = id, "observer subscribed to table events");

        (id, rx)
    }

    /// Delivers the event to every observer without blocking.
    /// Returns the number of observers that received it.
    pub fn broadcast(&self, event: TableEvent) -> usize {
        tracing::debug!(event_type = event.kind(), "broadcasting table event");

        let subscribers = match self.inner.subscribers.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };

        if subscribers.is_empty() {
            tracing::trace!("no observers for table event");
            return 0;
        }

        let mut failed = Vec::new();
        for (id, sender) in &subscribers {
            if let Err(e) = sender.try_send(event.clone()) {
                tracing::warn!(
                    subscriber_id = id,
                    error = ?e,
                    "failed to send event to observer"
                );
                failed.push(*id);
            }
        }
        if !failed.is_empty() {
            self.remove_subscribers(&failed);
        }
        subscribers.len() - failed.len()
    }

    pub fn unsubscribe(&self, subscriber_id: usize) {
        self.remove_subscribers(&[subscriber_id]);
    }

    pub fn subscriber_count(&self) -> usize {
        match self.inner.subscribers.read() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    fn remove_subscribers(&self, ids: &[usize]) {
        let mut guard = match self.inner.subscribers.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.retain(|(id, _)| !ids.contains(id));
    }
}

/// Messages pushed to observers after table transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TableEvent {
    /// Canonical state after a transition.
    StateUpdated { state: MatchState },
    /// Fire-and-forget announcement, e.g. "Player 1 won the slap!".
    Notification { message: String },
    /// A session was removed without asking (idle timeout).
    SessionEnded {
        session_id: SessionId,
        reason: String,
    },
}

impl TableEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            TableEvent::StateUpdated { .. } => "state_updated",
            TableEvent::Notification { .. } => "notification",
            TableEvent::SessionEnded { .. } => "session_ended",
        }
    }
}
