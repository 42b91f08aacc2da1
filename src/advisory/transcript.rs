//! Append-only conversation transcript.

use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast;

use super::types::AdvisoryMessage;

const EVENT_CAPACITY: usize = 64;

/// Ordered, append-only list of messages shared by the dispatcher and the
/// presentation layer.
///
/// Cloning yields another handle onto the same transcript. Every append is
/// also broadcast to subscribers.
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Arc<Mutex<Vec<AdvisoryMessage>>>,
    events: broadcast::Sender<AdvisoryMessage>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            messages: Arc::new(Mutex::new(Vec::new())),
            events,
        }
    }

    /// Append a message. Existing entries are never modified.
    pub fn append(&self, message: AdvisoryMessage) {
        self.lock().push(message.clone());
        // No subscribers is fine.
        let _ = self.events.send(message);
    }

    /// A copy of every message in append order.
    pub fn snapshot(&self) -> Vec<AdvisoryMessage> {
        self.lock().clone()
    }

    pub fn last(&self) -> Option<AdvisoryMessage> {
        self.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Receive each message appended from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<AdvisoryMessage> {
        self.events.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<AdvisoryMessage>> {
        self.messages.lock().unwrap_or_else(|e| e.into_inner())
    }
}
