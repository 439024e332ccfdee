use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;
use crate::models::RequesterId;
use crate::services::transport::{Envelope, Transport, TransportError};

/// In-process mailboxes, one per recipient
///
/// For tests and for embedding the library in-process; the binary always
/// delivers through the callback. Recipients can be marked unreachable to
/// exercise delivery failures.
#[derive(Default)]
pub struct MemoryTransport {
    mailboxes: Mutex<HashMap<RequesterId, Vec<Envelope>>>,
    unreachable: Mutex<HashSet<RequesterId>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain everything delivered to `recipient` so far
    pub async fn take(&self, recipient: &RequesterId) -> Vec<Envelope> {
        self.mailboxes.lock().await.remove(recipient).unwrap_or_default()
    }

    /// Envelopes delivered to `recipient`, without draining
    pub async fn peek(&self, recipient: &RequesterId) -> Vec<Envelope> {
        self.mailboxes
            .lock()
            .await
            .get(recipient)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn set_unreachable(&self, recipient: &RequesterId, unreachable: bool) {
        let mut set = self.unreachable.lock().await;
        if unreachable {
            set.insert(recipient.clone());
        } else {
            set.remove(recipient);
        }
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn deliver(&self, recipient: &RequesterId, envelope: Envelope) -> Result<(), TransportError> {
        if self.unreachable.lock().await.contains(recipient) {
            return Err(TransportError::Unreachable(recipient.clone()));
        }

        tracing::trace!("Memory delivery to {}: {:?}", recipient, envelope);
        self.mailboxes
            .lock()
            .await
            .entry(recipient.clone())
            .or_default()
            .push(envelope);
        Ok(())
    }
}
