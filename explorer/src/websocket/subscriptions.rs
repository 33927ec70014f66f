//! Subscription registry for WebSocket sessions
//!
//! Maps each address to the sessions subscribed to it. Every session owns a
//! bounded delivery queue; the registry only keeps the sending half.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use parking_lot::RwLock;
use tokio::sync::mpsc;
use uuid::Uuid;
use crate::models::{Address, NotificationEvent};

pub type SessionId = Uuid;

/// One event routed to one session, tagged with the address channel it matched.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub channel: Address,
    pub event: Arc<NotificationEvent>,
}

#[derive(Default)]
struct Inner {
    by_address: HashMap<Address, HashMap<SessionId, mpsc::Sender<Delivery>>>,
    by_session: HashMap<SessionId, HashSet<Address>>,
}

#[derive(Default)]
pub struct SubscriberRegistry {
    inner: RwLock<Inner>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session with a queue of `capacity` deliveries. Dropping the
    /// returned handle unregisters the session from every address.
    pub fn open_session(self: &Arc<Self>, capacity: usize) -> (SessionHandle, mpsc::Receiver<Delivery>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = SessionHandle {
            id: Uuid::new_v4(),
            sender: tx,
            registry: Arc::clone(self),
        };
        (handle, rx)
    }

    /// Returns false if the session was already subscribed to `address`.
    pub fn subscribe(&self, address: Address, session: SessionId, sender: mpsc::Sender<Delivery>) -> bool {
        let mut inner = self.inner.write();
        let added = inner
            .by_session
            .entry(session)
            .or_default()
            .insert(address.clone());
        if added {
            inner.by_address.entry(address).or_default().insert(session, sender);
        }
        added
    }

    pub fn unsubscribe(&self, address: &Address, session: SessionId) -> bool {
        let mut inner = self.inner.write();
        let removed = match inner.by_session.get_mut(&session) {
            Some(addresses) => addresses.remove(address),
            None => false,
        };
        if !removed {
            return false;
        }
        if inner.by_session.get(&session).is_some_and(|a| a.is_empty()) {
            inner.by_session.remove(&session);
        }
        Self::detach(&mut inner, address, session);
        true
    }

    /// Removes `session` from every address it subscribed to; returns how many.
    pub fn remove_session(&self, session: SessionId) -> usize {
        let mut inner = self.inner.write();
        let Some(addresses) = inner.by_session.remove(&session) else {
            return 0;
        };
        for address in &addresses {
            Self::detach(&mut inner, address, session);
        }
        addresses.len()
    }

    fn detach(inner: &mut Inner, address: &Address, session: SessionId) {
        if let Some(sessions) = inner.by_address.get_mut(address) {
            sessions.remove(&session);
            if sessions.is_empty() {
                inner.by_address.remove(address);
            }
        }
    }

    /// Snapshot of the senders for `address`, taken so no lock is held while delivering.
    pub fn subscribers(&self, address: &Address) -> Vec<(SessionId, mpsc::Sender<Delivery>)> {
        self.inner
            .read()
            .by_address
            .get(address)
            .map(|sessions| sessions.iter().map(|(id, tx)| (*id, tx.clone())).collect())
            .unwrap_or_default()
    }

    pub fn subscriber_count(&self, address: &Address) -> usize {
        self.inner.read().by_address.get(address).map_or(0, |s| s.len())
    }

    pub fn address_count(&self) -> usize {
        self.inner.read().by_address.len()
    }

    pub fn session_count(&self) -> usize {
        self.inner.read().by_session.len()
    }
}

/// A live client session. Unregisters itself on drop.
pub struct SessionHandle {
    id: SessionId,
    sender: mpsc::Sender<Delivery>,
    registry: Arc<SubscriberRegistry>,
}

impl SessionHandle {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn subscribe(&self, address: Address) -> bool {
        self.registry.subscribe(address, self.id, self.sender.clone())
    }

    pub fn unsubscribe(&self, address: &Address) -> bool {
        self.registry.unsubscribe(address, self.id)
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        let removed = self.registry.remove_session(self.id);
        tracing::debug!(session = %self.id, addresses = removed, "session closed");
    }
}
