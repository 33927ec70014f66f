//! Fans parsed notification events out to subscribed sessions

use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use crate::models::{Address, NotificationEvent};
use crate::websocket::subscriptions::{Delivery, SubscriberRegistry};

/// Outcome of delivering one event.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    /// Session queue was full; the event was dropped for that session only.
    pub dropped: usize,
    /// Session had already gone away and was removed from the registry.
    pub pruned: usize,
}

#[derive(Clone)]
pub struct Broadcaster {
    registry: Arc<SubscriberRegistry>,
}

impl Broadcaster {
    pub fn new(registry: Arc<SubscriberRegistry>) -> Self {
        Self { registry }
    }

    /// Delivers `event` to the sender's subscribers, then to the receiver's.
    /// The two emissions are independent, so a session watching both
    /// addresses (or a self-transfer) gets the event twice.
    pub fn deliver(&self, event: NotificationEvent) -> DeliveryReport {
        let event = Arc::new(event);
        let mut report = DeliveryReport::default();
        self.deliver_to(&event.from_acc_addr, &event, &mut report);
        self.deliver_to(&event.to_acc_addr, &event, &mut report);
        report
    }

    fn deliver_to(&self, channel: &Address, event: &Arc<NotificationEvent>, report: &mut DeliveryReport) {
        for (session, sender) in self.registry.subscribers(channel) {
            let delivery = Delivery {
                channel: channel.clone(),
                event: Arc::clone(event),
            };
            match sender.try_send(delivery) {
                Ok(()) => report.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    report.dropped += 1;
                    warn!(%session, %channel, "session queue full, dropping notification");
                }
                Err(TrySendError::Closed(_)) => {
                    report.pruned += 1;
                    self.registry.remove_session(session);
                    debug!(%session, "pruned closed session");
                }
            }
        }
    }

    /// Single dispatch task: events are fanned out in the order they arrive.
    /// Exits when every sender of `events` is dropped.
    pub fn spawn(self, mut events: mpsc::Receiver<NotificationEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                let tx_hash = event.tx_hash.clone();
                let report = self.deliver(event);
                debug!(
                    %tx_hash,
                    delivered = report.delivered,
                    dropped = report.dropped,
                    pruned = report.pruned,
                    "notification fanned out"
                );
            }
            info!("broadcaster stopped");
        })
    }
}
