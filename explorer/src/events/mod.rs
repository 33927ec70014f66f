//! Database event pipeline: listener -> bounded queue -> broadcaster -> sessions

pub mod backoff;
pub mod broadcaster;
pub mod listener;

pub use backoff::Backoff;
pub use broadcaster::{Broadcaster, DeliveryReport};
pub use listener::EventListener;

use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use crate::config::ListenerConfig;
use crate::database::Database;
use crate::websocket::subscriptions::SubscriberRegistry;

pub struct EventPipeline {
    listener: JoinHandle<()>,
    broadcaster: JoinHandle<()>,
}

impl EventPipeline {
    pub fn spawn(
        database: &Database,
        config: &ListenerConfig,
        registry: Arc<SubscriberRegistry>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let (sink, events) = mpsc::channel(config.queue_capacity);
        let backoff = Backoff::new(config.initial_backoff(), config.max_backoff());
        let listener = EventListener::new(database.pool().clone(), config.channel.clone(), backoff, sink);

        Self {
            broadcaster: Broadcaster::new(registry).spawn(events),
            listener: tokio::spawn(listener.run(shutdown)),
        }
    }

    /// Waits for the listener to observe shutdown; the broadcaster then drains and stops.
    pub async fn join(self) {
        if let Err(e) = self.listener.await {
            tracing::error!(error = %e, "event listener task failed");
        }
        if let Err(e) = self.broadcaster.await {
            tracing::error!(error = %e, "broadcaster task failed");
        }
    }
}
