//! WebSocket server implementation

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use chrono::{DateTime, Utc};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use crate::models::Address;
use crate::websocket::subscriptions::{Delivery, SubscriberRegistry};

const CONTROL_QUEUE_CAPACITY: usize = 16;

#[derive(Clone)]
pub struct WsState {
    pub registry: Arc<SubscriberRegistry>,
    pub session_queue_capacity: usize,
}

pub struct WSServer;

impl WSServer {
    pub async fn handle_connection(ws: WebSocketUpgrade, State(state): State<WsState>) -> Response {
        ws.on_upgrade(move |socket| Self::handle_socket(socket, state))
    }

    async fn handle_socket(socket: WebSocket, state: WsState) {
        let (mut sender, mut receiver) = socket.split();
        let (session, mut deliveries) = state.registry.open_session(state.session_queue_capacity);
        let (control_tx, mut control_rx) = mpsc::channel::<WSEvent>(CONTROL_QUEUE_CAPACITY);
        let session_id = session.id();
        debug!(session = %session_id, "websocket session opened");

        // Owns the session handle, so the registration ends with this task.
        let mut recv_task = tokio::spawn(async move {
            while let Some(Ok(msg)) = receiver.next().await {
                let text = match msg {
                    Message::Text(text) => text,
                    Message::Close(_) => break,
                    _ => continue,
                };
                let reply = match serde_json::from_str::<WSCommand>(&text) {
                    Ok(WSCommand::Subscribe { channel }) => match Address::parse(&channel) {
                        Ok(address) => {
                            session.subscribe(address.clone());
                            WSEvent::control("subscribed", &address)
                        }
                        Err(code) => WSEvent::error(code.as_str()),
                    },
                    Ok(WSCommand::Unsubscribe { channel }) => match Address::parse(&channel) {
                        Ok(address) => {
                            session.unsubscribe(&address);
                            WSEvent::control("unsubscribed", &address)
                        }
                        Err(code) => WSEvent::error(code.as_str()),
                    },
                    Err(_) => WSEvent::error("INVALID_COMMAND"),
                };
                if control_tx.send(reply).await.is_err() {
                    break;
                }
            }
            drop(session);
        });

        let mut send_task = tokio::spawn(async move {
            loop {
                let event = tokio::select! {
                    Some(delivery) = deliveries.recv() => WSEvent::from(delivery),
                    Some(reply) = control_rx.recv() => reply,
                    else => break,
                };

                match serde_json::to_string(&event) {
                    Ok(json) => {
                        if sender.send(Message::Text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!(error = %e, "failed to encode websocket event"),
                }
            }
        });

        tokio::select! {
            _ = &mut recv_task => send_task.abort(),
            _ = &mut send_task => recv_task.abort(),
        }
        debug!(session = %session_id, "websocket session closed");
    }
}

#[derive(serde::Deserialize)]
#[serde(tag = "type")]
enum WSCommand {
    Subscribe { channel: String },
    Unsubscribe { channel: String },
}

/// Frame pushed to clients. Notification frames use the address as `channel`.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct WSEvent {
    pub channel: String,
    pub data: serde_json::Value,
    pub emitted_at: DateTime<Utc>,
}

impl WSEvent {
    fn control(channel: &str, address: &Address) -> Self {
        Self {
            channel: channel.to_string(),
            data: serde_json::json!({ "address": address }),
            emitted_at: Utc::now(),
        }
    }

    fn error(code: &str) -> Self {
        Self {
            channel: "error".to_string(),
            data: serde_json::json!({ "error": code }),
            emitted_at: Utc::now(),
        }
    }
}

impl From<Delivery> for WSEvent {
    fn from(delivery: Delivery) -> Self {
        Self {
            channel: delivery.channel.to_string(),
            data: serde_json::to_value(&*delivery.event).unwrap_or(serde_json::Value::Null),
            emitted_at: Utc::now(),
        }
    }
}
