//! Live notification push over WebSocket

pub mod server;
pub mod subscriptions;

pub use server::{WSServer, WsState};
pub use subscriptions::{SubscriberRegistry, SessionHandle};
