//! Wallet Explorer Backend
//!
//! HTTP endpoints for blocks, transactions, balances and per-address
//! notifications, plus a WebSocket channel that pushes new notifications
//! to subscribed clients as the database announces them.

pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod events;
pub mod models;
pub mod websocket;

pub use error::{ApiErrorCode, ExplorerError, Result};
