//! Database module for explorer

pub mod schema;
pub mod queries;
pub mod connection;

pub use connection::Database;
