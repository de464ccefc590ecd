//! SQLite backend for the Porteria front-desk logbook.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. The single serialized connection also
//! gives the read-then-write lifecycle guards their atomicity.

mod encode;
mod schema;
mod store;

pub mod error;
pub mod seed;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
