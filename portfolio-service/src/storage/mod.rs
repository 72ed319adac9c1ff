//! SQLite-backed transaction history.
//!
//! Diesel is confined to this module: the rest of the service only sees the
//! `HistorySource` port from the ledger crate and storage-agnostic
//! `PersistenceError`s.

pub mod db;
pub mod errors;
pub mod model;
pub mod repository;
pub mod schema;

pub use db::{create_pool, init, run_migrations, DbPool};
pub use errors::StorageError;
pub use repository::SqliteHistory;
