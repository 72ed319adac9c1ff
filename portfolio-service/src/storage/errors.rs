//! Storage-specific errors, converted to `PersistenceError` at the port boundary.

use diesel::result::Error as DieselError;
use ledger::PersistenceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(#[from] diesel::ConnectionError),

    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    #[error("Query execution failed: {0}")]
    QueryFailed(#[from] DieselError),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Database file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored row {id} is unreadable: {reason}")]
    CorruptRow { id: i32, reason: String },
}

impl From<StorageError> for PersistenceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ConnectionFailed(e) => PersistenceError::Unavailable(e.to_string()),
            StorageError::PoolError(e) => PersistenceError::Unavailable(e.to_string()),
            StorageError::Io(e) => PersistenceError::Unavailable(e.to_string()),
            StorageError::QueryFailed(e) => PersistenceError::Query(e.to_string()),
            StorageError::MigrationFailed(e) => PersistenceError::Migration(e),
            err @ StorageError::CorruptRow { .. } => PersistenceError::Corrupt(err.to_string()),
        }
    }
}

/// Shorthand for converting a storage result at the port boundary.
pub trait IntoPersistence<T> {
    fn into_persistence(self) -> Result<T, PersistenceError>;
}

impl<T> IntoPersistence<T> for Result<T, StorageError> {
    fn into_persistence(self) -> Result<T, PersistenceError> {
        self.map_err(PersistenceError::from)
    }
}
