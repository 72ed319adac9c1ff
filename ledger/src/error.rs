//! Error taxonomy shared by the engine, the history ports and the service.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    /// Bad input caught before any lot is touched.
    #[error("invalid transaction: {0}")]
    Validation(String),

    /// A sell asked for more shares than the open lots hold.
    #[error("not enough shares to sell for stock {stock_id}: holding {held}, short by {shortfall}")]
    InsufficientHoldings {
        stock_id: String,
        held: i64,
        shortfall: i64,
    },

    /// A share total or money amount no longer fits its numeric type.
    #[error("amount overflows for stock {stock_id}")]
    Overflow { stock_id: String },

    #[error("history store failed: {0}")]
    Persistence(#[from] PersistenceError),
}

impl LedgerError {
    /// True for errors caused by the caller's input rather than the store.
    pub fn is_client_fault(&self) -> bool {
        !matches!(self, LedgerError::Persistence(_))
    }
}

/// Storage-agnostic failure reported by a history source.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("history store unavailable: {0}")]
    Unavailable(String),

    #[error("history query failed: {0}")]
    Query(String),

    #[error("history contains an unreadable record: {0}")]
    Corrupt(String),

    #[error("history schema migration failed: {0}")]
    Migration(String),
}
