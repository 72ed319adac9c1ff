//! The transaction log the engine replays.
//!
//! `HistorySource` is the seam between accounting and storage: the engine
//! only ever sees an ordered `Vec<Transaction>`, while implementations decide
//! where it lives. `InMemoryHistory` backs tests and throwaway servers.

use std::sync::RwLock;

use crate::error::PersistenceError;
use crate::types::Transaction;

/// Ordered, append-only transaction log.
pub trait HistorySource: Send + Sync {
    /// Returns every committed transaction in commit order.
    fn load_all(&self) -> Result<Vec<Transaction>, PersistenceError>;

    /// Appends the whole batch, or nothing on failure.
    fn append_all(&self, batch: &[Transaction]) -> Result<(), PersistenceError>;
}

/// Process-local log guarded by a `RwLock`.
///
/// A batch is appended under one write lock, so a concurrent `load_all`
/// sees either none or all of it.
#[derive(Debug, Default)]
pub struct InMemoryHistory {
    log: RwLock<Vec<Transaction>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the log with already-committed transactions.
    pub fn with_history(history: Vec<Transaction>) -> Self {
        Self {
            log: RwLock::new(history),
        }
    }

    pub fn len(&self) -> usize {
        self.log
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HistorySource for InMemoryHistory {
    fn load_all(&self) -> Result<Vec<Transaction>, PersistenceError> {
        let log = self
            .log
            .read()
            .map_err(|_| PersistenceError::Unavailable("history lock poisoned".into()))?;
        Ok(log.clone())
    }

    fn append_all(&self, batch: &[Transaction]) -> Result<(), PersistenceError> {
        let mut log = self
            .log
            .write()
            .map_err(|_| PersistenceError::Unavailable("history lock poisoned".into()))?;
        log.extend_from_slice(batch);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn append_keeps_commit_order() {
        let history = InMemoryHistory::new();
        history
            .append_all(&[
                Transaction::buy("AAPL", dec!(1), 10),
                Transaction::buy("MSFT", dec!(2), 5),
            ])
            .unwrap();
        history
            .append_all(&[Transaction::sell("AAPL", dec!(3), 4)])
            .unwrap();

        let log = history.load_all().unwrap();
        assert_eq!(log.len(), 3);
        assert_eq!(log[0].stock_id, "AAPL");
        assert_eq!(log[1].stock_id, "MSFT");
        assert_eq!(log[2], Transaction::sell("AAPL", dec!(3), 4));
    }

    #[test]
    fn seeded_history_is_loaded() {
        let history = InMemoryHistory::with_history(vec![Transaction::buy("AAPL", dec!(1), 1)]);
        assert_eq!(history.len(), 1);
        assert!(!history.is_empty());
    }

    #[test]
    fn len_survives_poisoned_lock() {
        let history = std::sync::Arc::new(InMemoryHistory::with_history(vec![
            Transaction::buy("AAPL", dec!(1), 1),
            Transaction::buy("AAPL", dec!(1), 2),
        ]));

        let writer = std::sync::Arc::clone(&history);
        let _ = std::thread::spawn(move || {
            let _log = writer.log.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert!(matches!(
            history.load_all(),
            Err(PersistenceError::Unavailable(_))
        ));
        assert_eq!(history.len(), 2);
        assert!(!history.is_empty());
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let history = InMemoryHistory::new();
        history.append_all(&[]).unwrap();
        assert!(history.is_empty());
    }
}
