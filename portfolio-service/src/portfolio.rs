//! Portfolio service core: glues the FIFO ledger to a transaction history.
//!
//! The ledger engine is pure, so every request rebuilds its view of the
//! portfolio from the history source. What this module adds is ordering:
//!
//! # Concurrency Model
//! - Applying a batch is a read-compute-write sequence (load history, match
//!   lots, append batch). It runs inside one async `Mutex` so two batches can
//!   never match against the same stale lots and double-spend them.
//! - Read-only queries (balances, lots, history) skip the mutex. They rely on
//!   the history source loading atomically with respect to `append_all`, so
//!   they see a batch entirely or not at all.
//! - The mutex is held across the append, which means a batch is either fully
//!   committed or the next writer finds the log untouched.

use std::collections::BTreeMap;
use std::sync::Arc;

use ledger::{HistorySource, Ledger, LedgerError, Transaction};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::types::{LotView, PositionView};

/// Single-ledger portfolio backed by a swappable history source.
pub struct Portfolio {
    /// Authoritative, append-only transaction log.
    history: Arc<dyn HistorySource>,
    /// Serializes load -> apply -> append for batch submissions.
    commit: Mutex<()>,
}

impl Portfolio {
    /// Creates a portfolio over the given history source.
    pub fn new(history: Arc<dyn HistorySource>) -> Self {
        Self {
            history,
            commit: Mutex::new(()),
        }
    }

    /// Applies a batch of transactions and commits it.
    ///
    /// # Returns
    /// * `Ok(profit)` - Realized profit of this batch only
    /// * `Err(Validation | InsufficientHoldings | Overflow)` - Nothing was written
    /// * `Err(Persistence)` - Store failed; the append is atomic so nothing
    ///   from the batch is visible either
    ///
    /// An empty batch returns zero without touching the store.
    pub async fn execute_transactions(
        &self,
        batch: Vec<Transaction>,
    ) -> Result<Decimal, LedgerError> {
        if batch.is_empty() {
            return Ok(Decimal::ZERO);
        }
        ledger::validate_batch(&batch)?;

        // Held until the batch is appended
        let _guard = self.commit.lock().await;

        let history = self.history.load_all()?;
        let profit = match ledger::apply(&history, &batch) {
            Ok(profit) => profit,
            Err(e) => {
                warn!(batch_size = batch.len(), error = %e, "batch rejected");
                return Err(e);
            }
        };

        self.history.append_all(&batch)?;
        info!(
            batch_size = batch.len(),
            profit = %profit,
            history_size = history.len() + batch.len(),
            "batch committed"
        );

        Ok(profit)
    }

    /// Net shares per stock over the whole log.
    ///
    /// Values may be negative if the log was written without going through
    /// `execute_transactions`.
    pub async fn current_balances(&self) -> Result<BTreeMap<String, i64>, LedgerError> {
        let history = self.history.load_all()?;
        Ok(ledger::derive_balances(&history))
    }

    /// Open FIFO lots per stock, oldest lot first, stocks ordered by id.
    pub async fn open_positions(&self) -> Result<Vec<PositionView>, LedgerError> {
        let history = self.history.load_all()?;
        let ledger = Ledger::replay(&history);

        let positions = ledger
            .positions()
            .map(|(stock_id, queue)| PositionView {
                stock_id: stock_id.to_string(),
                open_quantity: queue.open_quantity(),
                lots: queue
                    .iter()
                    .map(|lot| LotView {
                        quantity: lot.quantity,
                        price: lot.price,
                    })
                    .collect(),
            })
            .collect();

        Ok(positions)
    }

    /// Full transaction log in commit order.
    pub async fn history(&self) -> Result<Vec<Transaction>, LedgerError> {
        Ok(self.history.load_all()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger::InMemoryHistory;
    use rust_decimal_macros::dec;

    fn portfolio() -> (Arc<InMemoryHistory>, Portfolio) {
        let history = Arc::new(InMemoryHistory::new());
        let portfolio = Portfolio::new(history.clone());
        (history, portfolio)
    }

    #[tokio::test]
    async fn committed_batches_build_on_each_other() {
        let (history, portfolio) = portfolio();

        let profit = portfolio
            .execute_transactions(vec![
                Transaction::buy("AAPL", dec!(1), 10),
                Transaction::buy("AAPL", dec!(2), 10),
            ])
            .await
            .unwrap();
        assert_eq!(profit, Decimal::ZERO);

        let profit = portfolio
            .execute_transactions(vec![Transaction::sell("AAPL", dec!(3), 15)])
            .await
            .unwrap();
        assert_eq!(profit, dec!(25));
        assert_eq!(history.len(), 3);

        let positions = portfolio.open_positions().await.unwrap();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].open_quantity, 5);
        assert_eq!(positions[0].lots[0].price, dec!(2));
    }

    #[tokio::test]
    async fn rejected_batch_is_not_persisted() {
        let (history, portfolio) = portfolio();
        portfolio
            .execute_transactions(vec![Transaction::buy("AAPL", dec!(1), 5)])
            .await
            .unwrap();

        let err = portfolio
            .execute_transactions(vec![
                Transaction::buy("MSFT", dec!(1), 5),
                Transaction::sell("AAPL", dec!(5), 10),
            ])
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientHoldings { .. }));

        assert_eq!(history.len(), 1);
        let balances = portfolio.current_balances().await.unwrap();
        assert_eq!(balances.get("AAPL"), Some(&5));
        assert!(balances.get("MSFT").is_none());
    }

    #[tokio::test]
    async fn empty_batch_writes_nothing() {
        let (history, portfolio) = portfolio();
        let profit = portfolio.execute_transactions(Vec::new()).await.unwrap();
        assert_eq!(profit, Decimal::ZERO);
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn validation_happens_before_storage() {
        let (history, portfolio) = portfolio();
        let err = portfolio
            .execute_transactions(vec![Transaction::buy("AAPL", dec!(1), 0)])
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
        assert!(history.is_empty());
    }

    /// Many overlapping sells against one lot pool: none may double-spend.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_sells_are_serialized() {
        let (_, portfolio) = portfolio();
        let portfolio = Arc::new(portfolio);
        portfolio
            .execute_transactions(vec![Transaction::buy("AAPL", dec!(1), 10)])
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..25 {
            let portfolio = portfolio.clone();
            handles.push(tokio::spawn(async move {
                portfolio
                    .execute_transactions(vec![Transaction::sell("AAPL", dec!(2), 1)])
                    .await
            }));
        }

        let mut filled = 0;
        let mut total = Decimal::ZERO;
        for handle in handles {
            if let Ok(profit) = handle.await.unwrap() {
                filled += 1;
                total += profit;
            }
        }

        assert_eq!(filled, 10);
        assert_eq!(total, dec!(10));
        let balances = portfolio.current_balances().await.unwrap();
        assert_eq!(balances.get("AAPL"), Some(&0));
    }
}
