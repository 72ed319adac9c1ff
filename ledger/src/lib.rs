//! FIFO cost-basis ledger for stock transactions.
//!
//! Core features:
//! - Per-stock FIFO lot queues rebuilt from the committed transaction log
//! - Realized profit per batch, all-or-nothing when a sale oversells
//! - Net share balances derived from the full log
//!
//! The engine holds no state between calls. Callers load the history,
//! call [`apply`] or [`derive_balances`], and persist the batch themselves.

pub mod error;
pub mod history;
pub mod lot_queue;
pub mod types;

pub use error::{LedgerError, PersistenceError};
pub use history::{HistorySource, InMemoryHistory};
pub use lot_queue::{Fill, LotQueue};
pub use types::{Lot, Transaction, TransactionKind};

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::warn;

/// Open lots for every stock, keyed by stock id.
///
/// Derived state only: rebuild it from the history for each request.
/// Holds no locks; callers serialize apply, see the service crate.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    /// FIFO lot queue per stock, empty queues are dropped
    queues: BTreeMap<String, LotQueue>,
}

impl Ledger {
    /// Creates a ledger with no open lots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds open lots from committed history.
    ///
    /// Profit realized by historical sales was counted when they were applied
    /// and is discarded here. A historical sale that oversells is matched as
    /// far as lots allow and the rest is logged and ignored.
    pub fn replay(history: &[Transaction]) -> Self {
        let mut ledger = Self::new();

        for tx in history {
            match tx.kind {
                TransactionKind::Buy => {
                    if let Err(e) = ledger.queue_mut(&tx.stock_id).push(Lot::from(tx)) {
                        warn!(error = %e, quantity = tx.quantity, "history lot skipped");
                    }
                }
                TransactionKind::Sell => {
                    let matched = ledger.consume(&tx.stock_id, tx.quantity, tx.price).matched;
                    if matched < tx.quantity {
                        warn!(
                            stock_id = %tx.stock_id,
                            unmatched = tx.quantity - matched,
                            "history sells more shares than it holds"
                        );
                    }
                }
            }
        }

        ledger
    }

    /// Applies a batch in order and returns the batch's total realized profit.
    ///
    /// Runs against a staged copy which only replaces `self` once every
    /// transaction went through: a failing batch leaves no trace.
    pub fn apply_batch(&mut self, batch: &[Transaction]) -> Result<Decimal, LedgerError> {
        validate_batch(batch)?;

        let mut staged = self.clone();
        let mut total = Decimal::ZERO;

        for tx in batch {
            let profit = staged.execute(tx)?;
            total = total
                .checked_add(profit)
                .ok_or_else(|| LedgerError::Overflow {
                    stock_id: tx.stock_id.clone(),
                })?;
        }

        *self = staged;
        Ok(total)
    }

    /// Open lots for a stock, oldest first.
    pub fn lots(&self, stock_id: &str) -> Option<&LotQueue> {
        self.queues.get(stock_id)
    }

    /// Shares still open for a stock, zero if none.
    pub fn open_quantity(&self, stock_id: &str) -> i64 {
        self.queues
            .get(stock_id)
            .map(|q| q.open_quantity())
            .unwrap_or(0)
    }

    /// Every stock with open lots, ordered by stock id.
    pub fn positions(&self) -> impl Iterator<Item = (&str, &LotQueue)> {
        self.queues.iter().map(|(id, q)| (id.as_str(), q))
    }

    /// Applies one validated transaction, returns its profit (zero for buys).
    ///
    /// A sale larger than the open quantity fails before any lot is consumed.
    fn execute(&mut self, tx: &Transaction) -> Result<Decimal, LedgerError> {
        match tx.kind {
            TransactionKind::Buy => {
                self.queue_mut(&tx.stock_id).push(Lot::from(tx))?;
                Ok(Decimal::ZERO)
            }
            TransactionKind::Sell => {
                let held = self.open_quantity(&tx.stock_id);
                if held < tx.quantity {
                    return Err(LedgerError::InsufficientHoldings {
                        stock_id: tx.stock_id.clone(),
                        held,
                        shortfall: tx.quantity - held,
                    });
                }
                self.consume(&tx.stock_id, tx.quantity, tx.price)
                    .profit
                    .ok_or_else(|| LedgerError::Overflow {
                        stock_id: tx.stock_id.clone(),
                    })
            }
        }
    }

    fn queue_mut(&mut self, stock_id: &str) -> &mut LotQueue {
        self.queues.entry(stock_id.to_string()).or_default()
    }

    fn consume(&mut self, stock_id: &str, quantity: i64, price: Decimal) -> Fill {
        let Some(queue) = self.queues.get_mut(stock_id) else {
            return Fill {
                matched: 0,
                profit: Some(Decimal::ZERO),
            };
        };

        let fill = queue.consume(quantity, price);
        if queue.is_empty() {
            self.queues.remove(stock_id);
        }
        fill
    }
}

/// Checks every transaction of a batch, reporting the first bad one by position.
pub fn validate_batch(batch: &[Transaction]) -> Result<(), LedgerError> {
    for (index, tx) in batch.iter().enumerate() {
        if let Err(LedgerError::Validation(reason)) = tx.validate() {
            return Err(LedgerError::Validation(format!(
                "#{} in batch: {}",
                index, reason
            )));
        }
    }
    Ok(())
}

/// Replays `history`, applies `batch` on top and returns the batch's realized profit.
///
/// Nothing is persisted here; on success the caller appends `batch` to the log,
/// on error it must append nothing.
pub fn apply(history: &[Transaction], batch: &[Transaction]) -> Result<Decimal, LedgerError> {
    Ledger::replay(history).apply_batch(batch)
}

/// Net shares per stock: +quantity per buy, -quantity per sell.
///
/// Never fails. A log that was not written through [`apply`] may yield
/// negative balances, which are reported as-is; sums clamp at the `i64` bounds.
pub fn derive_balances(history: &[Transaction]) -> BTreeMap<String, i64> {
    let mut balances = BTreeMap::new();
    for tx in history {
        let balance = balances.entry(tx.stock_id.clone()).or_insert(0i64);
        *balance = balance.saturating_add(tx.signed_quantity());
    }
    balances
}
