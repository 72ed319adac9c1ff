//! API types for the REST interface.

use ledger::Transaction;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Batch of transactions to apply, in chronological order.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitTransactionsRequest {
    pub transactions: Vec<Transaction>,
}

/// Outcome of a committed batch.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitTransactionsResponse {
    pub profit: Decimal, // Realized by this batch only
    pub applied: usize,  // Transactions appended to history
}

/// Committed transaction log.
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub transactions: Vec<Transaction>,
}

/// One open purchase lot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotView {
    pub quantity: i64,
    pub price: Decimal,
}

/// Open lots for one stock, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionView {
    pub stock_id: String,
    pub open_quantity: i64,
    pub lots: Vec<LotView>,
}
