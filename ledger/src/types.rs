use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Buy,
    Sell,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Buy => "buy",
            TransactionKind::Sell => "sell",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(TransactionKind::Buy),
            "sell" => Ok(TransactionKind::Sell),
            other => Err(LedgerError::Validation(format!(
                "unknown transaction type '{}', expected 'buy' or 'sell'",
                other
            ))),
        }
    }
}

/// One committed trade. Position in the log is its only identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "type", alias = "kind")]
    pub kind: TransactionKind,
    #[serde(rename = "stockId", alias = "instrumentId")]
    pub stock_id: String,
    pub price: Decimal, // execution price, not checked for sign
    pub quantity: i64,  // whole shares, must be > 0
}

impl Transaction {
    pub fn buy(stock_id: impl Into<String>, price: Decimal, quantity: i64) -> Self {
        Self {
            kind: TransactionKind::Buy,
            stock_id: stock_id.into(),
            price,
            quantity,
        }
    }

    pub fn sell(stock_id: impl Into<String>, price: Decimal, quantity: i64) -> Self {
        Self {
            kind: TransactionKind::Sell,
            stock_id: stock_id.into(),
            price,
            quantity,
        }
    }

    /// Signed share delta: +quantity for buys, -quantity for sells.
    pub fn signed_quantity(&self) -> i64 {
        match self.kind {
            TransactionKind::Buy => self.quantity,
            TransactionKind::Sell => self.quantity.saturating_neg(),
        }
    }

    /// Rejects input the engine must never treat as a trade.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.stock_id.trim().is_empty() {
            return Err(LedgerError::Validation("stockId must not be empty".into()));
        }
        if self.quantity <= 0 {
            return Err(LedgerError::Validation(format!(
                "quantity must be positive, got {} for stock {}",
                self.quantity, self.stock_id
            )));
        }
        Ok(())
    }
}

/// Shares bought in a single BUY and not yet sold.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lot {
    #[serde(rename = "stockId")]
    pub stock_id: String,
    pub quantity: i64, // remaining, never 0 while queued
    pub price: Decimal,
}

impl From<&Transaction> for Lot {
    fn from(tx: &Transaction) -> Self {
        Self {
            stock_id: tx.stock_id.clone(),
            quantity: tx.quantity,
            price: tx.price,
        }
    }
}
