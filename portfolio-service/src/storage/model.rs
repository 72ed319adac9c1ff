//! Database rows for the transaction log.

use std::str::FromStr;

use diesel::prelude::*;
use ledger::{Transaction, TransactionKind};
use rust_decimal::Decimal;

use super::errors::StorageError;

/// A committed row; `id` gives commit order.
#[derive(Queryable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = super::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: i32,
    pub kind: String,
    pub stock_id: String,
    pub price: String, // decimal kept as text, no float rounding on disk
    pub quantity: i64,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = super::schema::transactions)]
pub struct NewTransactionDB {
    pub kind: String,
    pub stock_id: String,
    pub price: String,
    pub quantity: i64,
}

impl From<&Transaction> for NewTransactionDB {
    fn from(tx: &Transaction) -> Self {
        Self {
            kind: tx.kind.as_str().to_string(),
            stock_id: tx.stock_id.clone(),
            price: tx.price.to_string(),
            quantity: tx.quantity,
        }
    }
}

impl TryFrom<TransactionDB> for Transaction {
    type Error = StorageError;

    fn try_from(row: TransactionDB) -> Result<Self, Self::Error> {
        let kind = TransactionKind::from_str(&row.kind).map_err(|e| StorageError::CorruptRow {
            id: row.id,
            reason: e.to_string(),
        })?;
        let price = Decimal::from_str(&row.price).map_err(|e| StorageError::CorruptRow {
            id: row.id,
            reason: format!("price '{}': {}", row.price, e),
        })?;

        Ok(Transaction {
            kind,
            stock_id: row.stock_id,
            price,
            quantity: row.quantity,
        })
    }
}
