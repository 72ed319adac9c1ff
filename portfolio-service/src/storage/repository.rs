use std::sync::Arc;

use diesel::prelude::*;
use ledger::{HistorySource, PersistenceError, Transaction};

use super::db::DbPool;
use super::errors::{IntoPersistence, StorageError};
use super::model::{NewTransactionDB, TransactionDB};
use super::schema::transactions;

/// Transaction log stored in a SQLite table, commit order = row id order.
pub struct SqliteHistory {
    pool: Arc<DbPool>,
}

impl SqliteHistory {
    pub fn new(pool: Arc<DbPool>) -> Self {
        SqliteHistory { pool }
    }

    fn load_rows(&self) -> Result<Vec<Transaction>, StorageError> {
        let mut conn = self.pool.get()?;
        let rows = transactions::table
            .order(transactions::id.asc())
            .select(TransactionDB::as_select())
            .load::<TransactionDB>(&mut conn)?;

        rows.into_iter().map(Transaction::try_from).collect()
    }

    fn insert_rows(&self, batch: &[Transaction]) -> Result<(), StorageError> {
        let rows: Vec<NewTransactionDB> = batch.iter().map(NewTransactionDB::from).collect();
        let mut conn = self.pool.get()?;

        // BEGIN IMMEDIATE: the whole batch lands or none of it does
        conn.immediate_transaction::<_, StorageError, _>(|c| {
            for row in &rows {
                diesel::insert_into(transactions::table)
                    .values(row)
                    .execute(c)?;
            }
            Ok(())
        })
    }
}

impl HistorySource for SqliteHistory {
    fn load_all(&self) -> Result<Vec<Transaction>, PersistenceError> {
        self.load_rows().into_persistence()
    }

    fn append_all(&self, batch: &[Transaction]) -> Result<(), PersistenceError> {
        if batch.is_empty() {
            return Ok(());
        }
        self.insert_rows(batch).into_persistence()
    }
}
