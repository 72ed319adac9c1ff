//! HTTP portfolio service over the FIFO ledger.
//!
//! Records buy/sell batches, reports realized profit per batch and derives
//! share balances and open lots from the committed log.

pub mod api;
pub mod config;
pub mod error;
pub mod portfolio;
pub mod storage;
pub mod types;

use std::sync::Arc;

use ledger::{HistorySource, InMemoryHistory};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::portfolio::Portfolio;
use crate::storage::SqliteHistory;

#[derive(Clone)]
pub struct AppState {
    pub portfolio: Arc<Portfolio>,
}

/// `RUST_LOG` wins; otherwise the configured level applies.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Opens the configured history source and wires the portfolio on top.
pub fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let history: Arc<dyn HistorySource> = if config.uses_memory_history() {
        info!("Using in-memory transaction history");
        Arc::new(InMemoryHistory::new())
    } else {
        info!("Opening transaction history at {}", config.database_path);
        storage::init(&config.database_path)?;
        let pool = storage::create_pool(&config.database_path)?;
        storage::run_migrations(&pool)?;
        Arc::new(SqliteHistory::new(pool))
    };

    Ok(AppState {
        portfolio: Arc::new(Portfolio::new(history)),
    })
}
