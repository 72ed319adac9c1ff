//! Stockfolio Replay Lab
//!
//! Measures what the per-request history replay costs, then walks through
//! a short FIFO demo showing lots being opened, matched and drained.

use ledger::{apply, derive_balances, Ledger, LedgerError, Transaction};
use rust_decimal::Decimal;

mod replay_lab;

/// Main entry point - runs replay cost tests and demo.
fn main() {
    println!("=== Stockfolio Replay Lab ===");

    replay_lab::run_replay_tests();

    println!("\n=== FIFO Demo ===");
    run_fifo_demo();
}

/// Demonstrates FIFO lot matching and the all-or-nothing batch rule.
fn run_fifo_demo() {
    let mut history: Vec<Transaction> = Vec::new();

    // Two purchases at different prices
    let buys = vec![
        Transaction::buy("AAPL", Decimal::new(100, 0), 10),
        Transaction::buy("AAPL", Decimal::new(200, 0), 10),
    ];
    println!("Buying 10 AAPL @ 100, then 10 AAPL @ 200");
    commit(&mut history, buys);

    // Sale spans both lots: 10 from the first, 5 from the second
    let sale = vec![Transaction::sell("AAPL", Decimal::new(300, 0), 15)];
    println!("Selling 15 AAPL @ 300");
    commit(&mut history, sale);

    let ledger = Ledger::replay(&history);
    for (stock, queue) in ledger.positions() {
        println!("Open lots for {}:", stock);
        for lot in queue.iter() {
            println!("  {} shares @ {}", lot.quantity, lot.price);
        }
    }

    // Oversell: the buy in the same batch must not be committed either
    let oversell = vec![
        Transaction::buy("MSFT", Decimal::new(50, 0), 3),
        Transaction::sell("AAPL", Decimal::new(300, 0), 20),
    ];
    println!("Submitting MSFT buy + oversized AAPL sell");
    commit(&mut history, oversell);

    println!("Final balances: {:?}", derive_balances(&history));
}

fn commit(history: &mut Vec<Transaction>, batch: Vec<Transaction>) {
    match apply(history, &batch) {
        Ok(profit) => {
            println!("  Realized profit: {}", profit);
            history.extend(batch);
        }
        Err(e @ LedgerError::InsufficientHoldings { .. }) => {
            println!("  Rejected: {}", e);
        }
        Err(e) => println!("  Failed: {}", e),
    }
}
