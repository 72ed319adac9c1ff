//! Replay cost measurements for the ledger engine.
//!
//! Every apply rebuilds lot queues from the full history, so request latency
//! grows with the log. These tests show how fast:
//! - Replay of histories of increasing length
//! - Apply of a single sale on top of those histories
//! - Balance derivation over the same logs

use ledger::{apply, derive_balances, Ledger, Transaction};
use rust_decimal::Decimal;
use std::time::Instant;

const STOCKS: [&str; 5] = ["AAPL", "TSLA", "MSFT", "NVDA", "GOOGL"];
const HISTORY_SIZES: [usize; 4] = [100, 1_000, 10_000, 100_000];

/// Runs complete replay cost suite.
pub fn run_replay_tests() {
    println!(" Stockfolio - Replay Cost Tests\n");

    test_replay_latency();
    test_apply_latency();
    test_balance_latency();
}

/// Builds a log that never oversells: three buys of 100 then a sell of 50.
fn build_history(len: usize) -> Vec<Transaction> {
    (0..len)
        .map(|i| {
            let stock = STOCKS[i % STOCKS.len()];
            let price = Decimal::new(10_000 + (i % 500) as i64, 2);
            if i % 4 == 3 {
                Transaction::sell(stock, price, 50)
            } else {
                Transaction::buy(stock, price, 100)
            }
        })
        .collect()
}

fn iterations_for(len: usize) -> u32 {
    match len {
        0..=1_000 => 1_000,
        1_001..=10_000 => 100,
        _ => 10,
    }
}

/// Tests lot queue reconstruction time.
fn test_replay_latency() {
    println!(" Replay Latency Test");

    for len in HISTORY_SIZES {
        let history = build_history(len);
        let iterations = iterations_for(len);

        let start = Instant::now();
        for _ in 0..iterations {
            std::hint::black_box(Ledger::replay(&history));
        }
        let per_call = start.elapsed() / iterations;

        println!(
            "  {:>7} transactions: {:>10.2} us/replay ({:.1} ns/transaction)",
            len,
            per_call.as_nanos() as f64 / 1_000.0,
            per_call.as_nanos() as f64 / len as f64
        );
    }
    println!();
}

/// Tests full apply (replay + one sale) against growing histories.
fn test_apply_latency() {
    println!(" Apply Latency Test (one sell per batch)");

    let batch = vec![Transaction::sell("AAPL", Decimal::new(12_000, 2), 250)];

    for len in HISTORY_SIZES {
        let history = build_history(len);
        let iterations = iterations_for(len);

        let mut failures = 0u32;
        let start = Instant::now();
        for _ in 0..iterations {
            if std::hint::black_box(apply(&history, &batch)).is_err() {
                failures += 1;
            }
        }
        let per_call = start.elapsed() / iterations;

        println!(
            "  {:>7} transactions: {:>10.2} us/apply{}",
            len,
            per_call.as_nanos() as f64 / 1_000.0,
            if failures > 0 { " (oversold)" } else { "" }
        );
    }
    println!();
}

/// Tests balance derivation over the same logs.
fn test_balance_latency() {
    println!(" Balance Derivation Test");

    for len in HISTORY_SIZES {
        let history = build_history(len);
        let iterations = iterations_for(len);

        let start = Instant::now();
        for _ in 0..iterations {
            std::hint::black_box(derive_balances(&history));
        }
        let per_call = start.elapsed() / iterations;

        println!(
            "  {:>7} transactions: {:>10.2} us/derive",
            len,
            per_call.as_nanos() as f64 / 1_000.0
        );
    }
    println!();
}
