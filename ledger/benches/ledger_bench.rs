use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ledger::{apply, derive_balances, Ledger, LotQueue, Lot, Transaction};
use rust_decimal::Decimal;

const STOCKS: [&str; 5] = ["AAPL", "TSLA", "MSFT", "NVDA", "GOOGL"];

/// Log of buys with a sell after every fourth one, never overselling.
fn build_history(len: usize) -> Vec<Transaction> {
    let mut history = Vec::with_capacity(len);
    for i in 0..len {
        let stock = STOCKS[i % STOCKS.len()];
        let price = Decimal::new(10_000 + (i % 500) as i64, 2);
        if i % 4 == 3 {
            history.push(Transaction::sell(stock, price, 50));
        } else {
            history.push(Transaction::buy(stock, price, 100));
        }
    }
    history
}

fn bench_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("replay");

    for &len in [100, 1_000, 10_000].iter() {
        let history = build_history(len);
        group.bench_with_input(BenchmarkId::new("history", len), &history, |b, history| {
            b.iter(|| black_box(Ledger::replay(history)))
        });
    }

    group.finish();
}

fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply");

    for &len in [100, 1_000, 10_000].iter() {
        let history = build_history(len);
        // One sale deep enough to walk several lots
        let batch = vec![Transaction::sell("AAPL", Decimal::new(12_000, 2), 250)];

        group.bench_with_input(BenchmarkId::new("single_sell", len), &history, |b, history| {
            b.iter(|| black_box(apply(history, &batch)))
        });
    }

    group.finish();
}

fn bench_derive_balances(c: &mut Criterion) {
    let mut group = c.benchmark_group("balances");

    for &len in [1_000, 10_000].iter() {
        let history = build_history(len);
        group.bench_with_input(BenchmarkId::new("derive", len), &history, |b, history| {
            b.iter(|| black_box(derive_balances(history)))
        });
    }

    group.finish();
}

fn bench_lot_queue(c: &mut Criterion) {
    let mut group = c.benchmark_group("lot_queue");

    for &lots in [10, 100, 1_000].iter() {
        group.bench_with_input(BenchmarkId::new("drain", lots), &lots, |b, &lots| {
            b.iter_batched(
                || {
                    let mut q = LotQueue::new();
                    for i in 0..lots {
                        q.push(Lot {
                            stock_id: "AAPL".into(),
                            quantity: 100,
                            price: Decimal::new(10_000 + i as i64, 2),
                        })
                        .unwrap();
                    }
                    q
                },
                |mut q| black_box(q.consume((lots * 100) as i64, Decimal::new(11_000, 2))),
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_replay,
    bench_apply,
    bench_derive_balances,
    bench_lot_queue
);
criterion_main!(benches);
