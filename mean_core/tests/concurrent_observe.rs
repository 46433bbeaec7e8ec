//! Concurrent callers on a shared aggregator must reproduce the sequential
//! per-symbol results.

use std::num::NonZeroUsize;
use std::sync::{Arc, Barrier};
use std::thread;

use chrono::{DateTime, TimeZone, Utc};
use mean_core::{Aggregator, Means};
use rstest::*;

#[fixture]
fn ts() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn series(seed: u64, len: usize) -> Vec<f64> {
    // deterministic positive prices
    (0..len)
        .map(|i| {
            let x = seed
                .wrapping_mul(6364136223846793005)
                .wrapping_add((i as u64).wrapping_mul(1442695040888963407))
                >> 33;
            1.0 + (x % 100_000) as f64 / 7.0
        })
        .collect()
}

fn sequential(prices: &[f64], window: usize, ts: DateTime<Utc>) -> Vec<Means> {
    let aggregator = Aggregator::with_window_size(NonZeroUsize::new(window).unwrap());
    prices
        .iter()
        .map(|&p| aggregator.observe("X", p, ts).unwrap().means())
        .collect()
}

#[rstest]
#[case(1)]
#[case(5)]
#[case(64)]
fn test_two_symbols_interleaved_match_sequential(ts: DateTime<Utc>, #[case] window: usize) {
    let btc = series(1, 2_000);
    let eth = series(2, 2_000);
    let expected_btc = sequential(&btc, window, ts);
    let expected_eth = sequential(&eth, window, ts);

    let aggregator = Arc::new(Aggregator::with_window_size(NonZeroUsize::new(window).unwrap()));
    let barrier = Arc::new(Barrier::new(2));

    let run = |symbol: &'static str, prices: Vec<f64>| {
        let aggregator = Arc::clone(&aggregator);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            prices
                .into_iter()
                .map(|p| aggregator.observe(symbol, p, ts).unwrap().means())
                .collect::<Vec<_>>()
        })
    };

    let btc_handle = run("BTC", btc);
    let eth_handle = run("ETH", eth);
    let got_btc = btc_handle.join().unwrap();
    let got_eth = eth_handle.join().unwrap();

    assert_eq!(got_btc, expected_btc);
    assert_eq!(got_eth, expected_eth);
    assert_eq!(aggregator.symbol_count(), 2);
}

#[rstest]
fn test_many_symbols_many_threads(ts: DateTime<Utc>) {
    let window = 10;
    let symbols: Vec<String> = (0..32).map(|i| format!("SYM{}", i)).collect();
    let aggregator = Aggregator::with_window_size(NonZeroUsize::new(window).unwrap());

    // one worker per group of symbols, each symbol owned by exactly one worker
    thread::scope(|s| {
        for chunk in symbols.chunks(4) {
            let aggregator = &aggregator;
            s.spawn(move || {
                for round in 0..500 {
                    for (i, symbol) in chunk.iter().enumerate() {
                        let price = 1.0 + ((round * 7 + i * 13) % 97) as f64;
                        aggregator.observe(symbol, price, ts).unwrap();
                    }
                }
            });
        }
    });

    assert_eq!(aggregator.symbol_count(), symbols.len());
    for (idx, symbol) in symbols.iter().enumerate() {
        let i = idx % 4;
        let tail: Vec<f64> = (490..500)
            .map(|round| 1.0 + ((round * 7 + i * 13) % 97) as f64)
            .collect();
        let expected = tail.iter().sum::<f64>() / window as f64;
        let got = aggregator.current(symbol).unwrap().arithmetic;
        assert!((got - expected).abs() < 1e-9, "{}: {} != {}", symbol, got, expected);
    }
}
