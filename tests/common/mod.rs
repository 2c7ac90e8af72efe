//! Shared fixtures for integration tests.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tradesignal::types::{PriceBar, Series, Timeframe};

pub fn bar(i: usize, open: f64, high: f64, low: f64, close: f64, volume: f64) -> PriceBar {
    PriceBar {
        symbol: "BTC".to_string(),
        timestamp: 1_700_000_000_000 + i as i64 * 3_600_000,
        open,
        high,
        low,
        close,
        volume,
        timeframe: Timeframe::OneHour,
    }
}

/// Series with the given closes, a 1-point range around each and flat volume.
pub fn series_from_closes(closes: &[f64]) -> Series {
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| bar(i, c, c + 0.5, c - 0.5, c, 1000.0))
        .collect();
    Series::new(bars).unwrap()
}

pub fn ascending_series(len: usize) -> Series {
    let closes: Vec<f64> = (0..len).map(|i| 100.0 + i as f64).collect();
    series_from_closes(&closes)
}

/// Seeded geometric random walk with ±3% steps and random wicks/volume.
pub fn random_walk(seed: u64, len: usize) -> Series {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut price: f64 = rng.gen_range(20.0..500.0);

    let bars = (0..len)
        .map(|i| {
            let open = price;
            let change: f64 = rng.gen_range(-0.03..0.03);
            price = (price * (1.0 + change)).max(1.0);
            let close = price;
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
            let volume = rng.gen_range(500.0..3000.0);
            bar(i, open, high, low, close, volume)
        })
        .collect();

    Series::new(bars).unwrap()
}
