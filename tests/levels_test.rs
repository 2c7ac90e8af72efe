//! Support/resistance property tests over seeded random walks.

mod common;

use common::{ascending_series, random_walk, series_from_closes};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tradesignal::config::LevelConfig;
use tradesignal::{detect_levels, PivotLevelDetector};

#[test]
fn test_levels_bracket_current_price() {
    let config = LevelConfig::default();
    for seed in 0..200 {
        let len = 1 + (seed as usize * 7) % 120;
        let series = random_walk(seed, len);
        let levels = detect_levels(&series, &config);
        let price = series.current_price();

        assert_eq!(levels.current_price, price);
        assert!(levels.support.len() <= config.max_levels);
        assert!(levels.resistance.len() <= config.max_levels);
        for &s in &levels.support {
            assert!(s < price, "seed {}: support {} >= price {}", seed, s, price);
        }
        for &r in &levels.resistance {
            assert!(r > price, "seed {}: resistance {} <= price {}", seed, r, price);
        }
        // nearest first
        assert!(levels.support.windows(2).all(|w| w[0] > w[1]));
        assert!(levels.resistance.windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn test_clustering_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..200 {
        let count = rng.gen_range(0..40);
        let raw: Vec<f64> = (0..count).map(|_| rng.gen_range(10.0..200.0)).collect();

        let once = PivotLevelDetector::cluster_levels(&raw, 0.02);
        let twice = PivotLevelDetector::cluster_levels(&once, 0.02);
        assert_eq!(once, twice);
    }
}

#[test]
fn test_short_series_has_no_pivots() {
    // Fewer than 2w + 1 bars: no pivots, and too short for either average.
    let series = series_from_closes(&[100.0, 104.0, 98.0, 103.0, 99.0, 101.0, 97.0, 102.0, 100.0, 99.5]);
    let levels = detect_levels(&series, &LevelConfig::default());
    assert!(levels.support.is_empty());
    assert!(levels.resistance.is_empty());
}

#[test]
fn test_lookback_limits_the_window() {
    // An old spike outside the lookback must not become resistance.
    let mut closes: Vec<f64> = vec![100.0; 30];
    closes[5] = 180.0;
    closes.extend((0..60).map(|i| 100.0 + (i % 10) as f64));
    let series = series_from_closes(&closes);

    let levels = detect_levels(&series, &LevelConfig::default());
    assert!(levels.resistance.iter().all(|&r| r < 150.0));
}

#[test]
fn test_monotonic_series_levels() {
    let series = ascending_series(60);
    let levels = PivotLevelDetector::default().detect(&series);
    assert!(levels.resistance.is_empty());
    // SMA20 and SMA50 of the window are both below the latest close.
    assert_eq!(levels.support.len(), 2);
}
