//! Random metric snapshots for load testing and demos.
//!
//! Produces feed-shaped records with metrics spread across their usual
//! ranges, so that a default screen passes some and rejects most.

use crate::core::record::{InstrumentMetricRecord, MetricSnapshot};
use crate::core::symbol::Symbol;
use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

/// Configuration for generating a random snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    /// Number of distinct symbols.
    pub symbol_count: usize,
    /// As-of date stamped on every record.
    pub snapshot_date: NaiveDate,
    /// Price range in cents.
    pub price_cents: (i64, i64),
    /// Probability that a symbol has a confirmed earnings date.
    pub earnings_probability: f64,
    /// Earnings dates fall within this many days after the snapshot date.
    pub earnings_horizon_days: u64,
    /// Probability that a record is emitted twice.
    pub duplicate_probability: f64,
    /// Fixed seed for reproducible output.
    pub seed: Option<u64>,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            symbol_count: 100,
            snapshot_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap_or(NaiveDate::MIN),
            price_cents: (100, 50_000),
            earnings_probability: 0.6,
            earnings_horizon_days: 90,
            duplicate_probability: 0.05,
            seed: None,
        }
    }
}

/// Generate a random snapshot.
pub fn generate_random_snapshot(config: &SnapshotConfig) -> MetricSnapshot {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut snapshot = MetricSnapshot::new();

    let (low, high) = config.price_cents;
    let (low, high) = (low.max(0), high.max(low.max(0) + 1));

    for i in 0..config.symbol_count {
        let mut record = InstrumentMetricRecord::new(
            Symbol::new(format!("SYM-{:03}", i)),
            config.snapshot_date,
        )
        .with_last_price(Decimal::new(rng.gen_range(low..high), 2))
        .with_iv_rank(Decimal::new(rng.gen_range(0..=100), 2))
        .with_iv_percentile(Decimal::new(rng.gen_range(0..=100), 2))
        .with_iv_hv_spread(Decimal::new(rng.gen_range(-1500..=1500), 2))
        // Half-point steps on the 0-5 scale.
        .with_liquidity_rating(Decimal::new(rng.gen_range(0..=10) * 5, 1))
        .with_beta(Decimal::new(rng.gen_range(-50..=300), 2));

        if rng.gen_bool(config.earnings_probability.clamp(0.0, 1.0)) {
            let offset = rng.gen_range(0..=config.earnings_horizon_days);
            if let Some(date) = config.snapshot_date.checked_add_days(Days::new(offset)) {
                record = record.with_earnings_date(date);
            }
        }

        if rng.gen_bool(config.duplicate_probability.clamp(0.0, 1.0)) {
            snapshot.add(record.clone());
        }
        snapshot.add(record);
    }

    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ScreenConfig;
    use crate::screening::engine::ScreeningEngine;

    #[test]
    fn test_random_snapshot_generation() {
        let config = SnapshotConfig {
            symbol_count: 50,
            duplicate_probability: 0.0,
            ..Default::default()
        };
        let snapshot = generate_random_snapshot(&config);
        assert_eq!(snapshot.len(), 50);
        assert_eq!(snapshot.symbols().len(), 50);
        for record in snapshot.records() {
            assert_eq!(record.snapshot_date(), config.snapshot_date);
            assert!(record.last_price().is_some());
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let config = SnapshotConfig {
            symbol_count: 20,
            seed: Some(7),
            ..Default::default()
        };
        let a = generate_random_snapshot(&config);
        let b = generate_random_snapshot(&config);
        assert_eq!(a.records(), b.records());
    }

    #[test]
    fn test_duplicates_are_collapsed_by_screen() {
        let config = SnapshotConfig {
            symbol_count: 30,
            duplicate_probability: 1.0,
            seed: Some(11),
            ..Default::default()
        };
        let snapshot = generate_random_snapshot(&config);
        assert_eq!(snapshot.len(), 60);

        let permissive = ScreenConfig {
            min_liquidity_rating: Decimal::ZERO,
            min_iv_rank: Decimal::ZERO,
            min_iv_percentile: Decimal::ZERO,
            min_price: Decimal::ZERO,
            ..Default::default()
        };
        let report = ScreeningEngine::new(permissive)
            .unwrap()
            .screen(snapshot.records())
            .unwrap();
        assert_eq!(report.stats.passed + report.stats.rejected / 2, 30);
        assert_eq!(report.stats.duplicates_removed, report.stats.passed);
    }
}
