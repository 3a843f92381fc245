//! Basic screening example.
//!
//! Builds a small snapshot by hand, screens it with the default thresholds
//! and again with the beta filter enabled.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use vol_screener::core::config::ScreenConfig;
use vol_screener::core::record::{InstrumentMetricRecord, MetricSnapshot};
use vol_screener::screening::engine::ScreeningEngine;

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║    vol-screener: Basic Screen Example    ║");
    println!("╚══════════════════════════════════════════╝\n");

    let asof = NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date");

    let mut snapshot = MetricSnapshot::new();
    snapshot.add(
        InstrumentMetricRecord::new("AMD", asof)
            .with_last_price(dec!(178.40))
            .with_iv_rank(dec!(0.64))
            .with_iv_percentile(dec!(0.82))
            .with_iv_hv_spread(dec!(6.1))
            .with_liquidity_rating(dec!(5))
            .with_beta(dec!(1.9))
            .with_earnings_date(NaiveDate::from_ymd_opt(2024, 4, 30).expect("valid date")),
    );
    snapshot.add(
        InstrumentMetricRecord::new("MU", asof)
            .with_last_price(dec!(92.15))
            .with_iv_rank(dec!(0.71))
            .with_iv_percentile(dec!(0.88))
            .with_iv_hv_spread(dec!(3.4))
            .with_liquidity_rating(dec!(4))
            .with_beta(dec!(1.3))
            .with_earnings_date(NaiveDate::from_ymd_opt(2024, 3, 20).expect("valid date")),
    );
    snapshot.add(
        InstrumentMetricRecord::new("KO", asof)
            .with_last_price(dec!(60.02))
            .with_iv_rank(dec!(0.22))
            .with_iv_percentile(dec!(0.31))
            .with_iv_hv_spread(dec!(-0.8))
            .with_liquidity_rating(dec!(4))
            .with_beta(dec!(0.6)),
    );
    snapshot.add(
        InstrumentMetricRecord::new("PENNY", asof)
            .with_last_price(dec!(3.10))
            .with_iv_rank(dec!(0.95))
            .with_iv_percentile(dec!(0.97))
            .with_liquidity_rating(dec!(1.5))
            .with_beta(dec!(2.8)),
    );

    println!("━━━ Default thresholds ━━━\n");
    let engine = ScreeningEngine::new(ScreenConfig::default()).expect("default config is valid");
    match engine.screen(snapshot.records()) {
        Ok(report) => println!("{}", report),
        Err(e) => eprintln!("Error: {}", e),
    }

    println!("━━━ With |beta| < 1.5 ━━━\n");
    let engine = ScreeningEngine::new(ScreenConfig::default().with_max_abs_beta(dec!(1.5)))
        .expect("beta bound is valid");
    match engine.screen(snapshot.records()) {
        Ok(report) => println!("{}", report),
        Err(e) => eprintln!("Error: {}", e),
    }
}
