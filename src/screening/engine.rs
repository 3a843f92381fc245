use crate::core::config::{MissingFieldPolicy, ScreenConfig};
use crate::core::error::{RequiredField, ScreenError};
use crate::core::record::InstrumentMetricRecord;
use crate::core::symbol::Symbol;
use crate::screening::earnings::EarningsStatus;
use crate::screening::filter::failed_clauses;
use crate::screening::report::{ScreenReport, ScreenStats};
use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

/// A record that survived the screen, with its earnings classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenResult {
    pub symbol: Symbol,
    pub last_price: Decimal,
    pub iv_rank: Decimal,
    pub iv_percentile: Decimal,
    pub iv_hv_spread: Option<Decimal>,
    pub liquidity_rating: Decimal,
    pub beta: Option<Decimal>,
    pub earnings_date: Option<NaiveDate>,
    pub snapshot_date: NaiveDate,
    pub earnings_status: EarningsStatus,
}

impl ScreenResult {
    /// Map back to the feed's row shape, dropping the derived status.
    pub fn to_record(&self) -> InstrumentMetricRecord {
        let mut record = InstrumentMetricRecord::new(self.symbol.clone(), self.snapshot_date)
            .with_last_price(self.last_price)
            .with_iv_rank(self.iv_rank)
            .with_iv_percentile(self.iv_percentile)
            .with_liquidity_rating(self.liquidity_rating);
        if let Some(spread) = self.iv_hv_spread {
            record = record.with_iv_hv_spread(spread);
        }
        if let Some(beta) = self.beta {
            record = record.with_beta(beta);
        }
        if let Some(date) = self.earnings_date {
            record = record.with_earnings_date(date);
        }
        record
    }

    /// Whether `self` ranks ahead of or level with `other`.
    pub fn ranks_at_least(&self, other: &ScreenResult) -> bool {
        rank_order(self, other) != Ordering::Greater
    }
}

/// IV rank descending, then liquidity rating descending.
fn rank_order(a: &ScreenResult, b: &ScreenResult) -> Ordering {
    b.iv_rank
        .cmp(&a.iv_rank)
        .then_with(|| b.liquidity_rating.cmp(&a.liquidity_rating))
}

/// The screening engine.
///
/// Holds a validated config and nothing else; a single engine can screen any
/// number of snapshots, from any number of threads.
///
/// # Algorithm
///
/// 1. Evaluate the filter predicate on every record.
/// 2. Drop records that fail any enabled clause.
/// 3. Collapse rows that are equal in every field, keeping the first.
/// 4. Classify earnings timing against each row's snapshot date.
/// 5. Stable-sort by IV rank then liquidity rating, both descending.
#[derive(Debug, Clone)]
pub struct ScreeningEngine {
    config: ScreenConfig,
}

impl ScreeningEngine {
    /// Create an engine, rejecting an invalid config up front.
    pub fn new(config: ScreenConfig) -> Result<Self, ScreenError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    /// Screen one snapshot and report per-stage statistics.
    pub fn screen(&self, records: &[InstrumentMetricRecord]) -> Result<ScreenReport, ScreenError> {
        let mut stats = ScreenStats {
            input_count: records.len(),
            ..Default::default()
        };

        let mut survivors = Vec::new();
        for record in records {
            let failed = match failed_clauses(record, &self.config) {
                Ok(failed) => failed,
                Err(err) => match self.config.on_missing_field {
                    MissingFieldPolicy::RejectBatch => return Err(err),
                    MissingFieldPolicy::SkipRecord => {
                        warn!("skipping record: {}", err);
                        stats.skipped_missing += 1;
                        continue;
                    }
                },
            };
            if failed.is_empty() {
                survivors.push(record);
            } else {
                stats.rejected += 1;
                for clause in failed {
                    *stats.rejections_by_clause.entry(clause).or_insert(0) += 1;
                }
            }
        }

        let mut seen = HashSet::new();
        let before_dedup = survivors.len();
        survivors.retain(|record| seen.insert(*record));
        stats.duplicates_removed = before_dedup - survivors.len();

        let mut results = survivors
            .into_iter()
            .map(|record| self.to_result(record))
            .collect::<Result<Vec<_>, _>>()?;
        // sort_by is stable: exact ties keep input order.
        results.sort_by(rank_order);
        stats.passed = results.len();

        debug!(
            "screened {} records: {} passed, {} rejected, {} skipped, {} duplicates",
            stats.input_count,
            stats.passed,
            stats.rejected,
            stats.skipped_missing,
            stats.duplicates_removed
        );

        Ok(ScreenReport { results, stats })
    }

    fn to_result(&self, record: &InstrumentMetricRecord) -> Result<ScreenResult, ScreenError> {
        Ok(ScreenResult {
            symbol: record.symbol().clone(),
            last_price: record.require(RequiredField::LastPrice)?,
            iv_rank: record.require(RequiredField::IvRank)?,
            iv_percentile: record.require(RequiredField::IvPercentile)?,
            iv_hv_spread: record.iv_hv_spread(),
            liquidity_rating: record.require(RequiredField::LiquidityRating)?,
            beta: record.beta(),
            earnings_date: record.earnings_date(),
            snapshot_date: record.snapshot_date(),
            earnings_status: EarningsStatus::classify(
                record.snapshot_date(),
                record.earnings_date(),
                self.config.earnings_avoid_window_days,
            ),
        })
    }
}

/// Screen `records` under `config`, returning ranked candidates.
///
/// # Examples
///
/// ```
/// use vol_screener::core::config::ScreenConfig;
/// use vol_screener::core::record::InstrumentMetricRecord;
/// use vol_screener::screening::earnings::EarningsStatus;
/// use vol_screener::screening::engine::screen;
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
///
/// let asof = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let record = InstrumentMetricRecord::new("XYZ", asof)
///     .with_last_price(dec!(12))
///     .with_iv_rank(dec!(0.60))
///     .with_iv_percentile(dec!(0.80))
///     .with_liquidity_rating(dec!(4.0))
///     .with_earnings_date(NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
///
/// let results = screen(&[record], &ScreenConfig::default()).unwrap();
/// assert_eq!(results.len(), 1);
/// assert_eq!(results[0].earnings_status, EarningsStatus::Avoid);
/// ```
pub fn screen(
    records: &[InstrumentMetricRecord],
    config: &ScreenConfig,
) -> Result<Vec<ScreenResult>, ScreenError> {
    let engine = ScreeningEngine::new(config.clone())?;
    Ok(engine.screen(records)?.results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::filter::FilterClause;
    use rust_decimal_macros::dec;

    fn asof() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn candidate(symbol: &str, iv_rank: Decimal, liquidity: Decimal) -> InstrumentMetricRecord {
        InstrumentMetricRecord::new(symbol, asof())
            .with_last_price(dec!(50))
            .with_iv_rank(iv_rank)
            .with_iv_percentile(dec!(0.90))
            .with_liquidity_rating(liquidity)
    }

    fn symbols(results: &[ScreenResult]) -> Vec<&str> {
        results.iter().map(|r| r.symbol.as_str()).collect()
    }

    #[test]
    fn test_empty_input() {
        let engine = ScreeningEngine::new(ScreenConfig::default()).unwrap();
        let report = engine.screen(&[]).unwrap();
        assert!(report.results.is_empty());
        assert_eq!(report.stats.input_count, 0);
    }

    #[test]
    fn test_ranking_two_keys() {
        let records = vec![
            candidate("LOW", dec!(0.55), dec!(5)),
            candidate("HIGH_THIN", dec!(0.90), dec!(3)),
            candidate("HIGH_DEEP", dec!(0.90), dec!(4.5)),
            candidate("MID", dec!(0.70), dec!(4)),
        ];
        let results = screen(&records, &ScreenConfig::default()).unwrap();
        assert_eq!(symbols(&results), vec!["HIGH_DEEP", "HIGH_THIN", "MID", "LOW"]);
    }

    #[test]
    fn test_exact_ties_keep_input_order() {
        let records = vec![
            candidate("B", dec!(0.8), dec!(4)),
            candidate("A", dec!(0.8), dec!(4)),
            candidate("C", dec!(0.8), dec!(4)),
        ];
        let results = screen(&records, &ScreenConfig::default()).unwrap();
        assert_eq!(symbols(&results), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_distinct_rows_not_distinct_symbols() {
        let records = vec![
            candidate("DUP", dec!(0.8), dec!(4)),
            candidate("DUP", dec!(0.8), dec!(4)),
            candidate("DUP", dec!(0.8), dec!(4)).with_beta(dec!(1.2)),
        ];
        let engine = ScreeningEngine::new(ScreenConfig::default()).unwrap();
        let report = engine.screen(&records).unwrap();
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.stats.duplicates_removed, 1);
        assert_eq!(report.results[0].beta, None);
        assert_eq!(report.results[1].beta, Some(dec!(1.2)));
    }

    #[test]
    fn test_reject_batch_on_missing_field() {
        let records = vec![
            candidate("OK", dec!(0.8), dec!(4)),
            InstrumentMetricRecord::new("HOLE", asof()).with_iv_rank(dec!(0.9)),
        ];
        let err = screen(&records, &ScreenConfig::default()).unwrap_err();
        assert_eq!(
            err,
            ScreenError::MissingRequiredField {
                symbol: Symbol::new("HOLE"),
                field: RequiredField::LiquidityRating,
            }
        );
    }

    #[test]
    fn test_skip_record_on_missing_field() {
        let records = vec![
            InstrumentMetricRecord::new("HOLE", asof()).with_iv_rank(dec!(0.9)),
            candidate("OK", dec!(0.8), dec!(4)),
        ];
        let config =
            ScreenConfig::default().with_missing_field_policy(MissingFieldPolicy::SkipRecord);
        let report = ScreeningEngine::new(config).unwrap().screen(&records).unwrap();
        assert_eq!(symbols(&report.results), vec!["OK"]);
        assert_eq!(report.stats.skipped_missing, 1);
    }

    #[test]
    fn test_beta_filter_drops_rows_without_beta() {
        let records = vec![
            candidate("AAA", dec!(0.8), dec!(4)).with_beta(dec!(1.1)),
            candidate("NOB", dec!(0.9), dec!(4)),
        ];
        let config = ScreenConfig::default().with_max_abs_beta(dec!(1.5));
        let report = ScreeningEngine::new(config).unwrap().screen(&records).unwrap();
        assert_eq!(symbols(&report.results), vec!["AAA"]);
        assert_eq!(report.stats.rejected, 1);
        assert_eq!(report.stats.skipped_missing, 0);
        assert_eq!(report.stats.rejections_by_clause[&FilterClause::MaxAbsBeta], 1);
    }

    #[test]
    fn test_invalid_config_rejected_before_screening() {
        let config = ScreenConfig {
            min_iv_rank: dec!(-0.1),
            ..Default::default()
        };
        assert!(matches!(
            screen(&[], &config),
            Err(ScreenError::InvalidConfig { field: "min_iv_rank", .. })
        ));
    }

    #[test]
    fn test_rejection_tally_counts_each_clause() {
        let records = vec![
            candidate("CHEAP", dec!(0.8), dec!(4)).with_last_price(dec!(5)),
            candidate("QUIET", dec!(0.2), dec!(1)),
        ];
        let report = ScreeningEngine::new(ScreenConfig::default())
            .unwrap()
            .screen(&records)
            .unwrap();
        assert!(report.results.is_empty());
        assert_eq!(report.stats.rejected, 2);
        assert_eq!(report.stats.rejections_by_clause[&FilterClause::MinPrice], 1);
        assert_eq!(report.stats.rejections_by_clause[&FilterClause::IvRank], 1);
        assert_eq!(report.stats.rejections_by_clause[&FilterClause::LiquidityRating], 1);
    }

    #[test]
    fn test_custom_earnings_window() {
        let record = candidate("ERN", dec!(0.8), dec!(4))
            .with_earnings_date(NaiveDate::from_ymd_opt(2024, 3, 20).unwrap());
        let narrow = ScreenConfig::default().with_earnings_window_days(10);
        let results = screen(&[record.clone()], &narrow).unwrap();
        assert_eq!(results[0].earnings_status, EarningsStatus::Clear);

        let results = screen(&[record], &ScreenConfig::default()).unwrap();
        assert_eq!(results[0].earnings_status, EarningsStatus::Avoid);
    }

    #[test]
    fn test_to_record_round_trips_fields() {
        let record = candidate("RT", dec!(0.8), dec!(4))
            .with_beta(dec!(0.9))
            .with_iv_hv_spread(dec!(-2.5));
        let results = screen(&[record.clone()], &ScreenConfig::default()).unwrap();
        assert_eq!(results[0].to_record(), record);
    }
}
