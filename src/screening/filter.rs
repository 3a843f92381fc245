use crate::core::config::ScreenConfig;
use crate::core::error::{RequiredField, ScreenError};
use crate::core::record::InstrumentMetricRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One threshold clause of the screening predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterClause {
    /// `liquidity_rating >= min_liquidity_rating`
    LiquidityRating,
    /// `iv_rank > min_iv_rank`
    IvRank,
    /// `iv_percentile > min_iv_percentile`
    IvPercentile,
    /// `last_price >= min_price`
    MinPrice,
    /// `|beta| < max_abs_beta`, only while enabled. A record without a beta fails it.
    MaxAbsBeta,
}

impl fmt::Display for FilterClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterClause::LiquidityRating => "liquidity_rating",
            FilterClause::IvRank => "iv_rank",
            FilterClause::IvPercentile => "iv_percentile",
            FilterClause::MinPrice => "min_price",
            FilterClause::MaxAbsBeta => "max_abs_beta",
        };
        f.write_str(name)
    }
}

/// Evaluate every enabled clause against a record.
///
/// Returns the clauses the record fails; an empty vector means the record
/// passes. All required fields are resolved before any comparison, so a
/// record with a missing field is an error even if another clause would
/// already exclude it. Values outside their conventional range are compared
/// as-is.
pub fn failed_clauses(
    record: &InstrumentMetricRecord,
    config: &ScreenConfig,
) -> Result<Vec<FilterClause>, ScreenError> {
    let liquidity_rating = record.require(RequiredField::LiquidityRating)?;
    let iv_rank = record.require(RequiredField::IvRank)?;
    let iv_percentile = record.require(RequiredField::IvPercentile)?;
    let last_price = record.require(RequiredField::LastPrice)?;

    let mut failed = Vec::new();
    if liquidity_rating < config.min_liquidity_rating {
        failed.push(FilterClause::LiquidityRating);
    }
    if iv_rank <= config.min_iv_rank {
        failed.push(FilterClause::IvRank);
    }
    if iv_percentile <= config.min_iv_percentile {
        failed.push(FilterClause::IvPercentile);
    }
    if last_price < config.min_price {
        failed.push(FilterClause::MinPrice);
    }
    if let Some(max_abs_beta) = config.max_abs_beta {
        let within = record.beta().is_some_and(|beta| beta.abs() < max_abs_beta);
        if !within {
            failed.push(FilterClause::MaxAbsBeta);
        }
    }
    Ok(failed)
}

/// Whether a record satisfies the full screening predicate.
pub fn passes(record: &InstrumentMetricRecord, config: &ScreenConfig) -> Result<bool, ScreenError> {
    Ok(failed_clauses(record, config)?.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::symbol::Symbol;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn asof() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn passing_record() -> InstrumentMetricRecord {
        InstrumentMetricRecord::new("XYZ", asof())
            .with_last_price(dec!(12))
            .with_iv_rank(dec!(0.60))
            .with_iv_percentile(dec!(0.80))
            .with_liquidity_rating(dec!(4.0))
            .with_beta(dec!(1.1))
    }

    #[test]
    fn test_passing_record() {
        let config = ScreenConfig::default();
        assert!(passes(&passing_record(), &config).unwrap());
    }

    #[test]
    fn test_inclusive_bounds() {
        let config = ScreenConfig::default();
        let record = passing_record()
            .with_last_price(dec!(10))
            .with_liquidity_rating(dec!(3.0));
        assert!(passes(&record, &config).unwrap());
    }

    #[test]
    fn test_exclusive_bounds() {
        let config = ScreenConfig::default();
        let record = passing_record()
            .with_iv_rank(dec!(0.50))
            .with_iv_percentile(dec!(0.75));
        assert_eq!(
            failed_clauses(&record, &config).unwrap(),
            vec![FilterClause::IvRank, FilterClause::IvPercentile]
        );
    }

    #[test]
    fn test_price_below_minimum() {
        let record = passing_record().with_last_price(dec!(9.99));
        assert_eq!(
            failed_clauses(&record, &ScreenConfig::default()).unwrap(),
            vec![FilterClause::MinPrice]
        );
    }

    #[test]
    fn test_beta_ignored_while_disabled() {
        let record = passing_record().with_beta(dec!(-7));
        assert!(passes(&record, &ScreenConfig::default()).unwrap());
    }

    #[test]
    fn test_beta_filter_uses_absolute_value() {
        let config = ScreenConfig::default().with_max_abs_beta(dec!(1.5));
        assert!(passes(&passing_record().with_beta(dec!(-1.4)), &config).unwrap());
        assert_eq!(
            failed_clauses(&passing_record().with_beta(dec!(-1.5)), &config).unwrap(),
            vec![FilterClause::MaxAbsBeta]
        );
    }

    #[test]
    fn test_missing_beta_fails_clause_only_when_enabled() {
        let record = InstrumentMetricRecord::new("NOB", asof())
            .with_last_price(dec!(12))
            .with_iv_rank(dec!(0.60))
            .with_iv_percentile(dec!(0.80))
            .with_liquidity_rating(dec!(4.0));
        assert!(passes(&record, &ScreenConfig::default()).unwrap());

        let config = ScreenConfig::default().with_max_abs_beta(dec!(2));
        assert_eq!(
            failed_clauses(&record, &config),
            Ok(vec![FilterClause::MaxAbsBeta])
        );
    }

    #[test]
    fn test_missing_field_errors_even_when_other_clause_fails() {
        let record = InstrumentMetricRecord::new("BAD", asof())
            .with_liquidity_rating(dec!(0))
            .with_iv_rank(dec!(0.9))
            .with_iv_percentile(dec!(0.9));
        assert_eq!(
            passes(&record, &ScreenConfig::default()),
            Err(ScreenError::MissingRequiredField {
                symbol: Symbol::new("BAD"),
                field: RequiredField::LastPrice,
            })
        );
    }

    #[test]
    fn test_out_of_range_values_pass_through() {
        let record = passing_record().with_iv_rank(dec!(1.7));
        assert!(passes(&record, &ScreenConfig::default()).unwrap());
    }
}
