use crate::core::error::ScreenError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// What the engine does when a record lacks a field the predicate needs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingFieldPolicy {
    /// Fail the whole call with the first offending record.
    #[default]
    RejectBatch,
    /// Drop the offending record and keep screening.
    SkipRecord,
}

/// Thresholds and toggles for one screening pass.
///
/// Every field has a default, so a partial JSON document deserializes into a
/// complete config.
///
/// # Examples
///
/// ```
/// use vol_screener::core::config::ScreenConfig;
/// use rust_decimal_macros::dec;
///
/// let config: ScreenConfig = serde_json::from_str(r#"{ "max_abs_beta": "1.5" }"#).unwrap();
/// assert_eq!(config.max_abs_beta, Some(dec!(1.5)));
/// assert_eq!(config.min_price, dec!(10));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Inclusive lower bound on `liquidity_rating`.
    pub min_liquidity_rating: Decimal,
    /// Exclusive lower bound on `iv_rank`.
    pub min_iv_rank: Decimal,
    /// Exclusive lower bound on `iv_percentile`.
    pub min_iv_percentile: Decimal,
    /// Inclusive lower bound on `last_price`.
    pub min_price: Decimal,
    /// Exclusive upper bound on `|beta|`. `None` disables the beta filter.
    pub max_abs_beta: Option<Decimal>,
    /// Days after the snapshot date during which an earnings report marks a
    /// candidate as AVOID.
    pub earnings_avoid_window_days: i64,
    pub on_missing_field: MissingFieldPolicy,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            min_liquidity_rating: dec!(3.0),
            min_iv_rank: dec!(0.50),
            min_iv_percentile: dec!(0.75),
            min_price: dec!(10),
            max_abs_beta: None,
            earnings_avoid_window_days: 25,
            on_missing_field: MissingFieldPolicy::RejectBatch,
        }
    }
}

impl ScreenConfig {
    /// Enable the beta filter.
    pub fn with_max_abs_beta(mut self, max_abs_beta: Decimal) -> Self {
        self.max_abs_beta = Some(max_abs_beta);
        self
    }

    pub fn with_missing_field_policy(mut self, policy: MissingFieldPolicy) -> Self {
        self.on_missing_field = policy;
        self
    }

    pub fn with_earnings_window_days(mut self, days: i64) -> Self {
        self.earnings_avoid_window_days = days;
        self
    }

    /// Check every threshold that must be non-negative.
    pub fn validate(&self) -> Result<(), ScreenError> {
        let thresholds = [
            ("min_liquidity_rating", self.min_liquidity_rating),
            ("min_iv_rank", self.min_iv_rank),
            ("min_iv_percentile", self.min_iv_percentile),
            ("min_price", self.min_price),
        ];
        for (field, value) in thresholds {
            non_negative(field, value)?;
        }
        if let Some(max_abs_beta) = self.max_abs_beta {
            non_negative("max_abs_beta", max_abs_beta)?;
        }
        if self.earnings_avoid_window_days < 0 {
            return Err(ScreenError::InvalidConfig {
                field: "earnings_avoid_window_days",
                reason: format!(
                    "must be non-negative, got {}",
                    self.earnings_avoid_window_days
                ),
            });
        }
        Ok(())
    }
}

fn non_negative(field: &'static str, value: Decimal) -> Result<(), ScreenError> {
    if value < Decimal::ZERO {
        return Err(ScreenError::InvalidConfig {
            field,
            reason: format!("must be non-negative, got {}", value),
        });
    }
    Ok(())
}
