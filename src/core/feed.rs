//! JSON snapshot files as exported from the metrics store.
//!
//! A file carries fully joined `records`, or separate `metrics` and `quotes`
//! row sets that are joined with [`MetricSnapshot::combine`], or both.
//!
//! ```json
//! {
//!   "snapshot_date": "2024-03-01",
//!   "records": [
//!     { "symbol": "XYZ", "last_price": "12", "iv_rank": "0.60", "iv_percentile": "0.80",
//!       "liquidity_rating": "4", "beta": "1.1", "earnings_date": "2024-03-11" }
//!   ],
//!   "metrics": [ { "symbol": "MU", "iv_rank": "0.71", "liquidity_rating": "4" } ],
//!   "quotes": [ { "symbol": "MU", "last_price": "92.15" } ]
//! }
//! ```

use crate::core::record::{InstrumentMetricRecord, MetricSnapshot, MetricsRow, QuoteRow};
use crate::core::symbol::Symbol;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from reading or writing a snapshot file.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("row {symbol} has no snapshot_date and the file supplies none")]
    MissingSnapshotDate { symbol: Symbol },
}

/// One joined row; `snapshot_date` may be inherited from the file.
#[derive(Debug, Deserialize)]
struct FeedRecord {
    symbol: Symbol,
    #[serde(default)]
    last_price: Option<Decimal>,
    #[serde(default)]
    iv_rank: Option<Decimal>,
    #[serde(default)]
    iv_percentile: Option<Decimal>,
    #[serde(default)]
    iv_hv_spread: Option<Decimal>,
    #[serde(default)]
    liquidity_rating: Option<Decimal>,
    #[serde(default)]
    beta: Option<Decimal>,
    #[serde(default)]
    earnings_date: Option<NaiveDate>,
    #[serde(default)]
    snapshot_date: Option<NaiveDate>,
}

impl FeedRecord {
    fn into_record(self, snapshot_date: NaiveDate) -> InstrumentMetricRecord {
        let mut record = InstrumentMetricRecord::new(self.symbol, snapshot_date);
        if let Some(v) = self.last_price {
            record = record.with_last_price(v);
        }
        if let Some(v) = self.iv_rank {
            record = record.with_iv_rank(v);
        }
        if let Some(v) = self.iv_percentile {
            record = record.with_iv_percentile(v);
        }
        if let Some(v) = self.iv_hv_spread {
            record = record.with_iv_hv_spread(v);
        }
        if let Some(v) = self.liquidity_rating {
            record = record.with_liquidity_rating(v);
        }
        if let Some(v) = self.beta {
            record = record.with_beta(v);
        }
        if let Some(d) = self.earnings_date {
            record = record.with_earnings_date(d);
        }
        record
    }
}

#[derive(Debug, Deserialize)]
struct FeedFile {
    #[serde(default)]
    snapshot_date: Option<NaiveDate>,
    #[serde(default)]
    records: Vec<FeedRecord>,
    #[serde(default)]
    metrics: Vec<MetricsRow>,
    #[serde(default)]
    quotes: Vec<QuoteRow>,
}

#[derive(Serialize)]
struct FeedOutput<'a> {
    snapshot_date: NaiveDate,
    records: &'a [InstrumentMetricRecord],
}

impl MetricSnapshot {
    /// Parse a snapshot file.
    ///
    /// A row's own `snapshot_date` wins; otherwise `as_of`, otherwise the
    /// file-level `snapshot_date`. Metrics and quote rows carry no date of
    /// their own. A row left without any date is an error.
    pub fn from_feed_json(json: &str, as_of: Option<NaiveDate>) -> Result<Self, FeedError> {
        let file: FeedFile = serde_json::from_str(json)?;
        let file_date = as_of.or(file.snapshot_date);

        let mut snapshot = MetricSnapshot::new();
        for row in file.records {
            let date = row
                .snapshot_date
                .or(file_date)
                .ok_or_else(|| FeedError::MissingSnapshotDate {
                    symbol: row.symbol.clone(),
                })?;
            snapshot.add(row.into_record(date));
        }

        let first_unjoined = file
            .metrics
            .first()
            .map(|m| &m.symbol)
            .or_else(|| file.quotes.first().map(|q| &q.symbol));
        if let Some(symbol) = first_unjoined {
            let date = file_date.ok_or_else(|| FeedError::MissingSnapshotDate {
                symbol: symbol.clone(),
            })?;
            let joined = MetricSnapshot::combine(&file.metrics, &file.quotes, date);
            for record in joined.records() {
                snapshot.add(record.clone());
            }
        }

        Ok(snapshot)
    }

    /// Write the snapshot in the file format `from_feed_json` reads.
    pub fn to_feed_json(&self, snapshot_date: NaiveDate) -> Result<String, FeedError> {
        let output = FeedOutput {
            snapshot_date,
            records: self.records(),
        };
        Ok(serde_json::to_string_pretty(&output)?)
    }
}
