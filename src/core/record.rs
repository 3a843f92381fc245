use crate::core::error::{RequiredField, ScreenError};
use crate::core::symbol::Symbol;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metrics for one underlying instrument in one evaluation snapshot.
///
/// This is the row shape of the metrics feed. Every metric is optional at the
/// type level because the feed may deliver nulls; the screening engine decides
/// which absences are fatal.
///
/// Equality and hashing cover every field, which is what distinct-row
/// deduplication relies on.
///
/// # Examples
///
/// ```
/// use vol_screener::core::record::InstrumentMetricRecord;
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
///
/// let record = InstrumentMetricRecord::new("XYZ", NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
///     .with_last_price(dec!(12))
///     .with_iv_rank(dec!(0.60));
///
/// assert_eq!(record.iv_rank(), Some(dec!(0.60)));
/// assert_eq!(record.beta(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstrumentMetricRecord {
    symbol: Symbol,
    #[serde(default)]
    last_price: Option<Decimal>,
    /// Implied-volatility rank over the instrument's own history, in [0, 1].
    #[serde(default)]
    iv_rank: Option<Decimal>,
    #[serde(default)]
    iv_percentile: Option<Decimal>,
    /// 30-day implied minus 30-day historical volatility. Signed.
    #[serde(default)]
    iv_hv_spread: Option<Decimal>,
    #[serde(default)]
    liquidity_rating: Option<Decimal>,
    #[serde(default)]
    beta: Option<Decimal>,
    /// Expected report date, if the feed has a confirmed one.
    #[serde(default)]
    earnings_date: Option<NaiveDate>,
    /// The as-of date of this row.
    snapshot_date: NaiveDate,
}

impl InstrumentMetricRecord {
    /// Create a record with no metrics populated.
    pub fn new(symbol: impl Into<Symbol>, snapshot_date: NaiveDate) -> Self {
        Self {
            symbol: symbol.into(),
            last_price: None,
            iv_rank: None,
            iv_percentile: None,
            iv_hv_spread: None,
            liquidity_rating: None,
            beta: None,
            earnings_date: None,
            snapshot_date,
        }
    }

    pub fn with_last_price(mut self, price: Decimal) -> Self {
        self.last_price = Some(price);
        self
    }

    pub fn with_iv_rank(mut self, iv_rank: Decimal) -> Self {
        self.iv_rank = Some(iv_rank);
        self
    }

    pub fn with_iv_percentile(mut self, iv_percentile: Decimal) -> Self {
        self.iv_percentile = Some(iv_percentile);
        self
    }

    pub fn with_iv_hv_spread(mut self, spread: Decimal) -> Self {
        self.iv_hv_spread = Some(spread);
        self
    }

    pub fn with_liquidity_rating(mut self, rating: Decimal) -> Self {
        self.liquidity_rating = Some(rating);
        self
    }

    pub fn with_beta(mut self, beta: Decimal) -> Self {
        self.beta = Some(beta);
        self
    }

    pub fn with_earnings_date(mut self, date: NaiveDate) -> Self {
        self.earnings_date = Some(date);
        self
    }

    // --- Accessors ---

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn last_price(&self) -> Option<Decimal> {
        self.last_price
    }

    pub fn iv_rank(&self) -> Option<Decimal> {
        self.iv_rank
    }

    pub fn iv_percentile(&self) -> Option<Decimal> {
        self.iv_percentile
    }

    pub fn iv_hv_spread(&self) -> Option<Decimal> {
        self.iv_hv_spread
    }

    pub fn liquidity_rating(&self) -> Option<Decimal> {
        self.liquidity_rating
    }

    pub fn beta(&self) -> Option<Decimal> {
        self.beta
    }

    pub fn earnings_date(&self) -> Option<NaiveDate> {
        self.earnings_date
    }

    pub fn snapshot_date(&self) -> NaiveDate {
        self.snapshot_date
    }

    /// Value of a predicate field, or `MissingRequiredField` if the feed left it null.
    pub fn require(&self, field: RequiredField) -> Result<Decimal, ScreenError> {
        let value = match field {
            RequiredField::LastPrice => self.last_price,
            RequiredField::IvRank => self.iv_rank,
            RequiredField::IvPercentile => self.iv_percentile,
            RequiredField::LiquidityRating => self.liquidity_rating,
        };
        value.ok_or_else(|| ScreenError::MissingRequiredField {
            symbol: self.symbol.clone(),
            field,
        })
    }
}

/// A materialized snapshot of the metrics feed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricSnapshot {
    records: Vec<InstrumentMetricRecord>,
}

impl MetricSnapshot {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn add(&mut self, record: InstrumentMetricRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[InstrumentMetricRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All unique symbols in this snapshot, sorted.
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut symbols: Vec<Symbol> = self.records.iter().map(|r| r.symbol().clone()).collect();
        symbols.sort();
        symbols.dedup();
        symbols
    }
}

impl FromIterator<InstrumentMetricRecord> for MetricSnapshot {
    fn from_iter<T: IntoIterator<Item = InstrumentMetricRecord>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

/// Volatility and liquidity metrics for one symbol, as the metrics endpoint
/// reports them. Carries no price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsRow {
    pub symbol: Symbol,
    #[serde(default)]
    pub iv_rank: Option<Decimal>,
    #[serde(default)]
    pub iv_percentile: Option<Decimal>,
    #[serde(default)]
    pub iv_hv_spread: Option<Decimal>,
    #[serde(default)]
    pub liquidity_rating: Option<Decimal>,
    #[serde(default)]
    pub beta: Option<Decimal>,
    #[serde(default)]
    pub earnings_date: Option<NaiveDate>,
}

/// Market data for one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRow {
    pub symbol: Symbol,
    #[serde(default)]
    pub last_price: Option<Decimal>,
}

impl MetricSnapshot {
    /// Join metrics and quotes by symbol into one snapshot.
    ///
    /// A symbol with metrics but no quote has no `last_price`; a symbol with a
    /// quote but no metrics has only `last_price`. Rows keep the order in which
    /// their symbol first appears (metrics first, then quote-only symbols). A
    /// symbol repeated on one side takes that side's last row.
    ///
    /// # Examples
    ///
    /// ```
    /// use vol_screener::core::record::{MetricSnapshot, MetricsRow, QuoteRow};
    /// use vol_screener::core::symbol::Symbol;
    /// use chrono::NaiveDate;
    /// use rust_decimal_macros::dec;
    ///
    /// let metrics = vec![MetricsRow {
    ///     symbol: Symbol::new("MU"),
    ///     iv_rank: Some(dec!(0.7)),
    ///     iv_percentile: None,
    ///     iv_hv_spread: None,
    ///     liquidity_rating: None,
    ///     beta: None,
    ///     earnings_date: None,
    /// }];
    /// let quotes = vec![QuoteRow { symbol: Symbol::new("AMD"), last_price: Some(dec!(150)) }];
    ///
    /// let asof = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    /// let snapshot = MetricSnapshot::combine(&metrics, &quotes, asof);
    /// assert_eq!(snapshot.len(), 2);
    /// assert_eq!(snapshot.records()[0].last_price(), None);
    /// assert_eq!(snapshot.records()[1].iv_rank(), None);
    /// ```
    pub fn combine(metrics: &[MetricsRow], quotes: &[QuoteRow], snapshot_date: NaiveDate) -> Self {
        let mut records: Vec<InstrumentMetricRecord> = Vec::new();
        let mut index: HashMap<Symbol, usize> = HashMap::new();

        for row in metrics {
            let record = InstrumentMetricRecord {
                iv_rank: row.iv_rank,
                iv_percentile: row.iv_percentile,
                iv_hv_spread: row.iv_hv_spread,
                liquidity_rating: row.liquidity_rating,
                beta: row.beta,
                earnings_date: row.earnings_date,
                ..InstrumentMetricRecord::new(row.symbol.clone(), snapshot_date)
            };
            match index.get(&row.symbol) {
                Some(&i) => records[i] = record,
                None => {
                    index.insert(row.symbol.clone(), records.len());
                    records.push(record);
                }
            }
        }

        for quote in quotes {
            match index.get(&quote.symbol) {
                Some(&i) => records[i].last_price = quote.last_price,
                None => {
                    index.insert(quote.symbol.clone(), records.len());
                    records.push(InstrumentMetricRecord {
                        last_price: quote.last_price,
                        ..InstrumentMetricRecord::new(quote.symbol.clone(), snapshot_date)
                    });
                }
            }
        }

        Self { records }
    }
}
