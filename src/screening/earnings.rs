use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether an upcoming earnings report argues against opening a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EarningsStatus {
    /// Earnings fall inside the avoidance window.
    Avoid,
    Clear,
}

impl EarningsStatus {
    /// Classify an earnings date relative to the as-of date.
    ///
    /// AVOID iff `snapshot_date <= earnings_date <= snapshot_date + window_days`.
    /// A missing earnings date, one already in the past, or one beyond the
    /// window is CLEAR. A negative window can never contain a date.
    ///
    /// ```
    /// use vol_screener::screening::earnings::EarningsStatus;
    /// use chrono::NaiveDate;
    ///
    /// let asof = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    /// let report = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
    /// assert_eq!(EarningsStatus::classify(asof, Some(report), 25), EarningsStatus::Avoid);
    /// assert_eq!(EarningsStatus::classify(asof, None, 25), EarningsStatus::Clear);
    /// ```
    pub fn classify(
        snapshot_date: NaiveDate,
        earnings_date: Option<NaiveDate>,
        window_days: i64,
    ) -> Self {
        let Some(earnings_date) = earnings_date else {
            return EarningsStatus::Clear;
        };
        if window_days < 0 || earnings_date < snapshot_date {
            return EarningsStatus::Clear;
        }
        // Saturates at the calendar's end rather than overflowing.
        let window_end = snapshot_date
            .checked_add_days(Days::new(window_days as u64))
            .unwrap_or(NaiveDate::MAX);
        if earnings_date <= window_end {
            EarningsStatus::Avoid
        } else {
            EarningsStatus::Clear
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EarningsStatus::Avoid => "AVOID",
            EarningsStatus::Clear => "CLEAR",
        }
    }
}

impl fmt::Display for EarningsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
