use crate::screening::earnings::EarningsStatus;
use crate::screening::engine::ScreenResult;
use crate::screening::filter::FilterClause;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counts from each stage of one screening pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenStats {
    pub input_count: usize,
    /// Records dropped under `skip_record` for a missing field.
    pub skipped_missing: usize,
    /// Records that failed at least one clause.
    pub rejected: usize,
    pub duplicates_removed: usize,
    pub passed: usize,
    /// How many records failed each clause. A record failing several clauses
    /// is counted under each of them.
    pub rejections_by_clause: BTreeMap<FilterClause, usize>,
}

impl ScreenStats {
    /// Share of input records that made it to the output.
    pub fn pass_rate(&self) -> f64 {
        if self.input_count == 0 {
            return 0.0;
        }
        self.passed as f64 / self.input_count as f64
    }
}

/// Ranked candidates plus the statistics that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenReport {
    pub results: Vec<ScreenResult>,
    pub stats: ScreenStats,
}

impl ScreenReport {
    /// Candidates whose earnings fall outside the avoidance window.
    pub fn clear_candidates(&self) -> impl Iterator<Item = &ScreenResult> {
        self.results
            .iter()
            .filter(|r| r.earnings_status == EarningsStatus::Clear)
    }
}

impl std::fmt::Display for ScreenReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Screen Result ===")?;
        writeln!(f, "Input Records:  {}", self.stats.input_count)?;
        writeln!(f, "Passed:         {}", self.stats.passed)?;
        writeln!(f, "Clear:          {}", self.clear_candidates().count())?;
        writeln!(f, "Rejected:       {}", self.stats.rejected)?;
        writeln!(f, "Skipped:        {}", self.stats.skipped_missing)?;
        writeln!(f, "Duplicates:     {}", self.stats.duplicates_removed)?;
        writeln!(f, "Pass Rate:      {:.1}%", self.stats.pass_rate() * 100.0)?;

        if !self.stats.rejections_by_clause.is_empty() {
            writeln!(f, "\nRejections by Clause:")?;
            for (clause, count) in &self.stats.rejections_by_clause {
                writeln!(f, "  {:<18} {}", clause.to_string(), count)?;
            }
        }

        if self.results.is_empty() {
            writeln!(f, "\nNo candidates.")?;
            return Ok(());
        }

        writeln!(f, "\n--- Candidates ---")?;
        writeln!(
            f,
            "  {:<8} {:>10} {:>8} {:>8} {:>8} {:>6} {:>7}  {}",
            "SYMBOL", "LAST", "IVR", "IVP", "IV-HV", "LIQ", "BETA", "EARNINGS"
        )?;
        for r in &self.results {
            let spread = r.iv_hv_spread.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
            let beta = r.beta.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
            let earnings = match r.earnings_date {
                Some(date) => format!("{} ({})", r.earnings_status, date),
                None => r.earnings_status.to_string(),
            };
            writeln!(
                f,
                "  {:<8} {:>10} {:>8} {:>8} {:>8} {:>6} {:>7}  {}",
                r.symbol.to_string(),
                r.last_price.to_string(),
                r.iv_rank.to_string(),
                r.iv_percentile.to_string(),
                spread,
                r.liquidity_rating.to_string(),
                beta,
                earnings
            )?;
        }
        Ok(())
    }
}
