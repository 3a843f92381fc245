use crate::core::symbol::Symbol;
use std::fmt;
use thiserror::Error;

/// A record field the filter predicate cannot evaluate without.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RequiredField {
    LastPrice,
    IvRank,
    IvPercentile,
    LiquidityRating,
}

impl RequiredField {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequiredField::LastPrice => "last_price",
            RequiredField::IvRank => "iv_rank",
            RequiredField::IvPercentile => "iv_percentile",
            RequiredField::LiquidityRating => "liquidity_rating",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced by the screening engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScreenError {
    #[error("record {symbol} is missing required field `{field}`")]
    MissingRequiredField { symbol: Symbol, field: RequiredField },
    #[error("invalid screen config `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}
