use serde::{Deserialize, Serialize};
use std::fmt;

/// Ticker symbol of an underlying instrument.
///
/// Symbols are compared exactly as delivered by the metrics feed; no case
/// folding or suffix normalization is applied.
///
/// # Examples
///
/// ```
/// use vol_screener::core::symbol::Symbol;
///
/// let amd = Symbol::new("AMD");
/// let mu = Symbol::new("MU");
/// assert_ne!(amd, mu);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_equality() {
        assert_eq!(Symbol::new("SPY"), Symbol::from("SPY"));
        assert_ne!(Symbol::new("SPY"), Symbol::new("spy"));
    }

    #[test]
    fn test_symbol_display() {
        assert_eq!(format!("{}", Symbol::new("XYZ")), "XYZ");
    }

    #[test]
    fn test_symbol_serializes_transparently() {
        let json = serde_json::to_string(&Symbol::new("AMD")).unwrap();
        assert_eq!(json, "\"AMD\"");
    }
}
