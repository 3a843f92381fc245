//! # vol-screener
//!
//! Volatility, liquidity and earnings-timing screen for options-selling
//! candidates.
//!
//! Given a snapshot of per-instrument metrics, the engine keeps the
//! instruments whose implied volatility is rich and whose options are liquid,
//! flags those with earnings inside the avoidance window, and ranks the rest.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: symbols, metric records, config, errors
//! - **screening** — Filter predicate, earnings classification, ranking engine
//! - **simulation** — Random snapshot generation

pub mod core;
pub mod screening;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::config::{MissingFieldPolicy, ScreenConfig};
    pub use crate::core::error::{RequiredField, ScreenError};
    pub use crate::core::record::{InstrumentMetricRecord, MetricSnapshot};
    pub use crate::core::symbol::Symbol;
    pub use crate::screening::earnings::EarningsStatus;
    pub use crate::screening::engine::{screen, ScreenResult, ScreeningEngine};
    pub use crate::screening::report::{ScreenReport, ScreenStats};
}
