//! # Domain Models
//!
//! Canonical, request-scoped domain types for stockdash.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Bar`] | OHLCV bar with timestamp |
//! | [`BarSeries`] | Chronological bars for a symbol/interval |
//! | [`Symbol`] | Validated ticker |
//! | [`Interval`] | Bar interval (1h, 1d, 1wk, 1mo) |
//! | [`DateRange`] | Inclusive calendar date range |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! All types validate their invariants at construction time:
//!
//! ```rust
//! use stockdash_core::{Bar, UtcDateTime, ValidationError};
//!
//! let ts = UtcDateTime::parse("2024-01-01T00:00:00Z").unwrap();
//! let invalid = Bar::new(ts, 100.0, 95.0, 105.0, 102.0, Some(1000), None);
//! assert!(matches!(invalid, Err(ValidationError::InvalidBarRange)));
//! ```

mod interval;
mod models;
mod range;
mod symbol;
mod timestamp;

pub use interval::Interval;
pub(crate) use models::validate_non_negative;
pub use models::{Bar, BarSeries};
pub use range::{format_date, parse_date, DateRange};
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
