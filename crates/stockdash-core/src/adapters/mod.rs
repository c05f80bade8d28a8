//! Market-data adapters.
//!
//! | Adapter | Provider | Notes |
//! |---------|----------|-------|
//! | [`YahooAdapter`] | Yahoo Finance chart API | live data over [`crate::HttpClient`] |
//! | [`FixtureAdapter`] | built-in catalog | deterministic, offline |

mod fixture;
mod yahoo;

pub use fixture::FixtureAdapter;
pub use yahoo::YahooAdapter;
