//! Prompt builders for the views that request commentary.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use stockdash_core::{DateRange, IndicatorRow, SeriesStats};

const SYSTEM_ANALYST: &str = "You are a concise equity market analyst. \
Explain what the numbers suggest in plain language, mention risks, \
and never present the answer as financial advice.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentaryPrompt {
    pub system: String,
    pub user: String,
}

impl CommentaryPrompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    /// First line of the user message, used as a short topic label.
    pub fn headline(&self) -> &str {
        self.user.lines().next().unwrap_or_default()
    }
}

/// Prompt for the individual-stock view: range statistics plus the latest indicator row.
pub fn stock(stats: &SeriesStats, range: DateRange, latest: &IndicatorRow) -> CommentaryPrompt {
    let mut user = format!(
        "Interpret the technical picture for {} over {}.\n",
        stats.symbol, range
    );
    let _ = writeln!(user, "Last close: {:.2}", stats.last_close);
    let _ = writeln!(user, "Change over range: {}", percent(Some(stats.total_return)));
    let _ = writeln!(user, "Max drawdown: {}", percent(Some(stats.max_drawdown)));
    let _ = writeln!(user, "Annualized volatility: {}", percent(stats.volatility));
    let _ = writeln!(user, "SMA short: {}", number(latest.sma_short));
    let _ = writeln!(user, "SMA long: {}", number(latest.sma_long));
    let _ = writeln!(user, "EMA: {}", number(latest.ema));
    let _ = writeln!(user, "RSI: {}", number(latest.rsi));
    let _ = writeln!(
        user,
        "MACD: {} (signal {}, histogram {})",
        number(latest.macd),
        number(latest.macd_signal),
        number(latest.macd_histogram)
    );
    let _ = writeln!(
        user,
        "Bollinger bands: lower {}, middle {}, upper {}",
        number(latest.bollinger_lower),
        number(latest.bollinger_middle),
        number(latest.bollinger_upper)
    );
    user.push_str("Answer in at most five sentences.");
    CommentaryPrompt::new(SYSTEM_ANALYST, user)
}

/// Prompt for the ETF recommender: ranked candidates with their score.
pub fn etf(profile: &str, range: DateRange, ranked: &[(SeriesStats, f64)]) -> CommentaryPrompt {
    let mut user = format!(
        "Comment on these ETF picks for a {profile} investor over {range}.\n"
    );
    for (rank, (stats, score)) in ranked.iter().enumerate() {
        let _ = writeln!(
            user,
            "{}. {}: return {}, volatility {}, max drawdown {}, score {:.3}",
            rank + 1,
            stats.symbol,
            percent(stats.annualized_return),
            percent(stats.volatility),
            percent(Some(stats.max_drawdown)),
            score
        );
    }
    user.push_str("Explain why the top picks suit this profile in at most five sentences.");
    CommentaryPrompt::new(SYSTEM_ANALYST, user)
}

fn number(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_owned(), |v| format!("{v:.2}"))
}

fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_owned(), |v| format!("{:.2}%", v * 100.0))
}
