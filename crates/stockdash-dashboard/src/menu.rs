use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DashboardError;

/// The seven mutually exclusive dashboard views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuItem {
    Stock,
    Scanner,
    Portfolio,
    #[serde(rename = "etf")]
    EtfRecommender,
    #[serde(rename = "returns")]
    ReturnTracker,
    #[serde(rename = "risk")]
    RiskAlert,
    Rebalance,
}

impl MenuItem {
    /// Menu order as shown to the user.
    pub const ALL: [Self; 7] = [
        Self::Stock,
        Self::Scanner,
        Self::Portfolio,
        Self::EtfRecommender,
        Self::ReturnTracker,
        Self::RiskAlert,
        Self::Rebalance,
    ];

    /// Stable identifier used in URLs and on the command line.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Stock => "stock",
            Self::Scanner => "scanner",
            Self::Portfolio => "portfolio",
            Self::EtfRecommender => "etf",
            Self::ReturnTracker => "returns",
            Self::RiskAlert => "risk",
            Self::Rebalance => "rebalance",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Stock => "Individual Stock",
            Self::Scanner => "Stock Scanner",
            Self::Portfolio => "Portfolio",
            Self::EtfRecommender => "ETF Recommender",
            Self::ReturnTracker => "Return Tracker",
            Self::RiskAlert => "Risk Alerts",
            Self::Rebalance => "Rebalancing Reminder",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Stock => "Price history, technical indicators and optional commentary for one ticker",
            Self::Scanner => "RSI and trend screen across a watchlist",
            Self::Portfolio => "Valuation and unrealized P&L of configured holdings",
            Self::EtfRecommender => "Risk-adjusted ranking of an ETF universe",
            Self::ReturnTracker => "Cumulative returns against an optional benchmark",
            Self::RiskAlert => "Drawdown, daily drop and volatility threshold alerts",
            Self::Rebalance => "Drift from target weights and trades to restore them",
        }
    }

    /// Whether the view can append AI commentary.
    pub const fn supports_commentary(self) -> bool {
        matches!(self, Self::Stock | Self::EtfRecommender)
    }
}

impl Display for MenuItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MenuItem {
    type Err = DashboardError;

    /// Accepts a slug or a label, ignoring case and surrounding whitespace.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();
        Self::ALL
            .into_iter()
            .find(|item| {
                item.slug().eq_ignore_ascii_case(wanted) || item.label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| DashboardError::UnknownMenuItem {
                value: wanted.to_owned(),
            })
    }
}

/// Serializable menu entry for hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    pub slug: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub commentary: bool,
}

impl From<MenuItem> for MenuEntry {
    fn from(item: MenuItem) -> Self {
        Self {
            slug: item.slug(),
            label: item.label(),
            description: item.description(),
            commentary: item.supports_commentary(),
        }
    }
}

pub fn menu_entries() -> Vec<MenuEntry> {
    MenuItem::ALL.into_iter().map(MenuEntry::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_and_labels_round_trip() {
        for item in MenuItem::ALL {
            assert_eq!(item.slug().parse::<MenuItem>().expect("slug"), item);
            assert_eq!(item.label().parse::<MenuItem>().expect("label"), item);
            assert_eq!(
                item.label().to_uppercase().parse::<MenuItem>().expect("upper"),
                item
            );
        }
    }

    #[test]
    fn unknown_label_is_rejected() {
        let err = "Crypto Tracker".parse::<MenuItem>().expect_err("must fail");
        assert_eq!(err.code(), "menu.unknown_item");
    }

    #[test]
    fn serde_uses_slugs() {
        let json = serde_json::to_string(&MenuItem::EtfRecommender).expect("json");
        assert_eq!(json, "\"etf\"");
        let entries = menu_entries();
        assert_eq!(entries.len(), 7);
        assert!(entries.iter().all(|entry| !entry.label.is_empty()));
    }
}
