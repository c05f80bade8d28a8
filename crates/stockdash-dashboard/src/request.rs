//! View requests: raw host arguments resolved into typed per-view parameters.
//!
//! Both hosts collect the same loosely typed [`ViewArgs`] (CLI flags, URL
//! query) and call [`ViewRequest::resolve`], which applies configuration
//! defaults and validates every value before any I/O happens.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use stockdash_core::{
    parse_date, DashboardConfig, DateRange, Interval, RiskLambdas, Symbol,
};
use time::{Date, Duration};

use crate::{DashboardError, MenuItem};

/// Unvalidated view arguments shared by the CLI and the web query string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewArgs {
    pub symbol: Option<String>,
    /// Comma or whitespace separated tickers.
    pub symbols: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub interval: Option<String>,
    pub commentary: Option<bool>,
    pub filter: Option<String>,
    pub sort: Option<String>,
    pub desc: Option<bool>,
    pub profile: Option<String>,
    pub top: Option<usize>,
    pub benchmark: Option<String>,
    pub tolerance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewRequest {
    Stock(StockParams),
    Scanner(ScannerParams),
    Portfolio(PortfolioParams),
    EtfRecommender(EtfParams),
    ReturnTracker(ReturnsParams),
    RiskAlert(RiskParams),
    Rebalance(RebalanceParams),
}

impl ViewRequest {
    pub fn item(&self) -> MenuItem {
        match self {
            Self::Stock(_) => MenuItem::Stock,
            Self::Scanner(_) => MenuItem::Scanner,
            Self::Portfolio(_) => MenuItem::Portfolio,
            Self::EtfRecommender(_) => MenuItem::EtfRecommender,
            Self::ReturnTracker(_) => MenuItem::ReturnTracker,
            Self::RiskAlert(_) => MenuItem::RiskAlert,
            Self::Rebalance(_) => MenuItem::Rebalance,
        }
    }

    /// Builds the typed request for `item`, filling gaps from `config`.
    ///
    /// `today` anchors the default trailing date range.
    pub fn resolve(
        item: MenuItem,
        args: &ViewArgs,
        config: &DashboardConfig,
        today: Date,
    ) -> Result<Self, DashboardError> {
        let range = resolve_range(args, config.defaults.lookback_days, today)?;
        let interval = match &args.interval {
            Some(value) => value.parse::<Interval>()?,
            None => config.defaults.interval,
        };
        let commentary = args.commentary.unwrap_or(false);
        if commentary && !item.supports_commentary() {
            return Err(DashboardError::invalid_parameter(
                "commentary",
                "true",
                format!("the {} view does not offer commentary", item.slug()),
            ));
        }

        let request = match item {
            MenuItem::Stock => {
                let symbol = match &args.symbol {
                    Some(value) => Symbol::parse(value)?,
                    None => config
                        .watchlist
                        .symbols
                        .first()
                        .cloned()
                        .ok_or(DashboardError::MissingParameter { name: "symbol" })?,
                };
                Self::Stock(StockParams {
                    symbol,
                    range,
                    interval,
                    commentary,
                })
            }
            MenuItem::Scanner => {
                let symbols = symbols_or(args, &config.watchlist.symbols)?;
                let filter = parse_or_default::<ScanFilter>("filter", args.filter.as_deref())?;
                let sort = parse_or_default::<ScanSort>("sort", args.sort.as_deref())?;
                Self::Scanner(ScannerParams {
                    symbols,
                    range,
                    interval,
                    filter,
                    sort,
                    descending: args.desc.unwrap_or(sort != ScanSort::Symbol),
                })
            }
            MenuItem::Portfolio => Self::Portfolio(PortfolioParams { range }),
            MenuItem::EtfRecommender => {
                let profile = parse_or_default::<RiskProfile>("profile", args.profile.as_deref())?;
                let top = args.top.unwrap_or(config.etf.top);
                if top == 0 {
                    return Err(DashboardError::invalid_parameter(
                        "top",
                        "0",
                        "must be at least 1",
                    ));
                }
                Self::EtfRecommender(EtfParams {
                    profile,
                    range,
                    interval,
                    top,
                    commentary,
                })
            }
            MenuItem::ReturnTracker => {
                let fallback = if config.portfolio.is_empty() {
                    config.watchlist.symbols.clone()
                } else {
                    config.portfolio.symbols()
                };
                let symbols = symbols_or(args, &fallback)?;
                let benchmark = args.benchmark.as_deref().map(Symbol::parse).transpose()?;
                Self::ReturnTracker(ReturnsParams {
                    symbols,
                    benchmark,
                    range,
                    interval,
                })
            }
            MenuItem::RiskAlert => {
                let fallback = if config.portfolio.is_empty() {
                    config.watchlist.symbols.clone()
                } else {
                    config.portfolio.symbols()
                };
                Self::RiskAlert(RiskParams {
                    symbols: symbols_or(args, &fallback)?,
                    range,
                    interval,
                })
            }
            MenuItem::Rebalance => {
                let tolerance = args.tolerance.unwrap_or(config.rebalance.tolerance);
                if !(0.0..=1.0).contains(&tolerance) {
                    return Err(DashboardError::invalid_parameter(
                        "tolerance",
                        tolerance.to_string(),
                        "must be a fraction between 0 and 1",
                    ));
                }
                Self::Rebalance(RebalanceParams { range, tolerance })
            }
        };
        Ok(request)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StockParams {
    pub symbol: Symbol,
    pub range: DateRange,
    pub interval: Interval,
    pub commentary: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScannerParams {
    pub symbols: Vec<Symbol>,
    pub range: DateRange,
    pub interval: Interval,
    pub filter: ScanFilter,
    pub sort: ScanSort,
    pub descending: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioParams {
    pub range: DateRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EtfParams {
    pub profile: RiskProfile,
    pub range: DateRange,
    pub interval: Interval,
    pub top: usize,
    pub commentary: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnsParams {
    pub symbols: Vec<Symbol>,
    pub benchmark: Option<Symbol>,
    pub range: DateRange,
    pub interval: Interval,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiskParams {
    pub symbols: Vec<Symbol>,
    pub range: DateRange,
    pub interval: Interval,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RebalanceParams {
    pub range: DateRange,
    pub tolerance: f64,
}

/// Named choice parsed from a free-text argument.
trait Choice: Sized + Copy + Default + 'static {
    const ALL: &'static [Self];
    fn as_str(self) -> &'static str;
}

fn parse_choice<T: Choice>(name: &'static str, value: &str) -> Result<T, DashboardError> {
    let wanted = value.trim();
    T::ALL
        .iter()
        .copied()
        .find(|choice| choice.as_str().eq_ignore_ascii_case(wanted))
        .ok_or_else(|| {
            let expected: Vec<&str> = T::ALL.iter().map(|choice| choice.as_str()).collect();
            DashboardError::invalid_parameter(
                name,
                wanted,
                format!("expected one of {}", expected.join(", ")),
            )
        })
}

fn parse_or_default<T: Choice>(name: &'static str, value: Option<&str>) -> Result<T, DashboardError> {
    value.map_or_else(|| Ok(T::default()), |value| parse_choice(name, value))
}

macro_rules! choice_enum {
    ($name:ident, $param:literal, { $($variant:ident => $text:literal),+ $(,)? }, default = $default:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl Choice for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl $name {
            pub const ALL: &'static [Self] = <Self as Choice>::ALL;

            pub fn as_str(self) -> &'static str {
                <Self as Choice>::as_str(self)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = DashboardError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                parse_choice($param, value)
            }
        }
    };
}

choice_enum!(ScanFilter, "filter", {
    All => "all",
    Oversold => "oversold",
    Overbought => "overbought",
    AboveTrend => "above-trend",
    BelowTrend => "below-trend",
}, default = All);

choice_enum!(ScanSort, "sort", {
    Change => "change",
    Rsi => "rsi",
    Volume => "volume",
    Symbol => "symbol",
}, default = Change);

choice_enum!(RiskProfile, "profile", {
    Conservative => "conservative",
    Balanced => "balanced",
    Aggressive => "aggressive",
}, default = Balanced);

impl RiskProfile {
    /// Volatility penalty applied in the ETF score.
    pub fn lambda(self, lambdas: &RiskLambdas) -> f64 {
        match self {
            Self::Conservative => lambdas.conservative,
            Self::Balanced => lambdas.balanced,
            Self::Aggressive => lambdas.aggressive,
        }
    }
}

fn resolve_range(args: &ViewArgs, lookback_days: u32, today: Date) -> Result<DateRange, DashboardError> {
    let end = args.end.as_deref().map(parse_date).transpose()?.unwrap_or(today);
    match args.start.as_deref().map(parse_date).transpose()? {
        Some(start) => Ok(DateRange::new(start, end)?),
        None => {
            let start = end.saturating_sub(Duration::days(i64::from(lookback_days.max(1)) - 1));
            Ok(DateRange::new(start, end)?)
        }
    }
}

fn symbols_or(args: &ViewArgs, fallback: &[Symbol]) -> Result<Vec<Symbol>, DashboardError> {
    let symbols = match args.symbols.as_deref() {
        Some(list) => Symbol::parse_list(list)?,
        None => fallback.to_vec(),
    };
    if symbols.is_empty() {
        return Err(DashboardError::MissingParameter { name: "symbols" });
    }
    let mut unique: Vec<Symbol> = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        if !unique.contains(&symbol) {
            unique.push(symbol);
        }
    }
    Ok(unique)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    const TODAY: Date = date!(2024 - 06 - 30);

    fn resolve(item: MenuItem, args: ViewArgs) -> Result<ViewRequest, DashboardError> {
        ViewRequest::resolve(item, &args, &DashboardConfig::default(), TODAY)
    }

    #[test]
    fn defaults_fill_range_interval_and_symbol() {
        let request = resolve(MenuItem::Stock, ViewArgs::default()).expect("request");
        let ViewRequest::Stock(params) = request else {
            panic!("expected stock request");
        };
        assert_eq!(params.symbol.as_str(), "AAPL");
        assert_eq!(params.interval, Interval::OneDay);
        assert_eq!(params.range.end(), TODAY);
        assert_eq!(params.range.days(), 365);
        assert!(!params.commentary);
    }

    #[test]
    fn explicit_dates_are_honoured() {
        let args = ViewArgs {
            start: Some("2024-01-01".into()),
            end: Some("2024-02-01".into()),
            ..ViewArgs::default()
        };
        let request = resolve(MenuItem::Portfolio, args).expect("request");
        let ViewRequest::Portfolio(params) = request else {
            panic!("expected portfolio request");
        };
        assert_eq!(params.range.to_string(), "2024-01-01..2024-02-01");
    }

    #[test]
    fn inverted_range_is_a_validation_error() {
        let args = ViewArgs {
            start: Some("2024-03-01".into()),
            end: Some("2024-02-01".into()),
            ..ViewArgs::default()
        };
        let err = resolve(MenuItem::Stock, args).expect_err("must fail");
        assert!(matches!(err, DashboardError::Validation(_)));
    }

    #[test]
    fn scanner_parses_choices_and_dedups_symbols() {
        let args = ViewArgs {
            symbols: Some("msft, aapl msft".into()),
            filter: Some("Oversold".into()),
            sort: Some("symbol".into()),
            ..ViewArgs::default()
        };
        let ViewRequest::Scanner(params) = resolve(MenuItem::Scanner, args).expect("request")
        else {
            panic!("expected scanner request");
        };
        let names: Vec<&str> = params.symbols.iter().map(Symbol::as_str).collect();
        assert_eq!(names, ["MSFT", "AAPL"]);
        assert_eq!(params.filter, ScanFilter::Oversold);
        assert!(!params.descending);
    }

    #[test]
    fn unknown_choice_lists_alternatives() {
        let args = ViewArgs {
            profile: Some("reckless".into()),
            ..ViewArgs::default()
        };
        let err = resolve(MenuItem::EtfRecommender, args).expect_err("must fail");
        assert_eq!(err.code(), "request.invalid_parameter");
        assert!(err.to_string().contains("conservative, balanced, aggressive"));
    }

    #[test]
    fn commentary_only_where_supported() {
        let args = ViewArgs {
            commentary: Some(true),
            ..ViewArgs::default()
        };
        assert!(resolve(MenuItem::Stock, args.clone()).is_ok());
        let err = resolve(MenuItem::RiskAlert, args).expect_err("must fail");
        assert_eq!(err.code(), "request.invalid_parameter");
    }

    #[test]
    fn tolerance_must_be_a_fraction() {
        let args = ViewArgs {
            tolerance: Some(1.5),
            ..ViewArgs::default()
        };
        assert!(resolve(MenuItem::Rebalance, args).is_err());
    }

    #[test]
    fn profile_selects_lambda() {
        let lambdas = RiskLambdas::default();
        assert_eq!(RiskProfile::Conservative.lambda(&lambdas), 1.5);
        assert_eq!(RiskProfile::default(), RiskProfile::Balanced);
    }
}
