//! Holdings, valuation and rebalancing arithmetic.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::validate_non_negative;
use crate::{Symbol, ValidationError};

/// Slack allowed when checking that target weights fit in one.
const WEIGHT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: Symbol,
    pub shares: f64,
    /// Average cost per share.
    #[serde(default)]
    pub cost_basis: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_weight: Option<f64>,
}

impl Holding {
    pub fn new(symbol: Symbol, shares: f64, cost_basis: f64) -> Result<Self, ValidationError> {
        let holding = Self {
            symbol,
            shares,
            cost_basis,
            target_weight: None,
        };
        holding.validate()?;
        Ok(holding)
    }

    pub fn with_target_weight(mut self, weight: f64) -> Result<Self, ValidationError> {
        self.target_weight = Some(weight);
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_non_negative("shares", self.shares)?;
        validate_non_negative("cost_basis", self.cost_basis)?;
        if let Some(weight) = self.target_weight {
            if !weight.is_finite() {
                return Err(ValidationError::NonFiniteValue {
                    field: "target_weight",
                });
            }
            if !(0.0..=1.0).contains(&weight) {
                return Err(ValidationError::OutOfUnitRange {
                    field: "target_weight",
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    #[serde(default)]
    pub cash: f64,
    #[serde(default)]
    pub holdings: Vec<Holding>,
}

impl Portfolio {
    pub fn new(cash: f64, holdings: Vec<Holding>) -> Result<Self, ValidationError> {
        let portfolio = Self { cash, holdings };
        portfolio.validate()?;
        Ok(portfolio)
    }

    /// Checks every holding, symbol uniqueness and that target weights sum to at most one.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_non_negative("cash", self.cash)?;
        let mut seen = BTreeSet::new();
        for holding in &self.holdings {
            holding.validate()?;
            if !seen.insert(holding.symbol.as_str()) {
                return Err(ValidationError::DuplicateHolding {
                    symbol: holding.symbol.to_string(),
                });
            }
        }
        let total = self.target_weight_total();
        if total > 1.0 + WEIGHT_EPSILON {
            return Err(ValidationError::TargetWeightsExceedOne { total });
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    pub fn symbols(&self) -> Vec<Symbol> {
        self.holdings.iter().map(|h| h.symbol.clone()).collect()
    }

    pub fn target_weight_total(&self) -> f64 {
        self.holdings.iter().filter_map(|h| h.target_weight).sum()
    }

    pub fn has_targets(&self) -> bool {
        self.holdings.iter().any(|h| h.target_weight.is_some())
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PortfolioError {
    #[error("no price available for holding '{symbol}'")]
    MissingPrice { symbol: String },
    #[error("portfolio has zero total value")]
    ZeroValue,
}

impl PortfolioError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingPrice { .. } => "portfolio.missing_price",
            Self::ZeroValue => "portfolio.zero_value",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionValue {
    pub symbol: Symbol,
    pub shares: f64,
    pub price: f64,
    pub market_value: f64,
    pub cost: f64,
    pub unrealized_pnl: f64,
    /// `None` when the position has no cost basis.
    pub unrealized_pnl_pct: Option<f64>,
    pub weight: f64,
    pub target_weight: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    pub positions: Vec<PositionValue>,
    pub cash: f64,
    pub cash_weight: f64,
    pub total_value: f64,
    pub total_cost: f64,
    pub unrealized_pnl: f64,
}

/// Values every holding at `prices`. Position weights plus the cash weight sum to one.
pub fn value(
    portfolio: &Portfolio,
    prices: &BTreeMap<Symbol, f64>,
) -> Result<Valuation, PortfolioError> {
    let mut positions = Vec::with_capacity(portfolio.holdings.len());
    for holding in &portfolio.holdings {
        let price = *prices
            .get(&holding.symbol)
            .ok_or_else(|| PortfolioError::MissingPrice {
                symbol: holding.symbol.to_string(),
            })?;
        let market_value = holding.shares * price;
        let cost = holding.shares * holding.cost_basis;
        let unrealized_pnl = market_value - cost;
        positions.push(PositionValue {
            symbol: holding.symbol.clone(),
            shares: holding.shares,
            price,
            market_value,
            cost,
            unrealized_pnl,
            unrealized_pnl_pct: (cost > 0.0).then(|| unrealized_pnl / cost),
            weight: 0.0,
            target_weight: holding.target_weight,
        });
    }

    let total_value = portfolio.cash + positions.iter().map(|p| p.market_value).sum::<f64>();
    if total_value <= 0.0 {
        return Err(PortfolioError::ZeroValue);
    }
    for position in &mut positions {
        position.weight = position.market_value / total_value;
    }

    let total_cost = positions.iter().map(|p| p.cost).sum();
    let unrealized_pnl = positions.iter().map(|p| p.unrealized_pnl).sum();
    Ok(Valuation {
        positions,
        cash: portfolio.cash,
        cash_weight: portfolio.cash / total_value,
        total_value,
        total_cost,
        unrealized_pnl,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RebalanceAction {
    Buy,
    Sell,
    Hold,
}

impl RebalanceAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
            Self::Hold => "hold",
        }
    }
}

impl Display for RebalanceAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalanceLine {
    pub symbol: Symbol,
    pub current_weight: f64,
    pub target_weight: Option<f64>,
    /// Current minus target weight; zero for holdings without a target.
    pub drift: f64,
    pub action: RebalanceAction,
    pub trade_value: f64,
    pub trade_shares: f64,
}

impl RebalanceLine {
    pub fn outside_tolerance(&self) -> bool {
        self.action != RebalanceAction::Hold
    }
}

/// Trades that bring each targeted position whose drift exceeds `tolerance`
/// back to its target weight. Cash absorbs the difference.
pub fn rebalance(valuation: &Valuation, tolerance: f64) -> Vec<RebalanceLine> {
    valuation
        .positions
        .iter()
        .map(|position| {
            let Some(target) = position.target_weight else {
                return RebalanceLine {
                    symbol: position.symbol.clone(),
                    current_weight: position.weight,
                    target_weight: None,
                    drift: 0.0,
                    action: RebalanceAction::Hold,
                    trade_value: 0.0,
                    trade_shares: 0.0,
                };
            };

            let drift = position.weight - target;
            let (action, trade_value) = if drift.abs() <= tolerance {
                (RebalanceAction::Hold, 0.0)
            } else {
                let trade_value = target * valuation.total_value - position.market_value;
                let action = if trade_value > 0.0 {
                    RebalanceAction::Buy
                } else {
                    RebalanceAction::Sell
                };
                (action, trade_value)
            };
            let trade_shares = if position.price > 0.0 {
                trade_value / position.price
            } else {
                0.0
            };

            RebalanceLine {
                symbol: position.symbol.clone(),
                current_weight: position.weight,
                target_weight: Some(target),
                drift,
                action,
                trade_value,
                trade_shares,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(value: &str) -> Symbol {
        Symbol::parse(value).expect("symbol")
    }

    fn sample() -> (Portfolio, BTreeMap<Symbol, f64>) {
        let portfolio = Portfolio::new(
            1_000.0,
            vec![
                Holding::new(sym("AAPL"), 10.0, 150.0)
                    .and_then(|h| h.with_target_weight(0.3))
                    .expect("aapl"),
                Holding::new(sym("BND"), 50.0, 80.0)
                    .and_then(|h| h.with_target_weight(0.4))
                    .expect("bnd"),
                Holding::new(sym("GLD"), 5.0, 0.0).expect("gld"),
            ],
        )
        .expect("portfolio");
        let prices = BTreeMap::from([(sym("AAPL"), 200.0), (sym("BND"), 70.0), (sym("GLD"), 100.0)]);
        (portfolio, prices)
    }

    #[test]
    fn weights_including_cash_sum_to_one() {
        let (portfolio, prices) = sample();
        let valuation = value(&portfolio, &prices).expect("valuation");

        assert!((valuation.total_value - 7_000.0).abs() < 1e-9);
        let weights: f64 = valuation.positions.iter().map(|p| p.weight).sum();
        assert!((weights + valuation.cash_weight - 1.0).abs() < 1e-12);
        assert!((valuation.positions[0].unrealized_pnl - 500.0).abs() < 1e-9);
        assert_eq!(valuation.positions[2].unrealized_pnl_pct, None);
    }

    #[test]
    fn trades_restore_target_weights() {
        let (portfolio, prices) = sample();
        let valuation = value(&portfolio, &prices).expect("valuation");
        let lines = rebalance(&valuation, 0.01);

        for (line, position) in lines.iter().zip(&valuation.positions) {
            let Some(target) = line.target_weight else {
                assert_eq!(line.action, RebalanceAction::Hold);
                continue;
            };
            let after = (position.market_value + line.trade_value) / valuation.total_value;
            if line.outside_tolerance() {
                assert!((after - target).abs() < 1e-12);
            }
        }
        // AAPL sits at 2000/7000 (0.286), inside a 0.05 band of 0.30.
        let loose = rebalance(&valuation, 0.05);
        assert_eq!(loose[0].action, RebalanceAction::Hold);
        assert_eq!(lines[1].action, RebalanceAction::Sell);
    }

    #[test]
    fn missing_price_is_reported() {
        let (portfolio, mut prices) = sample();
        prices.remove(&sym("BND"));
        let err = value(&portfolio, &prices).expect_err("must fail");
        assert_eq!(err.code(), "portfolio.missing_price");
    }

    #[test]
    fn duplicate_symbols_are_rejected() {
        let err = Portfolio::new(
            0.0,
            vec![
                Holding::new(sym("SPY"), 1.0, 1.0).expect("spy"),
                Holding::new(sym("spy"), 2.0, 1.0).expect("spy"),
            ],
        )
        .expect_err("must fail");
        assert!(matches!(err, ValidationError::DuplicateHolding { .. }));
    }

    #[test]
    fn target_weights_above_one_are_rejected() {
        let err = Portfolio::new(
            0.0,
            vec![
                Holding::new(sym("SPY"), 1.0, 1.0)
                    .and_then(|h| h.with_target_weight(0.7))
                    .expect("spy"),
                Holding::new(sym("QQQ"), 1.0, 1.0)
                    .and_then(|h| h.with_target_weight(0.6))
                    .expect("qqq"),
            ],
        )
        .expect_err("must fail");
        assert!(matches!(err, ValidationError::TargetWeightsExceedOne { .. }));
    }

    #[test]
    fn empty_portfolio_has_zero_value() {
        let err = value(&Portfolio::default(), &BTreeMap::new()).expect_err("must fail");
        assert_eq!(err, PortfolioError::ZeroValue);
    }
}
