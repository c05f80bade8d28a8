//! Dashboard configuration loaded from TOML.
//!
//! Every section is optional; missing keys fall back to the defaults below.
//! Secrets never live in the file: the commentary API key is read from the
//! environment variable named by `ai.api_key_env`.
//!
//! ```toml
//! [provider]
//! source = "yahoo"
//! timeout_ms = 8000
//!
//! [watchlist]
//! symbols = ["AAPL", "MSFT", "SPY"]
//!
//! [portfolio]
//! cash = 2500.0
//!
//! [[portfolio.holdings]]
//! symbol = "VTI"
//! shares = 40
//! cost_basis = 210.0
//! target_weight = 0.6
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{IndicatorConfig, Interval, Portfolio, ProviderId, Symbol, ValidationError};

/// File name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "stockdash.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ConfigError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Read { .. } => "config.read",
            Self::Parse(_) => "config.parse",
            Self::Serialize(_) => "config.serialize",
            Self::Invalid { .. } | Self::Validation(_) => "config.invalid",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub provider: ProviderConfig,
    pub ai: AiConfig,
    pub defaults: DefaultsConfig,
    pub indicators: IndicatorConfig,
    pub watchlist: WatchlistConfig,
    pub scanner: ScannerConfig,
    pub portfolio: Portfolio,
    pub etf: EtfConfig,
    pub risk: RiskConfig,
    pub rebalance: RebalanceConfig,
    pub server: ServerConfig,
}

impl DashboardConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolves the configuration file and loads it.
    ///
    /// Order: `explicit` (must exist), `./stockdash.toml`,
    /// `<config_dir>/stockdash/config.toml`, then built-in defaults. The
    /// returned path is `None` when defaults were used.
    pub fn discover(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }

        for candidate in Self::search_paths() {
            if candidate.is_file() {
                tracing::debug!(path = %candidate.display(), "loading config");
                return Ok((Self::load(&candidate)?, Some(candidate)));
            }
        }

        tracing::debug!("no config file found, using defaults");
        Ok((Self::default(), None))
    }

    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("stockdash").join("config.toml"));
        }
        paths
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.portfolio.validate()?;

        if self.provider.timeout_ms == 0 {
            return Err(invalid("provider.timeout_ms", "must be greater than zero"));
        }
        if self.defaults.lookback_days == 0 {
            return Err(invalid("defaults.lookback_days", "must be greater than zero"));
        }
        if !(0.0..=100.0).contains(&self.scanner.rsi_oversold)
            || !(0.0..=100.0).contains(&self.scanner.rsi_overbought)
            || self.scanner.rsi_oversold >= self.scanner.rsi_overbought
        {
            return Err(invalid(
                "scanner",
                "rsi bands must satisfy 0 <= oversold < overbought <= 100",
            ));
        }
        for (field, value) in [
            ("risk.max_drawdown", self.risk.max_drawdown),
            ("risk.daily_drop", self.risk.daily_drop),
            ("rebalance.tolerance", self.rebalance.tolerance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, "must be a fraction between 0 and 1"));
            }
        }
        if !self.risk.volatility.is_finite() || self.risk.volatility < 0.0 {
            return Err(invalid("risk.volatility", "must be a non-negative number"));
        }
        for (field, lambda) in [
            ("etf.lambda.conservative", self.etf.lambda.conservative),
            ("etf.lambda.balanced", self.etf.lambda.balanced),
            ("etf.lambda.aggressive", self.etf.lambda.aggressive),
        ] {
            if !lambda.is_finite() || lambda < 0.0 {
                return Err(invalid(field, "must be a non-negative number"));
            }
        }
        if self.etf.universe.is_empty() {
            return Err(invalid("etf.universe", "must list at least one symbol"));
        }
        if self.etf.top == 0 {
            return Err(invalid("etf.top", "must be greater than zero"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_owned(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub source: ProviderId,
    /// Overrides the provider's API host, mainly for proxies and tests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub timeout_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            source: ProviderId::Yahoo,
            base_url: None,
            timeout_ms: 10_000,
        }
    }
}

/// Chat-completion settings for commentary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub enabled: bool,
    pub model: String,
    pub api_key_env: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    pub max_tokens: u16,
    pub temperature: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "gpt-4o-mini".to_owned(),
            api_key_env: "OPENAI_API_KEY".to_owned(),
            api_base: None,
            max_tokens: 400,
            temperature: 0.4,
        }
    }
}

impl AiConfig {
    /// Reads the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub lookback_days: u32,
    pub interval: Interval,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            lookback_days: 365,
            interval: Interval::OneDay,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchlistConfig {
    pub symbols: Vec<Symbol>,
}

impl Default for WatchlistConfig {
    fn default() -> Self {
        Self {
            symbols: symbols(&["AAPL", "MSFT", "NVDA", "AMZN", "GOOGL", "SPY"]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EtfConfig {
    pub universe: Vec<Symbol>,
    pub top: usize,
    pub lambda: RiskLambdas,
}

impl Default for EtfConfig {
    fn default() -> Self {
        Self {
            universe: symbols(&[
                "SPY", "QQQ", "VTI", "IWM", "VXUS", "SCHD", "BND", "AGG", "TLT", "GLD", "VNQ",
                "ARKK",
            ]),
            top: 5,
            lambda: RiskLambdas::default(),
        }
    }
}

/// Volatility penalty per risk profile in the ETF score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskLambdas {
    pub conservative: f64,
    pub balanced: f64,
    pub aggressive: f64,
}

impl Default for RiskLambdas {
    fn default() -> Self {
        Self {
            conservative: 1.5,
            balanced: 0.75,
            aggressive: 0.25,
        }
    }
}

/// Alert thresholds, all fractions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    pub max_drawdown: f64,
    pub daily_drop: f64,
    pub volatility: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            max_drawdown: 0.15,
            daily_drop: 0.05,
            volatility: 0.40,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RebalanceConfig {
    pub tolerance: f64,
}

impl Default for RebalanceConfig {
    fn default() -> Self {
        Self { tolerance: 0.05 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_owned(),
        }
    }
}

fn symbols(tickers: &[&str]) -> Vec<Symbol> {
    tickers
        .iter()
        .filter_map(|ticker| Symbol::parse(ticker).ok())
        .collect()
}
