//! CLI argument definitions for stockdash.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `menu` | List the dashboard views |
//! | `view` | Render one view |
//! | `serve` | Run the web dashboard |
//! | `config` | Show the effective configuration or its search paths |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--offline` | `false` | Use fixture data and canned commentary |
//! | `--config` | search path | Explicit config file |
//! | `-v`, `--verbose` | warn | Raise log verbosity (repeatable) |
//!
//! # Examples
//!
//! ```bash
//! stockdash view stock --symbol NVDA --start 2024-01-01 --format table
//! stockdash view scanner --filter oversold --sort rsi
//! stockdash view etf --profile aggressive --top 3 --commentary
//! stockdash serve --bind 0.0.0.0:8080
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use stockdash_dashboard::ViewArgs;

/// Menu-driven stock market dashboard.
#[derive(Debug, Parser)]
#[command(
    name = "stockdash",
    author,
    version,
    about = "Menu-driven stock market dashboard",
    long_about = "stockdash renders seven market views (individual stock, scanner, portfolio, \
ETF recommender, return tracker, risk alerts, rebalancing) from daily price history, \
either on the command line or as a web dashboard.\n\
\n\
Use 'stockdash <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Use deterministic fixture data and canned commentary (no network).
    #[arg(long, global = true, default_value_t = false)]
    pub offline: bool,

    /// Config file to load instead of searching the default locations.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    ///
    /// `RUST_LOG` takes precedence when set.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON envelope.
    Json,
    /// Human-readable text with aligned tables.
    Table,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the dashboard views in menu order.
    Menu,

    /// Render one dashboard view.
    ///
    /// # Examples
    ///
    ///   stockdash view stock --symbol AAPL
    ///   stockdash view "Risk Alerts" --symbols AAPL,TSLA
    ///   stockdash view rebalance --tolerance 0.02
    View(ViewCommand),

    /// Serve the web dashboard and JSON API.
    Serve(ServeArgs),

    /// Inspect configuration.
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct ViewCommand {
    /// Menu slug or label (e.g. `stock`, `"ETF Recommender"`).
    pub item: String,

    #[command(flatten)]
    pub args: ViewFlags,
}

/// View arguments; anything omitted falls back to configuration.
#[derive(Debug, Default, Args)]
pub struct ViewFlags {
    /// Ticker for the individual stock view.
    #[arg(long)]
    pub symbol: Option<String>,

    /// Comma-separated tickers for multi-symbol views.
    #[arg(long)]
    pub symbols: Option<String>,

    /// First date of the range (YYYY-MM-DD).
    #[arg(long)]
    pub start: Option<String>,

    /// Last date of the range (YYYY-MM-DD), defaults to today.
    #[arg(long)]
    pub end: Option<String>,

    /// Bar interval: 1h, 1d, 1wk or 1mo.
    #[arg(long)]
    pub interval: Option<String>,

    /// Append AI commentary (stock and etf views).
    #[arg(long, default_value_t = false)]
    pub commentary: bool,

    /// Scanner filter: all, oversold, overbought, above-trend, below-trend.
    #[arg(long)]
    pub filter: Option<String>,

    /// Scanner sort key: change, rsi, volume, symbol.
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending.
    #[arg(long, conflicts_with = "asc")]
    pub desc: bool,

    /// Sort ascending.
    #[arg(long)]
    pub asc: bool,

    /// ETF risk profile: conservative, balanced, aggressive.
    #[arg(long)]
    pub profile: Option<String>,

    /// Number of ETFs to recommend.
    #[arg(long)]
    pub top: Option<usize>,

    /// Benchmark ticker for the return tracker.
    #[arg(long)]
    pub benchmark: Option<String>,

    /// Rebalance drift tolerance as a fraction (0.05 = 5%).
    #[arg(long)]
    pub tolerance: Option<f64>,
}

impl From<&ViewFlags> for ViewArgs {
    fn from(flags: &ViewFlags) -> Self {
        let desc = match (flags.desc, flags.asc) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        Self {
            symbol: flags.symbol.clone(),
            symbols: flags.symbols.clone(),
            start: flags.start.clone(),
            end: flags.end.clone(),
            interval: flags.interval.clone(),
            commentary: flags.commentary.then_some(true),
            filter: flags.filter.clone(),
            sort: flags.sort.clone(),
            desc,
            profile: flags.profile.clone(),
            top: flags.top,
            benchmark: flags.benchmark.clone(),
            tolerance: flags.tolerance,
        }
    }
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to bind, defaults to `server.bind` from config.
    #[arg(long)]
    pub bind: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration.
    Show,
    /// List the config search paths and which one was loaded.
    Paths,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn view_flags_map_onto_view_args() {
        let cli = Cli::parse_from([
            "stockdash",
            "view",
            "scanner",
            "--sort",
            "rsi",
            "--asc",
            "--commentary",
            "--top",
            "3",
        ]);
        let Command::View(view) = cli.command else {
            panic!("expected view command");
        };
        let args = ViewArgs::from(&view.args);

        assert_eq!(view.item, "scanner");
        assert_eq!(args.sort.as_deref(), Some("rsi"));
        assert_eq!(args.desc, Some(false));
        assert_eq!(args.commentary, Some(true));
        assert_eq!(args.top, Some(3));
        assert_eq!(args.symbol, None);
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::parse_from(["stockdash", "menu", "--offline", "--format", "table", "-vv"]);
        assert!(cli.offline);
        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.verbose, 2);
    }
}
