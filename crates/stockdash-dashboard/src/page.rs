//! Serializable page model produced by every view.
//!
//! A [`Page`] is an ordered list of [`Widget`]s. Hosts decide how to draw
//! them; the web page turns charts into SVG, the CLI prints tables and
//! sparklines.

use serde::{Deserialize, Serialize};
use stockdash_ai::Commentary;
use stockdash_core::{Bar, Interval, UtcDateTime};

use crate::MenuItem;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub view: MenuItem,
    pub title: String,
    pub widgets: Vec<Widget>,
}

impl Page {
    pub fn new(view: MenuItem, title: impl Into<String>) -> Self {
        Self {
            view,
            title: title.into(),
            widgets: Vec::new(),
        }
    }

    pub fn push(&mut self, widget: impl Into<Widget>) {
        self.widgets.push(widget.into());
    }

    pub fn charts(&self) -> impl Iterator<Item = &Chart> {
        self.widgets.iter().filter_map(|widget| match widget {
            Widget::Chart(chart) => Some(chart),
            _ => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.widgets.iter().filter_map(|widget| match widget {
            Widget::Table(table) => Some(table),
            _ => None,
        })
    }

    pub fn alerts(&self) -> impl Iterator<Item = &Alert> {
        self.widgets.iter().filter_map(|widget| match widget {
            Widget::Alert(alert) => Some(alert),
            _ => None,
        })
    }

    pub fn commentary(&self) -> Option<&Commentary> {
        self.widgets.iter().find_map(|widget| match widget {
            Widget::Commentary(commentary) => Some(commentary),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Widget {
    Heading { text: String },
    Text { text: String },
    Metric(Metric),
    Table(Table),
    Chart(Chart),
    Alert(Alert),
    Commentary(Commentary),
}

impl Widget {
    pub fn heading(text: impl Into<String>) -> Self {
        Self::Heading { text: text.into() }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

impl From<Metric> for Widget {
    fn from(metric: Metric) -> Self {
        Self::Metric(metric)
    }
}

impl From<Table> for Widget {
    fn from(table: Table) -> Self {
        Self::Table(table)
    }
}

impl From<Chart> for Widget {
    fn from(chart: Chart) -> Self {
        Self::Chart(chart)
    }
}

impl From<Alert> for Widget {
    fn from(alert: Alert) -> Self {
        Self::Alert(alert)
    }
}

impl From<Commentary> for Widget {
    fn from(commentary: Commentary) -> Self {
        Self::Commentary(commentary)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Neutral,
    Positive,
    Negative,
}

impl Tone {
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Self::Positive
        } else if value < 0.0 {
            Self::Negative
        } else {
            Self::Neutral
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<String>,
    #[serde(default)]
    pub tone: Tone,
}

impl Metric {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            delta: None,
            tone: Tone::Neutral,
        }
    }

    pub fn with_delta(mut self, delta: impl Into<String>, tone: Tone) -> Self {
        self.delta = Some(delta.into());
        self.tone = tone;
        self
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(title: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Cells of the named column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.columns.iter().position(|column| column == name)?;
        Some(
            self.rows
                .iter()
                .filter_map(|row| row.get(index).map(String::as_str))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Candlestick,
    Bar,
}

/// Vertical pane a series is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pane {
    Price,
    Oscillator,
    Volume,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesStyle {
    Line,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub pane: Pane,
    pub style: SeriesStyle,
    /// One value per x label; `None` leaves a gap.
    pub values: Vec<Option<f64>>,
}

impl ChartSeries {
    pub fn line(name: impl Into<String>, pane: Pane, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            pane,
            style: SeriesStyle::Line,
            values,
        }
    }

    pub fn bars(name: impl Into<String>, pane: Pane, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            pane,
            style: SeriesStyle::Bar,
            values,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl From<&Bar> for Candle {
    fn from(bar: &Bar) -> Self {
        Self {
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub title: String,
    pub kind: ChartKind,
    /// Date labels for time charts, category names for bar charts.
    pub x: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candles: Vec<Candle>,
    pub series: Vec<ChartSeries>,
}

impl Chart {
    pub fn new(title: impl Into<String>, kind: ChartKind, x: Vec<String>) -> Self {
        Self {
            title: title.into(),
            kind,
            x,
            candles: Vec::new(),
            series: Vec::new(),
        }
    }

    pub fn with_candles(mut self, candles: Vec<Candle>) -> Self {
        self.candles = candles;
        self
    }

    pub fn with_series(mut self, series: ChartSeries) -> Self {
        self.series.push(series);
        self
    }

    pub fn series_named(&self, name: &str) -> Option<&ChartSeries> {
        self.series.iter().find(|series| series.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(level: AlertLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// X-axis label for a bar timestamp; intraday bars keep the time of day.
pub fn time_label(ts: UtcDateTime, interval: Interval) -> String {
    match interval {
        Interval::OneHour => ts.format_rfc3339(),
        _ => ts.format_date(),
    }
}

pub fn fmt_price(value: f64) -> String {
    format!("{value:.2}")
}

/// Signed percentage of a fraction: `0.0123` becomes `+1.23%`.
pub fn fmt_change(value: f64) -> String {
    format!("{:+.2}%", value * 100.0)
}

pub fn fmt_percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

pub fn fmt_opt(value: Option<f64>, format: fn(f64) -> String) -> String {
    value.map_or_else(|| "-".to_owned(), format)
}

/// Integer with thousands separators.
pub fn fmt_volume(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
