use std::io::{self, Write};

use stockdash_core::Envelope;
use stockdash_dashboard::page::{Chart, Metric, Table};
use stockdash_dashboard::{AlertLevel, MenuEntry, Page, Widget};

use crate::cli::OutputFormat;
use crate::commands::CommandData;
use crate::error::CliError;

const SPARK_WIDTH: usize = 40;
const SPARKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

pub fn render(
    envelope: &Envelope<CommandData>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Table => render_text(&mut out, envelope)?,
    }
    Ok(())
}

fn render_text(out: &mut impl Write, envelope: &Envelope<CommandData>) -> Result<(), CliError> {
    for warning in &envelope.meta.warnings {
        writeln!(out, "note: {warning}")?;
    }
    match &envelope.data {
        CommandData::Menu(entries) => write_menu(out, entries)?,
        CommandData::Page(page) => write_page(out, page)?,
        CommandData::Config {
            loaded_from,
            config,
        } => {
            match loaded_from {
                Some(path) => writeln!(out, "# loaded from {}", path.display())?,
                None => writeln!(out, "# built-in defaults")?,
            }
            write!(out, "{}", config.to_toml_string()?)?;
        }
        CommandData::Paths {
            loaded_from,
            search_paths,
        } => {
            for path in search_paths {
                let marker = if loaded_from.as_ref() == Some(path) { "*" } else { " " };
                writeln!(out, "{marker} {}", path.display())?;
            }
        }
    }
    writeln!(
        out,
        "\nrequest {} | {} ms | {}",
        envelope.meta.request_id,
        envelope.meta.latency_ms,
        envelope
            .meta
            .source_chain
            .iter()
            .map(|source| source.as_str())
            .collect::<Vec<_>>()
            .join(",")
    )?;
    Ok(())
}

fn write_menu(out: &mut impl Write, entries: &[MenuEntry]) -> io::Result<()> {
    let table = Table {
        title: String::from("Menu"),
        columns: vec!["Slug".into(), "View".into(), "AI".into(), "Description".into()],
        rows: entries
            .iter()
            .map(|entry| {
                vec![
                    entry.slug.to_owned(),
                    entry.label.to_owned(),
                    if entry.commentary { "yes" } else { "" }.to_owned(),
                    entry.description.to_owned(),
                ]
            })
            .collect(),
    };
    write_table(out, &table)
}

fn write_page(out: &mut impl Write, page: &Page) -> io::Result<()> {
    writeln!(out, "{}", page.title)?;
    writeln!(out, "{}", "=".repeat(page.title.chars().count()))?;
    for widget in &page.widgets {
        match widget {
            Widget::Heading { text } => writeln!(out, "\n## {text}")?,
            Widget::Text { text } => writeln!(out, "{text}")?,
            Widget::Metric(metric) => write_metric(out, metric)?,
            Widget::Table(table) => write_table(out, table)?,
            Widget::Chart(chart) => write_chart(out, chart)?,
            Widget::Alert(alert) => {
                let tag = match alert.level {
                    AlertLevel::Info => "INFO",
                    AlertLevel::Warning => "WARN",
                    AlertLevel::Critical => "CRIT",
                };
                writeln!(out, "[{tag}] {}: {}", alert.title, alert.message)?;
            }
            Widget::Commentary(commentary) => {
                writeln!(out, "\nCommentary ({}):", commentary.model)?;
                for line in commentary.text.lines() {
                    writeln!(out, "  {line}")?;
                }
            }
        }
    }
    Ok(())
}

fn write_metric(out: &mut impl Write, metric: &Metric) -> io::Result<()> {
    match &metric.delta {
        Some(delta) => writeln!(out, "{:<16} {} ({delta})", metric.label, metric.value),
        None => writeln!(out, "{:<16} {}", metric.label, metric.value),
    }
}

fn write_table(out: &mut impl Write, table: &Table) -> io::Result<()> {
    let mut widths: Vec<usize> = table.columns.iter().map(|col| col.chars().count()).collect();
    for row in &table.rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_owned()
    };

    writeln!(out, "\n{}", table.title)?;
    writeln!(out, "{}", line(&table.columns))?;
    writeln!(
        out,
        "{}",
        widths.iter().map(|width| "-".repeat(*width)).collect::<Vec<_>>().join("  ")
    )?;
    if table.rows.is_empty() {
        writeln!(out, "(no rows)")?;
    }
    for row in &table.rows {
        writeln!(out, "{}", line(row))?;
    }
    Ok(())
}

fn write_chart(out: &mut impl Write, chart: &Chart) -> io::Result<()> {
    writeln!(out, "\n{}", chart.title)?;
    if let (Some(first), Some(last)) = (chart.x.first(), chart.x.last()) {
        writeln!(out, "  {first} .. {last}")?;
    }
    if !chart.candles.is_empty() {
        let closes: Vec<Option<f64>> = chart.candles.iter().map(|candle| Some(candle.close)).collect();
        writeln!(out, "  {:<18} {}", "Close", sparkline(&closes))?;
    }
    for series in &chart.series {
        writeln!(out, "  {:<18} {}", series.name, sparkline(&series.values))?;
    }
    Ok(())
}

/// Last `SPARK_WIDTH` values as block characters; gaps render as spaces.
fn sparkline(values: &[Option<f64>]) -> String {
    let tail = &values[values.len().saturating_sub(SPARK_WIDTH)..];
    let finite = tail.iter().flatten().copied().filter(|value| value.is_finite());
    let (lo, hi) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), value| {
        (lo.min(value), hi.max(value))
    });
    let span = hi - lo;
    tail.iter()
        .map(|value| match value {
            Some(value) if value.is_finite() => {
                let level = if span > 0.0 {
                    ((value - lo) / span * (SPARKS.len() - 1) as f64).round() as usize
                } else {
                    SPARKS.len() / 2
                };
                SPARKS[level.min(SPARKS.len() - 1)]
            }
            _ => ' ',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparkline_spans_min_to_max() {
        let line = sparkline(&[Some(1.0), None, Some(5.0), Some(3.0)]);
        assert_eq!(line, "▁ █▅");
    }

    #[test]
    fn flat_sparkline_sits_mid_height() {
        assert_eq!(sparkline(&[Some(2.0), Some(2.0)]), "▅▅");
    }

    #[test]
    fn tables_are_column_aligned() {
        let mut table = Table::new("Scan", ["Symbol", "RSI"]);
        table.push_row(vec!["NVDA".into(), "71.20".into()]);
        table.push_row(vec!["T".into(), "8.00".into()]);

        let mut buffer = Vec::new();
        write_table(&mut buffer, &table).expect("write");
        let text = String::from_utf8(buffer).expect("utf-8");

        assert!(text.contains("Symbol  RSI"));
        assert!(text.contains("NVDA    71.20"));
        assert!(text.contains("T       8.00"));
    }
}
