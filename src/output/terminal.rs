// Colored terminal output for topics, headline statistics and indicators.
//
// Everything here is a sink: it formats already-computed results and prints
// them. main.rs calls into these functions after each command finishes.

use chrono::NaiveDate;
use colored::Colorize;

use crate::stats::dates::{DateBreakdown, Frequency, MONTH_NAMES, WEEKDAY_NAMES};
use crate::stats::headlines::Summary;
use crate::stats::publishers::PublisherCount;
use crate::stocks::indicators::IndicatorRow;
use crate::topics::pipeline::TopicRun;

const BAR_WIDTH: usize = 30;

/// Render a horizontal bar scaled against `max`.
fn bar(value: usize, max: usize) -> String {
    let filled = if max == 0 {
        0
    } else {
        ((value as f64 / max as f64) * BAR_WIDTH as f64).round() as usize
    };
    format!(
        "{}{}",
        "█".repeat(filled),
        " ".repeat(BAR_WIDTH.saturating_sub(filled))
    )
}

/// Display the keywords of every topic.
pub fn display_topics(run: &TopicRun) {
    println!(
        "\n{}",
        format!(
            "=== {} topics from {} headlines ({} of {} records matched) ===",
            run.topics.len(),
            run.matrix.n_documents(),
            run.filtered_records,
            run.total_records
        )
        .bold()
    );
    println!(
        "{}",
        format!(
            "  Vocabulary: {} terms, {} non-zero cells",
            run.vocabulary.len(),
            run.matrix.nnz()
        )
        .dimmed()
    );

    let prevalence = run.weights.prevalence();
    for (topic, share) in run.topics.iter().zip(prevalence) {
        println!(
            "\n  {} {}",
            format!("{}:", topic.label).bold(),
            format!("({:.0}% of tokens)", share * 100.0).dimmed()
        );
        println!("    {}", topic.keywords.join(", ").bright_green());
    }
    println!();
}

/// Display descriptive statistics for headline lengths.
pub fn display_length_summary(summary: Option<&Summary>) {
    println!("\n{}", "=== Headline Length (words) ===".bold());
    let Some(s) = summary else {
        println!("  No headlines to summarize.");
        return;
    };

    let std = s
        .std
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "n/a".to_string());
    println!("  {:<8} {:>10}", "count", s.count);
    println!("  {:<8} {:>10.2}", "mean", s.mean);
    println!("  {:<8} {:>10}", "std", std);
    println!("  {:<8} {:>10.2}", "min", s.min);
    println!("  {:<8} {:>10.2}", "25%", s.q25);
    println!("  {:<8} {:>10.2}", "50%", s.median);
    println!("  {:<8} {:>10.2}", "75%", s.q75);
    println!("  {:<8} {:>10.2}", "max", s.max);
}

/// Display the top publishers as a bar chart.
pub fn display_publishers(counts: &[PublisherCount], top: usize) {
    println!(
        "\n{}",
        format!("=== Top {} Publishers ===", top.min(counts.len())).bold()
    );
    if counts.is_empty() {
        println!("  No publisher information in this dataset.");
        return;
    }

    let max = counts.first().map(|c| c.articles).unwrap_or(0);
    for (i, c) in counts.iter().take(top).enumerate() {
        println!(
            "  {:>2}. {:<32} {} {}",
            i + 1,
            super::truncate_chars(&c.publisher, 29),
            bar(c.articles, max).bright_blue(),
            c.articles
        );
    }
}

fn display_histogram(title: &str, rows: impl Iterator<Item = (String, usize)>) {
    let rows: Vec<(String, usize)> = rows.collect();
    let max = rows.iter().map(|(_, n)| *n).max().unwrap_or(0);
    println!("\n{}", title.bold());
    for (label, n) in &rows {
        println!("  {:<10} {} {}", label, bar(*n, max).bright_yellow(), n);
    }
}

/// Display articles by weekday, month and hour.
pub fn display_date_breakdown(b: &DateBreakdown) {
    println!(
        "\n{}",
        format!(
            "=== Publication Dates ({} dated, {} without a usable date) ===",
            b.dated, b.undated
        )
        .bold()
    );

    display_histogram(
        "Articles by day of week",
        WEEKDAY_NAMES
            .iter()
            .zip(b.by_weekday)
            .map(|(name, n)| (name.to_string(), n)),
    );
    display_histogram(
        "Articles by month",
        MONTH_NAMES
            .iter()
            .zip(b.by_month)
            .map(|(name, n)| (name.to_string(), n)),
    );
    display_histogram(
        "Articles by hour",
        b.by_hour
            .iter()
            .enumerate()
            .map(|(hour, &n)| (format!("{hour:02}:00"), n)),
    );
}

/// Display article counts over time.
pub fn display_time_series(series: &[(NaiveDate, usize)], frequency: Frequency) {
    display_histogram(
        &format!("Articles over time ({frequency})"),
        series.iter().map(|(d, n)| (d.to_string(), *n)),
    );
}

/// RSI right-aligned to 7 columns, red when overbought and green when oversold.
/// Padding is applied before coloring so escape codes don't count as width.
fn rsi_cell(rsi: Option<f64>) -> String {
    let text = format!(
        "{:>7}",
        rsi.map(|v| format!("{v:.1}")).unwrap_or_else(|| "-".into())
    );
    match rsi {
        Some(v) if v >= 70.0 => text.red().to_string(),
        Some(v) if v <= 30.0 => text.green().to_string(),
        _ => text,
    }
}

/// MACD right-aligned to 9 columns, green above the signal line.
fn macd_cell(macd: f64, signal: f64) -> String {
    let text = format!("{macd:>9.3}");
    if macd >= signal {
        text.green().to_string()
    } else {
        text.red().to_string()
    }
}

/// Display the last `rows` bars of an indicator table.
pub fn display_indicators(name: &str, table: &[IndicatorRow], rows: usize) {
    println!("\n{}", format!("=== {name} ===").bold());
    if table.is_empty() {
        println!("  No price data.");
        return;
    }

    println!(
        "  {:<10} {:>10} {:>10} {:>10} {:>7} {:>9} {:>9}",
        "Date".dimmed(),
        "Close".dimmed(),
        "SMA 20".dimmed(),
        "SMA 50".dimmed(),
        "RSI".dimmed(),
        "MACD".dimmed(),
        "Signal".dimmed(),
    );
    println!("  {}", "-".repeat(72).dimmed());

    let fmt = |v: Option<f64>| v.map(|x| format!("{x:.2}")).unwrap_or_else(|| "-".into());
    let start = table.len().saturating_sub(rows);
    for row in &table[start..] {
        let rsi = rsi_cell(row.rsi);
        let macd = macd_cell(row.macd, row.signal_line);
        println!(
            "  {:<10} {:>10.2} {:>10} {:>10} {} {} {:>9.3}",
            row.date.to_string(),
            row.close,
            fmt(row.sma_20),
            fmt(row.sma_50),
            rsi,
            macd,
            row.signal_line,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drop ANSI SGR sequences, leaving what the terminal would show.
    fn visible(cell: &str) -> String {
        let mut out = String::new();
        let mut chars = cell.chars();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn test_indicator_cells_have_fixed_visible_width() {
        colored::control::set_override(true);
        let cells = [
            rsi_cell(Some(72.4)),
            rsi_cell(Some(25.0)),
            rsi_cell(Some(50.0)),
            rsi_cell(None),
            macd_cell(1.25, 0.5),
            macd_cell(-0.125, 0.5),
        ];
        colored::control::unset_override();

        assert!(cells[0].contains('\x1b'));
        assert_eq!(visible(&cells[0]), "   72.4");
        assert_eq!(visible(&cells[1]), "   25.0");
        assert_eq!(visible(&cells[2]), "   50.0");
        assert_eq!(visible(&cells[3]), "      -");
        assert_eq!(visible(&cells[4]), "    1.250");
        assert_eq!(visible(&cells[5]), "   -0.125");
    }

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(0, 0).chars().filter(|&c| c == '█').count(), 0);
        assert_eq!(bar(5, 10).chars().filter(|&c| c == '█').count(), 15);
        assert_eq!(bar(10, 10).chars().count(), BAR_WIDTH);
    }
}
