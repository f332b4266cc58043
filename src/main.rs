use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{info, warn};

use newslens::config::{parse_tickers, Config};
use newslens::stats::dates::Frequency;

/// newslens: topic modeling and exploratory analysis for financial news.
///
/// Extracts the recurring themes in analyst headlines for a set of tickers,
/// summarizes who publishes and when, and computes technical indicators for
/// historical price files.
#[derive(Parser)]
#[command(name = "newslens", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract headline topics for a set of tickers
    Topics {
        /// News CSV (defaults to NEWSLENS_DATA_PATH)
        #[arg(long)]
        data: Option<PathBuf>,

        /// Comma-separated ticker allow-list (defaults to NEWSLENS_TICKERS)
        #[arg(long)]
        tickers: Option<String>,

        /// Number of topics
        #[arg(long)]
        topics: Option<usize>,

        /// Keywords shown per topic
        #[arg(long)]
        top_n: Option<usize>,

        /// Random seed for the topic model
        #[arg(long)]
        seed: Option<u64>,

        /// Gibbs sampling sweeps
        #[arg(long)]
        iterations: Option<usize>,

        /// Also write the run summary as JSON to this path
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Headline length, publisher, and publication-date statistics
    Headlines {
        /// News CSV (defaults to NEWSLENS_DATA_PATH)
        #[arg(long)]
        data: Option<PathBuf>,

        /// Only include these comma-separated tickers (default: all rows)
        #[arg(long)]
        tickers: Option<String>,

        /// Number of publishers to list (default: 10)
        #[arg(long, default_value = "10")]
        top: usize,

        /// Resampling for the articles-over-time chart: daily, weekly or monthly
        #[arg(long, default_value = "monthly")]
        frequency: Frequency,
    },

    /// Compute SMA, RSI and MACD for historical price files
    Indicators {
        /// One or more price CSVs (Date, Open, High, Low, Close, Volume)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Number of most recent bars to show (default: 15)
        #[arg(long, default_value = "15")]
        rows: usize,
    },
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("newslens=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Topics {
            data,
            tickers,
            topics,
            top_n,
            seed,
            iterations,
            json,
        } => {
            let config = Config::load()?;
            let topic_config = newslens::topics::pipeline::TopicConfig::new(
                data.unwrap_or(config.data_path),
                tickers
                    .as_deref()
                    .map(parse_tickers)
                    .unwrap_or(config.tickers),
            )
            .n_topics(topics.unwrap_or(config.n_topics))
            .top_n(top_n.unwrap_or(config.top_n))
            .seed(seed.unwrap_or(config.seed))
            .iterations(iterations.unwrap_or(config.iterations))
            .show_progress(true);

            println!(
                "Extracting {} topics for {}...",
                topic_config.n_topics,
                topic_config.tickers.join(", ")
            );

            let Some(run) = newslens::topics::pipeline::run(&topic_config) else {
                anyhow::bail!("Topic extraction produced no result (see the error above)");
            };

            newslens::output::terminal::display_topics(&run);

            if let Some(path) = json {
                newslens::output::write_json(&run.summary(), &path)?;
                println!("{}", format!("Run summary saved to: {}", path.display()).bold());
            }
        }

        Commands::Headlines {
            data,
            tickers,
            top,
            frequency,
        } => {
            let config = Config::load()?;
            let path = data.unwrap_or(config.data_path);

            let mut records = newslens::news::records::load_records(&path)?;
            if let Some(list) = tickers.as_deref() {
                records = newslens::news::filter::filter_by_tickers(records, &parse_tickers(list))?;
            }
            println!("Analyzing {} headlines from {}...", records.len(), path.display());

            let lengths: Vec<f64> = newslens::stats::headlines::headline_lengths(&records)
                .into_iter()
                .map(|n| n as f64)
                .collect();
            let summary = newslens::stats::headlines::describe(&lengths);
            newslens::output::terminal::display_length_summary(summary.as_ref());

            let publishers = newslens::stats::publishers::articles_per_publisher(&records);
            newslens::output::terminal::display_publishers(&publishers, top);

            let breakdown = newslens::stats::dates::breakdown(&records);
            if breakdown.undated > 0 {
                warn!(
                    undated = breakdown.undated,
                    "Skipping records without a usable publication date"
                );
            }
            newslens::output::terminal::display_date_breakdown(&breakdown);

            let series = newslens::stats::dates::articles_over_time(&records, frequency);
            newslens::output::terminal::display_time_series(&series, frequency);
        }

        Commands::Indicators { files, rows } => {
            for path in &files {
                let name = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());

                match newslens::stocks::prices::load_prices(path) {
                    Ok(bars) => {
                        let table = newslens::stocks::indicators::compute_indicators(&bars);
                        newslens::output::terminal::display_indicators(&name, &table, rows);
                    }
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Skipping price file");
                        println!("  {} {}: {:#}", "Warning:".yellow(), name, e);
                    }
                }
            }
            info!(files = files.len(), "Indicator analysis complete");
        }
    }

    Ok(())
}
