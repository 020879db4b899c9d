//! CLI entry point for the openrank racing bar chart tool.
//!
//! Provides subcommands for sweeping monthly openrank snapshots into a series,
//! composing a single frame's chart config, and composing a whole race.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use openrank_race::{
    aggregate::{AggregatedSeries, MonthRange, month_grid},
    chart::ChartComposer,
    colors::{CachedColorResolver, PaletteColorResolver},
    config::{RaceOptions, Settings, ThemeMode},
    fetch::{BasicClient, OpenRankSource},
    frame::build_frame,
    output::{append_frame, read_json, write_json},
    race::compose_race,
    sweep::sweep,
};
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const COLOR_CACHE_CAPACITY: u64 = 10_000;

#[derive(Parser)]
#[command(name = "openrank_race")]
#[command(about = "Monthly openrank rankings as a racing bar chart", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch monthly snapshots and write the grouped series as JSON
    Sweep {
        #[command(flatten)]
        months: MonthArgs,

        /// JSON file to write the series to
        #[arg(short, long, default_value = "series.json")]
        output: String,
    },
    /// Compose the chart config of one month from a saved series
    Frame {
        /// Series JSON written by `sweep`
        #[arg(short, long, default_value = "series.json")]
        series: String,

        /// Month to render (YYYY-MM)
        #[arg(short, long)]
        period: String,

        #[command(flatten)]
        chart: ChartArgs,

        /// JSON file to write the chart config to
        #[arg(short, long, default_value = "frame.json")]
        output: String,

        /// Optional: CSV file to append the ranked rows to
        #[arg(long)]
        csv: Option<String>,
    },
    /// Fetch a month range and compose one chart config per month
    Race {
        #[command(flatten)]
        months: MonthArgs,

        #[command(flatten)]
        chart: ChartArgs,

        /// JSON file to write the frames to
        #[arg(short, long, default_value = "race.json")]
        output: String,
    },
}

#[derive(Args)]
struct MonthArgs {
    /// First month (YYYY-MM)
    #[arg(long, value_name = "YYYY-MM", conflicts_with_all = ["years", "months"])]
    from: Option<String>,

    /// Last month (YYYY-MM), defaults to --from
    #[arg(long, value_name = "YYYY-MM", requires = "from")]
    to: Option<String>,

    /// Comma-separated years, combined with every entry of --months
    #[arg(long, value_delimiter = ',', requires = "months")]
    years: Vec<String>,

    /// Comma-separated zero-padded months, e.g. 01,02,03
    #[arg(long, value_delimiter = ',', requires = "years")]
    months: Vec<String>,

    /// Maximum number of concurrent month downloads
    #[arg(short, long, default_value_t = 4)]
    concurrency: usize,
}

impl MonthArgs {
    fn resolve(&self) -> Result<Vec<(String, String)>> {
        if let Some(from) = &self.from {
            let to = self.to.as_deref().unwrap_or(from.as_str());
            return Ok(MonthRange::parse(from, to)?.months());
        }
        if self.years.is_empty() || self.months.is_empty() {
            bail!("either --from or both --years and --months must be given");
        }
        Ok(month_grid(&self.years, &self.months))
    }
}

#[derive(Args)]
struct ChartArgs {
    /// Playback multiplier
    #[arg(long, default_value_t = 1.0)]
    speed: f64,

    /// Number of visible bars
    #[arg(long, default_value_t = 10)]
    max_bars: usize,

    /// Disable transition animations
    #[arg(long, default_value_t = false)]
    no_animation: bool,

    #[arg(long, value_enum, default_value_t = ThemeMode::Light)]
    theme: ThemeMode,
}

impl ChartArgs {
    fn options(&self) -> Result<RaceOptions> {
        Ok(RaceOptions::new(
            self.speed,
            self.max_bars,
            !self.no_animation,
        )?)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/openrank_race.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("openrank_race.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env()?;

    match cli.command {
        Commands::Sweep { months, output } => {
            let series = fetch_series(&settings, &months).await?;
            write_json(&output, &series)?;
            info!(output = %output, periods = series.len(), "Series written");
        }
        Commands::Frame {
            series,
            period,
            chart,
            output,
            csv,
        } => {
            let options = chart.options()?;
            let loaded: AggregatedSeries =
                read_json(&series).with_context(|| format!("failed to load series {series}"))?;
            if !loaded.contains(&period) {
                warn!(period = %period, "Period not in series, composing an empty frame");
            }

            let frame = build_frame(&loaded, &period, options.max_bars, &PaletteColorResolver).await?;
            let config = ChartComposer::new(settings.avatar_base_url.as_str()).compose(
                &frame,
                &period,
                options.speed,
                options.enable_animation,
                chart.theme,
            )?;

            write_json(&output, &config)?;
            if let Some(csv) = csv {
                append_frame(&csv, &frame)?;
            }
            info!(output = %output, period = %period, bars = frame.len(), "Frame written");
        }
        Commands::Race {
            months,
            chart,
            output,
        } => {
            // Validate before spending time on the network.
            let options = chart.options()?;
            let series = fetch_series(&settings, &months).await?;

            let resolver = CachedColorResolver::new(PaletteColorResolver, COLOR_CACHE_CAPACITY);
            let composer = ChartComposer::new(settings.avatar_base_url.as_str());
            let frames = compose_race(&series, &options, chart.theme, &resolver, &composer).await?;

            write_json(&output, &frames)?;
            info!(output = %output, frames = frames.len(), "Race written");
        }
    }

    Ok(())
}

/// Sweeps the requested months; Ctrl+C abandons the months still in flight.
async fn fetch_series(settings: &Settings, args: &MonthArgs) -> Result<AggregatedSeries> {
    let months = args.resolve()?;
    let client = BasicClient::with_timeout(settings.request_timeout)?;
    let source = Arc::new(OpenRankSource::new(
        client,
        settings.openrank_base_url.as_str(),
    ));

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling remaining months");
            ctrl_c.cancel();
        }
    });

    let report = sweep(source, &months, args.concurrency, &cancel).await;
    if !report.cancelled.is_empty() {
        warn!(
            cancelled = report.cancelled.len(),
            "Sweep interrupted, series is partial"
        );
    }

    Ok(report.series)
}
