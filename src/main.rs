//! CLI entry point for the glucose dashboard.
//!
//! Loads the tracker workbook and emits the cleaned table, headline summary
//! and severity breakdowns as JSON or CSV for the presentation layer.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use glucose_dashboard::{
    aggregate::Horizon,
    config::DashboardConfig,
    dashboard::load_dashboard,
    output::{print_json, print_pretty, write_json, write_long_csv, write_readings_csv},
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "glucose_dashboard")]
#[command(about = "Summarize a blood glucose tracker workbook", long_about = None)]
struct Cli {
    /// JSON config file (sheet name, skipped rows, severity scheme)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the headline glucose means and deltas as JSON
    Summary {
        /// Tracker workbook (.xlsx, .xls, .ods)
        #[arg(value_name = "FILE")]
        source: PathBuf,
    },
    /// Write readings, summary and one horizon's breakdown as JSON
    Report {
        /// Tracker workbook (.xlsx, .xls, .ods)
        #[arg(value_name = "FILE")]
        source: PathBuf,

        /// Time horizon for the bucket breakdown
        #[arg(long, value_enum, default_value_t = HorizonArg::All)]
        horizon: HorizonArg,

        /// File to write to instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Export the cleaned table, or the classified long form, as CSV
    Export {
        /// Tracker workbook (.xlsx, .xls, .ods)
        #[arg(value_name = "FILE")]
        source: PathBuf,

        /// CSV file to write
        #[arg(short, long, default_value = "readings.csv")]
        output: PathBuf,

        /// Export one row per classified glucose value
        #[arg(long, default_value_t = false)]
        long: bool,

        /// Time horizon for the long form
        #[arg(long, value_enum, default_value_t = HorizonArg::All)]
        horizon: HorizonArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum HorizonArg {
    All,
    Last30,
    Last7,
}

impl From<HorizonArg> for Horizon {
    fn from(arg: HorizonArg) -> Self {
        match arg {
            HorizonArg::All => Horizon::All,
            HorizonArg::Last30 => Horizon::Last30Days,
            HorizonArg::Last7 => Horizon::Last7Days,
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/glucose_dashboard.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("glucose_dashboard.log"));

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

    let config = match &cli.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };

    match cli.command {
        Commands::Summary { source } => {
            let dashboard = load(&source, &config)?;
            let summary = dashboard.summary();
            print_pretty(summary);

            info!(
                days = summary.day_count,
                reading_slots = summary.reading_slots,
                first_date = summary.first_date.as_deref().unwrap_or("-"),
                diff_all = ?summary.diff_all,
                diff_30 = ?summary.diff_30,
                "Summary"
            );
            print_json(summary)?;
        }
        Commands::Report {
            source,
            horizon,
            out,
        } => {
            let dashboard = load(&source, &config)?;
            let report = dashboard.report(horizon.into());

            match out {
                Some(path) => write_json(&path, &report)?,
                None => print_json(&report)?,
            }
        }
        Commands::Export {
            source,
            output,
            long,
            horizon,
        } => {
            let dashboard = load(&source, &config)?;

            let rows = if long {
                let breakdown = dashboard.breakdown(horizon.into());
                write_long_csv(&output, &breakdown.readings)?
            } else {
                write_readings_csv(&output, dashboard.readings())?
            };

            info!(rows, output = %output.display(), "Export complete");
        }
    }

    Ok(())
}

fn load(source: &Path, config: &DashboardConfig) -> Result<glucose_dashboard::dashboard::Dashboard> {
    load_dashboard(source, config)
        .with_context(|| format!("could not build dashboard from {}", source.display()))
}
