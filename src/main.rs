//! CLI entry point for the bikeshare statistics tool.
//!
//! Provides subcommands for a one-shot report, an interactive session, and
//! listing the configured datasets.

use std::ffi::OsStr;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use anyhow::Result;
use bikeshare_stats::{
    config::DatasetCatalog,
    filter::{DayFilter, MonthFilter},
    output::{append_summary, print_pretty, render, to_json},
    pipeline,
    prompt::Prompter,
    sample::{raw_sample, render_rows},
};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_stats")]
#[command(about = "Descriptive statistics for bike-share trip logs", long_about = None)]
struct Cli {
    /// Directory containing the trip CSV files [env: BIKESHARE_DATA_DIR]
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// JSON file mapping dataset names to CSV files (replaces the defaults)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute statistics for one dataset and print them
    Report {
        /// Dataset to analyse, e.g. "chicago"
        #[arg(short, long)]
        city: String,

        /// Month filter: all, january … june
        #[arg(short, long, default_value = "all")]
        month: MonthFilter,

        /// Weekday filter: all, mon … sun
        #[arg(short, long, default_value = "all")]
        day: DayFilter,

        /// Print the report as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,

        /// CSV file to append a summary row to
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also print this many random raw records
        #[arg(short, long, default_value_t = 0)]
        samples: usize,
    },
    /// Ask for city, month and day interactively
    Interactive,
    /// List configured datasets and whether their files exist
    ListDatasets,
}

/// Reads `var` like `RUST_LOG`, falling back to `default` when unset.
fn env_filter(var: &str, default: LevelFilter) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default.into())
        .with_env_var(var)
        .from_env_lossy()
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bikeshare_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    // stderr stays quiet by default so it does not interleave with the report.
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .with_filter(env_filter("RUST_LOG", LevelFilter::WARN));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(env_filter("RUST_LOG_JSON", LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let data_dir = DatasetCatalog::resolve_data_dir(cli.data_dir);
    let catalog = match &cli.catalog {
        Some(path) => DatasetCatalog::load(path, &data_dir)?,
        None => DatasetCatalog::with_defaults(&data_dir),
    };
    info!(data_dir = %data_dir.display(), "Catalog ready");

    match cli.command {
        Commands::Report {
            city,
            month,
            day,
            json,
            output,
            samples,
        } => {
            let analysis = pipeline::run(&catalog, &city, month, day)?;
            let report = &analysis.report;
            print_pretty(report);

            for (section, error) in report.failures() {
                warn!(section, error = %error, "Section has no result");
            }

            if json {
                println!("{}", to_json(report)?);
            } else {
                print!("{}", render(report));
            }

            if samples > 0 {
                let rows = raw_sample(&analysis.dataset, samples, &mut rand::thread_rng());
                print!("\n{}", render_rows(&rows));
            }

            if let Some(path) = output {
                append_summary(&path, report)?;
                info!(path = %path.display(), "Summary appended");
            }
        }
        Commands::Interactive => {
            let stdin = io::stdin();
            let clear = io::stdout().is_terminal();
            let mut prompter = Prompter::new(stdin.lock(), io::stdout()).with_clear_screen(clear);
            prompter.run_session(&catalog, &mut rand::thread_rng())?;
        }
        Commands::ListDatasets => {
            for (id, path) in catalog.iter() {
                let status = if path.exists() { "ok" } else { "missing" };
                println!("{id:<16} {status:<8} {}", path.display());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_defaults_when_unset() {
        let filter = env_filter("BIKESHARE_STATS_TEST_UNSET_LOG", LevelFilter::WARN);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_env_filter_keeps_explicit_level() {
        // SAFETY: the variable is unique to this test.
        unsafe { std::env::set_var("BIKESHARE_STATS_TEST_DEBUG_LOG", "debug") };
        let filter = env_filter("BIKESHARE_STATS_TEST_DEBUG_LOG", LevelFilter::WARN);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }
}
