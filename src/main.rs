//! edwatch - terminal monitor for the Elite Dangerous journal.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use edwatch::config::Config;
use edwatch::journal::JournalMonitor;
use edwatch::render::Printer;

#[derive(Parser)]
#[command(
    name = "edwatch",
    about = "Terminal monitor for the Elite Dangerous journal",
    version
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Config file path (default: the platform config directory).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Journal directory (overrides config and platform default).
    #[arg(long)]
    journal_dir: Option<PathBuf>,

    /// Screenshots directory (overrides config and platform default).
    #[arg(long)]
    screenshots_dir: Option<PathBuf>,

    /// Tail poll interval in seconds.
    #[arg(long)]
    interval: Option<u64>,
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("edwatch: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => Config::load_default(),
    };
    if cli.journal_dir.is_some() {
        config.journal_dir = cli.journal_dir.clone();
    }
    if cli.screenshots_dir.is_some() {
        config.screenshots_dir = cli.screenshots_dir.clone();
    }
    if let Some(interval) = cli.interval {
        config.poll_interval_secs = interval;
    }

    let Some(journal_dir) = config.resolved_journal_dir() else {
        eprintln!("edwatch: no journal directory configured and no platform default found");
        return ExitCode::FAILURE;
    };

    let mut monitor = JournalMonitor::with_poll_interval(journal_dir, config.poll_interval());
    if let Err(e) = monitor.start() {
        eprintln!("edwatch: {e}");
        return ExitCode::FAILURE;
    }

    let mut printer = Printer::new(config.resolved_screenshots_dir());
    let mut poll = tokio::time::interval(config.poll_interval());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = poll.tick() => {
                while let Some(event) = monitor.next_event() {
                    let state = monitor.state();
                    printer.handle(&event, &state);
                }
            }
        }
    }

    monitor.stop().await;
    ExitCode::SUCCESS
}
