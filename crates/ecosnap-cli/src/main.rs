//! EcoSnap CLI - drive the offline core from a terminal.
//!
//! Installs and activates the offline cache, fetches through it, looks up
//! barcodes, and records classifications into the local stats store.

mod commands;

use std::io;

use anyhow::Result;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ecosnap_core::Config;

use commands::{Command, Services};

/// Overrides the configured app origin
const ORIGIN_ENV_VAR: &str = "ECOSNAP_ORIGIN";

const USAGE: &str = "\
Usage: ecosnap <command> [args]

Commands:
  install                     Seed and activate the current cache generation
  fetch <url|path>            Fetch through the offline cache
  lookup <barcode> [--record] Look up a product; --record credits it as a barcode scan
  record <material> [--barcode]
                              Record a classified item (plastic, paper, metal, glass)
  stats                       Show points, counters and environmental impact
  status                      List cache generations and cached entries
  config [--init]             Show the effective config; --init writes it to disk";

/// Initialize the tracing subscriber for logging.
/// Logs go to stderr and to a daily file under the cache directory; the
/// returned guard flushes the file writer on drop.
fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match config.log_dir() {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "ecosnap.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    let mut config = Config::load().unwrap_or_else(|e| {
        eprintln!("Warning: failed to load config, using defaults: {}", e);
        Config::default()
    });
    if let Ok(origin) = std::env::var(ORIGIN_ENV_VAR) {
        config.origin = origin;
    }

    let _log_guard = init_tracing(&config);
    info!(?command, "EcoSnap starting");

    let services = Services::build(config)?;
    let result = commands::run(&services, command).await;
    if let Err(ref e) = result {
        warn!(error = %e, "Command failed");
    }
    result
}
