//! vercel-sweep — remove Vercel preview deployments whose Git branch is gone.
//!
//! # Usage
//!
//! ```text
//! VERCEL_BEARER_TOKEN=… vercel-sweep [--dry-run] [--repo <dir>] [--team <id>]
//!     [--project <id>] [--protect <branch>]... [--batch-size <n>]
//!     [--batch-delay-ms <ms>] [--json]
//! ```
//!
//! Exit status is 0 on success (including when nothing is orphaned) and 1 on
//! any usage, validation, enumeration, or fetch failure.

mod commands;
mod console;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use sweep_prune::Logger;

use commands::sweep::SweepArgs;
use console::ConsoleLogger;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "vercel-sweep",
    version,
    about = "Delete Vercel preview deployments whose Git branch no longer exists",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    sweep: SweepArgs,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    init_tracing();
    install_panic_hook();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        // Usage errors are validation failures like any other: exit 1.
        Err(err) => {
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };
    let logger = ConsoleLogger::new(cli.sweep.json);

    match panic::catch_unwind(AssertUnwindSafe(|| cli.sweep.run())) {
        Ok(Ok(())) => ExitCode::SUCCESS,
        Ok(Err(err)) => {
            logger.error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
        Err(payload) => {
            logger.error(&format!("Unexpected error: {}", panic_message(&*payload)));
            ExitCode::FAILURE
        }
    }
}

/// Send panics to the tracing log only. Panics inside deletion tasks are
/// recovered by the executor and reported as failed deletions; `main` prints
/// the fatal line for a panic that ends the run.
fn install_panic_hook() {
    panic::set_hook(Box::new(|info| {
        tracing::error!(%info, "panic");
    }));
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "panic with non-string payload"
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
