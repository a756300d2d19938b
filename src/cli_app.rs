//! Top-level CLI definition and dispatch.

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Parser;
use crossbeam_channel as channel;
use serde_json::json;

use duscan::core::config::Config;
use duscan::core::errors::{DusError, Result};
use duscan::core::units::{DisplayUnit, format_totals};
use duscan::scan::aggregate::{ScanOutcome, Termination, aggregate};
use duscan::scan::cancel::CancelToken;
use duscan::scan::source::FsSource;
use duscan::scan::walker::{ScanConfig, Traversal};

/// duscan — counts files and total bytes across directory trees.
#[derive(Debug, Parser)]
#[command(
    name = "duscan",
    author,
    version,
    about = "Concurrent disk-usage scanner",
    long_about = None
)]
pub struct Cli {
    /// Directories to scan (default: current directory).
    #[arg(value_name = "DIR")]
    paths: Vec<PathBuf>,
    /// Print running totals at the progress interval.
    #[arg(short, long)]
    verbose: bool,
    /// Display size in KiB.
    #[arg(short = 'k', conflicts_with = "gib")]
    kib: bool,
    /// Display size in GiB.
    #[arg(short = 'g')]
    gib: bool,
    /// Emit the final totals as one JSON object.
    #[arg(long)]
    json: bool,
    /// Override config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Override the cap on concurrent directory reads.
    #[arg(long, value_name = "N")]
    read_concurrency: Option<usize>,
}

/// Run one scan per the parsed CLI.
///
/// Exit contract: only argument/config errors bubble up as `Err`; read
/// failures during traversal are diagnostics and user cancellation ends
/// the run cleanly with status 0.
pub fn run(cli: &Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(n) = cli.read_concurrency {
        if n == 0 {
            return Err(DusError::InvalidConfig {
                details: "--read-concurrency must be at least 1".to_string(),
            });
        }
        config.scan.read_concurrency = n;
    }

    let unit = if cli.kib {
        DisplayUnit::Kib
    } else if cli.gib {
        DisplayUnit::Gib
    } else {
        DisplayUnit::from_config_name(&config.display.unit).unwrap_or_default()
    };

    let roots = if cli.paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        cli.paths.clone()
    };

    let cancel = CancelToken::new();
    spawn_cancel_listeners(&cancel);

    let scan_config = ScanConfig {
        roots,
        read_concurrency: config.scan.read_concurrency,
        workers: config.effective_workers(),
    };
    let traversal = Traversal::spawn(&scan_config, Arc::new(FsSource), &cancel);

    // Diagnostics print as they occur, on stderr, away from the results.
    let diag_rx = traversal.diagnostics.clone();
    let diag_printer = thread::spawn(move || {
        for diag in diag_rx {
            eprintln!("duscan: {}: {}", diag.path.display(), diag.message);
        }
    });

    let ticker = cli
        .verbose
        .then(|| channel::tick(Duration::from_millis(config.progress.interval_ms)));

    let outcome = aggregate(&traversal.sizes, &cancel, ticker.as_ref(), |totals| {
        println!("{}", format_totals(totals, unit));
    });

    // Closes once the workers exit; they already have by now.
    diag_printer
        .join()
        .map_err(|_| DusError::ChannelClosed {
            component: "diagnostics printer",
        })?;

    report(&outcome, unit, cli.json);
    Ok(())
}

/// Print the final (or partial) totals.
///
/// Cancellation keeps stdout clean in text mode: partial totals go to
/// stderr, marked as such, and the process still exits 0.
fn report(outcome: &ScanOutcome, unit: DisplayUnit, as_json: bool) {
    if as_json {
        let payload = json!({
            "files": outcome.totals.files,
            "bytes": outcome.totals.bytes,
            "cancelled": outcome.termination == Termination::Cancelled,
        });
        println!("{payload}");
        return;
    }
    match outcome.termination {
        Termination::Completed => println!("{}", format_totals(&outcome.totals, unit)),
        Termination::Cancelled => eprintln!(
            "duscan: cancelled; partial totals: {}",
            format_totals(&outcome.totals, unit)
        ),
    }
}

/// Wire the two cancellation triggers to one token: a single byte read
/// from an interactive stdin, and SIGINT/SIGTERM on Unix.
fn spawn_cancel_listeners(cancel: &CancelToken) {
    if io::stdin().is_terminal() {
        println!("press return to cancel at any time...");
        let token = cancel.clone();
        thread::spawn(move || {
            let mut byte = [0u8; 1];
            let _ = io::stdin().read(&mut byte);
            token.cancel();
        });
    }

    #[cfg(unix)]
    {
        use std::sync::atomic::{AtomicBool, Ordering};

        use signal_hook::consts::{SIGINT, SIGTERM};

        let flag = Arc::new(AtomicBool::new(false));
        for sig in [SIGINT, SIGTERM] {
            if let Err(e) = signal_hook::flag::register(sig, Arc::clone(&flag)) {
                eprintln!("duscan: failed to register signal {sig}: {e}");
            }
        }

        let token = cancel.clone();
        thread::spawn(move || {
            loop {
                if flag.load(Ordering::Relaxed) {
                    token.cancel();
                    return;
                }
                thread::sleep(Duration::from_millis(50));
            }
        });
    }
}
