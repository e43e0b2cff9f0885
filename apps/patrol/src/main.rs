//! patrol — sentry patrol circuits and live shift monitoring.
//!
//! # Usage
//!
//! ```bash
//! # Generate a two-hour shift over the demo grid
//! patrol generate --demo-grid --sentries sentries.csv --hours 2
//!
//! # Generate from configured paths, reproducibly
//! PATROL_SEED=42 patrol generate --paths paths.csv --sentries sentries.csv --start 1700000000 --hours 1 --minutes 30
//!
//! # Monitor: bus messages as JSON lines on stdin, publications on stdout
//! patrol monitor --window-secs 30 < events.jsonl
//! ```

mod network;
mod stdio;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::info;

use sp_circuit::{CircuitGenerator, GeneratorConfig, load_sentries_csv};
use sp_core::{Clock, Epoch, ShiftWindow, SystemClock};
use sp_graph::load_paths_csv;
use sp_monitor::{Dispatcher, Message, MessageBus, MonitorConfig, ShiftMonitor, topics};

use stdio::StdoutBus;

/// Sentry patrol circuit generator and shift monitor.
#[derive(Parser, Debug)]
#[command(name = "patrol", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a patrol circuit and print the shift as JSON.
    Generate(GenerateArgs),
    /// Monitor shifts: inbound JSON lines on stdin, outbound on stdout.
    Monitor(MonitorArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Patrol paths CSV: `src,dest,duration_secs[,directed]`.
    #[arg(long, required_unless_present = "demo_grid")]
    paths: Option<PathBuf>,

    /// Use the built-in 3×3 checkpoint grid instead of `--paths`.
    #[arg(long, conflicts_with = "paths")]
    demo_grid: bool,

    /// On-duty sentries CSV: `name,card,id`.
    #[arg(long)]
    sentries: PathBuf,

    /// Shift start as Unix seconds (default: now).
    #[arg(long)]
    start: Option<i64>,

    #[arg(long, default_value_t = 0)]
    hours: u32,

    #[arg(long, default_value_t = 0)]
    minutes: u32,

    /// Run seed for reproducible circuits (default: random).
    #[arg(long, env = "PATROL_SEED")]
    seed: Option<u64>,

    #[arg(long, env = "PATROL_MAX_ATTEMPTS", default_value_t = 10_000)]
    max_attempts: u32,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

#[derive(Args, Debug)]
struct MonitorArgs {
    /// Check-in window in seconds on either side of the expected time.
    #[arg(long, env = "PATROL_WINDOW_SECS", default_value_t = 30)]
    window_secs: u32,

    /// Watchdog poll interval in milliseconds.
    #[arg(long, env = "PATROL_POLL_MS", default_value_t = 1_000)]
    poll_ms: u64,

    /// Client identifier for liveness messages.
    #[arg(long, env = "PATROL_CLIENT_ID", default_value = "circuit-handler")]
    client_id: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries data; logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Generate(args) => generate(args).await,
        Command::Monitor(args) => monitor(args).await,
    }
}

// ── generate ──────────────────────────────────────────────────────────────────

async fn generate(args: GenerateArgs) -> Result<()> {
    let graph = match &args.paths {
        Some(path) => load_paths_csv(path).with_context(|| format!("loading {}", path.display()))?,
        None => network::demo_grid()?,
    };
    let sentries = load_sentries_csv(&args.sentries)
        .with_context(|| format!("loading {}", args.sentries.display()))?;

    let start = args.start.map(Epoch).unwrap_or_else(|| SystemClock.now());
    let duration = i64::from(ShiftWindow::duration_from_hm(args.hours, args.minutes));
    let config = GeneratorConfig {
        max_attempts: args.max_attempts,
        seed:         args.seed,
        ..GeneratorConfig::default()
    };

    // Rejection sampling is CPU-bound; keep it off the async workers.
    let shift = tokio::task::spawn_blocking(move || {
        CircuitGenerator::new(&graph, config)?.generate(&sentries, start, duration)
    })
    .await??;

    let json = if args.pretty {
        serde_json::to_string_pretty(&shift)?
    } else {
        serde_json::to_string(&shift)?
    };
    println!("{json}");
    Ok(())
}

// ── monitor ───────────────────────────────────────────────────────────────────

async fn monitor(args: MonitorArgs) -> Result<()> {
    let config = MonitorConfig {
        check_in_window_secs: args.window_secs,
        poll_interval:        Duration::from_millis(args.poll_ms),
        client_id:            args.client_id,
        ..MonitorConfig::default()
    };
    let client_id = config.client_id.clone();
    let buffer = config.command_buffer;

    let bus = Arc::new(StdoutBus::new());
    let (monitor, monitor_task) = ShiftMonitor::spawn(config, bus.clone(), Arc::new(SystemClock))?;
    bus.publish(Message::connected(&client_id)?).await?;
    info!(client = %client_id, subscriptions = ?topics::SUBSCRIPTIONS, "reading bus messages from stdin");

    let (tx, rx) = mpsc::channel(buffer);
    let dispatcher = tokio::spawn(Dispatcher::new(monitor).run(rx));

    let interrupted = tokio::select! {
        read = stdio::forward_stdin(tx) => {
            read.context("reading stdin")?;
            false
        }
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted");
            true
        }
    };

    // The dispatcher holds the last monitor handle; both wind down in turn.
    // After Ctrl-C the stdin thread still owns the inbound sender.
    if interrupted {
        dispatcher.abort();
    }
    match dispatcher.await {
        Err(e) if e.is_cancelled() => {}
        other => other?,
    }
    monitor_task.await?;
    bus.publish(Message::last_will(&client_id)?).await?;
    info!("monitor exited");
    Ok(())
}
