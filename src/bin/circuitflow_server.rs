use anyhow::Context;
use circuitflow::config::EngineConfig;
use circuitflow::lsp::{drc_complete_notification, handle_line, ServerState};
use clap::Parser;
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// JSON-RPC editing server for CircuitFlow boards
#[derive(Parser, Debug)]
#[command(name = "circuitflow_server")]
#[command(about = "Line-delimited JSON-RPC server for the CircuitFlow board editor", long_about = None)]
#[command(version)]
struct Args {
    /// Engine configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the grid unit from the configuration
    #[arg(long)]
    grid_unit: Option<f64>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log: String,
}

fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_config(args: &Args) -> anyhow::Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(grid_unit) = args.grid_unit {
        config.grid_unit = grid_unit;
        config.validate().context("Invalid --grid-unit")?;
    }
    Ok(config)
}

fn write_line<T: Serialize>(out: &mut impl Write, message: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string(message).context("Failed to serialize message")?;
    writeln!(out, "{}", json).context("Failed to write to stdout")?;
    out.flush().context("Failed to flush stdout")?;
    Ok(())
}

/// Emit `drcComplete` if a scheduled run became due
fn flush_drc(state: &mut ServerState, out: &mut impl Write) -> anyhow::Result<()> {
    if let Some(report) = state.poll_drc(Instant::now()) {
        tracing::info!(
            "[Server] DRC completed: {} violations, {} markers in {:.2}ms",
            report.violations.len(),
            report.markers.len(),
            report.elapsed_ms
        );
        let notification = drc_complete_notification(report);
        write_line(out, &notification)?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log);

    let config = load_config(&args)?;
    tracing::info!("[Server] Starting CircuitFlow server (grid unit {})", config.grid_unit);
    let mut state = ServerState::new(config);

    // Stdin is read on its own thread so pending DRC runs can fire between requests
    let (line_tx, line_rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(l) => {
                    if line_tx.send(l).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("[Server] Error reading stdin: {}", e);
                    break;
                }
            }
        }
    });

    let stdout = io::stdout();
    let mut out = stdout.lock();

    loop {
        let next = match state.next_drc_deadline() {
            Some(deadline) => {
                let wait = deadline.saturating_duration_since(Instant::now());
                match line_rx.recv_timeout(wait) {
                    Ok(line) => Some(line),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match line_rx.recv() {
                Ok(line) => Some(line),
                Err(_) => break,
            },
        };

        if let Some(line) = next {
            if let Some(response) = handle_line(&mut state, &line) {
                write_line(&mut out, &response)?;
            }
        }
        flush_drc(&mut state, &mut out)?;
    }

    tracing::info!("[Server] Shutting down...");
    Ok(())
}
