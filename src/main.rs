//! # Neon Clock Application Entry Point
//!
//! This binary drives the clock display: it loads the configuration, starts the
//! ticker and re-renders on every published snapshot until interrupted.
//! It supports terminal output (default), PPM snapshots of the neon frame buffer
//! and a JSON dump of the computed layout.

// Test modules
#[cfg(test)]
mod tests;

use anyhow::{bail, Context};
use neon_clock_lib::config::Config;
use neon_clock_lib::display::{ClockDisplay, Frame, Lifecycle};
use neon_clock_lib::measure::MonoMetricsMeasurer;
use neon_clock_lib::renderer::{draw_terminal, render_to_buffer};
use neon_clock_lib::style::NeonStyle;
use neon_clock_lib::ticker::SystemClock;
use std::env;
use std::fs;
use std::future::Future;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

const DEFAULT_COLUMNS: usize = 80;

/// Command line options, parsed by hand like the rest of the tooling.
#[derive(Debug, Default, PartialEq)]
pub struct CliArgs {
    /// Force terminal output even when other outputs are selected
    pub stdout: bool,
    /// Render a single frame and exit
    pub once: bool,
    /// Print the frame layout as JSON
    pub json: bool,
    /// Write each frame as a PPM image to this path
    pub snapshot: Option<PathBuf>,
    /// Explicit configuration file
    pub config: Option<PathBuf>,
}

impl CliArgs {
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Self> {
        let mut parsed = CliArgs::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--stdout" => parsed.stdout = true,
                "--once" => parsed.once = true,
                "--json" => parsed.json = true,
                "--snapshot" => {
                    let path = args.next().context("--snapshot needs a file path")?;
                    parsed.snapshot = Some(PathBuf::from(path));
                }
                "--config" => {
                    let path = args.next().context("--config needs a file path")?;
                    parsed.config = Some(PathBuf::from(path));
                }
                other => bail!("unknown argument: {other}"),
            }
        }
        Ok(parsed)
    }

    /// Terminal output is on unless another output replaces it.
    pub fn terminal(&self) -> bool {
        self.stdout || (self.snapshot.is_none() && !self.json)
    }
}

fn init_logging() {
    // Logs go to stderr so the terminal clock on stdout stays clean
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .ok();
}

fn terminal_columns() -> usize {
    env::var("COLUMNS")
        .ok()
        .and_then(|c| c.parse().ok())
        .unwrap_or(DEFAULT_COLUMNS)
}

/// Send one frame to every selected output.
fn present(frame: &Frame, args: &CliArgs, style: &NeonStyle) -> anyhow::Result<()> {
    if args.json {
        println!("{}", serde_json::to_string(frame)?);
    }

    if let Some(path) = &args.snapshot {
        let buffer = render_to_buffer(frame, style);
        fs::write(path, buffer.to_ppm())
            .with_context(|| format!("writing snapshot to {}", path.display()))?;
        info!(path = %path.display(), time = %frame.time.text, "snapshot written");
    }

    if args.terminal() {
        let mut out = io::stdout().lock();
        if !args.once {
            // Clear screen and home the cursor between ticks
            write!(out, "\x1b[2J\x1b[H")?;
        }
        draw_terminal(frame, style, terminal_columns(), &mut out)?;
    }
    Ok(())
}

/// Re-render on every published snapshot until `shutdown` completes.
///
/// `shutdown` is created once by the caller and polled across iterations, so a
/// request that arrives while a frame is being presented is not lost.
async fn run_until<F>(
    display: &mut ClockDisplay<MonoMetricsMeasurer>,
    args: &CliArgs,
    style: &NeonStyle,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    display.set_lifecycle(Lifecycle::Active).await;
    let mut updates = display.subscribe();

    let result = loop {
        // Render pass is a data dependency on the snapshot just published
        updates.borrow_and_update();
        let frame = match display.render_pass() {
            Ok(frame) => frame,
            Err(e) => break Err(e.into()),
        };
        if let Err(e) = present(&frame, args, style) {
            break Err(e);
        }

        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
            }
            _ = &mut shutdown => {
                info!("shutdown requested");
                break Ok(());
            }
        }
    };

    display.set_lifecycle(Lifecycle::Inactive).await;
    result
}

async fn run(args: CliArgs, config: Config) -> anyhow::Result<()> {
    let style = NeonStyle::default();
    let mut display = ClockDisplay::new(&config, Arc::new(SystemClock), MonoMetricsMeasurer::default())
        .context("invalid clock configuration")?;

    if args.once {
        let frame = display.render_pass()?;
        return present(&frame, &args, &style);
    }

    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("cannot listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };
    run_until(&mut display, &args, &style, interrupt).await
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    init_logging();

    let args = CliArgs::parse(env::args().skip(1))?;
    let config = match &args.config {
        Some(path) => Config::try_load_from_path(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load(),
    };

    // One cooperative thread: the ticker is the only task that ever sleeps
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    // Returned errors are printed once by `main`'s `Termination`
    rt.block_on(run(args, config))
}
