//! Binary entrypoint for photo-board.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tokio_util::sync::CancellationToken;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use photo_board::config::Configuration;
use photo_board::pipeline::Pipeline;
use photo_board::state::{self, SlideshowState};
use photo_board::tasks::refresh;
use photo_board::web;
use photo_board::zone::Zone;

#[derive(Debug, Parser)]
#[command(
    name = "photo-board",
    version,
    about = "Full-screen slideshow of photos whose filename date is today or later"
)]
struct Cli {
    /// Path to YAML config file; flags below override its values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Web server port
    #[arg(long)]
    port: Option<u16>,

    /// Image directory
    #[arg(long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Shuffle images instead of sorting them by name
    #[arg(long)]
    shuffle: bool,

    /// Slide duration in seconds
    #[arg(long = "dur", value_name = "SECONDS")]
    duration: Option<u64>,

    /// Time zone for filename dates ("Local" or an IANA name)
    #[arg(long = "tz", value_name = "ZONE")]
    timezone: Option<Zone>,

    /// Background color (hex)
    #[arg(long = "bg", value_name = "HEX")]
    background: Option<String>,

    /// Image border size in pixels
    #[arg(long)]
    border: Option<u32>,

    /// Border color as "r, g, b"
    #[arg(long, value_name = "RGB")]
    border_color: Option<String>,

    /// Interval between image list updates, in minutes
    #[arg(long, value_name = "MINUTES")]
    update_interval: Option<u64>,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn apply(&self, cfg: &mut Configuration) {
        if let Some(port) = self.port {
            cfg.server.port = port;
        }
        if let Some(dir) = &self.dir {
            cfg.photo_dir = dir.clone();
        }
        if self.shuffle {
            cfg.shuffle = true;
        }
        if let Some(secs) = self.duration {
            cfg.display.slide_duration = Duration::from_secs(secs);
        }
        if let Some(zone) = self.timezone {
            cfg.timezone = zone;
        }
        if let Some(bg) = &self.background {
            cfg.display.background = bg.clone();
        }
        if let Some(border) = self.border {
            cfg.display.border = border;
        }
        if let Some(color) = &self.border_color {
            cfg.display.border_color = color.clone();
        }
        if let Some(minutes) = self.update_interval {
            cfg.refresh_interval = Duration::from_secs(minutes.saturating_mul(60));
        }
    }
}

fn init_tracing(verbosity: u8) -> Result<()> {
    // map -v to log level
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"))
        .add_directive(format!("photo_board={level}").parse()?)
        .add_directive("tower_http=warn".parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let mut cfg = match &cli.config {
        Some(path) => Configuration::from_yaml_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Configuration::default(),
    };
    cli.apply(&mut cfg);
    let cfg = cfg.validated().context("invalid configuration values")?;

    info!(
        photo_dir = %cfg.photo_dir.display(),
        shuffle = cfg.shuffle,
        timezone = %cfg.timezone,
        refresh = %humantime::format_duration(cfg.refresh_interval),
        slide = %humantime::format_duration(cfg.display.slide_duration),
        "starting photo-board on http://localhost:{}",
        cfg.server.port
    );

    let pipeline = Pipeline::from_config(&cfg).context("failed to build refresh pipeline")?;
    let (publisher, slideshow) = state::channel(SlideshowState::empty());
    let cancel = CancellationToken::new();

    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            info!("shutdown signal received");
            cancel.cancel();
        });
    }

    let server = web::spawn(&cfg, slideshow, cancel.clone());
    refresh::run(pipeline, publisher, cfg.refresh_interval, cancel.clone()).await;
    server.await.context("web server task panicked")?
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        if let Ok(mut term) = signal(SignalKind::terminate()) {
            term.recv().await;
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
