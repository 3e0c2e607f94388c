use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

use slideframe::config::{self, OutputMode, SlideshowConfig};
use slideframe::core::images::ImageId;
use slideframe::core::player::{Player, PlayerCommand};
use slideframe::playlist::parser;

#[derive(Parser, Debug)]
#[command(name = "slideframe", about = "Rotating picture frame")]
struct Args {
    /// Image URL or path to show (repeat for several); overrides the playlist
    #[arg(short, long = "image")]
    images: Vec<String>,

    /// Playlist XML file
    #[arg(short, long)]
    playlist: Option<PathBuf>,

    /// Seconds between images
    #[arg(long)]
    interval_secs: Option<u64>,

    /// Frame width in pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Frame height in pixels
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Target FPS (1-1000)
    #[arg(long, default_value_t = 10)]
    fps: u32,

    /// Output mode: png, raw, none
    #[arg(long, default_value = "png")]
    output: String,

    /// Output file path (for png mode)
    #[arg(long, default_value = "frame.png")]
    output_path: PathBuf,

    /// Stop after this many seconds
    #[arg(long)]
    run_secs: Option<u64>,

    /// Ignore stdin (no p/q controls)
    #[arg(long)]
    no_controls: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// CLI images beat the playlist, which beats the built-in gallery.
fn build_config(args: &Args) -> Result<SlideshowConfig> {
    if !(1..=config::MAX_FPS).contains(&args.fps) {
        anyhow::bail!("--fps must be between 1 and {}, got {}", config::MAX_FPS, args.fps);
    }

    let mut config = SlideshowConfig {
        width: args.width,
        height: args.height,
        fps: args.fps,
        output_mode: args
            .output
            .parse::<OutputMode>()
            .map_err(anyhow::Error::msg)?,
        output_path: args.output_path.clone(),
        run_for: args.run_secs.map(Duration::from_secs),
        ..SlideshowConfig::default()
    };

    if let Some(path) = &args.playlist {
        let playlist = parser::parse_playlist_file(path)
            .with_context(|| format!("Failed to load playlist {}", path.display()))?;
        config.images = playlist.image_ids();
        config.interval = playlist.interval()?;
    }

    if !args.images.is_empty() {
        config.images = args.images.iter().map(|s| ImageId::new(s.as_str())).collect();
    }

    if let Some(secs) = args.interval_secs {
        config.interval = Duration::from_secs(secs);
    }

    Ok(config)
}

/// Read p/q lines from stdin on a plain thread; tokio's stdin would hold up runtime shutdown.
fn spawn_stdin_controls(tx: mpsc::Sender<PlayerCommand>) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            match PlayerCommand::from_control_line(&line) {
                Some(cmd) => {
                    if tx.blocking_send(cmd).is_err() {
                        break;
                    }
                }
                None => warn!(
                    "Unknown control {:?} (p = pause/resume, q = quit)",
                    line.trim()
                ),
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.parse().unwrap_or_default()),
        )
        .init();

    let config = build_config(&args)?;

    info!(
        "slideframe v{} starting ({}x{} @ {}fps, {} image(s) every {:?})",
        env!("CARGO_PKG_VERSION"),
        config.width,
        config.height,
        config.fps,
        config.images.len(),
        config.interval
    );

    let client = reqwest::Client::builder()
        .user_agent(concat!("slideframe/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .build()
        .context("Failed to build HTTP client")?;

    let mut player = Player::new(config, client)?;

    if !args.no_controls {
        spawn_stdin_controls(player.command_sender());
    }

    let signal_handle = {
        let tx = player.command_sender();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = tx.send(PlayerCommand::Shutdown).await;
            }
        })
    };

    let last = player.run().await;
    signal_handle.abort();

    let last = last?;
    info!(
        "slideframe shutdown on image #{} ({})",
        last.index + 1,
        last.image
    );
    Ok(())
}
