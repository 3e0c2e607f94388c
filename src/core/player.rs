/// Main player — mounts the rotation controller, feeds the image cache, renders and outputs frames.
use anyhow::{Context, Result};
use std::io::Write;
use tokio::sync::mpsc;
use tokio::time::{self, Duration, Instant};
use tracing::{debug, info};

use crate::config::{MAX_FPS, OutputMode, SlideshowConfig};
use crate::core::images::ImageList;
use crate::core::rotation::{RotationController, Selection};
use crate::media::source::{FetchResult, ImageCache, ImageState};
use crate::render::engine::{FrameRenderer, FrameView};

/// Commands sent from the control inputs to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    /// Pause or resume rotation
    TogglePause,
    /// Stop the slideshow
    Shutdown,
}

impl PlayerCommand {
    /// Map one line typed on the control input to a command.
    pub fn from_control_line(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "p" | "pause" | "resume" | "space" => Some(PlayerCommand::TogglePause),
            "q" | "quit" | "exit" => Some(PlayerCommand::Shutdown),
            _ => None,
        }
    }
}

/// What a written frame showed; a PNG is rewritten when this changes.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FrameKey {
    selection: Selection,
    load_state: &'static str,
}

/// Rewrite on change, and every five seconds' worth of frames regardless.
fn png_due(last_written: Option<&(FrameKey, u64)>, key: &FrameKey, frame: u64, fps: u32) -> bool {
    match last_written {
        None => true,
        Some((last_key, last_frame)) => {
            last_key != key || frame - last_frame >= fps.max(1) as u64 * 5
        }
    }
}

fn load_state_label(state: &ImageState) -> &'static str {
    match state {
        ImageState::Loading => "loading",
        ImageState::Ready(_) => "ready",
        ImageState::Failed(_) => "failed",
    }
}

pub struct Player {
    config: SlideshowConfig,
    renderer: FrameRenderer,
    cache: ImageCache,
    fetch_rx: mpsc::Receiver<FetchResult>,
    /// Channel for receiving commands from control inputs
    command_rx: mpsc::Receiver<PlayerCommand>,
    /// Sender clone for giving to control inputs
    command_tx: mpsc::Sender<PlayerCommand>,
}

impl Player {
    pub fn new(config: SlideshowConfig, client: reqwest::Client) -> Result<Self> {
        let (tx, rx) = mpsc::channel(16);
        let renderer = FrameRenderer::new(config.width, config.height, config.border.clone())
            .context("Failed to create framebuffer")?;
        let (cache, fetch_rx) = ImageCache::new(client);

        Ok(Self {
            config,
            renderer,
            cache,
            fetch_rx,
            command_rx: rx,
            command_tx: tx,
        })
    }

    /// Get a clone of the command sender for control inputs
    pub fn command_sender(&self) -> mpsc::Sender<PlayerCommand> {
        self.command_tx.clone()
    }

    /// Run the slideshow until shut down. Returns the selection shown last.
    ///
    /// The rotation timer is released on every way out of here.
    pub async fn run(&mut self) -> Result<Selection> {
        let images = ImageList::new(self.config.images.clone())?;
        let mut controller = RotationController::initialize(images, self.config.interval)?;

        let outcome = self.run_loop(&controller).await;
        let last = controller.snapshot();
        controller.shutdown();

        outcome.map(|_| last)
    }

    async fn run_loop(&mut self, controller: &RotationController) -> Result<()> {
        for id in controller.images().iter() {
            self.cache.request(id);
        }

        let fps = self.config.fps.clamp(1, MAX_FPS);
        let frame_duration = Duration::from_millis(1000 / fps as u64);
        let mut interval = time::interval(frame_duration);
        let deadline = self
            .config
            .run_for
            .and_then(|d| Instant::now().checked_add(d));
        let mut last_written: Option<(FrameKey, u64)> = None;
        let mut frames_rendered: u64 = 0;

        info!(
            "Starting render loop: {}x{} @ {}fps, output: {:?}",
            self.config.width, self.config.height, self.config.fps, self.config.output_mode
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if deadline.is_some_and(|d| Instant::now() >= d) {
                        info!("Run time elapsed after {} frames", frames_rendered);
                        break;
                    }
                    let key = self.render(controller);
                    self.output(&key, frames_rendered, &mut last_written)?;
                    frames_rendered += 1;
                }
                Some(fetched) = self.fetch_rx.recv() => {
                    self.cache.apply(fetched);
                }
                Some(cmd) = self.command_rx.recv() => {
                    if !self.handle_command(cmd, controller) {
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    fn render(&mut self, controller: &RotationController) -> FrameKey {
        let selection = controller.snapshot();
        let state = self.cache.state(&selection.image);
        self.renderer.render_frame(&FrameView {
            image: state,
            paused: selection.paused,
        });
        FrameKey {
            load_state: load_state_label(state),
            selection,
        }
    }

    fn output(
        &mut self,
        key: &FrameKey,
        frame: u64,
        last_written: &mut Option<(FrameKey, u64)>,
    ) -> Result<()> {
        match self.config.output_mode {
            OutputMode::Png => {
                if png_due(last_written.as_ref(), key, frame, self.config.fps) {
                    self.renderer
                        .save_png(&self.config.output_path)
                        .context("Failed to save PNG output")?;
                    debug!(
                        "Saved frame for image {} ({}) to {}",
                        key.selection.image,
                        key.load_state,
                        self.config.output_path.display()
                    );
                    *last_written = Some((key.clone(), frame));
                }
            }
            OutputMode::Raw => {
                std::io::stdout()
                    .write_all(self.renderer.pixels())
                    .context("Failed to write raw frame to stdout")?;
            }
            OutputMode::None => {}
        }
        Ok(())
    }

    /// Returns false when the player should stop.
    fn handle_command(&self, cmd: PlayerCommand, controller: &RotationController) -> bool {
        match cmd {
            PlayerCommand::TogglePause => {
                controller.toggle_pause();
                true
            }
            PlayerCommand::Shutdown => {
                info!("Shutdown requested");
                false
            }
        }
    }
}
