use std::path::PathBuf;
use std::time::Duration;

use crate::core::images::ImageId;
use crate::render::border::BorderStyle;

/// Seconds between rotations when nothing else is configured
pub const DEFAULT_INTERVAL_SECS: u64 = 10;

/// Highest frame rate with a whole-millisecond frame period
pub const MAX_FPS: u32 = 1000;

/// The four gallery images shown out of the box
pub const DEFAULT_IMAGES: [&str; 4] = [
    "https://picsum.photos/id/1015/1200/800",
    "https://picsum.photos/id/1025/1200/800",
    "https://picsum.photos/id/1043/1200/800",
    "https://picsum.photos/id/1069/1200/800",
];

pub fn default_images() -> Vec<ImageId> {
    DEFAULT_IMAGES.iter().map(|s| ImageId::from(*s)).collect()
}

/// Top-level slideshow configuration
#[derive(Debug, Clone)]
pub struct SlideshowConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub images: Vec<ImageId>,
    pub interval: Duration,
    pub output_mode: OutputMode,
    pub output_path: PathBuf,
    pub border: BorderStyle,
    /// Stop after this long; `None` runs until told to quit
    pub run_for: Option<Duration>,
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            fps: 10,
            images: default_images(),
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            output_mode: OutputMode::default(),
            output_path: PathBuf::from("frame.png"),
            border: BorderStyle::default(),
            run_for: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Write the frame as PNG whenever it changes
    #[default]
    Png,
    /// Output raw RGBA pixels to stdout (for piping)
    Raw,
    /// Render without writing anything
    None,
}

impl std::str::FromStr for OutputMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(OutputMode::Png),
            "raw" | "stdout" => Ok(OutputMode::Raw),
            "none" | "off" => Ok(OutputMode::None),
            _ => Err(format!("Unknown output mode: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_mode_parse() {
        assert_eq!("PNG".parse::<OutputMode>(), Ok(OutputMode::Png));
        assert_eq!("stdout".parse::<OutputMode>(), Ok(OutputMode::Raw));
        assert_eq!("off".parse::<OutputMode>(), Ok(OutputMode::None));
        assert!("drm".parse::<OutputMode>().is_err());
    }

    #[test]
    fn test_defaults() {
        let config = SlideshowConfig::default();
        assert_eq!(config.images.len(), 4);
        assert_eq!(config.interval, Duration::from_secs(10));
        assert!(config.run_for.is_none());
    }
}
