/// Data model for playlist files.
/// A playlist fixes the image list and rotation cadence at startup.
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::images::ImageId;
use crate::error::{Result, SlideshowError};

/// Root element
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    #[serde(rename = "@name", default)]
    pub name: String,
    /// Seconds between rotations
    #[serde(rename = "@interval", default = "default_interval")]
    pub interval: u64,
    #[serde(rename = "image", default)]
    pub images: Vec<ImageEntry>,
}

fn default_interval() -> u64 {
    crate::config::DEFAULT_INTERVAL_SECS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageEntry {
    #[serde(rename = "@src")]
    pub src: String,
}

impl Playlist {
    pub fn image_ids(&self) -> Vec<ImageId> {
        self.images
            .iter()
            .map(|entry| ImageId::new(entry.src.trim()))
            .collect()
    }

    pub fn interval(&self) -> Result<Duration> {
        if self.interval == 0 {
            return Err(SlideshowError::ZeroInterval);
        }
        Ok(Duration::from_secs(self.interval))
    }
}
