/// Error types for the slideshow core and its image/playlist collaborators.
use std::path::PathBuf;

/// Result alias that carries [`SlideshowError`].
pub type Result<T> = std::result::Result<T, SlideshowError>;

#[derive(Debug, thiserror::Error)]
pub enum SlideshowError {
    #[error("image list must contain at least one image")]
    EmptyImageList,

    #[error("rotation interval must be greater than zero")]
    ZeroInterval,

    #[error("rotation interval {0:?} is too long to schedule")]
    IntervalTooLong(std::time::Duration),

    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} while fetching {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("image has unusable dimensions {width}x{height}")]
    Dimensions { width: u32, height: u32 },

    #[error("image loading task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("invalid playlist: {0}")]
    Playlist(String),
}

impl From<quick_xml::de::DeError> for SlideshowError {
    fn from(value: quick_xml::de::DeError) -> Self {
        Self::Playlist(value.to_string())
    }
}
