/// Image source — resolves an image id to pixels, over HTTP or from disk,
/// and caches the outcome per id.
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tiny_skia::Pixmap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::core::images::ImageId;
use crate::error::{Result, SlideshowError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource<'a> {
    Remote(&'a str),
    Local(PathBuf),
}

impl<'a> ImageSource<'a> {
    pub fn classify(id: &'a ImageId) -> Self {
        let s = id.as_str();
        if s.starts_with("http://") || s.starts_with("https://") {
            ImageSource::Remote(s)
        } else {
            ImageSource::Local(PathBuf::from(s.strip_prefix("file://").unwrap_or(s)))
        }
    }
}

/// Fetch and decode one image.
pub async fn load(client: &reqwest::Client, id: &ImageId) -> Result<Pixmap> {
    let bytes = match ImageSource::classify(id) {
        ImageSource::Remote(url) => fetch_remote(client, url).await?,
        ImageSource::Local(path) => match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(source) => return Err(SlideshowError::Read { path, source }),
        },
    };
    tokio::task::spawn_blocking(move || decode_pixmap(&bytes)).await?
}

async fn fetch_remote(client: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    let fetch_err = |source| SlideshowError::Fetch {
        url: url.to_string(),
        source,
    };

    let response = client.get(url).send().await.map_err(fetch_err)?;
    let status = response.status();
    if !status.is_success() {
        return Err(SlideshowError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    let body = response.bytes().await.map_err(fetch_err)?;
    debug!("Fetched {} bytes from {}", body.len(), url);
    Ok(body.to_vec())
}

/// Decode encoded image bytes into a premultiplied RGBA pixmap.
pub fn decode_pixmap(bytes: &[u8]) -> Result<Pixmap> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = (rgba.width(), rgba.height());
    let mut pixmap = Pixmap::new(width, height).ok_or(SlideshowError::Dimensions { width, height })?;

    // tiny-skia expects premultiplied alpha
    let data = pixmap.data_mut();
    for (i, pixel) in rgba.pixels().enumerate() {
        let a = pixel[3] as f32 / 255.0;
        data[i * 4] = (pixel[0] as f32 * a) as u8;
        data[i * 4 + 1] = (pixel[1] as f32 * a) as u8;
        data[i * 4 + 2] = (pixel[2] as f32 * a) as u8;
        data[i * 4 + 3] = pixel[3];
    }
    Ok(pixmap)
}

/// Load status of one image, as seen by the renderer.
#[derive(Debug, Clone)]
pub enum ImageState {
    Loading,
    Ready(Arc<Pixmap>),
    Failed(String),
}

static NOT_REQUESTED: ImageState = ImageState::Loading;

#[derive(Debug)]
pub struct FetchResult {
    pub id: ImageId,
    pub result: Result<Pixmap>,
}

pub struct ImageCache {
    client: reqwest::Client,
    entries: HashMap<ImageId, ImageState>,
    results_tx: mpsc::Sender<FetchResult>,
}

impl ImageCache {
    /// The receiver yields fetch outcomes; feed them back through [`ImageCache::apply`].
    pub fn new(client: reqwest::Client) -> (Self, mpsc::Receiver<FetchResult>) {
        let (tx, rx) = mpsc::channel(16);
        let cache = Self {
            client,
            entries: HashMap::new(),
            results_tx: tx,
        };
        (cache, rx)
    }

    /// Start loading `id` unless it is already known. Failures are not retried.
    pub fn request(&mut self, id: &ImageId) {
        if self.entries.contains_key(id) {
            return;
        }
        self.entries.insert(id.clone(), ImageState::Loading);

        let client = self.client.clone();
        let tx = self.results_tx.clone();
        let id = id.clone();
        debug!("Loading image: {}", id);
        tokio::spawn(async move {
            let result = load(&client, &id).await;
            let _ = tx.send(FetchResult { id, result }).await;
        });
    }

    pub fn apply(&mut self, fetched: FetchResult) {
        let state = match fetched.result {
            Ok(pixmap) => {
                info!(
                    "Image ready: {} ({}x{})",
                    fetched.id,
                    pixmap.width(),
                    pixmap.height()
                );
                ImageState::Ready(Arc::new(pixmap))
            }
            Err(e) => {
                warn!("Failed to load image {}: {}", fetched.id, e);
                ImageState::Failed(e.to_string())
            }
        };
        self.entries.insert(fetched.id, state);
    }

    /// Unrequested ids report `Loading`.
    pub fn state(&self, id: &ImageId) -> &ImageState {
        self.entries.get(id).unwrap_or(&NOT_REQUESTED)
    }
}
