//! Background image loading to keep the UI loop responsive.
//!
//! Each requested URI is fetched and decoded on its own worker thread; the
//! result comes back over the update channel.  Decoded images are shrunk to
//! a bounded thumbnail right away, since the terminal can never show more
//! detail than that.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::error::{GalleryError, Result};

/// Largest thumbnail kept in memory per image.
const THUMB_MAX_W: u32 = 480;
const THUMB_MAX_H: u32 = 320;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

pub struct ImageUpdate {
    pub uri: String,
    pub result: Result<Arc<image::RgbaImage>>,
}

/// Spawns loads and knows how to resolve relative paths.
#[derive(Debug, Clone)]
pub struct ImageLoader {
    base_dir: PathBuf,
    tx: mpsc::UnboundedSender<ImageUpdate>,
}

impl ImageLoader {
    pub fn new(base_dir: PathBuf, tx: mpsc::UnboundedSender<ImageUpdate>) -> Self {
        Self { base_dir, tx }
    }

    pub fn spawn_load(&self, uri: String) {
        let tx = self.tx.clone();
        let base_dir = self.base_dir.clone();
        std::thread::spawn(move || {
            let t0 = std::time::Instant::now();
            let result = load_image(&uri, &base_dir).map(Arc::new);
            tracing::debug!(uri = %uri, elapsed = ?t0.elapsed(), ok = result.is_ok(), "image load finished");
            // receiver gone means the gallery is shutting down
            let _ = tx.send(ImageUpdate { uri, result });
        });
    }
}

pub fn is_remote(uri: &str) -> bool {
    uri.starts_with("http://") || uri.starts_with("https://")
}

/// Fetch and decode `uri`, shrunk to thumbnail size when larger.
pub fn load_image(uri: &str, base_dir: &Path) -> Result<image::RgbaImage> {
    let bytes = if is_remote(uri) {
        fetch_remote(uri)?
    } else {
        let path = resolve_path(uri, base_dir);
        std::fs::read(&path).map_err(|source| GalleryError::Io { path, source })?
    };

    let decoded = image::load_from_memory(&bytes).map_err(|e| GalleryError::ImageLoad {
        uri: uri.to_string(),
        reason: e.to_string(),
    })?;
    if decoded.width() > THUMB_MAX_W || decoded.height() > THUMB_MAX_H {
        Ok(decoded.thumbnail(THUMB_MAX_W, THUMB_MAX_H).to_rgba8())
    } else {
        Ok(decoded.to_rgba8())
    }
}

fn resolve_path(uri: &str, base_dir: &Path) -> PathBuf {
    let stripped = uri.strip_prefix("file://").unwrap_or(uri);
    let path = Path::new(stripped);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

fn fetch_remote(uri: &str) -> Result<Vec<u8>> {
    let to_err = |e: reqwest::Error| GalleryError::ImageLoad {
        uri: uri.to_string(),
        reason: e.to_string(),
    };
    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(to_err)?;
    let response = client
        .get(uri)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(to_err)?;
    let bytes = response.bytes().map_err(to_err)?;
    Ok(bytes.to_vec())
}
