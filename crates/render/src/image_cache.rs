//! Image caching and decoding.

use image::ImageFormat;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Image key for identifying images.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageKey(pub u64);

/// Image decoding errors.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Unknown image format")]
    UnknownFormat,
    #[error("Decoding error: {0}")]
    DecodingError(String),
}

/// Decoded image data.
#[derive(Clone)]
pub struct ImageData {
    /// Image width.
    pub width: u32,
    /// Image height.
    pub height: u32,
    /// RGBA pixel data.
    pub data: Vec<u8>,
    /// Original format.
    pub format: ImageFormat,
}

impl std::fmt::Debug for ImageData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageData")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .finish()
    }
}

impl ImageData {
    /// Create from raw RGBA data.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
            format: ImageFormat::Png,
        }
    }

    /// A fully transparent 1x1 image.
    pub fn transparent() -> Self {
        Self::from_rgba(1, 1, vec![0; 4])
    }

    /// Decode from bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, ImageError> {
        let format = image::guess_format(bytes).map_err(|_| ImageError::UnknownFormat)?;
        let img = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| ImageError::DecodingError(e.to_string()))?;
        let rgba = img.to_rgba8();

        Ok(Self {
            width: rgba.width(),
            height: rgba.height(),
            data: rgba.into_raw(),
            format,
        })
    }

    /// Whether every pixel has zero alpha.
    pub fn is_fully_transparent(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Get memory size in bytes.
    pub fn memory_size(&self) -> usize {
        self.data.len()
    }
}

/// Image cache for decoded images.
///
/// Keys are handed out by the cache. A transparent placeholder is always
/// present so callers can fall back to it without a lookup failing. Images
/// loaded from a URL are indexed by it, so loading the same URL again reuses
/// the existing key.
pub struct ImageCache {
    /// Cached images by key.
    cache: RwLock<HashMap<ImageKey, Arc<ImageData>>>,
    /// Keys of images that came from a URL.
    by_url: RwLock<HashMap<String, ImageKey>>,
    /// Next key to hand out.
    next_key: AtomicU64,
    /// Key of the transparent placeholder.
    placeholder: ImageKey,
}

impl ImageCache {
    pub fn new() -> Self {
        let placeholder = ImageKey(0);
        let mut cache = HashMap::new();
        cache.insert(placeholder, Arc::new(ImageData::transparent()));

        Self {
            cache: RwLock::new(cache),
            by_url: RwLock::new(HashMap::new()),
            next_key: AtomicU64::new(1),
            placeholder,
        }
    }

    /// Key of the fully transparent 1x1 placeholder.
    pub fn placeholder(&self) -> ImageKey {
        self.placeholder
    }

    /// Get an image from the cache.
    pub fn get(&self, key: ImageKey) -> Option<Arc<ImageData>> {
        self.cache.read().get(&key).cloned()
    }

    /// Insert an image and return its new key.
    pub fn insert(&self, data: ImageData) -> ImageKey {
        let key = ImageKey(self.next_key.fetch_add(1, Ordering::Relaxed));
        self.cache.write().insert(key, Arc::new(data));
        key
    }

    /// Decode and cache an image from bytes.
    pub fn decode_and_cache(&self, bytes: &[u8]) -> Result<ImageKey, ImageError> {
        let data = ImageData::decode(bytes)?;
        tracing::debug!(width = data.width, height = data.height, "decoded image");
        Ok(self.insert(data))
    }

    /// Key of an image previously loaded from `url`.
    pub fn key_for_url(&self, url: &str) -> Option<ImageKey> {
        self.by_url.read().get(url).copied()
    }

    /// Decode and cache an image loaded from `url`.
    ///
    /// If `url` is already cached its key is returned and `bytes` are ignored.
    pub fn decode_and_cache_url(&self, url: &str, bytes: &[u8]) -> Result<ImageKey, ImageError> {
        if let Some(key) = self.key_for_url(url) {
            return Ok(key);
        }
        let data = ImageData::decode(bytes)?;

        let mut by_url = self.by_url.write();
        if let Some(&key) = by_url.get(url) {
            return Ok(key);
        }
        tracing::debug!(url, width = data.width, height = data.height, "decoded image");
        let key = self.insert(data);
        by_url.insert(url.to_string(), key);
        Ok(key)
    }

    /// Get current cache size in bytes.
    pub fn size(&self) -> usize {
        self.cache.read().values().map(|d| d.memory_size()).sum()
    }

    /// Get number of cached images, placeholder included.
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    /// Always false: the placeholder is never evicted.
    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new()
    }
}
