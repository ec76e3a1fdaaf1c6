//! Resource loading.

use crate::client::{ClientError, HttpClient};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::debug;
use url::Url;

/// Result of loading a resource.
pub type LoadResult = Result<LoadedResource, LoadError>;

/// Anything that can fetch a URL.
///
/// Scenes only see this trait, so tests and offline runs can substitute a
/// [`MemoryFetcher`] for the network.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> LoadResult;
}

/// Loader configuration.
#[derive(Clone, Debug)]
pub struct LoaderConfig {
    /// Maximum concurrent loads.
    pub max_concurrent: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self { max_concurrent: 6 }
    }
}

/// A loaded resource.
#[derive(Clone, Debug)]
pub struct LoadedResource {
    /// Final URL (after redirects).
    pub url: String,
    /// Content type.
    pub content_type: Option<String>,
    /// Resource data.
    pub data: Bytes,
    /// HTTP status code.
    pub status: u16,
    /// Total load time.
    pub load_time: Duration,
}

/// Load error.
#[derive(Clone, Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP error: {status}")]
    Http { status: u16 },
    #[error("Timeout")]
    Timeout,
    #[error("Cancelled")]
    Cancelled,
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<ClientError> for LoadError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Timeout => LoadError::Timeout,
            ClientError::InvalidUrl(msg) => LoadError::InvalidUrl(msg),
            _ => LoadError::Network(err.to_string()),
        }
    }
}

/// HTTP resource loader with a cap on concurrent requests.
pub struct ResourceLoader {
    /// HTTP client.
    client: Arc<HttpClient>,
    /// Configuration.
    config: LoaderConfig,
    /// Loading semaphore.
    semaphore: Arc<Semaphore>,
}

impl ResourceLoader {
    /// Create a new resource loader.
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self::with_config(client, LoaderConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(client: Arc<HttpClient>, config: LoaderConfig) -> Self {
        Self {
            client,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
            config,
        }
    }

    /// Load a resource.
    pub async fn load(&self, url: &str) -> LoadResult {
        let url = Url::parse(url).map_err(|e| LoadError::InvalidUrl(e.to_string()))?;

        let _permit = self.semaphore.acquire().await.map_err(|_| LoadError::Cancelled)?;

        let start = Instant::now();
        let response = self.client.get(url.as_str()).await?;

        if !response.is_success() {
            return Err(LoadError::Http {
                status: response.status,
            });
        }

        let load_time = start.elapsed();
        debug!(url = %response.url, status = response.status, ?load_time, "Loaded resource");

        Ok(LoadedResource {
            url: response.url.to_string(),
            content_type: response.content_type,
            data: response.body,
            status: response.status,
            load_time,
        })
    }

    /// Load multiple resources in parallel.
    pub async fn load_all(&self, urls: &[&str]) -> Vec<LoadResult> {
        let futures: Vec<_> = urls.iter().map(|url| self.load(url)).collect();
        futures::future::join_all(futures).await
    }

    /// Get loader configuration.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }
}

#[async_trait]
impl Fetcher for ResourceLoader {
    async fn fetch(&self, url: &str) -> LoadResult {
        self.load(url).await
    }
}

/// Serves resources from memory. Unknown URLs fail with [`LoadError::NotFound`].
#[derive(Clone, Debug, Default)]
pub struct MemoryFetcher {
    resources: HashMap<String, Bytes>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `data` at `url`.
    pub fn with(mut self, url: impl Into<String>, data: impl Into<Bytes>) -> Self {
        self.insert(url, data);
        self
    }

    pub fn insert(&mut self, url: impl Into<String>, data: impl Into<Bytes>) {
        self.resources.insert(url.into(), data.into());
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[async_trait]
impl Fetcher for MemoryFetcher {
    async fn fetch(&self, url: &str) -> LoadResult {
        let data = self
            .resources
            .get(url)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(url.to_string()))?;

        Ok(LoadedResource {
            url: url.to_string(),
            content_type: None,
            data,
            status: 200,
            load_time: Duration::ZERO,
        })
    }
}
