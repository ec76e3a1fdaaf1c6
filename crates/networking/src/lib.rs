//! Networking for the showcase.
//!
//! This crate handles:
//! - HTTP GET requests over reqwest
//! - Concurrency-limited resource loading
//! - The dialogue endpoint and its bundled fallback
//! - Optional image proxying

pub mod client;
pub mod dialogue;
pub mod loader;
pub mod proxy;

pub use client::{ClientConfig, ClientError, HttpClient, HttpClientBuilder, HttpResponse};
pub use dialogue::{bundled_dialogue, fetch_dialogue, DIALOGUE_ENDPOINT};
pub use loader::{Fetcher, LoadError, LoadResult, LoadedResource, LoaderConfig, MemoryFetcher, ResourceLoader};
