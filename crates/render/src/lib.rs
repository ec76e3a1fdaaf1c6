//! Rendering primitives for the scene graph.
//!
//! This crate handles:
//! - Display items (shapes, text, images) in paint order
//! - Image decoding and caching, including the transparent placeholder

pub mod display_list;
pub mod image_cache;

pub use display_list::{BlendMode, DisplayItem, DisplayItemType, DisplayList};
pub use image_cache::{ImageCache, ImageData, ImageError, ImageKey};
