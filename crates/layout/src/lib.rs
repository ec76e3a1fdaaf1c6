//! Dialogue layout.
//!
//! This crate measures text, wraps words and inline emoji into bubbles and
//! stacks the bubbles into a column that fits the viewport.

pub mod dialogue;
pub mod inline;
pub mod markup;
pub mod text;

pub use dialogue::{DialogueAssets, DialogueLayout, Entrance, LayoutConfig, LayoutRow};
pub use inline::{GlyphKind, InlineFlow, PlacedGlyph};
pub use text::TextShaper;
