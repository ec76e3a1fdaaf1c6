//! Common types shared across the showcase crates.

pub mod color;
pub mod dialogue;
pub mod error;
pub mod geometry;

pub use color::Color;
pub use dialogue::{Avatar, DialogueData, DialogueLine, Emoji, Side};
pub use error::{ShowcaseError, ShowcaseResult};
pub use geometry::{Point, Rect, Size, Transform};
