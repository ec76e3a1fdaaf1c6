//! The showcase scenes.
//!
//! Three independent scenes share one scene graph and tween engine:
//! - Ace of Shadows: cards travelling between stacks
//! - Magic Words: a chat transcript with inline emoji and avatars
//! - Phoenix Flame: an additive particle flame
//!
//! A [`SceneDirector`] switches between them and drives the active one.

pub mod ace_of_shadows;
pub mod assets;
pub mod config;
pub mod director;
pub mod magic_words;
pub mod phoenix_flame;
pub mod scene;

pub use ace_of_shadows::AceOfShadows;
pub use assets::ResolvedAssets;
pub use config::ShowcaseConfig;
pub use director::SceneDirector;
pub use magic_words::MagicWords;
pub use phoenix_flame::PhoenixFlame;
pub use scene::{Scene, SceneContext, SceneKind};
