//! Retained-mode scene graph and frame-driven animation.
//!
//! The compositor owns everything a scene mutates per frame:
//! - the layer tree (containers with transform, opacity and content)
//! - the stage wrapping a tree with its viewport
//! - the frame clock
//! - tweens and their controller

pub mod animation;
pub mod clock;
pub mod layer;
pub mod stage;

pub use animation::{AnimationController, Easing, Tween, TweenId};
pub use clock::{FrameClock, Ticker};
pub use layer::{Layer, LayerId, LayerTree};
pub use stage::Stage;
