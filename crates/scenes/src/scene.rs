//! Scene abstraction.

use crate::ace_of_shadows::AceOfShadows;
use crate::config::ShowcaseConfig;
use crate::magic_words::MagicWords;
use crate::phoenix_flame::PhoenixFlame;
use async_trait::async_trait;
use common::error::{ShowcaseError, ShowcaseResult};
use common::geometry::Size;
use compositor::{FrameClock, Stage};
use networking::Fetcher;
use render::ImageCache;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Shared services handed to scenes.
#[derive(Clone)]
pub struct SceneContext {
    pub config: ShowcaseConfig,
    /// Decoded images, shared across scenes.
    pub images: Arc<ImageCache>,
    /// Source for remote data and images.
    pub fetcher: Arc<dyn Fetcher>,
}

impl SceneContext {
    pub fn new(config: ShowcaseConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            config,
            images: Arc::new(ImageCache::new()),
            fetcher,
        }
    }

    pub fn viewport(&self) -> Size {
        self.config.viewport()
    }
}

/// A self-contained animated scene.
///
/// The director calls [`Scene::build`] once, awaits [`Scene::start`], then
/// calls [`Scene::update`] every frame.
#[async_trait]
pub trait Scene: Send {
    fn name(&self) -> &'static str;

    /// Create the scene graph.
    fn build(&mut self, ctx: &SceneContext);

    /// Load anything the scene needs before its first frame.
    async fn start(&mut self, _ctx: &SceneContext) -> ShowcaseResult<()> {
        Ok(())
    }

    /// Advance one frame.
    fn update(&mut self, clock: &FrameClock);

    /// The scene graph.
    fn stage(&self) -> &Stage;
}

/// The available scenes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SceneKind {
    AceOfShadows,
    MagicWords,
    PhoenixFlame,
}

impl SceneKind {
    pub const ALL: [SceneKind; 3] = [
        SceneKind::AceOfShadows,
        SceneKind::MagicWords,
        SceneKind::PhoenixFlame,
    ];

    /// Kebab-case identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            SceneKind::AceOfShadows => "ace-of-shadows",
            SceneKind::MagicWords => "magic-words",
            SceneKind::PhoenixFlame => "phoenix-flame",
        }
    }

    /// Human-readable title.
    pub fn title(&self) -> &'static str {
        match self {
            SceneKind::AceOfShadows => "Ace of Shadows",
            SceneKind::MagicWords => "Magic Words",
            SceneKind::PhoenixFlame => "Phoenix Flame",
        }
    }

    /// Construct an unbuilt scene.
    pub fn create(&self, config: &ShowcaseConfig) -> Box<dyn Scene> {
        match self {
            SceneKind::AceOfShadows => Box::new(AceOfShadows::new(config)),
            SceneKind::MagicWords => Box::new(MagicWords::new(config)),
            SceneKind::PhoenixFlame => Box::new(PhoenixFlame::new(config)),
        }
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SceneKind {
    type Err = ShowcaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(|c: char| c == '_' || c == ' ', "-");
        SceneKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ShowcaseError::UnknownScene(s.to_string()))
    }
}
