//! Showcase configuration.

use common::geometry::Size;
use layout::LayoutConfig;
use networking::DIALOGUE_ENDPOINT;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Showcase configuration.
#[derive(Clone, Debug)]
pub struct ShowcaseConfig {
    /// Viewport width.
    pub viewport_width: f32,
    /// Viewport height.
    pub viewport_height: f32,
    /// Clock time between card moves.
    pub card_interval_ms: f32,
    /// Number of card stacks.
    pub card_stacks: usize,
    /// Cards dealt into each stack at start.
    pub cards_per_stack: usize,
    /// Flame particle pool size.
    pub flame_particles: usize,
    /// Dialogue data URL.
    pub dialogue_endpoint: String,
    /// Seed for scene randomness. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Dialogue layout constants.
    pub layout: LayoutConfig,
}

impl ShowcaseConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Phone-sized portrait viewport.
    pub fn mobile() -> Self {
        Self {
            viewport_width: 375.0,
            viewport_height: 812.0,
            ..Self::default()
        }
    }

    /// Full HD viewport.
    pub fn desktop() -> Self {
        Self {
            viewport_width: 1920.0,
            viewport_height: 1080.0,
            ..Self::default()
        }
    }

    /// Set viewport size.
    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set the card move interval.
    pub fn with_card_interval(mut self, interval_ms: f32) -> Self {
        self.card_interval_ms = interval_ms;
        self
    }

    /// Set stack count and cards per stack.
    pub fn with_cards(mut self, stacks: usize, per_stack: usize) -> Self {
        self.card_stacks = stacks;
        self.cards_per_stack = per_stack;
        self
    }

    /// Set flame particle count.
    pub fn with_flame_particles(mut self, count: usize) -> Self {
        self.flame_particles = count;
        self
    }

    /// Set dialogue endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.dialogue_endpoint = endpoint.into();
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn viewport(&self) -> Size {
        Size::new(self.viewport_width, self.viewport_height)
    }

    /// Random source for a scene.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 720.0,
            card_interval_ms: 1000.0,
            card_stacks: 4,
            cards_per_stack: 36,
            flame_particles: 10,
            dialogue_endpoint: DIALOGUE_ENDPOINT.to_string(),
            seed: None,
            layout: LayoutConfig::default(),
        }
    }
}
