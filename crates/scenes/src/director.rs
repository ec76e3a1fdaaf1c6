//! Scene director: owns the active scene and its clock.

use crate::scene::{Scene, SceneContext, SceneKind};
use common::error::ShowcaseResult;
use compositor::FrameClock;
use render::DisplayList;
use tracing::{debug, info, warn};

struct ActiveScene {
    kind: SceneKind,
    scene: Box<dyn Scene>,
    clock: FrameClock,
}

/// Switches between scenes and drives the active one.
pub struct SceneDirector {
    ctx: SceneContext,
    active: Option<ActiveScene>,
}

impl SceneDirector {
    pub fn new(ctx: SceneContext) -> Self {
        Self { ctx, active: None }
    }

    pub fn context(&self) -> &SceneContext {
        &self.ctx
    }

    /// Replace the active scene with a freshly built and started `kind`.
    ///
    /// The new scene becomes active even if starting it fails; it then
    /// renders whatever it built before the failure.
    pub async fn switch(&mut self, kind: SceneKind) -> ShowcaseResult<()> {
        if let Some(previous) = self.active.take() {
            info!(scene = %previous.kind, frames = previous.clock.frame(), "Leaving scene");
        }

        let mut scene = kind.create(&self.ctx.config);
        scene.build(&self.ctx);
        let started = scene.start(&self.ctx).await;
        if let Err(e) = &started {
            warn!(scene = %kind, error = %e, "Scene failed to start");
        }

        info!(
            scene = %kind,
            title = scene.name(),
            images = self.ctx.images.len(),
            image_bytes = self.ctx.images.size(),
            "Entered scene"
        );
        self.active = Some(ActiveScene {
            kind,
            scene,
            clock: FrameClock::new(),
        });
        started
    }

    /// Advance the active scene by one frame.
    pub fn tick(&mut self, delta_ms: f32) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        active.clock.advance(delta_ms);
        active.scene.update(&active.clock);

        if active.clock.frame() % 600 == 0 {
            debug!(
                scene = %active.kind,
                frame = active.clock.frame(),
                elapsed_ms = active.clock.elapsed_ms(),
                "Frame checkpoint"
            );
        }
    }

    pub fn active_kind(&self) -> Option<SceneKind> {
        self.active.as_ref().map(|a| a.kind)
    }

    pub fn scene(&self) -> Option<&dyn Scene> {
        self.active.as_ref().map(|a| a.scene.as_ref())
    }

    pub fn clock(&self) -> Option<&FrameClock> {
        self.active.as_ref().map(|a| &a.clock)
    }

    /// Flattened output of the active scene; empty when none is active.
    pub fn display_list(&self) -> DisplayList {
        self.active
            .as_ref()
            .map(|a| a.scene.stage().display_list())
            .unwrap_or_default()
    }
}
