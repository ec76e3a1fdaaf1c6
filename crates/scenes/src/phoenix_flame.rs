//! Phoenix Flame: a small pool of additive blobs rising from a glowing base.

use crate::config::ShowcaseConfig;
use crate::scene::{Scene, SceneContext};
use common::color::Color;
use common::geometry::{Point, Size};
use compositor::{FrameClock, LayerId, Stage};
use rand::rngs::StdRng;
use rand::Rng;
use render::BlendMode;
use std::f32::consts::TAU;
use tracing::info;

/// Ratio at which a particle is recycled.
const RESET_RATIO: f32 = 0.99;
const INITIAL_JITTER_MS: f32 = 1200.0;

/// One flame blob.
#[derive(Clone, Debug)]
pub struct Particle {
    pub elapsed_ms: f32,
    pub life_ms: f32,
    /// Vertical travel over one life.
    pub rise: f32,
    /// Peak horizontal swing.
    pub sway: f32,
    pub scale_factor: f32,
    pub layer: LayerId,
}

impl Particle {
    fn spawn(layer: LayerId, rng: &mut StdRng, elapsed_ms: f32) -> Self {
        let mut particle = Self {
            elapsed_ms,
            life_ms: 0.0,
            rise: 0.0,
            sway: 0.0,
            scale_factor: 1.0,
            layer,
        };
        particle.reroll(rng);
        particle.elapsed_ms = elapsed_ms;
        particle
    }

    fn reroll(&mut self, rng: &mut StdRng) {
        self.elapsed_ms = 0.0;
        self.rise = rng.gen_range(200.0..400.0);
        self.sway = rng.gen_range(-45.0..45.0);
        self.life_ms = rng.gen_range(1600.0..2000.0);
        self.scale_factor = rng.gen_range(1.0..1.7);
    }

    /// Progress through the current life, 0..1.
    pub fn ratio(&self) -> f32 {
        (self.elapsed_ms % self.life_ms) / self.life_ms
    }

    /// Offset from the flame centre at a given progress.
    pub fn offset_at(&self, r: f32) -> Point {
        Point::new(self.sway * (1.0 - r) * (TAU * r).sin(), -self.rise * r)
    }
}

/// Quick fade in over the first third, then a linear fade out.
pub fn flame_alpha(r: f32) -> f32 {
    (r * 3.0).min(1.0) * (1.0 - r)
}

/// Blobs grow as they rise.
pub fn flame_scale(scale_factor: f32, r: f32) -> f32 {
    scale_factor * (0.35 + r)
}

/// Particle flame scene.
pub struct PhoenixFlame {
    stage: Stage,
    particles: Vec<Particle>,
    glow: Option<LayerId>,
    center: Point,
    particle_count: usize,
    rng: StdRng,
}

impl PhoenixFlame {
    pub fn new(config: &ShowcaseConfig) -> Self {
        Self {
            stage: Stage::with_viewport(config.viewport()),
            particles: Vec::new(),
            glow: None,
            center: flame_center(config.viewport()),
            particle_count: config.flame_particles,
            rng: config.rng(),
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn center(&self) -> Point {
        self.center
    }

    fn redraw_glow(&mut self) {
        let Some(glow) = self.glow else {
            return;
        };
        let width = 140.0 + self.rng.gen::<f32>() * 18.0;
        let height = 30.0 + self.rng.gen::<f32>() * 6.0;
        let center = self.center;

        if let Some(layer) = self.stage.get_layer_mut(glow) {
            layer.display_list.clear();
            layer
                .display_list
                .fill_ellipse(
                    Point::new(center.x, center.y + 12.0),
                    width,
                    height,
                    Color::from_rgb_u32(0x330c00).with_alpha(0.45),
                )
                .fill_circle(center, 44.0, Color::from_rgb_u32(0xff3300).with_alpha(0.55));
        }
    }
}

fn flame_center(viewport: Size) -> Point {
    Point::new(viewport.width / 2.0, viewport.height * 0.68)
}

impl Scene for PhoenixFlame {
    fn name(&self) -> &'static str {
        "Phoenix Flame"
    }

    fn build(&mut self, ctx: &SceneContext) {
        self.center = flame_center(ctx.viewport());
        let root = self.stage.root_layer();
        self.stage.set_background(Color::from_rgb_u32(0x0b0b12));

        let glow = self.stage.create_layer(root);
        if let Some(layer) = self.stage.get_layer_mut(glow) {
            layer.z_index = -1;
        }
        self.glow = Some(glow);

        for _ in 0..self.particle_count {
            let layer = self.stage.create_layer(root);
            if let Some(blob) = self.stage.get_layer_mut(layer) {
                blob.blend_mode = BlendMode::Add;
                blob.position = self.center;
                blob.opacity = 0.0;
                let origin = Point::new(0.0, 0.0);
                blob.display_list
                    .fill_circle(origin, 60.0, Color::from_rgb_u32(0xff6a00))
                    .fill_circle(origin, 42.0, Color::from_rgb_u32(0xff9a00).with_alpha(0.9))
                    .fill_circle(origin, 26.0, Color::from_rgb_u32(0xffd040).with_alpha(0.8));
            }
            let jitter = self.rng.gen_range(0.0..INITIAL_JITTER_MS);
            let particle = Particle::spawn(layer, &mut self.rng, jitter);
            if let Some(blob) = self.stage.get_layer_mut(layer) {
                blob.set_scale(flame_scale(particle.scale_factor, 0.0));
            }
            self.particles.push(particle);
        }

        self.redraw_glow();
        info!(particles = self.particles.len(), "Phoenix Flame built");
    }

    fn update(&mut self, clock: &FrameClock) {
        let delta = clock.delta_ms();

        for particle in &mut self.particles {
            particle.elapsed_ms += delta;
            let r = particle.ratio();

            let Some(layer) = self.stage.get_layer_mut(particle.layer) else {
                continue;
            };
            layer.position = self.center + particle.offset_at(r);
            layer.opacity = flame_alpha(r);
            layer.set_scale(flame_scale(particle.scale_factor, r));

            if r >= RESET_RATIO {
                particle.reroll(&mut self.rng);
                layer.position = self.center;
                layer.opacity = 0.0;
            }
        }

        self.redraw_glow();
    }

    fn stage(&self) -> &Stage {
        &self.stage
    }
}
