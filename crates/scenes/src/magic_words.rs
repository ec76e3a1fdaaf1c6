//! Magic Words: a chat transcript with inline emoji and avatars.

use crate::assets::ResolvedAssets;
use crate::config::ShowcaseConfig;
use crate::scene::{Scene, SceneContext};
use async_trait::async_trait;
use common::color::Color;
use common::error::ShowcaseResult;
use common::geometry::{Point, Rect};
use compositor::{AnimationController, Easing, FrameClock, LayerId, Stage, Tween};
use layout::{DialogueLayout, GlyphKind, LayoutRow};
use networking::fetch_dialogue;
use tracing::{info, warn};

const BACKGROUND: u32 = 0x101225;
const BUBBLE_COLOR: u32 = 0x2a2e4e;
const BUBBLE_RADIUS: f32 = 12.0;

/// Dialogue scene.
pub struct MagicWords {
    stage: Stage,
    tweens: AnimationController<Stage>,
    container: Option<LayerId>,
    rows: Vec<LayerId>,
    layout: Option<DialogueLayout>,
    assets: Option<ResolvedAssets>,
}

impl MagicWords {
    pub fn new(config: &ShowcaseConfig) -> Self {
        Self {
            stage: Stage::with_viewport(config.viewport()),
            tweens: AnimationController::new(),
            container: None,
            rows: Vec::new(),
            layout: None,
            assets: None,
        }
    }

    /// Layout of the loaded dialogue, once started.
    pub fn layout(&self) -> Option<&DialogueLayout> {
        self.layout.as_ref()
    }

    pub fn assets(&self) -> Option<&ResolvedAssets> {
        self.assets.as_ref()
    }

    /// Row layers in dialogue order.
    pub fn row_layers(&self) -> &[LayerId] {
        &self.rows
    }

    pub fn container(&self) -> Option<LayerId> {
        self.container
    }

    /// Whether any row is still sliding in.
    pub fn is_animating(&self) -> bool {
        self.tweens.has_active_animations()
    }

    fn populate(&mut self, layout: &DialogueLayout, assets: &ResolvedAssets, font_size: f32) {
        let Some(container) = self.container else {
            return;
        };
        if let Some(layer) = self.stage.get_layer_mut(container) {
            layer.set_scale(layout.scale);
            layer.position = layout.offset;
        }

        for row in &layout.rows {
            let row_layer = self.add_row(container, row, assets, font_size);
            self.rows.push(row_layer);

            let from = row.entrance.from_offset;
            self.tweens.add(
                Tween::new(0.0, 1.0, row.entrance.duration_ms)
                    .delay(row.entrance.delay_ms)
                    .easing(Easing::CubicOut)
                    .on_update(move |stage: &mut Stage, t| {
                        if let Some(layer) = stage.get_layer_mut(row_layer) {
                            layer.position.x = from * (1.0 - t);
                            layer.opacity = t;
                        }
                    }),
            );
        }
    }

    fn add_row(&mut self, container: LayerId, row: &LayoutRow, assets: &ResolvedAssets, font_size: f32) -> LayerId {
        let row_layer = self.stage.create_layer(container);
        if let Some(layer) = self.stage.get_layer_mut(row_layer) {
            layer.position = Point::new(row.entrance.from_offset, row.y);
            layer.opacity = 0.0;
            if let (Some(rect), Some((key, _))) = (row.avatar, assets.avatar(&row.speaker)) {
                layer.display_list.image(rect, key);
            }
        }

        let bubble_layer = self.stage.create_layer(row_layer);
        if let Some(bubble) = self.stage.get_layer_mut(bubble_layer) {
            bubble.position = row.bubble.origin();
            let list = &mut bubble.display_list;
            list.fill_rect(
                Rect::new(0.0, 0.0, row.bubble.width, row.bubble.height),
                Color::from_rgb_u32(BUBBLE_COLOR),
                Some(BUBBLE_RADIUS),
            );
            for glyph in &row.glyphs {
                match &glyph.kind {
                    GlyphKind::Word(text) => {
                        list.text(glyph.rect.origin(), glyph.rect.size(), text.as_str(), font_size, Color::WHITE);
                    }
                    GlyphKind::Emoji { name, .. } => {
                        list.image(glyph.rect, assets.emoji(name));
                    }
                }
            }
        }

        row_layer
    }
}

#[async_trait]
impl Scene for MagicWords {
    fn name(&self) -> &'static str {
        "Magic Words"
    }

    fn build(&mut self, _ctx: &SceneContext) {
        self.stage.set_background(Color::from_rgb_u32(BACKGROUND));
        let root = self.stage.root_layer();
        self.container = Some(self.stage.create_layer(root));
    }

    async fn start(&mut self, ctx: &SceneContext) -> ShowcaseResult<()> {
        let data = match fetch_dialogue(ctx.fetcher.as_ref(), &ctx.config.dialogue_endpoint).await {
            Ok(data) => data,
            Err(e) => {
                warn!(error = %e, "No dialogue available, scene stays empty");
                return Err(e);
            }
        };

        let assets = ResolvedAssets::resolve(&data, ctx.fetcher.as_ref(), &ctx.images).await;
        let layout = DialogueLayout::compute(&data.dialogue, &assets, ctx.viewport(), &ctx.config.layout);
        self.populate(&layout, &assets, ctx.config.layout.font_size);

        info!(
            rows = layout.rows.len(),
            scale = layout.scale,
            avatars = assets.avatar_count(),
            "Magic Words started"
        );
        self.layout = Some(layout);
        self.assets = Some(assets);
        Ok(())
    }

    fn update(&mut self, clock: &FrameClock) {
        self.tweens.update(clock.delta_ms(), &mut self.stage);
    }

    fn stage(&self) -> &Stage {
        &self.stage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::tests::png_bytes;
    use networking::{bundled_dialogue, proxy, MemoryFetcher};
    use render::{DisplayItemType, ImageKey};
    use std::sync::Arc;

    const ENDPOINT: &str = "https://dialogue.test/v2/magicwords";
    const SMILE_URL: &str = "https://cdn.test/smile.png";

    fn hello_payload() -> String {
        format!(
            r#"{{"dialogue":[{{"name":"Sheldon","text":"Hello {{smile}} world"}}],
                 "emojies":[{{"name":"smile","url":"{}"}}],
                 "avatars":[]}}"#,
            SMILE_URL
        )
    }

    async fn started(fetcher: MemoryFetcher) -> (MagicWords, SceneContext) {
        let config = ShowcaseConfig::default().with_endpoint(ENDPOINT);
        let ctx = SceneContext::new(config.clone(), Arc::new(fetcher));
        let mut scene = MagicWords::new(&config);
        scene.build(&ctx);
        scene.start(&ctx).await.unwrap();
        (scene, ctx)
    }

    fn image_keys(scene: &MagicWords) -> Vec<ImageKey> {
        scene
            .stage()
            .display_list()
            .items()
            .iter()
            .filter_map(|item| match &item.item_type {
                DisplayItemType::Image(image) => Some(image.image_key),
                _ => None,
            })
            .collect()
    }

    fn settle(scene: &mut MagicWords) {
        let mut clock = FrameClock::new();
        while scene.is_animating() {
            clock.advance(16.0);
            scene.update(&clock);
        }
    }

    #[tokio::test]
    async fn test_hello_smile_world() {
        let fetcher = MemoryFetcher::new()
            .with(ENDPOINT, hello_payload())
            .with(proxy::image_url(SMILE_URL), png_bytes());
        let (mut scene, ctx) = started(fetcher).await;

        let layout = scene.layout().unwrap();
        assert_eq!(layout.rows.len(), 1);
        assert_eq!(layout.rows[0].glyphs.len(), 3);

        settle(&mut scene);
        let keys = image_keys(&scene);
        assert_eq!(keys.len(), 1);
        assert_ne!(keys[0], ctx.images.placeholder());

        let texts: Vec<String> = scene
            .stage()
            .display_list()
            .items()
            .iter()
            .filter_map(|item| match &item.item_type {
                DisplayItemType::Text(text) => Some(text.text.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["Hello", "world"]);
    }

    #[tokio::test]
    async fn test_right_avatar_slides_in_from_right() {
        const PENNY_URL: &str = "https://cdn.test/penny.png";
        let payload = format!(
            r#"{{"dialogue":[{{"name":"Penny","text":"Hi there"}}],
                 "emojies":[],
                 "avatars":[{{"name":"Penny","url":"{}","position":"right"}}]}}"#,
            PENNY_URL
        );
        let fetcher = MemoryFetcher::new()
            .with(ENDPOINT, payload)
            .with(proxy::image_url(PENNY_URL), png_bytes());
        let (mut scene, ctx) = started(fetcher).await;

        let layout = scene.layout().unwrap();
        let row = &layout.rows[0];
        let config = &ctx.config.layout;
        let avatar_x = ctx.viewport().width - config.margin - config.avatar_size;
        assert_eq!(row.side, common::dialogue::Side::Right);
        assert_eq!(row.avatar.unwrap().x, avatar_x);
        assert!(row.entrance.from_offset > 0.0);
        let (scale, offset) = (layout.scale, layout.offset);
        let from = row.entrance.from_offset;

        let row_layer = scene.row_layers()[0];
        let avatar_item = &scene.stage().get_layer(row_layer).unwrap().display_list.items()[0];
        assert_eq!(avatar_item.bounds.x, avatar_x);

        let mut clock = FrameClock::new();
        clock.advance(100.0);
        scene.update(&clock);
        let x = scene.stage().get_layer(row_layer).unwrap().position.x;
        assert!(x > 0.0 && x < from, "{}", x);

        settle(&mut scene);
        let avatar_key = scene.assets().unwrap().avatar("Penny").unwrap().0;
        let list = scene.stage().display_list();
        let drawn = list
            .items()
            .iter()
            .find(|item| matches!(&item.item_type, DisplayItemType::Image(image) if image.image_key == avatar_key))
            .unwrap();
        let world = drawn.world_bounds();
        assert!((world.x - (avatar_x * scale + offset.x)).abs() < 1e-3);
        assert!((world.width - config.avatar_size * scale).abs() < 1e-3);
    }

    #[tokio::test]
    async fn test_failed_emoji_keeps_layout() {
        let good = MemoryFetcher::new()
            .with(ENDPOINT, hello_payload())
            .with(proxy::image_url(SMILE_URL), png_bytes());
        let bad = MemoryFetcher::new().with(ENDPOINT, hello_payload());

        let (good_scene, _) = started(good).await;
        let (mut bad_scene, bad_ctx) = started(bad).await;

        let a = &good_scene.layout().unwrap().rows[0];
        let b = &bad_scene.layout().unwrap().rows[0];
        assert_eq!(a.bubble, b.bubble);
        let rects_a: Vec<Rect> = a.glyphs.iter().map(|g| g.rect).collect();
        let rects_b: Vec<Rect> = b.glyphs.iter().map(|g| g.rect).collect();
        assert_eq!(rects_a, rects_b);

        settle(&mut bad_scene);
        assert_eq!(image_keys(&bad_scene), vec![bad_ctx.images.placeholder()]);
    }

    #[tokio::test]
    async fn test_offline_uses_bundled_dialogue() {
        let (mut scene, _) = started(MemoryFetcher::new()).await;
        let bundled = bundled_dialogue().unwrap();

        assert_eq!(scene.row_layers().len(), bundled.dialogue.len());
        assert_eq!(scene.assets().unwrap().avatar_count(), 0);
        assert!(scene
            .layout()
            .unwrap()
            .rows
            .iter()
            .all(|row| row.avatar.is_none() && row.side == common::dialogue::Side::Left));

        settle(&mut scene);
        for &row in scene.row_layers() {
            let layer = scene.stage().get_layer(row).unwrap();
            assert_eq!(layer.opacity, 1.0);
            assert_eq!(layer.position.x, 0.0);
        }
    }

    #[tokio::test]
    async fn test_entrance_is_staggered() {
        let (mut scene, _) = started(MemoryFetcher::new()).await;
        let rows = scene.row_layers().to_vec();
        let offset = scene.layout().unwrap().rows[0].entrance.from_offset;
        assert!(offset < 0.0);

        let mut clock = FrameClock::new();
        clock.advance(60.0);
        scene.update(&clock);

        let first = scene.stage().get_layer(rows[0]).unwrap();
        let second = scene.stage().get_layer(rows[1]).unwrap();
        assert!(first.opacity > 0.0);
        assert!(first.position.x > offset && first.position.x < 0.0);
        assert_eq!(second.opacity, 0.0);
        assert_eq!(second.position.x, scene.layout().unwrap().rows[1].entrance.from_offset);
    }

    #[tokio::test]
    async fn test_container_is_fitted() {
        let (scene, ctx) = started(MemoryFetcher::new()).await;
        let layout = scene.layout().unwrap();
        let container = scene.stage().get_layer(scene.container().unwrap()).unwrap();

        assert_eq!(container.scale, Point::new(layout.scale, layout.scale));
        assert_eq!(container.position, layout.offset);

        let fitted = layout.fitted_bounds().unwrap();
        let margin = ctx.config.layout.margin;
        assert!(fitted.width <= ctx.viewport().width - 2.0 * margin + 1e-3);
        assert!(fitted.height <= ctx.viewport().height - 2.0 * margin + 1e-3);
    }
}
