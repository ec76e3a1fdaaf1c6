//! Chat-bubble layout for dialogue scripts.
//!
//! Each dialogue line becomes one row: an optional avatar and a rounded
//! bubble holding words and inline emoji, anchored to the left or right edge
//! depending on the speaker. Rows stack top to bottom and the whole column is
//! scaled down and centred to fit the viewport.

use crate::inline::{FlowMetrics, InlineFlow, PlacedGlyph};
use crate::markup::{tokenize, Token};
use crate::text::TextShaper;
use common::dialogue::{DialogueLine, Side};
use common::geometry::{Point, Rect, Size};
use tracing::debug;

/// Lookups the layout needs from resolved assets.
pub trait DialogueAssets {
    /// Side of the speaker's avatar, if it loaded.
    fn avatar_side(&self, speaker: &str) -> Option<Side>;

    /// Whether an emoji image is available.
    fn has_emoji(&self, name: &str) -> bool;
}

/// Layout constants.
#[derive(Clone, Debug)]
pub struct LayoutConfig {
    pub margin: f32,
    pub row_gap: f32,
    pub pad_x: f32,
    pub pad_y: f32,
    pub line_spacing: f32,
    pub font_size: f32,
    pub avatar_size: f32,
    pub avatar_gap: f32,
    pub emoji_gap: f32,
    pub min_bubble_width: f32,
    pub bubble_width_floor: f32,
    pub bubble_width_cap: f32,
    pub bubble_width_ratio: f32,
    pub slide_ratio: f32,
    pub slide_min: f32,
    pub slide_max: f32,
    pub entrance_duration_ms: f32,
    pub entrance_stagger_ms: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin: 20.0,
            row_gap: 22.0,
            pad_x: 14.0,
            pad_y: 10.0,
            line_spacing: 6.0,
            font_size: 16.0,
            avatar_size: 44.0,
            avatar_gap: 10.0,
            emoji_gap: 6.0,
            min_bubble_width: 120.0,
            bubble_width_floor: 320.0,
            bubble_width_cap: 520.0,
            bubble_width_ratio: 0.48,
            slide_ratio: 0.15,
            slide_min: 120.0,
            slide_max: 220.0,
            entrance_duration_ms: 450.0,
            entrance_stagger_ms: 90.0,
        }
    }
}

impl LayoutConfig {
    /// Widest a bubble may grow for a viewport width.
    pub fn max_bubble_width(&self, viewport_width: f32) -> f32 {
        (viewport_width * self.bubble_width_ratio)
            .floor()
            .max(self.bubble_width_floor)
            .min(self.bubble_width_cap)
    }

    /// Emoji glyph edge length.
    pub fn emoji_size(&self) -> f32 {
        self.font_size + 6.0
    }

    /// Distance rows slide in from.
    pub fn slide_offset(&self, viewport_width: f32) -> f32 {
        (viewport_width * self.slide_ratio)
            .floor()
            .clamp(self.slide_min, self.slide_max)
    }
}

/// Entrance animation parameters for one row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Entrance {
    /// Starting x offset; negative for left rows.
    pub from_offset: f32,
    pub delay_ms: f32,
    pub duration_ms: f32,
}

/// A laid-out dialogue line.
///
/// `avatar` and `bubble` are in row coordinates: x is absolute, y is relative
/// to the row top at [`LayoutRow::y`]. Glyph rects are bubble-local.
#[derive(Clone, Debug)]
pub struct LayoutRow {
    pub index: usize,
    pub speaker: String,
    pub side: Side,
    pub avatar: Option<Rect>,
    pub bubble: Rect,
    pub glyphs: Vec<PlacedGlyph>,
    /// Bubble x at rest.
    pub target_x: f32,
    /// Row top.
    pub y: f32,
    pub entrance: Entrance,
}

impl LayoutRow {
    /// Row height used for stacking.
    pub fn height(&self, config: &LayoutConfig) -> f32 {
        self.bubble.height.max(config.avatar_size)
    }

    /// Bubble, avatar and glyphs at rest, in container coordinates.
    ///
    /// A lone oversize glyph can stick out of its clamped bubble, so glyphs
    /// are included.
    pub fn bounds(&self) -> Rect {
        let bubble = self.bubble;
        let mut bounds = match self.avatar {
            Some(avatar) => bubble.union(&avatar),
            None => bubble,
        };
        for glyph in &self.glyphs {
            bounds = bounds.union(&glyph.rect.translate(bubble.x, bubble.y));
        }
        bounds.translate(0.0, self.y)
    }
}

/// Result of laying out a dialogue.
#[derive(Clone, Debug)]
pub struct DialogueLayout {
    pub rows: Vec<LayoutRow>,
    /// Union of all rows at rest, before fitting.
    pub bounds: Option<Rect>,
    /// Uniform container scale, at most 1.
    pub scale: f32,
    /// Container translation applied after scaling.
    pub offset: Point,
}

impl DialogueLayout {
    /// Lay out every line for the given viewport.
    pub fn compute(
        lines: &[DialogueLine],
        assets: &dyn DialogueAssets,
        viewport: Size,
        config: &LayoutConfig,
    ) -> Self {
        let shaper = TextShaper::new(config.font_size);
        let max_width = config.max_bubble_width(viewport.width);
        let slide = config.slide_offset(viewport.width);

        let mut rows = Vec::with_capacity(lines.len());
        let mut y = config.margin;

        for (index, line) in lines.iter().enumerate() {
            let avatar_side = assets.avatar_side(&line.name);
            let side = avatar_side.unwrap_or_default();
            let has_avatar = avatar_side.is_some();

            let (glyphs, bubble_size) = layout_bubble(&line.text, assets, &shaper, max_width, config);

            let avatar_space = if has_avatar {
                config.avatar_size + config.avatar_gap
            } else {
                0.0
            };
            let (bubble_x, avatar_x) = match side {
                Side::Left => (config.margin + avatar_space, config.margin),
                Side::Right => (
                    viewport.width - config.margin - bubble_size.width - avatar_space,
                    viewport.width - config.margin - config.avatar_size,
                ),
            };

            let row = LayoutRow {
                index,
                speaker: line.name.clone(),
                side,
                avatar: has_avatar.then(|| {
                    Rect::new(avatar_x, 0.0, config.avatar_size, config.avatar_size)
                }),
                bubble: Rect::from_origin_size(Point::new(bubble_x, 0.0), bubble_size),
                glyphs,
                target_x: bubble_x,
                y,
                entrance: Entrance {
                    from_offset: side.outward() * slide,
                    delay_ms: index as f32 * config.entrance_stagger_ms,
                    duration_ms: config.entrance_duration_ms,
                },
            };

            y += row.height(config) + config.row_gap;
            rows.push(row);
        }

        let row_bounds: Vec<Rect> = rows.iter().map(LayoutRow::bounds).collect();
        let bounds = Rect::union_all(row_bounds.iter());
        let (scale, offset) = fit(bounds, viewport, config.margin);

        debug!(
            rows = rows.len(),
            scale,
            offset_x = offset.x,
            offset_y = offset.y,
            "Dialogue laid out"
        );

        Self {
            rows,
            bounds,
            scale,
            offset,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Bounds after the container scale and offset are applied.
    pub fn fitted_bounds(&self) -> Option<Rect> {
        self.bounds.map(|b| {
            Rect::new(
                b.x * self.scale + self.offset.x,
                b.y * self.scale + self.offset.y,
                b.width * self.scale,
                b.height * self.scale,
            )
        })
    }
}

fn layout_bubble(
    text: &str,
    assets: &dyn DialogueAssets,
    shaper: &TextShaper,
    max_width: f32,
    config: &LayoutConfig,
) -> (Vec<PlacedGlyph>, Size) {
    let mut flow = InlineFlow::new(FlowMetrics {
        max_width,
        pad_x: config.pad_x,
        pad_y: config.pad_y,
        line_spacing: config.line_spacing,
    });

    for token in tokenize(text) {
        match token {
            Token::Word(word) => {
                let size = shaper.measure(word);
                flow.push_word(word, size.width, size.height);
            }
            Token::Space => flow.push_space(shaper.space_width()),
            Token::Emoji(name) => flow.push_emoji(
                name,
                assets.has_emoji(name),
                config.emoji_size(),
                config.emoji_gap,
            ),
        }
    }

    let result = flow.finish();
    let width = (result.content_max_x + config.pad_x)
        .max(config.min_bubble_width)
        .min(max_width);
    let height = result.last_line_y + result.last_line_height + config.pad_y;

    (result.glyphs, Size::new(width, height))
}

fn fit(bounds: Option<Rect>, viewport: Size, margin: f32) -> (f32, Point) {
    let Some(bounds) = bounds else {
        return (1.0, Point::new(0.0, 0.0));
    };
    if bounds.is_empty() {
        return (1.0, Point::new(0.0, 0.0));
    }

    let available_w = (viewport.width - margin * 2.0).max(0.0);
    let available_h = (viewport.height - margin * 2.0).max(0.0);
    let scale = 1.0_f32
        .min(available_w / bounds.width)
        .min(available_h / bounds.height);

    let offset = Point::new(
        ((viewport.width - bounds.width * scale) / 2.0 - bounds.x * scale).round(),
        ((viewport.height - bounds.height * scale) / 2.0 - bounds.y * scale).round(),
    );
    (scale, offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inline::GlyphKind;
    use std::collections::{HashMap, HashSet};

    #[derive(Default)]
    struct Assets {
        avatars: HashMap<String, Side>,
        emojis: HashSet<String>,
    }

    impl DialogueAssets for Assets {
        fn avatar_side(&self, speaker: &str) -> Option<Side> {
            self.avatars.get(speaker).copied()
        }

        fn has_emoji(&self, name: &str) -> bool {
            self.emojis.contains(name)
        }
    }

    fn line(name: &str, text: &str) -> DialogueLine {
        DialogueLine::new(name, text)
    }

    fn labels(row: &LayoutRow) -> Vec<String> {
        row.glyphs
            .iter()
            .map(|g| match &g.kind {
                GlyphKind::Word(w) => w.clone(),
                GlyphKind::Emoji { name, .. } => format!("{{{}}}", name),
            })
            .collect()
    }

    #[test]
    fn test_max_bubble_width() {
        let config = LayoutConfig::default();
        assert_eq!(config.max_bubble_width(400.0), 320.0);
        assert_eq!(config.max_bubble_width(800.0), 384.0);
        assert_eq!(config.max_bubble_width(2000.0), 520.0);
        assert_eq!(config.slide_offset(400.0), 120.0);
        assert_eq!(config.slide_offset(1000.0), 150.0);
        assert_eq!(config.slide_offset(3000.0), 220.0);
    }

    #[test]
    fn test_hello_smile_world() {
        let mut assets = Assets::default();
        assets.emojis.insert("smile".into());
        let config = LayoutConfig::default();

        let layout = DialogueLayout::compute(
            &[line("Sheldon", "Hello {smile} world")],
            &assets,
            Size::new(800.0, 600.0),
            &config,
        );

        assert_eq!(layout.rows.len(), 1);
        let row = &layout.rows[0];
        assert_eq!(row.side, Side::Left);
        assert!(row.avatar.is_none());
        assert_eq!(labels(row), vec!["Hello", "{smile}", "world"]);
        assert!(row.glyphs.iter().all(|g| g.line == 0));
        assert!(row.glyphs.windows(2).all(|w| w[0].rect.x < w[1].rect.x));
        assert_eq!(row.target_x, 20.0);
        assert_eq!(row.y, 20.0);
        assert_eq!(row.entrance.from_offset, -120.0);
        assert_eq!(row.entrance.delay_ms, 0.0);

        let emoji = &row.glyphs[1];
        assert_eq!(emoji.rect.width, 22.0);
        assert_eq!(
            emoji.kind,
            GlyphKind::Emoji {
                name: "smile".into(),
                resolved: true
            }
        );
    }

    #[test]
    fn test_missing_emoji_keeps_geometry() {
        let mut with = Assets::default();
        with.emojis.insert("smile".into());
        let without = Assets::default();
        let config = LayoutConfig::default();
        let lines = [line("Sheldon", "Hello {smile} world")];
        let viewport = Size::new(800.0, 600.0);

        let a = DialogueLayout::compute(&lines, &with, viewport, &config);
        let b = DialogueLayout::compute(&lines, &without, viewport, &config);

        assert_eq!(a.rows[0].bubble, b.rows[0].bubble);
        for (ga, gb) in a.rows[0].glyphs.iter().zip(&b.rows[0].glyphs) {
            assert_eq!(ga.rect, gb.rect);
        }
        assert!(matches!(
            b.rows[0].glyphs[1].kind,
            GlyphKind::Emoji { resolved: false, .. }
        ));
    }

    #[test]
    fn test_right_side_with_avatar() {
        let mut assets = Assets::default();
        assets.avatars.insert("Penny".into(), Side::Right);
        assets.avatars.insert("Sheldon".into(), Side::Left);
        let config = LayoutConfig::default();

        let layout = DialogueLayout::compute(
            &[line("Sheldon", "Knock knock"), line("Penny", "What?")],
            &assets,
            Size::new(800.0, 600.0),
            &config,
        );

        let left = &layout.rows[0];
        assert_eq!(left.avatar.map(|a| a.x), Some(20.0));
        assert_eq!(left.bubble.x, 20.0 + 44.0 + 10.0);

        let right = &layout.rows[1];
        assert_eq!(right.side, Side::Right);
        assert_eq!(right.avatar.map(|a| a.x), Some(800.0 - 20.0 - 44.0));
        assert_eq!(right.bubble.right(), 800.0 - 20.0 - 54.0);
        assert_eq!(right.entrance.from_offset, 120.0);
        assert_eq!(right.entrance.delay_ms, 90.0);
        assert_eq!(right.y, 20.0 + 44.0 + 22.0);
    }

    #[test]
    fn test_unknown_speaker_is_left_without_avatar() {
        let mut assets = Assets::default();
        assets.avatars.insert("Penny".into(), Side::Right);
        let layout = DialogueLayout::compute(
            &[line("Neighbour", "Hi")],
            &assets,
            Size::new(800.0, 600.0),
            &LayoutConfig::default(),
        );
        let row = &layout.rows[0];
        assert_eq!(row.side, Side::Left);
        assert!(row.avatar.is_none());
        assert_eq!(row.bubble.width, 120.0);
    }

    #[test]
    fn test_wrap_stays_inside_bubble() {
        let config = LayoutConfig::default();
        let text = "Our whole universe was in a hot dense state then nearly fourteen \
                    billion years ago expansion started {wait} wait";
        let viewport = Size::new(400.0, 800.0);
        let layout = DialogueLayout::compute(&[line("A", text)], &Assets::default(), viewport, &config);

        let row = &layout.rows[0];
        let max = config.max_bubble_width(viewport.width);
        assert!(row.bubble.width <= max);
        assert!(row.glyphs.iter().any(|g| g.line > 0));
        for glyph in &row.glyphs {
            assert!(glyph.rect.right() + config.pad_x <= max, "{:?}", glyph);
        }
    }

    #[test]
    fn test_lone_oversize_word() {
        let config = LayoutConfig::default();
        let word = "W".repeat(60);
        let layout = DialogueLayout::compute(
            &[line("A", &format!("{} ok", word))],
            &Assets::default(),
            Size::new(400.0, 800.0),
            &config,
        );
        let row = &layout.rows[0];
        assert_eq!(row.glyphs.len(), 2);
        assert!(row.glyphs[0].rect.width > row.bubble.width);
        assert_eq!(row.glyphs[1].line, 1);
    }

    #[test]
    fn test_fit_within_viewport() {
        let config = LayoutConfig::default();
        let lines: Vec<DialogueLine> = (0..30)
            .map(|i| line("A", &format!("Line number {} with a few words in it", i)))
            .collect();

        for (w, h) in [(200.0, 200.0), (320.0, 480.0), (800.0, 600.0), (1920.0, 1080.0)] {
            let viewport = Size::new(w, h);
            let layout = DialogueLayout::compute(&lines, &Assets::default(), viewport, &config);
            let fitted = layout.fitted_bounds().unwrap();

            assert!(layout.scale <= 1.0);
            assert!(fitted.width <= w - 2.0 * config.margin + 1e-3, "{}x{}", w, h);
            assert!(fitted.height <= h - 2.0 * config.margin + 1e-3, "{}x{}", w, h);
        }
    }

    #[test]
    fn test_fit_includes_oversize_word() {
        let config = LayoutConfig::default();
        let viewport = Size::new(400.0, 800.0);
        let lines = vec![line("A", &"W".repeat(60))];
        let layout = DialogueLayout::compute(&lines, &Assets::default(), viewport, &config);

        let row = &layout.rows[0];
        let glyph = row.glyphs[0].rect;
        assert!(glyph.width > row.bubble.width);
        assert!(layout.scale < 1.0);

        let right = (row.bubble.x + glyph.right()) * layout.scale + layout.offset.x;
        let left = row.bubble.x * layout.scale + layout.offset.x;
        assert!(right <= viewport.width - config.margin + 0.5 + 1e-3, "{}", right);
        assert!(left >= config.margin - 0.5 - 1e-3, "{}", left);

        let fitted = layout.fitted_bounds().unwrap();
        assert!(fitted.width <= viewport.width - 2.0 * config.margin + 1e-3);
    }

    #[test]
    fn test_empty_dialogue() {
        let layout = DialogueLayout::compute(
            &[],
            &Assets::default(),
            Size::new(800.0, 600.0),
            &LayoutConfig::default(),
        );
        assert!(layout.is_empty());
        assert!(layout.bounds.is_none());
        assert_eq!(layout.scale, 1.0);
    }

    #[test]
    fn test_empty_text_row() {
        let config = LayoutConfig::default();
        let layout =
            DialogueLayout::compute(&[line("A", "")], &Assets::default(), Size::new(800.0, 600.0), &config);
        let row = &layout.rows[0];
        assert!(row.glyphs.is_empty());
        assert_eq!(row.bubble.size(), Size::new(120.0, 20.0));
        assert_eq!(row.height(&config), 44.0);
    }
}
