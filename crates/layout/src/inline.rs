//! Greedy inline flow for a single bubble.

use common::geometry::{Point, Rect};

/// What a placed glyph shows.
#[derive(Clone, Debug, PartialEq)]
pub enum GlyphKind {
    /// A word of text.
    Word(String),
    /// An emoji image. `resolved` is false when the name has no loaded image;
    /// the glyph keeps its size and paints a placeholder.
    Emoji { name: String, resolved: bool },
}

/// A glyph positioned in bubble-local coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedGlyph {
    pub kind: GlyphKind,
    pub rect: Rect,
    /// Zero-based line within the bubble.
    pub line: usize,
}

/// Inline flow parameters.
#[derive(Clone, Copy, Debug)]
pub struct FlowMetrics {
    pub max_width: f32,
    pub pad_x: f32,
    pub pad_y: f32,
    pub line_spacing: f32,
}

/// Lays glyphs out left to right, breaking lines between glyphs only.
pub struct InlineFlow {
    metrics: FlowMetrics,
    cursor: Point,
    line_height: f32,
    line: usize,
    content_max_x: f32,
    line_has_content: bool,
    glyphs: Vec<PlacedGlyph>,
}

/// Output of a finished flow.
#[derive(Clone, Debug)]
pub struct FlowResult {
    pub glyphs: Vec<PlacedGlyph>,
    /// Rightmost cursor position reached by any glyph.
    pub content_max_x: f32,
    /// Top of the last line.
    pub last_line_y: f32,
    /// Height of the last line.
    pub last_line_height: f32,
    pub line_count: usize,
}

impl InlineFlow {
    pub fn new(metrics: FlowMetrics) -> Self {
        Self {
            metrics,
            cursor: Point::new(metrics.pad_x, metrics.pad_y),
            line_height: 0.0,
            line: 0,
            content_max_x: metrics.pad_x,
            line_has_content: false,
            glyphs: Vec::new(),
        }
    }

    /// Place a word of the given width and height.
    pub fn push_word(&mut self, text: &str, width: f32, height: f32) {
        self.break_if_needed(width);

        let rect = Rect::new(self.cursor.x, self.cursor.y, width, height);
        self.line_height = self.line_height.max(height);
        self.cursor.x += width;
        self.place(GlyphKind::Word(text.to_string()), rect);
    }

    /// Place a square emoji followed by `gap` of trailing space.
    pub fn push_emoji(&mut self, name: &str, resolved: bool, size: f32, gap: f32) {
        self.break_if_needed(size);

        let y = if self.line_height > 0.0 {
            self.cursor.y + (self.line_height - size) * 0.5
        } else {
            self.cursor.y + 2.0
        };
        let rect = Rect::new(self.cursor.x, y, size, size);
        self.line_height = self.line_height.max(size);
        self.cursor.x += size + gap;
        self.place(
            GlyphKind::Emoji {
                name: name.to_string(),
                resolved,
            },
            rect,
        );
    }

    /// Advance past whitespace. Never breaks, dropped at line start.
    pub fn push_space(&mut self, width: f32) {
        if self.line_has_content {
            self.cursor.x += width;
        }
    }

    pub fn finish(self) -> FlowResult {
        FlowResult {
            glyphs: self.glyphs,
            content_max_x: self.content_max_x,
            last_line_y: self.cursor.y,
            last_line_height: self.line_height,
            line_count: if self.line_has_content { self.line + 1 } else { self.line },
        }
    }

    fn break_if_needed(&mut self, width: f32) {
        let overflows = self.cursor.x + width + self.metrics.pad_x > self.metrics.max_width;
        if overflows && self.line_has_content {
            self.cursor.x = self.metrics.pad_x;
            self.cursor.y += self.line_height + self.metrics.line_spacing;
            self.line_height = 0.0;
            self.line += 1;
            self.line_has_content = false;
        }
    }

    fn place(&mut self, kind: GlyphKind, rect: Rect) {
        self.content_max_x = self.content_max_x.max(self.cursor.x);
        self.line_has_content = true;
        self.glyphs.push(PlacedGlyph {
            kind,
            rect,
            line: self.line,
        });
    }
}
