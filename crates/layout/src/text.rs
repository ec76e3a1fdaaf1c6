//! Text measurement.

use common::geometry::Size;
use unicode_segmentation::UnicodeSegmentation;

/// Line height as a multiple of the font size.
const NORMAL_LINE_HEIGHT: f32 = 1.2;

/// Measures words set in a single proportional sans-serif face.
///
/// Widths come from a per-character table rather than real font metrics, which
/// keeps layout deterministic and independent of installed fonts.
#[derive(Clone, Debug)]
pub struct TextShaper {
    font_size: f32,
}

impl TextShaper {
    pub fn new(font_size: f32) -> Self {
        Self { font_size }
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn line_height(&self) -> f32 {
        self.font_size * NORMAL_LINE_HEIGHT
    }

    /// Width of a run of text.
    pub fn measure_width(&self, text: &str) -> f32 {
        text.graphemes(true)
            .map(|g| self.char_width(g.chars().next().unwrap_or(' ')))
            .sum()
    }

    /// Size of a single-line run of text.
    pub fn measure(&self, text: &str) -> Size {
        Size::new(self.measure_width(text), self.line_height())
    }

    /// Advance of one space.
    pub fn space_width(&self) -> f32 {
        self.char_width(' ')
    }

    fn char_width(&self, c: char) -> f32 {
        let width_factor = match c {
            ' ' => 0.25,
            'i' | 'l' | 'j' | 't' | 'f' | 'I' | '!' | '|' | '.' | ',' | ':' | ';' | '\'' => 0.3,
            'm' | 'w' | 'M' | 'W' => 0.8,
            _ if c.is_ascii_uppercase() => 0.65,
            _ if c.is_ascii_alphanumeric() => 0.55,
            _ if c.is_ascii() => 0.5,
            _ => 1.0,
        };

        self.font_size * width_factor
    }
}

impl Default for TextShaper {
    fn default() -> Self {
        Self::new(16.0)
    }
}
