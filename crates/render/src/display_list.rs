//! Display list for rendering.
//!
//! Layers hold their content as a display list in local coordinates. Flattening
//! a layer tree yields a single list in world coordinates, in paint order, that
//! a painter can consume without knowing about the tree.

use crate::image_cache::ImageKey;
use common::color::Color;
use common::geometry::{Point, Rect, Size, Transform};
use smallvec::SmallVec;

/// A display list containing all items to be painted.
#[derive(Clone, Debug, Default)]
pub struct DisplayList {
    /// Display items in paint order.
    items: Vec<DisplayItem>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add a display item.
    pub fn push(&mut self, item: DisplayItem) {
        self.items.push(item);
    }

    /// Add multiple display items.
    pub fn extend(&mut self, items: impl IntoIterator<Item = DisplayItem>) {
        self.items.extend(items);
    }

    /// Get all items.
    pub fn items(&self) -> &[DisplayItem] {
        &self.items
    }

    /// Clear the display list.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Get number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Union of all item bounds after each item's transform.
    pub fn bounds(&self) -> Option<Rect> {
        let world: SmallVec<[Rect; 8]> = self.items.iter().map(DisplayItem::world_bounds).collect();
        Rect::union_all(world.iter())
    }

    /// Filled rectangle, optionally with rounded corners.
    pub fn fill_rect(&mut self, rect: Rect, color: Color, radius: Option<f32>) -> &mut Self {
        self.push(DisplayItem::new(
            DisplayItemType::SolidColor(SolidColorItem { color, radius }),
            rect,
        ));
        self
    }

    /// Rectangle outline.
    pub fn stroke_rect(&mut self, rect: Rect, width: f32, color: Color, radius: Option<f32>) -> &mut Self {
        self.push(DisplayItem::new(
            DisplayItemType::Outline(OutlineItem { width, color, radius }),
            rect,
        ));
        self
    }

    /// Filled circle.
    pub fn fill_circle(&mut self, center: Point, radius: f32, color: Color) -> &mut Self {
        self.fill_ellipse(center, radius, radius, color)
    }

    /// Filled ellipse.
    pub fn fill_ellipse(&mut self, center: Point, radius_x: f32, radius_y: f32, color: Color) -> &mut Self {
        let rect = Rect::new(
            center.x - radius_x,
            center.y - radius_y,
            radius_x * 2.0,
            radius_y * 2.0,
        );
        self.push(DisplayItem::new(DisplayItemType::Ellipse(EllipseItem { color }), rect));
        self
    }

    /// Image stretched over `rect`.
    pub fn image(&mut self, rect: Rect, image_key: ImageKey) -> &mut Self {
        self.push(DisplayItem::new(DisplayItemType::Image(ImageItem { image_key }), rect));
        self
    }

    /// A run of text with its top-left at `origin`.
    pub fn text(&mut self, origin: Point, size: Size, text: impl Into<String>, font_size: f32, color: Color) -> &mut Self {
        self.push(DisplayItem::new(
            DisplayItemType::Text(TextItem {
                text: text.into(),
                font_size,
                color,
            }),
            Rect::from_origin_size(origin, size),
        ));
        self
    }
}

/// A single display item.
#[derive(Clone, Debug)]
pub struct DisplayItem {
    /// The type of item.
    pub item_type: DisplayItemType,
    /// Bounding rectangle in the item's own space.
    pub bounds: Rect,
    /// Transform to world space, set when flattened.
    pub transform: Option<Transform>,
    /// Opacity (0.0 - 1.0).
    pub opacity: f32,
    /// Blend mode.
    pub blend_mode: BlendMode,
}

impl DisplayItem {
    pub fn new(item_type: DisplayItemType, bounds: Rect) -> Self {
        Self {
            item_type,
            bounds,
            transform: None,
            opacity: 1.0,
            blend_mode: BlendMode::Normal,
        }
    }

    /// Set transform.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Set opacity.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Set blend mode.
    pub fn with_blend_mode(mut self, blend_mode: BlendMode) -> Self {
        self.blend_mode = blend_mode;
        self
    }

    /// Bounds after applying the item transform.
    pub fn world_bounds(&self) -> Rect {
        match &self.transform {
            Some(t) => t.transform_rect(self.bounds),
            None => self.bounds,
        }
    }

    /// Whether painting this item would leave any mark.
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0 && !self.bounds.is_empty()
    }
}

/// Types of display items.
#[derive(Clone, Debug)]
pub enum DisplayItemType {
    /// Solid color rectangle.
    SolidColor(SolidColorItem),
    /// Rectangle outline.
    Outline(OutlineItem),
    /// Filled ellipse inscribed in the bounds.
    Ellipse(EllipseItem),
    /// Text.
    Text(TextItem),
    /// Image.
    Image(ImageItem),
}

impl DisplayItemType {
    /// Short name used in frame reports.
    pub fn kind(&self) -> &'static str {
        match self {
            DisplayItemType::SolidColor(_) => "rect",
            DisplayItemType::Outline(_) => "outline",
            DisplayItemType::Ellipse(_) => "ellipse",
            DisplayItemType::Text(_) => "text",
            DisplayItemType::Image(_) => "image",
        }
    }
}

/// Solid color rectangle.
#[derive(Clone, Debug)]
pub struct SolidColorItem {
    pub color: Color,
    pub radius: Option<f32>,
}

/// Rectangle outline.
#[derive(Clone, Debug)]
pub struct OutlineItem {
    pub width: f32,
    pub color: Color,
    pub radius: Option<f32>,
}

/// Filled ellipse.
#[derive(Clone, Debug)]
pub struct EllipseItem {
    pub color: Color,
}

/// Text display item.
#[derive(Clone, Debug)]
pub struct TextItem {
    /// The text to render.
    pub text: String,
    /// Font size in pixels.
    pub font_size: f32,
    /// Text color.
    pub color: Color,
}

/// Image display item.
#[derive(Clone, Debug)]
pub struct ImageItem {
    /// Image key for the image cache.
    pub image_key: ImageKey,
}

/// Blend mode for compositing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlendMode {
    #[default]
    Normal,
    /// Additive blending, used for glowing effects.
    Add,
}

/// Count of items per kind, in first-seen order.
pub fn summarize(list: &DisplayList) -> SmallVec<[(&'static str, usize); 5]> {
    let mut counts: SmallVec<[(&'static str, usize); 5]> = SmallVec::new();
    for item in list.items() {
        let kind = item.item_type.kind();
        match counts.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, n)) => *n += 1,
            None => counts.push((kind, 1)),
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_list() {
        let mut list = DisplayList::new();
        assert!(list.is_empty());

        list.fill_rect(Rect::new(0.0, 0.0, 100.0, 100.0), Color::rgb(255, 0, 0), Some(8.0));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_shape_bounds() {
        let mut list = DisplayList::new();
        list.fill_circle(Point::new(64.0, 64.0), 60.0, Color::WHITE)
            .fill_ellipse(Point::ZERO, 140.0, 30.0, Color::BLACK);

        assert_eq!(list.items()[0].bounds, Rect::new(4.0, 4.0, 120.0, 120.0));
        assert_eq!(list.bounds(), Some(Rect::new(-140.0, -30.0, 280.0, 154.0)));
    }

    #[test]
    fn test_display_item_builder() {
        let item = DisplayItem::new(
            DisplayItemType::Ellipse(EllipseItem { color: Color::WHITE }),
            Rect::new(10.0, 10.0, 50.0, 50.0),
        )
        .with_opacity(0.5)
        .with_blend_mode(BlendMode::Add)
        .with_transform(Transform::translation(5.0, 0.0));

        assert_eq!(item.opacity, 0.5);
        assert_eq!(item.blend_mode, BlendMode::Add);
        assert_eq!(item.world_bounds(), Rect::new(15.0, 10.0, 50.0, 50.0));
    }

    #[test]
    fn test_summarize() {
        let mut list = DisplayList::new();
        list.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE, None)
            .text(Point::ZERO, Size::new(10.0, 10.0), "hi", 16.0, Color::WHITE)
            .fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE, None);

        let summary = summarize(&list);
        assert_eq!(summary.as_slice(), &[("rect", 2), ("text", 1)]);
    }
}
