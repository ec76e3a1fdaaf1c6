//! The stage: a layer tree bound to a viewport.

use crate::layer::{Layer, LayerId, LayerTree};
use common::color::Color;
use common::geometry::{Rect, Size};
use render::display_list::DisplayList;

/// A layer tree with a root sized to the viewport.
pub struct Stage {
    /// Layer tree.
    layer_tree: LayerTree,
    /// Root layer.
    root: LayerId,
    /// Viewport bounds.
    bounds: Rect,
    /// Background color.
    background: Color,
}

impl Stage {
    pub fn new(width: f32, height: f32) -> Self {
        let mut tree = LayerTree::new();
        let root = tree.create_layer();
        tree.set_root(root);

        Self {
            layer_tree: tree,
            root,
            bounds: Rect::new(0.0, 0.0, width, height),
            background: Color::BLACK,
        }
    }

    pub fn with_viewport(viewport: Size) -> Self {
        Self::new(viewport.width, viewport.height)
    }

    /// Get the layer tree.
    pub fn layer_tree(&self) -> &LayerTree {
        &self.layer_tree
    }

    /// Get mutable layer tree.
    pub fn layer_tree_mut(&mut self) -> &mut LayerTree {
        &mut self.layer_tree
    }

    /// Get root layer.
    pub fn root_layer(&self) -> LayerId {
        self.root
    }

    /// Create a new layer under `parent`.
    pub fn create_layer(&mut self, parent: LayerId) -> LayerId {
        self.layer_tree.create_child(parent)
    }

    /// Get a layer.
    pub fn get_layer(&self, id: LayerId) -> Option<&Layer> {
        self.layer_tree.get(id)
    }

    /// Get a mutable layer.
    pub fn get_layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layer_tree.get_mut(id)
    }

    /// Get stage bounds.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn viewport(&self) -> Size {
        self.bounds.size()
    }

    /// Set background color.
    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    /// Get background color.
    pub fn background(&self) -> Color {
        self.background
    }

    /// Background fill followed by the flattened tree.
    pub fn display_list(&self) -> DisplayList {
        let mut list = DisplayList::new();
        list.fill_rect(self.bounds, self.background, None);
        list.extend(self.layer_tree.flatten().items().iter().cloned());
        list
    }
}
