//! Scene graph layers.

use common::geometry::{Point, Transform};
use render::display_list::{BlendMode, DisplayList};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Unique identifier for a layer.
    pub struct LayerId;
}

/// A node in the scene graph: a container with a transform, an opacity and
/// optional content of its own.
#[derive(Clone, Debug)]
pub struct Layer {
    /// Layer ID.
    pub id: LayerId,
    /// Parent layer.
    pub parent: Option<LayerId>,
    /// Child layers.
    pub children: SmallVec<[LayerId; 4]>,
    /// Position relative to parent.
    pub position: Point,
    /// Rotation in radians.
    pub rotation: f32,
    /// Scale factors.
    pub scale: Point,
    /// Opacity (0.0 - 1.0).
    pub opacity: f32,
    /// Paint order among siblings; ties keep insertion order.
    pub z_index: i32,
    /// Blend mode applied to this layer's content.
    pub blend_mode: BlendMode,
    /// Whether the layer and its subtree are painted.
    pub visible: bool,
    /// Content in local coordinates, painted below the children.
    pub display_list: DisplayList,
}

impl Layer {
    pub fn new(id: LayerId) -> Self {
        Self {
            id,
            parent: None,
            children: SmallVec::new(),
            position: Point::ZERO,
            rotation: 0.0,
            scale: Point::new(1.0, 1.0),
            opacity: 1.0,
            z_index: 0,
            blend_mode: BlendMode::Normal,
            visible: true,
            display_list: DisplayList::new(),
        }
    }

    /// Transform from this layer's space to its parent's.
    pub fn local_transform(&self) -> Transform {
        Transform::from_parts(self.position, self.rotation, self.scale)
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.position = Point::new(x, y);
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = Point::new(scale, scale);
    }
}

/// Layer tree.
pub struct LayerTree {
    layers: SlotMap<LayerId, Layer>,
    root: Option<LayerId>,
}

impl LayerTree {
    pub fn new() -> Self {
        Self {
            layers: SlotMap::with_key(),
            root: None,
        }
    }

    /// Create a new detached layer.
    pub fn create_layer(&mut self) -> LayerId {
        self.layers.insert_with_key(Layer::new)
    }

    /// Create a layer and append it to `parent`.
    pub fn create_child(&mut self, parent_id: LayerId) -> LayerId {
        let id = self.create_layer();
        self.append_child(parent_id, id);
        id
    }

    /// Get the root layer.
    pub fn root(&self) -> Option<LayerId> {
        self.root
    }

    /// Set the root layer.
    pub fn set_root(&mut self, layer_id: LayerId) {
        self.root = Some(layer_id);
    }

    /// Get a layer by ID.
    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(id)
    }

    /// Get a mutable layer by ID.
    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.get_mut(id)
    }

    /// Append a child layer, detaching it from any previous parent.
    pub fn append_child(&mut self, parent_id: LayerId, child_id: LayerId) {
        if parent_id == child_id || !self.layers.contains_key(parent_id) {
            return;
        }
        self.detach(child_id);
        if let Some(child) = self.layers.get_mut(child_id) {
            child.parent = Some(parent_id);
        } else {
            return;
        }
        if let Some(parent) = self.layers.get_mut(parent_id) {
            parent.children.push(child_id);
        }
    }

    /// Detach a layer from its parent, keeping it alive.
    pub fn detach(&mut self, layer_id: LayerId) {
        let parent_id = match self.layers.get_mut(layer_id) {
            Some(layer) => layer.parent.take(),
            None => return,
        };
        if let Some(parent) = parent_id.and_then(|id| self.layers.get_mut(id)) {
            parent.children.retain(|id| *id != layer_id);
        }
    }

    /// Children of a layer in insertion order.
    pub fn children(&self, layer_id: LayerId) -> &[LayerId] {
        self.layers
            .get(layer_id)
            .map(|l| l.children.as_slice())
            .unwrap_or(&[])
    }

    /// Transform from a layer's space to world space.
    pub fn world_transform(&self, layer_id: LayerId) -> Transform {
        let mut transform = Transform::identity();
        let mut current = self.layers.get(layer_id);

        while let Some(layer) = current {
            transform = transform.then(&layer.local_transform());
            current = layer.parent.and_then(|id| self.layers.get(id));
        }

        transform
    }

    /// Product of the opacities from the layer up to the root.
    pub fn accumulated_opacity(&self, layer_id: LayerId) -> f32 {
        let mut opacity = 1.0;
        let mut current = self.layers.get(layer_id);

        while let Some(layer) = current {
            opacity *= layer.opacity;
            current = layer.parent.and_then(|id| self.layers.get(id));
        }

        opacity
    }

    /// Get visible layers in paint order: a layer's own content, then its
    /// children sorted by z-index.
    pub fn paint_order(&self) -> Vec<LayerId> {
        let mut result = Vec::new();

        if let Some(root_id) = self.root {
            self.collect_paint_order(root_id, &mut result);
        }

        result
    }

    fn collect_paint_order(&self, layer_id: LayerId, result: &mut Vec<LayerId>) {
        if let Some(layer) = self.layers.get(layer_id) {
            if !layer.visible {
                return;
            }

            result.push(layer_id);

            let mut children: SmallVec<[LayerId; 16]> = layer.children.iter().copied().collect();
            children.sort_by_key(|id| self.layers.get(*id).map(|l| l.z_index).unwrap_or(0));
            for child_id in children {
                self.collect_paint_order(child_id, result);
            }
        }
    }

    /// Flatten the visible tree into a world-space display list.
    pub fn flatten(&self) -> DisplayList {
        let mut list = DisplayList::new();

        for id in self.paint_order() {
            let Some(layer) = self.layers.get(id) else {
                continue;
            };
            if layer.display_list.is_empty() {
                continue;
            }
            let opacity = self.accumulated_opacity(id);
            if opacity <= 0.0 {
                continue;
            }
            let transform = self.world_transform(id);
            list.extend(layer.display_list.items().iter().map(|item| {
                item.clone()
                    .with_transform(transform)
                    .with_opacity(item.opacity * opacity)
                    .with_blend_mode(layer.blend_mode)
            }));
        }

        list
    }

    /// Get number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Check if tree is empty.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Default for LayerTree {
    fn default() -> Self {
        Self::new()
    }
}
