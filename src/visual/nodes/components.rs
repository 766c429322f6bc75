use bevy::prelude::*;

use crate::{
    graph::{GraphNode, NodeId},
    visual::tween::{Easing, TweenSlot, TweenStep},
};

/// Scale of a hovered node relative to rest
pub const HOVER_SCALE: f32 = 1.4;
/// Hover enlarge/shrink duration (seconds)
pub const HOVER_DURATION: f32 = 0.3;
/// Explode/collapse move duration (seconds)
pub const EXPLODE_DURATION: f32 = 1.0;

/// What clicking a node does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// Toggles the exploded layout
    Root,
    /// Opens the info panel at any time
    Selectable,
    /// Opens the info panel only once the graph is exploded
    Display,
}

impl NodeRole {
    pub fn for_node(node: &GraphNode) -> Self {
        if node.is_root() {
            NodeRole::Root
        } else if node.is_selectable_kind() {
            NodeRole::Selectable
        } else {
            NodeRole::Display
        }
    }
}

/// Result of clicking a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeClick {
    ToggleExploded,
    Select(NodeId),
    Ignored,
}

/// Per-node animated state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeVisualState {
    /// Layout position from the graph document
    pub base_position: Vec3,
    /// Where the node is drawn this frame
    pub display_position: Vec3,
    pub is_hovered: bool,
}

/// A renderable graph node with hover/select affordances and an animated
/// explode/collapse position
#[derive(Component, Debug)]
pub struct SpatialNode {
    pub id: NodeId,
    pub name: String,
    pub role: NodeRole,
    pub color: Color,
    pub size: f32,
    pub visual: NodeVisualState,
    /// Current uniform scale (hover feedback)
    pub scale: f32,
    position_tween: TweenSlot<Vec3>,
    scale_tween: TweenSlot<f32>,
}

impl SpatialNode {
    pub fn new(id: NodeId, name: String, base_position: Vec3, color: Color, size: f32, role: NodeRole) -> Self {
        SpatialNode {
            id,
            name,
            role,
            color,
            size,
            visual: NodeVisualState {
                base_position,
                display_position: base_position,
                is_hovered: false,
            },
            scale: 1.0,
            position_tween: TweenSlot::default(),
            scale_tween: TweenSlot::default(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.role == NodeRole::Root
    }

    /// Radius used for picking, following the hover scale
    pub fn pick_radius(&self) -> f32 {
        self.size * self.scale
    }

    /// Where this node rests for a given explode flag.
    /// The root stays put; everything else moves out radially.
    pub fn target_position(&self, exploded: bool, explosion_factor: f32) -> Vec3 {
        if exploded && !self.is_root() {
            self.visual.base_position * explosion_factor
        } else {
            self.visual.base_position
        }
    }

    /// Is a position tween running?
    #[cfg(test)]
    pub fn is_moving(&self) -> bool {
        self.position_tween.is_active()
    }

    // === Hover ===

    pub fn on_hover_start(&mut self) {
        if self.visual.is_hovered {
            return;
        }
        self.visual.is_hovered = true;
        self.scale_tween
            .start(self.scale, HOVER_SCALE, HOVER_DURATION, Easing::OutQuad);
    }

    pub fn on_hover_end(&mut self) {
        if !self.visual.is_hovered {
            return;
        }
        self.visual.is_hovered = false;
        self.scale_tween
            .start(self.scale, 1.0, HOVER_DURATION, Easing::OutQuad);
    }

    // === Explode / collapse ===

    /// Restart the position tween toward the layout for `exploded`,
    /// starting from the currently displayed position.
    pub fn on_exploded_changed(&mut self, exploded: bool, explosion_factor: f32) {
        let target = self.target_position(exploded, explosion_factor);
        self.position_tween.start(
            self.visual.display_position,
            target,
            EXPLODE_DURATION,
            Easing::OutCubic,
        );
    }

    // === Click ===

    pub fn on_click(&self, exploded: bool) -> NodeClick {
        match self.role {
            NodeRole::Root => NodeClick::ToggleExploded,
            NodeRole::Selectable => NodeClick::Select(self.id.clone()),
            NodeRole::Display if exploded => NodeClick::Select(self.id.clone()),
            NodeRole::Display => NodeClick::Ignored,
        }
    }

    /// Name label rule: hovered, and either the root or the labels of an
    /// exploded graph have been switched on
    pub fn label_visible(&self, exploded: bool, labels_active: bool) -> bool {
        self.visual.is_hovered && ((exploded && labels_active) || self.is_root())
    }

    /// Advance tweens by one frame
    pub fn update(&mut self, dt: f32) {
        if let Some(position) = self.position_tween.advance(dt).value() {
            self.visual.display_position = position;
        }
        match self.scale_tween.advance(dt) {
            TweenStep::Running(scale) | TweenStep::Finished(scale) => self.scale = scale,
            TweenStep::Idle => {}
        }
    }
}
