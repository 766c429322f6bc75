// scene/state.rs

use crate::graph::NodeId;
use bevy::math::Vec2;
use bevy::prelude::Resource;

/// Camera speed without boost
pub const BASE_MOVEMENT_SPEED: f32 = 10.0;
/// Camera speed while Shift is held
pub const BOOST_MOVEMENT_SPEED: f32 = 30.0;
/// Delay between exploding and showing child labels (seconds)
pub const LABELS_DELAY: f32 = 1.5;

/// Which modal overlay is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Chat,
    InfoPanel,
}

/// What a press of Escape closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeOutcome {
    ClosedInfoPanel,
    ClosedChat,
    Nothing,
}

/// Global interaction state of the scene - one instance per session
#[derive(Debug, Clone, Resource)]
pub struct SceneState {
    chat_open: bool,
    exploded: bool,
    labels_active: bool,
    /// Seconds left until labels switch on (only while exploded)
    labels_countdown: Option<f32>,
    speed_boost: bool,
    selected_node: Option<NodeId>,
    hovered_node: Option<NodeId>,
    mobile_move: Vec2,
    mobile_rotate: Vec2,
}

impl Default for SceneState {
    fn default() -> Self {
        SceneState {
            chat_open: false,
            exploded: false,
            labels_active: false,
            labels_countdown: None,
            speed_boost: false,
            selected_node: None,
            hovered_node: None,
            mobile_move: Vec2::ZERO,
            mobile_rotate: Vec2::ZERO,
        }
    }
}

impl SceneState {
    // === Query Methods ===

    pub fn chat_open(&self) -> bool {
        self.chat_open
    }

    pub fn exploded(&self) -> bool {
        self.exploded
    }

    pub fn labels_active(&self) -> bool {
        self.labels_active
    }

    pub fn selected_node(&self) -> Option<&NodeId> {
        self.selected_node.as_ref()
    }

    pub fn hovered_node(&self) -> Option<&NodeId> {
        self.hovered_node.as_ref()
    }

    pub fn mobile_move(&self) -> Vec2 {
        self.mobile_move
    }

    pub fn mobile_rotate(&self) -> Vec2 {
        self.mobile_rotate
    }

    /// Camera translation speed; zero while chatting
    pub fn movement_speed(&self) -> f32 {
        if self.chat_open {
            0.0
        } else if self.speed_boost {
            BOOST_MOVEMENT_SPEED
        } else {
            BASE_MOVEMENT_SPEED
        }
    }

    /// Camera control is suspended while any modal overlay is up
    pub fn camera_control_enabled(&self) -> bool {
        !self.chat_open && self.selected_node.is_none()
    }

    /// The one overlay to render. The info panel sits above the chat, which
    /// is also the order Escape closes them in.
    pub fn active_overlay(&self) -> Overlay {
        if self.selected_node.is_some() {
            Overlay::InfoPanel
        } else if self.chat_open {
            Overlay::Chat
        } else {
            Overlay::None
        }
    }

    // === Mutation Methods ===

    /// Flip the explode flag; returns the new value.
    ///
    /// Exploding arms the label countdown; collapsing hides labels at once.
    pub fn toggle_exploded(&mut self) -> bool {
        self.exploded = !self.exploded;
        if self.exploded {
            self.labels_countdown = Some(LABELS_DELAY);
        } else {
            self.labels_active = false;
            self.labels_countdown = None;
        }
        self.exploded
    }

    /// Advance timers by one frame
    pub fn tick(&mut self, dt: f32) {
        if let Some(remaining) = self.labels_countdown.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.labels_countdown = None;
                self.labels_active = self.exploded;
            }
        }
    }

    /// Returns true if the chat was closed before
    pub fn open_chat(&mut self) -> bool {
        let changed = !self.chat_open;
        self.chat_open = true;
        changed
    }

    /// Returns true if the chat was open before
    pub fn close_chat(&mut self) -> bool {
        let changed = self.chat_open;
        self.chat_open = false;
        changed
    }

    pub fn select_node(&mut self, id: NodeId) {
        self.selected_node = Some(id);
    }

    /// Close the info panel, forgetting both selection and hover
    pub fn close_info_panel(&mut self) {
        self.selected_node = None;
        self.hovered_node = None;
    }

    pub fn set_hovered(&mut self, id: Option<NodeId>) {
        self.hovered_node = id;
    }

    /// Escape closes the info panel first, then the chat
    pub fn escape(&mut self) -> EscapeOutcome {
        if self.selected_node.is_some() {
            self.close_info_panel();
            EscapeOutcome::ClosedInfoPanel
        } else if self.close_chat() {
            EscapeOutcome::ClosedChat
        } else {
            EscapeOutcome::Nothing
        }
    }

    pub fn set_speed_boost(&mut self, boost: bool) {
        self.speed_boost = boost;
    }

    pub fn set_mobile_vectors(&mut self, movement: Vec2, rotation: Vec2) {
        self.mobile_move = movement;
        self.mobile_rotate = rotation;
    }
}
