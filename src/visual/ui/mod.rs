//! Screen-space overlays: node labels, info panel, chat window and the
//! controls hint.

pub mod chat_window;
pub mod controls;
pub mod info_panel;
pub mod labels;

use bevy::prelude::*;

pub use chat_window::update_chat_window;
pub use controls::{handle_hint_buttons, update_controls_hint};
pub use info_panel::update_info_panel;
pub use labels::{spawn_node_label, update_node_labels};

/// Spawn the overlays that exist once per scene
pub fn spawn_overlays(mut commands: Commands) {
    info_panel::spawn_info_panel(&mut commands);
    chat_window::spawn_chat_window(&mut commands);
    controls::spawn_controls_hint(&mut commands);
}
