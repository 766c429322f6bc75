use bevy::prelude::*;

use crate::graph::FlattenedGraph;
use crate::scene::FrameSet;
use crate::visual::companion::animate_companion;
use crate::visual::edges::update_connectors;
use crate::visual::nodes::animate_spatial_nodes;
use crate::visual::setup::setup_scene;
use crate::visual::ui::{
    handle_hint_buttons, spawn_overlays, update_chat_window, update_controls_hint,
    update_info_panel, update_node_labels,
};

pub struct GraphPlugin;

impl Plugin for GraphPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FlattenedGraph>()
            .insert_resource(ClearColor(Color::srgb(0.02, 0.01, 0.05)))
            .add_systems(Startup, (setup_scene, spawn_overlays).chain())
            .add_systems(Update, handle_hint_buttons.in_set(FrameSet::Input))
            .add_systems(
                Update,
                (
                    animate_spatial_nodes,
                    // Connectors read the positions written above
                    update_connectors,
                    animate_companion,
                )
                    .chain()
                    .in_set(FrameSet::Animate),
            )
            .add_systems(
                Update,
                (
                    update_node_labels,
                    update_info_panel,
                    update_chat_window,
                    update_controls_hint,
                )
                    .in_set(FrameSet::Ui),
            );
    }
}
