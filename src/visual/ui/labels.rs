use bevy::prelude::*;

use crate::{camera::MainCamera, scene::SceneState, visual::nodes::SpatialNode};

/// Screen-space name tag following one node
#[derive(Component)]
pub struct NodeLabel {
    pub node: Entity,
}

/// Gap between the top of a sphere and its label (world units)
const LABEL_LIFT: f32 = 0.15;

pub fn spawn_node_label(commands: &mut Commands, node: Entity, name: &str) {
    commands.spawn((
        Text::new(name),
        TextFont {
            font_size: 13.0,
            ..default()
        },
        TextColor(Color::srgba(0.92, 0.92, 0.96, 0.9)),
        Node {
            position_type: PositionType::Absolute,
            ..default()
        },
        Visibility::Hidden,
        NodeLabel { node },
    ));
}

/// System: place labels over their nodes and apply the visibility rule
pub fn update_node_labels(
    state: Res<SceneState>,
    cameras: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    nodes: Query<&SpatialNode>,
    mut labels: Query<(&NodeLabel, &mut Node, &mut Visibility)>,
) {
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };

    for (label, mut ui_node, mut visibility) in &mut labels {
        let Ok(node) = nodes.get(label.node) else {
            visibility.set_if_neq(Visibility::Hidden);
            continue;
        };

        if !node.label_visible(state.exploded(), state.labels_active()) {
            visibility.set_if_neq(Visibility::Hidden);
            continue;
        }

        let anchor = node.visual.display_position + Vec3::Y * (node.pick_radius() + LABEL_LIFT);
        let in_front = (anchor - camera_transform.translation()).dot(*camera_transform.forward()) > 0.0;

        match camera.world_to_viewport(camera_transform, anchor) {
            Ok(screen) if in_front => {
                ui_node.left = Val::Px(screen.x - 40.0);
                ui_node.top = Val::Px(screen.y - 18.0);
                visibility.set_if_neq(Visibility::Visible);
            }
            _ => {
                visibility.set_if_neq(Visibility::Hidden);
            }
        }
    }
}
