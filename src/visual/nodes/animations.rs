use bevy::prelude::*;

use crate::visual::nodes::components::SpatialNode;

/// System: advance hover/explode tweens and write the drawn pose
pub fn animate_spatial_nodes(time: Res<Time>, mut nodes: Query<(&mut SpatialNode, &mut Transform)>) {
    let dt = time.delta_secs();

    for (mut node, mut transform) in &mut nodes {
        node.update(dt);

        transform.translation = node.visual.display_position;
        transform.scale = Vec3::splat(node.scale);
    }
}
