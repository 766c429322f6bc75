pub mod animations;
pub mod components;

use bevy::prelude::*;

use crate::graph::GraphNode;

pub use animations::animate_spatial_nodes;
pub use components::{NodeClick, NodeRole, SpatialNode};

/// Used when a node's color string cannot be parsed
pub const FALLBACK_NODE_COLOR: Color = Color::srgb(0.54, 0.54, 0.54);
/// Share of the base color a node emits
const NODE_GLOW: f32 = 0.6;

/// Parse a `#rrggbb` color, falling back to grey
pub fn parse_node_color(hex: &str) -> Color {
    match Srgba::hex(hex) {
        Ok(color) => color.into(),
        Err(err) => {
            warn!("Invalid node color {:?} ({:?}), using grey", hex, err);
            FALLBACK_NODE_COLOR
        }
    }
}

/// Spawn the sphere for one flattened graph node
pub fn spawn_node(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    node: &GraphNode,
) -> Entity {
    let color = parse_node_color(&node.color);
    let base = Vec3::from_array(node.position);
    let spatial = SpatialNode::new(
        node.id.clone(),
        node.name.clone(),
        base,
        color,
        node.size,
        NodeRole::for_node(node),
    );

    let mesh = meshes.add(Sphere::new(node.size).mesh().uv(32, 18));
    let material = materials.add(StandardMaterial {
        base_color: color,
        emissive: color.to_linear() * NODE_GLOW,
        ..default()
    });

    commands
        .spawn((
            Mesh3d(mesh),
            MeshMaterial3d(material),
            Transform::from_translation(base),
            spatial,
        ))
        .id()
}
