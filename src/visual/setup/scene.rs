use std::collections::HashMap;

use bevy::prelude::*;

use crate::{
    graph::{FlattenedGraph, GraphStore, NodeId},
    visual::{
        companion::spawn_companion,
        edges::{Connector, connector::CONNECTOR_RADIUS, spawn_connector},
        nodes::spawn_node,
        ui::spawn_node_label,
    },
};

const CONNECTOR_COLOR: Color = Color::srgba(0.7, 0.7, 0.85, 0.6);

/// Load the graph once and spawn nodes, connectors, lights and the companion.
///
/// A load failure is logged and leaves an empty scene; nothing is retried.
pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let graph = match GraphStore::load() {
        Ok(graph) => {
            info!(
                "Graph loaded: {} nodes, {} edges",
                graph.nodes.len(),
                graph.edges.len()
            );
            graph
        }
        Err(err) => {
            error!("Failed to load graph: {err}");
            FlattenedGraph::default()
        }
    };

    commands.spawn((
        DirectionalLight {
            illuminance: 3_000.0,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        PointLight {
            intensity: 400_000.0,
            range: 40.0,
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 0.0),
    ));

    let mut entities: HashMap<NodeId, (Entity, Vec3)> = HashMap::with_capacity(graph.nodes.len());
    for node in &graph.nodes {
        let entity = spawn_node(&mut commands, &mut meshes, &mut materials, node);
        spawn_node_label(&mut commands, entity, &node.name);
        entities.insert(node.id.clone(), (entity, Vec3::from_array(node.position)));
    }

    let connector_mesh = meshes.add(Cylinder::new(CONNECTOR_RADIUS, 1.0));
    let connector_material = materials.add(StandardMaterial {
        base_color: CONNECTOR_COLOR,
        emissive: CONNECTOR_COLOR.to_linear() * 0.3,
        alpha_mode: AlphaMode::Blend,
        ..default()
    });

    for edge in &graph.edges {
        let (Some(&(from, start)), Some(&(to, end))) = (entities.get(&edge.from), entities.get(&edge.to)) else {
            warn!("Edge {} -> {} references a missing node", edge.from, edge.to);
            continue;
        };
        spawn_connector(
            &mut commands,
            connector_mesh.clone(),
            connector_material.clone(),
            Connector { from, to },
            start,
            end,
        );
    }

    spawn_companion(&mut commands, &mut meshes, &mut materials);

    commands.insert_resource(graph);
}
