use bevy::prelude::*;

use crate::visual::nodes::SpatialNode;

/// Radius of the unit cylinder drawn between two nodes
pub const CONNECTOR_RADIUS: f32 = 0.02;
/// Endpoints closer than this draw nothing
const MIN_CONNECTOR_LENGTH: f32 = 1e-4;

/// A line between two node entities, following their live positions.
/// Holds no animation state of its own.
#[derive(Component, Debug, Clone, Copy)]
pub struct Connector {
    pub from: Entity,
    pub to: Entity,
}

/// Place a unit-height, Y-aligned cylinder between `start` and `end`.
///
/// Returns `None` when the endpoints coincide (no direction to align to).
pub fn connector_transform(start: Vec3, end: Vec3) -> Option<Transform> {
    let direction = end - start;
    let length = direction.length();
    if length < MIN_CONNECTOR_LENGTH {
        return None;
    }

    Some(
        Transform::from_translation((start + end) * 0.5)
            .with_rotation(Quat::from_rotation_arc(Vec3::Y, direction / length))
            .with_scale(Vec3::new(1.0, length, 1.0)),
    )
}

pub fn spawn_connector(
    commands: &mut Commands,
    mesh: Handle<Mesh>,
    material: Handle<StandardMaterial>,
    connector: Connector,
    start: Vec3,
    end: Vec3,
) {
    let (transform, visibility) = match connector_transform(start, end) {
        Some(transform) => (transform, Visibility::Inherited),
        None => (Transform::from_translation(start), Visibility::Hidden),
    };

    commands.spawn((Mesh3d(mesh), MeshMaterial3d(material), transform, visibility, connector));
}

/// System: recompute every connector from its endpoints' drawn positions
pub fn update_connectors(
    nodes: Query<&SpatialNode>,
    mut connectors: Query<(&Connector, &mut Transform, &mut Visibility)>,
) {
    for (connector, mut transform, mut visibility) in &mut connectors {
        let (Ok(from), Ok(to)) = (nodes.get(connector.from), nodes.get(connector.to)) else {
            continue;
        };

        match connector_transform(from.visual.display_position, to.visual.display_position) {
            Some(next) => {
                *transform = next;
                visibility.set_if_neq(Visibility::Inherited);
            }
            None => {
                visibility.set_if_neq(Visibility::Hidden);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint_length_and_orientation() {
        let start = Vec3::new(1.0, 0.0, 0.0);
        let end = Vec3::new(1.0, 0.0, 4.0);

        let transform = connector_transform(start, end).unwrap();

        assert!((transform.translation - Vec3::new(1.0, 0.0, 2.0)).length() < 1e-6);
        assert!((transform.scale.y - 4.0).abs() < 1e-6);
        let axis = transform.rotation * Vec3::Y;
        assert!((axis - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_ends_of_unit_cylinder_land_on_endpoints() {
        let start = Vec3::new(-1.0, 2.0, 0.5);
        let end = Vec3::new(3.0, -1.0, 2.0);
        let transform = connector_transform(start, end).unwrap();

        let top = transform.transform_point(Vec3::new(0.0, 0.5, 0.0));
        let bottom = transform.transform_point(Vec3::new(0.0, -0.5, 0.0));

        assert!((top - end).length() < 1e-4);
        assert!((bottom - start).length() < 1e-4);
    }

    #[test]
    fn test_antiparallel_direction() {
        let transform = connector_transform(Vec3::Y, Vec3::NEG_Y).unwrap();
        let axis = transform.rotation * Vec3::Y;

        assert!((axis - Vec3::NEG_Y).length() < 1e-4);
    }

    #[test]
    fn test_coincident_endpoints_draw_nothing() {
        assert!(connector_transform(Vec3::ONE, Vec3::ONE).is_none());
    }
}
