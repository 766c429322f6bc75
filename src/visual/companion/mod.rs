pub mod agent;

use bevy::prelude::*;

use crate::chat::ChatSession;

pub use agent::CompanionAgent;

/// Radius of the companion sphere (also its pick radius at rest)
pub const COMPANION_RADIUS: f32 = 0.25;

/// The wandering chat companion in the scene
#[derive(Component, Debug, Default)]
pub struct Companion {
    pub agent: CompanionAgent,
}

impl Companion {
    pub fn pick_radius(&self) -> f32 {
        COMPANION_RADIUS * self.agent.scale()
    }
}

pub fn spawn_companion(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let companion = Companion::default();
    let mesh = meshes.add(Sphere::new(COMPANION_RADIUS).mesh().uv(32, 18));
    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(1.0, 0.85, 0.4),
        emissive: LinearRgba::new(2.0, 1.5, 0.5, 1.0),
        ..default()
    });

    commands.spawn((
        Mesh3d(mesh),
        MeshMaterial3d(material),
        Transform::from_translation(companion.agent.position()),
        PointLight {
            color: Color::srgb(1.0, 0.85, 0.4),
            intensity: 20_000.0,
            range: 4.0,
            ..default()
        },
        companion,
    ));
}

/// System: step the companion and copy its pose into the transform
pub fn animate_companion(
    time: Res<Time>,
    session: Res<ChatSession>,
    mut companions: Query<(&mut Companion, &mut Transform)>,
) {
    let dt = time.delta_secs();
    let mut rng = rand::rng();

    for (mut companion, mut transform) in &mut companions {
        let before = companion.agent.mode();
        companion.agent.update(dt, session.is_streaming(), &mut rng);

        let after = companion.agent.mode();
        if after != before {
            debug!("Companion {:?} -> {:?}", before, after);
        }

        transform.translation = companion.agent.position();
        transform.scale = Vec3::splat(companion.agent.scale());
    }
}
