use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;

use crate::input::{InputSignals, InputSurface};
use crate::input::joystick::JOYSTICK_LIMIT;
use crate::scene::{FrameSet, SceneState};

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera)
            .add_systems(Update, fly_camera.in_set(FrameSet::Camera));
    }
}

// === Camera Presets ===
/// Where the camera starts, looking down -Z at the graph
pub const CAMERA_START: Vec3 = Vec3::new(0.0, 0.0, 10.0);
pub const CAMERA_FOV_DEGREES: f32 = 100.0;
/// Pitch stays inside this bound so the view never flips over the pole
pub const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.1;
/// Radians of turn per dragged pixel
pub const LOOK_SENSITIVITY: f32 = 0.003;
/// Radians per second at full right-stick deflection
pub const JOYSTICK_TURN_RATE: f32 = 1.8;

#[derive(Component)]
pub struct MainCamera;

/// Free-fly camera orientation. Yaw turns around world Y, pitch around the
/// camera's right axis.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct FlyCamera {
    pub yaw: f32,
    pub pitch: f32,
}

impl FlyCamera {
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Turn by the given angles, keeping pitch inside the limit
    pub fn turn(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.yaw += yaw_delta;
        self.pitch = clamp_pitch(self.pitch + pitch_delta);
    }
}

pub fn clamp_pitch(pitch: f32) -> f32 {
    pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT)
}

/// Camera-space translation for one frame of desktop flying.
/// `axes` is `(right, up, forward)` in `[-1, 1]`.
pub fn fly_step(rotation: Quat, axes: Vec3, speed: f32, dt: f32) -> Vec3 {
    let forward = rotation * Vec3::NEG_Z;
    let right = rotation * Vec3::X;
    let up = rotation * Vec3::Y;
    (right * axes.x + up * axes.y + forward * axes.z) * speed * dt
}

/// Translation for one frame of the left joystick: up is forward, right
/// strafes. Full deflection moves at `speed`.
pub fn joystick_move_step(rotation: Quat, move_vector: Vec2, speed: f32, dt: f32) -> Vec3 {
    let scaled = move_vector / JOYSTICK_LIMIT;
    fly_step(rotation, Vec3::new(scaled.x, 0.0, scaled.y), speed, dt)
}

/// Yaw/pitch deltas for one frame of the right joystick
pub fn joystick_turn_step(rotate_vector: Vec2, dt: f32) -> Vec2 {
    let scaled = rotate_vector / JOYSTICK_LIMIT;
    Vec2::new(-scaled.x, scaled.y) * JOYSTICK_TURN_RATE * dt
}

fn setup_camera(mut commands: Commands) {
    let projection = Projection::Perspective(PerspectiveProjection {
        fov: CAMERA_FOV_DEGREES.to_radians(),
        ..default()
    });
    let fly = FlyCamera::default();

    commands.spawn((
        Camera3d::default(),
        projection,
        Transform::from_translation(CAMERA_START).with_rotation(fly.rotation()),
        fly,
        MainCamera,
    ));
}

/// System: desktop fly controls or joystick integration, depending on the
/// input surface. Suspended while an overlay is open.
fn fly_camera(
    time: Res<Time>,
    state: Res<SceneState>,
    signals: Res<InputSignals>,
    surface: Res<InputSurface>,
    mut cameras: Query<(&mut Transform, &mut FlyCamera), With<MainCamera>>,
) {
    let Ok((mut transform, mut fly)) = cameras.single_mut() else {
        return;
    };
    if !state.camera_control_enabled() {
        return;
    }

    let dt = time.delta_secs();
    let speed = state.movement_speed();

    let translation = if surface.is_touch() {
        let turn = joystick_turn_step(state.mobile_rotate(), dt);
        fly.turn(turn.x, turn.y);
        joystick_move_step(fly.rotation(), state.mobile_move(), speed, dt)
    } else {
        let look = signals.look_delta * LOOK_SENSITIVITY;
        fly.turn(-look.x, -look.y);
        fly_step(fly.rotation(), signals.fly_axes, speed, dt)
    };

    transform.rotation = fly.rotation();
    transform.translation += translation;
}
