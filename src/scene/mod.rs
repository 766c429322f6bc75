// scene/mod.rs

pub mod controller;
pub mod state;

use bevy::prelude::*;

pub use state::{Overlay, SceneState};

/// Per-frame phases, run in this order
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSet {
    /// Raw input becomes signals and commands
    Input,
    /// Commands, picking and timers update scene state
    Control,
    Camera,
    /// Tweens and derived transforms
    Animate,
    /// Overlays read the settled state
    Ui,
}

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneState>()
            .configure_sets(
                Update,
                (
                    FrameSet::Input,
                    FrameSet::Control,
                    FrameSet::Camera,
                    FrameSet::Animate,
                    FrameSet::Ui,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    controller::sync_input_signals,
                    controller::update_hover,
                    controller::pick_on_tap,
                    controller::apply_scene_commands,
                    controller::tick_scene_state,
                )
                    .chain()
                    .in_set(FrameSet::Control),
            );
    }
}
