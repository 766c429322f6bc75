use bevy::prelude::*;

mod camera;
mod chat;
mod config;
mod graph;
mod input;
mod scene;
mod visual;

use bevy::window::WindowResolution;
use camera::CameraPlugin;
use chat::ChatPlugin;
use config::SceneConfig;
use input::InputPlugin;
use scene::ScenePlugin;

use crate::visual::plugin::GraphPlugin;

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Neuron Scene".into(),
            resolution: WindowResolution::new(1600, 900),
            resizable: true,
            ..default()
        }),
        ..default()
    }))
    .insert_resource(SceneConfig::from_env())
    .add_plugins(ScenePlugin)
    .add_plugins(CameraPlugin)
    .add_plugins(InputPlugin)
    .add_plugins(ChatPlugin)
    .add_plugins(GraphPlugin);

    app.run();
}
