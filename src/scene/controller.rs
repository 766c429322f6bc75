// scene/controller.rs

use bevy::prelude::*;

use crate::{
    camera::MainCamera,
    chat::{ChatSession, ChatTransport, Submission},
    config::SceneConfig,
    input::{
        ControlsHint, CursorPos, InputSignals, InputSurface, PointerTap, SceneCommand,
        pointer_over_ui,
    },
    visual::{
        companion::Companion,
        nodes::{NodeClick, SpatialNode},
        utils::ray_sphere_hit,
    },
};

use super::state::{EscapeOutcome, Overlay, SceneState};

/// What a pointer ray landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickTarget {
    Node(Entity),
    Companion,
}

/// Closest candidate sphere `(target, center, radius)` hit by the ray
pub fn pick_nearest<T>(
    origin: Vec3,
    direction: Vec3,
    candidates: impl IntoIterator<Item = (T, Vec3, f32)>,
) -> Option<T> {
    candidates
        .into_iter()
        .filter_map(|(target, center, radius)| {
            ray_sphere_hit(origin, direction, center, radius).map(|distance| (distance, target))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, target)| target)
}

fn pick_at<'a>(
    position: Vec2,
    camera: &Camera,
    camera_transform: &GlobalTransform,
    nodes: impl Iterator<Item = (Entity, &'a SpatialNode)>,
    companions: impl Iterator<Item = (&'a Companion, &'a Transform)>,
) -> Option<PickTarget> {
    let ray = camera.viewport_to_world(camera_transform, position).ok()?;

    let node_spheres = nodes.map(|(entity, node)| {
        (
            PickTarget::Node(entity),
            node.visual.display_position,
            node.pick_radius(),
        )
    });
    let companion_spheres = companions.map(|(companion, transform)| {
        (
            PickTarget::Companion,
            transform.translation,
            companion.pick_radius(),
        )
    });

    pick_nearest(ray.origin, *ray.direction, node_spheres.chain(companion_spheres))
}

/// Start or end hover on every node so exactly `hovered` is hovered
fn apply_hover(nodes: &mut Query<(Entity, &mut SpatialNode)>, hovered: Option<Entity>) {
    for (entity, mut node) in nodes.iter_mut() {
        if Some(entity) == hovered {
            node.on_hover_start();
        } else if node.visual.is_hovered {
            node.on_hover_end();
        }
    }
}

/// System: copy continuous input into the scene state
pub fn sync_input_signals(signals: Res<InputSignals>, mut state: ResMut<SceneState>) {
    state.set_speed_boost(signals.speed_boost);
    state.set_mobile_vectors(signals.move_vector, signals.rotate_vector);
}

/// System: desktop hover from the cursor ray, every frame
pub fn update_hover(
    cursor: Res<CursorPos>,
    surface: Res<InputSurface>,
    interactions: Query<&Interaction>,
    cameras: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    companions: Query<(&Companion, &Transform)>,
    mut nodes: Query<(Entity, &mut SpatialNode)>,
    mut state: ResMut<SceneState>,
) {
    // Touch surfaces hover by tapping
    if surface.is_touch() {
        return;
    }
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };

    // Overlays hide whatever is behind them
    let cursor = cursor.0.filter(|_| !pointer_over_ui(&interactions));
    let picked = cursor.and_then(|position| {
        pick_at(position, camera, camera_transform, nodes.iter(), companions.iter())
    });
    let hovered = match picked {
        Some(PickTarget::Node(entity)) => Some(entity),
        _ => None,
    };

    apply_hover(&mut nodes, hovered);

    let hovered_id = hovered.and_then(|entity| nodes.get(entity).ok().map(|(_, node)| node.id.clone()));
    if state.hovered_node() != hovered_id.as_ref() {
        state.set_hovered(hovered_id);
    }
}

/// System: turn taps into node clicks or a companion click
pub fn pick_on_tap(
    mut taps: MessageReader<PointerTap>,
    surface: Res<InputSurface>,
    cameras: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    companions: Query<(&Companion, &Transform)>,
    mut nodes: Query<(Entity, &mut SpatialNode)>,
    mut state: ResMut<SceneState>,
    mut out: MessageWriter<SceneCommand>,
) {
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };

    for tap in taps.read() {
        let picked = pick_at(tap.position, camera, camera_transform, nodes.iter(), companions.iter());

        match picked {
            Some(PickTarget::Node(entity)) => {
                let Ok((_, node)) = nodes.get(entity) else {
                    continue;
                };
                let id = node.id.clone();
                if surface.is_touch() {
                    apply_hover(&mut nodes, Some(entity));
                    state.set_hovered(Some(id.clone()));
                }
                out.write(SceneCommand::ClickNode(id));
            }
            Some(PickTarget::Companion) => {
                out.write(SceneCommand::OpenChat);
            }
            None => {
                if surface.is_touch() {
                    apply_hover(&mut nodes, None);
                    state.set_hovered(None);
                }
            }
        }
    }
}

fn open_chat(
    state: &mut SceneState,
    chat: &mut ChatSession,
    companions: &mut Query<&mut Companion>,
    camera: Option<&Transform>,
) {
    if !state.open_chat() {
        return;
    }
    chat.reset();
    info!("Chat opened");

    let Some(camera) = camera else {
        return;
    };
    for mut companion in companions.iter_mut() {
        companion
            .agent
            .open_chat(camera.translation, *camera.forward());
    }
}

fn close_chat(state: &mut SceneState, chat: &mut ChatSession, companions: &mut Query<&mut Companion>) {
    if state.close_chat() {
        info!("Chat closed");
    }
    after_chat_closed(chat, companions);
}

fn after_chat_closed(chat: &mut ChatSession, companions: &mut Query<&mut Companion>) {
    chat.reset();
    for mut companion in companions.iter_mut() {
        companion.agent.close_chat();
    }
}

/// System: apply scene commands strictly in the order they were written.
///
/// Companion triggers and node tweens start inside this handler, so two
/// quick toggles land in event order.
pub fn apply_scene_commands(
    mut commands_in: MessageReader<SceneCommand>,
    mut state: ResMut<SceneState>,
    mut chat: ResMut<ChatSession>,
    transport: Option<Res<ChatTransport>>,
    mut hint: ResMut<ControlsHint>,
    config: Res<SceneConfig>,
    cameras: Query<&Transform, With<MainCamera>>,
    mut nodes: Query<&mut SpatialNode>,
    mut companions: Query<&mut Companion>,
) {
    let camera = cameras.single().ok();

    for command in commands_in.read() {
        match command {
            SceneCommand::ChatToggle => {
                if !state.chat_open() {
                    open_chat(&mut state, &mut chat, &mut companions, camera);
                    continue;
                }
                // The info panel covers the chat window
                if state.active_overlay() != Overlay::Chat {
                    continue;
                }
                match chat.submit() {
                    Submission::Close => close_chat(&mut state, &mut chat, &mut companions),
                    Submission::Send {
                        generation,
                        message,
                    } => match &transport {
                        Some(transport) => {
                            info!("Sending chat message (request {generation})");
                            transport.send(generation, message);
                        }
                        None => warn!("Chat transport not ready, dropping message"),
                    },
                }
            }
            SceneCommand::OpenChat => {
                open_chat(&mut state, &mut chat, &mut companions, camera);
            }
            SceneCommand::Escape => match state.escape() {
                EscapeOutcome::ClosedInfoPanel => debug!("Info panel closed"),
                EscapeOutcome::ClosedChat => {
                    info!("Chat closed");
                    after_chat_closed(&mut chat, &mut companions);
                }
                EscapeOutcome::Nothing => {}
            },
            SceneCommand::ToggleHint => hint.toggle(),
            SceneCommand::TypeChar(c) => {
                if state.active_overlay() == Overlay::Chat {
                    chat.type_char(*c);
                }
            }
            SceneCommand::Backspace => {
                if state.active_overlay() == Overlay::Chat {
                    chat.backspace();
                }
            }
            SceneCommand::ClickNode(id) => {
                let exploded = state.exploded();
                // Unknown ids are ignored
                let Some(click) = nodes
                    .iter()
                    .find(|node| &node.id == id)
                    .map(|node| node.on_click(exploded))
                else {
                    continue;
                };

                match click {
                    NodeClick::ToggleExploded => {
                        let exploded = state.toggle_exploded();
                        info!("Graph {}", if exploded { "exploded" } else { "collapsed" });
                        for mut node in &mut nodes {
                            node.on_exploded_changed(exploded, config.explosion_factor);
                        }
                    }
                    NodeClick::Select(id) => {
                        info!("Selected node {}", id);
                        state.select_node(id);
                    }
                    NodeClick::Ignored => {}
                }
            }
        }
    }
}

/// System: advance scene timers
pub fn tick_scene_state(time: Res<Time>, mut state: ResMut<SceneState>) {
    state.tick(time.delta_secs());
}
