pub mod gesture;
pub mod joystick;

use bevy::input::ButtonState;
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::input::touch::{TouchInput, TouchPhase, Touches};
use bevy::prelude::*;
use bevy::window::{CursorMoved, PrimaryWindow};

use crate::chat::ChatSession;
use crate::graph::NodeId;
use crate::scene::{FrameSet, Overlay, SceneState};

pub use gesture::{ControlsHint, DragDetector, HeldKeys, InputSurface};
pub use joystick::VirtualJoysticks;

pub struct InputPlugin;
impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CursorPos>()
            .init_resource::<InputSignals>()
            .init_resource::<VirtualJoysticks>()
            .init_resource::<ControlsHint>()
            .init_resource::<InputSurface>()
            .init_resource::<HeldKeys>()
            .init_resource::<PointerGesture>()
            .add_message::<PointerEvent>()
            .add_message::<PointerTap>()
            .add_message::<SceneCommand>()
            .add_systems(
                Update,
                (
                    track_cursor_pos,
                    collect_pointer_events,
                    detect_gestures,
                    read_keyboard_commands,
                    read_fly_keys,
                )
                    .chain()
                    .in_set(FrameSet::Input),
            );
    }
}

#[derive(Message, Debug, Clone)]
pub struct PointerEvent {
    /// Window (logical) coordinates: pixels from top-left
    pub position: Vec2,
    pub event_type: PointerEventType,
    /// 0 = mouse, otherwise the touch id
    pub id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventType {
    Down,
    Move,
    Up,
}

/// A press released without dragging
#[derive(Message, Debug, Clone, Copy)]
pub struct PointerTap {
    pub position: Vec2,
}

/// Discrete requests to the scene controller, applied in the order written
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub enum SceneCommand {
    /// Enter: opens the chat, or submits the typed message while it is open
    ChatToggle,
    /// Clicking the companion
    OpenChat,
    Escape,
    ToggleHint,
    TypeChar(char),
    Backspace,
    ClickNode(NodeId),
}

/// Continuous input for this frame
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct InputSignals {
    /// Desktop fly axes in `[-1, 1]`: x right, y up, z forward
    pub fly_axes: Vec3,
    /// Drag-to-look travel this frame (pixels)
    pub look_delta: Vec2,
    pub speed_boost: bool,
    /// Left joystick
    pub move_vector: Vec2,
    /// Right joystick
    pub rotate_vector: Vec2,
}

#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct CursorPos(pub Option<Vec2>);

/// The one pointer currently pressed and its drag state
#[derive(Resource, Default, Debug)]
pub struct PointerGesture {
    pointer: Option<u64>,
    drag: DragDetector,
}

/// Is the pointer over an overlay that takes its own clicks?
///
/// Overlays carry an [`Interaction`]; the UI marks it `Hovered`/`Pressed`
/// while the pointer is on the visible node.
pub fn pointer_over_ui(interactions: &Query<&Interaction>) -> bool {
    interactions
        .iter()
        .any(|interaction| *interaction != Interaction::None)
}

fn track_cursor_pos(mut ev_cursor: MessageReader<CursorMoved>, mut pos: ResMut<CursorPos>) {
    for e in ev_cursor.read() {
        // last event wins
        pos.0 = Some(e.position);
    }
}

/// Mouse buttons and touches become pointer events, except touches claimed
/// by a joystick and presses that land on an overlay
fn collect_pointer_events(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    interactions: Query<&Interaction>,
    cursor: Res<CursorPos>,
    touches: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut touch_events: MessageReader<TouchInput>,
    mut sticks: ResMut<VirtualJoysticks>,
    mut surface: ResMut<InputSurface>,
    mut signals: ResMut<InputSignals>,
    mut out: MessageWriter<PointerEvent>,
) {
    let over_ui = pointer_over_ui(&interactions);

    if let Some(p) = cursor.0 {
        if mouse_buttons.just_pressed(MouseButton::Left) && !over_ui {
            out.write(PointerEvent {
                position: p,
                event_type: PointerEventType::Down,
                id: 0,
            });
        }
        if mouse_buttons.pressed(MouseButton::Left) {
            out.write(PointerEvent {
                position: p,
                event_type: PointerEventType::Move,
                id: 0,
            });
        }
        if mouse_buttons.just_released(MouseButton::Left) {
            out.write(PointerEvent {
                position: p,
                event_type: PointerEventType::Up,
                id: 0,
            });
        }
    }

    let window_size = windows.single().map(Window::size).unwrap_or(Vec2::ZERO);

    for ev in touch_events.read() {
        if !surface.is_touch() {
            info!("Touch input detected, switching to joystick controls");
            *surface = InputSurface::Touch;
        }

        let claimed = match ev.phase {
            TouchPhase::Started => sticks.touch_started(ev.id, ev.position, window_size),
            TouchPhase::Moved => sticks.touch_moved(ev.id, ev.position),
            TouchPhase::Ended | TouchPhase::Canceled => sticks.touch_ended(ev.id),
        };
        if claimed {
            continue;
        }

        if ev.phase == TouchPhase::Started && over_ui {
            continue;
        }

        let event_type = match ev.phase {
            TouchPhase::Started => PointerEventType::Down,
            TouchPhase::Moved => PointerEventType::Move,
            TouchPhase::Ended | TouchPhase::Canceled => PointerEventType::Up,
        };
        out.write(PointerEvent {
            position: ev.position,
            event_type,
            id: ev.id,
        });
    }

    // A touch that vanished without an end event must not leave a stick deflected
    sticks.drop_lost_touches(|id| touches.get_pressed(id).is_some());

    signals.move_vector = sticks.move_vector();
    signals.rotate_vector = sticks.rotate_vector();
}

/// Split pointer events into taps and drags
fn detect_gestures(
    mut pointer_events: MessageReader<PointerEvent>,
    interactions: Query<&Interaction>,
    mut gesture: ResMut<PointerGesture>,
    mut hint: ResMut<ControlsHint>,
    mut signals: ResMut<InputSignals>,
    mut taps: MessageWriter<PointerTap>,
) {
    signals.look_delta = Vec2::ZERO;

    for ev in pointer_events.read() {
        match ev.event_type {
            PointerEventType::Down => {
                if gesture.pointer.is_none() {
                    gesture.pointer = Some(ev.id);
                    gesture.drag.press(ev.position);
                }
            }
            PointerEventType::Move => {
                if gesture.pointer == Some(ev.id) {
                    signals.look_delta += gesture.drag.move_to(ev.position);
                }
            }
            PointerEventType::Up => {
                if gesture.pointer != Some(ev.id) {
                    continue;
                }
                gesture.pointer = None;
                if gesture.drag.release() {
                    if hint.is_visible() {
                        debug!("First drag, hiding controls hint");
                    }
                    hint.on_drag_finished();
                } else if !pointer_over_ui(&interactions) {
                    taps.write(PointerTap {
                        position: ev.position,
                    });
                }
            }
        }
    }
}

/// Enter, Escape, H and chat typing
fn read_keyboard_commands(
    mut keys: MessageReader<KeyboardInput>,
    state: Res<SceneState>,
    chat: Res<ChatSession>,
    mut out: MessageWriter<SceneCommand>,
) {
    // Follow the effect of earlier keys in this frame so text typed right
    // after an opening Enter lands in the chat
    let mut chat_open = state.chat_open();
    let mut panel_open = state.active_overlay() == Overlay::InfoPanel;
    let mut has_input = !chat.input().trim().is_empty();

    for ev in keys.read() {
        if ev.state != ButtonState::Pressed {
            continue;
        }
        // Keys only reach the chat while its window is the one on screen
        let chat_focused = chat_open && !panel_open;

        match &ev.logical_key {
            // The info panel covers the chat: nothing to submit
            Key::Enter if !ev.repeat && chat_open && panel_open => {}
            Key::Enter if !ev.repeat => {
                out.write(SceneCommand::ChatToggle);
                chat_open = !chat_open || has_input;
                has_input = false;
            }
            Key::Escape if !ev.repeat => {
                out.write(SceneCommand::Escape);
                if panel_open {
                    panel_open = false;
                } else {
                    chat_open = false;
                }
            }
            Key::Backspace if chat_focused => {
                out.write(SceneCommand::Backspace);
            }
            _ if chat_focused => {
                if let Some(text) = &ev.text {
                    for c in text.chars() {
                        has_input |= !c.is_whitespace() && !c.is_control();
                        out.write(SceneCommand::TypeChar(c));
                    }
                }
            }
            Key::Character(c) if !ev.repeat && c.eq_ignore_ascii_case("h") => {
                out.write(SceneCommand::ToggleHint);
            }
            _ => {}
        }
    }
}

/// Held keys for flying and the HUD
fn read_fly_keys(
    keyboard: Res<ButtonInput<KeyCode>>,
    state: Res<SceneState>,
    mut held: ResMut<HeldKeys>,
    mut signals: ResMut<InputSignals>,
) {
    // Letters belong to the chat input while it is open
    if state.chat_open() {
        *held = HeldKeys::default();
        signals.fly_axes = Vec3::ZERO;
        signals.speed_boost = false;
        return;
    }

    let axis = |positive: KeyCode, negative: KeyCode| {
        keyboard.pressed(positive) as i32 as f32 - keyboard.pressed(negative) as i32 as f32
    };

    *held = HeldKeys {
        w: keyboard.pressed(KeyCode::KeyW),
        a: keyboard.pressed(KeyCode::KeyA),
        s: keyboard.pressed(KeyCode::KeyS),
        d: keyboard.pressed(KeyCode::KeyD),
    };
    signals.fly_axes = Vec3::new(
        axis(KeyCode::KeyD, KeyCode::KeyA),
        axis(KeyCode::KeyR, KeyCode::KeyF),
        axis(KeyCode::KeyW, KeyCode::KeyS),
    );
    signals.speed_boost =
        keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Messages seen at the end of each frame
    #[derive(Resource, Default)]
    struct Recorded {
        taps: Vec<Vec2>,
        commands: Vec<SceneCommand>,
    }

    fn record_taps(mut taps: MessageReader<PointerTap>, mut recorded: ResMut<Recorded>) {
        recorded.taps.extend(taps.read().map(|tap| tap.position));
    }

    fn record_commands(mut commands: MessageReader<SceneCommand>, mut recorded: ResMut<Recorded>) {
        recorded.commands.extend(commands.read().cloned());
    }

    fn pointer_app() -> App {
        let mut app = App::new();
        app.add_message::<TouchInput>()
            .add_message::<PointerEvent>()
            .add_message::<PointerTap>()
            .init_resource::<ButtonInput<MouseButton>>()
            .init_resource::<Touches>()
            .init_resource::<CursorPos>()
            .init_resource::<VirtualJoysticks>()
            .init_resource::<InputSurface>()
            .init_resource::<InputSignals>()
            .init_resource::<PointerGesture>()
            .init_resource::<ControlsHint>()
            .init_resource::<Recorded>()
            .add_systems(
                Update,
                (collect_pointer_events, detect_gestures, record_taps).chain(),
            );
        app
    }

    /// Run one frame with the left button changed by `change`
    fn mouse_frame(app: &mut App, cursor: Vec2, change: impl FnOnce(&mut ButtonInput<MouseButton>)) {
        app.world_mut().resource_mut::<CursorPos>().0 = Some(cursor);
        {
            let mut buttons = app.world_mut().resource_mut::<ButtonInput<MouseButton>>();
            buttons.clear();
            change(&mut buttons);
        }
        app.update();
    }

    fn click(app: &mut App, at: Vec2) {
        mouse_frame(app, at, |buttons| buttons.press(MouseButton::Left));
        mouse_frame(app, at, |buttons| buttons.release(MouseButton::Left));
    }

    fn taps(app: &App) -> Vec<Vec2> {
        app.world().resource::<Recorded>().taps.clone()
    }

    fn keyboard_app() -> App {
        let mut app = App::new();
        app.add_message::<KeyboardInput>()
            .add_message::<SceneCommand>()
            .init_resource::<SceneState>()
            .init_resource::<ChatSession>()
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<HeldKeys>()
            .init_resource::<InputSignals>()
            .init_resource::<Recorded>()
            .add_systems(
                Update,
                (read_keyboard_commands, read_fly_keys, record_commands).chain(),
            );
        app
    }

    fn key(key_code: KeyCode, logical_key: Key, text: Option<&str>) -> KeyboardInput {
        KeyboardInput {
            key_code,
            logical_key,
            state: ButtonState::Pressed,
            text: text.map(Into::into),
            repeat: false,
            window: Entity::PLACEHOLDER,
        }
    }

    fn enter() -> KeyboardInput {
        key(KeyCode::Enter, Key::Enter, Some("\r"))
    }

    fn escape() -> KeyboardInput {
        key(KeyCode::Escape, Key::Escape, None)
    }

    fn backspace() -> KeyboardInput {
        key(KeyCode::Backspace, Key::Backspace, None)
    }

    fn letter(key_code: KeyCode, c: &str) -> KeyboardInput {
        key(key_code, Key::Character(c.into()), Some(c))
    }

    /// Feed one frame of key events and return the commands written
    fn type_keys(app: &mut App, keys: Vec<KeyboardInput>) -> Vec<SceneCommand> {
        for ev in keys {
            app.world_mut().write_message(ev);
        }
        app.update();
        std::mem::take(&mut app.world_mut().resource_mut::<Recorded>().commands)
    }

    #[test]
    fn test_click_writes_tap() {
        let mut app = pointer_app();

        click(&mut app, Vec2::new(100.0, 100.0));

        assert_eq!(taps(&app), vec![Vec2::new(100.0, 100.0)]);
        assert!(app.world().resource::<ControlsHint>().is_visible());
    }

    #[test]
    fn test_drag_looks_and_hides_hint_without_tap() {
        let mut app = pointer_app();

        mouse_frame(&mut app, Vec2::new(100.0, 100.0), |b| b.press(MouseButton::Left));
        mouse_frame(&mut app, Vec2::new(160.0, 100.0), |_| {});
        assert_eq!(
            app.world().resource::<InputSignals>().look_delta,
            Vec2::new(60.0, 0.0)
        );
        mouse_frame(&mut app, Vec2::new(160.0, 100.0), |b| b.release(MouseButton::Left));

        assert!(taps(&app).is_empty());
        assert!(!app.world().resource::<ControlsHint>().is_visible());
    }

    #[test]
    fn test_click_on_overlay_button_stays_out_of_scene() {
        let mut app = pointer_app();
        app.world_mut().spawn((Button, Interaction::Pressed));

        click(&mut app, Vec2::new(1538.0, 838.0));

        assert!(taps(&app).is_empty());
    }

    #[test]
    fn test_click_resumes_once_pointer_leaves_overlay() {
        let mut app = pointer_app();
        let panel = app.world_mut().spawn(Interaction::Hovered).id();

        click(&mut app, Vec2::new(10.0, 10.0));
        assert!(taps(&app).is_empty());

        app.world_mut().entity_mut(panel).insert(Interaction::None);
        click(&mut app, Vec2::new(10.0, 10.0));
        assert_eq!(taps(&app), vec![Vec2::new(10.0, 10.0)]);
    }

    #[test]
    fn test_enter_and_escape_commands() {
        let mut app = keyboard_app();

        let commands = type_keys(&mut app, vec![escape()]);
        assert_eq!(commands, vec![SceneCommand::Escape]);

        let commands = type_keys(&mut app, vec![enter()]);
        assert_eq!(commands, vec![SceneCommand::ChatToggle]);
    }

    #[test]
    fn test_h_toggles_hint_while_chat_closed() {
        let mut app = keyboard_app();

        let commands = type_keys(&mut app, vec![letter(KeyCode::KeyH, "h")]);

        assert_eq!(commands, vec![SceneCommand::ToggleHint]);
    }

    #[test]
    fn test_text_right_after_opening_enter_reaches_chat() {
        let mut app = keyboard_app();

        let commands = type_keys(
            &mut app,
            vec![enter(), letter(KeyCode::KeyH, "h"), letter(KeyCode::KeyI, "i")],
        );

        assert_eq!(
            commands,
            vec![
                SceneCommand::ChatToggle,
                SceneCommand::TypeChar('h'),
                SceneCommand::TypeChar('i'),
            ]
        );
    }

    #[test]
    fn test_blank_enter_closes_so_following_keys_are_not_typed() {
        let mut app = keyboard_app();
        app.world_mut().resource_mut::<SceneState>().open_chat();

        let commands = type_keys(&mut app, vec![enter(), letter(KeyCode::KeyH, "h")]);

        assert_eq!(commands, vec![SceneCommand::ChatToggle, SceneCommand::ToggleHint]);
    }

    #[test]
    fn test_open_chat_takes_letters_from_flying() {
        let mut app = keyboard_app();
        app.world_mut().resource_mut::<SceneState>().open_chat();
        {
            let mut keyboard = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keyboard.press(KeyCode::KeyW);
            keyboard.press(KeyCode::ShiftLeft);
        }

        let commands = type_keys(&mut app, vec![letter(KeyCode::KeyW, "w"), backspace()]);

        assert_eq!(commands, vec![SceneCommand::TypeChar('w'), SceneCommand::Backspace]);
        let signals = *app.world().resource::<InputSignals>();
        assert_eq!(signals.fly_axes, Vec3::ZERO);
        assert!(!signals.speed_boost);
        assert_eq!(*app.world().resource::<HeldKeys>(), HeldKeys::default());
    }

    #[test]
    fn test_fly_keys_and_shift_boost() {
        let mut app = keyboard_app();
        {
            let mut keyboard = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keyboard.press(KeyCode::KeyW);
            keyboard.press(KeyCode::KeyD);
            keyboard.press(KeyCode::ShiftLeft);
        }

        type_keys(&mut app, Vec::new());

        let signals = *app.world().resource::<InputSignals>();
        assert_eq!(signals.fly_axes, Vec3::new(1.0, 0.0, 1.0));
        assert!(signals.speed_boost);
        let held = *app.world().resource::<HeldKeys>();
        assert!(held.w && held.d && !held.a && !held.s);
    }

    #[test]
    fn test_info_panel_over_chat_takes_no_typing() {
        let mut app = keyboard_app();
        {
            let mut state = app.world_mut().resource_mut::<SceneState>();
            state.open_chat();
            state.select_node(NodeId::new("n1"));
        }

        let commands = type_keys(
            &mut app,
            vec![enter(), letter(KeyCode::KeyA, "a"), backspace()],
        );
        assert!(commands.is_empty());

        // Escape closes the panel; the chat below takes keys again
        let commands = type_keys(&mut app, vec![escape(), letter(KeyCode::KeyA, "a")]);
        assert_eq!(commands, vec![SceneCommand::Escape, SceneCommand::TypeChar('a')]);
    }
}
