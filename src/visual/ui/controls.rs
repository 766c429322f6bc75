use bevy::prelude::*;

use crate::input::{ControlsHint, HeldKeys, InputSurface};

#[derive(Component)]
pub struct HintPanel;

#[derive(Component)]
pub struct HintCloseButton;

/// Small "?" bubble that re-opens the hint
#[derive(Component)]
pub struct HintToggleButton;

/// One W/A/S/D key cap in the hint
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudKey {
    W,
    A,
    S,
    D,
}

impl HudKey {
    fn label(self) -> &'static str {
        match self {
            HudKey::W => "W",
            HudKey::A => "A",
            HudKey::S => "S",
            HudKey::D => "D",
        }
    }

    pub fn is_held(self, held: &HeldKeys) -> bool {
        match self {
            HudKey::W => held.w,
            HudKey::A => held.a,
            HudKey::S => held.s,
            HudKey::D => held.d,
        }
    }
}

const KEY_IDLE: Color = Color::srgb(0.92, 0.92, 0.92);
const KEY_HELD: Color = Color::srgb(1.0, 0.85, 0.4);
const PANEL_BACKGROUND: Color = Color::srgba(0.0, 0.0, 0.0, 0.7);

/// Hint line for the current input surface
pub fn hint_caption(surface: InputSurface) -> &'static str {
    match surface {
        InputSurface::Desktop => "Drag to look around\nR/F up/down, Shift to speed up\nEnter to chat, click the center to explore",
        InputSurface::Touch => "Left stick moves, right stick turns\nTap the center to explore",
    }
}

#[derive(Component)]
pub struct HintCaption;

fn key_cap(parent: &mut ChildSpawnerCommands, key: HudKey) {
    parent
        .spawn((
            Node {
                width: Val::Px(40.0),
                height: Val::Px(40.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(KEY_IDLE),
            key,
        ))
        .with_children(|cap| {
            cap.spawn((
                Text::new(key.label()),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::BLACK),
            ));
        });
}

pub fn spawn_controls_hint(commands: &mut Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                right: Val::Px(40.0),
                bottom: Val::Px(40.0),
                padding: UiRect::all(Val::Px(16.0)),
                column_gap: Val::Px(24.0),
                flex_direction: FlexDirection::Row,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(PANEL_BACKGROUND),
            Interaction::default(),
            HintPanel,
        ))
        .with_children(|panel| {
            panel
                .spawn((
                    Button,
                    Node {
                        padding: UiRect::axes(Val::Px(8.0), Val::Px(4.0)),
                        ..default()
                    },
                    HintCloseButton,
                ))
                .with_children(|button| {
                    button.spawn((Text::new("x Close"), TextColor(Color::WHITE)));
                });

            panel.spawn((
                Text::new(hint_caption(InputSurface::Desktop)),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                HintCaption,
            ));

            panel
                .spawn(Node {
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::Center,
                    row_gap: Val::Px(4.0),
                    ..default()
                })
                .with_children(|keys| {
                    key_cap(keys, HudKey::W);
                    keys.spawn(Node {
                        column_gap: Val::Px(4.0),
                        ..default()
                    })
                    .with_children(|row| {
                        for key in [HudKey::A, HudKey::S, HudKey::D] {
                            key_cap(row, key);
                        }
                    });
                });
        });

    commands
        .spawn((
            Button,
            Node {
                position_type: PositionType::Absolute,
                right: Val::Px(40.0),
                bottom: Val::Px(40.0),
                width: Val::Px(44.0),
                height: Val::Px(44.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(PANEL_BACKGROUND),
            Visibility::Hidden,
            HintToggleButton,
        ))
        .with_children(|button| {
            button.spawn((
                Text::new("?"),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

/// System: close/re-open buttons
pub fn handle_hint_buttons(
    mut hint: ResMut<ControlsHint>,
    close_buttons: Query<&Interaction, (Changed<Interaction>, With<HintCloseButton>)>,
    toggle_buttons: Query<&Interaction, (Changed<Interaction>, With<HintToggleButton>)>,
) {
    if close_buttons.iter().any(|i| *i == Interaction::Pressed) {
        hint.close();
    }
    if toggle_buttons.iter().any(|i| *i == Interaction::Pressed) {
        hint.reopen();
    }
}

/// System: hint/bubble visibility, caption and key highlight
pub fn update_controls_hint(
    hint: Res<ControlsHint>,
    held: Res<HeldKeys>,
    surface: Res<InputSurface>,
    mut panels: Query<&mut Visibility, (With<HintPanel>, Without<HintToggleButton>)>,
    mut bubbles: Query<&mut Visibility, (With<HintToggleButton>, Without<HintPanel>)>,
    mut captions: Query<&mut Text, With<HintCaption>>,
    mut keys: Query<(&HudKey, &mut BackgroundColor, &mut Visibility), (Without<HintPanel>, Without<HintToggleButton>)>,
) {
    let shown = |visible: bool| if visible { Visibility::Inherited } else { Visibility::Hidden };

    for mut visibility in &mut panels {
        visibility.set_if_neq(shown(hint.is_visible()));
    }
    for mut visibility in &mut bubbles {
        visibility.set_if_neq(shown(hint.toggle_button_visible()));
    }

    if surface.is_changed() {
        for mut text in &mut captions {
            **text = hint_caption(*surface).to_string();
        }
    }

    for (key, mut background, mut visibility) in &mut keys {
        // No keyboard on touch surfaces
        visibility.set_if_neq(shown(!surface.is_touch()));
        let color = if key.is_held(&held) { KEY_HELD } else { KEY_IDLE };
        if background.0 != color {
            background.0 = color;
        }
    }
}
