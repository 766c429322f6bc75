use bevy::prelude::*;

use crate::{
    chat::ChatSession,
    scene::{Overlay, SceneState},
};

#[derive(Component)]
pub struct ChatWindow;

#[derive(Component)]
pub struct ChatWindowText;

/// Window contents: prompt line, streamed reply and any inline error
pub fn chat_window_text(session: &ChatSession) -> String {
    let mut out = format!("> {}_", session.input());

    if !session.response().is_empty() {
        out.push_str("\n\n");
        out.push_str(session.response());
    } else if session.is_streaming() {
        out.push_str("\n\n...");
    }

    if let Some(error) = session.error() {
        out.push_str("\n\nError: ");
        out.push_str(error);
    }

    out.push_str("\n\n[Enter] send   [Esc] close");
    out
}

pub fn spawn_chat_window(commands: &mut Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Percent(50.0),
                bottom: Val::Px(24.0),
                width: Val::Px(520.0),
                margin: UiRect::left(Val::Px(-260.0)),
                padding: UiRect::all(Val::Px(14.0)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(8.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.06, 0.05, 0.12, 0.92)),
            Visibility::Hidden,
            // Catches clicks so they never reach the scene
            Interaction::default(),
            ChatWindow,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Ask me anything"),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.85, 0.4)),
            ));
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.88, 0.88, 0.92)),
                ChatWindowText,
            ));
        });
}

/// System: show the chat window while it is the active overlay
pub fn update_chat_window(
    state: Res<SceneState>,
    session: Res<ChatSession>,
    mut windows: Query<&mut Visibility, With<ChatWindow>>,
    mut texts: Query<&mut Text, With<ChatWindowText>>,
) {
    let visible = state.active_overlay() == Overlay::Chat;

    for mut visibility in &mut windows {
        visibility.set_if_neq(if visible {
            Visibility::Visible
        } else {
            Visibility::Hidden
        });
    }

    if visible && session.is_changed() {
        let content = chat_window_text(&session);
        for mut text in &mut texts {
            **text = content.clone();
        }
    }
}
