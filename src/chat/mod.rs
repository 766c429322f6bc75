// chat/mod.rs

pub mod stream;
pub mod transport;

use bevy::prelude::*;

use crate::{config::SceneConfig, scene::FrameSet};

pub use transport::{ChatEvent, ChatTransport, ChatUpdate, NetworkError};

pub struct ChatPlugin;

impl Plugin for ChatPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ChatSession>()
            .add_systems(Startup, setup_chat_transport)
            .add_systems(Update, receive_chat_updates.in_set(FrameSet::Control));
    }
}

/// Outcome of pressing Enter in the chat window
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Nothing typed: the window closes
    Close,
    Send { generation: u64, message: String },
}

/// State of the chat window: typed input, the streamed reply, and the
/// request it belongs to.
///
/// Every submit or reset bumps `generation`; updates from older requests
/// are dropped so a closed or re-opened chat never shows a stale reply.
#[derive(Resource, Debug, Default)]
pub struct ChatSession {
    input: String,
    response: String,
    streaming: bool,
    error: Option<String>,
    generation: u64,
}

impl ChatSession {
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn type_char(&mut self, c: char) {
        if !c.is_control() {
            self.input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Take the typed message. An empty (or blank) input closes the chat.
    pub fn submit(&mut self) -> Submission {
        if self.input.trim().is_empty() {
            self.input.clear();
            return Submission::Close;
        }

        self.generation += 1;
        self.response.clear();
        self.error = None;
        self.streaming = true;

        Submission::Send {
            generation: self.generation,
            message: std::mem::take(&mut self.input).trim().to_string(),
        }
    }

    /// Forget the conversation and any request still in flight
    pub fn reset(&mut self) {
        self.generation += 1;
        self.input.clear();
        self.response.clear();
        self.error = None;
        self.streaming = false;
    }

    /// Apply one update; returns false if it belongs to an older request
    pub fn apply(&mut self, update: ChatUpdate) -> bool {
        if update.generation != self.generation {
            return false;
        }

        match update.event {
            ChatEvent::Fragment(text) => self.response.push_str(&text),
            ChatEvent::Finished => self.streaming = false,
            ChatEvent::Failed(err) => {
                self.streaming = false;
                self.error = Some(err.to_string());
            }
        }
        true
    }
}

fn setup_chat_transport(mut commands: Commands, config: Res<SceneConfig>) {
    let transport = ChatTransport::new(config.chat_api_url.clone());
    info!("Chat endpoint: {}", transport.endpoint());
    commands.insert_resource(transport);
}

/// System: move finished network work into the session
fn receive_chat_updates(transport: Option<Res<ChatTransport>>, mut session: ResMut<ChatSession>) {
    let Some(transport) = transport else {
        return;
    };

    for update in transport.drain() {
        let generation = update.generation;
        if !session.apply(update) {
            debug!("Dropped chat update from stale request {generation}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(generation: u64, text: &str) -> ChatUpdate {
        ChatUpdate {
            generation,
            event: ChatEvent::Fragment(text.to_string()),
        }
    }

    fn typed(text: &str) -> ChatSession {
        let mut session = ChatSession::default();
        text.chars().for_each(|c| session.type_char(c));
        session
    }

    #[test]
    fn test_empty_submit_closes() {
        let mut session = typed("   ");

        assert_eq!(session.submit(), Submission::Close);
        assert!(!session.is_streaming());
        assert_eq!(session.input(), "");
    }

    #[test]
    fn test_submit_starts_streaming_request() {
        let mut session = typed("hi there");

        let submission = session.submit();

        assert_eq!(
            submission,
            Submission::Send {
                generation: 1,
                message: "hi there".to_string()
            }
        );
        assert!(session.is_streaming());
        assert_eq!(session.input(), "");
    }

    #[test]
    fn test_fragments_append_as_they_arrive() {
        let mut session = typed("q");
        session.submit();

        assert!(session.apply(fragment(1, "Hel")));
        assert_eq!(session.response(), "Hel");
        assert!(session.apply(fragment(1, "lo")));
        assert_eq!(session.response(), "Hello");

        session.apply(ChatUpdate {
            generation: 1,
            event: ChatEvent::Finished,
        });
        assert!(!session.is_streaming());
    }

    #[test]
    fn test_stale_updates_are_dropped() {
        let mut session = typed("first");
        session.submit();
        session.reset();

        assert!(!session.apply(fragment(1, "old")));
        assert_eq!(session.response(), "");
    }

    #[test]
    fn test_failure_becomes_inline_error() {
        let mut session = typed("q");
        session.submit();

        session.apply(ChatUpdate {
            generation: 1,
            event: ChatEvent::Failed(NetworkError::Status(500)),
        });

        assert!(!session.is_streaming());
        assert_eq!(session.error(), Some("chat service answered with status 500"));
    }

    #[test]
    fn test_backspace_and_control_chars() {
        let mut session = typed("ab\u{8}");
        session.backspace();

        assert_eq!(session.input(), "a");
    }
}
