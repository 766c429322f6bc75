// chat/transport.rs

use std::sync::{
    Mutex,
    mpsc::{self, Receiver, Sender},
};

use bevy::prelude::*;
use thiserror::Error;

/// Failures talking to the chat proxy. Shown inline in the chat window.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("chat is not available in this build")]
    Unavailable,

    #[cfg(not(target_arch = "wasm32"))]
    #[error("could not reach the chat service: {0}")]
    Request(#[from] reqwest::Error),

    #[error("chat service answered with status {0}")]
    Status(u16),

    #[error("reply stream was interrupted: {0}")]
    Stream(#[from] std::io::Error),
}

/// What happened to one outgoing request
#[derive(Debug)]
pub enum ChatEvent {
    /// Next piece of the reply, to be appended
    Fragment(String),
    Finished,
    Failed(NetworkError),
}

/// A [`ChatEvent`] tagged with the request it belongs to
#[derive(Debug)]
pub struct ChatUpdate {
    pub generation: u64,
    pub event: ChatEvent,
}

/// Sends chat requests off the frame loop and hands their results back
/// through a channel.
///
/// The receiver sits behind a `Mutex` so the resource is `Sync`.
#[derive(Resource)]
pub struct ChatTransport {
    endpoint: String,
    sender: Sender<ChatUpdate>,
    receiver: Mutex<Receiver<ChatUpdate>>,
}

impl ChatTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let (sender, receiver) = mpsc::channel();
        ChatTransport {
            endpoint: endpoint.into(),
            sender,
            receiver: Mutex::new(receiver),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Start a request in the background. Results arrive via [`drain`](Self::drain).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn send(&self, generation: u64, message: String) {
        let sender = self.sender.clone();
        let endpoint = self.endpoint.clone();

        std::thread::spawn(move || {
            let outcome = stream_reply(&endpoint, &message, |fragment| {
                let _ = sender.send(ChatUpdate {
                    generation,
                    event: ChatEvent::Fragment(fragment),
                });
            });

            let event = match outcome {
                Ok(()) => ChatEvent::Finished,
                Err(err) => {
                    log::warn!("Chat request {generation} failed: {err}");
                    ChatEvent::Failed(err)
                }
            };
            // The app may have shut down; nothing left to notify
            let _ = sender.send(ChatUpdate { generation, event });
        });
    }

    #[cfg(target_arch = "wasm32")]
    pub fn send(&self, generation: u64, _message: String) {
        let _ = self.sender.send(ChatUpdate {
            generation,
            event: ChatEvent::Failed(NetworkError::Unavailable),
        });
    }

    /// Everything received since the last call, in arrival order
    pub fn drain(&self) -> Vec<ChatUpdate> {
        match self.receiver.lock() {
            Ok(receiver) => receiver.try_iter().collect(),
            Err(_) => {
                error!("Chat channel lock poisoned");
                Vec::new()
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(serde::Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// POST the message and feed each decoded fragment to `on_fragment`
#[cfg(not(target_arch = "wasm32"))]
fn stream_reply(
    endpoint: &str,
    message: &str,
    mut on_fragment: impl FnMut(String),
) -> Result<(), NetworkError> {
    use std::io::Read;

    use super::stream::SseDecoder;

    let mut response = reqwest::blocking::Client::new()
        .post(endpoint)
        .json(&ChatRequest { message })
        .send()?;

    let status = response.status();
    if !status.is_success() {
        return Err(NetworkError::Status(status.as_u16()));
    }

    let mut decoder = SseDecoder::default();
    let mut buffer = [0u8; 4096];
    loop {
        let read = response.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        for fragment in decoder.push(&buffer[..read]) {
            on_fragment(fragment);
        }
    }
    for fragment in decoder.finish() {
        on_fragment(fragment);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_returns_updates_in_order() {
        let transport = ChatTransport::new("http://localhost:1/chat");
        for (generation, text) in [(1, "a"), (1, "b"), (2, "c")] {
            transport
                .sender
                .send(ChatUpdate {
                    generation,
                    event: ChatEvent::Fragment(text.to_string()),
                })
                .unwrap();
        }

        let drained: Vec<_> = transport
            .drain()
            .into_iter()
            .map(|update| match update.event {
                ChatEvent::Fragment(text) => (update.generation, text),
                other => panic!("unexpected {other:?}"),
            })
            .collect();

        assert_eq!(
            drained,
            vec![(1, "a".to_string()), (1, "b".to_string()), (2, "c".to_string())]
        );
        assert!(transport.drain().is_empty());
    }

    #[test]
    fn test_error_messages_are_readable() {
        assert_eq!(
            NetworkError::Status(502).to_string(),
            "chat service answered with status 502"
        );
    }
}
