use std::time::Duration;

use crate::api::AssistantBackend;

pub const CONNECTION_ERROR: &str = "❌ Connection error. Please try again.";

/// How long to wait after a sidebar-touching intent before refreshing, giving
/// the backend time to finish its write.
pub const SIDEBAR_REFRESH_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub text: String,
    pub sender: Sender,
}

/// What a single chat round-trip produced for the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatOutcome {
    pub reply: String,
    pub refresh_after: Option<Duration>,
}

/// In-memory conversation for the current session. Never persisted.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Records the user's message and returns what should be sent, or `None`
    /// when there is nothing but whitespace.
    pub fn submit(&mut self, input: &str) -> Option<String> {
        let message = input.trim();
        if message.is_empty() {
            return None;
        }
        self.push(Sender::User, message);
        Some(message.to_string())
    }

    pub fn push(&mut self, sender: Sender, text: impl Into<String>) -> &ChatMessage {
        self.messages.push(ChatMessage { text: text.into(), sender });
        &self.messages[self.messages.len() - 1]
    }
}

/// Sends one message. Every failure collapses into the fixed connection error;
/// the user's message is neither retried nor withdrawn.
pub async fn exchange<B: AssistantBackend>(backend: &B, message: &str) -> ChatOutcome {
    match backend.chat(message).await {
        Ok(reply) => {
            let refresh_after = reply.touches_sidebar().then_some(SIDEBAR_REFRESH_DELAY);
            ChatOutcome { reply: reply.response, refresh_after }
        }
        Err(e) => {
            log::error!("chat request failed: {e}");
            ChatOutcome { reply: CONNECTION_ERROR.to_string(), refresh_after: None }
        }
    }
}
