//! Chat orchestrator.
//!
//! The transcript is append-only, so replies are shown in the order they
//! arrive and are never discarded as superseded.

use tracing::{debug, warn};

use super::{App, Outcome};
use crate::constants;
use crate::models::chat::{ChatMessage, ChatRequest, ChatRole};
use crate::render::markdown;
use crate::view::{Markup, Region};

/// AI messages are Markdown; user messages are shown literally.
pub(crate) fn markup_for(message: &ChatMessage) -> Markup {
    match message.role {
        ChatRole::Ai => markdown::render(&message.text),
        ChatRole::User => markdown::plain(&message.text),
    }
}

impl App {
    /// Send the current chat input, grounded in the editor code and the latest review summary.
    pub async fn send_chat(&self) -> Outcome {
        let request = {
            let mut state = self.lock_state();
            let message = state.chat_input.trim().to_string();
            if message.is_empty() {
                return Outcome::Ignored;
            }
            state.chat_input.clear();
            self.view.set_text(Region::ChatInput, "");
            self.append(&mut state.transcript, ChatMessage::user(message.as_str()));
            ChatRequest {
                message,
                language: state.language.clone(),
                context_code: state.code.clone(),
                review_summary: state.review_summary.clone().unwrap_or_default(),
            }
        };

        let typing = self.typing.enter(self.view.as_ref());
        debug!(chars = request.message.len(), "sending chat message");
        let result = self.backend.chat(&request).await;
        drop(typing);

        let mut state = self.lock_state();
        match result {
            Ok(reply) => {
                self.append(&mut state.transcript, ChatMessage::ai(reply.reply));
                Outcome::Completed
            }
            Err(err) => {
                warn!(error = %err, "chat request failed");
                self.append(
                    &mut state.transcript,
                    ChatMessage::ai(constants::MSG_CHAT_FAILURE),
                );
                Outcome::Failed(err.user_message())
            }
        }
    }

    /// Clear the transcript after confirmation, keeping the welcome message.
    pub fn clear_chat(&self) -> Outcome {
        if !self.view.confirm(constants::MSG_CHAT_CLEAR_CONFIRM) {
            return Outcome::Ignored;
        }
        let mut state = self.lock_state();
        let removed = state.transcript.clear_keep_first();
        self.view.truncate_chat(1);
        debug!(removed, "cleared chat");
        Outcome::Completed
    }

    /// Record `message` and show it, under the same state lock.
    fn append(&self, transcript: &mut crate::state::Transcript, message: ChatMessage) {
        self.view.append_chat(&message, &markup_for(&message));
        transcript.push(message);
    }
}
