//! Conversation assembler: one inbound chat turn end-to-end.
//!
//! Validates the turn, appends the user message, builds the bounded
//! conversation window and system prompt, calls the reply-generation
//! provider under a hard deadline, merges the reply back into the session,
//! and prunes stored history so per-session memory stays bounded.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use heritagebox_types::chat::{ChatMessage, Sender};
use heritagebox_types::error::ChatError;
use heritagebox_types::llm::{CompletionRequest, Message, MessageRole};

use crate::chat::prompt::build_system_prompt;
use crate::llm::provider::LlmProvider;
use crate::pricing::{PricingCache, ProductStore};
use crate::session::store::SessionStore;
use crate::session::{MAX_STORED_MESSAGES, PRUNE_KEEP};

/// Maximum inbound message length after trimming.
pub const MAX_MESSAGE_CHARS: usize = 4000;

/// Sliding window of messages sent to the provider.
pub const CONVERSATION_WINDOW: usize = 10;

/// Hard deadline on the reply-generation call.
pub const REPLY_DEADLINE: Duration = Duration::from_secs(25);

const MAX_REPLY_TOKENS: u32 = 600;

/// Handles one chat turn against the store, provider, and pricing cache.
pub struct ConversationAssembler<S, L, P>
where
    S: SessionStore,
    L: LlmProvider,
    P: ProductStore,
{
    store: Arc<S>,
    provider: L,
    pricing: PricingCache<P>,
    model: String,
    deadline: Duration,
}

impl<S, L, P> ConversationAssembler<S, L, P>
where
    S: SessionStore,
    L: LlmProvider,
    P: ProductStore,
{
    pub fn new(store: Arc<S>, provider: L, pricing: PricingCache<P>, model: String) -> Self {
        Self {
            store,
            provider,
            pricing,
            model,
            deadline: REPLY_DEADLINE,
        }
    }

    /// Override the reply deadline (tests use a short one).
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Handle one inbound chat turn; on success returns the bot reply.
    ///
    /// Validation failures do not mutate the session. A successful turn
    /// appends exactly two messages: the user's, then the bot's.
    pub async fn handle_turn(&self, session_id: &str, message: &str) -> Result<String, ChatError> {
        if session_id.trim().is_empty() {
            return Err(ChatError::InvalidInput("sessionId is required".to_string()));
        }
        let trimmed = message.trim();
        if trimmed.is_empty() {
            return Err(ChatError::InvalidInput(
                "message must not be empty".to_string(),
            ));
        }
        let char_count = trimmed.chars().count();
        if char_count > MAX_MESSAGE_CHARS {
            return Err(ChatError::InvalidInput(format!(
                "message must be at most {MAX_MESSAGE_CHARS} characters"
            )));
        }

        info!(session_id = %session_id, chars = char_count, "chat turn received");

        self.store.get_or_create(session_id).await;
        let user_message = ChatMessage::new(Sender::User, trimmed);
        self.store
            .append_message(session_id, user_message.clone())
            .await;

        // Window over the stored history, including the message just
        // appended. Older messages stay stored but leave the prompt.
        let history = match self.store.get(session_id).await {
            Some(session) => session.messages,
            None => vec![user_message],
        };
        let window: Vec<Message> = history
            .iter()
            .rev()
            .take(CONVERSATION_WINDOW)
            .rev()
            .map(|m| Message {
                role: match m.sender {
                    Sender::User => MessageRole::User,
                    // Agent replies read as assistant turns to the model.
                    Sender::Bot | Sender::Agent => MessageRole::Assistant,
                },
                content: m.content.clone(),
            })
            .collect();

        let prices = self.pricing.current().await;
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: window,
            system: Some(build_system_prompt(&prices)),
            max_tokens: MAX_REPLY_TOKENS,
            temperature: Some(0.7),
        };

        info!(
            session_id = %session_id,
            provider = self.provider.name(),
            model = %self.model,
            window = request.messages.len(),
            "requesting reply"
        );

        let response = match tokio::time::timeout(self.deadline, self.provider.complete(&request))
            .await
        {
            Err(_) => {
                warn!(
                    session_id = %session_id,
                    deadline_s = self.deadline.as_secs(),
                    "reply generation timed out"
                );
                return Err(ChatError::Timeout(self.deadline.as_secs()));
            }
            Ok(Err(err)) => {
                error!(session_id = %session_id, error = %err, "reply generation failed");
                return Err(err.into());
            }
            Ok(Ok(response)) => response,
        };

        let reply = response.content;
        self.store
            .append_message(session_id, ChatMessage::new(Sender::Bot, reply.clone()))
            .await;
        self.store
            .truncate_history(session_id, MAX_STORED_MESSAGES, PRUNE_KEEP)
            .await;

        info!(session_id = %session_id, reply_chars = reply.len(), "chat turn completed");
        Ok(reply)
    }
}
