//! Session manager: the per-turn pipeline around a backend call.
//!
//! `handle_turn` loads the stored history, appends the user message, asks the
//! backend for a reply, appends it, trims to the window and writes the result
//! back with a fresh TTL. It is the only code that mutates conversations.
//!
//! Load -> mutate -> persist is not atomic. Two concurrent turns on the same
//! key both read the same history and the later write wins.

use std::time::Duration;

use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use chatrelay_types::chat::{Conversation, Message, SessionKey};
use chatrelay_types::config::{GenerationConfig, RelayConfig, SessionConfig};
use chatrelay_types::error::{RepositoryError, TurnError};
use chatrelay_types::llm::{InferenceRequest, LlmError};

use crate::llm::backend::InferenceBackend;
use crate::store::session_store::SessionStore;

use super::bounds::{trim_history, truncate_message};
use super::codec;

/// Orchestrates chat turns against a session store and an inference backend.
///
/// Generic over `SessionStore` and `InferenceBackend` to maintain clean
/// architecture (chatrelay-core never depends on chatrelay-infra).
pub struct SessionManager<S: SessionStore, B: InferenceBackend> {
    store: S,
    backend: B,
    session: SessionConfig,
    generation: GenerationConfig,
}

impl<S: SessionStore, B: InferenceBackend> SessionManager<S, B> {
    /// Create a session manager with the session and generation settings
    /// taken from `config`.
    pub fn new(store: S, backend: B, config: &RelayConfig) -> Self {
        Self {
            store,
            backend,
            session: config.session.clone(),
            generation: config.generation.clone(),
        }
    }

    /// Access the session store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Access the inference backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Store key for a caller-supplied session id.
    pub fn session_key(&self, session_id: Option<&str>) -> SessionKey {
        SessionKey::derive(&self.session.key_prefix, &self.session.anonymous_id, session_id)
    }

    /// Load the conversation stored under `key`.
    ///
    /// Missing or undecodable history starts a fresh conversation with the
    /// persona system message; only a store failure is an error.
    pub async fn load(&self, key: &SessionKey) -> Result<Conversation, RepositoryError> {
        let raw = self.store.get(key.as_str()).await?;
        let found = raw.is_some();

        let conversation = match codec::decode(raw.as_deref(), &self.session.system_prompt) {
            Ok(conversation) => conversation,
            Err(e) => {
                warn!(session_key = %key, error = %e, "Discarding unreadable session history");
                Conversation::with_system_prompt(&self.session.system_prompt)
            }
        };

        debug!(session_key = %key, found, history_len = conversation.len(), "Loaded session history");
        Ok(conversation)
    }

    /// Run one chat turn and return the assistant's reply.
    ///
    /// A backend failure (including a timeout) fails the turn before
    /// anything is written. An unrecognized backend reply is not a failure:
    /// the placeholder text is returned and persisted instead.
    pub async fn handle_turn(
        &self,
        session_id: Option<&str>,
        user_message: &str,
    ) -> Result<String, TurnError> {
        let key = self.session_key(session_id);
        let span = info_span!(
            "chat",
            turn_id = %Uuid::now_v7(),
            session_key = %key,
            gen_ai.operation.name = "chat",
            gen_ai.provider.name = self.backend.name(),
            gen_ai.request.model = %self.generation.model,
            gen_ai.request.max_tokens = self.generation.max_output_tokens,
            gen_ai.request.temperature = self.generation.temperature,
        );

        self.run_turn(key, user_message).instrument(span).await
    }

    async fn run_turn(&self, key: SessionKey, user_message: &str) -> Result<String, TurnError> {
        let user_message = truncate_message(user_message, self.session.max_message_chars);

        let mut conversation = self.load(&key).await?;
        conversation.push(Message::user(user_message));

        let reply = match self.generate(&conversation).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Backend call failed; session left unchanged");
                return Err(e.into());
            }
        };

        conversation.push(Message::assistant(reply.clone()));
        let conversation = trim_history(
            conversation,
            self.session.window_size,
            self.session.trim_policy,
        );

        let encoded = codec::encode(&conversation)?;
        self.store
            .put(key.as_str(), &encoded, Duration::from_secs(self.session.ttl_secs))
            .await?;

        info!(history_len = conversation.len(), reply_len = reply.len(), "Turn persisted");
        Ok(reply)
    }

    /// Call the backend with the full history and resolve the reply text.
    async fn generate(&self, conversation: &Conversation) -> Result<String, LlmError> {
        let request = InferenceRequest {
            model: self.generation.model.clone(),
            messages: conversation.messages().to_vec(),
            stream: false,
            max_tokens: self.generation.max_output_tokens,
            temperature: self.generation.temperature,
        };

        let secs = self.generation.timeout_secs;
        let response = tokio::time::timeout(Duration::from_secs(secs), self.backend.run(&request))
            .await
            .map_err(|_| LlmError::Timeout { secs })??;

        if !response.is_recognized() {
            warn!(
                placeholder = %self.generation.placeholder_reply,
                "Backend returned an unrecognized response shape"
            );
        }

        Ok(response.into_reply(&self.generation.placeholder_reply))
    }
}
