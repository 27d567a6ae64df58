//! Configuration types for the chat relay.
//!
//! `RelayConfig` represents the top-level `relay.toml` that controls the
//! history window, generation parameters, the inference backend and the
//! session store. Every field has a default so an empty file is valid.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::llm::BackendKind;

/// Persona prompt synthesized as the first message of every new conversation.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful, conversational AI assistant. \
Answer all questions directly without being preachy or judgmental. Keep responses concise \
but complete - finish your thoughts. Use a casual, friendly tone.";

/// Top-level relay configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

impl RelayConfig {
    /// Reject values that would break the turn pipeline's invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.session;
        if s.window_size == 0 {
            return Err(ConfigError::Invalid {
                field: "session.window_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if s.trim_policy == TrimPolicy::PreserveSystem && s.window_size < 2 {
            return Err(ConfigError::Invalid {
                field: "session.window_size",
                reason: "must be at least 2 when trim_policy is preserve_system".to_string(),
            });
        }
        if s.max_message_chars == 0 {
            return Err(ConfigError::Invalid {
                field: "session.max_message_chars",
                reason: "must be at least 1".to_string(),
            });
        }
        if s.ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "session.ttl_secs",
                reason: "must be at least 1".to_string(),
            });
        }

        let g = &self.generation;
        if g.max_output_tokens == 0 {
            return Err(ConfigError::Invalid {
                field: "generation.max_output_tokens",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(0.0..=5.0).contains(&g.temperature) {
            return Err(ConfigError::Invalid {
                field: "generation.temperature",
                reason: format!("{} is outside 0.0..=5.0", g.temperature),
            });
        }
        Ok(())
    }
}

/// How the history window treats the opening system message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrimPolicy {
    /// Keep the last `window_size` entries, whatever their role.
    #[default]
    Raw,
    /// Keep a leading system message, fill the rest with the most recent entries.
    PreserveSystem,
}

/// History window and session key settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum number of messages kept after each turn.
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// User input longer than this many characters is truncated.
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,

    /// Expiry applied (and reset) on every write.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Identifier used when the caller supplies none.
    #[serde(default = "default_anonymous_id")]
    pub anonymous_id: String,

    #[serde(default)]
    pub trim_policy: TrimPolicy,

    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

fn default_window_size() -> usize {
    10
}

fn default_max_message_chars() -> usize {
    4000
}

fn default_ttl_secs() -> u64 {
    60 * 60 * 24
}

fn default_key_prefix() -> String {
    "sess:".to_string()
}

fn default_anonymous_id() -> String {
    "anon".to_string()
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            max_message_chars: default_max_message_chars(),
            ttl_secs: default_ttl_secs(),
            key_prefix: default_key_prefix(),
            anonymous_id: default_anonymous_id(),
            trim_policy: TrimPolicy::default(),
            system_prompt: default_system_prompt(),
        }
    }
}

/// Fixed generation parameters sent with every backend call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Upper bound on a single backend call; expiry fails the turn.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Reply used when the backend answers with an unrecognized shape.
    #[serde(default = "default_placeholder_reply")]
    pub placeholder_reply: String,
}

fn default_model() -> String {
    "@cf/mistral/mistral-7b-instruct-v0.1".to_string()
}

fn default_max_output_tokens() -> u32 {
    400
}

fn default_temperature() -> f64 {
    0.7
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_placeholder_reply() -> String {
    "(no response)".to_string()
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_output_tokens: default_max_output_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            placeholder_reply: default_placeholder_reply(),
        }
    }
}

/// Which inference backend to call and how to reach it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_kind")]
    pub kind: BackendKind,

    /// Override the default base URL for the backend.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Cloudflare account id (Workers AI only).
    #[serde(default)]
    pub account_id: Option<String>,

    /// Name of the environment variable holding the API token.
    #[serde(default = "default_api_token_env")]
    pub api_token_env: String,
}

fn default_backend_kind() -> BackendKind {
    BackendKind::WorkersAi
}

fn default_api_token_env() -> String {
    "RELAY_API_TOKEN".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: default_backend_kind(),
            base_url: None,
            account_id: None,
            api_token_env: default_api_token_env(),
        }
    }
}

/// Kind of durable session store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    #[default]
    Sqlite,
    Memory,
}

/// Session store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub kind: StoreKind,

    /// SQLite URL; defaults to `{data_dir}/sessions.db` when unset.
    #[serde(default)]
    pub database_url: Option<String>,

    /// How often expired sessions are purged by the server.
    #[serde(default = "default_purge_interval_secs")]
    pub purge_interval_secs: u64,
}

fn default_purge_interval_secs() -> u64 {
    300
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            kind: StoreKind::default(),
            database_url: None,
            purge_interval_secs: default_purge_interval_secs(),
        }
    }
}
