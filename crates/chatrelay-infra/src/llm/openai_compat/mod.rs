//! OpenAI-compatible inference backend.
//!
//! Talks to any server that speaks the chat completions protocol (OpenAI,
//! vLLM, llama.cpp server, Ollama's `/v1`, ...) via [`async_openai`].

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
};
use secrecy::{ExposeSecret, SecretString};

use chatrelay_core::llm::backend::InferenceBackend;
use chatrelay_types::llm::{BackendResponse, InferenceRequest, LlmError, Message, MessageRole};

/// Default base URL when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Backend for OpenAI-compatible chat completion servers.
///
/// Does not derive Debug: the `async_openai::Client` holds the API key.
pub struct OpenAiCompatibleBackend {
    client: Client<OpenAIConfig>,
}

impl OpenAiCompatibleBackend {
    /// Create a backend for `base_url`. Local servers often need no key.
    pub fn new(base_url: &str, api_key: Option<&SecretString>) -> Self {
        let mut config = OpenAIConfig::new().with_api_base(base_url);
        if let Some(key) = api_key {
            config = config.with_api_key(key.expose_secret());
        }

        Self {
            client: Client::with_config(config),
        }
    }

    fn build_request(request: &InferenceRequest) -> CreateChatCompletionRequest {
        CreateChatCompletionRequest {
            model: request.model.clone(),
            messages: request.messages.iter().map(to_openai_message).collect(),
            max_completion_tokens: Some(request.max_tokens),
            temperature: Some(request.temperature as f32),
            ..Default::default()
        }
    }
}

fn to_openai_message(msg: &Message) -> ChatCompletionRequestMessage {
    match msg.role {
        MessageRole::System => {
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                content: ChatCompletionRequestSystemMessageContent::Text(msg.content.clone()),
                name: None,
            })
        }
        MessageRole::User => ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
            content: ChatCompletionRequestUserMessageContent::Text(msg.content.clone()),
            name: None,
        }),
        MessageRole::Assistant => {
            #[allow(deprecated)]
            ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                    msg.content.clone(),
                )),
                refusal: None,
                name: None,
                audio: None,
                tool_calls: None,
                function_call: None,
            })
        }
    }
}

impl InferenceBackend for OpenAiCompatibleBackend {
    fn name(&self) -> &str {
        "openai_compatible"
    }

    async fn run(&self, request: &InferenceRequest) -> Result<BackendResponse, LlmError> {
        let oai_request = Self::build_request(request);

        let response = self
            .client
            .chat()
            .create(oai_request)
            .await
            .map_err(map_openai_error)?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content);

        Ok(match content {
            Some(text) => BackendResponse::Text(text),
            None => BackendResponse::Unrecognized,
        })
    }
}

/// Map an `async_openai::error::OpenAIError` to an [`LlmError`].
fn map_openai_error(err: async_openai::error::OpenAIError) -> LlmError {
    use async_openai::error::OpenAIError;

    match &err {
        OpenAIError::ApiError(api_err) => {
            let code = api_err.code.as_deref().unwrap_or("");
            let error_type = api_err.r#type.as_deref().unwrap_or("");

            if code == "invalid_api_key"
                || code == "authentication_error"
                || error_type == "authentication_error"
                || api_err.message.contains("Incorrect API key")
                || api_err.message.contains("Invalid API key")
            {
                LlmError::AuthenticationFailed
            } else if code == "rate_limit_exceeded" || error_type == "rate_limit_error" {
                LlmError::RateLimited {
                    retry_after_ms: None,
                }
            } else {
                LlmError::Provider {
                    message: err.to_string(),
                }
            }
        }
        OpenAIError::Reqwest(reqwest_err) => match reqwest_err.status().map(|s| s.as_u16()) {
            Some(401 | 403) => LlmError::AuthenticationFailed,
            Some(429) => LlmError::RateLimited {
                retry_after_ms: None,
            },
            _ => LlmError::Provider {
                message: err.to_string(),
            },
        },
        OpenAIError::JSONDeserialize(_, content) => {
            LlmError::Deserialization(format!("failed to parse response: {content}"))
        }
        OpenAIError::InvalidArgument(msg) => LlmError::InvalidRequest(msg.clone()),
        _ => LlmError::Provider {
            message: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> InferenceRequest {
        InferenceRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![
                Message::system("sys"),
                Message::user("hello"),
                Message::assistant("hi"),
                Message::user("again"),
            ],
            stream: false,
            max_tokens: 400,
            temperature: 0.7,
        }
    }

    fn completion(content: serde_json::Value) -> serde_json::Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1_700_000_000,
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop",
                "logprobs": null
            }],
            "usage": {"prompt_tokens": 5, "completion_tokens": 2, "total_tokens": 7}
        })
    }

    #[test]
    fn test_build_request_maps_roles_and_params() {
        let req = OpenAiCompatibleBackend::build_request(&request());
        assert_eq!(req.model, "gpt-4o-mini");
        assert_eq!(req.max_completion_tokens, Some(400));
        assert_eq!(req.messages.len(), 4);
        assert!(matches!(req.messages[0], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(req.messages[1], ChatCompletionRequestMessage::User(_)));
        assert!(matches!(req.messages[2], ChatCompletionRequestMessage::Assistant(_)));
        assert!(matches!(req.messages[3], ChatCompletionRequestMessage::User(_)));
    }

    #[tokio::test]
    async fn test_run_returns_first_choice_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!("hey"))))
            .mount(&server)
            .await;

        let key = SecretString::from("sk-test".to_string());
        let backend = OpenAiCompatibleBackend::new(&server.uri(), Some(&key));
        let resp = backend.run(&request()).await.unwrap();
        assert_eq!(resp, BackendResponse::Text("hey".into()));
    }

    #[tokio::test]
    async fn test_run_null_content_is_unrecognized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!(null))))
            .mount(&server)
            .await;

        let backend = OpenAiCompatibleBackend::new(&server.uri(), None);
        let resp = backend.run(&request()).await.unwrap();
        assert_eq!(resp, BackendResponse::Unrecognized);
    }

    #[tokio::test]
    async fn test_run_bad_key_is_authentication_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {
                    "message": "Incorrect API key provided",
                    "type": "invalid_request_error",
                    "param": null,
                    "code": "invalid_api_key"
                }
            })))
            .mount(&server)
            .await;

        let key = SecretString::from("sk-wrong".to_string());
        let backend = OpenAiCompatibleBackend::new(&server.uri(), Some(&key));
        let err = backend.run(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::AuthenticationFailed), "got {err:?}");
    }

    #[test]
    fn test_backend_name() {
        let backend = OpenAiCompatibleBackend::new(DEFAULT_BASE_URL, None);
        assert_eq!(backend.name(), "openai_compatible");
    }
}
