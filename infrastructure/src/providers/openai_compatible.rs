//! OpenAI-compatible chat-completion client
//!
//! Talks to any backend exposing `POST {base_url}/chat/completions`
//! (DashScope compatible mode, OpenAI, local servers). Streaming uses
//! server-sent events terminated by `data: [DONE]`.

use super::sse::SseDecoder;
use crate::config::FileModelConfig;
use async_trait::async_trait;
use code_helper_application::{ChatModel, ChunkStream, GatewayError};
use code_helper_domain::Message;
use futures::StreamExt;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Chat model adapter for OpenAI-style HTTP APIs
#[derive(Clone)]
pub struct OpenAiCompatibleChatModel {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl std::fmt::Debug for OpenAiCompatibleChatModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatibleChatModel")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OpenAiCompatibleChatModel {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, GatewayError> {
        Self::with_connect_timeout(base_url, model, api_key, Duration::from_secs(10))
    }

    fn with_connect_timeout(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        connect_timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            temperature: None,
            max_tokens: None,
        })
    }

    /// Build the adapter from the `[ai.model]` section.
    ///
    /// Fails with [`GatewayError::MissingApiKey`] when neither `api-key` nor
    /// the `api-key-env` variable provides a key.
    pub fn from_config(config: &FileModelConfig) -> Result<Self, GatewayError> {
        let api_key = config
            .resolve_api_key()
            .ok_or_else(|| GatewayError::MissingApiKey(config.api_key_env.clone()))?;

        let mut model = Self::with_connect_timeout(
            &config.base_url,
            &config.model_name,
            api_key,
            Duration::from_secs(config.connect_timeout_secs.max(1)),
        )?;
        model.temperature = config.temperature;
        model.max_tokens = config.max_tokens;

        info!(model = %model.model, base_url = %model.base_url, "Chat model configured");
        Ok(model)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn request_body(&self, messages: &[Message], stream: bool) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role().as_str(),
                    content: m.content().to_string(),
                })
                .collect(),
            stream,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamResponse {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
}

#[derive(Debug, Default, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Outcome of one `data:` payload
#[derive(Debug, PartialEq)]
enum StreamEvent {
    Fragment(String),
    Done,
    Skip,
    Error(String),
}

fn parse_stream_data(data: &str) -> StreamEvent {
    let data = data.trim();
    if data == "[DONE]" {
        return StreamEvent::Done;
    }
    if data.is_empty() {
        return StreamEvent::Skip;
    }

    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(data) {
        return StreamEvent::Error(envelope.error.message);
    }

    match serde_json::from_str::<StreamResponse>(data) {
        Ok(parsed) => {
            let text: String = parsed
                .choices
                .into_iter()
                .filter_map(|c| c.delta.content)
                .collect();
            if text.is_empty() {
                StreamEvent::Skip
            } else {
                StreamEvent::Fragment(text)
            }
        }
        Err(e) => {
            debug!(error = %e, data = %data, "Malformed stream event");
            StreamEvent::Error(format!("malformed stream event: {}", e))
        }
    }
}

fn map_send_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::ConnectionError(error.to_string())
    }
}

/// Turn a non-2xx response into [`GatewayError::RequestFailed`], preferring
/// the backend's own `{"error": {"message": ...}}` text.
async fn status_error(response: Response) -> GatewayError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| {
            if body.trim().is_empty() {
                "empty response body".to_string()
            } else {
                body
            }
        });
    GatewayError::RequestFailed { status, message }
}

#[async_trait]
impl ChatModel for OpenAiCompatibleChatModel {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn chat(&self, messages: &[Message]) -> Result<String, GatewayError> {
        let body = self.request_body(messages, false);
        debug!(model = %self.model, messages = messages.len(), "Sending chat request");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_send_error)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.unwrap_or_default())
            .ok_or_else(|| GatewayError::InvalidResponse("response has no choices".to_string()))
    }

    fn chat_stream(&self, messages: Vec<Message>) -> ChunkStream {
        let client = self.client.clone();
        let endpoint = self.endpoint();
        let api_key = self.api_key.clone();
        let body = self.request_body(&messages, true);
        let model = self.model.clone();

        Box::pin(async_stream::stream! {
            debug!(model = %model, messages = body.messages.len(), "Opening chat stream");

            let response = match client
                .post(&endpoint)
                .bearer_auth(&api_key)
                .json(&body)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(e) => {
                    yield Err(map_send_error(e));
                    return;
                }
            };

            if !response.status().is_success() {
                yield Err(status_error(response).await);
                return;
            }

            let mut byte_stream = response.bytes_stream();
            let mut decoder = SseDecoder::new();

            while let Some(chunk_result) = byte_stream.next().await {
                let chunk = match chunk_result {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        yield Err(GatewayError::ConnectionError(format!("Stream error: {}", e)));
                        return;
                    }
                };

                for data in decoder.feed(&chunk) {
                    match parse_stream_data(&data) {
                        StreamEvent::Fragment(text) => yield Ok(text),
                        StreamEvent::Done => return,
                        StreamEvent::Skip => {}
                        StreamEvent::Error(message) => {
                            yield Err(GatewayError::InvalidResponse(message));
                            return;
                        }
                    }
                }
            }

            // A final event may lack its trailing blank line
            if let Some(data) = decoder.finish() {
                match parse_stream_data(&data) {
                    StreamEvent::Fragment(text) => yield Ok(text),
                    StreamEvent::Done => return,
                    StreamEvent::Skip => {}
                    StreamEvent::Error(message) => {
                        yield Err(GatewayError::InvalidResponse(message));
                        return;
                    }
                }
            }

            // Without the terminator the reply is incomplete
            yield Err(GatewayError::ConnectionError(
                "stream ended before [DONE]".to_string(),
            ));
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use code_helper_application::collect_chunks;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sse_body(fragments: &[&str]) -> String {
        let mut body = String::new();
        for fragment in fragments {
            let event = serde_json::json!({
                "choices": [{ "index": 0, "delta": { "content": fragment } }]
            });
            body.push_str(&format!("data: {}\n\n", event));
        }
        body.push_str("data: [DONE]\n\n");
        body
    }

    fn conversation() -> Vec<Message> {
        vec![
            Message::system("You are a coding tutor."),
            Message::user("What is a borrow?"),
        ]
    }

    #[test]
    fn test_parse_stream_data() {
        assert_eq!(parse_stream_data("[DONE]"), StreamEvent::Done);
        assert_eq!(parse_stream_data(" "), StreamEvent::Skip);
        assert!(matches!(
            parse_stream_data("{not json"),
            StreamEvent::Error(_)
        ));
        assert_eq!(
            parse_stream_data(r#"{"choices":[{"delta":{"role":"assistant"}}]}"#),
            StreamEvent::Skip
        );
        assert_eq!(
            parse_stream_data(r#"{"choices":[{"delta":{"content":"Hi"}}]}"#),
            StreamEvent::Fragment("Hi".to_string())
        );
        assert_eq!(
            parse_stream_data(r#"{"error":{"message":"quota exceeded"}}"#),
            StreamEvent::Error("quota exceeded".to_string())
        );
    }

    #[test]
    fn test_request_body_shape() {
        let model = OpenAiCompatibleChatModel::new("http://localhost/v1/", "qwen-max", "k")
            .unwrap()
            .with_temperature(0.3);
        assert_eq!(model.endpoint(), "http://localhost/v1/chat/completions");

        let body = serde_json::to_value(model.request_body(&conversation(), true)).unwrap();
        assert_eq!(body["model"], "qwen-max");
        assert_eq!(body["stream"], true);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "What is a borrow?");
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn test_from_config_requires_api_key() {
        let config = FileModelConfig {
            api_key: None,
            api_key_env: "AI_CODE_HELPER_TEST_UNSET_KEY".to_string(),
            ..Default::default()
        };
        let err = OpenAiCompatibleChatModel::from_config(&config).unwrap_err();
        assert_eq!(
            err,
            GatewayError::MissingApiKey("AI_CODE_HELPER_TEST_UNSET_KEY".to_string())
        );
    }

    #[tokio::test]
    async fn test_chat_stream_yields_fragments_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({ "stream": true })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(sse_body(&["A borrow ", "is a ", "reference."])),
            )
            .mount(&server)
            .await;

        let model = OpenAiCompatibleChatModel::new(
            format!("{}/v1", server.uri()),
            "qwen-max",
            "test-key",
        )
        .unwrap();

        let fragments: Vec<String> = model
            .chat_stream(conversation())
            .map(|r| r.unwrap())
            .collect()
            .await;
        assert_eq!(fragments, vec!["A borrow ", "is a ", "reference."]);
    }

    #[tokio::test]
    async fn test_chat_stream_surfaces_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": { "message": "Invalid API key" }
            })))
            .mount(&server)
            .await;

        let model =
            OpenAiCompatibleChatModel::new(format!("{}/v1", server.uri()), "qwen-max", "bad")
                .unwrap();

        let err = collect_chunks(model.chat_stream(conversation()))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GatewayError::RequestFailed {
                status: 401,
                message: "Invalid API key".to_string()
            }
        );
    }

    async fn stream_server(body: String) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(body),
            )
            .mount(&server)
            .await;
        server
    }

    fn fragment_event(text: &str) -> String {
        let event = serde_json::json!({ "choices": [{ "delta": { "content": text } }] });
        format!("data: {}\n\n", event)
    }

    #[tokio::test]
    async fn test_body_without_done_is_an_error() {
        let body = format!("{}{}", fragment_event("Half an "), fragment_event("answer"));
        let server = stream_server(body).await;
        let model =
            OpenAiCompatibleChatModel::new(format!("{}/v1", server.uri()), "qwen-max", "k")
                .unwrap();

        let items: Vec<_> = model.chat_stream(conversation()).collect().await;
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], Ok("Half an ".to_string()));
        assert_eq!(items[1], Ok("answer".to_string()));
        assert_eq!(
            items[2],
            Err(GatewayError::ConnectionError(
                "stream ended before [DONE]".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_malformed_event_is_an_error() {
        let body = format!(
            "{}data: {{\"choices\": [{{\"delta\"\n\n{}data: [DONE]\n\n",
            fragment_event("Half an "),
            fragment_event("wer")
        );
        let server = stream_server(body).await;
        let model =
            OpenAiCompatibleChatModel::new(format!("{}/v1", server.uri()), "qwen-max", "k")
                .unwrap();

        let err = collect_chunks(model.chat_stream(conversation()))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_truncated_stream_leaves_history_unchanged() {
        use crate::memory::InMemoryChatMemory;
        use code_helper_application::{ChatConfig, ChatSessionService, InlineSystemPrompt};
        use code_helper_domain::ConversationId;

        let server = stream_server(fragment_event("Half an ")).await;
        let model =
            OpenAiCompatibleChatModel::new(format!("{}/v1", server.uri()), "qwen-max", "k")
                .unwrap();
        let service = ChatSessionService::new(
            std::sync::Arc::new(model),
            std::sync::Arc::new(InMemoryChatMemory::new(10, 8).unwrap()),
            &InlineSystemPrompt::new("You are a coding tutor."),
            ChatConfig::default(),
        )
        .unwrap();
        let id = ConversationId::new(1);

        assert!(service.chat(id, "What is a borrow?").await.is_err());
        assert!(service.history(id).await.is_empty());
    }

    #[tokio::test]
    async fn test_done_without_trailing_blank_line_completes() {
        let body = format!("{}data: [DONE]", fragment_event("Complete."));
        let server = stream_server(body).await;
        let model =
            OpenAiCompatibleChatModel::new(format!("{}/v1", server.uri()), "qwen-max", "k")
                .unwrap();

        let reply = collect_chunks(model.chat_stream(conversation()))
            .await
            .unwrap();
        assert_eq!(reply, "Complete.");
    }

    #[tokio::test]
    async fn test_chat_returns_full_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(serde_json::json!({ "stream": false })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{
                    "index": 0,
                    "message": { "role": "assistant", "content": "Ownership moves." }
                }]
            })))
            .mount(&server)
            .await;

        let model =
            OpenAiCompatibleChatModel::new(format!("{}/v1", server.uri()), "qwen-max", "k")
                .unwrap();

        let reply = model.chat(&conversation()).await.unwrap();
        assert_eq!(reply, "Ownership moves.");
    }

    #[tokio::test]
    async fn test_connection_refused_is_connection_error() {
        // Nothing listens on port 9 (discard) in the test environment
        let model = OpenAiCompatibleChatModel::new("http://127.0.0.1:9/v1", "qwen-max", "k")
            .unwrap();
        let err = collect_chunks(model.chat_stream(conversation()))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::ConnectionError(_)));
    }
}
