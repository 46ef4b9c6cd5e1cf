//! The external text-generation service.

use crate::config::AppConfig;
use crate::error::PipelineError;
use crate::http::{encode_query_value, HttpTransport};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// One instruction in, one block of generated text out.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Returns the generated text, or [`PipelineError::EmptyResponse`] when
    /// the service answered without any.
    async fn generate(&self, api_key: &str, instruction: &str) -> Result<String, PipelineError>;
}

/// Gemini `generateContent` over any [`HttpTransport`].
pub struct GeminiClient<T: HttpTransport> {
    transport: T,
    endpoint: String,
    model: String,
}

impl<T: HttpTransport> GeminiClient<T> {
    pub fn new(transport: T, endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    pub fn from_config(transport: T, config: &AppConfig) -> Self {
        Self::new(transport, config.endpoint.clone(), config.model.clone())
    }

    fn url(&self, api_key: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint.trim_end_matches('/'),
            self.model,
            encode_query_value(api_key)
        )
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Pulls `candidates[0].content.parts[0].text` out of a response body.
/// Error envelopes and unparseable bodies have no such field.
fn first_candidate_text(body: &str) -> Option<String> {
    let response: GenerateResponse = serde_json::from_str(body).ok()?;
    response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .next()?
        .text
        .filter(|t| !t.trim().is_empty())
}

/// Error text from any transport must not repeat the key it was sent with.
fn scrub_key(message: &str, api_key: &str) -> String {
    if api_key.is_empty() {
        return message.to_string();
    }
    message
        .replace(&encode_query_value(api_key), "***")
        .replace(api_key, "***")
}

#[async_trait]
impl<T: HttpTransport> GenerationService for GeminiClient<T> {
    async fn generate(&self, api_key: &str, instruction: &str) -> Result<String, PipelineError> {
        let body = json!({ "contents": [{ "parts": [{ "text": instruction }] }] });

        let response = self
            .transport
            .post_json(&self.url(api_key), &body)
            .await
            .map_err(|e| PipelineError::Transport(scrub_key(&e.to_string(), api_key)))?;

        debug!(
            status = response.status,
            bytes = response.body.len(),
            "generation service answered"
        );

        first_candidate_text(&response.body).ok_or(PipelineError::EmptyResponse)
    }
}

#[cfg(any(test, feature = "test_utils"))]
pub mod testing {
    //! Canned generation service that records the instructions it receives.

    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    #[derive(Default)]
    pub struct ScriptedGenerator {
        replies: Mutex<VecDeque<Result<String, PipelineError>>>,
        instructions: Mutex<Vec<String>>,
        gate: Option<std::sync::Arc<Notify>>,
    }

    impl ScriptedGenerator {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(self, text: &str) -> Self {
            self.replies.lock().unwrap().push_back(Ok(text.to_string()));
            self
        }

        pub fn fail(self, error: PipelineError) -> Self {
            self.replies.lock().unwrap().push_back(Err(error));
            self
        }

        /// Every call waits for a notification on `gate` before answering.
        pub fn gated(mut self, gate: std::sync::Arc<Notify>) -> Self {
            self.gate = Some(gate);
            self
        }

        pub fn instructions(&self) -> Vec<String> {
            self.instructions.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GenerationService for ScriptedGenerator {
        async fn generate(&self, _api_key: &str, instruction: &str) -> Result<String, PipelineError> {
            self.instructions.lock().unwrap().push(instruction.to_string());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(PipelineError::EmptyResponse))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::ScriptedTransport;
    use crate::http::HttpResponse;

    const ENDPOINT: &str = "https://gen.test/v1beta";

    fn client(transport: ScriptedTransport) -> GeminiClient<ScriptedTransport> {
        GeminiClient::new(transport, ENDPOINT, "gemini-test")
    }

    #[tokio::test]
    async fn posts_instruction_envelope_and_reads_first_part() {
        let transport = ScriptedTransport::new().respond(
            ENDPOINT,
            HttpResponse::new(
                200,
                r#"{"candidates":[{"content":{"parts":[{"text":"{\"title\":\"Soup\"}"}]}}]}"#,
            ),
        );
        let client = client(transport);

        let text = client.generate("k e y", "make soup").await.unwrap();
        assert_eq!(text, r#"{"title":"Soup"}"#);

        let requests = client.transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(
            requests[0].url,
            "https://gen.test/v1beta/models/gemini-test:generateContent?key=k+e+y"
        );
        assert_eq!(
            requests[0].body.as_ref().unwrap()["contents"][0]["parts"][0]["text"],
            "make soup"
        );
    }

    #[tokio::test]
    async fn error_envelope_is_empty_response() {
        let transport = ScriptedTransport::new().respond(
            ENDPOINT,
            HttpResponse::new(400, r#"{"error":{"code":400,"message":"API key not valid"}}"#),
        );
        assert_eq!(
            client(transport).generate("bad", "x").await,
            Err(PipelineError::EmptyResponse)
        );
    }

    #[tokio::test]
    async fn candidate_without_content_is_empty_response() {
        let transport = ScriptedTransport::new().respond(
            ENDPOINT,
            HttpResponse::new(200, r#"{"candidates":[{"finishReason":"SAFETY"}]}"#),
        );
        assert_eq!(
            client(transport).generate("k", "x").await,
            Err(PipelineError::EmptyResponse)
        );
    }

    #[tokio::test]
    async fn transport_failure_never_shows_the_key() {
        let transport = ScriptedTransport::new().fail(
            ENDPOINT,
            "error sending request for url (https://gen.test/v1beta/models/gemini-test:generateContent?key=SUPER+SECRET)",
        );
        let err = client(transport).generate("SUPER SECRET", "x").await.unwrap_err();

        let PipelineError::Transport(message) = err else {
            panic!("expected a transport error, got {:?}", err);
        };
        assert!(!message.contains("SUPER"));
        assert!(message.contains("key=***"));
    }

    #[tokio::test]
    async fn unreachable_service_error_hides_the_key() {
        let transport = crate::http::ReqwestTransport::new(None).unwrap();
        let client = GeminiClient::new(transport, "http://127.0.0.1:1/v1beta", "m");

        let err = client.generate("SUPERSECRETKEY", "x").await.unwrap_err();

        assert!(matches!(err, PipelineError::Transport(_)));
        assert!(!err.to_string().contains("SUPERSECRETKEY"));
    }

    #[tokio::test]
    async fn transport_failure_is_reported() {
        let transport = ScriptedTransport::new().fail(ENDPOINT, "dns failure");
        assert!(matches!(
            client(transport).generate("k", "x").await,
            Err(PipelineError::Transport(_))
        ));
    }
}
