//! Outgoing HTTP, behind a trait so the pipeline can be driven by scripted
//! responses in tests.

use crate::error::{FluffError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

const DEFAULT_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

/// Status and text body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The two request shapes the app needs: plain GETs for proxies and JSON
/// POSTs for the generation service.
///
/// A non-success status is a normal response, not an error; only transport
/// failures (DNS, TLS, connection reset, timeout) are returned as `Err`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse>;

    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<HttpResponse>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(DEFAULT_UA);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(FluffError::Http)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        debug!(url, "GET");
        let response = self.client.get(url).send().await.map_err(without_url)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(without_url)?;
        Ok(HttpResponse { status, body })
    }

    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<HttpResponse> {
        debug!(url = redact_key(url), "POST");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(without_url)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(without_url)?;
        Ok(HttpResponse { status, body })
    }
}

/// reqwest errors embed the request URL, query string included.
fn without_url(e: reqwest::Error) -> FluffError {
    FluffError::Http(e.without_url())
}

/// Drops the query string so credentials passed as `?key=` never reach logs.
pub(crate) fn redact_key(url: &str) -> &str {
    url.split_once('?').map(|(base, _)| base).unwrap_or(url)
}

/// Percent-encodes a value for use inside a query parameter.
pub fn encode_query_value(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

#[cfg(any(test, feature = "test_utils"))]
pub mod testing {
    //! Scripted transport: responses are queued per URL prefix and every
    //! request is recorded.

    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordedRequest {
        pub method: &'static str,
        pub url: String,
        pub body: Option<serde_json::Value>,
    }

    #[derive(Default)]
    pub struct ScriptedTransport {
        routes: Mutex<Vec<(String, VecDeque<Result<HttpResponse>>)>>,
        requests: Mutex<Vec<RecordedRequest>>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue a response for the next request whose URL starts with `prefix`.
        pub fn respond(self, prefix: &str, response: HttpResponse) -> Self {
            self.push(prefix, Ok(response));
            self
        }

        /// Queue a transport failure for the next matching request.
        pub fn fail(self, prefix: &str, message: &str) -> Self {
            self.push(prefix, Err(FluffError::Api(message.to_string())));
            self
        }

        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().unwrap().clone()
        }

        fn push(&self, prefix: &str, outcome: Result<HttpResponse>) {
            let mut routes = self.routes.lock().unwrap();
            match routes.iter_mut().find(|(p, _)| p == prefix) {
                Some((_, queue)) => queue.push_back(outcome),
                None => routes.push((prefix.to_string(), VecDeque::from([outcome]))),
            }
        }

        fn next(&self, method: &'static str, url: &str, body: Option<serde_json::Value>) -> Result<HttpResponse> {
            self.requests.lock().unwrap().push(RecordedRequest {
                method,
                url: url.to_string(),
                body,
            });
            let mut routes = self.routes.lock().unwrap();
            routes
                .iter_mut()
                .find(|(p, _)| url.starts_with(p.as_str()))
                .and_then(|(_, queue)| queue.pop_front())
                .unwrap_or_else(|| Err(FluffError::Api(format!("no scripted response for {}", url))))
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn get(&self, url: &str) -> Result<HttpResponse> {
            self.next("GET", url, None)
        }

        async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<HttpResponse> {
            self.next("POST", url, Some(body.clone()))
        }
    }
}
