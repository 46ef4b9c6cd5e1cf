//! Remote page retrieval through proxy services.
//!
//! Pages are pulled through third-party proxies. Strategies are tried in
//! order, exactly once each. A failing strategy is logged and skipped; when all of
//! them fail the caller gets `None` and carries on with a degraded input.

use crate::config::AppConfig;
use crate::error::Result;
use crate::http::{encode_query_value, HttpTransport};
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyStrategy {
    /// Returns the target page body verbatim.
    Passthrough { prefix: String },
    /// Returns a JSON envelope with the page in its `contents` field.
    Wrapping { prefix: String },
}

impl ProxyStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            ProxyStrategy::Passthrough { .. } => "passthrough proxy",
            ProxyStrategy::Wrapping { .. } => "wrapping proxy",
        }
    }

    pub fn request_url(&self, target: &str) -> String {
        let prefix = match self {
            ProxyStrategy::Passthrough { prefix } | ProxyStrategy::Wrapping { prefix } => prefix,
        };
        format!("{}{}", prefix, encode_query_value(target))
    }

    /// The configured chain, in the order it is tried.
    pub fn chain(config: &AppConfig) -> Vec<ProxyStrategy> {
        vec![
            ProxyStrategy::Passthrough {
                prefix: config.passthrough_proxy.clone(),
            },
            ProxyStrategy::Wrapping {
                prefix: config.wrapping_proxy.clone(),
            },
        ]
    }

    async fn attempt<T: HttpTransport + ?Sized>(
        &self,
        transport: &T,
        target: &str,
    ) -> Result<Option<String>> {
        let response = transport.get(&self.request_url(target)).await?;
        match self {
            ProxyStrategy::Passthrough { .. } => {
                if response.is_success() {
                    Ok(Some(response.body))
                } else {
                    debug!(status = response.status, "passthrough proxy refused");
                    Ok(None)
                }
            }
            ProxyStrategy::Wrapping { .. } => {
                let envelope: WrappedPage = serde_json::from_str(&response.body)?;
                Ok(envelope.contents)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct WrappedPage {
    #[serde(default)]
    contents: Option<String>,
}

/// Fetches `url` through each strategy in turn. Never fails: total failure is
/// reported as `None`.
pub async fn fetch_remote_content<T: HttpTransport + ?Sized>(
    transport: &T,
    strategies: &[ProxyStrategy],
    url: &str,
) -> Option<String> {
    for strategy in strategies {
        match strategy.attempt(transport, url).await {
            Ok(Some(body)) if !body.trim().is_empty() => {
                debug!(strategy = strategy.name(), bytes = body.len(), "fetched remote page");
                return Some(body);
            }
            Ok(_) => warn!(strategy = strategy.name(), url, "proxy returned no content"),
            Err(e) => warn!(strategy = strategy.name(), url, error = %e, "proxy failed"),
        }
    }
    None
}
