//! # Content Acquisition Pipeline
//!
//! Turns a URL, pasted text or a free-form description into a validated
//! [`RecipeDraft`]. One invocation runs strictly in sequence:
//!
//! 1. input validation (non-empty input, credential present), before any
//!    network traffic
//! 2. in extraction mode with a URL input: proxy fetch ([`fetch`]) and noise
//!    stripping ([`clean`])
//! 3. one exchange with the generation service ([`generate`])
//! 4. parsing and per-mode validation ([`parse`])
//!
//! The pipeline never touches the collection. Committing the draft is the
//! caller's job, so a failure at any step leaves nothing behind.
//!
//! A failed page fetch is not an error: the prompt falls back to the bare URL
//! and an [`AcquisitionWarning`] is returned next to the draft.
//!
//! At most one invocation per [`Mode`] runs at a time; a second one is
//! rejected with [`PipelineError::Busy`].

pub mod clean;
pub mod fetch;
pub mod generate;
pub mod parse;
pub mod prompt;

use crate::config::AppConfig;
use crate::error::{PipelineError, Result};
use crate::http::{HttpTransport, ReqwestTransport};
use crate::model::{Mode, RecipeDraft};
use fetch::{fetch_remote_content, ProxyStrategy};
use generate::{GeminiClient, GenerationService};
use prompt::{extraction_prompt, generation_prompt, looks_like_url, truncate_chars, SourceText};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info};

/// Single-slot in-flight flag.
#[derive(Debug, Default)]
pub struct InFlight(AtomicBool);

impl InFlight {
    pub fn try_acquire(&self) -> Option<InFlightGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(&self.0))
    }

    pub fn is_held(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Releases the slot when dropped, including on early return.
pub struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KitchenOptions {
    pub strategies: Vec<ProxyStrategy>,
    pub max_source_chars: usize,
    pub clean_html: bool,
}

impl KitchenOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            strategies: ProxyStrategy::chain(config),
            max_source_chars: config.max_source_chars,
            clean_html: config.clean_html,
        }
    }
}

impl Default for KitchenOptions {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CookRequest<'a> {
    pub input: &'a str,
    pub mode: Mode,
    pub api_key: Option<&'a str>,
    pub custom_rules: Option<&'a str>,
}

/// Non-fatal conditions met on the way to a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionWarning {
    /// No proxy could deliver the page; the draft was extracted from the URL alone.
    ProxyUnavailable { url: String },
}

impl fmt::Display for AcquisitionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcquisitionWarning::ProxyUnavailable { url } => write!(
                f,
                "Could not fetch {} through any proxy; the recipe was inferred from the address only",
                url
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acquisition {
    pub draft: RecipeDraft,
    pub warnings: Vec<AcquisitionWarning>,
}

/// The pipeline: a transport for page fetches plus a generation service.
pub struct Kitchen<T: HttpTransport, G: GenerationService> {
    transport: T,
    generator: G,
    options: KitchenOptions,
    extracting: InFlight,
    generating: InFlight,
}

pub type DefaultKitchen = Kitchen<ReqwestTransport, GeminiClient<ReqwestTransport>>;

impl DefaultKitchen {
    /// Production pipeline over reqwest, honouring the configured timeout.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.request_timeout_secs.map(Duration::from_secs))?;
        let generator = GeminiClient::from_config(transport.clone(), config);
        Ok(Kitchen::new(transport, generator, KitchenOptions::from_config(config)))
    }
}

impl<T: HttpTransport, G: GenerationService> Kitchen<T, G> {
    pub fn new(transport: T, generator: G, options: KitchenOptions) -> Self {
        Self {
            transport,
            generator,
            options,
            extracting: InFlight::default(),
            generating: InFlight::default(),
        }
    }

    pub fn in_flight(&self, mode: Mode) -> &InFlight {
        match mode {
            Mode::Extract => &self.extracting,
            Mode::Generate => &self.generating,
        }
    }

    pub async fn acquire(&self, request: CookRequest<'_>) -> std::result::Result<Acquisition, PipelineError> {
        let input = request.input.trim();
        if input.is_empty() {
            return Err(PipelineError::EmptyInput);
        }
        let api_key = request
            .api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(PipelineError::MissingApiKey)?;

        let _guard = self
            .in_flight(request.mode)
            .try_acquire()
            .ok_or(PipelineError::Busy(request.mode))?;

        let mut warnings = Vec::new();
        let instruction = match request.mode {
            Mode::Extract => {
                let source = self.prepare_source(input, &mut warnings).await;
                extraction_prompt(&source)
            }
            Mode::Generate => generation_prompt(
                truncate_chars(input, self.options.max_source_chars),
                request.custom_rules,
            ),
        };
        debug!(mode = %request.mode, chars = instruction.chars().count(), "sending instruction");

        let text = self.generator.generate(api_key, &instruction).await?;
        let draft = parse::parse_recipe_output(&text, request.mode)?;

        info!(mode = %request.mode, title = %draft.title, "recipe acquired");
        Ok(Acquisition { draft, warnings })
    }

    async fn prepare_source(&self, input: &str, warnings: &mut Vec<AcquisitionWarning>) -> SourceText {
        let max = self.options.max_source_chars;
        if !looks_like_url(input) {
            return SourceText::Pasted(truncate_chars(input, max).to_string());
        }

        match fetch_remote_content(&self.transport, &self.options.strategies, input).await {
            Some(html) if self.options.clean_html => {
                let text = clean::strip_noise(&html);
                SourceText::PageText(truncate_chars(&text, max).to_string())
            }
            Some(html) => SourceText::Html(truncate_chars(&html, max).to_string()),
            None => {
                warnings.push(AcquisitionWarning::ProxyUnavailable {
                    url: input.to_string(),
                });
                SourceText::UrlOnly(input.to_string())
            }
        }
    }
}
