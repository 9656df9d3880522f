//! Model collaborator: request/response contract and the OpenAI client.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{ApiStyle, ClassifierConfig};
use crate::prompts::build_legacy_prompt;

/// Candidates requested per token position.
pub const TOP_LOGPROBS: u8 = 20;
/// Cap on generated tokens.
pub const MAX_OUTPUT_TOKENS: u32 = 2000;

/// Failures of the external model call. None are retried.
#[derive(Error, Debug)]
pub enum ExternalServiceError {
    #[error("Authentication failed ({status}): {body}")]
    Auth { status: u16, body: String },

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Provider returned {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Empty response from model")]
    EmptyResponse,
}

pub type ClientResult<T> = Result<T, ExternalServiceError>;

/// Decoding parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecodingParams {
    pub temperature: f32,
    pub top_p: f32,
    pub max_output_tokens: u32,
    pub logprobs: bool,
    pub top_logprobs: u8,
    pub seed: Option<u64>,
}

impl Default for DecodingParams {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            top_p: 1.0,
            max_output_tokens: MAX_OUTPUT_TOKENS,
            logprobs: true,
            top_logprobs: TOP_LOGPROBS,
            seed: Some(1),
        }
    }
}

/// One request to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub params: DecodingParams,
}

impl CompletionRequest {
    /// Prompt for endpoints that take a single string.
    pub fn legacy_prompt(&self) -> String {
        build_legacy_prompt(&self.system, &self.user)
    }
}

/// A candidate token and its natural-log probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenLogProb {
    pub token: String,
    pub log_probability: f64,
}

impl TokenLogProb {
    pub fn new(token: impl Into<String>, log_probability: f64) -> Self {
        Self {
            token: token.into(),
            log_probability,
        }
    }
}

/// Text and first-position candidates returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResponse {
    pub raw_content: String,
    /// Top candidates for the first generated token, provider order
    pub top_log_probs: Vec<TokenLogProb>,
}

/// Anything that can answer a [`CompletionRequest`].
pub trait CompletionClient {
    fn complete(&self, request: &CompletionRequest) -> ClientResult<ModelResponse>;
}

impl<T: CompletionClient + ?Sized> CompletionClient for &T {
    fn complete(&self, request: &CompletionRequest) -> ClientResult<ModelResponse> {
        (**self).complete(request)
    }
}

// =========================================================================
// OpenAI client
// =========================================================================

/// Blocking client for OpenAI-compatible endpoints.
pub struct OpenAiClient<'a> {
    config: &'a ClassifierConfig,
    http: Client,
}

impl<'a> OpenAiClient<'a> {
    pub fn new(config: &'a ClassifierConfig) -> ClientResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    fn post<B: Serialize>(&self, path: &str, body: &B) -> ClientResult<String> {
        let url = format!("{}/{}", self.config.base_url, path);
        debug!(%url, model = %self.config.model, "Sending completion request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()?;

        let status = response.status();
        let text = response.text()?;

        if status.is_success() {
            return Ok(text);
        }

        warn!(status = status.as_u16(), "Completion request rejected");
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ExternalServiceError::Auth {
                status: status.as_u16(),
                body: text,
            },
            StatusCode::TOO_MANY_REQUESTS => ExternalServiceError::RateLimited(text),
            _ => ExternalServiceError::Http {
                status: status.as_u16(),
                body: text,
            },
        })
    }
}

impl CompletionClient for OpenAiClient<'_> {
    fn complete(&self, request: &CompletionRequest) -> ClientResult<ModelResponse> {
        let top_k = request.params.top_logprobs as usize;
        match self.config.api_style {
            ApiStyle::Chat => {
                let body = ChatRequest::new(&self.config.model, request);
                let text = self.post("chat/completions", &body)?;
                decode_chat_response(&text, top_k)
            }
            ApiStyle::Legacy => {
                let body = LegacyRequest::new(&self.config.model, request);
                let text = self.post("completions", &body)?;
                decode_legacy_response(&text, top_k)
            }
        }
    }
}

// =========================================================================
// Wire types
// =========================================================================

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    logprobs: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_logprobs: Option<u8>,
}

impl<'a> ChatRequest<'a> {
    fn new(model: &'a str, request: &'a CompletionRequest) -> Self {
        let p = &request.params;
        Self {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: p.temperature,
            top_p: p.top_p,
            max_tokens: p.max_output_tokens,
            seed: p.seed,
            logprobs: p.logprobs,
            top_logprobs: p.logprobs.then_some(p.top_logprobs),
        }
    }
}

#[derive(Debug, Serialize)]
struct LegacyRequest<'a> {
    model: &'a str,
    prompt: String,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    logprobs: Option<u8>,
}

impl<'a> LegacyRequest<'a> {
    fn new(model: &'a str, request: &CompletionRequest) -> Self {
        let p = &request.params;
        Self {
            model,
            prompt: request.legacy_prompt(),
            temperature: p.temperature,
            top_p: p.top_p,
            max_tokens: p.max_output_tokens,
            seed: p.seed,
            logprobs: p.logprobs.then_some(p.top_logprobs),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
    logprobs: Option<ChatLogprobs>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatLogprobs {
    content: Option<Vec<ChatTokenLogprob>>,
}

#[derive(Debug, Deserialize)]
struct ChatTokenLogprob {
    #[serde(default)]
    top_logprobs: Vec<ChatTopLogprob>,
}

#[derive(Debug, Deserialize)]
struct ChatTopLogprob {
    token: String,
    logprob: f64,
}

#[derive(Debug, Deserialize)]
struct LegacyResponse {
    #[serde(default)]
    choices: Vec<LegacyChoice>,
}

#[derive(Debug, Deserialize)]
struct LegacyChoice {
    #[serde(default)]
    text: String,
    logprobs: Option<LegacyLogprobs>,
}

#[derive(Debug, Deserialize)]
struct LegacyLogprobs {
    #[serde(default)]
    top_logprobs: Vec<Option<BTreeMap<String, f64>>>,
}

/// Decode a `/chat/completions` body into a [`ModelResponse`].
pub fn decode_chat_response(body: &str, top_k: usize) -> ClientResult<ModelResponse> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ExternalServiceError::MalformedResponse(e.to_string()))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(ExternalServiceError::EmptyResponse)?;

    let raw_content = choice.message.content.unwrap_or_default();
    let positions = choice
        .logprobs
        .and_then(|lp| lp.content)
        .ok_or_else(|| ExternalServiceError::MalformedResponse("missing logprobs".into()))?;

    if raw_content.trim().is_empty() && positions.is_empty() {
        return Err(ExternalServiceError::EmptyResponse);
    }

    let mut top_log_probs: Vec<TokenLogProb> = positions
        .into_iter()
        .next()
        .map(|first| {
            first
                .top_logprobs
                .into_iter()
                .map(|c| TokenLogProb::new(c.token, c.logprob))
                .collect()
        })
        .unwrap_or_default();
    top_log_probs.truncate(top_k);

    Ok(ModelResponse {
        raw_content,
        top_log_probs,
    })
}

/// Decode a legacy `/completions` body into a [`ModelResponse`].
///
/// The first-position candidates arrive as a token → logprob object; they
/// are ordered most likely first.
pub fn decode_legacy_response(body: &str, top_k: usize) -> ClientResult<ModelResponse> {
    let response: LegacyResponse = serde_json::from_str(body)
        .map_err(|e| ExternalServiceError::MalformedResponse(e.to_string()))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(ExternalServiceError::EmptyResponse)?;

    let logprobs = choice
        .logprobs
        .ok_or_else(|| ExternalServiceError::MalformedResponse("missing logprobs".into()))?;

    if choice.text.trim().is_empty() && logprobs.top_logprobs.is_empty() {
        return Err(ExternalServiceError::EmptyResponse);
    }

    let mut top_log_probs: Vec<TokenLogProb> = logprobs
        .top_logprobs
        .into_iter()
        .next()
        .flatten()
        .map(|candidates| {
            candidates
                .into_iter()
                .map(|(token, logprob)| TokenLogProb::new(token, logprob))
                .collect()
        })
        .unwrap_or_default();
    top_log_probs.sort_by(|a, b| b.log_probability.total_cmp(&a.log_probability));
    top_log_probs.truncate(top_k);

    Ok(ModelResponse {
        raw_content: choice.text,
        top_log_probs,
    })
}

// =========================================================================
// Mock client
// =========================================================================

/// Canned-response client for testing without network access.
pub struct MockCompletionClient {
    response: RefCell<ClientResult<ModelResponse>>,
    calls: Cell<usize>,
    last_request: RefCell<Option<CompletionRequest>>,
}

impl MockCompletionClient {
    /// Always answer with `response`.
    pub fn new(response: ModelResponse) -> Self {
        Self {
            response: RefCell::new(Ok(response)),
            calls: Cell::new(0),
            last_request: RefCell::new(None),
        }
    }

    /// Fail the first call with `error`; later calls report an empty response.
    pub fn failing(error: ExternalServiceError) -> Self {
        Self {
            response: RefCell::new(Err(error)),
            calls: Cell::new(0),
            last_request: RefCell::new(None),
        }
    }

    /// Number of requests seen.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request.borrow().clone()
    }
}

impl CompletionClient for MockCompletionClient {
    fn complete(&self, request: &CompletionRequest) -> ClientResult<ModelResponse> {
        self.calls.set(self.calls.get() + 1);
        *self.last_request.borrow_mut() = Some(request.clone());

        let mut slot = self.response.borrow_mut();
        if let Ok(response) = &*slot {
            return Ok(response.clone());
        }
        std::mem::replace(&mut *slot, Err(ExternalServiceError::EmptyResponse))
    }
}
