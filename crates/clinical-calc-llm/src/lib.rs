//! PHQ-9 transcript classifier.
//!
//! Sends a participant's happiness and distress transcripts to a fine-tuned
//! completion model, extracts the predicted PHQ-9 score with its explanation,
//! and turns the first-token log-probabilities into a grouped probability
//! (0–4 vs 5–27) and a confidence value.
//!
//! No retries: a failed model call is reported once to the caller.

pub mod classifier;
pub mod client;
pub mod config;
pub mod extraction;
pub mod probability;
pub mod prompts;

pub use classifier::*;
pub use client::{
    CompletionClient, CompletionRequest, DecodingParams, ExternalServiceError,
    MockCompletionClient, ModelResponse, OpenAiClient, TokenLogProb,
};
pub use config::{ApiStyle, ClassifierConfig, ConfigError};
pub use extraction::*;
pub use probability::*;
pub use prompts::*;
