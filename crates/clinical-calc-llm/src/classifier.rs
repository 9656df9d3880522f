//! PHQ-9 classification pipeline.
//!
//! Validate → prompt → model call → extraction → probability aggregate.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::client::{CompletionClient, CompletionRequest, DecodingParams, ExternalServiceError};
use crate::extraction::{parse_prediction, ParsedPrediction};
use crate::probability::{aggregate, ProbabilityAggregate};
use crate::prompts::{make_user_prompt, DISTRESS_LABEL, HAPPINESS_LABEL, SYSTEM_PROMPT};

/// Classification errors.
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// User-correctable; the model is not called.
    #[error("Both transcripts are required to make a prediction (missing: {})", .missing.join(", "))]
    Validation { missing: Vec<&'static str> },

    #[error("Model request failed: {0}")]
    ExternalService(#[from] ExternalServiceError),
}

pub type ClassifyResult<T> = Result<T, ClassifyError>;

/// The two participant transcripts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRequest {
    pub happiness_text: String,
    pub distress_text: String,
}

impl ClassificationRequest {
    pub fn new(happiness_text: impl Into<String>, distress_text: impl Into<String>) -> Self {
        Self {
            happiness_text: happiness_text.into(),
            distress_text: distress_text.into(),
        }
    }

    /// Reject empty transcripts. Whitespace-only text is passed through to
    /// the model unchanged.
    pub fn validate(&self) -> ClassifyResult<()> {
        let mut missing = Vec::new();
        if self.happiness_text.is_empty() {
            missing.push(HAPPINESS_LABEL);
        }
        if self.distress_text.is_empty() {
            missing.push(DISTRESS_LABEL);
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ClassifyError::Validation { missing })
        }
    }
}

/// Parsed reply plus its probability view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub prediction: ParsedPrediction,
    pub probabilities: ProbabilityAggregate,
}

/// Runs one classification per call against a [`CompletionClient`].
pub struct Classifier<C> {
    client: C,
    params: DecodingParams,
}

impl<C: CompletionClient> Classifier<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            params: DecodingParams::default(),
        }
    }

    pub fn with_params(mut self, params: DecodingParams) -> Self {
        self.params = params;
        self
    }

    /// Assemble the model request for validated transcripts.
    pub fn build_request(&self, request: &ClassificationRequest) -> CompletionRequest {
        CompletionRequest {
            system: SYSTEM_PROMPT.to_string(),
            user: make_user_prompt(&request.happiness_text, &request.distress_text),
            params: self.params,
        }
    }

    /// Classify the transcripts. Makes at most one model call.
    pub fn classify(&self, request: &ClassificationRequest) -> ClassifyResult<Classification> {
        request.validate()?;

        let completion = self.build_request(request);
        debug!(
            happiness_len = request.happiness_text.len(),
            distress_len = request.distress_text.len(),
            "Requesting PHQ-9 classification"
        );

        let response = self.client.complete(&completion).map_err(|e| {
            warn!(error = %e, "Model call failed");
            e
        })?;

        let prediction = parse_prediction(&response.raw_content);
        for warning in &prediction.warnings {
            warn!(?warning, "Model output did not match expected layout");
        }

        let probabilities = aggregate(&response.top_log_probs);
        info!(
            score = ?prediction.score,
            candidates = probabilities.token_probabilities.len(),
            confidence = probabilities.confidence,
            depression = probabilities.depression_predicted,
            "Classified transcripts"
        );

        Ok(Classification {
            prediction,
            probabilities,
        })
    }
}
