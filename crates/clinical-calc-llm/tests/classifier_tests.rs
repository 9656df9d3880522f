//! Classification pipeline integration tests.
//!
//! Provider bodies are decoded from canned JSON so the full path from wire
//! format to probability aggregate runs without network access.

use clinical_calc_llm::client::{decode_chat_response, decode_legacy_response, ClientResult};
use clinical_calc_llm::{
    ClassificationRequest, Classifier, ClassifyError, CompletionClient, CompletionRequest,
    ModelResponse, ParseWarning,
};

/// Client that answers every request by decoding a fixed body.
struct CannedBody {
    body: &'static str,
    legacy: bool,
}

impl CompletionClient for CannedBody {
    fn complete(&self, request: &CompletionRequest) -> ClientResult<ModelResponse> {
        let top_k = request.params.top_logprobs as usize;
        if self.legacy {
            decode_legacy_response(self.body, top_k)
        } else {
            decode_chat_response(self.body, top_k)
        }
    }
}

fn transcripts() -> ClassificationRequest {
    ClassificationRequest::new(
        "Spending weekends with my kids makes me happy.",
        "I can't sleep and nothing feels worth doing lately.",
    )
}

#[test]
fn test_chat_body_depressed() {
    let client = CannedBody {
        body: r#"{"choices": [{
            "message": {"content": "15\nExplanation: Reports anhedonia and insomnia.\nSignificant words/phrases: can't sleep, nothing feels worth doing"},
            "logprobs": {"content": [{"token": "15", "logprob": -0.4, "top_logprobs": [
                {"token": "15", "logprob": -0.35667494393873245},
                {"token": "3", "logprob": -1.6094379124341003},
                {"token": "12", "logprob": -2.302585092994046}
            ]}]}
        }]}"#,
        legacy: false,
    };

    let result = Classifier::new(client).classify(&transcripts()).unwrap();

    assert_eq!(result.prediction.score, Some(15));
    assert_eq!(result.prediction.explanation, "Reports anhedonia and insomnia.");
    assert_eq!(
        result.prediction.significant_phrases,
        "can't sleep, nothing feels worth doing"
    );

    // 70% + 10% in the 5-27 band, 20% in 0-4
    let probs = &result.probabilities;
    assert_eq!(probs.token_probabilities.len(), 3);
    assert!((probs.group_high_percent - 80.0).abs() < 1e-6);
    assert!((probs.group_low_percent - 20.0).abs() < 1e-6);
    assert!((probs.confidence - 0.6).abs() < 1e-6);
    assert!(probs.depression_predicted);
}

#[test]
fn test_legacy_body_not_depressed() {
    let client = CannedBody {
        body: r#"{"choices": [{
            "text": " 2\nExplanation: Mostly positive.",
            "logprobs": {
                "tokens": [" 2"],
                "token_logprobs": [-0.1],
                "top_logprobs": [{" 2": -0.10536051565782628, " 6": -2.3025850929940455}]
            }
        }]}"#,
        legacy: true,
    };

    let result = Classifier::new(client).classify(&transcripts()).unwrap();

    assert_eq!(result.prediction.score, Some(2));
    assert_eq!(
        result.prediction.warnings,
        vec![ParseWarning::MissingSignificantPhrases]
    );
    assert_eq!(result.probabilities.token_probabilities[0].token, " 2");
    assert!(!result.probabilities.depression_predicted);
    assert!(result.probabilities.group_low_percent > 89.0);
}

#[test]
fn test_non_numeric_reply_degrades() {
    let client = CannedBody {
        body: r#"{"choices": [{
            "message": {"content": "I cannot determine a score."},
            "logprobs": {"content": [{"token": "I", "logprob": -0.01, "top_logprobs": [
                {"token": "I", "logprob": -0.01},
                {"token": "The", "logprob": -4.6}
            ]}]}
        }]}"#,
        legacy: false,
    };

    let result = Classifier::new(client).classify(&transcripts()).unwrap();

    assert_eq!(result.prediction.score, None);
    assert_eq!(result.prediction.explanation, "");
    assert_eq!(result.probabilities.confidence, 0.0);
    assert_eq!(result.probabilities.group_high_percent, 0.0);
    assert!(!result.probabilities.depression_predicted);
}

#[test]
fn test_malformed_body_is_one_failure() {
    let client = CannedBody {
        body: r#"{"error": {"message": "model overloaded"}}"#,
        legacy: false,
    };

    let err = Classifier::new(client).classify(&transcripts()).unwrap_err();
    assert!(matches!(err, ClassifyError::ExternalService(_)));
}

#[test]
fn test_classification_serializes() {
    let client = CannedBody {
        body: r#"{"choices": [{
            "message": {"content": "4\nExplanation: x\nSignificant words/phrases: y"},
            "logprobs": {"content": [{"token": "4", "logprob": 0.0, "top_logprobs": [
                {"token": "4", "logprob": 0.0}
            ]}]}
        }]}"#,
        legacy: false,
    };

    let result = Classifier::new(client).classify(&transcripts()).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["prediction"]["score"], 4);
    assert!(json["prediction"].get("warnings").is_none());
    assert_eq!(json["probabilities"]["group_low_percent"], 100.0);
    assert_eq!(json["probabilities"]["depression_predicted"], false);
}
