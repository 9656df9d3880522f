//! PHQ-9 classification prompts.
//!
//! The fine-tuned model was trained on exactly this instruction layout, so
//! the wording and labels are fixed.

/// Label preceding the happiness transcript.
pub const HAPPINESS_LABEL: &str = "Experience of Happiness";
/// Label preceding the distress transcript.
pub const DISTRESS_LABEL: &str = "Experience of Distress";
/// Cue the model completes with the score.
pub const SCORE_CUE: &str = "PHQ-9 score:";

/// System instruction with the three numbered directives.
pub const SYSTEM_PROMPT: &str = "You will be given a transcript of a participant talking about the topics of happiness and distress.
1. Classify the transcript into one of the PHQ-9 scores (0–27).
2. Write a brief explanation for your prediction by referring to evidence from the transcript.
3. Highlight all significant words or phrases that influenced your decision, separated by commas.";

/// User message carrying both transcripts.
pub fn make_user_prompt(happiness: &str, distress: &str) -> String {
    format!(
        "{}: {}\n\n{}: {}\n\n{}",
        HAPPINESS_LABEL, happiness, DISTRESS_LABEL, distress, SCORE_CUE
    )
}

/// Single concatenated prompt for the legacy completions endpoint.
pub fn build_legacy_prompt(system: &str, user: &str) -> String {
    let mut prompt = String::with_capacity(system.len() + user.len() + 2);
    prompt.push_str(system);
    prompt.push_str("\n\n");
    prompt.push_str(user);
    prompt
}
