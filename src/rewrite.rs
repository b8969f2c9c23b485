//! Rewrite client: one generation attempt per call, with attempt-aware
//! prompt shaping and strict parsing of the model's JSON reply.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::llm::{generate_text, LlmError};
use crate::prompts::rewrite_prompt;
use crate::rss::CandidateItem;
use crate::{LLMParams, TARGET_LLM_REQUEST};

/// One generated rewrite of a candidate item.
#[derive(Debug, Clone)]
pub struct RewriteAttempt {
    pub headline: String,
    pub summary: String,
    pub attempt: u32,
}

/// Seam between the orchestrator and the generation capability.
#[async_trait]
pub trait Rewriter {
    async fn generate(&self, item: &CandidateItem, attempt: u32)
        -> Result<RewriteAttempt, LlmError>;
}

/// Production rewriter backed by the configured LLM.
pub struct RewriteClient {
    params: LLMParams,
}

impl RewriteClient {
    pub fn new(params: LLMParams) -> Self {
        Self { params }
    }
}

#[async_trait]
impl Rewriter for RewriteClient {
    async fn generate(
        &self,
        item: &CandidateItem,
        attempt: u32,
    ) -> Result<RewriteAttempt, LlmError> {
        let prompt = rewrite_prompt(&item.title, &item.content, &item.source_name, attempt);
        let response = generate_text(&self.params, &prompt).await?;
        debug!(target: TARGET_LLM_REQUEST, "Received rewrite candidate ({} chars)", response.len());
        parse_rewrite(&response, attempt)
    }
}

#[derive(Deserialize)]
struct RewriteResponse {
    #[serde(rename = "newHeadline")]
    new_headline: String,
    summary: String,
}

// The model is asked for bare JSON; some models wrap it in a code fence
// anyway.
fn parse_rewrite(response: &str, attempt: u32) -> Result<RewriteAttempt, LlmError> {
    let cleaned = response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let parsed: RewriteResponse =
        serde_json::from_str(cleaned).map_err(|e| LlmError::Malformed(e.to_string()))?;

    Ok(RewriteAttempt {
        headline: parsed.new_headline,
        summary: parsed.summary,
        attempt,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_json() {
        let attempt =
            parse_rewrite(r#"{"newHeadline": "Fresh take", "summary": "Two sentences."}"#, 1)
                .unwrap();
        assert_eq!(attempt.headline, "Fresh take");
        assert_eq!(attempt.summary, "Two sentences.");
        assert_eq!(attempt.attempt, 1);
    }

    #[test]
    fn strips_markdown_code_fences() {
        let response = "```json\n{\"newHeadline\": \"Fresh take\", \"summary\": \"Short.\"}\n```";
        let attempt = parse_rewrite(response, 2).unwrap();
        assert_eq!(attempt.headline, "Fresh take");
        assert_eq!(attempt.attempt, 2);
    }

    #[test]
    fn missing_field_is_malformed() {
        let result = parse_rewrite(r#"{"newHeadline": "No summary here"}"#, 1);
        assert!(matches!(result, Err(LlmError::Malformed(_))));
    }

    #[test]
    fn prose_reply_is_malformed() {
        let result = parse_rewrite("Sure! Here's a rewrite of that article.", 1);
        assert!(matches!(result, Err(LlmError::Malformed(_))));
    }
}
