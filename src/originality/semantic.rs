//! Optional semantic layer: embedding cosine similarity between the full
//! source text and the rewrite. Costs a paid API call per attempt, so it
//! is off by default and degrades to a no-op on any failure rather than
//! blocking the pipeline.

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig, types::CreateEmbeddingRequestArgs, Client as OpenAIClient,
};
use tracing::warn;

use super::{round2, SemanticScore, SEMANTIC_THRESHOLD};
use crate::TARGET_LLM_REQUEST;

const EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Feature-flagged embedding check. Holds a client only when both the
/// feature flag and a credential are configured.
pub struct SemanticCheck {
    client: Option<OpenAIClient<OpenAIConfig>>,
}

impl SemanticCheck {
    pub fn disabled() -> Self {
        Self { client: None }
    }

    /// Enabled only when `SEMANTIC_CHECK` is set and a credential exists.
    pub fn from_env() -> Self {
        let enabled = std::env::var("SEMANTIC_CHECK")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        if !enabled {
            return Self::disabled();
        }

        match std::env::var("OPENAI_API_KEY") {
            Ok(api_key) => Self {
                client: Some(OpenAIClient::with_config(
                    OpenAIConfig::new().with_api_key(api_key),
                )),
            },
            Err(_) => {
                warn!(
                    target: TARGET_LLM_REQUEST,
                    "SEMANTIC_CHECK is set but OPENAI_API_KEY is not, semantic layer stays off"
                );
                Self::disabled()
            }
        }
    }

    /// Score the pair, or report a skipped pass when unavailable.
    pub async fn run(&self, original: &str, summary: &str) -> SemanticScore {
        let client = match &self.client {
            Some(client) => client,
            None => {
                return SemanticScore {
                    passed: true,
                    score: 0.0,
                    skipped: true,
                }
            }
        };

        match similarity(client, original, summary).await {
            Ok(score) => SemanticScore {
                passed: score <= SEMANTIC_THRESHOLD,
                score: round2(score),
                skipped: false,
            },
            Err(err) => {
                // Fail open: an optional layer must not block publication.
                warn!(target: TARGET_LLM_REQUEST, "Semantic check failed, treating as passed: {}", err);
                SemanticScore {
                    passed: true,
                    score: 0.0,
                    skipped: true,
                }
            }
        }
    }
}

async fn similarity(
    client: &OpenAIClient<OpenAIConfig>,
    original: &str,
    summary: &str,
) -> Result<f64> {
    let a = embed(client, original).await?;
    let b = embed(client, summary).await?;
    Ok(cosine_similarity(&a, &b)? as f64)
}

async fn embed(client: &OpenAIClient<OpenAIConfig>, text: &str) -> Result<Vec<f32>> {
    let request = CreateEmbeddingRequestArgs::default()
        .model(EMBEDDING_MODEL)
        .input(text)
        .build()?;
    let response = client.embeddings().create(request).await?;
    response
        .data
        .into_iter()
        .next()
        .map(|d| d.embedding)
        .ok_or_else(|| anyhow::anyhow!("embedding response contained no vectors"))
}

fn cosine_similarity(vec1: &[f32], vec2: &[f32]) -> Result<f32> {
    if vec1.len() != vec2.len() {
        return Err(anyhow::anyhow!(
            "Vector dimensions don't match: {} vs {}",
            vec1.len(),
            vec2.len()
        ));
    }

    let mag1: f32 = vec1.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag2: f32 = vec2.iter().map(|x| x * x).sum::<f32>().sqrt();

    if mag1 < 0.001 || mag2 < 0.001 {
        return Err(anyhow::anyhow!("Zero magnitude vector detected"));
    }

    let dot_product: f32 = vec1.iter().zip(vec2.iter()).map(|(a, b)| a * b).sum();

    Ok(dot_product / (mag1 * mag2))
}
