use async_openai::types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs};
use ollama_rs::generation::completion::request::GenerationRequest;
use ollama_rs::generation::options::GenerationOptions;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::{LLMClient, LLMParams, TARGET_LLM_REQUEST};

/// Hard ceiling on a single generation call; the transport's own limits
/// are not relied upon.
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

const MAX_COMPLETION_TOKENS: u32 = 150;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("generation backend rate limited the request")]
    RateLimited,
    #[error("generation request timed out")]
    Timeout,
    #[error("malformed generation response: {0}")]
    Malformed(String),
    #[error("generation failed: {0}")]
    Backend(String),
}

// Rate limits get an extended cooldown upstream, everything else a
// normal retry. Backends differ in how they surface 429s, so this goes
// by the error text.
fn classify(message: String) -> LlmError {
    if message.contains("429") || message.to_lowercase().contains("rate") {
        LlmError::RateLimited
    } else {
        LlmError::Backend(message)
    }
}

/// Run a single generation attempt against the configured backend.
pub async fn generate_text(params: &LLMParams, prompt: &str) -> Result<String, LlmError> {
    debug!(target: TARGET_LLM_REQUEST, "Sending generation request ({} chars) to model {}", prompt.len(), params.model);

    match &params.llm_client {
        LLMClient::Ollama(ollama) => {
            let mut request = GenerationRequest::new(params.model.clone(), prompt.to_string());
            request.options = Some(GenerationOptions::default().temperature(params.temperature));

            match timeout(GENERATION_TIMEOUT, ollama.generate(request)).await {
                Ok(Ok(response)) => Ok(response.response),
                Ok(Err(e)) => {
                    warn!(target: TARGET_LLM_REQUEST, "Error generating response: {}", e);
                    Err(classify(e.to_string()))
                }
                Err(_) => {
                    warn!(target: TARGET_LLM_REQUEST, "Generation request timed out");
                    Err(LlmError::Timeout)
                }
            }
        }
        LLMClient::OpenAI(client) => {
            let message = ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| LlmError::Backend(e.to_string()))?;
            let request = CreateChatCompletionRequestArgs::default()
                .model(params.model.as_str())
                .temperature(params.temperature)
                .max_tokens(MAX_COMPLETION_TOKENS)
                .messages([message.into()])
                .build()
                .map_err(|e| LlmError::Backend(e.to_string()))?;

            match timeout(GENERATION_TIMEOUT, client.chat().create(request)).await {
                Ok(Ok(response)) => response
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.message.content)
                    .ok_or_else(|| LlmError::Malformed("empty completion".to_string())),
                Ok(Err(e)) => {
                    warn!(target: TARGET_LLM_REQUEST, "Error generating response: {}", e);
                    Err(classify(e.to_string()))
                }
                Err(_) => {
                    warn!(target: TARGET_LLM_REQUEST, "Generation request timed out");
                    Err(LlmError::Timeout)
                }
            }
        }
    }
}
