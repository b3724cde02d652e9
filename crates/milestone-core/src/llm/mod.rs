//! Generative text service interface.
//!
//! The ingestion pipeline only needs "prompt in, text out". [`TextGenerator`]
//! captures that seam so the HTTP client can be swapped for a stub in tests
//! or for another provider.

pub mod gemini;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use gemini::GeminiClient;

/// Sampling parameters sent with every generation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub candidate_count: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.9,
            top_p: 0.95,
            top_k: 50,
            max_output_tokens: 8192,
            candidate_count: 1,
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A service that turns a prompt into free text.
///
/// # Object Safety
///
/// Object-safe so planners can hold an `Arc<dyn TextGenerator>`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short provider name used in logs (e.g. "gemini").
    fn name(&self) -> &str;

    /// Generate a completion for `prompt`.
    async fn complete(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<String, GenerateError>;
}

// Compile-time assertion: TextGenerator must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn TextGenerator) {}
};

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoGenerator;

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(
            &self,
            prompt: &str,
            _config: &GenerationConfig,
        ) -> Result<String, GenerateError> {
            Ok(prompt.to_string())
        }
    }

    #[test]
    fn default_config_values() {
        let config = GenerationConfig::default();
        assert_eq!(config.temperature, 0.9);
        assert_eq!(config.top_p, 0.95);
        assert_eq!(config.top_k, 50);
        assert_eq!(config.max_output_tokens, 8192);
        assert_eq!(config.candidate_count, 1);
    }

    #[test]
    fn config_serializes_camel_case() {
        let value = serde_json::to_value(GenerationConfig::default()).unwrap();
        assert_eq!(value["topK"], 50);
        assert_eq!(value["maxOutputTokens"], 8192);
        assert_eq!(value["candidateCount"], 1);
    }

    #[tokio::test]
    async fn generator_is_usable_as_trait_object() {
        let generator: Box<dyn TextGenerator> = Box::new(EchoGenerator);
        assert_eq!(generator.name(), "echo");
        let text = generator
            .complete("hello", &GenerationConfig::default())
            .await
            .unwrap();
        assert_eq!(text, "hello");
    }

    #[test]
    fn api_error_display() {
        let err = GenerateError::Api {
            status: 429,
            message: "quota".to_string(),
        };
        assert_eq!(err.to_string(), "API error 429: quota");
    }
}
