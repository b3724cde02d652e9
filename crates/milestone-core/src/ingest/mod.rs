//! Turning generative-service output into a valid [`ContentBlock`].
//!
//! Each attempt runs the same pipeline:
//!
//! ```text
//! complete(prompt) -> sanitize -> lenient::parse -> check_complete -> trim_lists
//! ```
//!
//! Transport errors, unparseable text and incomplete content all count
//! against one attempt budget. Attempts run back to back with identical
//! generation settings. [`ResponseIngestor::refine`] never fails: once the
//! budget is spent it returns [`fallback_content`].

pub mod fallback;
pub mod lenient;
pub mod prompt;
pub mod trim;
pub mod validate;

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::llm::{GenerateError, GenerationConfig, TextGenerator};
use crate::model::ContentBlock;

pub use fallback::{FallbackKind, fallback_content};
pub use lenient::{LenientError, Repair};
pub use prompt::{PromptContext, build_prompt};
pub use trim::{MAX_LIST_ITEMS, trim_lists};
pub use validate::{ValidationError, check_complete};

/// Default attempt budget per entry.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("generation failed: {0}")]
    Generation(#[from] GenerateError),

    #[error("malformed response: {0}")]
    Malformed(#[from] LenientError),

    #[error("incomplete response: {0}")]
    Incomplete(#[from] ValidationError),

    #[error("no usable response after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: Box<IngestError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IngestionConfig {
    pub max_attempts: u32,
    pub generation: GenerationConfig,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            generation: GenerationConfig::default(),
        }
    }
}

/// Strip code fences, collapse line breaks, and make sure the text is
/// wrapped in braces.
///
/// An opening brace is only added when the text has none, or when it
/// starts like an object body (`"key": ...`); otherwise leading prose is
/// left for the lenient parser to skip.
pub fn sanitize(raw: &str) -> String {
    let text = raw
        .trim()
        .replace("```json", "")
        .replace("```", "")
        .replace(['\n', '\r'], " ");
    let mut text = text.trim().to_string();
    if !text.starts_with('{') && (!text.contains('{') || text.starts_with('"')) {
        text.insert(0, '{');
    }
    if !text.ends_with('}') {
        text.push('}');
    }
    text
}

/// Asks a [`TextGenerator`] to elaborate skeleton content and validates
/// what comes back.
#[derive(Clone)]
pub struct ResponseIngestor {
    generator: Arc<dyn TextGenerator>,
    config: IngestionConfig,
}

impl std::fmt::Debug for ResponseIngestor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseIngestor")
            .field("generator", &self.generator.name())
            .field("config", &self.config)
            .finish()
    }
}

impl ResponseIngestor {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            config: IngestionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: IngestionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &IngestionConfig {
        &self.config
    }

    /// Refine `skeleton`, surfacing the last failure once the attempt
    /// budget is spent.
    pub async fn try_refine(
        &self,
        skeleton: &ContentBlock,
        ctx: &PromptContext,
    ) -> Result<ContentBlock, IngestError> {
        let prompt = build_prompt(skeleton, ctx);
        let attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.attempt(&prompt).await {
                Ok(block) => {
                    info!(
                        attempt,
                        domain = %ctx.domain,
                        entry = ctx.index,
                        generator = self.generator.name(),
                        "ingest: response accepted"
                    );
                    return Ok(block);
                }
                Err(err) if attempt < attempts => {
                    warn!(
                        attempt,
                        entry = ctx.index,
                        error = %err,
                        "ingest: attempt failed, retrying"
                    );
                    attempt += 1;
                }
                Err(err) => {
                    warn!(attempt, entry = ctx.index, error = %err, "ingest: attempts exhausted");
                    return Err(IngestError::Exhausted {
                        attempts,
                        last: Box::new(err),
                    });
                }
            }
        }
    }

    /// Refine `skeleton`; falls back to static content instead of failing.
    pub async fn refine(&self, skeleton: &ContentBlock, ctx: &PromptContext) -> ContentBlock {
        match self.try_refine(skeleton, ctx).await {
            Ok(block) => block,
            Err(err) => {
                info!(error = %err, query = %ctx.query, "ingest: using fallback content");
                fallback_content(ctx)
            }
        }
    }

    async fn attempt(&self, prompt: &str) -> Result<ContentBlock, IngestError> {
        let raw = self
            .generator
            .complete(prompt, &self.config.generation)
            .await?;
        let parsed = lenient::parse(&sanitize(&raw))?;
        if !parsed.repairs.is_empty() {
            debug!(repairs = ?parsed.repairs, "ingest: repaired response");
        }
        let mut value = parsed.value;
        check_complete(&value)?;
        trim_lists(&mut value, MAX_LIST_ITEMS);
        ContentBlock::from_value(value).ok_or(IngestError::Incomplete(ValidationError::NotAnObject))
    }
}
