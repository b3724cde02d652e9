//! Query in, plan out.

use std::sync::Arc;

use tracing::info;

use crate::assemble::{ContentProvider, PlanAssembler, Refiner};
use crate::classify::classify;
use crate::ingest::{IngestionConfig, ResponseIngestor};
use crate::llm::TextGenerator;
use crate::model::{Classification, Plan};
use crate::template::TemplateEngine;

/// Wires classifier, content provider and assembler together.
///
/// Holds no per-request state, so one planner can serve concurrent
/// requests behind an `Arc`.
#[derive(Clone)]
pub struct Planner {
    provider: Arc<dyn ContentProvider>,
    assembler: PlanAssembler,
}

impl std::fmt::Debug for Planner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Planner")
            .field("provider", &self.provider.name())
            .field("assembler", &self.assembler)
            .finish()
    }
}

impl Planner {
    pub fn new(provider: Arc<dyn ContentProvider>) -> Self {
        Self {
            provider,
            assembler: PlanAssembler::new(),
        }
    }

    /// Template-only planner; never calls out.
    pub fn offline() -> Self {
        Self::new(Arc::new(TemplateEngine::new()))
    }

    /// Planner that refines template content through `generator`.
    pub fn with_generator(generator: Arc<dyn TextGenerator>, config: IngestionConfig) -> Self {
        let ingestor = ResponseIngestor::new(generator).with_config(config);
        Self::new(Arc::new(Refiner::new(ingestor)))
    }

    pub fn with_assembler(mut self, assembler: PlanAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn classify_only(&self, query: &str) -> Classification {
        classify(query)
    }

    pub async fn generate(&self, query: &str) -> Plan {
        let classification = classify(query);
        info!(
            granularity = %classification.granularity,
            domain = %classification.domain,
            duration = ?classification.duration,
            "planner: classified query"
        );
        self.assembler
            .assemble(query, &classification, self.provider.as_ref())
            .await
    }
}
