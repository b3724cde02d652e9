//! Turn a free-text request ("a 7-day protein rich diet plan") into a
//! time-phased [`Plan`] whose every entry holds complete, schema-shaped
//! content.
//!
//! ```text
//! query -> classify -> PlanAssembler -> ContentProvider (per entry) -> default fill -> Plan
//!                                          |
//!                                          +-- TemplateEngine (deterministic)
//!                                          +-- Refiner (TemplateEngine + ResponseIngestor)
//! ```

pub mod assemble;
pub mod calendar;
pub mod classify;
pub mod ingest;
pub mod llm;
pub mod model;
pub mod planner;
pub mod sample;
pub mod template;

pub use assemble::{ContentProvider, EntrySlot, PlanAssembler, Refiner};
pub use classify::classify;
pub use ingest::{IngestError, IngestionConfig, PromptContext, ResponseIngestor};
pub use llm::{GeminiClient, GenerateError, GenerationConfig, TextGenerator};
pub use model::{Classification, ContentBlock, ContentDomain, Entry, Granularity, Plan};
pub use planner::Planner;
pub use template::TemplateEngine;
